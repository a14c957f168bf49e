use serde::{Deserialize, Serialize};

use crate::extract::RawEntry;
use crate::geocode::GeocodeTable;
use crate::service::ServiceType;

/// One fully-resolved facility row.
///
/// Only entries whose extracted postcode resolved to coordinates become
/// `Facility` values, so latitude and longitude are always present here.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Facility {
    pub name: String,
    pub address: String,
    pub phone_number: String,
    pub postcode: String,
    pub latitude: f64,
    pub longitude: f64,
    pub service_type: ServiceType,
}

impl Facility {
    /// Key covering every field, for exact-duplicate removal.
    pub(crate) fn dedup_key(&self) -> (String, String, String, String, u64, u64, ServiceType) {
        (
            self.name.clone(),
            self.address.clone(),
            self.phone_number.clone(),
            self.postcode.clone(),
            self.latitude.to_bits(),
            self.longitude.to_bits(),
            self.service_type,
        )
    }
}

/// Join scraped entries with their geocoded coordinates.
///
/// Inner join on the extracted postcode column: an entry whose postcode is
/// `None`, or whose postcode is absent from the table, is dropped from the
/// result. This decides which facilities surface in the final dataset:
/// unresolvable entries are excluded, not kept with empty coordinates.
pub fn build_records(
    entries: Vec<RawEntry>,
    postcodes: &[Option<String>],
    table: &GeocodeTable,
    service_type: ServiceType,
) -> Vec<Facility> {
    entries
        .into_iter()
        .zip(postcodes)
        .filter_map(|(entry, postcode)| {
            let postcode = postcode.as_deref()?;
            let coordinates = table.get(postcode)?;
            Some(Facility {
                name: entry.name,
                address: entry.address,
                phone_number: entry.phone_number,
                postcode: postcode.to_string(),
                latitude: coordinates.latitude,
                longitude: coordinates.longitude,
                service_type,
            })
        })
        .collect()
}
