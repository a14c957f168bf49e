use std::path::Path;

use crate::error::{ExportError, LoadError, SaveError};
use crate::facility::Facility;

/// Write the facility table as CSV: one row per facility, columns name,
/// address, phone_number, postcode, latitude, longitude, service_type.
pub fn write_csv<P: AsRef<Path>>(path: P, facilities: &[Facility]) -> Result<(), ExportError> {
    let mut writer = csv::Writer::from_path(path)?;
    for facility in facilities {
        writer.serialize(facility)?;
    }
    writer.flush()?;
    Ok(())
}

pub async fn save_json<P: AsRef<Path>>(
    path: P,
    facilities: &[Facility],
) -> Result<(), SaveError> {
    let serialized = serde_json::to_string_pretty(facilities)?;
    tokio::fs::write(path, serialized).await?;
    Ok(())
}

pub async fn load_json<P: AsRef<Path>>(path: P) -> Result<Vec<Facility>, LoadError> {
    let file_contents = tokio::fs::read_to_string(path).await?;
    Ok(serde_json::from_str(file_contents.as_str())?)
}
