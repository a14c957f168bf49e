use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{DEFAULT_AE_SEARCH_URL_FORMAT, DEFAULT_UTC_SEARCH_URL_FORMAT};

/// Category of facility to search for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServiceType {
    /// Accident & emergency departments.
    #[serde(rename = "ae")]
    AccidentEmergency,
    /// Urgent treatment centres.
    #[serde(rename = "utc")]
    UrgentTreatment,
}

impl ServiceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceType::AccidentEmergency => "ae",
            ServiceType::UrgentTreatment => "utc",
        }
    }

    pub(crate) fn default_search_url_format(&self) -> &'static str {
        match self {
            ServiceType::AccidentEmergency => DEFAULT_AE_SEARCH_URL_FORMAT,
            ServiceType::UrgentTreatment => DEFAULT_UTC_SEARCH_URL_FORMAT,
        }
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unsupported service type `{0}` (expected `ae` or `utc`)")]
pub struct ServiceTypeError(String);

impl FromStr for ServiceType {
    type Err = ServiceTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ae" => Ok(ServiceType::AccidentEmergency),
            "utc" => Ok(ServiceType::UrgentTreatment),
            _ => Err(ServiceTypeError(s.to_string())),
        }
    }
}
