use thiserror::Error;

/// Errors from a single (postcode, service type) search query.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("the results page request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("the results page request failed with status code: {0}")]
    Response(reqwest::StatusCode),
    #[error("the results page body could not be read: {0}")]
    ResponseBody(#[source] reqwest::Error),
    #[error(
        "extracted field counts disagree: {names} names, {addresses} addresses, {phones} phone numbers"
    )]
    FieldCountMismatch {
        names: usize,
        addresses: usize,
        phones: usize,
    },
    #[error("the postcode lookup failed: {0}")]
    Geocode(#[from] GeocodeError),
}

/// Errors from the batched postcode lookup.
#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("the lookup request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("the lookup request failed with status code: {0}")]
    Response(reqwest::StatusCode),
    #[error("the lookup response body could not be read: {0}")]
    ResponseBody(#[source] reqwest::Error),
    #[error("unable to parse the lookup response: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("unable to write the file: {0}")]
    Write(#[from] std::io::Error),
    #[error("unable to serialize the rows: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("unable to read the file: {0}")]
    Read(#[from] std::io::Error),
    #[error("unable to parse the file: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("unable to write the file: {0}")]
    Write(#[from] std::io::Error),
    #[error("unable to serialize the data: {0}")]
    Serialize(#[from] serde_json::Error),
}
