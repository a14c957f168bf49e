use serde::Deserialize;

// The request is a plain {"postcodes": [..]} object, built inline.

/// Raw response from the bulk lookup API.
#[derive(Deserialize)]
pub struct Response {
    pub result: Vec<Entry>,
}

/// Raw per-postcode lookup outcome. `result` is null when the service has no
/// match for the queried postcode.
#[derive(Deserialize)]
pub struct Entry {
    pub query: String,
    pub result: Option<Match>,
}

/// Raw matched-postcode data. Coordinates can be null for codes the service
/// knows but cannot place.
#[derive(Deserialize)]
pub struct Match {
    pub postcode: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}
