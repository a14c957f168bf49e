/// The default endpoint format for the NHS accident & emergency service search
pub const DEFAULT_AE_SEARCH_URL_FORMAT: &str =
    "https://www.nhs.uk/service-search/find-an-accident-and-emergency-service/results/$postcode";

/// The default endpoint format for the NHS urgent treatment centre search
pub const DEFAULT_UTC_SEARCH_URL_FORMAT: &str =
    "https://www.nhs.uk/service-search/find-an-urgent-treatment-centre/results/$postcode";

pub const DEFAULT_SEARCH_URL_REPLACE_TOKEN: &str = "$postcode";

/// The default endpoint for the postcodes.io bulk lookup service
pub const DEFAULT_GEOCODE_ENDPOINT: &str = "https://api.postcodes.io/postcodes";
