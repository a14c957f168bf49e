use reqwest::Client;
use scraper::Html;
use thiserror::Error;
use tracing::{debug, info};

use crate::constants::DEFAULT_SEARCH_URL_REPLACE_TOKEN;
use crate::error::QueryError;
use crate::extract;
use crate::facility::{self, Facility};
use crate::geocode::GeocodeTable;
use crate::postcode;
use crate::service::ServiceType;
use crate::util::default_http_client;

/// A results-page endpoint format with a postcode replace token.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchEndpoint {
    url: String,
    replace_token: String,
}

#[derive(Debug, Error, PartialEq)]
pub enum EndpointConfigError {
    #[error("the endpoint format is missing")]
    MissingFormat,
    #[error("the replace token is missing")]
    MissingReplaceToken,
    #[error("the replace token provided is not in the endpoint format")]
    ReplaceTokenNotInFormat,
}

impl SearchEndpoint {
    pub fn try_new(format: String, replace_token: String) -> Result<Self, EndpointConfigError> {
        if format.is_empty() {
            return Err(EndpointConfigError::MissingFormat);
        }
        if replace_token.is_empty() {
            return Err(EndpointConfigError::MissingReplaceToken);
        }
        if !format.contains(&replace_token) {
            return Err(EndpointConfigError::ReplaceTokenNotInFormat);
        }
        Ok(Self {
            url: format,
            replace_token,
        })
    }

    /// Build the results-page URL for one postcode, `%20`-escaping spaces.
    pub fn to_url(&self, postcode: &str) -> String {
        self.url
            .replace(&self.replace_token, &postcode.replace(' ', "%20"))
    }
}

/// Endpoint overrides, for pointing a finder at a mock or a mirror.
#[derive(Clone, Debug, Default)]
pub struct EndpointConfig {
    pub accident_emergency: Option<SearchEndpoint>,
    pub urgent_treatment: Option<SearchEndpoint>,
    pub geocode: Option<String>,
}

/// Handle for running facility searches. Owns the HTTP client and the
/// endpoint configuration.
#[derive(Clone, Debug)]
pub struct Finder {
    http: Client,
    endpoints: EndpointConfig,
}

impl Default for Finder {
    fn default() -> Self {
        Self::new(default_http_client(), EndpointConfig::default())
    }
}

impl Finder {
    pub fn new(http: Client, endpoints: EndpointConfig) -> Self {
        Self { http, endpoints }
    }

    fn search_endpoint(&self, service_type: ServiceType) -> SearchEndpoint {
        let configured = match service_type {
            ServiceType::AccidentEmergency => &self.endpoints.accident_emergency,
            ServiceType::UrgentTreatment => &self.endpoints.urgent_treatment,
        };
        configured.clone().unwrap_or_else(|| {
            SearchEndpoint::try_new(
                service_type.default_search_url_format().to_string(),
                DEFAULT_SEARCH_URL_REPLACE_TOKEN.to_string(),
            )
            .expect("Invalid default endpoint config")
        })
    }

    /// Run one (postcode, service type) query: fetch the results page,
    /// extract its entries, geocode their addresses and join.
    pub async fn find_nearest(
        &self,
        postcode: &str,
        service_type: ServiceType,
    ) -> Result<Vec<Facility>, QueryError> {
        let url = self.search_endpoint(service_type).to_url(postcode);
        debug!(%url, "fetching results page");
        let response = self.http.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(QueryError::Response(response.status()));
        }
        let body = response.text().await.map_err(QueryError::ResponseBody)?;
        let entries = extract::extract_entries(&Html::parse_document(&body))?;
        let postcodes: Vec<Option<String>> = entries
            .iter()
            .map(|entry| postcode::find_postcode(&entry.address))
            .collect();
        let table =
            GeocodeTable::lookup(&self.http, &postcodes, self.endpoints.geocode.as_deref())
                .await?;
        let records = facility::build_records(entries, &postcodes, &table, service_type);
        info!(
            postcode,
            service_type = %service_type,
            records = records.len(),
            "query complete"
        );
        Ok(records)
    }
}
