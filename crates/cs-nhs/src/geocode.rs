use std::collections::HashMap;

use reqwest::Client;
use serde::Serialize;
use serde_json::json;
use tracing::debug;

use crate::api_interfaces::geocode as api;
use crate::constants::DEFAULT_GEOCODE_ENDPOINT;
use crate::error::GeocodeError;

/// Resolved coordinates for one postcode.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Per-postcode outcome of the bulk lookup.
///
/// Parsed defensively: an entry the service has no match for, or one missing
/// either coordinate, is `Unresolved`.
#[derive(Clone, Debug, PartialEq)]
pub enum Resolution {
    Resolved {
        postcode: String,
        coordinates: Coordinates,
    },
    Unresolved {
        postcode: String,
    },
}

impl From<api::Entry> for Resolution {
    fn from(entry: api::Entry) -> Self {
        match entry.result {
            Some(found) => match (found.latitude, found.longitude) {
                (Some(latitude), Some(longitude)) => Resolution::Resolved {
                    postcode: found.postcode,
                    coordinates: Coordinates {
                        latitude,
                        longitude,
                    },
                },
                _ => Resolution::Unresolved {
                    postcode: entry.query,
                },
            },
            None => Resolution::Unresolved {
                postcode: entry.query,
            },
        }
    }
}

/// Postcode → coordinate table for one query's rows.
#[derive(Debug, Default, PartialEq, Serialize)]
pub struct GeocodeTable(HashMap<String, Coordinates>);

impl GeocodeTable {
    /// Resolve a batch of extracted postcodes in one request.
    ///
    /// `None` entries and repeats are filtered out before sending. Postcodes
    /// the service cannot resolve are simply absent from the table; an empty
    /// batch issues no request at all.
    pub async fn lookup(
        client: &Client,
        postcodes: &[Option<String>],
        endpoint: Option<&str>,
    ) -> Result<Self, GeocodeError> {
        let mut batch: Vec<&str> = Vec::new();
        for postcode in postcodes.iter().flatten() {
            if !batch.contains(&postcode.as_str()) {
                batch.push(postcode);
            }
        }
        if batch.is_empty() {
            return Ok(Self::default());
        }
        let response = client
            .post(endpoint.unwrap_or(DEFAULT_GEOCODE_ENDPOINT))
            .json(&json!({ "postcodes": batch }))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(GeocodeError::Response(response.status()));
        }
        let body = response
            .text()
            .await
            .map_err(GeocodeError::ResponseBody)?;
        let parsed: api::Response = serde_json::from_str(&body)?;
        let mut table = HashMap::new();
        for entry in parsed.result {
            match Resolution::from(entry) {
                Resolution::Resolved {
                    postcode,
                    coordinates,
                } => {
                    table.insert(postcode, coordinates);
                }
                Resolution::Unresolved { postcode } => {
                    debug!(%postcode, "postcode not resolved by lookup service");
                }
            }
        }
        Ok(Self(table))
    }

    pub fn get(&self, postcode: &str) -> Option<Coordinates> {
        self.0.get(postcode).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, Coordinates)> for GeocodeTable {
    fn from_iter<I: IntoIterator<Item = (String, Coordinates)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn some(postcodes: &[&str]) -> Vec<Option<String>> {
        postcodes.iter().map(|p| Some(p.to_string())).collect()
    }

    #[tokio::test]
    async fn lookup_success() {
        // Arrange
        let server = MockServer::start_async().await;
        let lookup_mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/")
                    .json_body(serde_json::json!({ "postcodes": ["EX2 5DW", "XX1 1XX"] }));
                then.status(200).json_body(serde_json::json!({
                    "status": 200,
                    "result": [
                        {
                            "query": "EX2 5DW",
                            "result": {
                                "postcode": "EX2 5DW",
                                "latitude": 50.70,
                                "longitude": -3.50
                            }
                        },
                        {
                            "query": "XX1 1XX",
                            "result": null
                        }
                    ]
                }));
            })
            .await;
        let url = server.url("/");
        let client = reqwest::Client::new();

        // Act
        let table =
            GeocodeTable::lookup(&client, &some(&["EX2 5DW", "XX1 1XX"]), Some(&url)).await;

        // Assert
        assert!(table.is_ok(), "Failed to look up: {:?}", table.unwrap_err());
        let table = table.unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(
            table.get("EX2 5DW"),
            Some(Coordinates {
                latitude: 50.70,
                longitude: -3.50,
            })
        );
        assert_eq!(table.get("XX1 1XX"), None);
        lookup_mock.assert();
    }

    #[tokio::test]
    async fn lookup_filters_nones_and_repeats() {
        // Arrange
        let server = MockServer::start_async().await;
        let lookup_mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/")
                    .json_body(serde_json::json!({ "postcodes": ["EX2 5DW"] }));
                then.status(200).json_body(serde_json::json!({
                    "status": 200,
                    "result": [
                        {
                            "query": "EX2 5DW",
                            "result": {
                                "postcode": "EX2 5DW",
                                "latitude": 50.70,
                                "longitude": -3.50
                            }
                        }
                    ]
                }));
            })
            .await;
        let url = server.url("/");
        let client = reqwest::Client::new();
        let postcodes = vec![
            Some("EX2 5DW".to_string()),
            None,
            Some("EX2 5DW".to_string()),
        ];

        // Act
        let table = GeocodeTable::lookup(&client, &postcodes, Some(&url)).await;

        // Assert
        assert_eq!(table.unwrap().len(), 1);
        lookup_mock.assert();
    }

    #[tokio::test]
    async fn lookup_empty_batch_issues_no_request() {
        // Arrange: a server that would fail any request it received.
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/");
                then.status(500);
            })
            .await;
        let url = server.url("/");
        let client = reqwest::Client::new();

        // Act
        let table = GeocodeTable::lookup(&client, &[None, None], Some(&url)).await;

        // Assert
        assert!(table.unwrap().is_empty());
    }

    #[tokio::test]
    async fn lookup_skips_match_with_null_coordinates() {
        // Arrange
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/");
                then.status(200).json_body(serde_json::json!({
                    "status": 200,
                    "result": [
                        {
                            "query": "GY1 1WR",
                            "result": {
                                "postcode": "GY1 1WR",
                                "latitude": null,
                                "longitude": null
                            }
                        }
                    ]
                }));
            })
            .await;
        let url = server.url("/");
        let client = reqwest::Client::new();

        // Act
        let table = GeocodeTable::lookup(&client, &some(&["GY1 1WR"]), Some(&url)).await;

        // Assert
        assert!(table.unwrap().is_empty());
    }

    #[tokio::test]
    async fn lookup_bad_status() {
        // Arrange
        let server = MockServer::start_async().await;
        let lookup_mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/");
                then.status(503);
            })
            .await;
        let url = server.url("/");
        let client = reqwest::Client::new();

        // Act
        let table = GeocodeTable::lookup(&client, &some(&["EX2 5DW"]), Some(&url)).await;

        // Assert
        assert!(matches!(table.unwrap_err(), GeocodeError::Response(_)));
        lookup_mock.assert();
    }

    #[tokio::test]
    async fn lookup_bad_json() {
        // Arrange
        let server = MockServer::start_async().await;
        let lookup_mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/");
                then.status(200)
                    .header("Content-Type", "application/json")
                    .body(r#"{"error": "something is amiss" }"#);
            })
            .await;
        let url = server.url("/");
        let client = reqwest::Client::new();

        // Act
        let table = GeocodeTable::lookup(&client, &some(&["EX2 5DW"]), Some(&url)).await;

        // Assert
        assert!(matches!(table.unwrap_err(), GeocodeError::Parse(_)));
        lookup_mock.assert();
    }

    #[test]
    fn resolution_from_missing_match_keeps_query() {
        let entry = api::Entry {
            query: "ZZ9 9ZZ".to_string(),
            result: None,
        };

        let resolution = Resolution::from(entry);

        assert_eq!(
            resolution,
            Resolution::Unresolved {
                postcode: "ZZ9 9ZZ".to_string(),
            }
        );
    }
}
