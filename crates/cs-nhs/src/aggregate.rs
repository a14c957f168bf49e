use std::collections::HashSet;
use std::time::Duration;

use derive_builder::Builder;
use futures::{stream, StreamExt};
use tokio::time;
use tracing::{info, warn};

use crate::error::QueryError;
use crate::facility::Facility;
use crate::search::Finder;
use crate::service::ServiceType;

/// Request pacing for a multi-postcode run.
///
/// `delay` is the fixed pause between successive batches, with up to `jitter`
/// of random extra on top. `concurrency` bounds how many queries run inside
/// one batch. The defaults reproduce a strictly sequential loop with a fixed
/// five-second pause between queries.
#[derive(Builder, Clone, Debug, PartialEq)]
#[builder(default)]
pub struct Pacing {
    pub delay: Duration,
    pub jitter: Duration,
    pub concurrency: usize,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            delay: Duration::from_secs(5),
            jitter: Duration::ZERO,
            concurrency: 1,
        }
    }
}

impl Pacing {
    async fn pause(&self) {
        let mut wait = self.delay;
        if !self.jitter.is_zero() {
            wait += Duration::from_millis(fastrand::u64(0..=self.jitter.as_millis() as u64));
        }
        if !wait.is_zero() {
            time::sleep(wait).await;
        }
    }
}

/// One postcode's failed query.
#[derive(Debug)]
pub struct QueryFailure {
    pub postcode: String,
    pub service_type: ServiceType,
    pub error: QueryError,
}

/// Accumulated result of a multi-postcode run: the deduplicated facility
/// table plus the per-postcode failures that did not abort it.
#[derive(Debug, Default)]
pub struct Harvest {
    pub facilities: Vec<Facility>,
    pub failures: Vec<QueryFailure>,
}

impl Harvest {
    /// Fold another run into this one, dropping exact-duplicate rows.
    pub fn merge(&mut self, other: Harvest) {
        self.facilities.extend(other.facilities);
        self.failures.extend(other.failures);
        dedup_in_place(&mut self.facilities);
    }
}

/// Drop rows identical across all seven fields, keeping first occurrences in
/// order.
fn dedup_in_place(facilities: &mut Vec<Facility>) {
    let mut seen = HashSet::new();
    facilities.retain(|facility| seen.insert(facility.dedup_key()));
}

/// Query every postcode for one service type, pacing requests and isolating
/// per-postcode failures.
pub async fn collect_facilities(
    finder: &Finder,
    postcodes: &[String],
    service_type: ServiceType,
    pacing: &Pacing,
) -> Harvest {
    collect_facilities_with(finder, postcodes, service_type, pacing, |_| {}).await
}

/// As [`collect_facilities`], invoking `on_postcode` as each postcode's query
/// finishes (for progress reporting).
pub async fn collect_facilities_with(
    finder: &Finder,
    postcodes: &[String],
    service_type: ServiceType,
    pacing: &Pacing,
    mut on_postcode: impl FnMut(&str),
) -> Harvest {
    let mut harvest = Harvest::default();
    let concurrency = pacing.concurrency.max(1);
    for (index, batch) in postcodes.chunks(concurrency).enumerate() {
        if index > 0 {
            pacing.pause().await;
        }
        let results = stream::iter(batch)
            .map(|postcode| async move {
                (postcode, finder.find_nearest(postcode, service_type).await)
            })
            .buffer_unordered(concurrency)
            .collect::<Vec<_>>()
            .await;
        for (postcode, result) in results {
            match result {
                Ok(facilities) => {
                    info!(%postcode, count = facilities.len(), "postcode complete");
                    harvest.facilities.extend(facilities);
                }
                Err(error) => {
                    warn!(%postcode, %error, "postcode query failed");
                    harvest.failures.push(QueryFailure {
                        postcode: postcode.clone(),
                        service_type,
                        error,
                    });
                }
            }
            on_postcode(postcode);
        }
    }
    dedup_in_place(&mut harvest.facilities);
    harvest
}
