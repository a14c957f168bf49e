mod api_interfaces;
pub mod aggregate;
pub mod constants;
pub mod error;
pub mod export;
pub mod extract;
pub mod facility;
pub mod geocode;
pub mod postcode;
pub mod search;
pub mod service;
mod util;

pub use aggregate::{collect_facilities, Harvest, Pacing, PacingBuilder, QueryFailure};
pub use facility::Facility;
pub use search::{EndpointConfig, Finder, SearchEndpoint};
pub use service::ServiceType;
