// Stay quote engine: prices a hotel stay for a party against a rate catalog

pub mod allocation;
pub mod catalog;
pub mod config;
pub mod guests;
pub mod multipliers;
pub mod partition;
pub mod quote;
pub mod rates;
pub mod response;
pub mod server;
pub mod source;

// Re-export key types for convenience
pub use allocation::{Allocation, AllocationSelector, RoomAssignment};
pub use catalog::{Catalog, CatalogError, HotelId, HotelInfo, MultiplierRow, RateRow};
pub use config::{AppConfig, CatalogLocation, ConfigError, EngineConfig, ServerConfig};
pub use guests::GuestGroup;
pub use multipliers::{AgeInterval, MultiplierTable};
pub use partition::{Partition, PartitionGenerator};
pub use quote::{HotelQuote, Offering, QuoteEngine, QuoteError, QuoteRequest, QuoteResponse, Stay};
pub use rates::RateTable;
pub use response::{flatten, to_xml, RenderError};
pub use server::{AppState, ServerError};
pub use source::{CatalogSource, HttpCatalogSource, JsonDirectorySource};
