//! Places API client and the area sweep pipeline.

pub mod aggregate;
pub mod client;
pub mod enrich;
pub mod error;
pub mod gate;
pub mod pipeline;
pub mod resolve;
mod retry;
pub mod search;
pub mod types;

pub use aggregate::{aggregate, PlaceTable};
pub use client::{NearbyQuery, PlacesClient};
pub use enrich::{
    clean_types, fetch_detail, first_non_empty, maps_url_for_place_id, merge_place, Enrichment,
    FieldSource, FIELD_PRECEDENCE, IGNORED_TYPES,
};
pub use error::PlacesError;
pub use gate::RequestGate;
pub use pipeline::{SweepOptions, SweepReport, SweepRequest, Sweeper};
pub use resolve::resolve_area;
pub use search::TileSearch;
pub use types::{DetailedPlace, LightweightPlace, OutputRow, PhotoRef};
