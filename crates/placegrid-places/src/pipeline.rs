//! End-to-end sweep: resolve the area, build the grid, search every tile,
//! merge by identifier, and enrich each unique place.
//!
//! Any fatal error aborts the run and discards everything gathered so far.

use std::pin::pin;

use futures::stream::{self, StreamExt};
use placegrid_core::{build_grid, AppConfig, BoundingBox, Grid, SweepDelays, SweepLimits};

use crate::aggregate::PlaceTable;
use crate::client::{NearbyQuery, PlacesClient};
use crate::enrich::Enrichment;
use crate::error::PlacesError;
use crate::gate::{pause, RequestGate};
use crate::resolve::resolve_area;
use crate::search::TileSearch;
use crate::types::OutputRow;

const PROGRESS_EVERY: usize = 50;

/// What to sweep.
#[derive(Debug, Clone)]
pub struct SweepRequest {
    /// Human-readable area name passed to geocoding.
    pub place: String,
    pub radius_m: u32,
    /// Grid step multiplier, strictly between 0 and 1.
    pub overlap: f64,
    pub language: String,
    pub region: String,
    /// Upstream place type to search for.
    pub category: String,
}

/// How to pace and parallelise a sweep.
#[derive(Debug, Clone)]
pub struct SweepOptions {
    pub delays: SweepDelays,
    pub limits: SweepLimits,
    pub photo_max_width: u32,
    /// Tiles searched concurrently. Results are still merged in grid order.
    pub max_concurrent_tiles: usize,
    /// Detail lookups in flight at once. Output keeps first-seen order.
    pub max_concurrent_details: usize,
    /// Global cap on outstanding upstream requests.
    pub max_in_flight: usize,
}

impl SweepOptions {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            delays: config.delays(),
            limits: config.limits(),
            photo_max_width: config.photo_max_width,
            max_concurrent_tiles: config.max_concurrent_tiles,
            max_concurrent_details: config.max_concurrent_details,
            max_in_flight: config.max_in_flight,
        }
    }
}

impl Default for SweepOptions {
    fn default() -> Self {
        Self {
            delays: SweepDelays::default(),
            limits: SweepLimits::default(),
            photo_max_width: 800,
            max_concurrent_tiles: 1,
            max_concurrent_details: 1,
            max_in_flight: 1,
        }
    }
}

/// Result of a completed sweep.
#[derive(Debug)]
pub struct SweepReport {
    pub bounds: BoundingBox,
    pub grid_rows: usize,
    pub grid_cols: usize,
    pub unique_places: usize,
    pub rows: Vec<OutputRow>,
}

pub struct Sweeper {
    client: PlacesClient,
    gate: RequestGate,
    options: SweepOptions,
}

impl Sweeper {
    #[must_use]
    pub fn new(client: PlacesClient, options: SweepOptions) -> Self {
        let gate = RequestGate::new(options.max_in_flight);
        Self {
            client,
            gate,
            options,
        }
    }

    /// Geocodes the requested area.
    ///
    /// # Errors
    ///
    /// See [`resolve_area`].
    pub async fn resolve(&self, request: &SweepRequest) -> Result<BoundingBox, PlacesError> {
        resolve_area(
            &self.client,
            &request.place,
            &request.language,
            &request.region,
        )
        .await
    }

    /// Builds the sample grid for `bounds`.
    ///
    /// # Errors
    ///
    /// [`PlacesError::Grid`] for an invalid radius, overlap, or rectangle.
    pub fn plan(bounds: &BoundingBox, request: &SweepRequest) -> Result<Grid, PlacesError> {
        let grid = build_grid(bounds, f64::from(request.radius_m), request.overlap)?;
        tracing::info!(
            rows = grid.rows(),
            cols = grid.cols(),
            tiles = grid.len(),
            "sweep grid ready"
        );
        Ok(grid)
    }

    /// Searches every tile of `grid` and merges the results, first write wins.
    ///
    /// Tiles may run concurrently, but their results are consumed in grid
    /// traversal order so the merge is deterministic.
    ///
    /// # Errors
    ///
    /// The first tile error in traversal order aborts the collection.
    pub async fn collect(&self, grid: &Grid, query: &NearbyQuery) -> Result<PlaceTable, PlacesError> {
        let search = TileSearch {
            client: &self.client,
            gate: &self.gate,
            query,
            delays: &self.options.delays,
            limits: &self.options.limits,
        };
        let after_tile = self.options.delays.after_tile;
        let total = grid.len();

        let mut tiles = pin!(stream::iter(grid.points().enumerate())
            .map(|(index, point)| async move {
                let tile = index + 1;
                let result = search.run(tile, point).await;
                pause(after_tile).await;
                (tile, point, result)
            })
            .buffered(self.options.max_concurrent_tiles.max(1)));

        let mut table = PlaceTable::new();
        while let Some((tile, point, result)) = tiles.next().await {
            let places = result?;
            let found = places.len();
            let added = table.absorb(places);
            tracing::debug!(
                tile,
                total,
                lat = point.lat,
                lng = point.lng,
                found,
                added,
                "tile complete"
            );
        }

        tracing::info!(unique_places = table.len(), "tile search complete");
        Ok(table)
    }

    /// Enriches every place in `table`, keeping first-seen order.
    ///
    /// # Errors
    ///
    /// Transport errors from the detail lookups. Places whose detail status is
    /// not `OK` are kept with search-result data only.
    pub async fn enrich(&self, table: &PlaceTable, language: &str) -> Result<Vec<OutputRow>, PlacesError> {
        let enrichment = Enrichment {
            client: &self.client,
            gate: &self.gate,
            language,
            after_detail: self.options.delays.after_detail,
            photo_max_width: self.options.photo_max_width,
        };
        let total = table.len();

        let mut enriched = pin!(stream::iter(table.iter())
            .map(|place| async move { enrichment.run(place).await })
            .buffered(self.options.max_concurrent_details.max(1)));

        let mut rows = Vec::with_capacity(total);
        while let Some(row) = enriched.next().await {
            rows.push(row?);
            if rows.len() % PROGRESS_EVERY == 0 {
                tracing::info!(done = rows.len(), total, "enrichment progress");
            }
        }
        Ok(rows)
    }

    /// Runs the whole sweep.
    ///
    /// # Errors
    ///
    /// Any fatal error from resolution, grid planning, tile search, or
    /// enrichment. No partial results are returned.
    pub async fn run(&self, request: &SweepRequest) -> Result<SweepReport, PlacesError> {
        let bounds = self.resolve(request).await?;
        self.run_within(bounds, request).await
    }

    /// Runs the sweep over an already-known rectangle, skipping geocoding.
    ///
    /// # Errors
    ///
    /// As [`Sweeper::run`], minus resolution errors.
    pub async fn run_within(
        &self,
        bounds: BoundingBox,
        request: &SweepRequest,
    ) -> Result<SweepReport, PlacesError> {
        let grid = Self::plan(&bounds, request)?;
        let query = NearbyQuery {
            radius_m: request.radius_m,
            category: request.category.clone(),
            language: request.language.clone(),
        };

        let table = self.collect(&grid, &query).await?;
        let rows = self.enrich(&table, &request.language).await?;

        Ok(SweepReport {
            bounds,
            grid_rows: grid.rows(),
            grid_cols: grid.cols(),
            unique_places: table.len(),
            rows,
        })
    }
}
