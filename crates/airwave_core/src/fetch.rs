//! Upstream row fetching and concurrent fan-out.
//!
//! The remote store is abstracted behind [`UpstreamSource`]; everything in
//! this module only composes requests and joins their results.

use std::future::Future;

use futures::future::try_join_all;

use crate::error::{PipelineError, Result, UpstreamError};
use crate::event::{RawEvent, Record};

/// Equality filter applied by the upstream (`field = value`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Filter {
    pub field: String,
    pub value: String,
}

/// A named resource (table) plus an optional equality filter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchRequest {
    pub resource: String,
    pub filter: Option<Filter>,
}

impl FetchRequest {
    pub fn all(resource: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            filter: None,
        }
    }

    pub fn filtered(
        resource: impl Into<String>,
        field: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            resource: resource.into(),
            filter: Some(Filter {
                field: field.into(),
                value: value.into(),
            }),
        }
    }

    /// Human readable form used in errors and logs.
    pub fn describe(&self) -> String {
        match &self.filter {
            Some(f) => format!("{}[{}={}]", self.resource, f.field, f.value),
            None => self.resource.clone(),
        }
    }
}

/// Anything that can return the rows of a resource.
///
/// An empty `Ok(vec![])` means "no rows"; failures must be reported as `Err`.
pub trait UpstreamSource: Sync {
    fn fetch(
        &self,
        request: &FetchRequest,
    ) -> impl Future<Output = std::result::Result<Vec<Record>, UpstreamError>> + Send;
}

async fn fetch_one<S: UpstreamSource>(source: &S, request: &FetchRequest) -> Result<Vec<Record>> {
    source
        .fetch(request)
        .await
        .map_err(|source| PipelineError::UpstreamFetchFailed {
            resource: request.describe(),
            source,
        })
}

/// Issue every request concurrently and wait for all of them.
///
/// Results are in request order. The first failure fails the whole batch.
pub async fn fetch_all<S: UpstreamSource>(
    source: &S,
    requests: &[FetchRequest],
) -> Result<Vec<Vec<Record>>> {
    tracing::debug!(requests = requests.len(), "fanning out upstream fetches");
    let results = try_join_all(requests.iter().map(|r| fetch_one(source, r))).await;
    if let Err(e) = &results {
        tracing::warn!(error = %e, "upstream fan-out failed");
    }
    results
}

/// Decode airplay rows into [`RawEvent`]s.
pub fn decode_events(resource: &str, rows: &[Record]) -> Result<Vec<RawEvent>> {
    rows.iter()
        .map(|row| {
            RawEvent::from_record(row).map_err(|e| PipelineError::Decode {
                resource: resource.to_string(),
                message: e.to_string(),
            })
        })
        .collect()
}

fn string_field(row: &Record, field: &str) -> Option<String> {
    match row.get(field)? {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Airplay events for every market of a DMA.
///
/// Markets are looked up first, then one airplay request per market is issued
/// concurrently; rows of all markets are concatenated.
pub async fn fetch_dma_airplay<S: UpstreamSource>(source: &S, dma_id: &str) -> Result<Vec<RawEvent>> {
    let markets = fetch_one(source, &FetchRequest::filtered("market", "dma_id", dma_id)).await?;
    let requests: Vec<FetchRequest> = markets
        .iter()
        .filter_map(|m| string_field(m, "id"))
        .map(|id| FetchRequest::filtered("airplay", "market_id", id))
        .collect();

    tracing::info!(dma_id, markets = requests.len(), "fetching airplay per market");

    let batches = fetch_all(source, &requests).await?;
    let rows: Vec<Record> = batches.into_iter().flatten().collect();
    decode_events("airplay", &rows)
}

/// Venues of a DMA: `venue_dma` links resolved against `venue`, each row
/// annotated with its capacity tier.
pub async fn fetch_dma_venues<S: UpstreamSource>(source: &S, dma_id: &str) -> Result<Vec<Record>> {
    let links = fetch_one(source, &FetchRequest::filtered("venue_dma", "dma_id", dma_id)).await?;
    let requests: Vec<FetchRequest> = links
        .iter()
        .filter_map(|l| string_field(l, "venue_id"))
        .map(|id| FetchRequest::filtered("venue", "id", id))
        .collect();

    let mut venues: Vec<Record> = fetch_all(source, &requests).await?.into_iter().flatten().collect();
    for venue in &mut venues {
        crate::venue::annotate_venue(venue);
    }
    Ok(venues)
}
