//! Subcommand implementations.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::{json, Value};

use airwave_charts::prelude::*;
use airwave_core::fetch::{decode_events, fetch_dma_airplay, fetch_dma_venues};
use airwave_core::{fetch_all, summarize_airplay, DemographicSummary, FetchRequest, Record};

use crate::config::{AirwaveConfig, CONFIG_FILE};
use crate::source::FileSource;

/// Which chart `preview` lays out.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum ChartKind {
    Heatmap,
    Streamgraph,
    Age,
    Gender,
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value).context("Failed to serialize output")?
    );
    Ok(())
}

async fn airplay_summary(
    source: &FileSource,
    config: &AirwaveConfig,
    dma: Option<&str>,
) -> Result<airwave_core::AirplaySummary> {
    let events = match dma {
        Some(dma_id) => fetch_dma_airplay(source, dma_id).await?,
        None => {
            let mut batches = fetch_all(source, &[FetchRequest::all("airplay")]).await?;
            decode_events("airplay", &batches.pop().unwrap_or_default())?
        }
    };
    tracing::info!(events = events.len(), "loaded airplay events");
    Ok(summarize_airplay(&events, config.top_n()?))
}

async fn demographic_summary(
    source: &FileSource,
    config: &AirwaveConfig,
    id: &str,
) -> Result<DemographicSummary> {
    let request = FetchRequest::filtered("demographic_data", "id", id);
    let rows = fetch_all(source, &[request]).await?.pop().unwrap_or_default();
    DemographicSummary::from_records(&rows, &config.demographic_keys())
        .with_context(|| format!("No usable demographic data for DMA {id}"))
}

pub async fn airplay(data: &Path, config: &AirwaveConfig, dma: Option<&str>) -> Result<()> {
    let summary = airplay_summary(&FileSource::new(data), config, dma).await?;
    print_json(&summary)
}

pub async fn demographic(data: &Path, config: &AirwaveConfig, id: &str) -> Result<()> {
    let summary = demographic_summary(&FileSource::new(data), config, id).await?;
    print_json(&summary)
}

pub async fn venues(data: &Path, dma: &str) -> Result<()> {
    let venues = fetch_dma_venues(&FileSource::new(data), dma).await?;
    tracing::info!(dma, venues = venues.len(), "loaded venues");
    print_json(&venues)
}

/// Lay a chart out at `size` through the chart runtime and describe the
/// drawn elements.
pub async fn preview(
    data: &Path,
    config: &AirwaveConfig,
    kind: ChartKind,
    id: Option<&str>,
    group: Option<&str>,
    size: Size,
) -> Result<()> {
    let source = FileSource::new(data);
    let container = RecordingContainer::new(size);
    let boxed = || -> Option<Box<dyn Container>> { Some(Box::new(container.clone())) };

    let marks = match kind {
        ChartKind::Heatmap => {
            let summary = airplay_summary(&source, config, id).await?;
            let cells: Vec<Record> = summary.heatmap.iter().map(|c| c.to_record()).collect();
            render(ChartRuntime::with_data(HeatmapChart::default(), boxed(), cells), config)
        }
        ChartKind::Streamgraph => {
            let summary = airplay_summary(&source, config, id).await?;
            let series = match group {
                Some(group) => summary.streamgraph.iter().find(|g| g.group_id == group),
                None => summary.streamgraph.first(),
            }
            .context("no airplay series to draw")?;
            let rows: Vec<Record> = series.rows.iter().map(|r| r.to_record()).collect();
            render(
                ChartRuntime::with_data(StreamgraphChart::default(), boxed(), rows),
                config,
            )
        }
        ChartKind::Age | ChartKind::Gender => {
            let id = id.context("--id is required for demographic charts")?;
            let summary = demographic_summary(&source, config, id).await?;
            let entries = if kind == ChartKind::Age {
                summary.age
            } else {
                summary.gender
            };
            let rows = entries
                .iter()
                .map(|e| -> Result<Record> {
                    match serde_json::to_value(e)? {
                        Value::Object(row) => Ok(row),
                        _ => anyhow::bail!("distribution entry is not an object"),
                    }
                })
                .collect::<Result<Vec<Record>>>()?;
            if kind == ChartKind::Age {
                let chart = BarChart::new("key", "value", "key")?;
                render(ChartRuntime::with_data(chart, boxed(), rows), config)
            } else {
                render(ChartRuntime::with_data(PieChart::default(), boxed(), rows), config)
            }
        }
    }?;

    let live = container.live_elements();
    tracing::info!(chart = ?kind, elements = live.len(), "chart rendered");
    print_json(&marks)
}

fn render<C: ReconcilableChart>(
    runtime: ChartRuntime<C>,
    config: &AirwaveConfig,
) -> Result<Vec<Value>> {
    let mut runtime = runtime.with_transition(config.transition());
    anyhow::ensure!(
        runtime.poll_size(),
        "container size is not drawable (width must be > 0)"
    );
    let scene = runtime.scene();
    Ok(scene
        .keys()
        .iter()
        .filter_map(|key| scene.get(*key))
        .map(|el| describe(&el.mark))
        .collect())
}

fn describe(mark: &Mark) -> Value {
    let kind = match mark.geometry {
        Geometry::Rect { .. } => "rect",
        Geometry::Arc { .. } => "arc",
        Geometry::Area { .. } => "area",
    };
    let anchor = mark.geometry.centroid();
    json!({
        "id": mark.id,
        "shape": kind,
        "label": mark.label,
        "anchor": [anchor.x, anchor.y],
        "fill": [mark.fill.r, mark.fill.g, mark.fill.b, mark.fill.a],
    })
}

pub fn init(dir: &Path, force: bool) -> Result<()> {
    let path = dir.join(CONFIG_FILE);
    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite.",
            path.display()
        );
    }
    let text = AirwaveConfig::default().to_toml()?;
    fs::write(&path, text).with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), "wrote default configuration");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn write(dir: &Path, name: &str, body: Value) {
        fs::write(dir.join(name), body.to_string()).unwrap();
    }

    #[tokio::test]
    async fn airplay_summary_over_files() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "airplay.json",
            json!([
                {"timestamp": "2024-07-01T10:00:00Z", "artist_name": ["X", "Y"], "market_id": "m1"},
                {"timestamp": "2024-07-02T10:00:00Z", "artist_name": ["Y"], "market_id": "m2"},
                {"timestamp": "garbage", "artist_name": ["Z"], "market_id": "m1"}
            ]),
        );
        let mut config = AirwaveConfig::default();
        config.pipeline.top_n = 1;

        let summary = airplay_summary(&FileSource::new(dir.path()), &config, None)
            .await
            .unwrap();
        let artists: Vec<&str> = summary.heatmap.iter().map(|c| c.category.as_str()).collect();
        assert_eq!(artists, vec!["Y", "Y"]);
        let groups: Vec<&str> = summary.streamgraph.iter().map(|g| g.group_id.as_str()).collect();
        assert_eq!(groups, vec!["m1", "m2"]);
    }

    #[tokio::test]
    async fn demographic_summary_over_files() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "demographic_data.json",
            json!([{
                "id": "501",
                "population_total": 200,
                "population_male": 100,
                "population_female": 100,
                "population_under_18": 40,
                "population_20_24": 20,
                "population_25_34": 40,
                "population_35_44": 30,
                "population_45_54": 30,
                "population_55_64": 20,
                "population_65_plus": 20,
                "median_age": 37.2
            }]),
        );
        let source = FileSource::new(dir.path());
        let config = AirwaveConfig::default();
        let summary = demographic_summary(&source, &config, "501").await.unwrap();
        assert_eq!(summary.gender[0].value, 50);
        assert_eq!(summary.median_age, Some(37.2));

        assert!(demographic_summary(&source, &config, "999").await.is_err());
    }

    #[test]
    fn init_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        init(dir.path(), false).unwrap();
        assert!(init(dir.path(), false).is_err());
        init(dir.path(), true).unwrap();
        assert_eq!(
            AirwaveConfig::load_from_dir(dir.path()).unwrap(),
            AirwaveConfig::default()
        );
    }

    #[test]
    fn render_describes_each_element() {
        let row = json!({"key": "population_male", "value": 50});
        let runtime = ChartRuntime::with_data(
            PieChart::default(),
            Some(Box::new(RecordingContainer::new(Size::new(100.0, 100.0)))),
            vec![row.as_object().unwrap().clone()],
        );
        let out = render(runtime, &AirwaveConfig::default()).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0]["shape"], "arc");
        assert_eq!(out[0]["label"], "male 50%");
    }
}
