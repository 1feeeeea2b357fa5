//! Subcommand implementations

use crate::config::AppConfig;
use anyhow::{Context, Result};
use serde_json::json;
use store_locator::{
    lookup_zone, start_tracking, to_display_coords, DisplayPoint, HttpPositionSource, Position,
    SensorField,
};
use tokio::sync::mpsc;

/// How results are written to stdout
#[derive(Debug, Clone, Copy)]
pub struct Output {
    pub json: bool,
}

impl Output {
    fn point(&self, label: &str, point: &DisplayPoint) -> Result<()> {
        if self.json {
            let value = json!({ "id": label, "top": point.top_css(), "left": point.left_css() });
            println!("{}", serde_json::to_string(&value)?);
        } else {
            println!("{:<6} {}", label, point);
        }
        Ok(())
    }

    fn no_marker(&self, label: &str) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string(&json!({ "id": label, "marker": null }))?);
        } else {
            println!("{:<6} no marker", label);
        }
        Ok(())
    }
}

/// Poll the position endpoint until `limit` updates or Ctrl+C
pub async fn track(
    config: &AppConfig,
    url: Option<String>,
    limit: Option<u64>,
    output: Output,
) -> Result<()> {
    let mut tracker_config = config.tracker.clone();
    if let Some(url) = url {
        tracker_config.position_url = url;
    }

    let field = config
        .sensor_field
        .context("sensor_field must be configured for tracking")?;
    let source = HttpPositionSource::new(&tracker_config)?;

    let (tx, mut rx) = mpsc::unbounded_channel();
    let handle = start_tracking(source, field, &tracker_config, move |point| {
        let _ = tx.send(point);
    })?;

    let mut received: u64 = 0;
    loop {
        tokio::select! {
            Some(point) = rx.recv() => {
                received += 1;
                output.point("here", &point)?;
                if limit.is_some_and(|limit| received >= limit) {
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                log::info!("Received Ctrl+C, stopping");
                break;
            }
        }
    }

    handle.stop();

    let state = handle.state();
    log::info!(
        "Tracking finished: {} ticks, {} updates, {} failed fetches",
        state.ticks,
        state.updates,
        state.failures
    );
    Ok(())
}

/// Resolve the sensor field from overrides, falling back to the config file
fn resolve_field(
    config: &AppConfig,
    width: Option<f64>,
    height: Option<f64>,
) -> Result<SensorField> {
    match (width, height, config.sensor_field) {
        (Some(w), Some(h), _) => Ok(SensorField::new(w, h)?),
        (w, h, Some(field)) => Ok(SensorField::new(
            w.unwrap_or(field.width()),
            h.unwrap_or(field.height()),
        )?),
        (_, _, None) => {
            anyhow::bail!("sensor field unknown: pass --width and --height or configure [sensor_field]")
        }
    }
}

pub fn map(
    config: &AppConfig,
    x: f64,
    y: f64,
    width: Option<f64>,
    height: Option<f64>,
    output: Output,
) -> Result<()> {
    let field = resolve_field(config, width, height)?;
    let position = Position::new(x, y);
    let point = to_display_coords(&position, &field);

    if !point.is_within_bounds() {
        log::warn!("Position {} lies outside the sensor field", position);
    }
    output.point("map", &point)
}

pub fn zone(config: &AppConfig, id: &str, output: Output) -> Result<()> {
    let registry = config.zone_registry();
    match lookup_zone(id, &registry) {
        Some(point) => output.point(id, &point),
        None => output.no_marker(id),
    }
}

pub fn zones(config: &AppConfig, output: Output) -> Result<()> {
    let registry = config.zone_registry();
    for (id, point) in registry.iter() {
        output.point(id, &point)?;
    }
    Ok(())
}

pub fn search(config: &AppConfig, query: &str, output: Output) -> Result<()> {
    let catalog = config.catalog();
    let registry = config.zone_registry();
    let results = catalog.search(query);

    if output.json {
        let items: Vec<_> = results
            .iter()
            .map(|product| {
                let marker = catalog
                    .locate(&product.id, &registry)
                    .map(|p| json!({ "top": p.top_css(), "left": p.left_css() }));
                json!({ "product": product, "marker": marker })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }

    println!("{} result(s) for {:?}", results.len(), query);
    for product in results {
        let location = match catalog.locate(&product.id, &registry) {
            Some(point) => point.to_string(),
            None => "no marker".to_string(),
        };
        println!(
            "  {:<20} {:<12} {:>8}  zone {:<4} {}",
            product.name, product.section, product.price, product.zone, location
        );
    }
    Ok(())
}
