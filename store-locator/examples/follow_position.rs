//! Follow a shopper's position on the store floor-plan
//!
//! Polls a position endpoint and prints the marker position and the nearest
//! registered zone for every update.
//!
//! Usage:
//!   follow_position <url> <field_width_m> <field_height_m> [--updates <count>]
//!
//! Example:
//!   follow_position http://localhost:8000/position 10 8 --updates 20

use std::env;
use store_locator::{
    start_tracking, DisplayPoint, HttpPositionSource, SensorField, TrackerConfig, ZoneRegistry,
};
use tokio::sync::mpsc;

fn nearest_zone<'a>(registry: &'a ZoneRegistry, point: &DisplayPoint) -> Option<(&'a str, f64)> {
    registry
        .iter()
        .map(|(id, zone)| {
            let dt = zone.top - point.top;
            let dl = zone.left - point.left;
            (id, (dt * dt + dl * dl).sqrt())
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 4 {
        eprintln!("Usage: {} <url> <field_width_m> <field_height_m> [--updates <count>]", args[0]);
        std::process::exit(1);
    }

    let url = &args[1];
    let width: f64 = args[2].parse()?;
    let height: f64 = args[3].parse()?;
    let mut max_updates = 10usize;

    let mut i = 4;
    while i < args.len() {
        if args[i] == "--updates" && i + 1 < args.len() {
            max_updates = args[i + 1].parse()?;
            i += 2;
        } else {
            eprintln!("Unknown argument: {}", args[i]);
            i += 1;
        }
    }

    let config = TrackerConfig::new().with_position_url(url.as_str());
    let field = SensorField::new(width, height)?;
    let source = HttpPositionSource::new(&config)?;
    let registry = ZoneRegistry::store_layout();

    let (tx, mut rx) = mpsc::unbounded_channel();
    let handle = start_tracking(source, field, &config, move |point| {
        let _ = tx.send(point);
    })?;

    let mut seen = 0;
    while let Some(point) = rx.recv().await {
        seen += 1;
        match nearest_zone(&registry, &point) {
            Some((zone, distance)) => {
                println!("[{:>3}] {}  (near {} at {:.1}%)", seen, point, zone, distance)
            }
            None => println!("[{:>3}] {}", seen, point),
        }
        if seen >= max_updates {
            break;
        }
    }

    handle.stop();

    let state = handle.state();
    println!(
        "\n{} ticks, {} updates, {} failed fetches",
        state.ticks, state.updates, state.failures
    );
    Ok(())
}
