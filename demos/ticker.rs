//! Minimal runnable demo: polls a synthetic source once a second and prints
//! the events it produces.
//!
//! Run with: cargo run --example ticker

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use poll_stream::prelude::*;

#[derive(Debug, Clone)]
struct Tick {
    label: String,
    created_utc: f64,
}

impl Timestamped for Tick {
    fn created_utc(&self) -> f64 {
        self.created_utc
    }
}

fn epoch_now() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    // Every cycle produces one item stamped at fetch time, plus one stale
    // item the stream filters out, and every fourth cycle fails.
    let stream = PollingEventStream::from_fn(
        Duration::from_secs(1),
        "ticker".to_string(),
        |label: String| async move {
            let n = epoch_now() as u64;
            if n % 4 == 0 {
                return Err(PollError::msg("simulated fetch failure"));
            }
            Ok(vec![
                Tick {
                    label: format!("{label}-{n}"),
                    created_utc: epoch_now(),
                },
                Tick {
                    label: format!("{label}-{n}-old"),
                    created_utc: epoch_now() - 3600.0,
                },
            ])
        },
    )?;

    stream.on_data(|tick| println!("data:  {} (created {})", tick.label, tick.created_utc));
    stream.on_error(|err| println!("error: {err}"));

    tokio::time::sleep(Duration::from_secs(6)).await;
    stream.stop();

    let stats = stream.stats();
    println!(
        "ran {} cycles ({} failed), interval {:?}",
        stats.cycles, stats.failed_cycles, stats.poll_interval
    );

    Ok(())
}
