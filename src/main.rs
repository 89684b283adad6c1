mod catalog;
mod engine;
mod pool;
mod rotation;
mod scheduling;
mod settings;
mod types;

use std::time::Duration;

use anyhow::Result;
use chrono::Local;
use clap::Parser;
use dotenvy::dotenv;
use tokio::sync::broadcast;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::engine::rotation_engine::RotationEngine;
use crate::pool::entry::WeightedEntry;
use crate::pool::weighted_pool::WeightedPool;
use crate::rotation::daily::daily_quote;
use crate::rotation::history::RotationHistory;
use crate::scheduling::ScheduleReport;
use crate::scheduling::sink::DryRunNotificationSink;
use crate::settings::store::{FileSettingsStore, SettingsStore};
use crate::types::quote::Quote;

#[derive(Debug, Clone, Parser)]
struct Args {
    /// Where notification settings are persisted
    #[arg(long, default_value = "settings.yml")]
    pub settings: String,

    /// How many rotation steps to walk after startup
    #[arg(long, default_value_t = 3)]
    pub draws: usize,

    /// Keep running, re-registering the schedule on date rollover
    #[arg(long)]
    pub serve: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("affirm=debug".parse().unwrap()),
        )
        .with_target(false)
        .init();

    let args = Args::parse();

    let builtin = catalog::builtin_texts()?;
    let candidates: Vec<Quote> = builtin.iter().map(Quote::builtin).collect();

    let mut pool = WeightedPool::new();
    pool.add_all(builtin.iter().map(WeightedEntry::builtin));

    let today = Local::now().date_naive();
    let seed = daily_quote(today, &candidates);
    info!(quote = %seed, "quote of the day");

    let history = RotationHistory::new(seed);

    let store = FileSettingsStore::open(&args.settings);
    let stored_settings = store.load_settings();

    let (schedule_sender, mut schedule_receiver) = broadcast::channel::<ScheduleReport>(64);
    tokio::spawn(async move {
        loop {
            match schedule_receiver.recv().await {
                Ok(report) => info!(?report),
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    warn!(lagged = n, "schedule report logger lagged; dropped messages");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    let engine = RotationEngine::spawn(
        pool,
        history,
        stored_settings,
        Box::new(store),
        Box::new(DryRunNotificationSink::new(schedule_sender)),
    );

    let times = engine.reschedule_now().await?;
    info!(count = times.len(), "registered notification schedule");

    let upcoming = engine.preview(1).await?;
    info!(quote = %upcoming, "up next");

    for _ in 0..args.draws {
        let quote = engine.move_next().await?;
        info!(quote = %quote, "rotated forward");
    }
    if let Some(quote) = engine.move_previous().await? {
        info!(quote = %quote, "rotated back");
    }

    let stats = engine.statistics().await?;
    info!(
        total = stats.total,
        builtin = stats.builtin,
        user_authored = stats.user_authored,
        "pool loaded"
    );

    if args.serve {
        let mut ticker = tokio::time::interval(Duration::from_secs(60));
        let mut last_day = today;

        loop {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    info!("shutting down");
                    break;
                }

                _ = ticker.tick() => {
                    let day = Local::now().date_naive();
                    if day != last_day {
                        last_day = day;

                        let quote = daily_quote(day, &candidates);
                        info!(quote = %quote, "new quote of the day");

                        engine.reschedule_now().await?;
                    }
                }
            }
        }
    }

    engine.shutdown().await;

    Ok(())
}
