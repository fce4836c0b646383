// Sleeps countdown tracker
// Main entry point

use anyhow::{Context, Result};
use chrono::Local;
use tokio::runtime::Handle;

use sleeps::services::countdown::{
    seed_defaults_if_needed, CountdownList, CountdownRow, ListEvent, MidnightRefresh,
    SqliteCountdownStore,
};
use sleeps::services::database::Database;
use sleeps::services::settings::SettingsService;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting Sleeps");

    let settings_service = SettingsService::new();
    let settings = settings_service.load()?;
    let db_path = settings_service.database_path(&settings)?;
    let db = Database::open_initialized(&db_path.to_string_lossy())
        .with_context(|| format!("Failed to open countdowns at {}", db_path.display()))?;
    let mut store = SqliteCountdownStore::new(db);

    if settings.seed_defaults {
        seed_defaults_if_needed(&mut store, Local::now().date_naive(), &mut rand::thread_rng())?;
    }

    let (refresh, mut ticks) = MidnightRefresh::new(Handle::current(), settings.refresh_grace());
    let mut list = CountdownList::new(store)
        .with_policy(settings.rollover_policy)
        .with_midnight_refresh(refresh);

    if let Err(e) = list.appear() {
        log::error!("Failed to load countdowns: {e}");
    }
    render(&mut list);

    loop {
        tokio::select! {
            Some(tick) = ticks.recv() => {
                log::debug!("Midnight tick fired at {}", tick.fired_at);
                if let Err(e) = list.on_midnight_tick() {
                    log::warn!("Midnight refresh failed: {e}");
                }
                render(&mut list);
            }
            _ = tokio::signal::ctrl_c() => {
                log::info!("Shutting down");
                break;
            }
        }
    }

    list.disappear();
    Ok(())
}

fn render(list: &mut CountdownList<SqliteCountdownStore>) {
    let latest = list
        .take_events()
        .into_iter()
        .filter_map(|event| match event {
            ListEvent::Published(rows) => Some(rows),
            _ => None,
        })
        .last();

    if let Some(rows) = latest {
        for row in &rows {
            println!("{}", format_row(row));
        }
    }
}

fn format_row(row: &CountdownRow) -> String {
    let name = if row.name.is_empty() {
        "New Countdown"
    } else {
        row.name.as_str()
    };
    let days = match row.days_remaining {
        0 => "today".to_string(),
        1 => "1 sleep".to_string(),
        n => format!("{n} sleeps"),
    };
    format!(
        "{:>10}  {}  ({}, {})",
        days,
        name,
        row.repeat_label,
        row.colour.name()
    )
}
