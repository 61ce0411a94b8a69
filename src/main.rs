/// bracket-watch: double-elimination progress for a roster of players.
///
///   1. resolves the event slug, logs a short event summary
///   2. loads the roster CSV; unresolved ids abort the run with suggestions
///   3. per player: event sets -> progress report -> PLAYER_PROGRESS event
///   4. writes <OUTPUT_DIR>/<tournament>.csv
///
/// Usage:
///   cargo run --bin bracket-watch -- tournament/evo-2025/event/tekken-8

use anyhow::{bail, Result};
use bracket_engine::{analyze_progress, EntrantIndex};
use bracket_watch::{event_summary_lines, load_roster, tournament_slug, write_rows, AppConfig, ProgressRow};
use dotenv::dotenv;
use logger::{now_iso, EventLogger, PlayerProgressEvent};
use startgg_client::{filter_sets_by_entrant, Fetcher};
use std::env;
use std::fs::File;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"))
        )
        .init();

    let config = AppConfig::from_env()?;
    let event_slug = config.resolve_event_slug(env::args().nth(1))?;
    let tournament = tournament_slug(&event_slug);

    // Single instance lock
    let lock_file_path = env::temp_dir().join("bracket_watch.lock");
    let lock_file = match File::create(&lock_file_path) {
        Ok(f) => f,
        Err(e) => {
            warn!("Failed to create lock file at {:?}: {}", lock_file_path, e);
            return Ok(());
        }
    };

    let mut lock = fd_lock::RwLock::new(lock_file);
    let _write_guard = match lock.try_write() {
        Ok(guard) => guard,
        Err(_) => {
            warn!("Another bracket-watch run is in progress. Exiting.");
            return Ok(());
        }
    };

    let events = EventLogger::new(&config.log_dir);
    let fetcher = Fetcher::new(config.client.clone())?.with_event_log(events.clone());

    info!("=== bracket-watch: {} ===", event_slug);
    let Some(event) = fetcher.event_info(&event_slug).await else {
        bail!("event {} not found", event_slug);
    };
    info!("event id: {}", event.id);

    match fetcher.event_status(event.id).await {
        Some(status) => event_summary_lines(&status).iter().for_each(|line| info!("{}", line)),
        None => warn!("no status for event {}", event.id),
    }

    let roster = load_roster(&config.players_csv)?;
    let unresolved: Vec<_> = roster.iter().filter(|r| r.entrant_id.is_none()).collect();
    if !unresolved.is_empty() {
        let index = EntrantIndex::build(&fetcher.entrants(event.id).await);
        for row in &unresolved {
            match index.lookup(&row.name) {
                Some(id) => warn!("{}: no entrant_id, suggested {}", row.name, id),
                None => warn!("{}: no entrant_id and no entrant with that name or tag", row.name),
            }
        }
        bail!(
            "{} roster rows in {} need an entrant_id",
            unresolved.len(),
            config.players_csv.display()
        );
    }

    let mut rows = Vec::with_capacity(roster.len());
    for entry in &roster {
        let Some(entrant_id) = entry.entrant_id else { continue };

        let sets = filter_sets_by_entrant(fetcher.event_sets(event.id, entrant_id).await, entrant_id);
        let report = analyze_progress(&entry.name, entrant_id, &sets);

        info!(
            "{} ({}): {} sets, losses={}, eliminated={}",
            entry.name, entrant_id, sets.len(), report.loss_count, report.is_eliminated
        );
        if let Some(next) = &report.next_match {
            info!("  next: {}", next);
        }

        events.log_quiet(&PlayerProgressEvent {
            ts:             now_iso(),
            event:          "PLAYER_PROGRESS",
            player:         entry.name.clone(),
            entrant_id,
            loss_count:     report.loss_count,
            is_eliminated:  report.is_eliminated,
            next_match:     report.next_match.as_ref().map(ToString::to_string),
            final_standing: report.final_standing,
        });
        rows.push(ProgressRow::from(&report));
    }

    let out = config.output_dir.join(format!("{}.csv", tournament));
    write_rows(&out, &rows)?;
    info!("saved {} players to {}", rows.len(), out.display());
    Ok(())
}
