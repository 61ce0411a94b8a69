/// player-status: latest-set status for every roster name.
///
/// Names are matched against entrant names and gamer tags, so `entrant_id` may be blank.
/// Writes <OUTPUT_DIR>/<tournament>-status.csv.

use anyhow::{bail, Result};
use bracket_engine::analyze_status;
use bracket_watch::{load_roster, tournament_slug, write_rows, AppConfig, StatusRow};
use dotenv::dotenv;
use logger::{now_iso, EventLogger, PlayerStatusEvent};
use startgg_client::Fetcher;
use std::env;
use tracing::info;
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

    let events = EventLogger::new(&config.log_dir);
    let fetcher = Fetcher::new(config.client.clone())?.with_event_log(events.clone());

    let Some(event) = fetcher.event_info(&event_slug).await else {
        bail!("event {} not found", event_slug);
    };
    info!("{} (id {})", event.name, event.id);

    let entrants = fetcher.entrants(event.id).await;
    let standings = fetcher.standings(event.id).await;
    info!("{} entrants, {} standings", entrants.len(), standings.len());

    let roster = load_roster(&config.players_csv)?;
    let mut rows = Vec::with_capacity(roster.len());
    for entry in &roster {
        let report = analyze_status(&entry.name, &entrants, &standings, &fetcher).await;
        info!(
            "{}: {} {} {}",
            report.player_name, report.state, report.bracket, report.last_match_result
        );

        events.log_quiet(&PlayerStatusEvent {
            ts:          now_iso(),
            event:       "PLAYER_STATUS",
            player:      report.player_name.clone(),
            state:       report.state.to_string(),
            bracket:     report.bracket.clone(),
            placement:   report.placement,
            last_result: report.last_match_result.clone(),
        });
        rows.push(StatusRow::from(&report));
    }

    let out = config.output_dir.join(format!("{}-status.csv", tournament_slug(&event_slug)));
    write_rows(&out, &rows)?;
    info!("saved {}", out.display());
    Ok(())
}
