/// entrant-export: every entrant of an event as `team,name,gamer_tag` rows.
/// Handy for filling in `entrant_id`s in the roster.

use anyhow::{bail, Result};
use bracket_watch::{entrant_rows, tournament_slug, write_rows, AppConfig};
use dotenv::dotenv;
use logger::EventLogger;
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
    let fetcher = Fetcher::new(config.client.clone())?.with_event_log(EventLogger::new(&config.log_dir));

    let Some(event) = fetcher.event_info(&event_slug).await else {
        bail!("event {} not found", event_slug);
    };
    info!("event id: {}", event.id);

    let entrants = fetcher.entrants(event.id).await;
    let rows = entrant_rows(&entrants);

    let out = config.output_dir.join(format!("{}-entrants.csv", tournament_slug(&event_slug)));
    write_rows(&out, &rows)?;
    info!("{} entrants, {} participant rows saved to {}", entrants.len(), rows.len(), out.display());
    Ok(())
}
