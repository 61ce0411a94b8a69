/// bracket-watch logger
/// JSONL event stream: API status per page, truncation warnings, player reports

use anyhow::Result;
use chrono::Utc;
use serde::Serialize;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct EventLogger {
    log_dir: PathBuf,
}

impl EventLogger {
    pub fn new(log_dir: impl Into<PathBuf>) -> Self {
        let dir = log_dir.into();
        fs::create_dir_all(&dir).ok();
        Self { log_dir: dir }
    }

    pub fn log<T: Serialize>(&self, event: &T) -> Result<()> {
        let date  = Utc::now().format("%Y-%m-%d").to_string();
        let path  = self.log_dir.join(format!("{date}.jsonl"));
        let line  = serde_json::to_string(event)?;
        let mut f = OpenOptions::new().create(true).append(true).open(&path)?;
        writeln!(f, "{line}")?;
        Ok(())
    }

    /// Same as `log`, but a failed write only shows up as a tracing warning.
    pub fn log_quiet<T: Serialize>(&self, event: &T) {
        if let Err(e) = self.log(event) {
            tracing::warn!("event log write failed in {:?}: {}", self.log_dir, e);
        }
    }
}

pub fn now_iso() -> String {
    Utc::now().to_rfc3339()
}

// ── Event types ──────────────────────────────────────────────────────────────

#[derive(Serialize, Debug)]
pub struct ApiStatusEvent {
    pub ts:           String,
    pub event:        &'static str,   // "API_STATUS"
    pub query:        String,
    pub page:         u32,
    pub ok:           bool,
    pub attempts:     u32,
    pub message:      String,
}

#[derive(Serialize, Debug)]
pub struct PageTruncatedEvent {
    pub ts:           String,
    pub event:        &'static str,   // "PAGE_TRUNCATED"
    pub query:        String,
    pub page:         u32,
    pub attempts:     u32,
    pub items_so_far: usize,
}

#[derive(Serialize, Debug)]
pub struct PlayerProgressEvent {
    pub ts:             String,
    pub event:          &'static str, // "PLAYER_PROGRESS"
    pub player:         String,
    pub entrant_id:     i64,
    pub loss_count:     usize,
    pub is_eliminated:  bool,
    pub next_match:     Option<String>,
    pub final_standing: Option<i64>,
}

#[derive(Serialize, Debug)]
pub struct PlayerStatusEvent {
    pub ts:          String,
    pub event:       &'static str,    // "PLAYER_STATUS"
    pub player:      String,
    pub state:       String,
    pub bracket:     String,
    pub placement:   Option<i64>,
    pub last_result: String,
}
