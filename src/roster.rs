use anyhow::{Context, Result};
use serde::Deserialize;
use startgg_client::EntrantId;
use std::io::Read;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct RosterRecord {
    player: String,
    #[serde(default)]
    entrant_id: Option<String>,
}

/// One row of `players.csv`. `entrant_id == None` means it still has to be looked up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterEntry {
    pub name:       String,
    pub entrant_id: Option<EntrantId>,
}

pub fn load_roster(path: &Path) -> Result<Vec<RosterEntry>> {
    let file = std::fs::File::open(path).with_context(|| format!("open roster {}", path.display()))?;
    read_roster(file).with_context(|| format!("read roster {}", path.display()))
}

/// Columns `player,entrant_id`. Names are trimmed and lower-cased; blank, zero or
/// negative ids count as unresolved.
pub fn read_roster<R: Read>(reader: R) -> Result<Vec<RosterEntry>> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut out = Vec::new();

    for (line, record) in rdr.deserialize::<RosterRecord>().enumerate() {
        let record = record.with_context(|| format!("roster row {}", line + 2))?;
        let name = record.player.trim().to_lowercase();
        if name.is_empty() {
            continue;
        }
        out.push(RosterEntry { name, entrant_id: parse_entrant_id(record.entrant_id.as_deref()) });
    }
    Ok(out)
}

fn parse_entrant_id(raw: Option<&str>) -> Option<EntrantId> {
    let raw = raw?.trim();
    // spreadsheets like to save ids as floats
    let id = raw.parse::<i64>().ok().or_else(|| {
        raw.parse::<f64>().ok().filter(|f| f.fract() == 0.0).map(|f| f as i64)
    })?;
    (id > 0).then_some(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolved_and_unresolved_rows() {
        let csv = "player,entrant_id\n  Arslan Ash ,19859160\nKnee,0\nChikurin,\nUlsan,-1\nJDCR,19859161.0\n";
        let roster = read_roster(csv.as_bytes()).unwrap();

        assert_eq!(roster, vec![
            RosterEntry { name: "arslan ash".into(), entrant_id: Some(19859160) },
            RosterEntry { name: "knee".into(), entrant_id: None },
            RosterEntry { name: "chikurin".into(), entrant_id: None },
            RosterEntry { name: "ulsan".into(), entrant_id: None },
            RosterEntry { name: "jdcr".into(), entrant_id: Some(19859161) },
        ]);
    }

    #[test]
    fn missing_id_column_means_all_unresolved() {
        let roster = read_roster("player\nKnee\n\n".as_bytes()).unwrap();
        assert_eq!(roster, vec![RosterEntry { name: "knee".into(), entrant_id: None }]);
    }

    #[test]
    fn missing_file_is_an_error_with_path() {
        let err = load_roster(Path::new("does/not/exist.csv")).unwrap_err();
        assert!(format!("{err:#}").contains("does/not/exist.csv"));
    }
}
