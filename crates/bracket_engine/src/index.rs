use startgg_client::{Entrant, EntrantId};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use tracing::warn;
use unicode_normalization::UnicodeNormalization;

/// Lookup key for names and gamer tags: trimmed, NFC, lower-cased.
pub fn normalize_alias(raw: &str) -> String {
    raw.trim().nfc().collect::<String>().to_lowercase()
}

/// Two entrants claiming the same alias. The first one in input order keeps it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasCollision {
    pub alias:   String,
    pub kept:    EntrantId,
    pub ignored: EntrantId,
}

/// Alias -> entrant id for one event.
#[derive(Debug, Clone, Default)]
pub struct EntrantIndex {
    by_alias:   HashMap<String, EntrantId>,
    collisions: Vec<AliasCollision>,
}

impl EntrantIndex {
    pub fn build(entrants: &[Entrant]) -> Self {
        let mut index = Self::default();

        for entrant in entrants {
            let aliases = std::iter::once(entrant.display_name.as_str())
                .chain(entrant.gamer_tags.iter().map(String::as_str))
                .map(normalize_alias)
                .filter(|a| !a.is_empty());

            for alias in aliases {
                match index.by_alias.entry(alias) {
                    Entry::Vacant(slot) => {
                        slot.insert(entrant.id);
                    }
                    Entry::Occupied(slot) if *slot.get() != entrant.id => {
                        warn!(
                            "alias {:?} shared by entrants {} and {}; keeping {}",
                            slot.key(), slot.get(), entrant.id, slot.get()
                        );
                        index.collisions.push(AliasCollision {
                            alias:   slot.key().clone(),
                            kept:    *slot.get(),
                            ignored: entrant.id,
                        });
                    }
                    Entry::Occupied(_) => {}
                }
            }
        }

        index
    }

    pub fn lookup(&self, name: &str) -> Option<EntrantId> {
        self.by_alias.get(&normalize_alias(name)).copied()
    }

    pub fn collisions(&self) -> &[AliasCollision] {
        &self.collisions
    }

    pub fn len(&self) -> usize {
        self.by_alias.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_alias.is_empty()
    }
}
