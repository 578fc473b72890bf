//! Persisted form of the history.

use std::collections::BTreeMap;
use std::sync::Arc;

use crawl_core::state::tagged;
use serde::{Deserialize, Serialize};

use super::{RepositoryError, Result};
use crate::history::{Commit, CommitId};

/// Bumped whenever the document layout changes incompatibly.
pub const SAVE_FORMAT_VERSION: u32 = 1;

/// Every commit, every branch and the active branch name.
///
/// Map-valued fields, including those nested inside the world snapshots, use
/// the `{ "kind": "map" | "set", "entries": [...] }` encoding. Commits are
/// immutable, so a document shares them with the history it came from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveDocument {
    pub version: u32,
    #[serde(with = "tagged::map")]
    pub commits: BTreeMap<CommitId, Arc<Commit>>,
    #[serde(with = "tagged::map")]
    pub branches: BTreeMap<String, CommitId>,
    pub active_branch: String,
}

impl SaveDocument {
    pub fn to_json(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| RepositoryError::Json(e.to_string()))
    }

    /// Parses a document and checks its format version.
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        let document: Self =
            serde_json::from_slice(bytes).map_err(|e| RepositoryError::Json(e.to_string()))?;
        if document.version != SAVE_FORMAT_VERSION {
            return Err(RepositoryError::UnsupportedVersion {
                found: document.version,
                expected: SAVE_FORMAT_VERSION,
            });
        }
        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use crawl_core::GameState;
    use crawl_core::state::{EquipmentSlot, Item, Position};

    use super::*;
    use crate::history::History;

    fn sample() -> SaveDocument {
        let mut state = GameState::new(3, 10);
        state.explored.insert(Position::new(2, 3));
        History::new(&state).unwrap().to_document()
    }

    #[test]
    fn maps_and_sets_are_tagged() {
        let json: serde_json::Value = serde_json::from_slice(&sample().to_json().unwrap()).unwrap();

        assert_eq!(json["commits"]["kind"], "map");
        assert_eq!(json["branches"]["kind"], "map");
        assert_eq!(json["branches"]["entries"][0][0], "main");

        let state = &json["commits"]["entries"][0][1]["state"];
        assert_eq!(state["explored"]["kind"], "set");
        assert_eq!(state["explored"]["entries"][0]["x"], 2);
        assert_eq!(state["map_cache"]["kind"], "map");
    }

    #[test]
    fn equipment_keyed_by_slot_survives_json() {
        let mut state = GameState::new(3, 10);
        let mut hero = crawl_core::Actor::new(
            crawl_core::EntityId::PLAYER,
            "Hero",
            '@',
            Position::ORIGIN,
            10,
            1,
            1,
        );
        hero.is_player = true;
        hero.equipment.insert(
            EquipmentSlot::Armor,
            Item {
                id: crawl_core::EntityId(4),
                key: "leather_armor".into(),
                name: "leather armor".into(),
                unidentified_name: None,
                identified: true,
                glyph: '[',
                position: Position::ORIGIN,
                effects: Vec::new(),
                equipment: None,
            },
        );
        state.actors.push(hero);
        let document = History::new(&state).unwrap().to_document();

        let back = SaveDocument::from_json(&document.to_json().unwrap()).unwrap();
        assert_eq!(back, document);
    }

    #[test]
    fn rejects_other_versions() {
        let mut document = sample();
        document.version = SAVE_FORMAT_VERSION + 1;
        let bytes = document.to_json().unwrap();
        assert!(matches!(
            SaveDocument::from_json(&bytes),
            Err(RepositoryError::UnsupportedVersion { .. })
        ));
    }

    #[test]
    fn rejects_untagged_maps() {
        let bytes = br#"{"version":1,"commits":[],"branches":{"kind":"map","entries":[]},"active_branch":"main"}"#;
        assert!(matches!(
            SaveDocument::from_json(bytes),
            Err(RepositoryError::Json(_))
        ));
    }
}
