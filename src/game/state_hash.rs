//! Deterministic state hashing
//!
//! Fingerprints the gameplay-relevant part of a `GameState`, so two states
//! reached by different routes (materialize vs replay, live vs loaded) can
//! be compared cheaply.

use crate::game::GameState;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Fields to exclude when computing the hash
///
/// - log: display text, carries wall-clock timestamps
/// - combat_notices: delivery queue, not game rules state
const EXCLUDED_FIELDS: &[&str] = &["log", "combat_notices"];

/// Compute a deterministic hash of game state
///
/// Serializes the state to JSON, strips the excluded fields, then hashes
/// the canonical string.
pub fn compute_state_hash(game: &GameState) -> u64 {
    let json_value = match serde_json::to_value(game) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("Warning: Failed to serialize game state for hashing: {}", e);
            return 0;
        }
    };

    let cleaned = strip_metadata(json_value);

    let canonical = match serde_json::to_string(&cleaned) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Warning: Failed to canonicalize cleaned state: {}", e);
            return 0;
        }
    };

    let mut hasher = DefaultHasher::new();
    canonical.hash(&mut hasher);
    hasher.finish()
}

/// Strip excluded fields from the top-level state object
fn strip_metadata(value: serde_json::Value) -> serde_json::Value {
    match value {
        serde_json::Value::Object(mut map) => {
            for field in EXCLUDED_FIELDS {
                map.remove(*field);
            }
            serde_json::Value::Object(map)
        }
        other => other,
    }
}

/// Format a hash for display (first 8 hex digits)
pub fn format_hash(hash: u64) -> String {
    format!("{:08x}", (hash >> 32) as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PlayerId;
    use crate::game::LogLine;

    fn table() -> GameState {
        GameState::new(vec![PlayerId::new("alice"), PlayerId::new("bob")], 50)
    }

    #[test]
    fn test_strip_metadata() {
        let json = serde_json::json!({
            "active_index": 1,
            "log": [{"timestamp": 3, "message": "x"}],
            "players": {"alice": {"authority": 50}}
        });

        assert_eq!(
            strip_metadata(json),
            serde_json::json!({
                "active_index": 1,
                "players": {"alice": {"authority": 50}}
            })
        );
    }

    #[test]
    fn test_log_does_not_affect_hash() {
        let a = table();
        let mut b = table();
        b.log.push(LogLine {
            timestamp: 12345,
            message: "hello".to_string(),
        });
        assert_eq!(compute_state_hash(&a), compute_state_hash(&b));
    }

    #[test]
    fn test_gameplay_change_affects_hash() {
        let a = table();
        let mut b = table();
        b.player_mut(&PlayerId::new("bob")).unwrap().authority = 49;
        assert_ne!(compute_state_hash(&a), compute_state_hash(&b));
    }

    #[test]
    fn test_format_hash() {
        assert_eq!(format_hash(0xdead_beef_0000_0000), "deadbeef");
    }
}
