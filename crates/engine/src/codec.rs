//! JSON form of saved games.

use crate::core::GameSnapshot;
use crate::store::StoreError;

/// Serialize a snapshot to compact JSON
pub fn encode_snapshot(snapshot: &GameSnapshot) -> Result<String, StoreError> {
    serde_json::to_string(snapshot).map_err(|e| StoreError::Encode(e.to_string()))
}

/// Parse and validate a saved snapshot
///
/// Anything unreadable or invalid counts as "no save".
pub fn decode_snapshot(data: &str) -> Option<GameSnapshot> {
    let snapshot: GameSnapshot = serde_json::from_str(data).ok()?;
    snapshot.validate().ok()?;
    Some(snapshot)
}
