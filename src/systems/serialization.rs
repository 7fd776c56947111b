//! Serialization utilities for simulation state.

use crate::config::SimConfig;
use crate::tiles::LevelGrid;
use crate::world::Snapshot;

/// Serialize a snapshot to JSON bytes.
pub fn snapshot_to_json(snapshot: &Snapshot) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec(snapshot)
}

/// Deserialize a snapshot from JSON bytes.
pub fn snapshot_from_json(data: &[u8]) -> Result<Snapshot, serde_json::Error> {
    serde_json::from_slice(data)
}

/// Parse a level grid from JSON, an array of rows of tile codes.
pub fn level_from_json(data: &str) -> Result<LevelGrid, serde_json::Error> {
    serde_json::from_str(data)
}

/// Parse a configuration from JSON. Missing fields keep their defaults.
pub fn config_from_json(data: &str) -> Result<SimConfig, serde_json::Error> {
    serde_json::from_str(data)
}
