//! Rig manifests.
//!
//! A manifest describes a whole rig as JSON, so multi-board setups can be
//! loaded from a file instead of assembled by hand:
//!
//! ```json
//! {
//!   "name": "detection walk",
//!   "boards": [
//!     { "slot": 0, "pattern": 12, "config": "num_stepgens=3" },
//!     { "pattern": 9 }
//!   ]
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Hm2TestResult;

/// One board in a rig manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardEntry {
    /// Slot to install into; first free slot when omitted
    #[serde(default)]
    pub slot: Option<usize>,
    /// Pattern selector ordinal
    pub pattern: u8,
    /// Configuration string passed through at registration
    #[serde(default)]
    pub config: Option<String>,
}

/// Rig manifest schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RigManifest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub boards: Vec<BoardEntry>,
}

/// Parse a manifest from JSON text.
pub fn parse_manifest(text: &str) -> Hm2TestResult<RigManifest> {
    Ok(serde_json::from_str(text)?)
}

/// Load a manifest from a file.
pub fn load_manifest(path: &Path) -> Hm2TestResult<RigManifest> {
    let text = std::fs::read_to_string(path)?;
    parse_manifest(&text)
}
