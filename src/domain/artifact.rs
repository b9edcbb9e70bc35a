//! Artifacts written by the engine and read back by the renderer.
//!
//! Artifacts are JSON files placed in the run's artifact directory when a
//! structured task completes.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Venue recommendation produced by the venue task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VenueDetails {
    pub name: String,
    pub address: String,
    pub capacity: u64,
    pub booking_status: String,
}

/// Marketing plan produced by the marketing task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketingReport {
    pub summary: String,
    pub campaigns: Vec<String>,
    pub estimated_reach: u64,
}

/// The artifacts a planning run is expected to leave behind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    Venue,
    Marketing,
}

impl ArtifactKind {
    /// All kinds, in render order
    pub const ALL: [ArtifactKind; 2] = [ArtifactKind::Venue, ArtifactKind::Marketing];

    /// File name inside the artifact directory
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::Venue => "venue_details.json",
            Self::Marketing => "marketing_report.json",
        }
    }

    /// Look up a kind by its file name
    pub fn from_file_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.file_name() == name)
    }

    /// Full path of this artifact under `dir`
    pub fn path_in(&self, dir: &Path) -> PathBuf {
        dir.join(self.file_name())
    }
}
