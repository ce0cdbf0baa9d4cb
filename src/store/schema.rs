use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::stats::profile::StatsProfile;

pub const EXPORT_VERSION: u32 = 1;

/// Progress-export payload: the whole profile wrapped with a version
/// stamp. Imports reject any other version rather than guessing.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExportData {
    pub hskdr_export_version: u32,
    pub exported_at: DateTime<Utc>,
    pub profile: StatsProfile,
}
