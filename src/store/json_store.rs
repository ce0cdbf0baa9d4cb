use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use chrono::Utc;
use serde::Serialize;

use crate::stats::profile::StatsProfile;
use crate::store::schema::{EXPORT_VERSION, ExportData};

/// Per-user JSON persistence under one base directory. Every profile
/// lives in its own file, so no user ever reads another user's data.
pub struct JsonStore {
    base_dir: PathBuf,
}

impl JsonStore {
    pub fn new() -> Result<Self> {
        let base_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("hskdr");
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    pub fn with_base_dir(base_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    fn profile_path(&self, user: &str) -> PathBuf {
        self.base_dir
            .join(format!("profile-{}.json", sanitize_user(user)))
    }

    fn save<T: Serialize>(&self, path: &Path, data: &T) -> Result<()> {
        let tmp_path = path.with_extension("tmp");

        let json = serde_json::to_string_pretty(data)?;
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;

        fs::rename(&tmp_path, path)?;
        Ok(())
    }

    /// Load one user's profile. A missing file is a fresh start; a file
    /// that exists but cannot be parsed yields `None` so the caller can
    /// reset. Loaded profiles always carry every level entry.
    pub fn load_profile(&self, user: &str) -> Option<StatsProfile> {
        let path = self.profile_path(user);
        let mut profile = if path.exists() {
            let content = fs::read_to_string(&path).ok()?;
            serde_json::from_str::<StatsProfile>(&content).ok()?
        } else {
            StatsProfile::default()
        };
        profile.backfill_levels();
        Some(profile)
    }

    pub fn save_profile(&self, user: &str, profile: &StatsProfile) -> Result<()> {
        self.save(&self.profile_path(user), profile)
    }

    pub fn delete_profile(&self, user: &str) -> Result<()> {
        let path = self.profile_path(user);
        if path.exists() {
            fs::remove_file(&path)?;
        }
        Ok(())
    }

    /// Bundle one user's profile into a versioned export payload.
    pub fn export_profile(&self, user: &str) -> ExportData {
        ExportData {
            hskdr_export_version: EXPORT_VERSION,
            exported_at: Utc::now(),
            profile: self.load_profile(user).unwrap_or_default(),
        }
    }

    pub fn import_profile(&self, user: &str, data: &ExportData) -> Result<()> {
        if data.hskdr_export_version != EXPORT_VERSION {
            bail!(
                "Unsupported export version: {} (expected {})",
                data.hskdr_export_version,
                EXPORT_VERSION
            );
        }
        let mut profile = data.profile.clone();
        if profile.needs_reset() {
            bail!("Unsupported profile schema version: {}", profile.schema_version);
        }
        profile.backfill_levels();
        self.save_profile(user, &profile)
    }
}

/// Usernames become file names; anything outside `[A-Za-z0-9_-]` is
/// replaced so a name can never escape the base directory.
fn sanitize_user(user: &str) -> String {
    let cleaned: String = user
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "anonymous".to_string()
    } else {
        cleaned
    }
}
