use anyhow::{Result, bail};
use chrono::Utc;
use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::config::Config;
use crate::content::{Catalog, Difficulty, Level, WordId, WordRecord};
use crate::error::CoreError;
use crate::session::pool::{self, Scope};
use crate::session::result::SessionSummary;
use crate::session::state::{Advance, Answer, Session, SessionMode, Snapshot};
use crate::stats::profile::StatsProfile;
use crate::store::json_store::JsonStore;
use crate::store::schema::{EXPORT_VERSION, ExportData};

/// Outcome of advancing the live session.
pub enum AppAdvance {
    Next(Snapshot),
    Finished {
        summary: SessionSummary,
        unlocked: Vec<String>,
    },
}

/// Orchestrator for one signed-in user: owns the catalog, the loaded
/// profile, and at most one live session. Starting any drill replaces
/// whatever session was running; its tally is lost, which is the
/// abandon-by-navigation contract.
pub struct App {
    pub config: Config,
    pub catalog: Catalog,
    pub profile: StatsProfile,
    user: String,
    store: Option<JsonStore>,
    session: Option<Session>,
    rng: SmallRng,
}

impl App {
    pub fn new(user: &str) -> Result<Self> {
        Self::with_store(user, JsonStore::new().ok())
    }

    /// Build against an explicit store (or none, for a purely in-memory
    /// run). A missing, corrupt, or stale-schema profile becomes a fresh
    /// one; loading never fails.
    pub fn with_store(user: &str, store: Option<JsonStore>) -> Result<Self> {
        let mut config = Config::load().unwrap_or_default();
        config.validate();
        let catalog = Catalog::load()?;
        let profile = match store.as_ref().and_then(|s| s.load_profile(user)) {
            Some(profile) if !profile.needs_reset() => profile,
            _ => StatsProfile::default(),
        };

        Ok(Self {
            config,
            catalog,
            profile,
            user: user.to_string(),
            store,
            session: None,
            rng: SmallRng::from_entropy(),
        })
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn has_session(&self) -> bool {
        self.session.is_some()
    }

    pub fn start_flashcards(&mut self, level: Level) -> Result<Snapshot, CoreError> {
        self.start_session(SessionMode::Flashcard, Scope::Level(level))
    }

    pub fn start_quiz(&mut self, scope: Scope) -> Result<Snapshot, CoreError> {
        self.start_session(SessionMode::Quiz, scope)
    }

    pub fn start_typed_exam(&mut self, scope: Scope) -> Result<Snapshot, CoreError> {
        self.start_session(SessionMode::TypedExam, scope)
    }

    pub fn start_sentence_exam(&mut self, difficulty: Difficulty) -> Result<Snapshot, CoreError> {
        self.start_session(SessionMode::SentenceExam, Scope::Difficulty(difficulty))
    }

    fn start_session(&mut self, mode: SessionMode, scope: Scope) -> Result<Snapshot, CoreError> {
        let mut rng = SmallRng::from_rng(&mut self.rng).unwrap();
        let pool = pool::build_pool(&self.catalog, scope, &mut rng)?;
        let session = Session::start(
            mode,
            scope,
            pool,
            self.config.option_count,
            self.config.strict_pronunciation,
            rng,
        )?;
        let snapshot = session.snapshot();
        // Drops any session that was still running.
        self.session = Some(session);
        Ok(snapshot)
    }

    pub fn submit_answer(&mut self, answer: &Answer) -> Result<Option<bool>, CoreError> {
        self.session
            .as_mut()
            .ok_or(CoreError::SessionClosed)?
            .submit_answer(answer)
    }

    /// Advance the live session. On finish the summary is folded into
    /// the profile and persisted before it is returned; a failed save is
    /// logged, never allowed to roll back the in-memory counters.
    pub fn advance(&mut self) -> Result<AppAdvance, CoreError> {
        let session = self.session.as_mut().ok_or(CoreError::SessionClosed)?;
        match session.advance()? {
            Advance::Next => Ok(AppAdvance::Next(session.snapshot())),
            Advance::Finished(summary) => {
                self.session = None;
                let unlocked = self.profile.record_session(&summary);
                self.refresh_completed_levels(&summary);
                self.save_profile();
                Ok(AppAdvance::Finished { summary, unlocked })
            }
        }
    }

    pub fn retreat(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.retreat();
        }
    }

    pub fn reshuffle_remaining(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.reshuffle_remaining();
        }
    }

    pub fn snapshot(&self) -> Option<Snapshot> {
        self.session.as_ref().map(Session::snapshot)
    }

    /// Drop the live session without recording anything.
    pub fn abandon_session(&mut self) {
        self.session = None;
    }

    pub fn word_of_the_day(&self) -> Option<(Level, &WordRecord)> {
        self.catalog.word_of_the_day(Utc::now().date_naive())
    }

    pub fn reset_progress(&mut self) -> Result<()> {
        self.profile = StatsProfile::default();
        if let Some(ref store) = self.store {
            store.delete_profile(&self.user)?;
        }
        Ok(())
    }

    pub fn export_progress(&self) -> ExportData {
        ExportData {
            hskdr_export_version: EXPORT_VERSION,
            exported_at: Utc::now(),
            profile: self.profile.clone(),
        }
    }

    pub fn import_progress(&mut self, data: &ExportData) -> Result<()> {
        if data.hskdr_export_version != EXPORT_VERSION {
            bail!(
                "Unsupported export version: {} (expected {})",
                data.hskdr_export_version,
                EXPORT_VERSION
            );
        }
        let mut profile = data.profile.clone();
        if profile.needs_reset() {
            bail!(
                "Unsupported profile schema version: {}",
                profile.schema_version
            );
        }
        profile.backfill_levels();
        if let Some(ref store) = self.store {
            store.save_profile(&self.user, &profile)?;
        }
        self.profile = profile;
        Ok(())
    }

    /// A level is completed once every one of its words has been
    /// answered correctly at least once.
    fn refresh_completed_levels(&mut self, summary: &SessionSummary) {
        for level in summary.level_breakdown.keys() {
            let all_learned = self.catalog.words(*level).iter().all(|word| {
                self.profile.words_learned.contains(&WordId {
                    level: *level,
                    id: word.id,
                })
            });
            if all_learned {
                self.profile.mark_level_completed(*level);
            }
        }
    }

    fn save_profile(&self) {
        if let Some(ref store) = self.store
            && let Err(e) = store.save_profile(&self.user, &self.profile)
        {
            log::warn!("failed to save profile for {}: {e:#}", self.user);
        }
    }
}
