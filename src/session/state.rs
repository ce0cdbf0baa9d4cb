use std::collections::{BTreeMap, BTreeSet};
use std::time::Instant;

use chrono::Utc;
use rand::Rng;
use rand::rngs::SmallRng;

use crate::content::{Level, WordId, WordRecord};
use crate::error::CoreError;
use crate::random;
use crate::session::evaluate;
use crate::session::options::{self, OptionEntry, OptionSet};
use crate::session::pool::{PoolItem, QuestionPool, Scope};
use crate::session::result::{LevelDelta, SessionSummary, accuracy_pct};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionMode {
    Flashcard,
    Quiz,
    TypedExam,
    SentenceExam,
}

impl SessionMode {
    pub fn as_str(self) -> &'static str {
        match self {
            SessionMode::Flashcard => "flashcard",
            SessionMode::Quiz => "quiz",
            SessionMode::TypedExam => "typed_exam",
            SessionMode::SentenceExam => "sentence_exam",
        }
    }

    /// Backward navigation is a flashcard affordance only.
    pub fn allows_retreat(self) -> bool {
        matches!(self, SessionMode::Flashcard)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    InProgress,
    Finished,
}

/// What the current question asks of the learner.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuestionKind {
    Flashcard,
    ChooseTranslation,
    ChooseHeadword,
    TypePronunciation,
    TypeSentence,
}

/// A learner's response, shaped by the question kind.
#[derive(Clone, Debug)]
pub enum Answer {
    /// Flashcard self-assessment (the "I got it" / "I missed it" buttons).
    SelfMarked(bool),
    /// Index into the current option set.
    Choice(usize),
    /// Free-text input for typed questions.
    Text(String),
}

#[derive(Clone, Debug)]
pub enum Advance {
    Next,
    Finished(SessionSummary),
}

/// View of the session state emitted to the presentation layer after
/// every transition. The UI renders it; it never mutates the session.
#[derive(Clone, Debug)]
pub struct Snapshot {
    pub mode: SessionMode,
    pub phase: Phase,
    pub kind: QuestionKind,
    pub item: PoolItem,
    pub options: Option<Vec<OptionEntry>>,
    pub position: usize,
    pub total: usize,
    pub correct_count: u32,
    pub incorrect_count: u32,
    pub answered: bool,
}

/// One drill run: traversal position, score counters, the answer-once
/// latch, and the options for the question in view. Exactly one session
/// is live at a time; its owner replaces it to start another.
pub struct Session {
    mode: SessionMode,
    scope: Scope,
    pool: QuestionPool,
    position: usize,
    correct_count: u32,
    incorrect_count: u32,
    answered: bool,
    phase: Phase,
    kind: QuestionKind,
    options: Option<OptionSet>,
    learned: BTreeSet<WordId>,
    level_tally: BTreeMap<Level, LevelDelta>,
    option_count: usize,
    strict_pronunciation: bool,
    started_at: Instant,
    rng: SmallRng,
}

impl Session {
    pub fn start(
        mode: SessionMode,
        scope: Scope,
        pool: QuestionPool,
        option_count: usize,
        strict_pronunciation: bool,
        rng: SmallRng,
    ) -> Result<Self, CoreError> {
        if pool.is_empty() {
            return Err(CoreError::EmptyPool);
        }
        let mut session = Self {
            mode,
            scope,
            pool,
            position: 0,
            correct_count: 0,
            incorrect_count: 0,
            answered: false,
            phase: Phase::InProgress,
            kind: QuestionKind::Flashcard,
            options: None,
            learned: BTreeSet::new(),
            level_tally: BTreeMap::new(),
            option_count,
            strict_pronunciation,
            started_at: Instant::now(),
            rng,
        };
        session.prepare_question()?;
        Ok(session)
    }

    pub fn mode(&self) -> SessionMode {
        self.mode
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn answered(&self) -> bool {
        self.answered
    }

    /// Decide the question kind for the item in view and build its
    /// option set when it needs one.
    fn prepare_question(&mut self) -> Result<(), CoreError> {
        self.kind = match (self.mode, self.pool.item_at(self.position)) {
            (SessionMode::Flashcard, _) => QuestionKind::Flashcard,
            (SessionMode::Quiz, PoolItem::Word { .. }) => {
                // Both directions share the option builder; pick one per
                // question.
                if self.rng.gen_bool(0.5) {
                    QuestionKind::ChooseTranslation
                } else {
                    QuestionKind::ChooseHeadword
                }
            }
            (SessionMode::TypedExam, PoolItem::Word { .. }) => QuestionKind::TypePronunciation,
            (_, PoolItem::Sentence { .. }) => QuestionKind::TypeSentence,
            (SessionMode::SentenceExam, PoolItem::Word { .. }) => QuestionKind::TypePronunciation,
        };

        self.options = None;
        let field = match self.kind {
            QuestionKind::ChooseTranslation => translation_of as fn(&WordRecord) -> &str,
            QuestionKind::ChooseHeadword => headword_of,
            _ => return Ok(()),
        };
        if let Some((_, word)) = self.pool.item_at(self.position).word() {
            let correct = field(word);
            let candidates: Vec<&str> = self
                .pool
                .items
                .iter()
                .filter_map(|item| item.word().map(|(_, w)| field(w)))
                .collect();
            self.options = Some(options::build_options(
                correct,
                &candidates,
                self.option_count,
                &mut self.rng,
            )?);
        }
        Ok(())
    }

    /// Score the learner's response. Answer-once: a latched question
    /// returns `Ok(None)` and counters stay untouched. Scoring leaves the
    /// position alone so the UI can show feedback before advancing.
    pub fn submit_answer(&mut self, answer: &Answer) -> Result<Option<bool>, CoreError> {
        if self.phase == Phase::Finished {
            return Err(CoreError::SessionClosed);
        }
        if self.answered {
            return Ok(None);
        }

        let correct = self.evaluate(answer);
        if correct {
            self.correct_count += 1;
        } else {
            self.incorrect_count += 1;
        }

        if let PoolItem::Word { level, word } = self.pool.item_at(self.position) {
            let delta = self.level_tally.entry(*level).or_default();
            if correct {
                delta.correct += 1;
                self.learned.insert(WordId {
                    level: *level,
                    id: word.id,
                });
            } else {
                delta.incorrect += 1;
            }
        }

        self.answered = true;
        Ok(Some(correct))
    }

    fn evaluate(&self, answer: &Answer) -> bool {
        match (self.kind, answer) {
            (QuestionKind::Flashcard, Answer::SelfMarked(correct)) => *correct,
            (QuestionKind::ChooseTranslation | QuestionKind::ChooseHeadword, Answer::Choice(i)) => {
                self.options.as_ref().is_some_and(|o| *i == o.correct_index)
            }
            (QuestionKind::TypePronunciation, Answer::Text(text)) => {
                match self.pool.item_at(self.position) {
                    PoolItem::Word { word, .. } => evaluate::matches_pronunciation(
                        text,
                        &word.pronunciation,
                        self.strict_pronunciation,
                    ),
                    PoolItem::Sentence { .. } => false,
                }
            }
            (QuestionKind::TypeSentence, Answer::Text(text)) => {
                match self.pool.item_at(self.position) {
                    PoolItem::Sentence { template, .. } => {
                        evaluate::matches_sentence(text, &template.accepted)
                    }
                    PoolItem::Word { .. } => false,
                }
            }
            // A response of the wrong shape scores as incorrect; the
            // evaluator stays total.
            _ => false,
        }
    }

    /// Move to the next question, or finish from the last position.
    pub fn advance(&mut self) -> Result<Advance, CoreError> {
        if self.phase == Phase::Finished {
            return Err(CoreError::SessionClosed);
        }
        if self.position == self.pool.len() - 1 {
            self.phase = Phase::Finished;
            return Ok(Advance::Finished(self.summary()));
        }
        self.position += 1;
        self.answered = false;
        self.prepare_question()?;
        Ok(Advance::Next)
    }

    /// Step back one card. Flashcard-only; leaves counters and the
    /// answered latch untouched. No-op everywhere else.
    pub fn retreat(&mut self) {
        if self.phase == Phase::Finished || !self.mode.allows_retreat() {
            return;
        }
        if self.position > 0 {
            self.position -= 1;
        }
    }

    /// Re-randomize the cards not yet reached, keeping the visited
    /// prefix and the current position intact. Flashcard-only.
    pub fn reshuffle_remaining(&mut self) {
        if self.phase == Phase::Finished || self.mode != SessionMode::Flashcard {
            return;
        }
        let start = self.position + 1;
        if start < self.pool.order.len() {
            random::shuffle(&mut self.pool.order[start..], &mut self.rng);
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            mode: self.mode,
            phase: self.phase,
            kind: self.kind,
            item: self.pool.item_at(self.position).clone(),
            options: self.options.as_ref().map(|o| o.entries.clone()),
            position: self.position,
            total: self.pool.len(),
            correct_count: self.correct_count,
            incorrect_count: self.incorrect_count,
            answered: self.answered,
        }
    }

    fn summary(&self) -> SessionSummary {
        SessionSummary {
            mode: self.mode,
            scope: self.scope,
            correct: self.correct_count,
            incorrect: self.incorrect_count,
            total_questions: self.pool.len(),
            accuracy: accuracy_pct(self.correct_count, self.incorrect_count),
            elapsed_secs: self.started_at.elapsed().as_secs_f64(),
            level_breakdown: self.level_tally.clone(),
            learned: self.learned.clone(),
            timestamp: Utc::now(),
        }
    }
}

fn headword_of(word: &WordRecord) -> &str {
    &word.headword
}

fn translation_of(word: &WordRecord) -> &str {
    &word.translation
}
