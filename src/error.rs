use thiserror::Error;

/// Failures the drill core can surface to its caller. Store I/O is not
/// represented here; persistence errors never enter the scoring path.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// A session start was requested over a scope with zero items.
    #[error("question pool is empty")]
    EmptyPool,

    /// Multiple-choice options were requested over a candidate universe
    /// with fewer distinct values than options needed.
    #[error("not enough distinct candidates for {needed} options (have {distinct})")]
    InsufficientCandidates { needed: usize, distinct: usize },

    /// An operation was attempted on a finished (or missing) session.
    #[error("session is closed")]
    SessionClosed,
}
