//! Per-process run state and the report returned by the entry point.

use std::fmt;
use std::os::fd::RawFd;

/// Where a run of the shim has got to.
///
/// ```text
/// Start -> Resolved -> Substituted ---------> Scrubbed -> PreloadRewritten -> Purged -> Done
///                   \-> SubstitutionSkipped -/
/// ```
///
/// Any phase may move to `Terminated`; nothing leaves `Terminated` or `Done`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Start,
    Resolved,
    Substituted,
    SubstitutionSkipped,
    Scrubbed,
    PreloadRewritten,
    Purged,
    Done,
    Terminated,
}

impl Phase {
    #[must_use]
    pub const fn can_advance_to(self, next: Phase) -> bool {
        use Phase::*;
        matches!(
            (self, next),
            (Start, Resolved)
                | (Resolved, Substituted)
                | (Resolved, SubstitutionSkipped)
                | (Substituted, Scrubbed)
                | (SubstitutionSkipped, Scrubbed)
                | (Scrubbed, PreloadRewritten)
                | (PreloadRewritten, Purged)
                | (Purged, Done)
        ) || (matches!(next, Terminated) && !matches!(self, Done | Terminated))
    }

    /// Move to `next`, or `None` if the transition is not allowed.
    #[must_use]
    pub fn advance(self, next: Phase) -> Option<Phase> {
        self.can_advance_to(next).then_some(next)
    }

    #[must_use]
    pub const fn is_final(self) -> bool {
        matches!(self, Phase::Done | Phase::Terminated)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Phase::Start => "start",
            Phase::Resolved => "resolved",
            Phase::Substituted => "substituted",
            Phase::SubstitutionSkipped => "substitution-skipped",
            Phase::Scrubbed => "scrubbed",
            Phase::PreloadRewritten => "preload-rewritten",
            Phase::Purged => "purged",
            Phase::Done => "done",
            Phase::Terminated => "terminated",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What happened to `LD_PRELOAD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PreloadOutcome {
    /// No self-name control variable, so nothing could match.
    #[default]
    NotRequested,
    /// Self-name given but `LD_PRELOAD` is not set.
    Absent,
    Unchanged,
    Removed,
    Rewritten,
}

/// Summary of one completed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Report {
    pub phase: Phase,
    /// argv slot that now holds the secret.
    pub substituted: Option<usize>,
    /// Descriptor closed because it aliased the secret source.
    pub scrubbed: Option<RawFd>,
    pub preload: PreloadOutcome,
    /// Number of control variables purged from the environment.
    pub purged: usize,
}
