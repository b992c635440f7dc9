/// Branch state definitions for tracking a single crawl branch
///
/// A branch is one recursive crawl invocation for one URL at one depth.
use crate::PagewiseError;
use std::fmt;

/// Represents the current state of a crawl branch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BranchState {
    // ===== Active States =====
    /// Branch created, depth and visited checks not yet done
    Pending,

    /// The URL has been claimed and is being fetched
    Fetching,

    /// The page is HTML and its links are being extracted
    Parsing,

    // ===== Terminal States =====
    /// Depth exceeded or URL already claimed by another branch
    Skipped,

    /// Branch finished; its URL and its children's URLs are in the result
    Done,

    /// Fetch or parse failed; the URL is still counted as visited
    Failed,
}

impl BranchState {
    /// Returns true if no further transition is possible
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Skipped | Self::Done | Self::Failed)
    }

    /// Returns true if `next` is a legal successor of this state
    ///
    /// ```text
    /// Pending -> Skipped | Fetching
    /// Fetching -> Parsing | Done | Failed
    /// Parsing -> Done | Failed
    /// ```
    pub fn can_transition_to(&self, next: BranchState) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Skipped)
                | (Self::Pending, Self::Fetching)
                | (Self::Fetching, Self::Parsing)
                | (Self::Fetching, Self::Done)
                | (Self::Fetching, Self::Failed)
                | (Self::Parsing, Self::Done)
                | (Self::Parsing, Self::Failed)
        )
    }

    /// Moves to `next`, rejecting illegal transitions
    pub fn advance(&mut self, next: BranchState) -> Result<(), PagewiseError> {
        if !self.can_transition_to(next) {
            return Err(PagewiseError::InvalidTransition {
                from: *self,
                to: next,
            });
        }
        *self = next;
        Ok(())
    }

    /// Short lowercase name, used in logs and reports
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Fetching => "fetching",
            Self::Parsing => "parsing",
            Self::Skipped => "skipped",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for BranchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
