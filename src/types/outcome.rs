//! Revalidation outcomes.

use super::CachedEntry;

/// Result of checking a request identity against the object store and,
/// when an entry exists, against the origin.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationOutcome {
    /// The origin answered `304`: serve this entry unchanged.
    Fresh(CachedEntry),
    /// An entry exists but the origin reports a change: refetch.
    Stale,
    /// Nothing stored for this identity.
    Miss,
}

impl ValidationOutcome {
    /// Short label for logs.
    pub fn label(&self) -> &'static str {
        match self {
            ValidationOutcome::Fresh(_) => "fresh",
            ValidationOutcome::Stale => "stale",
            ValidationOutcome::Miss => "miss",
        }
    }
}
