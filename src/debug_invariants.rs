//! Bookkeeping self-checks for the partitioners.
//!
//! Checks run in debug builds, or in release builds with the
//! `check-invariants` feature.

use crate::partitioning::PartitionError;

/// A structure whose counters can be checked against each other.
pub trait DebugInvariants {
    /// Panic on a violated invariant when checks are enabled; no-op otherwise.
    fn debug_assert_invariants(&self);
    /// First violated invariant, if any.
    fn validate_invariants(&self) -> Result<(), PartitionError>;
}

/// Panics with `[hostpart] <owner>: <error>` when `$check` fails and
/// invariant checks are enabled.
#[macro_export]
macro_rules! debug_invariants {
    ($check:expr, $owner:literal) => {
        #[cfg(any(debug_assertions, feature = "check-invariants"))]
        if let Err(err) = $check {
            panic!(concat!("[hostpart] ", $owner, ": {}"), err);
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Broken;

    impl DebugInvariants for Broken {
        fn debug_assert_invariants(&self) {
            crate::debug_invariants!(self.validate_invariants(), "Broken");
        }

        fn validate_invariants(&self) -> Result<(), PartitionError> {
            Err(PartitionError::Invariant("counts disagree".into()))
        }
    }

    #[test]
    #[cfg(any(debug_assertions, feature = "check-invariants"))]
    #[should_panic(expected = "[hostpart] Broken: invariant violated: counts disagree")]
    fn failed_check_panics_with_owner() {
        Broken.debug_assert_invariants();
    }

    #[test]
    fn passing_check_is_silent() {
        crate::debug_invariants!(Ok::<(), PartitionError>(()), "Nothing");
    }
}
