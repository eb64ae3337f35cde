//! Dry-run switch.

/// Whether remote mutations are performed or only logged.
///
/// Passed to every component that changes remote state. Reads (listing
/// pages, fetching the space) happen in both modes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExecutionMode {
    /// Log intended mutations without performing them.
    Simulate,
    /// Perform mutations.
    #[default]
    Apply,
}

impl ExecutionMode {
    /// Mode for a `--dry-run` flag.
    #[must_use]
    pub fn from_dry_run(dry_run: bool) -> Self {
        if dry_run { Self::Simulate } else { Self::Apply }
    }

    /// Whether mutations are only logged.
    #[must_use]
    pub fn is_simulate(self) -> bool {
        self == Self::Simulate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_dry_run() {
        assert_eq!(ExecutionMode::from_dry_run(true), ExecutionMode::Simulate);
        assert_eq!(ExecutionMode::from_dry_run(false), ExecutionMode::Apply);
        assert!(!ExecutionMode::default().is_simulate());
    }
}
