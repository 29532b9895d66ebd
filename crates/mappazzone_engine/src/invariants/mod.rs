//! Whole-state invariants of a session.
//!
//! Each invariant is a property of a [`crate::GameSession`] that must hold between turns.
//! The session checks the full set after every consumed turn in debug builds;
//! tests check them directly.

/// A logical property that must hold for a given state.
pub trait Invariant<S> {
    /// Checks if the invariant holds for the given state.
    fn holds(state: &S) -> bool;

    /// Short name used in reports.
    fn name() -> &'static str;

    /// Human-readable description of the invariant.
    fn description() -> &'static str;
}

/// Violation of an invariant.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
#[display("{} violated: {}", invariant, description)]
pub struct InvariantViolation {
    /// Name of the violated invariant.
    pub invariant: &'static str,
    /// What the invariant requires.
    pub description: &'static str,
}

impl InvariantViolation {
    /// The violation of `I`.
    pub fn of<S, I: Invariant<S>>() -> Self {
        Self {
            invariant: I::name(),
            description: I::description(),
        }
    }
}

/// A set of invariants checked together. Implemented for tuples.
pub trait InvariantSet<S> {
    /// Checks all invariants in the set, collecting every violation.
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>>;
}

fn check<S, I: Invariant<S>>(state: &S, violations: &mut Vec<InvariantViolation>) {
    if !I::holds(state) {
        violations.push(InvariantViolation::of::<S, I>());
    }
}

macro_rules! invariant_set {
    ($($invariant:ident),+) => {
        impl<S, $($invariant),+> InvariantSet<S> for ($($invariant,)+)
        where
            $($invariant: Invariant<S>),+
        {
            fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
                let mut violations = Vec::new();
                $(check::<S, $invariant>(state, &mut violations);)+
                if violations.is_empty() {
                    Ok(())
                } else {
                    Err(violations)
                }
            }
        }
    };
}

invariant_set!(I1);
invariant_set!(I1, I2);
invariant_set!(I1, I2, I3);

pub mod band_order;
pub mod history_consistent;
pub mod score_consistent;

pub use band_order::{BandOrderInvariant, grid_is_consistent};
pub use history_consistent::HistoryConsistentInvariant;
pub use score_consistent::ScoreConsistentInvariant;

/// Every session invariant.
pub type SessionInvariants = (
    BandOrderInvariant,
    HistoryConsistentInvariant,
    ScoreConsistentInvariant,
);

/// Joins violations into one message.
pub fn describe(violations: &[InvariantViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
