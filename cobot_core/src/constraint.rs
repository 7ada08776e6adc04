//! Constraint hierarchy.
//!
//! A constraint produces a scalar safety factor each cycle from the current
//! robot state. Built-in factors lie in `[0, 1]` by convention; the
//! controller does not re-clamp, so an out-of-range factor from a custom
//! constraint propagates visibly instead of being masked.
//!
//! Factors are combined per kind: `Minimum`-kind factors with `min()` (hard
//! cutoffs dominate), `Multiplicative`-kind factors with a product (graded
//! risks compound), and the two partial results with `min()`.

pub mod power;
pub mod stop;
pub mod velocity;

use crate::robot::Robot;

pub use power::PowerConstraint;
pub use stop::StopConstraint;
pub use velocity::VelocityConstraint;

/// Combination semantics of a constraint, fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    /// Graded risk; factors of this kind compound multiplicatively.
    Multiplicative,
    /// Hard cutoff; factors of this kind combine with `min()`.
    Minimum,
}

/// A safety component producing a scaling factor each cycle.
///
/// Constraints observe the pre-scale totals stored in [`Robot`] by the
/// controller (steps 1-4 of the cycle), never the post-scale command, so
/// their evaluation is independent of the factor being computed in the same
/// cycle. Implementations may keep internal state (see
/// [`StopConstraint`]'s hysteresis latch), which is why `compute` takes
/// `&mut self`.
pub trait Constraint {
    /// Combination kind, immutable after construction.
    fn kind(&self) -> ConstraintKind;

    /// Compute this cycle's safety factor.
    fn compute(&mut self, robot: &Robot) -> f64;
}

/// Boxed constraint handle, the registry's storage form.
pub type BoxedConstraint = Box<dyn Constraint + Send>;

/// Neutral constraint: always `1.0`, the identity for both combination
/// kinds.
#[derive(Debug, Clone, Copy)]
pub struct DefaultConstraint {
    kind: ConstraintKind,
}

impl DefaultConstraint {
    /// Create a neutral constraint of the given kind.
    pub const fn new(kind: ConstraintKind) -> Self {
        Self { kind }
    }
}

impl Constraint for DefaultConstraint {
    fn kind(&self) -> ConstraintKind {
        self.kind
    }

    fn compute(&mut self, _robot: &Robot) -> f64 {
        1.0
    }
}

/// A user-defined constraint built from a closure.
///
/// The closure receives the robot state and returns the factor; the kind is
/// fixed at construction like any other constraint.
pub struct FnConstraint<F> {
    kind: ConstraintKind,
    f: F,
}

impl<F> FnConstraint<F>
where
    F: FnMut(&Robot) -> f64,
{
    /// Wrap `f` as a constraint of the given kind.
    pub fn new(kind: ConstraintKind, f: F) -> Self {
        Self { kind, f }
    }
}

impl<F> Constraint for FnConstraint<F>
where
    F: FnMut(&Robot) -> f64,
{
    fn kind(&self) -> ConstraintKind {
        self.kind
    }

    fn compute(&mut self, robot: &Robot) -> f64 {
        (self.f)(robot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_constraint_is_always_one() {
        let robot = Robot::new("test", 6);
        let mut c = DefaultConstraint::new(ConstraintKind::Minimum);
        assert_eq!(c.compute(&robot), 1.0);
        assert_eq!(c.kind(), ConstraintKind::Minimum);

        let mut c = DefaultConstraint::new(ConstraintKind::Multiplicative);
        assert_eq!(c.compute(&robot), 1.0);
    }

    #[test]
    fn fn_constraint_reads_robot_state() {
        let mut robot = Robot::new("test", 6);
        robot.scaling_factor = 0.25;
        let mut c = FnConstraint::new(ConstraintKind::Multiplicative, |r: &Robot| {
            r.scaling_factor * 2.0
        });
        assert_eq!(c.kind(), ConstraintKind::Multiplicative);
        assert_eq!(c.compute(&robot), 0.5);
    }
}
