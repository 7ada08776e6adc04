//! Velocity-limiting constraint.

use crate::constraint::{Constraint, ConstraintKind};
use crate::error::ConfigError;
use crate::robot::Robot;

/// Limits the norm of the control-point velocity to a maximum speed.
///
/// The factor is `min(1, max / ‖v_total‖)` against the pre-scale total
/// velocity, so the scaled command never exceeds the configured maximum. A
/// zero-norm total velocity yields `1.0` (nothing to limit, and no division
/// by zero).
#[derive(Debug, Clone)]
pub struct VelocityConstraint {
    maximum: f64,
}

impl VelocityConstraint {
    /// Create a velocity constraint with the given maximum speed.
    ///
    /// # Errors
    /// [`ConfigError::InvalidParameter`] if `maximum` is not strictly
    /// positive and finite.
    pub fn new(maximum: f64) -> Result<Self, ConfigError> {
        if !maximum.is_finite() || maximum <= 0.0 {
            return Err(ConfigError::InvalidParameter(format!(
                "maximum velocity must be positive and finite, got {maximum}"
            )));
        }
        Ok(Self { maximum })
    }

    /// Configured maximum speed.
    #[inline]
    pub const fn maximum(&self) -> f64 {
        self.maximum
    }
}

impl Constraint for VelocityConstraint {
    fn kind(&self) -> ConstraintKind {
        ConstraintKind::Minimum
    }

    fn compute(&mut self, robot: &Robot) -> f64 {
        let norm = robot.task.total_velocity.norm();
        if norm == 0.0 {
            return 1.0;
        }
        (self.maximum / norm).min(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::Vector6;

    #[test]
    fn zero_velocity_yields_one() {
        let robot = Robot::new("test", 6);
        let mut c = VelocityConstraint::new(0.5).unwrap();
        assert_eq!(c.compute(&robot), 1.0);
    }

    #[test]
    fn over_limit_velocity_is_scaled_to_half() {
        let mut robot = Robot::new("test", 6);
        // Norm 2v with maximum v → factor 0.5.
        robot.task.total_velocity = Vector6::from_column_slice(&[2.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        let mut c = VelocityConstraint::new(1.0).unwrap();
        assert!((c.compute(&robot) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn under_limit_velocity_is_untouched() {
        let mut robot = Robot::new("test", 6);
        robot.task.total_velocity = Vector6::from_column_slice(&[0.2, 0.0, 0.0, 0.0, 0.0, 0.0]);
        let mut c = VelocityConstraint::new(1.0).unwrap();
        assert_eq!(c.compute(&robot), 1.0);
    }

    #[test]
    fn invalid_maximum_rejected() {
        assert!(VelocityConstraint::new(0.0).is_err());
        assert!(VelocityConstraint::new(-1.0).is_err());
        assert!(VelocityConstraint::new(f64::NAN).is_err());
    }
}
