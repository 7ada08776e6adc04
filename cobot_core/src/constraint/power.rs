//! Power-limiting constraint.

use crate::constraint::{Constraint, ConstraintKind};
use crate::error::ConfigError;
use crate::robot::Robot;

/// Limits the power exchanged between the tool and its environment.
///
/// The instantaneous exchanged power is `p = f_ext · v_total`. Negative
/// power means energy flows from the environment (the human) into the robot,
/// which is safe, so the factor is `1.0`. For positive power the command
/// `α · v_total` projects to `α · p`, so the largest admissible factor is
/// `p_max / p`, clamped to `[0, 1]`: the factor is monotone and continuous
/// in `p`, `1` leaves the command unconstrained, `0` brings the projected
/// power to zero.
///
/// The last raw computed power stays readable through [`PowerConstraint::power`]
/// for inspection and logging.
#[derive(Debug, Clone)]
pub struct PowerConstraint {
    maximum: f64,
    last_power: f64,
}

impl PowerConstraint {
    /// Create a power constraint with the given maximum exchanged power [W].
    ///
    /// # Errors
    /// [`ConfigError::InvalidParameter`] if `maximum` is not strictly
    /// positive and finite.
    pub fn new(maximum: f64) -> Result<Self, ConfigError> {
        if !maximum.is_finite() || maximum <= 0.0 {
            return Err(ConfigError::InvalidParameter(format!(
                "maximum power must be positive and finite, got {maximum}"
            )));
        }
        Ok(Self {
            maximum,
            last_power: 0.0,
        })
    }

    /// Configured maximum power.
    #[inline]
    pub const fn maximum(&self) -> f64 {
        self.maximum
    }

    /// Raw exchanged power computed in the last cycle.
    #[inline]
    pub const fn power(&self) -> f64 {
        self.last_power
    }
}

impl Constraint for PowerConstraint {
    fn kind(&self) -> ConstraintKind {
        ConstraintKind::Multiplicative
    }

    fn compute(&mut self, robot: &Robot) -> f64 {
        let power = robot.task.external_force.dot(&robot.task.total_velocity);
        self.last_power = power;
        if power <= 0.0 {
            return 1.0;
        }
        (self.maximum / power).min(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::Vector6;

    fn robot_with(force_x: f64, velocity_x: f64) -> Robot {
        let mut robot = Robot::new("test", 6);
        robot.task.external_force = Vector6::from_column_slice(&[force_x, 0.0, 0.0, 0.0, 0.0, 0.0]);
        robot.task.total_velocity =
            Vector6::from_column_slice(&[velocity_x, 0.0, 0.0, 0.0, 0.0, 0.0]);
        robot
    }

    #[test]
    fn negative_power_is_unconstrained() {
        // Force opposing motion: energy flows into the robot.
        let robot = robot_with(-10.0, 1.0);
        let mut c = PowerConstraint::new(2.0).unwrap();
        assert_eq!(c.compute(&robot), 1.0);
        assert_eq!(c.power(), -10.0);
    }

    #[test]
    fn power_below_maximum_is_unconstrained() {
        let robot = robot_with(1.0, 1.0); // p = 1 W
        let mut c = PowerConstraint::new(2.0).unwrap();
        assert_eq!(c.compute(&robot), 1.0);
    }

    #[test]
    fn power_above_maximum_is_scaled() {
        let robot = robot_with(4.0, 1.0); // p = 4 W
        let mut c = PowerConstraint::new(2.0).unwrap();
        assert!((c.compute(&robot) - 0.5).abs() < 1e-12);
        assert_eq!(c.power(), 4.0);
    }

    #[test]
    fn zero_power_is_unconstrained() {
        let robot = robot_with(0.0, 1.0);
        let mut c = PowerConstraint::new(2.0).unwrap();
        assert_eq!(c.compute(&robot), 1.0);
    }

    #[test]
    fn invalid_maximum_rejected() {
        assert!(PowerConstraint::new(0.0).is_err());
        assert!(PowerConstraint::new(f64::INFINITY).is_err());
    }
}
