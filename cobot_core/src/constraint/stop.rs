//! Force-triggered stop constraint with hysteresis.

use crate::constraint::{Constraint, ConstraintKind};
use crate::error::ConfigError;
use crate::robot::Robot;

/// Stops the robot while the external force is above a limit.
///
/// Two-threshold hysteretic switch on `‖f_ext‖`: once the magnitude exceeds
/// the activation threshold the factor drops to `0` and stays there until
/// the magnitude falls below the lower deactivation threshold. The gap
/// between the thresholds prevents chatter at the boundary.
///
/// The latched "stopped" flag is part of the constraint's own lifecycle and
/// resets only by reconstruction.
#[derive(Debug, Clone)]
pub struct StopConstraint {
    activation_threshold: f64,
    deactivation_threshold: f64,
    stopped: bool,
}

impl StopConstraint {
    /// Create a stop constraint with the given force thresholds [N].
    ///
    /// # Errors
    /// [`ConfigError::InvalidParameter`] unless
    /// `activation > deactivation >= 0` and both are finite.
    pub fn new(activation_threshold: f64, deactivation_threshold: f64) -> Result<Self, ConfigError> {
        if !activation_threshold.is_finite() || !deactivation_threshold.is_finite() {
            return Err(ConfigError::InvalidParameter(
                "stop thresholds must be finite".to_string(),
            ));
        }
        if deactivation_threshold < 0.0 || activation_threshold <= deactivation_threshold {
            return Err(ConfigError::InvalidParameter(format!(
                "stop thresholds must satisfy activation > deactivation >= 0, \
                 got activation={activation_threshold}, deactivation={deactivation_threshold}"
            )));
        }
        Ok(Self {
            activation_threshold,
            deactivation_threshold,
            stopped: false,
        })
    }

    /// Whether the stop is currently latched.
    #[inline]
    pub const fn is_stopped(&self) -> bool {
        self.stopped
    }
}

impl Constraint for StopConstraint {
    fn kind(&self) -> ConstraintKind {
        ConstraintKind::Minimum
    }

    fn compute(&mut self, robot: &Robot) -> f64 {
        let force = robot.task.external_force.norm();
        if self.stopped {
            if force < self.deactivation_threshold {
                self.stopped = false;
            }
        } else if force > self.activation_threshold {
            self.stopped = true;
        }
        if self.stopped { 0.0 } else { 1.0 }
    }
}
