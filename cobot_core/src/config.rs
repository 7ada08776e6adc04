//! TOML configuration for the safety controller.
//!
//! Loads a `ControllerConfig` from a TOML document, validates it, and builds
//! a ready-to-run [`SafetyController`] with the enabled built-in constraints
//! registered under fixed names:
//!
//! - `velocity_limit` — [`VelocityConstraint`]
//! - `power_limit` — [`PowerConstraint`]
//! - `force_stop` — [`StopConstraint`]
//!
//! ```toml
//! verbose = true
//!
//! [damping]
//! control_point = [150.0, 150.0, 150.0, 15.0, 15.0, 15.0]
//! joint = [50.0, 50.0, 50.0, 50.0, 50.0, 50.0, 50.0]
//!
//! [limits]
//! velocity = { maximum = 0.25 }
//! power = { maximum = 20.0 }
//! stop = { activation_threshold = 60.0, deactivation_threshold = 25.0 }
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::constraint::{PowerConstraint, StopConstraint, VelocityConstraint};
use crate::controller::SafetyController;
use crate::error::ConfigError;
use crate::robot::Robot;
use crate::spatial::{JointVector, Matrix6};

/// Name under which the built-in velocity constraint is registered.
pub const VELOCITY_LIMIT_NAME: &str = "velocity_limit";
/// Name under which the built-in power constraint is registered.
pub const POWER_LIMIT_NAME: &str = "power_limit";
/// Name under which the built-in stop constraint is registered.
pub const FORCE_STOP_NAME: &str = "force_stop";

/// Damping configuration: diagonals of both damping matrices.
#[derive(Debug, Clone, Deserialize)]
pub struct DampingConfig {
    /// Diagonal of the 6×6 control-point damping matrix.
    pub control_point: [f64; 6],
    /// Diagonal of the joint damping matrix, one entry per joint.
    pub joint: Vec<f64>,
}

/// Built-in velocity limit parameters.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct VelocityLimitConfig {
    /// Maximum control-point speed.
    pub maximum: f64,
}

/// Built-in power limit parameters.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PowerLimitConfig {
    /// Maximum exchanged power [W].
    pub maximum: f64,
}

/// Built-in force-stop parameters.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct StopLimitConfig {
    /// Force magnitude that latches the stop [N].
    pub activation_threshold: f64,
    /// Force magnitude below which the stop releases [N].
    pub deactivation_threshold: f64,
}

/// Which built-in constraints to register.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct LimitsConfig {
    /// Velocity limit, if any.
    pub velocity: Option<VelocityLimitConfig>,
    /// Power limit, if any.
    pub power: Option<PowerLimitConfig>,
    /// Force-triggered stop, if any.
    pub stop: Option<StopLimitConfig>,
}

/// Complete controller configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ControllerConfig {
    /// Enable verbose per-cycle diagnostics.
    #[serde(default)]
    pub verbose: bool,
    /// Damping matrices.
    pub damping: DampingConfig,
    /// Built-in constraint parameters.
    #[serde(default)]
    pub limits: LimitsConfig,
}

impl ControllerConfig {
    /// Parse a configuration from a TOML string.
    pub fn from_toml_str(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and parse a configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Validate parameter ranges.
    ///
    /// Damping entries must be non-zero (the matrices are inverted);
    /// constraint parameters are checked by their constructors, this only
    /// front-loads the checks so a bad file fails before any robot state is
    /// touched.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.damping.control_point.iter().any(|d| *d == 0.0) {
            return Err(ConfigError::SingularDamping);
        }
        if self.damping.joint.is_empty() {
            return Err(ConfigError::InvalidParameter(
                "joint damping diagonal is empty".to_string(),
            ));
        }
        if self.damping.joint.iter().any(|d| *d == 0.0) {
            return Err(ConfigError::SingularDamping);
        }
        if let Some(v) = self.limits.velocity {
            VelocityConstraint::new(v.maximum)?;
        }
        if let Some(p) = self.limits.power {
            PowerConstraint::new(p.maximum)?;
        }
        if let Some(s) = self.limits.stop {
            StopConstraint::new(s.activation_threshold, s.deactivation_threshold)?;
        }
        Ok(())
    }

    /// Number of joints implied by the joint damping diagonal.
    pub fn joint_count(&self) -> usize {
        self.damping.joint.len()
    }

    /// Apply the damping to `robot` and build the configured controller.
    ///
    /// # Errors
    /// [`ConfigError::DimensionMismatch`] if the joint damping length differs
    /// from the robot's joint count, plus any constraint parameter error.
    pub fn build(&self, robot: &mut Robot) -> Result<SafetyController, ConfigError> {
        let diagonal = Matrix6::from_diagonal(&nalgebra::Vector6::from_column_slice(
            &self.damping.control_point,
        ));
        robot.set_control_point_damping(diagonal)?;
        robot.set_joint_damping(JointVector::from_column_slice(&self.damping.joint))?;

        let mut controller = SafetyController::new();
        controller.set_verbose(self.verbose);

        if let Some(v) = self.limits.velocity {
            let constraint = VelocityConstraint::new(v.maximum)?;
            controller
                .add_constraint(VELOCITY_LIMIT_NAME, constraint)
                .expect("fresh controller has no duplicate names");
        }
        if let Some(p) = self.limits.power {
            let constraint = PowerConstraint::new(p.maximum)?;
            controller
                .add_constraint(POWER_LIMIT_NAME, constraint)
                .expect("fresh controller has no duplicate names");
        }
        if let Some(s) = self.limits.stop {
            let constraint = StopConstraint::new(s.activation_threshold, s.deactivation_threshold)?;
            controller
                .add_constraint(FORCE_STOP_NAME, constraint)
                .expect("fresh controller has no duplicate names");
        }

        Ok(controller)
    }
}
