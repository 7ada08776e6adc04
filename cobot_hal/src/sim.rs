//! Kinematic simulation driver.
//!
//! A perfect-tracking backend: each `read` reports the previously commanded
//! velocities as the measured ones and integrates poses and joint positions
//! over one sample period. The measured external wrench comes from a shared
//! handle so a test or demo can push on the virtual robot while the loop
//! runs.

use std::time::Duration;

use cobot_core::generator::{shared_vector6, SharedVector6};
use cobot_core::spatial::Vector6;
use cobot_core::Robot;
use serde::Deserialize;

use crate::driver::{Driver, DriverError};

/// TOML parameters for [`SimDriver`].
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimConfig {
    /// Control period in seconds.
    pub sample_time: f64,
    /// Constant measured external wrench, if any.
    #[serde(default)]
    pub external_force: Option<[f64; 6]>,
}

/// Perfect-tracking kinematic simulator.
pub struct SimDriver {
    sample_time: f64,
    external_force: SharedVector6,
    last_command: Vector6,
    running: bool,
}

impl SimDriver {
    /// Create a simulator with the given control period.
    pub fn new(sample_time: f64) -> Result<Self, DriverError> {
        if !(sample_time.is_finite() && sample_time > 0.0) {
            return Err(DriverError::InvalidConfig(format!(
                "sample_time must be positive and finite, got {sample_time}"
            )));
        }
        Ok(Self {
            sample_time,
            external_force: shared_vector6(Vector6::zeros()),
            last_command: Vector6::zeros(),
            running: false,
        })
    }

    /// Factory for the driver registry.
    pub fn from_config(params: &toml::Value) -> Result<Box<dyn Driver>, DriverError> {
        let config: SimConfig = params
            .clone()
            .try_into()
            .map_err(|e| DriverError::InvalidConfig(e.to_string()))?;
        let mut driver = Self::new(config.sample_time)?;
        if let Some(wrench) = config.external_force {
            *driver.external_force.write() = Vector6::from_column_slice(&wrench);
        }
        Ok(Box::new(driver))
    }

    /// Handle to the simulated external wrench; writable from any thread.
    pub fn external_force_handle(&self) -> SharedVector6 {
        self.external_force.clone()
    }

    /// The last commanded twist seen by `send`.
    pub fn last_command(&self) -> &Vector6 {
        &self.last_command
    }
}

impl Driver for SimDriver {
    fn start(&mut self) -> Result<(), DriverError> {
        self.running = true;
        Ok(())
    }

    fn stop(&mut self) -> Result<(), DriverError> {
        self.running = false;
        Ok(())
    }

    fn read(&mut self, robot: &mut Robot) -> Result<(), DriverError> {
        let dt = self.sample_time;

        // Perfect tracking: the measured state is last cycle's command.
        robot.task.current_velocity = robot.task.velocity_command;
        robot
            .task
            .current_pose
            .integrate(&robot.task.velocity_command, dt);

        robot.joint.current_velocity = robot.joint.velocity_command.clone();
        robot.joint.current_position += &robot.joint.velocity_command * dt;

        robot.task.external_force = *self.external_force.read();
        Ok(())
    }

    fn send(&mut self, robot: &Robot) -> Result<(), DriverError> {
        if !self.running {
            return Err(DriverError::Communication(
                "driver is not started".to_string(),
            ));
        }
        self.last_command = robot.task.velocity_command;
        Ok(())
    }

    fn sample_time(&self) -> f64 {
        self.sample_time
    }

    fn init(&mut self, robot: &mut Robot, _timeout: Duration) -> Result<(), DriverError> {
        // The simulated state is always available.
        self.read(robot)
    }
}
