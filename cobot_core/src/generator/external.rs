//! Force generator fed by the robot's external wrench field.

use crate::generator::Generator;
use crate::robot::Robot;
use crate::spatial::Vector6;

/// Force generator whose value is the robot's externally-updated wrench.
///
/// Equivalent to a [`ForceProxy`](crate::generator::ForceProxy) bound to the
/// measured external force: it lets a sensed contact force drive the
/// admittance relation, so the tool yields to whoever pushes it.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExternalForce;

impl ExternalForce {
    /// Create an external-force generator.
    pub const fn new() -> Self {
        Self
    }
}

impl Generator for ExternalForce {
    type Output = Vector6;

    fn compute(&mut self, robot: &Robot) -> Vector6 {
        robot.task.external_force
    }
}
