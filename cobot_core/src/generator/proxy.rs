//! Proxy generators over externally-owned values.
//!
//! A proxy wraps a shared handle to a value owned and updated outside the
//! controller — a force-sensor pipeline, an external planner — and returns
//! it unchanged each cycle. The arbitration never learns where the value
//! comes from.
//!
//! Handles are `Arc<RwLock<_>>` so a sensor thread may feed them; within
//! the control thread a read lock is uncontended and cheap.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::generator::Generator;
use crate::robot::Robot;
use crate::spatial::{JointVector, Vector6};

/// Shared handle to a control-point vector fed from outside the controller.
pub type SharedVector6 = Arc<RwLock<Vector6>>;

/// Shared handle to a joint-space vector fed from outside the controller.
pub type SharedJointVector = Arc<RwLock<JointVector>>;

/// Create a shared control-point vector handle.
pub fn shared_vector6(init: Vector6) -> SharedVector6 {
    Arc::new(RwLock::new(init))
}

/// Create a shared joint-space vector handle.
pub fn shared_joint_vector(init: JointVector) -> SharedJointVector {
    Arc::new(RwLock::new(init))
}

/// Velocity generator returning an externally-owned twist unchanged.
#[derive(Debug, Clone)]
pub struct VelocityProxy {
    value: SharedVector6,
}

impl VelocityProxy {
    /// Wrap a shared twist handle.
    pub fn new(value: SharedVector6) -> Self {
        Self { value }
    }
}

impl Generator for VelocityProxy {
    type Output = Vector6;

    fn compute(&mut self, _robot: &Robot) -> Vector6 {
        *self.value.read()
    }
}

/// Force generator returning an externally-owned wrench unchanged.
#[derive(Debug, Clone)]
pub struct ForceProxy {
    value: SharedVector6,
}

impl ForceProxy {
    /// Wrap a shared wrench handle.
    pub fn new(value: SharedVector6) -> Self {
        Self { value }
    }
}

impl Generator for ForceProxy {
    type Output = Vector6;

    fn compute(&mut self, _robot: &Robot) -> Vector6 {
        *self.value.read()
    }
}

/// Joint-velocity generator returning an externally-owned vector unchanged.
#[derive(Debug, Clone)]
pub struct JointVelocityProxy {
    value: SharedJointVector,
}

impl JointVelocityProxy {
    /// Wrap a shared joint-velocity handle.
    pub fn new(value: SharedJointVector) -> Self {
        Self { value }
    }
}

impl Generator for JointVelocityProxy {
    type Output = JointVector;

    fn compute(&mut self, _robot: &Robot) -> JointVector {
        self.value.read().clone()
    }
}

/// Torque generator returning an externally-owned vector unchanged.
#[derive(Debug, Clone)]
pub struct TorqueProxy {
    value: SharedJointVector,
}

impl TorqueProxy {
    /// Wrap a shared torque handle.
    pub fn new(value: SharedJointVector) -> Self {
        Self { value }
    }
}

impl Generator for TorqueProxy {
    type Output = JointVector;

    fn compute(&mut self, _robot: &Robot) -> JointVector {
        self.value.read().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn velocity_proxy_tracks_external_updates() {
        let robot = Robot::new("test", 6);
        let handle = shared_vector6(Vector6::zeros());
        let mut proxy = VelocityProxy::new(handle.clone());

        assert_eq!(proxy.compute(&robot), Vector6::zeros());

        *handle.write() = Vector6::from_element(0.1);
        assert_eq!(proxy.compute(&robot), Vector6::from_element(0.1));
    }

    #[test]
    fn joint_proxy_clones_current_value() {
        let robot = Robot::new("test", 3);
        let handle = shared_joint_vector(JointVector::from_column_slice(&[1.0, 2.0, 3.0]));
        let mut proxy = JointVelocityProxy::new(handle.clone());
        let out = proxy.compute(&robot);
        assert_eq!(out.as_slice(), &[1.0, 2.0, 3.0]);

        handle.write()[1] = 5.0;
        assert_eq!(proxy.compute(&robot)[1], 5.0);
    }
}
