//! Robot state: the single owner of all live sensor and command values.
//!
//! The driver writes the measured fields (`current_*`, `external_*`) before
//! each cycle and reads the command fields after it. The controller writes
//! the per-cycle sums, totals, commands, and the global scaling factor.
//! Constraints and generators only ever see a shared reference.
//!
//! Damping matrices carry a cached inverse, computed when the matrix is set.
//! A singular matrix is a configuration error rejected at update time, never
//! in the per-cycle path.

use crate::error::ConfigError;
use crate::spatial::{JointVector, Matrix6, Pose, Vector6};

/// Control-point (tool) state, 6 DOF.
#[derive(Debug, Clone)]
pub struct TaskState {
    /// Measured pose of the control point.
    pub current_pose: Pose,
    /// Target pose (for applications that track one).
    pub target_pose: Pose,
    /// Measured control-point twist, from the driver.
    pub current_velocity: Vector6,
    /// Measured external wrench (force sensor), from the driver.
    pub external_force: Vector6,
    /// Sum of all active velocity generator outputs (pre-admittance).
    pub velocity_sum: Vector6,
    /// Sum of all active force generator outputs.
    pub force_sum: Vector6,
    /// Pre-scale candidate twist: `velocity_sum + B⁻¹·force_sum`.
    pub total_velocity: Vector6,
    /// Equivalent total wrench: `force_sum + B·velocity_sum`.
    pub total_force: Vector6,
    /// Commanded twist: `scale × total_velocity`.
    pub velocity_command: Vector6,

    damping: Matrix6,
    damping_inverse: Matrix6,
}

impl TaskState {
    fn new() -> Self {
        Self {
            current_pose: Pose::identity(),
            target_pose: Pose::identity(),
            current_velocity: Vector6::zeros(),
            external_force: Vector6::zeros(),
            velocity_sum: Vector6::zeros(),
            force_sum: Vector6::zeros(),
            total_velocity: Vector6::zeros(),
            total_force: Vector6::zeros(),
            velocity_command: Vector6::zeros(),
            damping: Matrix6::identity(),
            damping_inverse: Matrix6::identity(),
        }
    }

    /// Control-point damping matrix.
    #[inline]
    pub fn damping(&self) -> &Matrix6 {
        &self.damping
    }

    /// Cached inverse of the control-point damping matrix.
    #[inline]
    pub fn damping_inverse(&self) -> &Matrix6 {
        &self.damping_inverse
    }
}

/// Joint-space state, one entry per joint.
#[derive(Debug, Clone)]
pub struct JointState {
    /// Measured joint positions.
    pub current_position: JointVector,
    /// Target joint positions.
    pub target_position: JointVector,
    /// Measured joint velocities, from the driver.
    pub current_velocity: JointVector,
    /// Measured external joint torques, from the driver.
    pub external_torque: JointVector,
    /// Sum of all active joint-velocity generator outputs.
    pub velocity_sum: JointVector,
    /// Sum of all active torque generator outputs.
    pub torque_sum: JointVector,
    /// Pre-scale candidate joint velocity.
    pub total_velocity: JointVector,
    /// Equivalent total joint torque.
    pub total_torque: JointVector,
    /// Commanded joint velocity: `scale × total_velocity`.
    pub velocity_command: JointVector,

    // Joint damping is diagonal; stored as its diagonal with the cached
    // element-wise reciprocal.
    damping: JointVector,
    damping_reciprocal: JointVector,
}

impl JointState {
    fn new(joint_count: usize) -> Self {
        Self {
            current_position: JointVector::zeros(joint_count),
            target_position: JointVector::zeros(joint_count),
            current_velocity: JointVector::zeros(joint_count),
            external_torque: JointVector::zeros(joint_count),
            velocity_sum: JointVector::zeros(joint_count),
            torque_sum: JointVector::zeros(joint_count),
            total_velocity: JointVector::zeros(joint_count),
            total_torque: JointVector::zeros(joint_count),
            velocity_command: JointVector::zeros(joint_count),
            damping: JointVector::from_element(joint_count, 1.0),
            damping_reciprocal: JointVector::from_element(joint_count, 1.0),
        }
    }

    /// Diagonal of the joint damping matrix.
    #[inline]
    pub fn damping(&self) -> &JointVector {
        &self.damping
    }

    /// Element-wise reciprocal of the joint damping diagonal.
    #[inline]
    pub fn damping_reciprocal(&self) -> &JointVector {
        &self.damping_reciprocal
    }
}

/// Complete robot state for one controlled session.
#[derive(Debug, Clone)]
pub struct Robot {
    name: String,
    joint_count: usize,
    /// Control-point state.
    pub task: TaskState,
    /// Joint-space state.
    pub joint: JointState,
    /// Global scaling factor produced by the last controller cycle.
    pub scaling_factor: f64,
}

impl Robot {
    /// Create a robot with the given name and joint count.
    ///
    /// Both damping matrices start at identity; all state fields are zeroed
    /// and the scaling factor is `1.0`.
    pub fn new(name: impl Into<String>, joint_count: usize) -> Self {
        Self {
            name: name.into(),
            joint_count,
            task: TaskState::new(),
            joint: JointState::new(joint_count),
            scaling_factor: 1.0,
        }
    }

    /// Robot name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of joints.
    #[inline]
    pub const fn joint_count(&self) -> usize {
        self.joint_count
    }

    /// Set the control-point damping matrix.
    ///
    /// The inverse is computed here so the per-cycle path never inverts.
    ///
    /// # Errors
    /// [`ConfigError::SingularDamping`] if the matrix is not invertible; the
    /// previous damping matrix stays in effect.
    pub fn set_control_point_damping(&mut self, damping: Matrix6) -> Result<(), ConfigError> {
        let inverse = damping.try_inverse().ok_or(ConfigError::SingularDamping)?;
        self.task.damping = damping;
        self.task.damping_inverse = inverse;
        Ok(())
    }

    /// Set the diagonal of the joint damping matrix.
    ///
    /// # Errors
    /// [`ConfigError::DimensionMismatch`] if the diagonal length differs from
    /// the joint count; [`ConfigError::SingularDamping`] if any entry is
    /// zero. The previous damping stays in effect on error.
    pub fn set_joint_damping(&mut self, diagonal: JointVector) -> Result<(), ConfigError> {
        if diagonal.len() != self.joint_count {
            return Err(ConfigError::DimensionMismatch {
                expected: self.joint_count,
                actual: diagonal.len(),
            });
        }
        if diagonal.iter().any(|d| *d == 0.0) {
            return Err(ConfigError::SingularDamping);
        }
        self.joint.damping_reciprocal = diagonal.map(|d| 1.0 / d);
        self.joint.damping = diagonal;
        Ok(())
    }
}
