//! Spatial value types.
//!
//! Fixed-dimension vectors for tool-point twists and wrenches (6 DOF),
//! dynamically-sized vectors for joint-space quantities (N DOF), and the
//! tool pose. Pure value types with no behavior beyond arithmetic.

use nalgebra::{DVector, Matrix6 as NaMatrix6, UnitQuaternion, Vector3, Vector6 as NaVector6};

/// A 6-DOF twist or wrench: `[linear; angular]` in the control-point frame.
pub type Vector6 = NaVector6<f64>;

/// A 6×6 matrix over the control-point space (damping, inertia, ...).
pub type Matrix6 = NaMatrix6<f64>;

/// A joint-space vector with one entry per joint.
pub type JointVector = DVector<f64>;

/// The linear (translational) half of a twist or wrench.
#[inline]
pub fn linear_part(v: &Vector6) -> Vector3<f64> {
    v.fixed_rows::<3>(0).into_owned()
}

/// The angular (rotational) half of a twist or wrench.
#[inline]
pub fn angular_part(v: &Vector6) -> Vector3<f64> {
    v.fixed_rows::<3>(3).into_owned()
}

/// Control-point pose: position plus orientation.
#[derive(Debug, Clone, PartialEq)]
pub struct Pose {
    /// Position of the control point [m].
    pub position: Vector3<f64>,
    /// Orientation of the control point.
    pub orientation: UnitQuaternion<f64>,
}

impl Pose {
    /// Identity pose at the origin.
    pub fn identity() -> Self {
        Self {
            position: Vector3::zeros(),
            orientation: UnitQuaternion::identity(),
        }
    }

    /// Integrate a twist over `dt` seconds, moving this pose.
    ///
    /// First-order integration: position advances along the linear part,
    /// orientation by the exponential of the scaled angular part.
    pub fn integrate(&mut self, twist: &Vector6, dt: f64) {
        self.position += linear_part(twist) * dt;
        let omega = angular_part(twist) * dt;
        self.orientation = UnitQuaternion::from_scaled_axis(omega) * self.orientation;
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_and_angular_parts() {
        let v = Vector6::from_column_slice(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(linear_part(&v), Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(angular_part(&v), Vector3::new(4.0, 5.0, 6.0));
    }

    #[test]
    fn pose_integrates_linear_velocity() {
        let mut pose = Pose::identity();
        let twist = Vector6::from_column_slice(&[1.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        pose.integrate(&twist, 0.5);
        assert_eq!(pose.position, Vector3::new(0.5, 0.0, 0.0));
        assert_eq!(pose.orientation, UnitQuaternion::identity());
    }

    #[test]
    fn pose_integrates_angular_velocity() {
        let mut pose = Pose::identity();
        // Rotate about z at 1 rad/s for one second.
        let twist = Vector6::from_column_slice(&[0.0, 0.0, 0.0, 0.0, 0.0, 1.0]);
        pose.integrate(&twist, 1.0);
        let angle = pose.orientation.angle();
        assert!((angle - 1.0).abs() < 1e-12);
    }
}
