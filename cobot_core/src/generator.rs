//! Generator hierarchy.
//!
//! A generator produces a candidate contribution each cycle — a wrench for
//! force generators, a twist for velocity generators, joint vectors for the
//! joint-space kinds. All active generators of one registry are summed
//! equally; there is no priority or kind tag.

pub mod external;
pub mod proxy;

use crate::robot::Robot;

pub use external::ExternalForce;
pub use proxy::{
    shared_joint_vector, shared_vector6, ForceProxy, JointVelocityProxy, SharedJointVector,
    SharedVector6, TorqueProxy, VelocityProxy,
};

/// A component producing a candidate contribution each cycle.
///
/// `Output` fixes the generator kind: [`Vector6`](crate::spatial::Vector6)
/// for control-point force/velocity generators,
/// [`JointVector`](crate::spatial::JointVector) for torque and
/// joint-velocity generators (which must match the robot's joint count).
pub trait Generator {
    /// The contribution type.
    type Output;

    /// Compute this cycle's contribution.
    fn compute(&mut self, robot: &Robot) -> Self::Output;
}

/// Boxed generator handle, the registry's storage form.
pub type BoxedGenerator<V> = Box<dyn Generator<Output = V> + Send>;

// Closures are generators: the idiomatic extension point for user-defined
// contributions.
impl<F, V> Generator for F
where
    F: FnMut(&Robot) -> V,
{
    type Output = V;

    fn compute(&mut self, robot: &Robot) -> V {
        self(robot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::Vector6;

    #[test]
    fn closures_are_generators() {
        let robot = Robot::new("test", 6);
        let mut g = |_r: &Robot| Vector6::from_element(2.0);
        let out = Generator::compute(&mut g, &robot);
        assert_eq!(out, Vector6::from_element(2.0));
    }

    #[test]
    fn boxed_closure_generator() {
        let robot = Robot::new("test", 6);
        let mut g: BoxedGenerator<Vector6> = Box::new(|r: &Robot| r.task.current_velocity * 2.0);
        assert_eq!(g.compute(&robot), Vector6::zeros());
    }
}
