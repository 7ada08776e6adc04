//! The safety controller: per-cycle constraint/generator arbitration.
//!
//! Owns one named registry per component kind. Each cycle it sums the
//! generator contributions, derives a candidate velocity through the
//! admittance relation, evaluates every constraint against the pre-scale
//! totals, combines the factors into one global scale, and stores the scaled
//! command back into the robot state.
//!
//! [`SafetyController::update`] is infallible and linear in the registry
//! sizes: every fallible operation (registration, damping updates, built-in
//! construction) happens at setup time.

use tracing::warn;

use crate::constraint::{BoxedConstraint, Constraint, ConstraintKind};
use crate::error::RegistryError;
use crate::generator::{BoxedGenerator, Generator};
use crate::registry::ComponentRegistry;
use crate::robot::Robot;
use crate::spatial::{JointVector, Vector6};

/// Registry of named constraints with their last-computed factors.
pub type ConstraintRegistry = ComponentRegistry<BoxedConstraint, f64>;

/// Registry of named control-point generators (force or velocity).
pub type TaskGeneratorRegistry = ComponentRegistry<BoxedGenerator<Vector6>, Vector6>;

/// Registry of named joint-space generators (torque or joint velocity).
pub type JointGeneratorRegistry = ComponentRegistry<BoxedGenerator<JointVector>, JointVector>;

/// Arbitrates named generators and constraints into one velocity command.
pub struct SafetyController {
    constraints: ConstraintRegistry,
    force_generators: TaskGeneratorRegistry,
    velocity_generators: TaskGeneratorRegistry,
    torque_generators: JointGeneratorRegistry,
    joint_velocity_generators: JointGeneratorRegistry,
    verbose: bool,
}

impl SafetyController {
    /// Create a controller with empty registries.
    pub fn new() -> Self {
        Self {
            constraints: ComponentRegistry::new(),
            force_generators: ComponentRegistry::new(),
            velocity_generators: ComponentRegistry::new(),
            torque_generators: ComponentRegistry::new(),
            joint_velocity_generators: ComponentRegistry::new(),
            verbose: false,
        }
    }

    /// Enable per-cycle diagnostics: when the scale drops below `1.0` a
    /// warning names the most restrictive constraint. Diagnostic only.
    pub fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    // ── Registration ────────────────────────────────────────────────

    /// Register a constraint.
    pub fn add_constraint(
        &mut self,
        name: impl Into<String>,
        constraint: impl Constraint + Send + 'static,
    ) -> Result<(), RegistryError> {
        self.constraints.add(name, Box::new(constraint), 1.0)
    }

    /// Register a force generator (control-point wrench).
    pub fn add_force_generator(
        &mut self,
        name: impl Into<String>,
        generator: impl Generator<Output = Vector6> + Send + 'static,
    ) -> Result<(), RegistryError> {
        self.force_generators
            .add(name, Box::new(generator), Vector6::zeros())
    }

    /// Register a velocity generator (control-point twist).
    pub fn add_velocity_generator(
        &mut self,
        name: impl Into<String>,
        generator: impl Generator<Output = Vector6> + Send + 'static,
    ) -> Result<(), RegistryError> {
        self.velocity_generators
            .add(name, Box::new(generator), Vector6::zeros())
    }

    /// Register a torque generator (joint space).
    pub fn add_torque_generator(
        &mut self,
        name: impl Into<String>,
        generator: impl Generator<Output = JointVector> + Send + 'static,
    ) -> Result<(), RegistryError> {
        self.torque_generators
            .add(name, Box::new(generator), JointVector::zeros(0))
    }

    /// Register a joint-velocity generator.
    pub fn add_joint_velocity_generator(
        &mut self,
        name: impl Into<String>,
        generator: impl Generator<Output = JointVector> + Send + 'static,
    ) -> Result<(), RegistryError> {
        self.joint_velocity_generators
            .add(name, Box::new(generator), JointVector::zeros(0))
    }

    /// Remove a constraint by name.
    pub fn remove_constraint(&mut self, name: &str) -> Result<BoxedConstraint, RegistryError> {
        self.constraints.remove(name)
    }

    /// Remove a force generator by name.
    pub fn remove_force_generator(
        &mut self,
        name: &str,
    ) -> Result<BoxedGenerator<Vector6>, RegistryError> {
        self.force_generators.remove(name)
    }

    /// Remove a velocity generator by name.
    pub fn remove_velocity_generator(
        &mut self,
        name: &str,
    ) -> Result<BoxedGenerator<Vector6>, RegistryError> {
        self.velocity_generators.remove(name)
    }

    /// Remove a torque generator by name.
    pub fn remove_torque_generator(
        &mut self,
        name: &str,
    ) -> Result<BoxedGenerator<JointVector>, RegistryError> {
        self.torque_generators.remove(name)
    }

    /// Remove a joint-velocity generator by name.
    pub fn remove_joint_velocity_generator(
        &mut self,
        name: &str,
    ) -> Result<BoxedGenerator<JointVector>, RegistryError> {
        self.joint_velocity_generators.remove(name)
    }

    // ── Registry access (lookup, activation, logging iteration) ────

    /// The constraint registry.
    pub fn constraints(&self) -> &ConstraintRegistry {
        &self.constraints
    }

    /// The constraint registry, mutably (activation, lookup).
    pub fn constraints_mut(&mut self) -> &mut ConstraintRegistry {
        &mut self.constraints
    }

    /// The force generator registry.
    pub fn force_generators(&self) -> &TaskGeneratorRegistry {
        &self.force_generators
    }

    /// The force generator registry, mutably.
    pub fn force_generators_mut(&mut self) -> &mut TaskGeneratorRegistry {
        &mut self.force_generators
    }

    /// The velocity generator registry.
    pub fn velocity_generators(&self) -> &TaskGeneratorRegistry {
        &self.velocity_generators
    }

    /// The velocity generator registry, mutably.
    pub fn velocity_generators_mut(&mut self) -> &mut TaskGeneratorRegistry {
        &mut self.velocity_generators
    }

    /// The torque generator registry.
    pub fn torque_generators(&self) -> &JointGeneratorRegistry {
        &self.torque_generators
    }

    /// The torque generator registry, mutably.
    pub fn torque_generators_mut(&mut self) -> &mut JointGeneratorRegistry {
        &mut self.torque_generators
    }

    /// The joint-velocity generator registry.
    pub fn joint_velocity_generators(&self) -> &JointGeneratorRegistry {
        &self.joint_velocity_generators
    }

    /// The joint-velocity generator registry, mutably.
    pub fn joint_velocity_generators_mut(&mut self) -> &mut JointGeneratorRegistry {
        &mut self.joint_velocity_generators
    }

    // ── Per-cycle arbitration ───────────────────────────────────────

    /// Run one arbitration cycle.
    ///
    /// Reads the measured state from `robot`, writes the sums, totals, the
    /// commanded velocities, and the global scaling factor back into it, and
    /// refreshes every registry's cached last value.
    pub fn update(&mut self, robot: &mut Robot) {
        let joint_count = robot.joint_count();

        // 1-2. Sum generator contributions.
        let force_sum = sum_task(&mut self.force_generators, robot);
        let torque_sum = sum_joint(&mut self.torque_generators, robot, joint_count);
        let velocity_sum = sum_task(&mut self.velocity_generators, robot);
        let joint_velocity_sum = sum_joint(&mut self.joint_velocity_generators, robot, joint_count);

        // 3. Admittance relation: force contributions become velocity through
        //    the inverse damping, and vice versa for the total wrench.
        let total_velocity = velocity_sum + robot.task.damping_inverse() * force_sum;
        let total_force = force_sum + robot.task.damping() * velocity_sum;
        let joint_total_velocity =
            &joint_velocity_sum + torque_sum.component_mul(robot.joint.damping_reciprocal());
        let joint_total_torque =
            &torque_sum + joint_velocity_sum.component_mul(robot.joint.damping());

        // 4. Store the pre-scale candidates; constraints observe these.
        robot.task.force_sum = force_sum;
        robot.task.velocity_sum = velocity_sum;
        robot.task.total_velocity = total_velocity;
        robot.task.total_force = total_force;
        robot.joint.torque_sum = torque_sum;
        robot.joint.velocity_sum = joint_velocity_sum;
        robot.joint.total_velocity = joint_total_velocity;
        robot.joint.total_torque = joint_total_torque;

        // 5-6. Evaluate constraints and combine the factors.
        let mut minimum = 1.0_f64;
        let mut minimum_idx = None;
        let mut product = 1.0_f64;
        let mut smallest_mult = 1.0_f64;
        let mut smallest_mult_idx = None;

        for (idx, entry) in self.constraints.entries_mut().enumerate() {
            if !entry.active {
                continue;
            }
            let factor = entry.component.compute(robot);
            entry.last_value = factor;
            match entry.component.kind() {
                ConstraintKind::Minimum => {
                    if factor < minimum {
                        minimum = factor;
                        minimum_idx = Some(idx);
                    }
                }
                ConstraintKind::Multiplicative => {
                    product *= factor;
                    if factor < smallest_mult {
                        smallest_mult = factor;
                        smallest_mult_idx = Some(idx);
                    }
                }
            }
        }
        let scale = minimum.min(product);

        // 7-8. Apply the same scale to both spaces and store the outputs.
        robot.task.velocity_command = robot.task.total_velocity * scale;
        robot.joint.velocity_command = &robot.joint.total_velocity * scale;
        robot.scaling_factor = scale;

        // 9. Diagnostics only: name the constraint that drove the minimum.
        if self.verbose && scale < 1.0 {
            let driver_idx = if minimum <= product {
                minimum_idx
            } else {
                smallest_mult_idx
            };
            if let Some(idx) = driver_idx {
                if let Some((name, _, factor)) = self.constraints.iter().nth(idx) {
                    warn!(
                        scale,
                        factor = *factor,
                        constraint = name,
                        "velocity command limited by constraint"
                    );
                }
            }
        }
    }
}

impl Default for SafetyController {
    fn default() -> Self {
        Self::new()
    }
}

/// Sum active control-point generators, caching each last value.
fn sum_task(registry: &mut TaskGeneratorRegistry, robot: &Robot) -> Vector6 {
    let mut total = Vector6::zeros();
    for entry in registry.entries_mut() {
        if !entry.active {
            continue;
        }
        let value = entry.component.compute(robot);
        total += value;
        entry.last_value = value;
    }
    total
}

/// Sum active joint-space generators, caching each last value.
///
/// A contribution whose length differs from the joint count breaks the
/// component's dimensional contract; it is cached for inspection but left
/// out of the sum.
fn sum_joint(
    registry: &mut JointGeneratorRegistry,
    robot: &Robot,
    joint_count: usize,
) -> JointVector {
    let mut total = JointVector::zeros(joint_count);
    for entry in registry.entries_mut() {
        if !entry.active {
            continue;
        }
        let value = entry.component.compute(robot);
        debug_assert_eq!(value.len(), joint_count, "joint generator dimension");
        if value.len() == joint_count {
            total += &value;
        } else {
            tracing::error!(
                generator = entry.name.as_str(),
                expected = joint_count,
                actual = value.len(),
                "joint generator output has wrong dimension; skipped"
            );
        }
        entry.last_value = value;
    }
    total
}
