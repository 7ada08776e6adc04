//! End-to-end arbitration scenarios exercising the public crate surface:
//! configuration, registries, built-in constraints, proxies, and the
//! per-cycle update.

use cobot_core::config::ControllerConfig;
use cobot_core::constraint::{
    ConstraintKind, DefaultConstraint, PowerConstraint, StopConstraint, VelocityConstraint,
};
use cobot_core::generator::{shared_vector6, ExternalForce, ForceProxy, VelocityProxy};
use cobot_core::spatial::{JointVector, Matrix6, Vector6};
use cobot_core::{RegistryError, Robot, SafetyController};

fn twist_x(v: f64) -> Vector6 {
    Vector6::from_column_slice(&[v, 0.0, 0.0, 0.0, 0.0, 0.0])
}

#[test]
fn passthrough_with_default_constraint() {
    let mut robot = Robot::new("arm", 6);
    let mut controller = SafetyController::new();
    controller
        .add_constraint("default", DefaultConstraint::new(ConstraintKind::Minimum))
        .unwrap();
    controller
        .add_velocity_generator("feed", |_: &Robot| twist_x(0.2))
        .unwrap();

    controller.update(&mut robot);

    assert_eq!(robot.scaling_factor, 1.0);
    assert_eq!(robot.task.velocity_command, twist_x(0.2));
}

#[test]
fn velocity_limit_caps_the_command_norm() {
    let mut robot = Robot::new("arm", 6);
    let mut controller = SafetyController::new();
    controller
        .add_constraint("velocity_limit", VelocityConstraint::new(0.1).unwrap())
        .unwrap();
    controller
        .add_velocity_generator("feed", |_: &Robot| twist_x(0.4))
        .unwrap();

    controller.update(&mut robot);

    assert!((robot.scaling_factor - 0.25).abs() < 1e-12);
    assert!((robot.task.velocity_command.norm() - 0.1).abs() < 1e-12);
}

#[test]
fn admittance_yields_to_a_proxied_force() {
    let mut robot = Robot::new("arm", 6);
    robot
        .set_control_point_damping(Matrix6::identity() * 10.0)
        .unwrap();

    let wrench = shared_vector6(Vector6::zeros());
    let mut controller = SafetyController::new();
    controller
        .add_force_generator("operator", ForceProxy::new(wrench.clone()))
        .unwrap();

    controller.update(&mut robot);
    assert_eq!(robot.task.velocity_command, Vector6::zeros());

    // Operator pushes along x with 5 N; B = 10·I so v = 0.5 m/s.
    *wrench.write() = twist_x(5.0);
    controller.update(&mut robot);
    assert_eq!(robot.task.velocity_command, twist_x(0.5));
}

#[test]
fn power_limit_reacts_to_measured_contact() {
    let mut robot = Robot::new("arm", 6);
    let mut controller = SafetyController::new();
    controller
        .add_constraint("power_limit", PowerConstraint::new(1.0).unwrap())
        .unwrap();
    controller
        .add_velocity_generator("feed", |_: &Robot| twist_x(0.5))
        .unwrap();

    // Opposing measured force: negative exchanged power, no limitation.
    robot.task.external_force = twist_x(-8.0);
    controller.update(&mut robot);
    assert_eq!(robot.scaling_factor, 1.0);

    // Aiding force: p = 8 · 0.5 = 4 W, limit 1 W → scale 0.25.
    robot.task.external_force = twist_x(8.0);
    controller.update(&mut robot);
    assert!((robot.scaling_factor - 0.25).abs() < 1e-12);
    assert_eq!(robot.task.velocity_command, twist_x(0.125));
}

#[test]
fn force_stop_latches_across_cycles() {
    let mut robot = Robot::new("arm", 6);
    let mut controller = SafetyController::new();
    controller
        .add_constraint("force_stop", StopConstraint::new(10.0, 5.0).unwrap())
        .unwrap();
    controller
        .add_velocity_generator("feed", |_: &Robot| twist_x(0.2))
        .unwrap();

    controller.update(&mut robot);
    assert_eq!(robot.task.velocity_command, twist_x(0.2));

    // Contact above the activation threshold halts motion.
    robot.task.external_force = twist_x(12.0);
    controller.update(&mut robot);
    assert_eq!(robot.scaling_factor, 0.0);
    assert_eq!(robot.task.velocity_command, Vector6::zeros());

    // Still latched between the two thresholds.
    robot.task.external_force = twist_x(7.0);
    controller.update(&mut robot);
    assert_eq!(robot.scaling_factor, 0.0);

    // Releases below the deactivation threshold.
    robot.task.external_force = twist_x(4.0);
    controller.update(&mut robot);
    assert_eq!(robot.scaling_factor, 1.0);
    assert_eq!(robot.task.velocity_command, twist_x(0.2));
}

#[test]
fn external_force_generator_drives_compliance() {
    let mut robot = Robot::new("arm", 6);
    robot
        .set_control_point_damping(Matrix6::identity() * 4.0)
        .unwrap();
    let mut controller = SafetyController::new();
    controller
        .add_force_generator("compliance", ExternalForce::new())
        .unwrap();

    robot.task.external_force = twist_x(2.0);
    controller.update(&mut robot);
    assert_eq!(robot.task.velocity_command, twist_x(0.5));
}

#[test]
fn config_built_controller_runs_a_cycle() {
    let config = ControllerConfig::from_toml_str(
        r#"
[damping]
control_point = [10.0, 10.0, 10.0, 10.0, 10.0, 10.0]
joint = [20.0, 20.0, 20.0]

[limits]
velocity = { maximum = 0.1 }
stop = { activation_threshold = 30.0, deactivation_threshold = 10.0 }
"#,
    )
    .unwrap();

    let mut robot = Robot::new("arm", config.joint_count());
    let mut controller = config.build(&mut robot).unwrap();

    let planner = shared_vector6(twist_x(0.3));
    controller
        .add_velocity_generator("planner", VelocityProxy::new(planner))
        .unwrap();

    controller.update(&mut robot);
    assert!((robot.task.velocity_command.norm() - 0.1).abs() < 1e-12);
    assert_eq!(robot.joint.velocity_command.len(), 3);
}

#[test]
fn duplicate_registration_is_rejected_across_the_public_api() {
    let mut controller = SafetyController::new();
    controller
        .add_velocity_generator("feed", |_: &Robot| Vector6::zeros())
        .unwrap();
    let err = controller.add_velocity_generator("feed", |_: &Robot| Vector6::zeros());
    assert_eq!(err, Err(RegistryError::DuplicateName("feed".to_string())));

    // Same name in a different registry is fine.
    controller
        .add_force_generator("feed", |_: &Robot| Vector6::zeros())
        .unwrap();
}

#[test]
fn joint_space_pipeline_scales_with_task_constraints() {
    let mut robot = Robot::new("arm", 2);
    robot
        .set_joint_damping(JointVector::from_column_slice(&[2.0, 2.0]))
        .unwrap();

    let mut controller = SafetyController::new();
    controller
        .add_constraint("velocity_limit", VelocityConstraint::new(0.1).unwrap())
        .unwrap();
    controller
        .add_velocity_generator("feed", |_: &Robot| twist_x(0.2))
        .unwrap();
    controller
        .add_joint_velocity_generator("jog", |_: &Robot| {
            JointVector::from_column_slice(&[1.0, -1.0])
        })
        .unwrap();

    controller.update(&mut robot);

    // Task constraint limits both spaces with the same factor.
    assert!((robot.scaling_factor - 0.5).abs() < 1e-12);
    assert_eq!(
        robot.joint.velocity_command,
        JointVector::from_column_slice(&[0.5, -0.5])
    );
}
