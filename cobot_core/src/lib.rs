//! # Cobot Safety Control Core
//!
//! Run-time arbitration engine for safe human-robot interaction. Applications
//! register named **generators** (sources of desired force/velocity) and
//! named **constraints** (safety limiters); every control cycle the
//! [`SafetyController`](controller::SafetyController) sums the generator
//! outputs, derives a candidate velocity through an admittance relation, and
//! scales it by the combined constraint factor so that the commanded motion
//! never exceeds the configured velocity, power, or force limits.
//!
//! ## Ownership model
//!
//! [`Robot`](robot::Robot) is the single owner of all live sensor and command
//! values. Drivers write the measured state, the controller writes the sums,
//! totals, and commands. Constraints and generators receive a shared
//! reference to the robot and return fresh values; they never alias into it.
//!
//! ## Real-time contract
//!
//! The per-cycle path ([`SafetyController::update`](controller::SafetyController::update))
//! is infallible and runs in time linear in the registry sizes. All
//! fallibility (duplicate names, singular damping matrices, invalid
//! thresholds) is surfaced at registration or construction time. The engine
//! is single-threaded and cooperative: registries are mutated between
//! cycles, never during one.

pub mod config;
pub mod constraint;
pub mod controller;
pub mod error;
pub mod generator;
pub mod logger;
pub mod registry;
pub mod robot;
pub mod spatial;

pub use controller::SafetyController;
pub use error::{ConfigError, RegistryError};
pub use robot::Robot;
