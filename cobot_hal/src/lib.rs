//! # Cobot Hardware Abstraction Layer
//!
//! Connects the arbitration engine in [`cobot_core`] to an actual (or
//! simulated) robot. A [`Driver`](driver::Driver) owns the transport to one
//! robot: it fills the measured fields of the [`Robot`](cobot_core::Robot)
//! state before each cycle and pushes the commanded velocity after it. The
//! [`ControlLoop`](cycle::ControlLoop) sequences read → arbitrate → send at
//! the driver's sample time.
//!
//! Drivers are created by name through the [`DriverRegistry`](registry::DriverRegistry),
//! each from its own TOML parameter table. The crate ships one backend, the
//! kinematic [`SimDriver`](sim::SimDriver).

pub mod cycle;
pub mod driver;
pub mod registry;
pub mod sim;

pub use cycle::{ControlLoop, CycleStats};
pub use driver::{Driver, DriverError};
pub use registry::DriverRegistry;
pub use sim::SimDriver;
