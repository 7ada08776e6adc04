//! The driver contract.
//!
//! A driver owns the transport to one robot. Its lifecycle is
//! `init` → `start` → (`read` / `send` per cycle) → `stop`; `read` fills the
//! measured fields of the robot state, `send` pushes the commanded velocity,
//! and `sample_time` fixes the control period the loop paces itself to.

use std::time::{Duration, Instant};

use cobot_core::Robot;
use thiserror::Error;

/// Driver and driver-registry errors.
#[derive(Debug, Error)]
pub enum DriverError {
    /// No full state update arrived within the init timeout.
    #[error("driver initialization timed out after {0:?}")]
    InitTimeout(Duration),
    /// Transport-level failure talking to the robot.
    #[error("robot communication failed: {0}")]
    Communication(String),
    /// Malformed or out-of-range driver parameters.
    #[error("invalid driver configuration: {0}")]
    InvalidConfig(String),
    /// No factory registered under this name.
    #[error("unknown driver '{0}'")]
    UnknownDriver(String),
    /// A factory is already registered under this name.
    #[error("driver '{0}' is already registered")]
    DuplicateDriver(String),
}

/// Transport to one robot.
///
/// `read` and `send` are the per-cycle half of the contract and should avoid
/// blocking beyond the transport's natural latency; everything fallible and
/// slow belongs in `init`/`start`.
pub trait Driver: Send {
    /// Begin sending commands. Called once, after [`init`](Driver::init).
    fn start(&mut self) -> Result<(), DriverError>;

    /// Stop the robot and release the transport.
    fn stop(&mut self) -> Result<(), DriverError>;

    /// Fill the measured fields of `robot` from the hardware.
    fn read(&mut self, robot: &mut Robot) -> Result<(), DriverError>;

    /// Push the commanded velocities from `robot` to the hardware.
    fn send(&mut self, robot: &Robot) -> Result<(), DriverError>;

    /// Control period in seconds. Constant for the driver's lifetime.
    fn sample_time(&self) -> f64;

    /// Wait for a first complete state update.
    ///
    /// The default retries [`read`](Driver::read) once per sample period
    /// until it succeeds or `timeout` elapses. Drivers with a real handshake
    /// override this.
    fn init(&mut self, robot: &mut Robot, timeout: Duration) -> Result<(), DriverError> {
        let deadline = Instant::now() + timeout;
        let period = Duration::from_secs_f64(self.sample_time());
        loop {
            if self.read(robot).is_ok() {
                return Ok(());
            }
            if Instant::now() + period > deadline {
                return Err(DriverError::InitTimeout(timeout));
            }
            std::thread::sleep(period);
        }
    }
}
