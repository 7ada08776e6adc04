//! The control loop: read → arbitrate → send, paced to the driver's sample
//! time.
//!
//! The loop owns the driver, the controller, and the robot state for one
//! session. A shared running flag allows a signal handler to request a clean
//! stop between cycles.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use cobot_core::{Robot, SafetyController};
use tracing::{debug, info};

use crate::driver::{Driver, DriverError};

/// Wall-clock statistics over executed cycles.
#[derive(Debug, Clone, Copy, Default)]
pub struct CycleStats {
    count: u64,
    last: Duration,
    min: Duration,
    max: Duration,
    total: Duration,
}

impl CycleStats {
    fn record(&mut self, elapsed: Duration) {
        self.last = elapsed;
        self.min = if self.count == 0 {
            elapsed
        } else {
            self.min.min(elapsed)
        };
        self.max = self.max.max(elapsed);
        self.total += elapsed;
        self.count += 1;
    }

    /// Number of executed cycles.
    #[inline]
    pub const fn count(&self) -> u64 {
        self.count
    }

    /// Duration of the most recent cycle.
    #[inline]
    pub const fn last(&self) -> Duration {
        self.last
    }

    /// Shortest cycle so far.
    #[inline]
    pub const fn min(&self) -> Duration {
        self.min
    }

    /// Longest cycle so far.
    #[inline]
    pub const fn max(&self) -> Duration {
        self.max
    }

    /// Mean cycle duration, zero before the first cycle.
    pub fn average(&self) -> Duration {
        if self.count == 0 {
            Duration::ZERO
        } else {
            self.total / self.count as u32
        }
    }
}

/// Sequences one driver, one controller, and one robot state.
pub struct ControlLoop {
    driver: Box<dyn Driver>,
    controller: SafetyController,
    robot: Robot,
    stats: CycleStats,
    running: Arc<AtomicBool>,
}

impl ControlLoop {
    /// Assemble a loop; call [`init`](ControlLoop::init) before running.
    pub fn new(driver: Box<dyn Driver>, controller: SafetyController, robot: Robot) -> Self {
        Self {
            driver,
            controller,
            robot,
            stats: CycleStats::default(),
            running: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Flag cleared to request a stop; share it with a signal handler.
    pub fn running_flag(&self) -> Arc<AtomicBool> {
        self.running.clone()
    }

    /// Wait for a first state update, then start the driver.
    pub fn init(&mut self, timeout: Duration) -> Result<(), DriverError> {
        self.driver.init(&mut self.robot, timeout)?;
        self.driver.start()?;
        info!(
            robot = self.robot.name(),
            sample_time = self.driver.sample_time(),
            "control loop ready"
        );
        Ok(())
    }

    /// Execute one cycle: read, arbitrate, send.
    pub fn step(&mut self) -> Result<(), DriverError> {
        let started = Instant::now();
        self.driver.read(&mut self.robot)?;
        self.controller.update(&mut self.robot);
        self.driver.send(&self.robot)?;
        self.stats.record(started.elapsed());
        Ok(())
    }

    /// Run cycles paced to the sample time until the count is reached or the
    /// running flag clears.
    ///
    /// `cycles = None` runs until the flag clears. `on_cycle` is invoked
    /// after every cycle with the elapsed session time.
    pub fn run_with<F>(&mut self, cycles: Option<u64>, mut on_cycle: F) -> Result<(), DriverError>
    where
        F: FnMut(f64, &Robot, &SafetyController),
    {
        let period = Duration::from_secs_f64(self.driver.sample_time());
        let mut deadline = Instant::now() + period;
        let mut executed = 0u64;

        while self.running.load(Ordering::SeqCst) {
            if let Some(limit) = cycles {
                if executed >= limit {
                    break;
                }
            }
            self.step()?;
            executed += 1;
            on_cycle(
                executed as f64 * self.driver.sample_time(),
                &self.robot,
                &self.controller,
            );

            let now = Instant::now();
            if deadline > now {
                std::thread::sleep(deadline - now);
            } else {
                debug!(cycle = executed, "cycle overran its period");
            }
            deadline += period;
        }
        Ok(())
    }

    /// [`run_with`](ControlLoop::run_with) without a per-cycle callback.
    pub fn run(&mut self, cycles: Option<u64>) -> Result<(), DriverError> {
        self.run_with(cycles, |_, _, _| {})
    }

    /// Clear the running flag and stop the driver.
    pub fn stop(&mut self) -> Result<(), DriverError> {
        self.running.store(false, Ordering::SeqCst);
        self.driver.stop()
    }

    /// The robot state.
    pub fn robot(&self) -> &Robot {
        &self.robot
    }

    /// The robot state, mutably (setup only, never mid-cycle).
    pub fn robot_mut(&mut self) -> &mut Robot {
        &mut self.robot
    }

    /// The controller.
    pub fn controller(&self) -> &SafetyController {
        &self.controller
    }

    /// The controller, mutably (registration between cycles).
    pub fn controller_mut(&mut self) -> &mut SafetyController {
        &mut self.controller
    }

    /// Cycle timing statistics.
    pub fn stats(&self) -> &CycleStats {
        &self.stats
    }
}
