//! # Cobot HAL Binary
//!
//! Runs the safety controller against a configured driver backend.
//!
//! # Usage
//!
//! ```bash
//! # Run the simulation backend for 5000 cycles
//! cobot_hal --config config/session.toml --cycles 5000
//!
//! # Unbounded run (stop with Ctrl-C), verbose logs
//! cobot_hal --config config/session.toml -v
//!
//! # Write per-cycle data logs
//! cobot_hal --config config/session.toml --log-dir /tmp/cobot_logs
//! ```

#![deny(warnings)]

use std::path::PathBuf;
use std::sync::atomic::Ordering;
use std::time::Duration;

use clap::Parser;
use cobot_core::config::ControllerConfig;
use cobot_core::error::ConfigError;
use cobot_core::logger::DataLogger;
use cobot_core::Robot;
use cobot_hal::cycle::ControlLoop;
use cobot_hal::registry::DriverRegistry;
use serde::Deserialize;
use tracing::{error, info, warn, Level};
use tracing_subscriber::EnvFilter;

/// Cobot HAL - safety-controlled robot session runner
#[derive(Parser, Debug)]
#[command(name = "cobot_hal")]
#[command(version)]
#[command(about = "Runs the cobot safety controller against a driver backend")]
#[command(long_about = None)]
struct Args {
    /// Path to the session configuration file (TOML).
    #[arg(short, long, default_value = "/etc/cobot/session.toml")]
    config: PathBuf,

    /// Number of control cycles to run (unbounded when omitted).
    #[arg(long)]
    cycles: Option<u64>,

    /// Driver init timeout in seconds.
    #[arg(long, default_value_t = 5.0)]
    init_timeout: f64,

    /// Directory for per-cycle data logs (disabled when omitted).
    #[arg(long, value_name = "DIR")]
    log_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long)]
    json: bool,
}

/// Robot section of the session file.
#[derive(Debug, Deserialize)]
struct RobotSection {
    /// Robot name, for logs only.
    name: String,
}

/// Driver section of the session file.
#[derive(Debug, Deserialize)]
struct DriverSection {
    /// Registered backend name.
    name: String,
    /// Backend-specific parameter table.
    #[serde(default)]
    params: Option<toml::Value>,
}

/// Complete session configuration.
#[derive(Debug, Deserialize)]
struct SessionConfig {
    robot: RobotSection,
    controller: ControllerConfig,
    driver: DriverSection,
}

impl SessionConfig {
    fn load(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config: Self = toml::from_str(&content)?;
        config.controller.validate()?;
        Ok(config)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    if let Err(e) = run() {
        error!("session failed: {e}");
        std::process::exit(1);
    }
    Ok(())
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    setup_tracing(&args);

    info!("Cobot HAL v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = SessionConfig::load(&args.config)?;
    info!(
        robot = %config.robot.name,
        driver = %config.driver.name,
        joints = config.controller.joint_count(),
        "session configuration loaded"
    );

    let mut robot = Robot::new(&config.robot.name, config.controller.joint_count());
    let controller = config.controller.build(&mut robot)?;

    let registry = DriverRegistry::with_defaults();
    let params = config
        .driver
        .params
        .unwrap_or_else(|| toml::Value::Table(toml::map::Map::new()));
    let driver = registry.create(&config.driver.name, &params)?;

    let mut logger = match &args.log_dir {
        Some(dir) => Some(DataLogger::new(dir)?.with_delayed_write(true)),
        None => None,
    };

    let mut control = ControlLoop::new(driver, controller, robot);

    let running = control.running_flag();
    ctrlc::set_handler(move || {
        info!("Received shutdown signal");
        running.store(false, Ordering::SeqCst);
    })?;

    control.init(Duration::from_secs_f64(args.init_timeout))?;

    let result = control.run_with(args.cycles, |time, robot, controller| {
        if let Some(logger) = &mut logger {
            if let Err(e) = logger.log_robot(time, robot) {
                warn!("data logging failed: {e}");
            } else if let Err(e) = logger.log_controller(time, controller) {
                warn!("data logging failed: {e}");
            }
        }
    });
    if let Err(e) = result {
        error!("control loop error: {e}");
    }
    control.stop()?;

    if let Some(logger) = &mut logger {
        logger.flush()?;
    }

    let stats = control.stats();
    info!(
        cycles = stats.count(),
        avg_us = stats.average().as_micros() as u64,
        max_us = stats.max().as_micros() as u64,
        "session finished"
    );
    Ok(())
}

/// Setup tracing subscriber based on CLI arguments.
fn setup_tracing(args: &Args) {
    let level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    if args.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
