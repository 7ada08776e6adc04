//! Per-cycle data logger.
//!
//! Writes one plain-text log file per recorded signal: each
//! [`log_controller`](DataLogger::log_controller) call appends, for every
//! registry entry, a line `time<TAB>value...` to `log_<name>.txt` in the
//! target directory. Optional extras: a gnuplot companion file per signal,
//! and delayed disk writes (lines buffered in memory, flushed on
//! [`flush`](DataLogger::flush) or drop) to keep file I/O out of the control
//! cycle.
//!
//! The logger only reads the registries' cached last values through the
//! public iteration contract; it never triggers recomputation.

use std::collections::HashMap;
use std::fmt::Write as _;
use std::fs::File;
use std::io::Write as _;
use std::path::PathBuf;

use thiserror::Error;

use crate::controller::SafetyController;
use crate::robot::Robot;

/// Logging errors: file creation and disk writes.
#[derive(Debug, Error)]
pub enum LogError {
    /// Failed to create or write a log file.
    #[error("log I/O error on {path}: {source}")]
    Io {
        /// The affected path.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

struct LogFile {
    file: File,
    path: String,
    /// In-memory buffer when delayed writes are enabled.
    buffer: Option<String>,
}

/// Writes per-cycle registry values and robot outputs to log files.
pub struct DataLogger {
    directory: PathBuf,
    create_gnuplot_files: bool,
    delay_disk_write: bool,
    files: HashMap<String, LogFile>,
}

impl DataLogger {
    /// Create a logger writing into `directory` (created if missing).
    pub fn new(directory: impl Into<PathBuf>) -> Result<Self, LogError> {
        let directory = directory.into();
        std::fs::create_dir_all(&directory).map_err(|source| LogError::Io {
            path: directory.display().to_string(),
            source,
        })?;
        Ok(Self {
            directory,
            create_gnuplot_files: false,
            delay_disk_write: false,
            files: HashMap::new(),
        })
    }

    /// Also emit a `.gnuplot` companion file per signal.
    pub fn with_gnuplot_files(mut self, enabled: bool) -> Self {
        self.create_gnuplot_files = enabled;
        self
    }

    /// Buffer lines in memory and write them on flush/drop instead of per
    /// cycle.
    pub fn with_delayed_write(mut self, enabled: bool) -> Self {
        self.delay_disk_write = enabled;
        self
    }

    /// Log every registry's `(name, last_value)` pairs at `time`.
    ///
    /// Signal names are prefixed by their registry kind so the same
    /// component name may appear in several registries without the files
    /// colliding.
    pub fn log_controller(
        &mut self,
        time: f64,
        controller: &SafetyController,
    ) -> Result<(), LogError> {
        // Collect first: writing borrows `self` mutably.
        let mut rows: Vec<(String, Vec<f64>)> = Vec::new();
        for (name, _, value) in controller.constraints().iter() {
            rows.push((format!("constraint_{name}"), vec![*value]));
        }
        for (name, _, value) in controller.force_generators().iter() {
            rows.push((format!("force_{name}"), value.iter().copied().collect()));
        }
        for (name, _, value) in controller.velocity_generators().iter() {
            rows.push((format!("velocity_{name}"), value.iter().copied().collect()));
        }
        for (name, _, value) in controller.torque_generators().iter() {
            rows.push((format!("torque_{name}"), value.iter().copied().collect()));
        }
        for (name, _, value) in controller.joint_velocity_generators().iter() {
            rows.push((
                format!("joint_velocity_{name}"),
                value.iter().copied().collect(),
            ));
        }
        for (name, values) in rows {
            self.log_values(time, &name, &values)?;
        }
        Ok(())
    }

    /// Log the robot's per-cycle outputs at `time`.
    pub fn log_robot(&mut self, time: f64, robot: &Robot) -> Result<(), LogError> {
        let task_rows: [(&str, Vec<f64>); 5] = [
            ("external_force", robot.task.external_force.iter().copied().collect()),
            ("total_velocity", robot.task.total_velocity.iter().copied().collect()),
            ("total_force", robot.task.total_force.iter().copied().collect()),
            (
                "velocity_command",
                robot.task.velocity_command.iter().copied().collect(),
            ),
            (
                "joint_velocity_command",
                robot.joint.velocity_command.iter().copied().collect(),
            ),
        ];
        for (name, values) in task_rows {
            self.log_values(time, name, &values)?;
        }
        self.log_values(time, "scaling_factor", &[robot.scaling_factor])
    }

    /// Append one line `time<TAB>values...` to the signal's log file.
    pub fn log_values(&mut self, time: f64, name: &str, values: &[f64]) -> Result<(), LogError> {
        if !self.files.contains_key(name) {
            let log = self.create_log(name, values.len())?;
            self.files.insert(name.to_string(), log);
        }
        let log = self.files.get_mut(name).expect("entry inserted above");

        let mut line = String::new();
        let _ = write!(line, "{time:.6}");
        for v in values {
            let _ = write!(line, "\t{v:.6}");
        }
        line.push('\n');

        match &mut log.buffer {
            Some(buffer) => {
                buffer.push_str(&line);
                Ok(())
            }
            None => log.file.write_all(line.as_bytes()).map_err(|source| LogError::Io {
                path: log.path.clone(),
                source,
            }),
        }
    }

    /// Write any buffered data to disk and flush the files.
    pub fn flush(&mut self) -> Result<(), LogError> {
        for log in self.files.values_mut() {
            if let Some(buffer) = &mut log.buffer {
                log.file
                    .write_all(buffer.as_bytes())
                    .map_err(|source| LogError::Io {
                        path: log.path.clone(),
                        source,
                    })?;
                buffer.clear();
            }
            log.file.flush().map_err(|source| LogError::Io {
                path: log.path.clone(),
                source,
            })?;
        }
        Ok(())
    }

    fn create_log(&self, name: &str, value_count: usize) -> Result<LogFile, LogError> {
        let stem = format!("log_{}", name.replace(' ', "_"));
        let path = self.directory.join(format!("{stem}.txt"));
        let path_str = path.display().to_string();
        let file = File::create(&path).map_err(|source| LogError::Io {
            path: path_str.clone(),
            source,
        })?;

        if self.create_gnuplot_files {
            self.write_gnuplot_file(&stem, name, value_count)?;
        }

        Ok(LogFile {
            file,
            path: path_str,
            buffer: self.delay_disk_write.then(String::new),
        })
    }

    fn write_gnuplot_file(
        &self,
        stem: &str,
        name: &str,
        value_count: usize,
    ) -> Result<(), LogError> {
        let path = self.directory.join(format!("{stem}.gnuplot"));
        let mut script = String::from("plot ");
        for i in 0..value_count.max(1) {
            let title = if value_count > 1 {
                format!("{name} {}", i + 1)
            } else {
                name.to_string()
            };
            let _ = write!(
                script,
                "\"{stem}.txt\" using 1:{} title '{title}' with lines",
                i + 2
            );
            script.push_str(if i + 1 == value_count.max(1) { "\n" } else { ", " });
        }
        std::fs::write(&path, script).map_err(|source| LogError::Io {
            path: path.display().to_string(),
            source,
        })
    }
}

impl Drop for DataLogger {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}
