//! Process driver: launch the target and classify its stderr as it arrives
//!
//! State flow: `NotStarted → Running → Draining → Exited`. The driver keeps
//! reading after the child's exit status becomes available and only
//! declares `Exited` once the pipe reaches end-of-stream, so buffered
//! output written just before exit is never lost.

use crate::anchor::{wall_clock, TimestampSource};
use crate::classifier::Classifier;
use crate::error::{LaunchError, Result};
use crate::launcher::augment_launcher_args;
use crate::output::TimingWriter;
use std::io::{BufRead, BufReader, Write};
use std::process::{Command, ExitStatus, Stdio};

pub const START_LINE: &str = "[general] starting process";
pub const END_LINE: &str = "[general] ended process";

/// Lifecycle of the monitored process as seen by the driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    NotStarted,
    Running,
    /// Child has exited, remaining buffered output is still being read
    Draining,
    Exited,
}

/// Behavior switches for a run
#[derive(Debug, Clone)]
pub struct DriverOptions {
    /// Emit a synthetic milestone right after the child is spawned
    pub start_time: bool,
    /// Emit a synthetic milestone after the child's output is drained
    pub end_time: bool,
    /// Extra environment for the child only
    pub environment: Vec<(&'static str, String)>,
}

impl Default for DriverOptions {
    fn default() -> Self {
        Self {
            start_time: true,
            end_time: false,
            environment: Vec::new(),
        }
    }
}

/// Outcome of a completed run
#[derive(Debug, Clone, Copy)]
pub struct RunSummary {
    pub status: ExitStatus,
    pub records: usize,
    pub passed_through: usize,
}

/// Runs one target process through the classifier
///
/// Timing records go to `timing`; stderr lines that produce no record are
/// copied verbatim, terminator included, to `passthrough`.
#[derive(Debug)]
pub struct ProcessDriver<W: Write, P: Write> {
    classifier: Classifier,
    timing: TimingWriter<W>,
    passthrough: P,
    options: DriverOptions,
    state: DriverState,
    passed_through: usize,
}

impl<W: Write, P: Write> ProcessDriver<W, P> {
    pub fn new(
        classifier: Classifier,
        timing: TimingWriter<W>,
        passthrough: P,
        options: DriverOptions,
    ) -> Self {
        Self {
            classifier,
            timing,
            passthrough,
            options,
            state: DriverState::NotStarted,
            passed_through: 0,
        }
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    /// Spawn `command` and block until its stderr is drained and it exits
    ///
    /// # Errors
    /// Fails before producing any output when the command is empty or
    /// cannot be spawned. Write failures on either sink abort the run.
    pub fn run(&mut self, command: &[String]) -> Result<RunSummary> {
        let mut command = command.to_vec();
        augment_launcher_args(&mut command);
        let (program, args) = command.split_first().ok_or(LaunchError::EmptyCommand)?;

        let spawn_time = wall_clock();
        let mut child = Command::new(program)
            .args(args)
            .envs(self.options.environment.iter().map(|(k, v)| (*k, v.as_str())))
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| LaunchError::Spawn {
                program: program.clone(),
                source,
            })?;
        let stderr = child.stderr.take().ok_or_else(|| LaunchError::MissingPipe {
            program: program.clone(),
        })?;

        self.state = DriverState::Running;
        tracing::debug!("Spawned {} (pid {})", program, child.id());

        if self.options.start_time {
            self.emit_synthetic(START_LINE, spawn_time)?;
        }

        let mut reader = BufReader::new(stderr);
        let mut buf = Vec::new();
        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            let captured = wall_clock();
            self.handle_line(&buf, captured)?;

            if self.state == DriverState::Running {
                if let Some(status) = child.try_wait()? {
                    tracing::debug!("Child exited with {}, draining output", status);
                    self.state = DriverState::Draining;
                }
            }
        }

        self.state = DriverState::Draining;
        let status = child.wait()?;
        self.state = DriverState::Exited;
        tracing::debug!("Child output drained, exit status {}", status);

        if self.options.end_time {
            self.emit_synthetic(END_LINE, wall_clock())?;
        }

        Ok(RunSummary {
            status,
            records: self.timing.records(),
            passed_through: self.passed_through,
        })
    }

    /// Classify one raw line; unmatched bytes go to the passthrough sink
    fn handle_line(&mut self, raw: &[u8], captured: f64) -> Result<()> {
        let text = String::from_utf8_lossy(raw);
        let line = text.trim_end();
        match self
            .classifier
            .classify(line, TimestampSource::Captured(captured))
        {
            Some(record) => self.timing.write_record(&record)?,
            None => {
                self.passthrough.write_all(raw)?;
                self.passthrough.flush()?;
                self.passed_through += 1;
            }
        }
        Ok(())
    }

    /// Push a driver-generated line through the full pipeline
    fn emit_synthetic(&mut self, line: &str, timestamp: f64) -> Result<()> {
        match self
            .classifier
            .classify(line, TimestampSource::Captured(timestamp))
        {
            Some(record) => self.timing.write_record(&record)?,
            None => tracing::debug!("No recognizer for synthetic line '{}'", line),
        }
        Ok(())
    }

    pub fn into_parts(self) -> (Classifier, TimingWriter<W>, P) {
        (self.classifier, self.timing, self.passthrough)
    }
}
