/*!
 * Progress and status reporting for a run.
 *
 * The pipeline never talks to a terminal or a UI directly. It reports through
 * two injected sinks:
 * - `ProgressSink` receives percentages in 0..=100
 * - `LogSink` receives human-readable `StatusLine`s
 *
 * `Reporter` wraps both, clamps progress to 100 and drops values lower than
 * the last one delivered, so every sink sees a non-decreasing sequence.
 */

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

use parking_lot::Mutex;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// Severity attached to a status line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warn,
    Error,
}

/// One human-readable status line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub severity: Severity,
    pub message: String,
}

impl StatusLine {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
        }
    }
}

impl fmt::Display for StatusLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.severity {
            Severity::Info => "[+]",
            Severity::Warn => "[!]",
            Severity::Error => "[ERR]",
        };
        write!(f, "{} {}", tag, self.message)
    }
}

/// Event delivered across the execution boundary
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunEvent {
    Progress(u8),
    Log(StatusLine),
}

/// Receives overall run progress
pub trait ProgressSink: Send + Sync {
    fn progress(&self, percent: u8);
}

/// Receives status lines
pub trait LogSink: Send + Sync {
    fn log(&self, line: StatusLine);
}

/// Cloneable handle the pipeline reports through
#[derive(Clone)]
pub struct Reporter {
    progress: Arc<dyn ProgressSink>,
    log: Arc<dyn LogSink>,
    last_progress: Arc<AtomicU8>,
}

impl Reporter {
    pub fn new(progress: Arc<dyn ProgressSink>, log: Arc<dyn LogSink>) -> Self {
        Self {
            progress,
            log,
            last_progress: Arc::new(AtomicU8::new(0)),
        }
    }

    /// Reporter that forwards every event over an unbounded channel
    pub fn channel() -> (Self, UnboundedReceiver<RunEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let sink = Arc::new(ChannelSink { sender });
        (Self::new(sink.clone(), sink), receiver)
    }

    /// Reporter that records every event in memory
    pub fn recording() -> (Self, Arc<EventRecorder>) {
        let recorder = Arc::new(EventRecorder::default());
        (Self::new(recorder.clone(), recorder.clone()), recorder)
    }

    /// Report progress; values below the last reported one are ignored
    pub fn progress(&self, percent: u8) {
        let percent = percent.min(100);
        let previous = self.last_progress.fetch_max(percent, Ordering::SeqCst);
        if percent > previous {
            self.progress.progress(percent);
        }
    }

    /// Highest progress value reported so far
    pub fn last_progress(&self) -> u8 {
        self.last_progress.load(Ordering::SeqCst)
    }

    pub fn info(&self, message: impl Into<String>) {
        self.log.log(StatusLine::new(Severity::Info, message));
    }

    pub fn warn(&self, message: impl Into<String>) {
        self.log.log(StatusLine::new(Severity::Warn, message));
    }

    pub fn error(&self, message: impl Into<String>) {
        self.log.log(StatusLine::new(Severity::Error, message));
    }
}

struct ChannelSink {
    sender: UnboundedSender<RunEvent>,
}

impl ProgressSink for ChannelSink {
    fn progress(&self, percent: u8) {
        // Receiver gone means nobody is watching anymore
        let _ = self.sender.send(RunEvent::Progress(percent));
    }
}

impl LogSink for ChannelSink {
    fn log(&self, line: StatusLine) {
        let _ = self.sender.send(RunEvent::Log(line));
    }
}

/// In-memory sink keeping every event in arrival order
#[derive(Debug, Default)]
pub struct EventRecorder {
    events: Mutex<Vec<RunEvent>>,
}

impl EventRecorder {
    pub fn progress_values(&self) -> Vec<u8> {
        self.events
            .lock()
            .iter()
            .filter_map(|event| match event {
                RunEvent::Progress(value) => Some(*value),
                RunEvent::Log(_) => None,
            })
            .collect()
    }

    pub fn lines(&self) -> Vec<StatusLine> {
        self.events
            .lock()
            .iter()
            .filter_map(|event| match event {
                RunEvent::Log(line) => Some(line.clone()),
                RunEvent::Progress(_) => None,
            })
            .collect()
    }
}

impl ProgressSink for EventRecorder {
    fn progress(&self, percent: u8) {
        self.events.lock().push(RunEvent::Progress(percent));
    }
}

impl LogSink for EventRecorder {
    fn log(&self, line: StatusLine) {
        self.events.lock().push(RunEvent::Log(line));
    }
}
