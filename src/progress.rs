//! Pipeline step spinners, with log output routed above them.

use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::io::{self, Write};
use std::sync::OnceLock;
use std::time::Duration;
use tracing_subscriber::fmt::MakeWriter;

static MULTI_PROGRESS: OnceLock<MultiProgress> = OnceLock::new();

fn multi_progress() -> &'static MultiProgress {
    MULTI_PROGRESS.get_or_init(|| {
        let mp = MultiProgress::new();
        mp.set_draw_target(ProgressDrawTarget::stderr_with_hz(10));
        mp
    })
}

/// A spinner for one pipeline step ("Downloading CC-CEDICT Dictionary", ...)
pub struct Step {
    bar: ProgressBar,
    message: String,
}

impl Step {
    pub fn start(message: impl Into<String>) -> Self {
        let message = message.into();
        let bar = multi_progress().add(ProgressBar::new_spinner());
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan.bold} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_message(message.clone());
        bar.enable_steady_tick(Duration::from_millis(100));
        Self { bar, message }
    }

    /// Update the trailing detail shown after the step message
    pub fn detail(&self, detail: impl std::fmt::Display) {
        self.bar.set_message(format!("{} ({})", self.message, detail));
    }

    pub fn ok(self) {
        self.bar.finish_with_message(format!("✓ {}", self.message));
    }

    pub fn fail(self) {
        self.bar.abandon_with_message(format!("✗ {}", self.message));
    }
}

/// Run `f` under a spinner, marking it failed if `f` errors
pub fn with_step<T, E>(
    message: impl Into<String>,
    f: impl FnOnce(&Step) -> Result<T, E>,
) -> Result<T, E> {
    let step = Step::start(message);
    match f(&step) {
        Ok(value) => {
            step.ok();
            Ok(value)
        }
        Err(e) => {
            step.fail();
            Err(e)
        }
    }
}

#[derive(Default, Clone)]
pub struct LogWriterFactory;

/// Buffers a log record and prints it line by line above the spinners
pub struct LogWriter {
    buffer: String,
}

impl LogWriter {
    fn new() -> Self {
        Self {
            buffer: String::new(),
        }
    }

    fn emit(line: &str) {
        let _ = multi_progress().println(line.trim_end_matches('\r'));
    }
}

impl Write for LogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.push_str(&String::from_utf8_lossy(buf));

        while let Some(idx) = self.buffer.find('\n') {
            Self::emit(&self.buffer[..idx]);
            self.buffer.drain(..idx + 1);
        }

        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if !self.buffer.is_empty() {
            Self::emit(self.buffer.trim_end_matches('\n'));
            self.buffer.clear();
        }
        Ok(())
    }
}

impl Drop for LogWriter {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}

impl<'a> MakeWriter<'a> for LogWriterFactory {
    type Writer = LogWriter;

    fn make_writer(&'a self) -> Self::Writer {
        LogWriter::new()
    }
}
