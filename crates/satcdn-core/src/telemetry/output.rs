// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Telemetry output backends: a small `Output` trait with console and
//! buffered-file implementations, kept off the hot path — telemetry writes
//! go to a non-blocking sink or a buffered log, never a raw syscall per
//! event.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::sync::Mutex;

/// Destination for a telemetry line. Implementations must be thread-safe.
pub trait Output: Send + Sync {
    fn write_line(&self, line: &str) -> io::Result<()>;
}

/// Writes to stdout. Buffering happens at the OS line-discipline level;
/// suitable for interactive runs and tests.
pub struct ConsoleOutput;

impl Output for ConsoleOutput {
    fn write_line(&self, line: &str) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{line}")
    }
}

/// Writes to a file through a `BufWriter`, so individual telemetry events
/// never block on a syscall. Flushed on drop.
pub struct FileOutput {
    writer: Mutex<BufWriter<File>>,
}

impl FileOutput {
    pub fn create(path: &std::path::Path) -> io::Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            writer: Mutex::new(BufWriter::new(file)),
        })
    }

    pub fn flush(&self) -> io::Result<()> {
        self.writer.lock().unwrap().flush()
    }
}

impl Output for FileOutput {
    fn write_line(&self, line: &str) -> io::Result<()> {
        let mut w = self.writer.lock().unwrap();
        writeln!(w, "{line}")
    }
}

impl Drop for FileOutput {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}
