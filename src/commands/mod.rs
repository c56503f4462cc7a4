//! Command handlers.
//!
//! Each handler writes its report through a [`Console`] and returns the
//! process exit status; `main` only parses arguments and dispatches.

pub mod config;
pub mod network;
pub mod stats;

use std::io::{self, Write};

/// Successful run (including "no data found").
pub const EXIT_SUCCESS: u8 = 0;
/// Validation, credential, endpoint or unexpected failure.
pub const EXIT_FAILURE: u8 = 1;

/// Output sinks for a command: reports on `out`, diagnostics on `err`.
pub struct Console<'a> {
    out: &'a mut dyn Write,
    err: &'a mut dyn Write,
}

impl<'a> Console<'a> {
    pub fn new(out: &'a mut dyn Write, err: &'a mut dyn Write) -> Self {
        Self { out, err }
    }

    /// Write command output, adding a trailing newline if missing.
    pub fn print(&mut self, text: &str) -> io::Result<()> {
        self.out.write_all(text.as_bytes())?;
        if !text.ends_with('\n') {
            self.out.write_all(b"\n")?;
        }
        self.out.flush()
    }

    pub fn error(&mut self, message: &str) {
        let _ = writeln!(self.err, "Error: {}", message);
    }

    pub fn warning(&mut self, message: &str) {
        let _ = writeln!(self.err, "Warning: {}", message);
    }

    /// Indented follow-up line under an error or warning.
    pub fn hint(&mut self, message: &str) {
        let _ = writeln!(self.err, "  {}", message);
    }
}
