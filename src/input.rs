// Line input used by the menus. On a real terminal we let `dialoguer` draw
// the prompt and read the answer; when stdin is piped (or in tests) plain
// line reading from any `BufRead` does the same job.

use anyhow::{Context, Result};
use dialoguer::Input;
use std::io::{self, BufRead, Write};

/// Source of operator answers. `Ok(None)` means input is exhausted.
pub trait LineInput {
    fn read_line(&mut self, label: &str) -> Result<Option<String>>;
}

/// Interactive prompt on the terminal (drawn on stderr by `dialoguer`).
pub struct TerminalInput;

impl LineInput for TerminalInput {
    fn read_line(&mut self, label: &str) -> Result<Option<String>> {
        let answer = Input::<String>::new()
            .with_prompt(label)
            .allow_empty(true)
            .interact_text();
        match answer {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Ok(None),
            Err(e) => Err(e).context("Failed to read from terminal"),
        }
    }
}

/// Reads answers line by line, echoing the prompt label to `echo`.
pub struct ReaderInput<R, W> {
    reader: R,
    echo: W,
}

impl<R: BufRead, W: Write> ReaderInput<R, W> {
    pub fn new(reader: R, echo: W) -> Self {
        ReaderInput { reader, echo }
    }
}

impl<R: BufRead, W: Write> LineInput for ReaderInput<R, W> {
    fn read_line(&mut self, label: &str) -> Result<Option<String>> {
        write!(self.echo, "{}: ", label)?;
        self.echo.flush()?;

        let mut line = String::new();
        let read = self
            .reader
            .read_line(&mut line)
            .context("Failed to read input")?;
        if read == 0 {
            return Ok(None);
        }
        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }
}
