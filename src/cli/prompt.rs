//! Line-based prompt over any reader/writer pair.

use eyre::{Result, WrapErr};
use std::io::{BufRead, Write};

pub struct Prompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Print `label`, read one line and return it trimmed.
    ///
    /// Fails once input is exhausted.
    pub fn ask(&mut self, label: &str) -> Result<String> {
        write!(self.output, "{}", label)?;
        self.output.flush()?;

        let mut line = String::new();
        let read = self.input.read_line(&mut line).wrap_err("Failed to read input")?;
        if read == 0 {
            eyre::bail!("Input closed");
        }
        Ok(line.trim().to_string())
    }

    /// Write `text` followed by a newline.
    pub fn say(&mut self, text: impl AsRef<str>) -> Result<()> {
        writeln!(self.output, "{}", text.as_ref())?;
        Ok(())
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }
}
