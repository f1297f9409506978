use std::io::{BufRead, Write};

use tracing::debug;

use crate::error::InputError;

/// Line-oriented question/answer over any reader/writer pair.
pub struct Prompter<R, W> {
    input: R,
    output: W,
    max_attempts: Option<usize>,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            max_attempts: None,
        }
    }

    /// Give up on a field after `max` invalid answers. `None` retries forever.
    pub fn with_max_attempts(mut self, max: Option<usize>) -> Self {
        self.max_attempts = max;
        self
    }

    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }

    pub fn say(&mut self, line: &str) -> Result<(), InputError> {
        writeln!(self.output, "{}", line)?;
        Ok(())
    }

    pub fn read_line(&mut self, prompt: &str) -> Result<String, InputError> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(InputError::Eof);
        }
        while line.ends_with('\n') || line.ends_with('\r') {
            line.pop();
        }
        Ok(line)
    }

    /// Asks until `parse` accepts the answer, or the attempt limit is hit.
    pub fn ask<T, F>(&mut self, prompt: &str, parse: F) -> Result<T, InputError>
    where
        F: Fn(&str) -> Result<T, InputError>,
    {
        let mut failures = 0;
        loop {
            let line = self.read_line(prompt)?;
            match parse(&line) {
                Ok(value) => return Ok(value),
                Err(err) => {
                    failures += 1;
                    debug!(prompt, failures, "rejected input: {}", err);
                    writeln!(self.output, "Invalid input! {}", err)?;
                    if let Some(max) = self.max_attempts {
                        if failures >= max {
                            return Err(InputError::TooManyAttempts(failures));
                        }
                    }
                }
            }
        }
    }
}
