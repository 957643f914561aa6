//! Confirmation banner and the blocking yes/no read.

use std::io::{self, BufRead, Write};

use crate::config::Settings;
use crate::error::GuardError;
use crate::flags::display_value;

/// Source of confirmation answers.
///
/// Stdin in production; a byte slice or a scripted reader in tests.
pub trait LineReader {
    /// One line with surrounding whitespace trimmed, or `None` at end of stream.
    ///
    /// A final line with no terminating newline is an `UnexpectedEof` error,
    /// not an answer.
    fn read_line(&mut self) -> io::Result<Option<String>>;
}

/// [`LineReader`] over any buffered reader.
pub struct BufLineReader<R> {
    inner: R,
}

impl<R: BufRead> BufLineReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }
}

impl<R: BufRead> LineReader for BufLineReader<R> {
    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.inner.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        if !line.ends_with('\n') {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input ended before a newline",
            ));
        }
        Ok(Some(line.trim().to_string()))
    }
}

/// How hard the prompt pushes back.
#[derive(Debug, Clone, Default)]
pub struct ConfirmPolicy {
    /// Require typing the context name for production contexts.
    pub strict_production: bool,
    /// Case-insensitive substring marking a production context.
    pub production_marker: String,
}

impl ConfirmPolicy {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            strict_production: settings.strict_production,
            production_marker: settings.production_marker.clone(),
        }
    }

    /// True when `context` must be typed back instead of answering yes/no.
    pub fn requires_typed_name(&self, context: Option<&str>) -> bool {
        let Some(context) = context else {
            return false;
        };
        self.strict_production
            && !self.production_marker.is_empty()
            && context
                .to_lowercase()
                .contains(&self.production_marker.to_lowercase())
    }
}

/// Accepts "yes" and "y", ignoring case and surrounding whitespace.
pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "yes" | "y")
}

/// A guarded command about to be confirmed.
#[derive(Debug, Clone, Copy)]
pub struct Confirmation<'a> {
    /// Executable name shown in the reconstructed command line.
    pub tool: &'a str,
    pub args: &'a [String],
    pub context: Option<&'a str>,
    pub namespace: Option<&'a str>,
}

impl Confirmation<'_> {
    /// `<tool> <args joined by single spaces>`.
    pub fn command_line(&self) -> String {
        if self.args.is_empty() {
            self.tool.to_string()
        } else {
            format!("{} {}", self.tool, self.args.join(" "))
        }
    }

    /// Write the warning banner and target details.
    pub fn render<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "⚠️  DANGEROUS COMMAND DETECTED ⚠️")?;
        writeln!(out)?;
        writeln!(out, "You are about to execute: {}", self.command_line())?;
        writeln!(out)?;
        writeln!(out, "Target Details:")?;
        writeln!(out, "  Context:   {}", display_value(self.context))?;
        writeln!(out, "  Namespace: {}", display_value(self.namespace))?;
        writeln!(out)?;
        writeln!(out, "This operation may cause data loss or service disruption.")
    }

    /// Render, prompt, and block on one answer.
    ///
    /// Anything other than an affirmative answer (or, for production
    /// contexts under a strict policy, the exact context name) cancels.
    /// There is no retry.
    pub fn confirm<R, W>(
        &self,
        policy: &ConfirmPolicy,
        input: &mut R,
        out: &mut W,
    ) -> Result<(), GuardError>
    where
        R: LineReader + ?Sized,
        W: Write + ?Sized,
    {
        self.render(out).map_err(GuardError::Output)?;

        let typed_name = policy.requires_typed_name(self.context);
        let prompted = if typed_name {
            write!(
                out,
                "Context '{}' looks like production.\nType the context name to confirm: ",
                display_value(self.context)
            )
        } else {
            write!(out, "Are you sure you want to continue? (yes/no): ")
        };
        prompted
            .and_then(|()| out.flush())
            .map_err(GuardError::Output)?;

        let answer = match input.read_line() {
            Ok(Some(line)) => line,
            Ok(None) => {
                return Err(GuardError::Input(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "input closed before an answer was given",
                )));
            }
            Err(e) => return Err(GuardError::Input(e)),
        };

        let accepted = if typed_name {
            self.context == Some(answer.as_str())
        } else {
            is_affirmative(&answer)
        };

        if !accepted {
            log::info!("confirmation declined for: {}", self.command_line());
            writeln!(out, "Operation cancelled.").map_err(GuardError::Output)?;
            return Err(GuardError::Cancelled);
        }

        writeln!(out, "Proceeding with operation...").map_err(GuardError::Output)?;
        Ok(())
    }
}
