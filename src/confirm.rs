use std::io::{BufRead, Write};

/// How hard a confirmation should push back.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    /// Reversible in principle (e.g. a delete marker can be purged).
    Caution,
    /// Permanently destroys history.
    Irreversible,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Confirmation {
    pub title: String,
    pub lines: Vec<String>,
    pub severity: Severity,
}

/// Asks the user whether a destructive action may proceed.
///
/// The call suspends the flow that asked; implementations decide how (a
/// terminal prompt, a modal, a fixed answer).
pub trait ConfirmationGate {
    fn request_confirmation(&mut self, confirmation: &Confirmation) -> bool;
}

/// Answers every request with the same value (`--yes`, tests).
#[derive(Clone, Copy, Debug)]
pub struct FixedAnswer(pub bool);

impl ConfirmationGate for FixedAnswer {
    fn request_confirmation(&mut self, _confirmation: &Confirmation) -> bool {
        self.0
    }
}

/// Prompts on a line-oriented reader/writer pair; only `y`/`yes` confirms.
pub struct PromptGate<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> PromptGate<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl PromptGate<std::io::StdinLock<'static>, std::io::Stderr> {
    pub fn stdio() -> Self {
        Self::new(std::io::stdin().lock(), std::io::stderr())
    }
}

impl<R: BufRead, W: Write> ConfirmationGate for PromptGate<R, W> {
    fn request_confirmation(&mut self, confirmation: &Confirmation) -> bool {
        let _ = writeln!(self.output, "{}", confirmation.title);
        for line in &confirmation.lines {
            let _ = writeln!(self.output, "  {}", line);
        }
        let _ = write!(self.output, "Proceed? [y/N] ");
        let _ = self.output.flush();

        let mut answer = String::new();
        if self.input.read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
    }
}

#[cfg(test)]
#[path = "tests/confirm_tests.rs"]
mod tests;
