//! Human confirmation before publishing
//!
//! The gate is a plain synchronous call: it prints the preview, asks
//! `Confirm: <action> [y/N]:` and blocks the calling task until a line is
//! read. There is no timeout. Only `y` or `yes` approve; anything else,
//! including end of input or a read error, declines.

use std::io::{BufRead, Write};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Approved,
    Declined,
}

/// A blocking yes/no step between preview and submission
pub trait ConfirmationGate: Send + Sync {
    fn confirm(&self, preview: &str, action: &str) -> Decision;
}

pub fn prompt_text(action: &str) -> String {
    format!("\nConfirm: {} [y/N]: ", action)
}

pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

/// Prompt over any reader/writer pair
pub struct PromptGate<R, W> {
    input: Mutex<R>,
    output: Mutex<W>,
}

impl<R: BufRead + Send, W: Write + Send> PromptGate<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input: Mutex::new(input),
            output: Mutex::new(output),
        }
    }

    /// Hand back the writer, e.g. to inspect what was printed
    pub fn into_output(self) -> Option<W> {
        self.output.into_inner().ok()
    }
}

impl<R: BufRead + Send, W: Write + Send> ConfirmationGate for PromptGate<R, W> {
    fn confirm(&self, preview: &str, action: &str) -> Decision {
        let (Ok(mut input), Ok(mut output)) = (self.input.lock(), self.output.lock()) else {
            warn!("Confirmation prompt unavailable; treating as declined");
            return Decision::Declined;
        };
        ask(&mut *input, &mut *output, preview, action)
    }
}

/// Write the preview and prompt, then block for one line of input
pub fn ask<R: BufRead + ?Sized, W: Write + ?Sized>(
    input: &mut R,
    output: &mut W,
    preview: &str,
    action: &str,
) -> Decision {
    if write!(output, "{}{}", preview, prompt_text(action))
        .and_then(|_| output.flush())
        .is_err()
    {
        warn!("Could not write confirmation prompt; treating as declined");
        return Decision::Declined;
    }

    let mut answer = String::new();
    match input.read_line(&mut answer) {
        Ok(0) => {
            debug!("Confirmation input closed");
            Decision::Declined
        }
        Ok(_) if is_affirmative(&answer) => Decision::Approved,
        Ok(_) => Decision::Declined,
        Err(e) => {
            warn!("Failed to read confirmation: {}", e);
            Decision::Declined
        }
    }
}

/// Prompt on the process's stdin/stdout
#[derive(Debug, Default, Clone, Copy)]
pub struct StdinGate;

impl ConfirmationGate for StdinGate {
    fn confirm(&self, preview: &str, action: &str) -> Decision {
        ask(
            &mut std::io::stdin().lock(),
            &mut std::io::stdout().lock(),
            preview,
            action,
        )
    }
}

/// Fixed answer, counting prompts. For tests and non-interactive hosts.
#[derive(Debug)]
pub struct ScriptedGate {
    decision: Decision,
    prompts: AtomicUsize,
    last_preview: Mutex<Option<String>>,
}

impl ScriptedGate {
    pub fn new(decision: Decision) -> Self {
        Self {
            decision,
            prompts: AtomicUsize::new(0),
            last_preview: Mutex::new(None),
        }
    }

    pub fn approve() -> Self {
        Self::new(Decision::Approved)
    }

    pub fn decline() -> Self {
        Self::new(Decision::Declined)
    }

    pub fn prompt_count(&self) -> usize {
        self.prompts.load(Ordering::SeqCst)
    }

    pub fn last_preview(&self) -> Option<String> {
        self.last_preview.lock().ok().and_then(|p| p.clone())
    }
}

impl ConfirmationGate for ScriptedGate {
    fn confirm(&self, preview: &str, _action: &str) -> Decision {
        self.prompts.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_preview.lock() {
            *last = Some(preview.to_string());
        }
        self.decision
    }
}
