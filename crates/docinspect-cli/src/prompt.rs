//! Device-code instructions on the terminal.

use docinspect_auth::{DeviceCodeChallenge, VerificationPrompt};

/// Prints sign-in instructions to stderr so stdout stays parseable.
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrPrompt;

impl VerificationPrompt for StderrPrompt {
    fn show(&self, challenge: &DeviceCodeChallenge) {
        eprintln!();
        eprintln!("{}", challenge.instructions());
        eprintln!("Waiting for sign-in (Ctrl-C to cancel)...");
    }
}
