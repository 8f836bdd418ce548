//! # docinspect-cli
//!
//! Terminal front end for docinspect.
//!
//! - [`SearchOrchestrator`] runs one search: validate the id, acquire a
//!   token, fetch the chunk, and fold the result into a [`SearchOutcome`]
//! - [`render`] turns outcomes into terminal text or JSON
//! - [`Session`] is the interactive shell behind `docinspect shell`

pub mod prompt;
pub mod render;
pub mod search;
pub mod session;

pub use prompt::StderrPrompt;
pub use search::{SearchOrchestrator, SearchOutcome};
pub use session::{Command, Session};
