//! kubectl-safe: an interactive safety net for destructive kubectl commands.
//!
//! Used as the kubectl plugin `kubectl safe <command> [flags]`. Commands in
//! the guarded set (delete, apply, drain, ...) must carry explicit
//! `--context` and `--namespace` flags and are confirmed interactively
//! before being forwarded to kubectl. Everything else passes straight
//! through with kubectl's streams and exit status untouched.
//!
//! # Architecture
//!
//! - **[`eval`]** — Command classifier: guarded vs. pass-through.
//! - **[`flags`]** — Required-flag validation and flag value extraction.
//! - **[`prompt`]** — Confirmation banner and the blocking answer read.
//! - **[`process`]** — Forwarding to kubectl and the known-context lookup.
//! - **[`guard`]** — The per-invocation flow tying the above together.
//! - **[`config`]** — Configuration loading: embedded defaults + user overlay merge.
//! - **[`logging`]** — Diagnostic log and decision audit under `~/.local/share/kubectl-safe/`.

/// Configuration types, loading, and overlay merge logic.
pub mod config;
/// Error type for every failure path.
pub mod error;
/// Command classification: guarded set and decision types.
pub mod eval;
/// Targeting-flag presence checks and value extraction.
pub mod flags;
/// Top-level invocation flow.
pub mod guard;
/// File-based diagnostic and decision logging.
pub mod logging;
/// Child process specs and the kubectl forwarder.
pub mod process;
/// Confirmation rendering and line reading.
pub mod prompt;

pub use error::GuardError;
pub use guard::{Guard, Outcome};

use eval::RuleMatch;

/// Classify an argument vector against the default guarded set.
///
/// This is the main entry point for tests and simple usage.
/// For CLI usage with a user config, build a [`Guard`] directly.
pub fn classify(args: &[String]) -> RuleMatch {
    let config = config::Config::default_config();
    eval::Classifier::from_config(&config.guard).classify(args)
}
