//! Error type shared by every stage of a guarded invocation.

use std::io;

/// Everything that can stop a command from reaching kubectl, or report that
/// kubectl itself failed.
#[derive(Debug, thiserror::Error)]
pub enum GuardError {
    /// One or both targeting flags were absent.
    #[error(
        "dangerous command requires explicit {} flag(s). This ensures you're targeting the correct cluster and namespace",
        .missing.join(" and ")
    )]
    MissingFlags { missing: Vec<String> },

    /// The context value is not among the contexts kubectl knows about.
    #[error("context '{context}' not found in kubeconfig (available: {})", .available.join(", "))]
    UnknownContext {
        context: String,
        available: Vec<String>,
    },

    /// The known-contexts lookup itself failed.
    #[error("failed to get available contexts, could not verify --context: {reason}")]
    LookupFailed { reason: String },

    /// The user declined the confirmation prompt.
    #[error("operation cancelled by user")]
    Cancelled,

    /// Reading the confirmation answer failed.
    #[error("failed to read user input: {0}")]
    Input(#[source] io::Error),

    /// Writing the banner or prompt failed.
    #[error("failed to write to terminal: {0}")]
    Output(#[source] io::Error),

    /// The forwarded executable could not be started.
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    /// The forwarded executable exited unsuccessfully.
    #[error("{program} exited with {}", describe_code(.code))]
    ChildExit { program: String, code: Option<i32> },
}

fn describe_code(code: &Option<i32>) -> String {
    match code {
        Some(c) => format!("status {c}"),
        None => "no status (terminated by signal)".to_string(),
    }
}

impl GuardError {
    /// Short stable name, used in log lines and audit records.
    pub fn kind(&self) -> &'static str {
        match self {
            GuardError::MissingFlags { .. } => "missing-flags",
            GuardError::UnknownContext { .. } => "unknown-context",
            GuardError::LookupFailed { .. } => "lookup-failed",
            GuardError::Cancelled => "cancelled",
            GuardError::Input(_) => "input-error",
            GuardError::Output(_) => "output-error",
            GuardError::Spawn { .. } => "spawn-failed",
            GuardError::ChildExit { .. } => "child-exit",
        }
    }

    /// Process exit status for this error.
    ///
    /// A failing child passes its own code through; everything else is 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            GuardError::ChildExit {
                code: Some(code), ..
            } if *code != 0 => *code,
            _ => 1,
        }
    }
}
