//! Top-level flow for one invocation.
//!
//! ```text
//! no args            -> usage
//! --version | -v     -> version
//! not guarded        -> forward
//! guarded            -> required flags -> [verify context] -> confirm -> forward
//! ```
//!
//! Every failure before `forward` returns without running kubectl.

use std::io::Write;

use crate::config::Config;
use crate::error::GuardError;
use crate::eval::{Classifier, Decision};
use crate::flags::{RequiredFlags, display_value, validate_required_flags};
use crate::process::Forwarder;
use crate::prompt::{ConfirmPolicy, Confirmation, LineReader};

/// Version string printed by `--version`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// How a successful run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Usage,
    Version,
    PassedThrough,
    Executed,
}

impl Outcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Usage => "usage",
            Outcome::Version => "version",
            Outcome::PassedThrough => "passed-through",
            Outcome::Executed => "executed",
        }
    }
}

/// True for a lone `--version` or `-v`.
pub fn is_version_request(args: &[String]) -> bool {
    matches!(args, [only] if only == "--version" || only == "-v")
}

/// The configured guard: what to intercept and how strictly.
#[derive(Debug, Clone)]
pub struct Guard {
    classifier: Classifier,
    flags: RequiredFlags,
    policy: ConfirmPolicy,
    verify_context: bool,
}

impl Guard {
    /// Build the guard from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self {
            classifier: Classifier::from_config(&config.guard),
            flags: RequiredFlags::from_config(&config.flags),
            policy: ConfirmPolicy::from_settings(&config.settings),
            verify_context: config.settings.verify_context,
        }
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// Check the context value against the contexts kubectl knows.
    ///
    /// A lookup failure stops the command, as does a flag with no value.
    pub fn check_context<F: Forwarder + ?Sized>(
        &self,
        args: &[String],
        forwarder: &F,
    ) -> Result<(), GuardError> {
        let context = self.flags.context.value(args);
        let available = forwarder.known_contexts()?;
        match context {
            Some(name) if available.iter().any(|c| c == name) => Ok(()),
            _ => Err(GuardError::UnknownContext {
                context: display_value(context).to_string(),
                available,
            }),
        }
    }

    /// Run one invocation.
    ///
    /// `tool` is the executable name echoed in the confirmation banner.
    pub fn run<R, W, F>(
        &self,
        args: &[String],
        tool: &str,
        input: &mut R,
        out: &mut W,
        forwarder: &F,
    ) -> Result<Outcome, GuardError>
    where
        R: LineReader + ?Sized,
        W: Write + ?Sized,
        F: Forwarder + ?Sized,
    {
        if args.is_empty() {
            self.write_usage(out).map_err(GuardError::Output)?;
            return Ok(Outcome::Usage);
        }

        if is_version_request(args) {
            writeln!(out, "kubectl-safe {VERSION}").map_err(GuardError::Output)?;
            return Ok(Outcome::Version);
        }

        let rule = self.classifier.classify(args);
        log::debug!("{}: {}", rule.decision.label(), rule.reason);

        if rule.decision == Decision::PassThrough {
            forwarder.forward(args)?;
            return Ok(Outcome::PassedThrough);
        }

        validate_required_flags(args, &self.flags)?;
        if self.verify_context {
            self.check_context(args, forwarder)?;
        }

        let confirmation = Confirmation {
            tool,
            args,
            context: self.flags.context.value(args),
            namespace: self.flags.namespace.value(args),
        };
        confirmation.confirm(&self.policy, input, out)?;

        log::info!("confirmed: {}", confirmation.command_line());
        forwarder.forward(args)?;
        Ok(Outcome::Executed)
    }

    /// Help text, including the live guarded-command list.
    pub fn write_usage<W: Write + ?Sized>(&self, out: &mut W) -> std::io::Result<()> {
        let context = &self.flags.context;
        let namespace = &self.flags.namespace;
        write!(
            out,
            "kubectl-safe: Interactive safety net for dangerous kubectl commands

Usage:
  kubectl safe <kubectl-command> [flags]
  kubectl safe --version

This plugin acts as a safety wrapper around kubectl commands. For dangerous operations,
it will:
  - Require explicit {ctx} ({ctx_s}) and {ns} ({ns_s}) flags
  - Show an interactive confirmation prompt
  - Display target cluster and namespace information

Examples:
  kubectl safe delete pod mypod {ctx}=prod {ns}=default
  kubectl safe apply -f deployment.yaml {ctx}=staging {ns}=myapp

Dangerous commands that trigger safety checks:
  {commands}

For safe commands, this plugin acts as a transparent pass-through to kubectl.

",
            ctx = context.long,
            ctx_s = context.short,
            ns = namespace.long,
            ns_s = namespace.short,
            commands = self.classifier.commands().join(", "),
        )
    }
}
