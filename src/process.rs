//! Running kubectl as a child process.
//!
//! Forwarded commands inherit all three standard streams. The known-context
//! lookup is the one call that captures stdout; its stderr still goes to the
//! terminal.

use std::process::{Command, Stdio};

use crate::config::KubectlConfig;
use crate::error::GuardError;

/// Where a child's stdout goes. Stdin and stderr are always inherited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StdoutMode {
    Inherit,
    Capture,
}

/// A child process invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessSpec {
    pub program: String,
    pub args: Vec<String>,
    pub stdout: StdoutMode,
}

impl ProcessSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            stdout: StdoutMode::Inherit,
        }
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn capture_stdout(mut self) -> Self {
        self.stdout = StdoutMode::Capture;
        self
    }

    /// Build the `std::process::Command` for this spec.
    pub fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .stdin(Stdio::inherit())
            .stderr(Stdio::inherit());
        match self.stdout {
            StdoutMode::Inherit => cmd.stdout(Stdio::inherit()),
            StdoutMode::Capture => cmd.stdout(Stdio::piped()),
        };
        cmd
    }

    fn spawn_error(&self, source: std::io::Error) -> GuardError {
        GuardError::Spawn {
            program: self.program.clone(),
            source,
        }
    }

    fn exit_error(&self, code: Option<i32>) -> GuardError {
        GuardError::ChildExit {
            program: self.program.clone(),
            code,
        }
    }

    /// Run to completion with inherited streams.
    pub fn run(&self) -> Result<(), GuardError> {
        let status = self
            .command()
            .status()
            .map_err(|e| self.spawn_error(e))?;
        if status.success() {
            Ok(())
        } else {
            Err(self.exit_error(status.code()))
        }
    }

    /// Run to completion and return captured stdout.
    pub fn output(&self) -> Result<String, GuardError> {
        let output = self
            .command()
            .output()
            .map_err(|e| self.spawn_error(e))?;
        if !output.status.success() {
            return Err(self.exit_error(output.status.code()));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// The component that actually talks to kubectl.
pub trait Forwarder {
    /// Run kubectl with exactly `args`, streams inherited.
    fn forward(&self, args: &[String]) -> Result<(), GuardError>;

    /// Context names known to kubectl.
    ///
    /// Any failure is reported as [`GuardError::LookupFailed`].
    fn known_contexts(&self) -> Result<Vec<String>, GuardError>;
}

/// Split `kubectl config get-contexts -o name` output into names.
pub fn parse_context_list(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

/// Real kubectl found on `PATH` (or wherever the configured binary points).
#[derive(Debug, Clone)]
pub struct Kubectl {
    /// Binary as written in configuration, shown in the banner.
    display: String,
    program: String,
    /// Words after the program in the configured binary string.
    prefix: Vec<String>,
    list_contexts: Vec<String>,
}

impl Kubectl {
    pub fn from_config(config: &KubectlConfig) -> Self {
        let display = match config.binary.trim() {
            "" => "kubectl".to_string(),
            b => b.to_string(),
        };
        let mut words: Vec<String> = shlex::split(&display)
            .unwrap_or_else(|| display.split_whitespace().map(String::from).collect())
            .iter()
            .map(|w| shellexpand::tilde(w).into_owned())
            .collect();
        let program = if words.is_empty() {
            "kubectl".to_string()
        } else {
            words.remove(0)
        };
        Self {
            display,
            program,
            prefix: words,
            list_contexts: config.list_contexts.clone(),
        }
    }

    /// Name used when echoing the command line back to the user.
    pub fn display_name(&self) -> &str {
        &self.display
    }

    /// Spec for `kubectl <prefix...> <args...>`.
    pub fn spec(&self, args: &[String]) -> ProcessSpec {
        ProcessSpec::new(&self.program)
            .args(self.prefix.iter().cloned())
            .args(args.iter().cloned())
    }
}

impl Forwarder for Kubectl {
    fn forward(&self, args: &[String]) -> Result<(), GuardError> {
        let spec = self.spec(args);
        log::debug!("running {} {:?}", spec.program, spec.args);
        spec.run()
    }

    fn known_contexts(&self) -> Result<Vec<String>, GuardError> {
        let spec = self.spec(&self.list_contexts).capture_stdout();
        log::debug!("listing contexts with {} {:?}", spec.program, spec.args);
        let stdout = spec.output().map_err(|e| GuardError::LookupFailed {
            reason: e.to_string(),
        })?;
        Ok(parse_context_list(&stdout))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn kubectl(binary: &str) -> Kubectl {
        let mut config = Config::default_config().kubectl;
        config.binary = binary.into();
        Kubectl::from_config(&config)
    }

    fn args(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn default_binary() {
        let k = kubectl("kubectl");
        assert_eq!(k.display_name(), "kubectl");
        let spec = k.spec(&args(&["get", "pods"]));
        assert_eq!(spec.program, "kubectl");
        assert_eq!(spec.args, vec!["get", "pods"]);
        assert_eq!(spec.stdout, StdoutMode::Inherit);
    }

    #[test]
    fn empty_binary_falls_back_to_kubectl() {
        let k = kubectl("  ");
        assert_eq!(k.display_name(), "kubectl");
        assert_eq!(k.spec(&[]).program, "kubectl");
    }

    #[test]
    fn binary_with_prefix_args() {
        let k = kubectl("kubectl --kubeconfig '/etc/kube/lab config'");
        let spec = k.spec(&args(&["delete", "pod", "x"]));
        assert_eq!(spec.program, "kubectl");
        assert_eq!(
            spec.args,
            vec!["--kubeconfig", "/etc/kube/lab config", "delete", "pod", "x"]
        );
    }

    #[test]
    fn binary_tilde_is_expanded() {
        let k = kubectl("~/bin/kubectl");
        assert!(k.spec(&[]).program.ends_with("/bin/kubectl"));
        if std::env::var_os("HOME").is_some() {
            assert!(!k.spec(&[]).program.starts_with('~'));
        }
    }

    #[test]
    fn capture_only_changes_stdout() {
        let spec = ProcessSpec::new("kubectl")
            .args(["config", "get-contexts"])
            .capture_stdout();
        assert_eq!(spec.stdout, StdoutMode::Capture);
        assert_eq!(spec.args, vec!["config", "get-contexts"]);
    }

    #[test]
    fn context_list_discards_blank_lines() {
        let out = "dev\n\n  staging \nprod\n\n";
        assert_eq!(parse_context_list(out), vec!["dev", "staging", "prod"]);
        assert!(parse_context_list("").is_empty());
    }

    #[test]
    fn spawn_failure_is_reported() {
        let err = ProcessSpec::new("kubectl-safe-definitely-not-installed")
            .run()
            .unwrap_err();
        assert!(matches!(err, GuardError::Spawn { .. }));
    }

    fn shell(list_contexts: &str) -> Kubectl {
        Kubectl::from_config(&KubectlConfig {
            binary: "sh -c".into(),
            list_contexts: vec![list_contexts.into()],
        })
    }

    #[cfg(unix)]
    #[test]
    fn child_exit_code_is_propagated() {
        let k = shell("true");
        assert!(k.forward(&args(&["exit 0"])).is_ok());
        match k.forward(&args(&["exit 3"])) {
            Err(e @ GuardError::ChildExit { code: Some(3), .. }) => assert_eq!(e.exit_code(), 3),
            other => panic!("expected ChildExit(3), got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn captured_stdout_is_returned() {
        let spec = ProcessSpec::new("sh")
            .args(["-c", "echo out; echo err >&2"])
            .capture_stdout();
        assert_eq!(spec.output().unwrap(), "out\n");
    }

    #[cfg(unix)]
    #[test]
    fn known_contexts_parses_captured_stdout() {
        let k = shell("printf 'dev\\n\\nprod\\n'");
        assert_eq!(k.known_contexts().unwrap(), vec!["dev", "prod"]);
    }

    #[cfg(unix)]
    #[test]
    fn failing_lookup_is_lookup_failed() {
        let k = shell("echo partial; exit 1");
        match k.known_contexts() {
            Err(GuardError::LookupFailed { reason }) => assert!(reason.contains("sh"), "{reason}"),
            other => panic!("expected LookupFailed, got {other:?}"),
        }
    }

    #[test]
    fn lookup_spawn_failure_is_lookup_failed() {
        let k = kubectl("kubectl-safe-definitely-not-installed");
        let err = k.known_contexts().unwrap_err();
        assert!(matches!(err, GuardError::LookupFailed { .. }));
    }
}
