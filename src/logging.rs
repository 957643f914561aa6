use crate::eval::Decision;
use chrono::{SecondsFormat, Utc};
use log::LevelFilter;
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;
use std::str::FromStr;

/// ~/.local/share/kubectl-safe, where both log files live.
pub fn data_dir() -> Option<PathBuf> {
    let home = std::env::var_os("HOME")?;
    Some(std::path::Path::new(&home).join(".local/share/kubectl-safe"))
}

/// Parse a configured level name; unknown names fall back to `warn`.
pub fn parse_level(name: &str) -> LevelFilter {
    LevelFilter::from_str(name.trim()).unwrap_or(LevelFilter::Warn)
}

/// Route `log` records to ~/.local/share/kubectl-safe/kubectl-safe.log.
/// Best-effort: a missing HOME or unwritable directory leaves logging off.
pub fn init(level: LevelFilter) {
    if level == LevelFilter::Off {
        return;
    }
    let Some(dir) = data_dir() else {
        return;
    };
    let _ = std::fs::create_dir_all(&dir);
    let Ok(file) = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join("kubectl-safe.log"))
    else {
        return;
    };
    let config = simplelog::ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();
    let _ = simplelog::WriteLogger::init(level, config, file);
}

/// Flags whose values never reach decisions.log.
const SECRET_FLAGS: &[&str] = &[
    "--token",
    "--password",
    "--from-literal",
    "--docker-password",
    "--client-key",
    "--username",
];

const REDACTED: &str = "<redacted>";

fn is_secret_flag(arg: &str) -> bool {
    SECRET_FLAGS.contains(&arg)
}

/// Replace the values of secret-bearing flags, in both `--flag=v` and
/// `--flag v` forms.
pub fn redact(args: &[String]) -> Vec<String> {
    let mut out = Vec::with_capacity(args.len());
    let mut hide_next = false;
    for arg in args {
        if hide_next {
            out.push(REDACTED.to_string());
            hide_next = false;
            continue;
        }
        match arg.split_once('=') {
            Some((flag, _)) if is_secret_flag(flag) => out.push(format!("{flag}={REDACTED}")),
            _ => {
                hide_next = is_secret_flag(arg);
                out.push(arg.clone());
            }
        }
    }
    out
}

/// One line of decisions.log.
#[derive(Debug, Serialize)]
pub struct AuditRecord<'a> {
    pub ts: String,
    pub decision: &'a str,
    pub outcome: &'a str,
    pub command: String,
}

impl<'a> AuditRecord<'a> {
    pub fn new(args: &[String], decision: Decision, outcome: &'a str) -> Self {
        Self {
            ts: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            decision: decision.as_str(),
            outcome,
            command: redact(args).join(" ").chars().take(200).collect(),
        }
    }
}

/// Append a decision record to ~/.local/share/kubectl-safe/decisions.log.
/// Best-effort: failures are silently ignored (logging must never block kubectl).
pub fn log_decision(args: &[String], decision: Decision, outcome: &str) {
    let Some(log_dir) = data_dir() else {
        return;
    };
    let _ = std::fs::create_dir_all(&log_dir);

    let Ok(mut file) = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join("decisions.log"))
    else {
        return;
    };

    let record = AuditRecord::new(args, decision, outcome);
    if let Ok(line) = serde_json::to_string(&record) {
        let _ = writeln!(file, "{line}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_names() {
        assert_eq!(parse_level("debug"), LevelFilter::Debug);
        assert_eq!(parse_level(" INFO "), LevelFilter::Info);
        assert_eq!(parse_level("off"), LevelFilter::Off);
        assert_eq!(parse_level("loud"), LevelFilter::Warn);
        assert_eq!(parse_level(""), LevelFilter::Warn);
    }

    fn args(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn audit_record_json() {
        let record = AuditRecord::new(
            &args(&["delete", "pod", "x", "--context=prod"]),
            Decision::Guarded,
            "cancelled",
        );
        let value: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&record).unwrap()).unwrap();
        assert_eq!(value["decision"], "guarded");
        assert_eq!(value["outcome"], "cancelled");
        assert_eq!(value["command"], "delete pod x --context=prod");
        let ts = value["ts"].as_str().unwrap();
        assert_eq!(ts.len(), 20);
        assert_eq!(&ts[10..11], "T");
        assert!(ts.ends_with('Z'));
    }

    #[test]
    fn secret_values_are_redacted() {
        let record = AuditRecord::new(
            &args(&[
                "create",
                "secret",
                "generic",
                "db",
                "--from-literal=password=hunter2",
                "--token",
                "abc123",
                "--context=prod",
                "-n",
                "x",
            ]),
            Decision::Guarded,
            "executed",
        );
        assert_eq!(
            record.command,
            "create secret generic db --from-literal=<redacted> --token <redacted> \
             --context=prod -n x"
        );
        assert!(!record.command.contains("hunter2"));
        assert!(!record.command.contains("abc123"));
    }

    #[test]
    fn redaction_leaves_other_flags_alone() {
        let words = args(&["get", "pods", "--tokens=1", "-n", "kube-system"]);
        assert_eq!(redact(&words), words);
        assert_eq!(redact(&args(&["--password"])), args(&["--password"]));
    }

    #[test]
    fn audit_record_truncates_command() {
        let long = vec!["x".repeat(500)];
        let record = AuditRecord::new(&long, Decision::PassThrough, "passed-through");
        assert_eq!(record.command.chars().count(), 200);
    }
}
