pub mod decision;

pub use decision::{Decision, RuleMatch};

use std::collections::HashSet;

use crate::config::GuardConfig;

/// The guarded command set, keyed by kubectl command name.
///
/// Built once from configuration; never mutated afterwards.
#[derive(Debug, Clone)]
pub struct Classifier {
    dangerous: HashSet<String>,
    /// Configuration order, kept for usage output.
    ordered: Vec<String>,
}

impl Classifier {
    /// Build the classifier from configuration.
    pub fn from_config(config: &GuardConfig) -> Self {
        Self::new(config.dangerous.iter().cloned())
    }

    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut dangerous = HashSet::new();
        let mut ordered = Vec::new();
        for name in names {
            let name = name.into();
            if dangerous.insert(name.clone()) {
                ordered.push(name);
            }
        }
        Self { dangerous, ordered }
    }

    /// True iff `args[0]` exists and names a guarded command.
    ///
    /// Only the first element is inspected, so a leading flag such as
    /// `--context=prod delete pod x` passes through unguarded.
    pub fn is_dangerous(&self, args: &[String]) -> bool {
        args.first().is_some_and(|cmd| self.dangerous.contains(cmd))
    }

    /// Classify an argument vector, with a reason for logs.
    pub fn classify(&self, args: &[String]) -> RuleMatch {
        let Some(cmd) = args.first() else {
            return RuleMatch {
                decision: Decision::PassThrough,
                reason: "no command".into(),
            };
        };
        if self.is_dangerous(args) {
            RuleMatch {
                decision: Decision::Guarded,
                reason: format!("kubectl {cmd} is guarded"),
            }
        } else {
            RuleMatch {
                decision: Decision::PassThrough,
                reason: format!("kubectl {cmd} passes through"),
            }
        }
    }

    /// Guarded command names in configuration order.
    pub fn commands(&self) -> &[String] {
        &self.ordered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn classifier() -> Classifier {
        Classifier::from_config(&Config::default_config().guard)
    }

    fn args(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn delete_is_dangerous() {
        assert!(classifier().is_dangerous(&args(&["delete", "pod", "mypod"])));
    }

    #[test]
    fn apply_is_dangerous() {
        assert!(classifier().is_dangerous(&args(&["apply", "-f", "deployment.yaml"])));
    }

    #[test]
    fn get_is_safe() {
        assert!(!classifier().is_dangerous(&args(&["get", "pods"])));
    }

    #[test]
    fn describe_is_safe() {
        assert!(!classifier().is_dangerous(&args(&["describe", "pod", "mypod"])));
    }

    #[test]
    fn empty_args_are_safe() {
        assert!(!classifier().is_dangerous(&[]));
        assert_eq!(classifier().classify(&[]).reason, "no command");
    }

    #[test]
    fn only_first_word_is_consulted() {
        // "delete" later in the vector does not make `get` dangerous
        assert!(!classifier().is_dangerous(&args(&["get", "delete"])));
        // and a flag before the command hides it
        assert!(!classifier().is_dangerous(&args(&["--context=prod", "delete", "pod"])));
    }

    #[test]
    fn match_is_exact() {
        assert!(!classifier().is_dangerous(&args(&["Delete", "pod"])));
        assert!(!classifier().is_dangerous(&args(&["deletes", "pod"])));
    }

    #[test]
    fn classify_reason() {
        let m = classifier().classify(&args(&["drain", "node-1"]));
        assert_eq!(m.decision, Decision::Guarded);
        assert_eq!(m.reason, "kubectl drain is guarded");
        let m = classifier().classify(&args(&["logs", "pod/foo"]));
        assert_eq!(m.decision, Decision::PassThrough);
    }

    #[test]
    fn commands_keep_order_and_dedup() {
        let c = Classifier::new(["delete", "apply", "delete"]);
        assert_eq!(c.commands(), &["delete".to_string(), "apply".to_string()]);
    }
}
