//! Targeting-flag scanning over a raw kubectl argument vector.
//!
//! Four shapes count as a flag being present: `--long`, `-s`, `--long=value`
//! and `-s=value`. Values are read from the `=` form or from the element
//! following the bare flag.

use crate::config::FlagsConfig;
use crate::error::GuardError;

/// Shown in the confirmation banner when a flag has no value.
pub const NOT_SPECIFIED: &str = "<not specified>";

/// Long and short spelling of one flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagSpec {
    pub long: String,
    pub short: String,
}

impl FlagSpec {
    pub fn new(long: impl Into<String>, short: impl Into<String>) -> Self {
        Self {
            long: long.into(),
            short: short.into(),
        }
    }

    /// True if any element is this flag in one of the four accepted shapes.
    pub fn is_present(&self, args: &[String]) -> bool {
        args.iter().any(|arg| {
            is_bare(arg, &self.long)
                || is_bare(arg, &self.short)
                || has_assignment(arg, &self.long)
                || has_assignment(arg, &self.short)
        })
    }

    /// First value given for this flag, scanning left to right.
    pub fn value<'a>(&self, args: &'a [String]) -> Option<&'a str> {
        extract_value(args, &self.long, &self.short)
    }
}

/// `arg` is exactly `flag`. An empty flag name never matches.
fn is_bare(arg: &str, flag: &str) -> bool {
    !flag.is_empty() && arg == flag
}

/// `arg` is `flag=...`. An empty flag name never matches.
fn has_assignment(arg: &str, flag: &str) -> bool {
    assignment_value(arg, flag).is_some()
}

fn assignment_value<'a>(arg: &'a str, flag: &str) -> Option<&'a str> {
    if flag.is_empty() {
        return None;
    }
    arg.strip_prefix(flag)?.strip_prefix('=')
}

/// The two flags every guarded command must carry.
#[derive(Debug, Clone)]
pub struct RequiredFlags {
    pub context: FlagSpec,
    pub namespace: FlagSpec,
}

impl RequiredFlags {
    pub fn from_config(config: &FlagsConfig) -> Self {
        Self {
            context: FlagSpec::new(&config.context_long, &config.context_short),
            namespace: FlagSpec::new(&config.namespace_long, &config.namespace_short),
        }
    }
}

impl Default for RequiredFlags {
    fn default() -> Self {
        Self {
            context: FlagSpec::new("--context", "-c"),
            namespace: FlagSpec::new("--namespace", "-n"),
        }
    }
}

/// Ensure both the context and namespace flags are present.
///
/// Reports exactly the missing flag(s) by their long name.
pub fn validate_required_flags(args: &[String], flags: &RequiredFlags) -> Result<(), GuardError> {
    let mut missing = Vec::new();
    if !flags.context.is_present(args) {
        missing.push(flags.context.long.clone());
    }
    if !flags.namespace.is_present(args) {
        missing.push(flags.namespace.long.clone());
    }

    if missing.is_empty() {
        Ok(())
    } else {
        Err(GuardError::MissingFlags { missing })
    }
}

/// Value of a flag given as `long=v`, `short=v`, `long v` or `short v`.
///
/// The first occurrence wins, scanning left to right. kubectl itself keeps
/// the last one, so `--context=dev --context=prod` is shown and verified as
/// `dev` but runs against `prod`. A bare flag in last position has no value
/// and is skipped.
pub fn extract_value<'a>(args: &'a [String], long: &str, short: &str) -> Option<&'a str> {
    for (i, arg) in args.iter().enumerate() {
        if let Some(v) = assignment_value(arg, long).or_else(|| assignment_value(arg, short)) {
            return Some(v);
        }
        if (is_bare(arg, long) || is_bare(arg, short))
            && let Some(next) = args.get(i + 1)
        {
            return Some(next.as_str());
        }
    }
    None
}

/// Display form of an extracted value.
pub fn display_value(value: Option<&str>) -> &str {
    value.unwrap_or(NOT_SPECIFIED)
}
