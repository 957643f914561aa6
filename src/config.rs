use serde::{Deserialize, Serialize};

/// Embedded default configuration.
const DEFAULT_CONFIG: &str = include_str!("../config.default.toml");

/// Env var that points at an alternative user config file.
pub const CONFIG_ENV_VAR: &str = "KUBECTL_SAFE_CONFIG";

// ── Final (merged) config types ──

#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub guard: GuardConfig,
    #[serde(default)]
    pub flags: FlagsConfig,
    #[serde(default)]
    pub kubectl: KubectlConfig,
}

#[derive(Debug, Deserialize, Serialize, Default)]
pub struct Settings {
    /// Check the `--context` value against `kubectl config get-contexts`.
    #[serde(default)]
    pub verify_context: bool,
    /// Require typing the context name for production-looking contexts.
    #[serde(default)]
    pub strict_production: bool,
    /// Substring (matched case-insensitively) that marks a production context.
    #[serde(default)]
    pub production_marker: String,
    #[serde(default)]
    pub log_level: String,
    #[serde(default)]
    pub audit_log: bool,
}

#[derive(Debug, Deserialize, Serialize, Default)]
pub struct GuardConfig {
    /// Leading kubectl commands that require flags and confirmation.
    #[serde(default)]
    pub dangerous: Vec<String>,
}

/// Long and short spellings of the two required targeting flags.
#[derive(Debug, Deserialize, Serialize, Default)]
pub struct FlagsConfig {
    #[serde(default)]
    pub context_long: String,
    #[serde(default)]
    pub context_short: String,
    #[serde(default)]
    pub namespace_long: String,
    #[serde(default)]
    pub namespace_short: String,
}

#[derive(Debug, Deserialize, Serialize, Default)]
pub struct KubectlConfig {
    /// Executable to forward to. Tilde-expanded and shell-word split, so
    /// `"kubectl --kubeconfig ~/.kube/lab"` is accepted.
    #[serde(default)]
    pub binary: String,
    /// Arguments that print one known context name per line.
    #[serde(default)]
    pub list_contexts: Vec<String>,
}

// ── Overlay types (user config that merges with defaults) ──

#[derive(Debug, Deserialize, Default)]
struct ConfigOverlay {
    #[serde(default)]
    settings: SettingsOverlay,
    #[serde(default)]
    guard: GuardOverlay,
    #[serde(default)]
    flags: FlagsOverlay,
    #[serde(default)]
    kubectl: KubectlOverlay,
}

#[derive(Debug, Deserialize, Default)]
struct SettingsOverlay {
    verify_context: Option<bool>,
    strict_production: Option<bool>,
    production_marker: Option<String>,
    log_level: Option<String>,
    audit_log: Option<bool>,
}

#[derive(Debug, Deserialize, Default)]
struct GuardOverlay {
    #[serde(default)]
    replace: bool,
    #[serde(default)]
    dangerous: Vec<String>,
    #[serde(default)]
    remove_dangerous: Vec<String>,
}

#[derive(Debug, Deserialize, Default)]
struct FlagsOverlay {
    context_long: Option<String>,
    context_short: Option<String>,
    namespace_long: Option<String>,
    namespace_short: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct KubectlOverlay {
    binary: Option<String>,
    list_contexts: Option<Vec<String>>,
}

// ── Merge logic ──

/// Merge a user list into a default list.
/// In replace mode: user list replaces default entirely.
/// In merge mode: remove items first, then extend with additions (deduped).
fn merge_list(base: &mut Vec<String>, add: Vec<String>, remove: &[String], replace: bool) {
    if replace {
        *base = add;
    } else {
        base.retain(|item| !remove.contains(item));
        for item in add {
            if !base.contains(&item) {
                base.push(item);
            }
        }
    }
}

fn override_scalar<T>(target: &mut T, value: Option<T>) {
    if let Some(v) = value {
        *target = v;
    }
}

impl Config {
    /// Load the default embedded configuration.
    pub fn default_config() -> Self {
        toml::from_str(DEFAULT_CONFIG).expect("embedded default config must parse")
    }

    /// Load configuration with resolution order:
    /// 1. Start with embedded defaults
    /// 2. Merge user overlay from `$KUBECTL_SAFE_CONFIG` or
    ///    ~/.config/kubectl-safe/config.toml (if it exists)
    ///
    /// An overlay that fails to parse is reported and ignored.
    pub fn load() -> Self {
        let mut config = Self::default_config();
        if let Some(overlay) = Self::load_overlay() {
            config.apply_overlay(overlay);
        }
        config
    }

    /// Path of the user overlay file, if one can be determined.
    pub fn overlay_path() -> Option<std::path::PathBuf> {
        if let Some(explicit) = std::env::var_os(CONFIG_ENV_VAR) {
            let explicit = explicit.to_string_lossy().into_owned();
            return Some(shellexpand::tilde(&explicit).into_owned().into());
        }
        let home = std::env::var_os("HOME")?;
        Some(std::path::Path::new(&home).join(".config/kubectl-safe/config.toml"))
    }

    fn load_overlay() -> Option<ConfigOverlay> {
        let path = Self::overlay_path()?;
        let content = std::fs::read_to_string(&path).ok()?;
        match toml::from_str(&content) {
            Ok(overlay) => Some(overlay),
            Err(e) => {
                eprintln!("kubectl-safe: config parse error in {}: {e}", path.display());
                None
            }
        }
    }

    /// Apply an overlay on top of this config (merge semantics).
    fn apply_overlay(&mut self, overlay: ConfigOverlay) {
        let s = overlay.settings;
        override_scalar(&mut self.settings.verify_context, s.verify_context);
        override_scalar(&mut self.settings.strict_production, s.strict_production);
        override_scalar(&mut self.settings.production_marker, s.production_marker);
        override_scalar(&mut self.settings.log_level, s.log_level);
        override_scalar(&mut self.settings.audit_log, s.audit_log);

        let g = overlay.guard;
        merge_list(
            &mut self.guard.dangerous,
            g.dangerous,
            &g.remove_dangerous,
            g.replace,
        );

        let f = overlay.flags;
        override_scalar(&mut self.flags.context_long, f.context_long);
        override_scalar(&mut self.flags.context_short, f.context_short);
        override_scalar(&mut self.flags.namespace_long, f.namespace_long);
        override_scalar(&mut self.flags.namespace_short, f.namespace_short);

        let k = overlay.kubectl;
        override_scalar(&mut self.kubectl.binary, k.binary);
        override_scalar(&mut self.kubectl.list_contexts, k.list_contexts);
    }

    /// Apply an overlay from a TOML string. Used for testing.
    #[cfg(test)]
    pub(crate) fn apply_overlay_str(&mut self, toml_str: &str) {
        let overlay: ConfigOverlay = toml::from_str(toml_str).unwrap();
        self.apply_overlay(overlay);
    }
}
