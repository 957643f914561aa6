#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Forwarded to kubectl without checks.
    PassThrough,
    /// Requires targeting flags and confirmation.
    Guarded,
}

impl Decision {
    pub fn as_str(self) -> &'static str {
        match self {
            Decision::PassThrough => "pass-through",
            Decision::Guarded => "guarded",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Decision::PassThrough => "PASS",
            Decision::Guarded => "GUARD",
        }
    }
}

#[derive(Debug, Clone)]
pub struct RuleMatch {
    pub decision: Decision,
    pub reason: String,
}
