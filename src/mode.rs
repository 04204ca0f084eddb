use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Which type predicate the classifier applies.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum RuleMode {
    /// Primary type only.
    #[default]
    Simplified,
    /// Primary and secondary types.
    Advanced,
}

impl RuleMode {
    pub fn toggle(&self) -> Self {
        match self {
            RuleMode::Simplified => RuleMode::Advanced,
            RuleMode::Advanced => RuleMode::Simplified,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RuleMode::Simplified => "SIMPLIFIED",
            RuleMode::Advanced => "ADVANCED",
        }
    }

    pub fn uses_secondary_types(&self) -> bool {
        matches!(self, RuleMode::Advanced)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_round_trips() {
        assert_eq!(RuleMode::default(), RuleMode::Simplified);
        assert_eq!(RuleMode::Simplified.toggle(), RuleMode::Advanced);
        assert_eq!(RuleMode::Advanced.toggle(), RuleMode::Simplified);
    }
}
