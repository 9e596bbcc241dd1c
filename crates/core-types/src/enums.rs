use serde::{Deserialize, Serialize};
use std::fmt;

/// One step of the staged execution performed for every gateway call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Connect,
    SetSchema,
    Execute,
    Disconnect,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Connect => "connect",
            Stage::SetSchema => "set_schema",
            Stage::Execute => "execute",
            Stage::Disconnect => "disconnect",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decides which stage outcome a gateway call reports when more than one
/// stage recorded a value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StagePolicy {
    /// The first failure wins. A failed disconnect after a successful
    /// statement is logged and the statement result is kept.
    #[default]
    ShortCircuit,
    /// The most recently recorded value wins, even when a later disconnect
    /// failure replaces a good result.
    Overwrite,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_serializes_as_snake_case() {
        let json = serde_json::to_string(&Stage::SetSchema).unwrap();
        assert_eq!(json, "\"set_schema\"");
        assert_eq!(Stage::SetSchema.to_string(), "set_schema");
    }

    #[test]
    fn policy_defaults_to_short_circuit() {
        assert_eq!(StagePolicy::default(), StagePolicy::ShortCircuit);
        let policy: StagePolicy = serde_json::from_str("\"overwrite\"").unwrap();
        assert_eq!(policy, StagePolicy::Overwrite);
    }
}
