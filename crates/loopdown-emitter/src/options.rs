//! Lowering configuration.
//!
//! Loaded from a camelCase JSON file (`loopdown.json`):
//!
//! ```json
//! { "operations": ["map", "filter"], "thisArg": "reject" }
//! ```

use crate::transforms::hof_loops_ir::HofKind;
use serde::{Deserialize, Serialize};

/// What to do with a `thisArg` passed to `forEach`/`map`/`filter`/`every`/`some`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThisArgPolicy {
    /// Invoke the callback with `.call(thisArg, ...)`.
    #[default]
    Thread,
    /// Leave calls that pass a `thisArg` untouched.
    Reject,
}

impl std::str::FromStr for ThisArgPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "thread" => Ok(Self::Thread),
            "reject" => Ok(Self::Reject),
            other => Err(format!("unknown thisArg policy `{other}` (expected thread|reject)")),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct LoweringOptions {
    /// Operations eligible for lowering.
    pub operations: Vec<HofKind>,
    pub this_arg: ThisArgPolicy,
}

impl Default for LoweringOptions {
    fn default() -> Self {
        Self {
            operations: HofKind::ALL.to_vec(),
            this_arg: ThisArgPolicy::Thread,
        }
    }
}

impl LoweringOptions {
    pub fn from_json_str(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    #[inline]
    pub fn is_enabled(&self, kind: HofKind) -> bool {
        self.operations.contains(&kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_enables_everything() {
        let options = LoweringOptions::default();
        for kind in HofKind::ALL {
            assert!(options.is_enabled(kind));
        }
        assert_eq!(options.this_arg, ThisArgPolicy::Thread);
    }

    #[test]
    fn test_parse_camel_case_json() {
        let options =
            LoweringOptions::from_json_str(r#"{ "operations": ["forEach", "reduce"], "thisArg": "reject" }"#)
                .unwrap();
        assert_eq!(options.operations, vec![HofKind::ForEach, HofKind::Reduce]);
        assert_eq!(options.this_arg, ThisArgPolicy::Reject);
        assert!(!options.is_enabled(HofKind::Map));
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let options = LoweringOptions::from_json_str("{}").unwrap();
        assert_eq!(options, LoweringOptions::default());
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        assert!(LoweringOptions::from_json_str(r#"{ "target": "es5" }"#).is_err());
        assert!(LoweringOptions::from_json_str(r#"{ "operations": ["flatMap"] }"#).is_err());
    }
}
