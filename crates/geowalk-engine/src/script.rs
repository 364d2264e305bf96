//! Scripted input.
//!
//! An input script is a list of steps, each holding a set of `wasd` keys for
//! a number of ticks. Scripts are stored as RON:
//!
//! ```text
//! (
//!     steps: [
//!         (keys: "d", ticks: 120),
//!         (keys: "sd", ticks: 60),
//!         (keys: "", ticks: 10),
//!     ],
//! )
//! ```

use geowalk_common::SchemaVersion;
use geowalk_gameplay::InputSnapshot;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors loading an input script.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScriptError {
    /// Script is not valid RON
    #[error("failed to parse input script: {0}")]
    Parse(String),

    /// Script was written for an incompatible format
    #[error("unsupported input script version {found}, expected {expected}")]
    UnsupportedVersion {
        /// Supported version
        expected: String,
        /// Version found in the file
        found: String,
    },

    /// A step names a key outside `wasd`
    #[error("step {step}: unknown key '{key}'")]
    UnknownKey {
        /// Zero-based step index
        step: usize,
        /// Offending character
        key: char,
    },
}

/// Keys held for a number of ticks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptStep {
    /// Held keys as a `wasd` string; empty means idle
    #[serde(default)]
    pub keys: String,
    /// Number of ticks to hold them
    pub ticks: u32,
}

impl ScriptStep {
    /// Creates a step.
    #[must_use]
    pub fn new(keys: impl Into<String>, ticks: u32) -> Self {
        Self {
            keys: keys.into(),
            ticks,
        }
    }

    /// Input sampled on every tick of this step.
    #[must_use]
    pub fn snapshot(&self) -> InputSnapshot {
        InputSnapshot::from_wasd(&self.keys)
    }
}

fn script_version() -> SchemaVersion {
    SchemaVersion::INPUT_SCRIPT
}

/// A replayable input sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputScript {
    /// Format version
    #[serde(default = "script_version")]
    pub version: SchemaVersion,
    /// Steps in playback order
    pub steps: Vec<ScriptStep>,
}

impl InputScript {
    /// Creates a script from steps.
    #[must_use]
    pub fn new(steps: Vec<ScriptStep>) -> Self {
        Self {
            version: SchemaVersion::INPUT_SCRIPT,
            steps,
        }
    }

    /// Parses and validates a script.
    pub fn from_ron(source: &str) -> Result<Self, ScriptError> {
        let script: Self = ron::from_str(source).map_err(|e| ScriptError::Parse(e.to_string()))?;
        if !SchemaVersion::INPUT_SCRIPT.can_read(&script.version) {
            return Err(ScriptError::UnsupportedVersion {
                expected: SchemaVersion::INPUT_SCRIPT.to_string(),
                found: script.version.to_string(),
            });
        }
        script.validate()?;
        Ok(script)
    }

    /// Rejects keys `InputSnapshot::from_wasd` would silently ignore.
    pub fn validate(&self) -> Result<(), ScriptError> {
        for (step, entry) in self.steps.iter().enumerate() {
            if let Some(key) = entry
                .keys
                .chars()
                .find(|c| !matches!(c.to_ascii_lowercase(), 'w' | 'a' | 's' | 'd'))
            {
                return Err(ScriptError::UnknownKey { step, key });
            }
        }
        Ok(())
    }

    /// Total number of ticks across all steps.
    #[must_use]
    pub fn total_ticks(&self) -> u64 {
        self.steps.iter().map(|s| u64::from(s.ticks)).sum()
    }

    /// One input snapshot per tick.
    pub fn inputs(&self) -> impl Iterator<Item = InputSnapshot> + '_ {
        self.steps
            .iter()
            .flat_map(|step| std::iter::repeat(step.snapshot()).take(step.ticks as usize))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_script() {
        let text = r#"(
            steps: [
                (keys: "d", ticks: 3),
                (keys: "WA", ticks: 2),
                (ticks: 1),
            ],
        )"#;

        let script = InputScript::from_ron(text).expect("parses");
        assert_eq!(script.version, SchemaVersion::INPUT_SCRIPT);
        assert_eq!(script.steps.len(), 3);
        assert_eq!(script.total_ticks(), 6);
        assert_eq!(script.steps[2].keys, "");
    }

    #[test]
    fn test_inputs_expand_steps() {
        let script = InputScript::new(vec![ScriptStep::new("d", 2), ScriptStep::new("", 1)]);
        let inputs: Vec<_> = script.inputs().collect();

        assert_eq!(inputs.len(), 3);
        assert!(inputs[0].right && inputs[1].right);
        assert_eq!(inputs[2], InputSnapshot::NONE);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let text = r#"(steps: [(keys: "d", ticks: 1), (keys: "wx", ticks: 1)])"#;
        let err = InputScript::from_ron(text).expect_err("x is not a key");
        assert_eq!(err, ScriptError::UnknownKey { step: 1, key: 'x' });
    }

    #[test]
    fn test_future_major_version_rejected() {
        let text = r#"(version: (major: 2, minor: 0, patch: 0), steps: [])"#;
        let err = InputScript::from_ron(text).expect_err("unsupported");
        assert!(matches!(err, ScriptError::UnsupportedVersion { .. }));
    }

    #[test]
    fn test_malformed_script() {
        assert!(matches!(
            InputScript::from_ron("(steps: 4)"),
            Err(ScriptError::Parse(_))
        ));
    }
}
