//! Error types shared by the grid components.

use thiserror::Error;

use crate::config::ConfigError;

/// Errors surfaced to callers of the simulation manager and registry.
#[derive(Debug, Error)]
pub enum GridError {
    /// A renewable source was registered with a capacity outside `1..=u32::MAX`.
    #[error(
        "invalid capacity {capacity} for renewable source \"{kind}\": must be between 1 and {max}",
        max = u32::MAX
    )]
    InvalidCapacity {
        /// Source kind as given by the caller.
        kind: String,
        /// Rejected capacity.
        capacity: i64,
    },

    /// A renewable source was registered with an empty or blank kind.
    #[error("invalid renewable source kind \"{kind}\": must not be blank")]
    InvalidKind {
        /// Kind as given by the caller.
        kind: String,
    },

    /// The scenario failed validation while building a manager.
    #[error("invalid scenario: {}", join_errors(.0))]
    InvalidScenario(Vec<ConfigError>),
}

fn join_errors(errors: &[ConfigError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_capacity_message_names_source() {
        let err = GridError::InvalidCapacity {
            kind: "solar".to_string(),
            capacity: -3,
        };
        let msg = err.to_string();
        assert!(msg.contains("solar"));
        assert!(msg.contains("-3"));
    }

    #[test]
    fn invalid_kind_message_quotes_the_kind() {
        let err = GridError::InvalidKind { kind: " ".to_string() };
        assert_eq!(
            err.to_string(),
            "invalid renewable source kind \" \": must not be blank"
        );
    }

    #[test]
    fn invalid_scenario_joins_all_errors() {
        let err = GridError::InvalidScenario(vec![
            ConfigError {
                field: "households.count".into(),
                message: "must be > 0".into(),
            },
            ConfigError {
                field: "households.consumption_min".into(),
                message: "must be <= households.consumption_max".into(),
            },
        ]);
        let msg = err.to_string();
        assert!(msg.contains("households.count"));
        assert!(msg.contains("households.consumption_min"));
    }
}
