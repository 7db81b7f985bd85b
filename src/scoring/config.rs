use serde::{Deserialize, Serialize};

/// Default floor for the audience-dampening constant M.
pub const DEFAULT_CONTROL_CONSTANT: f64 = 20.0;

/// Scoring configuration.
///
/// Only the control constant (M₀) is tunable. It is the floor for the
/// audience-dampening constant M; the engine raises M to `10 × active judges`
/// when that is larger.
///
/// Example YAML:
/// ```yaml
/// scoring:
///   control_constant: 20
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ScoringConfig {
    /// Caller-configured floor for M (default: 20)
    #[serde(default = "default_control_constant")]
    pub control_constant: f64,
}

fn default_control_constant() -> f64 {
    DEFAULT_CONTROL_CONSTANT
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            control_constant: DEFAULT_CONTROL_CONSTANT,
        }
    }
}

impl ScoringConfig {
    pub fn with_control_constant(control_constant: f64) -> Self {
        Self { control_constant }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scoring_config() {
        let config = ScoringConfig::default();
        assert_eq!(config.control_constant, 20.0);
    }

    #[test]
    fn test_scoring_config_serde_roundtrip() {
        let config = ScoringConfig::with_control_constant(35.5);
        let yaml = serde_saphyr::to_string(&config).unwrap();
        let parsed: ScoringConfig = serde_saphyr::from_str(&yaml).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_empty_scoring_config_uses_default_constant() {
        let config: ScoringConfig = serde_saphyr::from_str("{}").unwrap();
        assert_eq!(config.control_constant, DEFAULT_CONTROL_CONSTANT);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let yaml = r#"
control_constant: 20
base_score: 100
"#;
        let result: Result<ScoringConfig, _> = serde_saphyr::from_str(yaml);
        assert!(result.is_err());
    }
}
