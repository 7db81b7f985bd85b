use serde::{Deserialize, Serialize};

use crate::scoring::ScoringConfig;

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub scoring: Option<ScoringConfig>,

    /// Number of blank judges a new form starts with
    #[serde(default)]
    pub default_judges: Option<usize>,
}

impl Config {
    pub fn effective_scoring(&self) -> ScoringConfig {
        self.scoring.clone().unwrap_or_default()
    }

    pub fn judge_count(&self) -> usize {
        self.default_judges.unwrap_or(1).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config() {
        let config: Config = serde_saphyr::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.effective_scoring().control_constant, 20.0);
        assert_eq!(config.judge_count(), 1);
    }

    #[test]
    fn test_full_config() {
        let yaml = r#"
scoring:
  control_constant: 40
default_judges: 3
"#;
        let config: Config = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(config.effective_scoring().control_constant, 40.0);
        assert_eq!(config.judge_count(), 3);
    }

    #[test]
    fn test_zero_default_judges_clamped() {
        let config = Config {
            scoring: None,
            default_judges: Some(0),
        };
        assert_eq!(config.judge_count(), 1);
    }
}
