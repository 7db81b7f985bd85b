use super::config::ScoringConfig;

/// Validate scoring configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_scoring(config: &ScoringConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if !config.control_constant.is_finite() {
        errors.push("scoring.control_constant: must be a finite number".to_string());
    } else if config.control_constant <= 0.0 {
        errors.push(format!(
            "scoring.control_constant: must be positive, got {}",
            config.control_constant
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
