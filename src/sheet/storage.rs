use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use super::types::{AudienceTally, Judge, JudgeId};
use super::ScoreSheet;
use crate::scoring::{validate_scoring, ScoringConfig};

/// On-disk description of one contestant's score sheet.
///
/// Example YAML:
/// ```yaml
/// judges:
///   - name: Alice
///     creativity: 8
///     quality: 6
///     special_criteria: [7]
///   - name: Bob
///     creativity: 5
///     quality: 7
///     special_criteria: [6, 8]
///     half_weight: true
/// audience:
///   voters: 100
///   points: 800
/// control_constant: 20
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SheetFile {
    pub judges: Vec<JudgeEntry>,

    #[serde(default)]
    pub audience: AudienceTally,

    /// Overrides the configured control constant for this sheet only
    #[serde(default)]
    pub control_constant: Option<f64>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct JudgeEntry {
    /// Defaults to "Judge N" by position
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub creativity: f64,
    #[serde(default)]
    pub quality: f64,
    #[serde(default = "default_criteria")]
    pub special_criteria: Vec<f64>,
    #[serde(default)]
    pub half_weight: bool,
    #[serde(default)]
    pub excluded: bool,
}

fn default_criteria() -> Vec<f64> {
    vec![0.0]
}

impl SheetFile {
    /// Convert into an editable sheet, assigning judge ids by position.
    pub fn into_sheet(self, config: &ScoringConfig) -> Result<ScoreSheet> {
        if self.judges.is_empty() {
            anyhow::bail!("Sheet must list at least one judge");
        }
        if let Some(m0) = self.control_constant {
            if validate_scoring(&ScoringConfig::with_control_constant(m0)).is_err() {
                anyhow::bail!("control_constant must be a positive number, got {}", m0);
            }
        }

        let mut judges = Vec::with_capacity(self.judges.len());
        for (i, entry) in self.judges.into_iter().enumerate() {
            let name = entry.name.unwrap_or_else(|| format!("Judge {}", i + 1));
            if entry.special_criteria.is_empty() {
                anyhow::bail!(
                    "judges[{}] ({}): special_criteria must have at least one score",
                    i,
                    name
                );
            }
            judges.push(Judge {
                id: JudgeId(i as u64 + 1),
                name,
                creativity: entry.creativity,
                quality: entry.quality,
                special_criteria: entry.special_criteria,
                half_weight: entry.half_weight,
                excluded: entry.excluded,
            });
        }

        let control_constant = self.control_constant.unwrap_or(config.control_constant);
        ScoreSheet::from_judges(judges, self.audience, control_constant)
            .context("Sheet is missing judges or special criteria")
    }
}

/// Parse a sheet from YAML text.
pub fn parse_sheet(content: &str, config: &ScoringConfig) -> Result<ScoreSheet> {
    let file: SheetFile =
        serde_saphyr::from_str(content).context("Failed to parse sheet: invalid YAML")?;
    file.into_sheet(config)
}

/// Load a sheet from a YAML file
///
/// # Errors
///
/// Returns an error if the file cannot be read, is not valid YAML, lists no
/// judges, or has a judge without special criteria.
pub fn load_sheet(path: &Path, config: &ScoringConfig) -> Result<ScoreSheet> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read sheet at {}", path.display()))?;

    parse_sheet(&content, config).with_context(|| format!("Invalid sheet {}", path.display()))
}
