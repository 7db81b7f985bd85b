use serde::Serialize;

use super::bias::{detect_bias, BiasReading};
use super::config::ScoringConfig;
use super::error::ScoringError;
use crate::sheet::{AudienceTally, Judge, JudgeId};

/// Share of the final score taken from the judges' average.
pub const JUDGES_WEIGHT: f64 = 0.75;
/// Share of the final score taken from the audience-effective value.
pub const AUDIENCE_WEIGHT: f64 = 0.25;
/// Per-active-judge contribution to the dampening constant M.
pub const M_PER_JUDGE: f64 = 10.0;

/// Everything computed for a single judge.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JudgeScore {
    pub id: JudgeId,
    pub name: String,
    pub special_criteria_average: f64,
    /// (creativity + quality + special average) / 3, halved for half-weight judges
    pub average: f64,
    pub half_weight: bool,
    pub excluded: bool,
    pub bias: BiasReading,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub judges: Vec<JudgeScore>,
    pub active_judges: usize,
    pub judges_average: f64,
    pub audience_average: f64,
    /// Configured floor M₀
    pub control_floor: f64,
    /// Effective dampening constant M actually used
    pub control_constant: f64,
    pub audience_effective: f64,
    pub final_score: f64,
}

/// Compute the composite score for one contestant.
///
/// Pure: the result depends only on the arguments. Fails when a judge has no
/// special criteria or when every judge is excluded.
pub fn compute_score(
    judges: &[Judge],
    audience: &AudienceTally,
    config: &ScoringConfig,
) -> Result<ScoreBreakdown, ScoringError> {
    let special_averages = judges
        .iter()
        .map(special_criteria_average)
        .collect::<Result<Vec<_>, _>>()?;

    let averages: Vec<f64> = judges
        .iter()
        .zip(&special_averages)
        .map(|(judge, special)| judge_average(judge, *special))
        .collect();

    let active: Vec<bool> = judges.iter().map(Judge::is_active).collect();
    let bias = detect_bias(&averages, &active);

    let active_averages: Vec<f64> = averages
        .iter()
        .zip(&active)
        .filter(|(_, is_active)| **is_active)
        .map(|(avg, _)| *avg)
        .collect();
    let active_judges = active_averages.len();
    if active_judges == 0 {
        return Err(ScoringError::NoActiveJudges);
    }
    let judges_average = active_averages.iter().sum::<f64>() / active_judges as f64;

    let audience_average = audience_average(audience);
    let control_constant = effective_control_constant(active_judges, config);
    let audience_effective = audience_effective(
        audience.voters,
        audience_average,
        judges_average,
        control_constant,
    );
    let final_score = judges_average * JUDGES_WEIGHT + audience_effective * AUDIENCE_WEIGHT;

    let judges = judges
        .iter()
        .zip(special_averages)
        .zip(averages)
        .zip(bias)
        .map(|(((judge, special_criteria_average), average), bias)| JudgeScore {
            id: judge.id,
            name: judge.name.clone(),
            special_criteria_average,
            average,
            half_weight: judge.half_weight,
            excluded: judge.excluded,
            bias,
        })
        .collect();

    Ok(ScoreBreakdown {
        judges,
        active_judges,
        judges_average,
        audience_average,
        control_floor: config.control_constant,
        control_constant,
        audience_effective,
        final_score,
    })
}

fn special_criteria_average(judge: &Judge) -> Result<f64, ScoringError> {
    if judge.special_criteria.is_empty() {
        return Err(ScoringError::EmptySpecialCriteria {
            judge: judge.name.clone(),
        });
    }
    let sum: f64 = judge.special_criteria.iter().sum();
    Ok(sum / judge.special_criteria.len() as f64)
}

fn judge_average(judge: &Judge, special_average: f64) -> f64 {
    let average = (judge.creativity + judge.quality + special_average) / 3.0;
    if judge.half_weight {
        average / 2.0
    } else {
        average
    }
}

fn audience_average(audience: &AudienceTally) -> f64 {
    if audience.voters > 0 {
        audience.points as f64 / audience.voters as f64
    } else {
        0.0
    }
}

/// M = max(10 × active judges, configured floor)
pub fn effective_control_constant(active_judges: usize, config: &ScoringConfig) -> f64 {
    (active_judges as f64 * M_PER_JUDGE).max(config.control_constant)
}

/// Shrink the audience average toward the judges' average. With no voters
/// there is no audience signal and the judges' average is returned as is.
fn audience_effective(voters: u64, audience_average: f64, judges_average: f64, m: f64) -> f64 {
    if voters == 0 {
        return judges_average;
    }
    let n = voters as f64;
    (n * audience_average + m * judges_average) / (n + m)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::BiasFlag;

    fn judge(id: u64, creativity: f64, quality: f64, special: &[f64]) -> Judge {
        Judge {
            id: JudgeId(id),
            name: format!("Judge {}", id),
            creativity,
            quality,
            special_criteria: special.to_vec(),
            half_weight: false,
            excluded: false,
        }
    }

    fn config(control_constant: f64) -> ScoringConfig {
        ScoringConfig::with_control_constant(control_constant)
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_single_judge_no_voters() {
        let judges = vec![judge(1, 8.0, 6.0, &[7.0])];
        let result = compute_score(&judges, &AudienceTally::new(0, 0), &config(20.0)).unwrap();

        assert_eq!(result.judges[0].special_criteria_average, 7.0);
        assert_eq!(result.judges[0].average, 7.0);
        assert_eq!(result.judges_average, 7.0);
        assert_eq!(result.audience_average, 0.0);
        assert_eq!(result.control_constant, 20.0);
        assert_eq!(result.audience_effective, 7.0);
        assert!(approx(result.final_score, 7.0));
    }

    #[test]
    fn test_two_judges_with_audience() {
        let judges = vec![judge(1, 8.0, 8.0, &[8.0]), judge(2, 4.0, 4.0, &[4.0])];
        let result =
            compute_score(&judges, &AudienceTally::new(100, 800), &config(20.0)).unwrap();

        assert_eq!(result.audience_average, 8.0);
        assert_eq!(result.judges_average, 6.0);
        assert_eq!(result.control_constant, 20.0);
        assert!(approx(result.audience_effective, 920.0 / 120.0));
        assert!(approx(result.final_score, 6.0 * 0.75 + (920.0 / 120.0) * 0.25));
        assert!((result.final_score - 6.4167).abs() < 1e-4);
    }

    #[test]
    fn test_all_excluded_is_error() {
        let mut only = judge(1, 5.0, 5.0, &[5.0]);
        only.excluded = true;
        let result = compute_score(&[only], &AudienceTally::new(10, 50), &config(20.0));
        assert_eq!(result, Err(ScoringError::NoActiveJudges));
    }

    #[test]
    fn test_empty_special_criteria_is_error() {
        let judges = vec![judge(1, 5.0, 5.0, &[5.0]), judge(2, 5.0, 5.0, &[])];
        let result = compute_score(&judges, &AudienceTally::default(), &config(20.0));
        assert_eq!(
            result,
            Err(ScoringError::EmptySpecialCriteria {
                judge: "Judge 2".to_string()
            })
        );
    }

    #[test]
    fn test_special_criteria_average() {
        let judges = vec![judge(1, 0.0, 0.0, &[4.0, 6.0, 8.0])];
        let result = compute_score(&judges, &AudienceTally::default(), &config(20.0)).unwrap();
        assert_eq!(result.judges[0].special_criteria_average, 6.0);
        assert_eq!(result.judges[0].average, 2.0);
    }

    #[test]
    fn test_single_criterion_average_is_itself() {
        for c in [0.0, 3.3, 9.75] {
            let judges = vec![judge(1, 1.0, 1.0, &[c])];
            let result = compute_score(&judges, &AudienceTally::default(), &config(20.0)).unwrap();
            assert_eq!(result.judges[0].special_criteria_average, c);
        }
    }

    #[test]
    fn test_half_weight_halves_average() {
        let full = judge(1, 9.0, 7.0, &[5.0, 6.0]);
        let mut half = full.clone();
        half.half_weight = true;

        let full_result = compute_score(&[full], &AudienceTally::default(), &config(20.0)).unwrap();
        let half_result = compute_score(&[half], &AudienceTally::default(), &config(20.0)).unwrap();

        assert_eq!(half_result.judges[0].average, full_result.judges[0].average / 2.0);
        assert!(half_result.judges[0].half_weight);
    }

    #[test]
    fn test_excluded_judge_kept_but_not_counted() {
        let mut excluded = judge(3, 0.0, 0.0, &[0.0]);
        excluded.excluded = true;
        let judges = vec![judge(1, 8.0, 8.0, &[8.0]), judge(2, 4.0, 4.0, &[4.0]), excluded];

        let result = compute_score(&judges, &AudienceTally::default(), &config(20.0)).unwrap();

        assert_eq!(result.judges.len(), 3);
        assert_eq!(result.active_judges, 2);
        assert_eq!(result.judges_average, 6.0);
        assert_eq!(result.judges[2].average, 0.0);
        assert!(result.judges[2].excluded);
        assert_eq!(result.judges[2].bias, BiasReading::neutral());
    }

    #[test]
    fn test_excluded_judge_average_still_computed() {
        let mut excluded = judge(2, 9.0, 9.0, &[9.0]);
        excluded.excluded = true;
        excluded.half_weight = true;
        let judges = vec![judge(1, 3.0, 3.0, &[3.0]), excluded];

        let result = compute_score(&judges, &AudienceTally::default(), &config(20.0)).unwrap();
        assert_eq!(result.judges[1].average, 4.5);
        assert_eq!(result.judges_average, 3.0);
    }

    #[test]
    fn test_tied_panel_all_green() {
        let judges = vec![
            judge(1, 6.0, 6.0, &[6.0]),
            judge(2, 5.0, 7.0, &[6.0]),
            judge(3, 7.0, 5.0, &[6.0]),
        ];
        let result = compute_score(&judges, &AudienceTally::default(), &config(20.0)).unwrap();
        for score in &result.judges {
            assert_eq!(score.bias.z_score, 0.0);
            assert_eq!(score.bias.flag, BiasFlag::Green);
        }
    }

    #[test]
    fn test_bias_flags_in_breakdown() {
        let mut judges: Vec<Judge> = (1..=4).map(|id| judge(id, 0.0, 0.0, &[0.0])).collect();
        judges.push(judge(5, 10.0, 10.0, &[10.0]));

        let result = compute_score(&judges, &AudienceTally::default(), &config(20.0)).unwrap();
        assert_eq!(result.judges[4].bias.flag, BiasFlag::Yellow);
        assert_eq!(result.judges[0].bias.flag, BiasFlag::Green);
    }

    #[test]
    fn test_zero_voters_falls_back_to_judges() {
        let judges = vec![judge(1, 9.0, 4.0, &[2.5, 7.5])];
        let result =
            compute_score(&judges, &AudienceTally::new(0, 500), &config(20.0)).unwrap();
        assert_eq!(result.audience_average, 0.0);
        assert_eq!(result.audience_effective, result.judges_average);
    }

    #[test]
    fn test_m_scales_with_active_judges() {
        let judges: Vec<Judge> = (1..=3).map(|id| judge(id, 5.0, 5.0, &[5.0])).collect();
        let result = compute_score(&judges, &AudienceTally::new(10, 80), &config(20.0)).unwrap();
        assert_eq!(result.control_constant, 30.0);

        let result = compute_score(&judges, &AudienceTally::new(10, 80), &config(45.0)).unwrap();
        assert_eq!(result.control_constant, 45.0);
        assert_eq!(result.control_floor, 45.0);
    }

    #[test]
    fn test_m_ignores_excluded_judges() {
        let mut judges: Vec<Judge> = (1..=3).map(|id| judge(id, 5.0, 5.0, &[5.0])).collect();
        judges[0].excluded = true;
        judges[1].excluded = true;
        let result = compute_score(&judges, &AudienceTally::new(10, 80), &config(5.0)).unwrap();
        assert_eq!(result.control_constant, 10.0);
    }

    #[test]
    fn test_larger_control_constant_pulls_toward_judges() {
        let judges = vec![judge(1, 4.0, 4.0, &[4.0])];
        let audience = AudienceTally::new(50, 450);

        let low = compute_score(&judges, &audience, &config(20.0)).unwrap();
        let high = compute_score(&judges, &audience, &config(80.0)).unwrap();

        assert!(high.control_constant > low.control_constant);
        let low_gap = (low.audience_effective - low.judges_average).abs();
        let high_gap = (high.audience_effective - high.judges_average).abs();
        assert!(high_gap < low_gap);
    }

    #[test]
    fn test_many_voters_approach_audience_average() {
        let judges = vec![judge(1, 2.0, 2.0, &[2.0])];
        let result =
            compute_score(&judges, &AudienceTally::new(1_000_000, 9_000_000), &config(20.0))
                .unwrap();
        assert!((result.audience_effective - 9.0).abs() < 1e-3);
    }

    #[test]
    fn test_final_score_blend() {
        let judges = vec![judge(1, 7.0, 3.0, &[8.0, 1.0]), judge(2, 6.0, 6.0, &[9.0])];
        let result =
            compute_score(&judges, &AudienceTally::new(37, 201), &config(20.0)).unwrap();
        assert_eq!(
            result.final_score,
            result.judges_average * 0.75 + result.audience_effective * 0.25
        );
    }

    #[test]
    fn test_deterministic() {
        let judges = vec![judge(1, 7.1, 3.3, &[8.2, 1.9]), judge(2, 6.4, 6.6, &[9.1])];
        let audience = AudienceTally::new(13, 97);
        let a = compute_score(&judges, &audience, &config(20.0)).unwrap();
        let b = compute_score(&judges, &audience, &config(20.0)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_preserves_judge_order_and_identity() {
        let judges = vec![judge(7, 1.0, 1.0, &[1.0]), judge(3, 2.0, 2.0, &[2.0])];
        let result = compute_score(&judges, &AudienceTally::default(), &config(20.0)).unwrap();
        assert_eq!(result.judges[0].id, JudgeId(7));
        assert_eq!(result.judges[1].id, JudgeId(3));
        assert_eq!(result.judges[1].name, "Judge 3");
    }
}
