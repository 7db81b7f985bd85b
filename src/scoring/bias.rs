use serde::{Deserialize, Serialize};

/// Upper bound (inclusive) of |z| for a green flag.
pub const GREEN_LIMIT: f64 = 1.0;
/// Upper bound (inclusive) of |z| for a yellow flag.
pub const YELLOW_LIMIT: f64 = 2.0;

/// Traffic-light classification of how far a judge sits from the panel mean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BiasFlag {
    Green,
    Yellow,
    Red,
}

impl BiasFlag {
    /// `|z| <= 1` is green, `1 < |z| <= 2` is yellow, anything above is red.
    pub fn from_z(z: f64) -> Self {
        let magnitude = z.abs();
        if magnitude <= GREEN_LIMIT {
            BiasFlag::Green
        } else if magnitude <= YELLOW_LIMIT {
            BiasFlag::Yellow
        } else {
            BiasFlag::Red
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            BiasFlag::Green => "🟢",
            BiasFlag::Yellow => "🟡",
            BiasFlag::Red => "🔴",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BiasFlag::Green => "green",
            BiasFlag::Yellow => "yellow",
            BiasFlag::Red => "red",
        }
    }
}

/// Bias datum for one judge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BiasReading {
    pub z_score: f64,
    pub flag: BiasFlag,
}

impl BiasReading {
    /// Reading given to excluded judges and to every judge of a tied panel.
    pub fn neutral() -> Self {
        Self {
            z_score: 0.0,
            flag: BiasFlag::Green,
        }
    }

    pub fn from_z(z_score: f64) -> Self {
        Self {
            z_score,
            flag: BiasFlag::from_z(z_score),
        }
    }
}

/// Mean and population standard deviation of a sample.
///
/// Returns `None` for an empty sample.
pub fn mean_and_std_dev(values: &[f64]) -> Option<(f64, f64)> {
    if values.is_empty() {
        return None;
    }

    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;

    Some((mean, variance.sqrt()))
}

/// Compute a bias reading for every judge.
///
/// `averages[i]` pairs with `active[i]`. Statistics are taken over the active
/// averages only; inactive judges always get a neutral reading. A zero
/// standard deviation means no judge is an outlier, so every z is 0.
pub fn detect_bias(averages: &[f64], active: &[bool]) -> Vec<BiasReading> {
    let active_averages: Vec<f64> = averages
        .iter()
        .zip(active)
        .filter(|(_, is_active)| **is_active)
        .map(|(avg, _)| *avg)
        .collect();

    let stats = mean_and_std_dev(&active_averages);

    averages
        .iter()
        .zip(active)
        .map(|(avg, is_active)| match (is_active, stats) {
            (true, Some((mean, std_dev))) if std_dev != 0.0 => {
                BiasReading::from_z((avg - mean) / std_dev)
            }
            _ => BiasReading::neutral(),
        })
        .collect()
}
