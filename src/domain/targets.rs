use super::error::{ModelError, ModelResult};
use super::value_objects::TargetKind;

// Slack when comparing an absolute target against a summed feature total
const TOTAL_TOLERANCE: f64 = 1e-9;

/// Representation targets, one value per feature or a single broadcast value
#[derive(Debug, Clone, PartialEq)]
pub struct TargetSpec {
    pub kind: TargetKind,
    pub values: Vec<f64>,
}

impl TargetSpec {
    pub fn new(kind: TargetKind, values: Vec<f64>) -> Self {
        Self { kind, values }
    }

    pub fn percent(values: Vec<f64>) -> Self {
        Self::new(TargetKind::Percent, values)
    }

    pub fn absolute(values: Vec<f64>) -> Self {
        Self::new(TargetKind::Absolute, values)
    }

    /// Same fraction of every feature
    pub fn uniform_percent(fraction: f64) -> Self {
        Self::percent(vec![fraction])
    }

    /// Resolve to absolute amounts given each feature's total abundance.
    pub fn resolve(&self, totals: &[f64]) -> ModelResult<Vec<f64>> {
        let features = totals.len();
        let values: Vec<f64> = match self.values.len() {
            1 => vec![self.values[0]; features],
            n if n == features => self.values.clone(),
            actual => return Err(ModelError::TargetCount { features, actual }),
        };

        values
            .iter()
            .zip(totals)
            .enumerate()
            .map(|(feature, (&value, &total))| match self.kind {
                TargetKind::Percent => {
                    if !(0.0..=1.0).contains(&value) {
                        return Err(ModelError::PercentOutOfRange { feature, value });
                    }
                    Ok(value * total)
                }
                TargetKind::Absolute => {
                    let limit = total + TOTAL_TOLERANCE * total.abs().max(1.0);
                    if !value.is_finite() || value < 0.0 || value > limit {
                        return Err(ModelError::AbsoluteOutOfRange {
                            feature,
                            value,
                            total,
                        });
                    }
                    Ok(value)
                }
            })
            .collect()
    }
}
