use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::load_json;
use crate::error::ConfigError;
use crate::fundamentals::Metric;

/// Which side of the threshold a metric must land on to pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    HigherIsBetter,
    LowerIsBetter,
}

impl Direction {
    /// Strict comparison; NaN never passes.
    pub fn passes(self, value: f64, threshold: f64) -> bool {
        match self {
            Direction::HigherIsBetter => value > threshold,
            Direction::LowerIsBetter => value < threshold,
        }
    }
}

impl Metric {
    pub const fn direction(self) -> Direction {
        match self {
            Metric::DebtEquity => Direction::LowerIsBetter,
            _ => Direction::HigherIsBetter,
        }
    }
}

/// Threshold per metric. Loaded once and passed to the scorer; never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThresholdTable {
    thresholds: BTreeMap<Metric, f64>,
}

impl Default for ThresholdTable {
    fn default() -> Self {
        [
            (Metric::Roe, 15.0),
            (Metric::Roce, 15.0),
            (Metric::DebtEquity, 0.5),
            (Metric::CurrentRatio, 1.5),
            (Metric::ProfitGrowth, 15.0),
            (Metric::SalesGrowth, 10.0),
            (Metric::Pe, 25.0),
        ]
        .into_iter()
        .collect()
    }
}

impl FromIterator<(Metric, f64)> for ThresholdTable {
    fn from_iter<I: IntoIterator<Item = (Metric, f64)>>(iter: I) -> Self {
        Self {
            thresholds: iter.into_iter().collect(),
        }
    }
}

impl ThresholdTable {
    /// Load a table from `{"ROE": 15, ...}`. Unknown metric names are rejected.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        load_json(path)
    }

    pub fn get(&self, metric: Metric) -> Option<f64> {
        self.thresholds.get(&metric).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Metric, f64)> + '_ {
        self.thresholds.iter().map(|(m, t)| (*m, *t))
    }

    pub fn len(&self) -> usize {
        self.thresholds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.thresholds.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_table_covers_every_metric() {
        let table = ThresholdTable::default();
        assert_eq!(table.len(), Metric::ALL.len());
        assert_eq!(table.get(Metric::DebtEquity), Some(0.5));
        assert_eq!(table.get(Metric::Pe), Some(25.0));
    }

    #[test]
    fn only_debt_equity_prefers_lower_values() {
        for metric in Metric::ALL {
            let expected = if metric == Metric::DebtEquity {
                Direction::LowerIsBetter
            } else {
                Direction::HigherIsBetter
            };
            assert_eq!(metric.direction(), expected, "{metric}");
        }
    }

    #[test]
    fn comparisons_are_strict() {
        assert!(!Direction::HigherIsBetter.passes(15.0, 15.0));
        assert!(!Direction::LowerIsBetter.passes(0.5, 0.5));
        assert!(!Direction::HigherIsBetter.passes(f64::NAN, 1.0));
    }

    #[test]
    fn loads_partial_table_and_rejects_unknown_metrics() {
        let mut good = tempfile::NamedTempFile::new().unwrap();
        write!(good, r#"{{"ROE": 20, "DebtEquity": 1.0}}"#).unwrap();
        let table = ThresholdTable::load(good.path()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(Metric::Roe), Some(20.0));
        assert_eq!(table.get(Metric::Pe), None);

        let mut bad = tempfile::NamedTempFile::new().unwrap();
        write!(bad, r#"{{"ROE": 20, "Moat": 3}}"#).unwrap();
        assert!(matches!(
            ThresholdTable::load(bad.path()),
            Err(ConfigError::Parse { .. })
        ));
    }
}
