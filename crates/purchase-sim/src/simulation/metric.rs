use super::domain::{BehavioralVector, BEHAVIORAL_DIMENSIONS};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Income level mapped to roughly 0.46 after squashing.
const INCOME_SCALE: f64 = 65_000.0;
const PERCENT_SCALE: f64 = 100.0;

/// Distance used to match a reference vector against the persona catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceMetric {
    #[default]
    Euclidean,
    Manhattan,
}

impl DistanceMetric {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Euclidean => "euclidean",
            Self::Manhattan => "manhattan",
        }
    }

    /// Distance between two vectors after both are normalized.
    pub fn distance(self, a: &BehavioralVector, b: &BehavioralVector) -> f64 {
        let a = normalize(a);
        let b = normalize(b);
        match self {
            Self::Euclidean => a
                .iter()
                .zip(b.iter())
                .map(|(x, y)| (y - x).powi(2))
                .sum::<f64>()
                .sqrt(),
            Self::Manhattan => a.iter().zip(b.iter()).map(|(x, y)| (y - x).abs()).sum(),
        }
    }
}

impl fmt::Display for DistanceMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMetric(pub String);

impl fmt::Display for UnknownMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown distance metric '{}' (expected euclidean or manhattan)",
            self.0
        )
    }
}

impl std::error::Error for UnknownMetric {}

impl FromStr for DistanceMetric {
    type Err = UnknownMetric;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "euclidean" | "l2" => Ok(Self::Euclidean),
            "manhattan" | "l1" => Ok(Self::Manhattan),
            other => Err(UnknownMetric(other.to_string())),
        }
    }
}

/// Bring every feature onto a comparable 0-1 range: percentages are divided by
/// 100 and income is squashed through `2 * sigmoid(income / 65k) - 1`.
pub fn normalize(vector: &BehavioralVector) -> [f64; BEHAVIORAL_DIMENSIONS] {
    [
        vector.risk_seeking / PERCENT_SCALE,
        vector.market_susceptibility / PERCENT_SCALE,
        squash_income(vector.income),
    ]
}

fn squash_income(income: f64) -> f64 {
    sigmoid(income / INCOME_SCALE) * 2.0 - 1.0
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn vector_strategy() -> impl Strategy<Value = BehavioralVector> {
        (0.0f64..100.0, 0.0f64..100.0, 0.0f64..500_000.0)
            .prop_map(|(risk, market, income)| BehavioralVector::new(risk, market, income))
    }

    #[test]
    fn income_is_squashed_into_unit_range() {
        assert_eq!(squash_income(0.0), 0.0);
        assert!(squash_income(500_000.0) < 1.0);
        assert!(squash_income(65_000.0) > 0.46 && squash_income(65_000.0) < 0.47);
    }

    #[test]
    fn income_does_not_dominate_distance() {
        let a = BehavioralVector::new(50.0, 50.0, 60_000.0);
        let b = BehavioralVector::new(50.0, 50.0, 61_000.0);
        assert!(DistanceMetric::Euclidean.distance(&a, &b) < 0.01);
    }

    #[test]
    fn manhattan_sums_absolute_differences() {
        let a = BehavioralVector::new(10.0, 20.0, 0.0);
        let b = BehavioralVector::new(30.0, 10.0, 0.0);
        let distance = DistanceMetric::Manhattan.distance(&a, &b);
        assert!((distance - 0.3).abs() < 1e-12);
    }

    #[test]
    fn metric_parses_from_config_values() {
        assert_eq!(
            "Manhattan".parse::<DistanceMetric>(),
            Ok(DistanceMetric::Manhattan)
        );
        assert_eq!(
            " euclidean ".parse::<DistanceMetric>(),
            Ok(DistanceMetric::Euclidean)
        );
        assert!("cosine".parse::<DistanceMetric>().is_err());
    }

    proptest! {
        #[test]
        fn distance_is_symmetric_and_non_negative(a in vector_strategy(), b in vector_strategy()) {
            for metric in [DistanceMetric::Euclidean, DistanceMetric::Manhattan] {
                let forward = metric.distance(&a, &b);
                let backward = metric.distance(&b, &a);
                prop_assert!(forward >= 0.0);
                prop_assert!((forward - backward).abs() < 1e-12);
            }
        }

        #[test]
        fn distance_to_self_is_zero(v in vector_strategy()) {
            prop_assert_eq!(DistanceMetric::Euclidean.distance(&v, &v), 0.0);
            prop_assert_eq!(DistanceMetric::Manhattan.distance(&v, &v), 0.0);
        }
    }
}
