use super::super::domain::{BehavioralVector, EnvironmentVector, PurchaseDecision};
use serde::{Deserialize, Serialize};

/// Input consulted by a split in the decision tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    PriceChangePercent,
    OriginalPrice,
    RiskSeeking,
    MarketSusceptibility,
    Income,
}

impl Feature {
    pub const fn label(self) -> &'static str {
        match self {
            Self::PriceChangePercent => "price change %",
            Self::OriginalPrice => "original price",
            Self::RiskSeeking => "risk seeking",
            Self::MarketSusceptibility => "market susceptibility",
            Self::Income => "income",
        }
    }
}

pub(crate) enum Node {
    Split {
        feature: Feature,
        threshold: f64,
        at_or_below: &'static Node,
        above: &'static Node,
    },
    Leaf(PurchaseDecision),
}

const NOT_BOUGHT: Node = Node::Leaf(PurchaseDecision::NotBought);
const BOUGHT: Node = Node::Leaf(PurchaseDecision::Bought);

const STABLE_PRICE: Node = Node::Split {
    feature: Feature::RiskSeeking,
    threshold: 13.295,
    at_or_below: &NOT_BOUGHT,
    above: &Node::Split {
        feature: Feature::MarketSusceptibility,
        threshold: 48.39,
        at_or_below: &Node::Split {
            feature: Feature::RiskSeeking,
            threshold: 56.96,
            at_or_below: &NOT_BOUGHT,
            above: &BOUGHT,
        },
        above: &BOUGHT,
    },
};

const MODERATE_INCREASE: Node = Node::Split {
    feature: Feature::OriginalPrice,
    threshold: 141.695,
    at_or_below: &BOUGHT,
    above: &Node::Split {
        feature: Feature::Income,
        threshold: 98204.512,
        at_or_below: &NOT_BOUGHT,
        above: &BOUGHT,
    },
};

const STEEP_INCREASE: Node = Node::Split {
    feature: Feature::RiskSeeking,
    threshold: 75.82,
    at_or_below: &Node::Split {
        feature: Feature::MarketSusceptibility,
        threshold: 46.55,
        at_or_below: &BOUGHT,
        above: &NOT_BOUGHT,
    },
    above: &BOUGHT,
};

/// Hand-authored purchase tree; thresholds are fixed and never refitted.
pub(crate) static PURCHASE_TREE: Node = Node::Split {
    feature: Feature::PriceChangePercent,
    threshold: 6.075,
    at_or_below: &STABLE_PRICE,
    above: &Node::Split {
        feature: Feature::PriceChangePercent,
        threshold: 17.92,
        at_or_below: &MODERATE_INCREASE,
        above: &STEEP_INCREASE,
    },
};

/// Flattened view of one environment/profile pair.
pub(crate) struct FeatureRow {
    price_change_percent: f64,
    original_price: f64,
    risk_seeking: f64,
    market_susceptibility: f64,
    income: f64,
}

impl FeatureRow {
    pub(crate) fn new(environment: &EnvironmentVector, profile: &BehavioralVector) -> Self {
        Self {
            price_change_percent: environment.price_change_percent,
            original_price: environment.original_price,
            risk_seeking: profile.risk_seeking,
            market_susceptibility: profile.market_susceptibility,
            income: profile.income,
        }
    }

    fn value(&self, feature: Feature) -> f64 {
        match feature {
            Feature::PriceChangePercent => self.price_change_percent,
            Feature::OriginalPrice => self.original_price,
            Feature::RiskSeeking => self.risk_seeking,
            Feature::MarketSusceptibility => self.market_susceptibility,
            Feature::Income => self.income,
        }
    }
}

/// One split visited while walking the tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitStep {
    pub feature: Feature,
    pub threshold: f64,
    pub value: f64,
    pub at_or_below: bool,
}

impl SplitStep {
    pub fn describe(&self) -> String {
        let comparison = if self.at_or_below { "<=" } else { ">" };
        format!(
            "{} {} {} {}",
            self.feature.label(),
            self.value,
            comparison,
            self.threshold
        )
    }
}

pub(crate) fn walk(
    root: &Node,
    row: &FeatureRow,
    mut trace: Option<&mut Vec<SplitStep>>,
) -> PurchaseDecision {
    let mut node = root;
    loop {
        match node {
            Node::Leaf(decision) => return *decision,
            Node::Split {
                feature,
                threshold,
                at_or_below,
                above,
            } => {
                let value = row.value(*feature);
                let below = value <= *threshold;
                if let Some(steps) = trace.as_deref_mut() {
                    steps.push(SplitStep {
                        feature: *feature,
                        threshold: *threshold,
                        value,
                        at_or_below: below,
                    });
                }
                node = if below { *at_or_below } else { *above };
            }
        }
    }
}
