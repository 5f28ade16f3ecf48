//! Weighted similarity search over panels.
//!
//! Every attribute named in the query adds to a panel's score:
//! numbers by closeness (`w / (1 + |diff|)`), structure by exact
//! case-insensitive match (`w` or nothing). Weights default to 1.
//! Scores are plain sums, so only compare them within one query.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::{Attribute, AttributeValue, Panel};

/// Weight applied to attributes missing from [`Weights`].
const DEFAULT_WEIGHT: f64 = 1.0;

/// The attribute values a caller is looking for.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Query(BTreeMap<Attribute, AttributeValue>);

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, attribute: Attribute, value: impl Into<AttributeValue>) -> Self {
        self.0.insert(attribute, value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Attribute, &AttributeValue)> {
        self.0.iter().map(|(a, v)| (*a, v))
    }
}

/// Relative importance of each attribute.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Weights(BTreeMap<Attribute, f64>);

impl Weights {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, attribute: Attribute, weight: f64) -> Self {
        self.0.insert(attribute, weight);
        self
    }

    pub fn get(&self, attribute: Attribute) -> f64 {
        self.0.get(&attribute).copied().unwrap_or(DEFAULT_WEIGHT)
    }
}

/// A candidate and the score it earned.
#[derive(Debug, Clone, PartialEq)]
pub struct Ranked<K, P> {
    pub key: K,
    pub panel: P,
    pub score: f64,
}

/// Score one panel against a query.
pub fn score_panel(panel: &Panel, query: &Query, weights: &Weights) -> f64 {
    let mut score = 0.0;

    for (attribute, wanted) in query.iter() {
        let weight = weights.get(attribute);
        match (wanted, panel.number(attribute)) {
            (AttributeValue::Number(q), Some(p)) => {
                score += weight * (1.0 / (1.0 + (p - q).abs()));
            }
            (AttributeValue::Text(q), None) => {
                if q.to_lowercase() == panel.structure.to_lowercase() {
                    score += weight;
                }
            }
            // kind mismatch, e.g. a text value for `watt`
            _ => {}
        }
    }

    score
}

/// Order candidates by descending score.
///
/// Accepts a catalog (`catalog.iter()`) or any list of keyed panels.
/// Equal scores keep their input order.
pub fn rank<K, P, I>(entries: I, query: &Query, weights: &Weights) -> Vec<Ranked<K, P>>
where
    I: IntoIterator<Item = (K, P)>,
    P: AsRef<Panel>,
{
    let mut ranked: Vec<Ranked<K, P>> = entries
        .into_iter()
        .map(|(key, panel)| {
            let score = score_panel(panel.as_ref(), query, weights);
            Ranked { key, panel, score }
        })
        .collect();

    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    ranked
}
