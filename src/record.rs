//! Weighted records
//!
//! A [`Record`] is the unit of data flowing through the priority queue and the
//! top-K selector: an arbitrary name paired with a real-valued weight.

use std::fmt;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::traits::Weighted;

/// An immutable `(name, weight)` pair ordered by weight
///
/// Names are free-form text (empty names and duplicates are fine). Weights are
/// `f64` values under the total order of [`OrderedFloat`], so negative weights
/// order below zero and NaN orders above every other value.
///
/// Equality compares both fields; queue ordering only looks at the weight.
///
/// Serialized weights are numbers, except NaN and the infinities, which are
/// written as the strings `"NaN"`, `"inf"` and `"-inf"` since JSON has no
/// literal for them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Record {
    name: String,
    #[serde(with = "weight_repr")]
    weight: OrderedFloat<f64>,
}

impl Record {
    /// Creates a record from a name and a weight
    pub fn new(name: impl Into<String>, weight: f64) -> Self {
        Self {
            name: name.into(),
            weight: OrderedFloat(weight),
        }
    }

    /// Creates a record with an empty name
    pub fn unnamed(weight: f64) -> Self {
        Self::new(String::new(), weight)
    }

    /// The record's name, possibly empty
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The record's weight as a plain `f64`
    pub fn weight(&self) -> f64 {
        self.weight.into_inner()
    }

    /// Consumes the record, returning its parts
    pub fn into_parts(self) -> (String, f64) {
        (self.name, self.weight.into_inner())
    }
}

impl Weighted for Record {
    type Weight = OrderedFloat<f64>;

    fn weight(&self) -> &OrderedFloat<f64> {
        &self.weight
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{ {:?}, {} }}", self.name, self.weight)
    }
}

impl<S: Into<String>> From<(S, f64)> for Record {
    fn from((name, weight): (S, f64)) -> Self {
        Self::new(name, weight)
    }
}

/// Serde representation of a weight that survives NaN and infinities
mod weight_repr {
    use ordered_float::OrderedFloat;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(f64),
        Text(String),
    }

    pub fn serialize<S: Serializer>(weight: &OrderedFloat<f64>, serializer: S) -> Result<S::Ok, S::Error> {
        let w = weight.into_inner();
        if w.is_finite() {
            serializer.serialize_f64(w)
        } else if w.is_nan() {
            serializer.serialize_str("NaN")
        } else if w > 0.0 {
            serializer.serialize_str("inf")
        } else {
            serializer.serialize_str("-inf")
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<OrderedFloat<f64>, D::Error> {
        match Repr::deserialize(deserializer)? {
            Repr::Number(w) => Ok(OrderedFloat(w)),
            Repr::Text(text) => text
                .parse::<f64>()
                .map(OrderedFloat)
                .map_err(|_| D::Error::custom(format!("invalid weight {:?}", text))),
        }
    }
}
