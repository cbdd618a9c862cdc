//! On-the-fly dimensions
//!
//! A `Flydim` is a dimension built from identifiers invented while parsing
//! ("house", "widget"), combined the same way as [`Dimension`] but keyed by
//! name instead of a fixed slot.

use std::collections::BTreeMap;
use std::fmt;
use serde::{Serialize, Deserialize};
use crate::dimension::{integral, Dimension};
use crate::error::{QuantaError, Result};

/// Sparse map from invented identifier to exponent.
///
/// Entries with a zero exponent never survive an operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Flydim {
    dims: BTreeMap<String, i32>,
}

impl Flydim {
    /// Single identifier raised to the first power
    pub fn new(name: impl Into<String>) -> Self {
        let mut dims = BTreeMap::new();
        dims.insert(name.into(), 1);
        Flydim { dims }
    }

    /// No invented dimensions at all
    pub fn empty() -> Self {
        Flydim::default()
    }

    pub fn is_dimensionless(&self) -> bool {
        self.dims.is_empty()
    }

    /// Exponent of `name`, zero when absent
    pub fn exponent(&self, name: &str) -> i32 {
        self.dims.get(name).copied().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, i32)> {
        self.dims.iter().map(|(k, &v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.dims.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dims.is_empty()
    }

    pub fn multiply(&self, other: &Flydim) -> Result<Flydim> {
        self.merge(other, "Multiplication", i32::checked_add)
    }

    pub fn divide(&self, other: &Flydim) -> Result<Flydim> {
        self.merge(other, "Division", i32::checked_sub)
    }

    pub fn powi(&self, exp: i32) -> Result<Flydim> {
        let mut dims = BTreeMap::new();
        for (name, &e) in &self.dims {
            let scaled = e
                .checked_mul(exp)
                .ok_or_else(|| QuantaError::exponent_range("Power"))?;
            if scaled != 0 {
                dims.insert(name.clone(), scaled);
            }
        }
        Ok(Flydim { dims })
    }

    /// Real power; `None` if any exponent would become fractional
    pub fn powf(&self, exp: f64) -> Option<Flydim> {
        let mut dims = BTreeMap::new();
        for (name, &e) in &self.dims {
            let scaled = integral(e as f64 * exp)?;
            if scaled != 0 {
                dims.insert(name.clone(), scaled);
            }
        }
        Some(Flydim { dims })
    }

    pub fn invert(&self) -> Result<Flydim> {
        self.powi(-1)
    }

    fn merge(
        &self,
        other: &Flydim,
        operation: &str,
        op: fn(i32, i32) -> Option<i32>,
    ) -> Result<Flydim> {
        let mut dims = self.dims.clone();
        for (name, &exp) in &other.dims {
            let entry = dims.entry(name.clone()).or_insert(0);
            *entry = op(*entry, exp).ok_or_else(|| QuantaError::exponent_range(operation))?;
        }
        dims.retain(|_, exp| *exp != 0);
        Ok(Flydim { dims })
    }
}

impl fmt::Display for Flydim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .dims
            .iter()
            .map(|(name, &exp)| {
                if exp == 1 {
                    name.clone()
                } else {
                    format!("{}^{}", name, exp)
                }
            })
            .collect();
        write!(f, "{}", parts.join(" "))
    }
}

/// Combined (proper, invented) dimension of any value.
///
/// Plain numbers and quantities get an empty fly half so that dimensions of
/// mixed value kinds always compare cleanly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimensions {
    pub proper: Dimension,
    pub fly: Flydim,
}

impl Dimensions {
    pub fn new(proper: Dimension, fly: Flydim) -> Self {
        Dimensions { proper, fly }
    }

    pub fn proper(proper: Dimension) -> Self {
        Dimensions { proper, fly: Flydim::empty() }
    }

    pub fn dimensionless() -> Self {
        Dimensions::default()
    }

    pub fn is_dimensionless(&self) -> bool {
        self.proper.is_dimensionless() && self.fly.is_dimensionless()
    }
}

impl From<Dimension> for Dimensions {
    fn from(proper: Dimension) -> Self {
        Dimensions::proper(proper)
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.proper.is_dimensionless(), self.fly.is_dimensionless()) {
            (_, true) => write!(f, "{}", self.proper),
            (true, false) => write!(f, "{}", self.fly),
            (false, false) => write!(f, "{} {}", self.proper, self.fly),
        }
    }
}
