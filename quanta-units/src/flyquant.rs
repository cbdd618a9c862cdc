//! Quantities carrying invented dimensions alongside SI ones

use std::fmt;
use serde::{Serialize, Deserialize};
use quanta_core::{format_number, Dimensions, Flydim, QuantaError, Result};
use crate::{Quantity, Unit, Value};

/// A quantity whose dimension mixes SI exponents and on-the-fly names,
/// e.g. `3 m house^-1`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flyquant {
    pub quant: Quantity,
    pub fly: Flydim,
}

impl Flyquant {
    pub fn new(quant: Quantity, fly: Flydim) -> Self {
        Flyquant { quant, fly }
    }

    /// One of a freshly invented dimension
    pub fn named(name: impl Into<String>) -> Self {
        Flyquant::new(Quantity::dimensionless(1.0), Flydim::new(name))
    }

    /// Lift any value into a flyquant
    pub fn fly(value: &Value) -> Flyquant {
        match value {
            Value::Number(x) => Flyquant::new(Quantity::dimensionless(*x), Flydim::empty()),
            Value::Quantity(q) => Flyquant::new(*q, Flydim::empty()),
            Value::Unit(u) => Flyquant::new(u.as_quantity(), Flydim::empty()),
            Value::Flyquant(f) => f.clone(),
        }
    }

    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.quant.dimension, self.fly.clone())
    }

    /// True when no invented dimension is left
    pub fn is_proper_unit(&self) -> bool {
        self.fly.is_dimensionless()
    }

    /// Collapse to the simplest value kind: a number when both parts are
    /// dimensionless, a quantity when only the fly part is.
    pub fn simplify(self) -> Value {
        match (self.fly.is_dimensionless(), self.quant.is_dimensionless()) {
            (true, true) => Value::Number(self.quant.value),
            (true, false) => Value::Quantity(self.quant),
            (false, _) => Value::Flyquant(self),
        }
    }

    pub fn mul(&self, other: &Flyquant) -> Result<Value> {
        Ok(Flyquant::new(self.quant.mul(&other.quant)?, self.fly.multiply(&other.fly)?).simplify())
    }

    pub fn div(&self, other: &Flyquant) -> Result<Value> {
        Ok(Flyquant::new(self.quant.div(&other.quant)?, self.fly.divide(&other.fly)?).simplify())
    }

    fn require_same(&self, other: &Flyquant, operation: &str) -> Result<()> {
        if self.quant.dimension == other.quant.dimension && self.fly == other.fly {
            Ok(())
        } else {
            Err(QuantaError::mismatch(operation, [self.dimensions(), other.dimensions()]))
        }
    }

    pub fn add(&self, other: &Flyquant) -> Result<Value> {
        self.require_same(other, "Addition")?;
        Ok(Flyquant::new(self.quant.add_unchecked(&other.quant), self.fly.clone()).simplify())
    }

    pub fn sub(&self, other: &Flyquant) -> Result<Value> {
        self.require_same(other, "Subtraction")?;
        Ok(Flyquant::new(self.quant.add_unchecked(&other.quant.neg()), self.fly.clone()).simplify())
    }

    /// Raise to a power; the exponent must be dimensionless in both parts
    pub fn pow(&self, exp: &Flyquant) -> Result<Value> {
        if !exp.dimensions().is_dimensionless() {
            return Err(QuantaError::mismatch("Power", [self.dimensions(), exp.dimensions()]));
        }
        self.powf(exp.quant.value)
    }

    pub fn powf(&self, exp: f64) -> Result<Value> {
        let fly = self
            .fly
            .powf(exp)
            .ok_or_else(|| QuantaError::mismatch("Power", [self.dimensions()]))?;
        Ok(Flyquant::new(self.quant.pow(exp)?, fly).simplify())
    }

    pub fn neg(&self) -> Flyquant {
        Flyquant::new(self.quant.neg(), self.fly.clone())
    }

    pub fn abs(&self) -> Flyquant {
        Flyquant::new(self.quant.abs(), self.fly.clone())
    }

    pub fn invert(&self) -> Result<Flyquant> {
        Ok(Flyquant::new(self.quant.recip()?, self.fly.invert()?))
    }

    /// The SI part, provided no invented dimension remains
    pub fn to_quant(&self) -> Result<Quantity> {
        if !self.is_proper_unit() {
            return Err(QuantaError::mismatch(
                "Conversion to Quantity",
                [self.dimensions(), Dimensions::proper(self.quant.dimension)],
            ));
        }
        Ok(self.quant)
    }

    /// Render as `"<x/u> <u> <fly>"`; both parts must match
    pub fn in_unit(&self, unit: &Unit, fly: &Flydim) -> Result<String> {
        if self.quant.dimension != unit.dimension || &self.fly != fly {
            return Err(QuantaError::mismatch(
                "Non-matching unit for method in_unit",
                [self.dimensions(), Dimensions::new(unit.dimension, fly.clone())],
            ));
        }
        let number = format_number(self.quant.value / unit.value);
        let parts: Vec<String> = [number, unit_part(unit), fly.to_string()]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect();
        Ok(parts.join(" "))
    }
}

fn unit_part(unit: &Unit) -> String {
    if unit.is_dimensionless() {
        String::new()
    } else {
        unit.to_string()
    }
}

/// `(proper, fly)` dimensions of any value
pub fn get_dimensions(value: &Value) -> Dimensions {
    value.dimensions()
}

/// Dimensionless in both the SI and the invented part
pub fn is_dimensionless(value: &Value) -> bool {
    get_dimensions(value).is_dimensionless()
}

impl fmt::Display for Flyquant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.fly.is_dimensionless() {
            write!(f, "{}", self.quant)
        } else {
            write!(f, "{} {}", self.quant, self.fly)
        }
    }
}
