//! Values produced by evaluating quantity expressions
//!
//! A value is a plain number, a quantity, a named unit or a flyquant.
//! Arithmetic dispatches over every pairing; anything touching a flyquant
//! is normalised back to the simplest kind.

use std::fmt;
use serde::{Deserialize, Serialize};
use quanta_core::{format_number, Dimension, Dimensions, QuantaError, Result};
use crate::{Flyquant, Quantity, Unit};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Value {
    Number(f64),
    Quantity(Quantity),
    Unit(Unit),
    Flyquant(Flyquant),
}

impl Value {
    // ========== Safe Accessors (never panic) ==========

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(x) => Some(*x),
            _ => None,
        }
    }

    /// The SI part of a number, quantity or unit
    pub fn as_quantity(&self) -> Option<Quantity> {
        match self {
            Value::Number(x) => Some(Quantity::dimensionless(*x)),
            Value::Quantity(q) => Some(*q),
            Value::Unit(u) => Some(u.as_quantity()),
            Value::Flyquant(_) => None,
        }
    }

    pub fn as_unit(&self) -> Option<&Unit> {
        match self {
            Value::Unit(u) => Some(u),
            _ => None,
        }
    }

    pub fn as_flyquant(&self) -> Option<&Flyquant> {
        match self {
            Value::Flyquant(f) => Some(f),
            _ => None,
        }
    }

    /// Numeric value in SI base units
    pub fn magnitude(&self) -> f64 {
        match self {
            Value::Number(x) => *x,
            Value::Quantity(q) => q.value,
            Value::Unit(u) => u.value,
            Value::Flyquant(f) => f.quant.value,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "Number",
            Value::Quantity(_) => "Quantity",
            Value::Unit(_) => "Unit",
            Value::Flyquant(_) => "Flyquant",
        }
    }

    /// `(proper, fly)` dimensions, with an empty half where a kind has none
    pub fn dimensions(&self) -> Dimensions {
        match self {
            Value::Number(_) => Dimensions::dimensionless(),
            Value::Quantity(q) => Dimensions::proper(q.dimension),
            Value::Unit(u) => Dimensions::proper(u.dimension),
            Value::Flyquant(f) => f.dimensions(),
        }
    }

    pub fn proper_dimension(&self) -> Dimension {
        self.dimensions().proper
    }

    pub fn is_dimensionless(&self) -> bool {
        self.dimensions().is_dimensionless()
    }

    fn is_zero_number(&self) -> bool {
        matches!(self, Value::Number(x) if *x == 0.0)
    }

    // ========== Arithmetic ==========

    /// Product of two values; fails only when a dimension exponent
    /// leaves the `i32` range
    pub fn mul(&self, other: &Value) -> Result<Value> {
        match (self, other) {
            (Value::Flyquant(_), _) | (_, Value::Flyquant(_)) => {
                Flyquant::fly(self).mul(&Flyquant::fly(other))
            }
            (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a * b)),
            (Value::Unit(a), Value::Unit(b)) => Ok(Value::Unit(a.multiply(b)?)),
            (a, b) => Ok(Value::Quantity(a.quantity_part().mul(&b.quantity_part())?)),
        }
    }

    pub fn div(&self, other: &Value) -> Result<Value> {
        match (self, other) {
            (Value::Flyquant(_), _) | (_, Value::Flyquant(_)) => {
                Flyquant::fly(self).div(&Flyquant::fly(other))
            }
            (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a / b)),
            (Value::Unit(a), Value::Unit(b)) => Ok(Value::Unit(a.divide(b)?)),
            (a, b) => Ok(Value::Quantity(a.quantity_part().div(&b.quantity_part())?)),
        }
    }

    /// Dimension-checked sum. A plain `0` is an identity for numbers,
    /// quantities and units.
    pub fn add(&self, other: &Value) -> Result<Value> {
        match (self, other) {
            (Value::Flyquant(_), _) | (_, Value::Flyquant(_)) => {
                Flyquant::fly(self).add(&Flyquant::fly(other))
            }
            (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
            (Value::Number(x), q) | (q, Value::Number(x)) => {
                Ok(Value::Quantity(q.quantity_part().add_scalar(*x)?))
            }
            (a, b) => Ok(Value::Quantity(a.quantity_part().add(&b.quantity_part())?)),
        }
    }

    pub fn sub(&self, other: &Value) -> Result<Value> {
        match (self, other) {
            (Value::Flyquant(_), _) | (_, Value::Flyquant(_)) => {
                Flyquant::fly(self).sub(&Flyquant::fly(other))
            }
            (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a - b)),
            (q, Value::Number(x)) => Ok(Value::Quantity(q.quantity_part().sub_scalar(*x)?)),
            (Value::Number(x), q) => {
                if self.is_zero_number() {
                    return Ok(Value::Quantity(q.quantity_part().neg()));
                }
                Ok(Value::Quantity(q.quantity_part().neg().add_scalar(*x)?))
            }
            (a, b) => Ok(Value::Quantity(a.quantity_part().sub(&b.quantity_part())?)),
        }
    }

    /// Raise to a power; the exponent must be dimensionless
    pub fn pow(&self, exp: &Value) -> Result<Value> {
        if !exp.is_dimensionless() {
            return Err(QuantaError::mismatch("Power", [self.dimensions(), exp.dimensions()]));
        }
        let x = exp.magnitude();
        match self {
            Value::Number(a) => Ok(Value::Number(a.powf(x))),
            Value::Quantity(q) => Ok(Value::Quantity(q.pow(x)?)),
            Value::Unit(u) => Ok(Value::Unit(u.powf(x)?)),
            Value::Flyquant(f) => f.powf(x),
        }
    }

    pub fn neg(&self) -> Value {
        match self {
            Value::Number(x) => Value::Number(-x),
            Value::Quantity(q) => Value::Quantity(q.neg()),
            Value::Unit(u) => Value::Quantity(u.as_quantity().neg()),
            Value::Flyquant(f) => Value::Flyquant(f.neg()),
        }
    }

    fn quantity_part(&self) -> Quantity {
        match self {
            Value::Flyquant(f) => f.quant,
            other => other.as_quantity().unwrap_or_else(|| Quantity::dimensionless(other.magnitude())),
        }
    }
}

// ========== Conversions ==========

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Number(x)
    }
}

impl From<Quantity> for Value {
    fn from(q: Quantity) -> Self {
        Value::Quantity(q)
    }
}

impl From<Unit> for Value {
    fn from(u: Unit) -> Self {
        Value::Unit(u)
    }
}

impl From<Flyquant> for Value {
    fn from(f: Flyquant) -> Self {
        Value::Flyquant(f)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(x) => write!(f, "{}", format_number(*x)),
            Value::Quantity(q) => write!(f, "{}", q),
            Value::Unit(u) => write!(f, "{}", u),
            Value::Flyquant(fq) => write!(f, "{}", fq),
        }
    }
}
