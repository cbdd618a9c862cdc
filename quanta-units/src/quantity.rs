//! Quantity type - a value with an SI dimension

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Mul, Neg};
use serde::{Serialize, Deserialize};
use quanta_core::{format_number, Dimension, Dimensions, QuantaError, Result};
use crate::prefix::{engineering_exponent, prefix_name};
use crate::registry::{best_unit_in, UnitRegistry, REGISTRIES};
use crate::Unit;

/// Comparison operators, named the way mismatch errors report them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Comparison {
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
}

impl Comparison {
    pub fn name(self) -> &'static str {
        match self {
            Comparison::Lt => "LessThan",
            Comparison::Le => "LessThanOrEquals",
            Comparison::Gt => "GreaterThan",
            Comparison::Ge => "GreaterThanOrEquals",
            Comparison::Eq => "Equals",
            Comparison::Ne => "NotEquals",
        }
    }

    fn apply(self, a: f64, b: f64) -> bool {
        match self {
            Comparison::Lt => a < b,
            Comparison::Le => a <= b,
            Comparison::Gt => a > b,
            Comparison::Ge => a >= b,
            Comparison::Eq => a == b,
            Comparison::Ne => a != b,
        }
    }
}

/// A physical quantity: a value in SI base units and its dimension
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Quantity {
    /// The numeric value, in SI base units
    pub value: f64,
    /// The dimensional signature
    pub dimension: Dimension,
}

impl Quantity {
    /// Create a new quantity
    pub fn new(value: f64, dimension: Dimension) -> Self {
        Quantity { value, dimension }
    }

    /// Create a dimensionless quantity (pure number)
    pub fn dimensionless(value: f64) -> Self {
        Quantity::new(value, Dimension::DIMENSIONLESS)
    }

    pub fn is_dimensionless(&self) -> bool {
        self.dimension.is_dimensionless()
    }

    pub fn has_same_dimensions(&self, other: &Quantity) -> bool {
        self.dimension == other.dimension
    }

    fn require_same(&self, other: &Quantity, operation: &str) -> Result<()> {
        if self.has_same_dimensions(other) {
            Ok(())
        } else {
            Err(QuantaError::mismatch(operation, [self.dimension, other.dimension]))
        }
    }

    /// Add two quantities (must have the same dimension)
    pub fn add(&self, other: &Quantity) -> Result<Quantity> {
        self.require_same(other, "Addition")?;
        Ok(self.add_unchecked(other))
    }

    /// Subtract two quantities (must have the same dimension)
    pub fn sub(&self, other: &Quantity) -> Result<Quantity> {
        self.require_same(other, "Subtraction")?;
        Ok(Quantity::new(self.value - other.value, self.dimension))
    }

    /// Add a plain number. Zero is always allowed.
    pub fn add_scalar(&self, x: f64) -> Result<Quantity> {
        if x == 0.0 {
            return Ok(*self);
        }
        if !self.is_dimensionless() {
            return Err(QuantaError::mismatch("Addition", [self.dimension, Dimension::DIMENSIONLESS]));
        }
        Ok(Quantity::new(self.value + x, self.dimension))
    }

    /// Subtract a plain number. Zero is always allowed.
    pub fn sub_scalar(&self, x: f64) -> Result<Quantity> {
        if x == 0.0 {
            return Ok(*self);
        }
        if !self.is_dimensionless() {
            return Err(QuantaError::mismatch("Subtraction", [self.dimension, Dimension::DIMENSIONLESS]));
        }
        Ok(Quantity::new(self.value - x, self.dimension))
    }

    /// Sum without the dimension check; callers must have checked already.
    pub(crate) fn add_unchecked(&self, other: &Quantity) -> Quantity {
        Quantity::new(self.value + other.value, self.dimension)
    }

    /// Multiply two quantities (dimensions are multiplied)
    pub fn mul(&self, other: &Quantity) -> Result<Quantity> {
        Ok(Quantity::new(self.value * other.value, self.dimension.multiply(&other.dimension)?))
    }

    /// Divide two quantities (dimensions are divided)
    pub fn div(&self, other: &Quantity) -> Result<Quantity> {
        Ok(Quantity::new(self.value / other.value, self.dimension.divide(&other.dimension)?))
    }

    pub fn scale(&self, factor: f64) -> Quantity {
        Quantity::new(self.value * factor, self.dimension)
    }

    /// Raise to a real power; fractional dimension exponents are rejected
    pub fn pow(&self, exp: f64) -> Result<Quantity> {
        let dimension = self
            .dimension
            .powf(exp)
            .ok_or_else(|| QuantaError::mismatch("Power", [self.dimension]))?;
        Ok(Quantity::new(self.value.powf(exp), dimension))
    }

    /// Raise to a power given as a quantity, which must be dimensionless
    pub fn pow_quantity(&self, exp: &Quantity) -> Result<Quantity> {
        if !exp.is_dimensionless() {
            return Err(QuantaError::mismatch("Power", [self.dimension, exp.dimension]));
        }
        self.pow(exp.value)
    }

    pub fn neg(&self) -> Quantity {
        Quantity::new(-self.value, self.dimension)
    }

    pub fn abs(&self) -> Quantity {
        Quantity::new(self.value.abs(), self.dimension)
    }

    /// Take the square root (dimension exponents must be even)
    pub fn sqrt(&self) -> Result<Quantity> {
        self.pow(0.5)
    }

    pub fn recip(&self) -> Result<Quantity> {
        Ok(Quantity::new(1.0 / self.value, self.dimension.invert()?))
    }

    /// Dimension-checked comparison
    pub fn compare(&self, other: &Quantity, op: Comparison) -> Result<bool> {
        self.require_same(other, op.name())?;
        Ok(op.apply(self.value, other.value))
    }

    /// Compare against a plain number; comparing with zero is always legal
    pub fn compare_scalar(&self, x: f64, op: Comparison) -> Result<bool> {
        if x != 0.0 && !self.is_dimensionless() {
            return Err(QuantaError::mismatch(op.name(), [self.dimension, Dimension::DIMENSIONLESS]));
        }
        Ok(op.apply(self.value, x))
    }

    /// Render as `"<x/u> <u>"`
    pub fn in_unit(&self, unit: &Unit) -> Result<String> {
        let ratio = self.ratio_to(unit)?;
        Ok(with_unit(format_number(ratio), unit))
    }

    /// Render as `"<x/u> <prefix> <u>"`, the prefix chosen by engineering
    /// exponent (e.g. `"1.5 kilo mi"`)
    pub fn in_unit_prefixed(&self, unit: &Unit) -> Result<String> {
        let ratio = self.ratio_to(unit)?;
        let exponent = engineering_exponent(ratio);
        let prefix = prefix_name(exponent).unwrap_or("");
        let mantissa = format_number(ratio / 10f64.powi(exponent));
        let number = if prefix.is_empty() {
            mantissa
        } else {
            format!("{} {}", mantissa, prefix)
        };
        Ok(with_unit(number, unit))
    }

    fn ratio_to(&self, unit: &Unit) -> Result<f64> {
        if self.dimension != unit.dimension {
            return Err(QuantaError::mismatch(
                "Non-matching unit for method in_unit",
                [self.dimension, unit.dimension],
            ));
        }
        Ok(self.value / unit.value)
    }

    /// Render in the best unit of the global registries
    pub fn in_best_unit(&self) -> String {
        if self.is_dimensionless() {
            return format_number(self.value);
        }
        let found = {
            let registries = REGISTRIES.read().unwrap_or_else(|e| e.into_inner());
            registries.best_unit(self).cloned()
        };
        self.render_best(found)
    }

    /// Render in the best unit of the given registries, searched in order
    pub fn in_best_unit_with(&self, registries: &[&UnitRegistry]) -> String {
        if self.is_dimensionless() {
            return format_number(self.value);
        }
        let found = best_unit_in(registries, self).cloned();
        self.render_best(found)
    }

    fn render_best(&self, unit: Option<Unit>) -> String {
        match unit {
            Some(unit) => with_unit(format_number(self.value / unit.value), &unit),
            None => format!("{} {}", format_number(self.value), self.dimension),
        }
    }

    pub fn dimensions(&self) -> Dimensions {
        Dimensions::proper(self.dimension)
    }
}

fn with_unit(number: String, unit: &Unit) -> String {
    if unit.is_dimensionless() {
        number
    } else {
        format!("{} {}", number, unit)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.in_best_unit())
    }
}

impl PartialEq for Quantity {
    fn eq(&self, other: &Self) -> bool {
        self.dimension == other.dimension && self.value == other.value
    }
}

impl PartialOrd for Quantity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.dimension != other.dimension {
            return None;
        }
        self.value.partial_cmp(&other.value)
    }
}

impl Mul<f64> for Quantity {
    type Output = Quantity;

    fn mul(self, rhs: f64) -> Quantity {
        self.scale(rhs)
    }
}

impl Neg for Quantity {
    type Output = Quantity;

    fn neg(self) -> Quantity {
        Quantity::neg(&self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn metres(x: f64) -> Quantity {
        Quantity::new(x, Dimension::LENGTH)
    }

    fn seconds(x: f64) -> Quantity {
        Quantity::new(x, Dimension::TIME)
    }

    #[test]
    fn test_add_same_dimension() {
        let sum = metres(2.0).add(&metres(3.0)).unwrap();
        assert_eq!(sum, metres(5.0));
    }

    #[test]
    fn test_add_mismatch() {
        let err = metres(1.0).add(&seconds(1.0)).unwrap_err();
        match err {
            QuantaError::DimensionMismatch { operation, operands } => {
                assert_eq!(operation, "Addition");
                assert_eq!(operands.len(), 2);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_scalar_zero_identity() {
        assert_eq!(metres(1.0).add_scalar(0.0).unwrap(), metres(1.0));
        assert_eq!(metres(1.0).sub_scalar(0.0).unwrap(), metres(1.0));
        assert!(metres(1.0).add_scalar(2.0).is_err());
        let ratio = Quantity::dimensionless(0.5).add_scalar(2.0).unwrap();
        assert_relative_eq!(ratio.value, 2.5);
    }

    #[test]
    fn test_mul_div() {
        let speed = metres(10.0).div(&seconds(2.0)).unwrap();
        assert_eq!(speed.dimension, Dimension::VELOCITY);
        assert_relative_eq!(speed.value, 5.0);
        assert_eq!(Quantity::mul(&speed, &seconds(2.0)).unwrap().dimension, Dimension::LENGTH);
        assert_eq!(metres(2.0).recip().unwrap().dimension, Dimension::LENGTH.invert().unwrap());
        assert_relative_eq!((metres(2.0) * 3.0).value, 6.0);
    }

    #[test]
    fn test_mul_exponent_overflow() {
        let huge = Quantity::new(1.0, Dimension::LENGTH.power(2_000_000_000).unwrap());
        let err = Quantity::mul(&huge, &huge).unwrap_err();
        assert_eq!(err, QuantaError::exponent_range("Multiplication"));
        assert!(huge.div(&huge.recip().unwrap()).is_err());
    }

    #[test]
    fn test_pow() {
        let area = metres(3.0).pow(2.0).unwrap();
        assert_eq!(area.dimension, Dimension::AREA);
        assert_relative_eq!(area.value, 9.0);
        assert_relative_eq!(area.sqrt().unwrap().value, 3.0);
        assert!(metres(4.0).sqrt().is_err());
        assert!(metres(2.0).pow_quantity(&seconds(2.0)).is_err());
        let cube = metres(2.0).pow_quantity(&Quantity::dimensionless(3.0)).unwrap();
        assert_relative_eq!(cube.value, 8.0);
    }

    #[test]
    fn test_neg_abs() {
        assert_eq!(-metres(2.0), metres(-2.0));
        assert_eq!(metres(-2.0).abs(), metres(2.0));
    }

    #[test]
    fn test_comparisons() {
        assert!(metres(1.0).compare(&metres(2.0), Comparison::Lt).unwrap());
        assert!(!metres(1.0).compare(&metres(2.0), Comparison::Ge).unwrap());
        assert!(metres(1.0).compare_scalar(0.0, Comparison::Gt).unwrap());

        let err = metres(1.0).compare(&seconds(1.0), Comparison::Le).unwrap_err();
        assert!(matches!(err, QuantaError::DimensionMismatch { ref operation, .. } if operation == "LessThanOrEquals"));
        assert!(metres(1.0).compare_scalar(1.0, Comparison::Eq).is_err());

        assert!(metres(1.0) < metres(2.0));
        assert_eq!(metres(1.0).partial_cmp(&seconds(1.0)), None);
        assert_ne!(metres(1.0), seconds(1.0));
    }

    #[test]
    fn test_in_unit() {
        let mile = Unit::create(Dimension::LENGTH, "mile", "mi", 1609.344);
        assert_eq!(metres(3218.688).in_unit(&mile).unwrap(), "2 mi");
        assert_eq!(metres(3218.688).in_unit_prefixed(&mile).unwrap(), "2 mi");
        assert_eq!(metres(3218688.0).in_unit_prefixed(&mile).unwrap(), "2 kilo mi");

        let err = seconds(1.0).in_unit(&mile).unwrap_err();
        assert!(matches!(err, QuantaError::DimensionMismatch { ref operation, .. }
            if operation == "Non-matching unit for method in_unit"));
    }

    #[test]
    fn test_best_unit_with_explicit_registry() {
        let mut registry = UnitRegistry::new();
        registry.add(Unit::create(Dimension::LENGTH, "metre", "m", 1.0));
        registry.add(Unit::create(Dimension::LENGTH, "kilometer", "km", 1000.0));

        assert_eq!(metres(5.0).in_best_unit_with(&[&registry]), "5 m");
        assert_eq!(metres(5000.0).in_best_unit_with(&[&registry]), "5 km");
        assert_eq!(seconds(2.0).in_best_unit_with(&[&registry]), "2 s");
        assert_eq!(Quantity::dimensionless(0.25).in_best_unit_with(&[&registry]), "0.25");
    }

    #[test]
    fn test_display_uses_standard_units() {
        assert_eq!(metres(5.0).to_string(), "5 m");
        assert_eq!(Quantity::new(3.0, Dimension::FORCE).to_string(), "3 N");
        assert_eq!(Quantity::dimensionless(4.0).to_string(), "4");
    }
}
