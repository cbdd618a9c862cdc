//! Named units with display symbols

use std::collections::BTreeMap;
use std::fmt;
use serde::{Serialize, Deserialize};
use quanta_core::{Dimension, QuantaError, Result, SI_LABELS};
use crate::Quantity;

/// One symbol of a [`DisplayName`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
struct Term {
    exponent: i32,
    /// First base slot the symbol's unit spans, used for ordering
    slot: usize,
}

/// Multiset of display symbols with their exponents (e.g. `{m: 1, s: -1}`).
///
/// Zero exponents are pruned after every operation. Symbols print in base
/// slot order of the unit they came from (`m kg s^-2`), then by symbol.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayName(BTreeMap<String, Term>);

impl DisplayName {
    /// Single symbol to the first power; an empty symbol gives an empty multiset
    pub fn new(symbol: &str, dimension: &Dimension) -> Self {
        let mut map = BTreeMap::new();
        if !symbol.is_empty() {
            let slot = dimension
                .exponents
                .iter()
                .position(|&e| e != 0)
                .unwrap_or(SI_LABELS.len());
            map.insert(symbol.to_string(), Term { exponent: 1, slot });
        }
        DisplayName(map)
    }

    pub fn empty() -> Self {
        DisplayName::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn exponent(&self, symbol: &str) -> i32 {
        self.0.get(symbol).map(|t| t.exponent).unwrap_or(0)
    }

    /// Symbols with their exponents, in display order
    pub fn iter(&self) -> impl Iterator<Item = (&str, i32)> {
        let mut terms: Vec<(&String, &Term)> = self.0.iter().collect();
        terms.sort_by_key(|(_, term)| term.slot);
        terms.into_iter().map(|(k, t)| (k.as_str(), t.exponent))
    }

    pub fn multiply(&self, other: &DisplayName) -> Result<DisplayName> {
        self.merge(other, "Multiplication", i32::checked_add)
    }

    pub fn divide(&self, other: &DisplayName) -> Result<DisplayName> {
        self.merge(other, "Division", i32::checked_sub)
    }

    pub fn powi(&self, exp: i32) -> Result<DisplayName> {
        let mut map = BTreeMap::new();
        for (symbol, term) in &self.0 {
            let exponent = term
                .exponent
                .checked_mul(exp)
                .ok_or_else(|| QuantaError::exponent_range("Power"))?;
            if exponent != 0 {
                map.insert(symbol.clone(), Term { exponent, ..*term });
            }
        }
        Ok(DisplayName(map))
    }

    /// Real power, `None` when a symbol would get a fractional or
    /// out-of-range exponent
    pub fn powf(&self, exp: f64) -> Option<DisplayName> {
        let mut map = BTreeMap::new();
        for (symbol, term) in &self.0 {
            let scaled = term.exponent as f64 * exp;
            if scaled.fract() != 0.0 || !scaled.is_finite() || scaled.abs() > i32::MAX as f64 {
                return None;
            }
            if scaled != 0.0 {
                map.insert(symbol.clone(), Term { exponent: scaled as i32, ..*term });
            }
        }
        Some(DisplayName(map))
    }

    fn merge(
        &self,
        other: &DisplayName,
        operation: &str,
        op: fn(i32, i32) -> Option<i32>,
    ) -> Result<DisplayName> {
        let mut map = self.0.clone();
        for (symbol, term) in &other.0 {
            let entry = map
                .entry(symbol.clone())
                .or_insert(Term { exponent: 0, slot: term.slot });
            entry.exponent = op(entry.exponent, term.exponent)
                .ok_or_else(|| QuantaError::exponent_range(operation))?;
        }
        map.retain(|_, term| term.exponent != 0);
        Ok(DisplayName(map))
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .iter()
            .map(|(symbol, exp)| {
                if exp == 1 {
                    symbol.to_string()
                } else {
                    format!("{}^{}", symbol, exp)
                }
            })
            .collect();
        write!(f, "{}", parts.join(" "))
    }
}

/// A named unit: a scale in SI base units, its dimension and how to print it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    /// The unit name (e.g., "metre", "newton", "mile")
    pub name: String,
    /// Size of one of this unit in SI base units
    pub value: f64,
    /// The dimensional signature
    pub dimension: Dimension,
    /// Display symbols (e.g., {"m": 1})
    pub display: DisplayName,
    /// Set once the unit came out of unit arithmetic. A compound unit
    /// without display symbols prints in SI labels, a plain one by name.
    pub is_compound: bool,
}

impl Unit {
    /// Create a new named unit
    pub fn create(dimension: Dimension, name: &str, display_name: &str, scale: f64) -> Self {
        Unit {
            name: name.to_string(),
            value: scale,
            dimension,
            display: DisplayName::new(display_name, &dimension),
            is_compound: false,
        }
    }

    /// Dimensionless unit of size 1 with nothing to display
    pub fn one() -> Self {
        Unit::create(Dimension::DIMENSIONLESS, "", "", 1.0)
    }

    pub fn scale(&self) -> f64 {
        self.value
    }

    pub fn as_quantity(&self) -> Quantity {
        Quantity::new(self.value, self.dimension)
    }

    pub fn is_dimensionless(&self) -> bool {
        self.dimension.is_dimensionless()
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    /// Replace the display multiset by a single symbol
    pub fn set_display_name(&mut self, display_name: &str) {
        self.display = DisplayName::new(display_name, &self.dimension);
    }

    /// Multiply two units (e.g., newton * metre -> N m)
    pub fn multiply(&self, other: &Unit) -> Result<Unit> {
        Ok(Unit {
            name: format!("{}*{}", self.name, other.name),
            value: self.value * other.value,
            dimension: self.dimension.multiply(&other.dimension)?,
            display: self.display.multiply(&other.display)?,
            is_compound: true,
        })
    }

    /// Divide two units (e.g., metre / second -> m s^-1)
    pub fn divide(&self, other: &Unit) -> Result<Unit> {
        Ok(Unit {
            name: format!("{}/{}", self.name, other.name),
            value: self.value / other.value,
            dimension: self.dimension.divide(&other.dimension)?,
            display: self.display.divide(&other.display)?,
            is_compound: true,
        })
    }

    /// Raise to an integer power
    pub fn powi(&self, exp: i32) -> Result<Unit> {
        Ok(Unit {
            name: format!("{}^{}", self.name, exp),
            value: self.value.powi(exp),
            dimension: self.dimension.power(exp)?,
            display: self.display.powi(exp)?,
            is_compound: true,
        })
    }

    /// Raise to a real power.
    ///
    /// Fails when the dimension would need fractional exponents. Display
    /// symbols that cannot take the power are dropped, so the unit then
    /// prints in SI labels.
    pub fn powf(&self, exp: f64) -> Result<Unit> {
        if exp.fract() == 0.0 && exp.abs() <= i32::MAX as f64 {
            return self.powi(exp as i32);
        }
        let dimension = self
            .dimension
            .powf(exp)
            .ok_or_else(|| QuantaError::mismatch("Power", [self.dimension]))?;
        Ok(Unit {
            name: format!("{}^{}", self.name, exp),
            value: self.value.powf(exp),
            dimension,
            display: self.display.powf(exp).unwrap_or_default(),
            is_compound: true,
        })
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.display.is_empty() {
            write!(f, "{}", self.display)
        } else if !self.is_compound && !self.name.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}", self.dimension)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn metre() -> Unit {
        Unit::create(Dimension::LENGTH, "metre", "m", 1.0)
    }

    fn second() -> Unit {
        Unit::create(Dimension::TIME, "second", "s", 1.0)
    }

    #[test]
    fn test_create() {
        let mile = Unit::create(Dimension::LENGTH, "mile", "mi", 1609.344);
        assert_eq!(mile.to_string(), "mi");
        assert!(!mile.is_compound);
        assert_relative_eq!(mile.as_quantity().value, 1609.344);
    }

    #[test]
    fn test_divide_merges_display() {
        let speed = metre().divide(&second()).unwrap();
        assert!(speed.is_compound);
        assert_eq!(speed.dimension, Dimension::VELOCITY);
        assert_eq!(speed.to_string(), "m s^-1");
        assert_eq!(speed.name, "metre/second");
    }

    #[test]
    fn test_multiply_prunes() {
        let m = metre();
        let cancelled = m.multiply(&m.powi(-1).unwrap()).unwrap();
        assert!(cancelled.display.is_empty());
        assert!(cancelled.is_dimensionless());
        assert_eq!(cancelled.to_string(), "1");
    }

    #[test]
    fn test_powers() {
        let area = metre().powi(2).unwrap();
        assert_eq!(area.to_string(), "m^2");
        let side = area.powf(0.5).unwrap();
        assert_eq!(side.dimension, Dimension::LENGTH);
        assert_eq!(side.to_string(), "m");
        assert!(metre().powf(0.5).is_err());
    }

    #[test]
    fn test_empty_display_falls_back_to_dimension() {
        let mut unit = metre().divide(&second().powi(2).unwrap()).unwrap();
        unit.display = DisplayName::empty();
        assert_eq!(unit.to_string(), "m s^-2");
    }

    #[test]
    fn test_plain_unit_without_symbol_prints_name() {
        let smoot = Unit::create(Dimension::LENGTH, "smoot", "", 1.7018);
        assert!(!smoot.is_compound);
        assert_eq!(smoot.to_string(), "smoot");

        let doubled = smoot.powi(2).unwrap();
        assert!(doubled.is_compound);
        assert_eq!(doubled.to_string(), "m^2");
        assert_eq!(Unit::one().to_string(), "1");
    }

    #[test]
    fn test_display_in_slot_order() {
        let kilogram = Unit::create(Dimension::MASS, "kilogram", "kg", 1.0);
        let newton = kilogram
            .multiply(&metre())
            .unwrap()
            .divide(&second().powi(2).unwrap())
            .unwrap();
        assert_eq!(newton.to_string(), "m kg s^-2");

        let per_kg_m = second().divide(&kilogram).unwrap().divide(&metre()).unwrap();
        assert_eq!(per_kg_m.to_string(), "m^-1 kg^-1 s");

        let ampere = Unit::create(Dimension::CURRENT, "ampere", "A", 1.0);
        let radian = Unit::create(Dimension::DIMENSIONLESS, "radian", "rad", 1.0);
        let mixed = radian.multiply(&ampere).unwrap().multiply(&second()).unwrap();
        assert_eq!(mixed.to_string(), "s A rad");
    }

    #[test]
    fn test_exponent_overflow() {
        let err = metre().powf(2147483647.0).and_then(|u| u.powi(2)).unwrap_err();
        assert_eq!(err, QuantaError::exponent_range("Power"));

        let big = metre().powi(2_000_000_000).unwrap();
        assert!(big.multiply(&big).is_err());
        assert!(big.divide(&big.powi(-1).unwrap()).is_err());
    }

    #[test]
    fn test_set_names() {
        let mut unit = metre().multiply(&metre()).unwrap();
        unit.set_name("square metre");
        unit.set_display_name("sqm");
        assert_eq!(unit.name, "square metre");
        assert_eq!(unit.to_string(), "sqm");
    }
}
