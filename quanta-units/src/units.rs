//! Unit definitions - fundamental, SI derived and conversion units

use std::collections::HashMap;
use std::sync::{Arc, LazyLock};
use quanta_core::{Dimension, QuantaError, Result};
use crate::{Quantity, Unit};

/// Global unit table, built once and shared by every parser
pub static UNITS: LazyLock<Arc<UnitTable>> = LazyLock::new(|| Arc::new(build_unit_table()));

const FUNDAMENTAL: &[(&str, &str, Dimension)] = &[
    ("metre", "m", Dimension::LENGTH),
    ("meter", "m", Dimension::LENGTH),
    ("kilogram", "kg", Dimension::MASS),
    ("second", "s", Dimension::TIME),
    ("amp", "A", Dimension::CURRENT),
    ("kelvin", "K", Dimension::TEMPERATURE),
    ("mole", "mol", Dimension::AMOUNT),
    ("candela", "cd", Dimension::LUMINOSITY),
];

/// SI derived units, exponents in slot order [m, kg, s, A, K, mol, cd]
const SI_DERIVED: &[(&str, &str, [i32; 7])] = &[
    ("radian", "rad", [0, 0, 0, 0, 0, 0, 0]),
    ("steradian", "sr", [0, 0, 0, 0, 0, 0, 0]),
    ("hertz", "Hz", [0, 0, -1, 0, 0, 0, 0]),
    ("newton", "N", [1, 1, -2, 0, 0, 0, 0]),
    ("pascal", "Pa", [-1, 1, -2, 0, 0, 0, 0]),
    ("joule", "J", [2, 1, -2, 0, 0, 0, 0]),
    ("watt", "W", [2, 1, -3, 0, 0, 0, 0]),
    ("coulomb", "C", [0, 0, 1, 1, 0, 0, 0]),
    ("volt", "V", [2, 1, -3, -1, 0, 0, 0]),
    ("farad", "F", [-2, -1, 4, 2, 0, 0, 0]),
    ("ohm", "ohm", [2, 1, -3, -2, 0, 0, 0]),
    ("siemens", "S", [-2, -1, 3, 2, 0, 0, 0]),
    ("weber", "Wb", [2, 1, -2, -1, 0, 0, 0]),
    ("tesla", "T", [0, 1, -2, -1, 0, 0, 0]),
    ("henry", "H", [2, 1, -2, -2, 0, 0, 0]),
    ("celsius", "degC", [0, 0, 0, 0, 1, 0, 0]),
    ("lumen", "lm", [0, 0, 0, 0, 0, 0, 1]),
    ("lux", "lx", [-2, 0, 0, 0, 0, 0, 1]),
    ("becquerel", "Bq", [0, 0, -1, 0, 0, 0, 0]),
    ("gray", "Gy", [2, 0, -2, 0, 0, 0, 0]),
    ("sievert", "Sv", [2, 0, -2, 0, 0, 0, 0]),
    ("katal", "kat", [0, 0, -1, 0, 0, 1, 0]),
];

/// Conversion units: `(name, scale, defining factors, display symbol)`.
///
/// Each unit is `scale * product(factor^exp)` over units defined earlier.
const CONVERSIONS: &[(&str, f64, &[(&str, i32)], &str)] = &[
    // time
    ("minute", 60.0, &[("second", 1)], "min"),
    ("hour", 60.0, &[("minute", 1)], "hr"),
    ("day", 24.0, &[("hour", 1)], "day"),
    ("week", 7.0, &[("day", 1)], "wk"),
    ("fortnight", 14.0, &[("day", 1)], "fortnight"),
    ("month", 30.0, &[("day", 1)], "month"),
    ("year", 365.25, &[("day", 1)], "yr"),
    // length
    ("mile", 1609.344, &[("meter", 1)], "mi"),
    ("kilometer", 1000.0, &[("meter", 1)], "km"),
    ("nmile", 1852.0, &[("meter", 1)], "nmi"),
    ("inch", 25.4e-3, &[("meter", 1)], "inch"),
    ("inche", 25.4e-3, &[("meter", 1)], "inch"),
    ("foot", 12.0, &[("inch", 1)], "ft"),
    ("feet", 12.0, &[("inch", 1)], "ft"),
    ("yard", 3.0, &[("feet", 1)], "yd"),
    ("fathom", 2.0, &[("yard", 1)], "fathom"),
    ("AU", 149.60e9, &[("meter", 1)], "AU"),
    ("angstrom", 1e-10, &[("meter", 1)], "angstrom"),
    ("furlong", 660.0, &[("feet", 1)], "furlong"),
    // volume
    ("litre", 0.001, &[("meter", 3)], "l"),
    ("gallon", 4.54609, &[("litre", 1)], "gallon"),
    ("impGal", 4.54609, &[("litre", 1)], "ImpGal"),
    ("usGal", 3.785411784, &[("litre", 1)], "USGal"),
    ("impFlOz", 1.0 / 160.0, &[("impGal", 1)], "ImpFlOz"),
    ("usFlOz", 1.0 / 128.0, &[("usGal", 1)], "usFlOz"),
    ("barrel", 117.347765, &[("litre", 1)], "barrel"),
    ("pint", 0.56826125, &[("litre", 1)], "pint"),
    // mass
    ("kilogramme", 1.0, &[("kilogram", 1)], "kg"),
    ("gram", 0.001, &[("kilogram", 1)], "g"),
    ("gramme", 0.001, &[("kilogram", 1)], "g"),
    ("ton", 1000.0, &[("kilogram", 1)], "T"),
    ("tonne", 1000.0, &[("kilogram", 1)], "T"),
    ("amu", 1.66054e-27, &[("kilogram", 1)], "amu"),
    ("pound", 0.45359237, &[("kilogram", 1)], "lb"),
    ("ounce", 28.3495231, &[("gram", 1)], "oz"),
    ("m0", 1.98892e30, &[("kilogram", 1)], "M_0"),
    ("mp", 2.17645e-8, &[("kilogram", 1)], "m_p"),
    // energy, speed, area, pressure
    ("eV", 1.60218e-19, &[("joule", 1)], "eV"),
    ("knot", 1.0, &[("nmile", 1), ("hour", -1)], "knot"),
    ("acre", 4046.8564224, &[("meter", 2)], "acre"),
    ("bar", 1e5, &[("pascal", 1)], "bar"),
    ("kWh", 1000.0, &[("watt", 1), ("hour", 1)], "kWh"),
    ("Wh", 1.0, &[("watt", 1), ("hour", 1)], "Wh"),
    ("erg", 1e-7, &[("joule", 1)], "erg"),
    ("hectare", 10000.0, &[("meter", 2)], "ha"),
];

/// The 8 fundamental units followed by the 22 SI derived units
pub fn build_standard_units() -> Vec<Unit> {
    let fundamental = FUNDAMENTAL
        .iter()
        .map(|&(name, symbol, dimension)| Unit::create(dimension, name, symbol, 1.0));
    let derived = SI_DERIVED
        .iter()
        .map(|&(name, symbol, exponents)| Unit::create(Dimension::new(exponents), name, symbol, 1.0));
    fundamental.chain(derived).collect()
}

/// Product of named units raised to powers, looked up in `units`.
///
/// Returns `None` if any factor is missing or an exponent overflows.
pub fn unit_from_factors(units: &[Unit], factors: &[(&str, i32)]) -> Option<Unit> {
    let mut product = Unit::one();
    for &(name, exp) in factors {
        let unit = units.iter().find(|u| u.name == name)?;
        product = product.multiply(&unit.powi(exp).ok()?).ok()?;
    }
    Some(product)
}

/// Every unit the parser knows by name, plus symbol aliases
#[derive(Debug, Clone, Default)]
pub struct UnitTable {
    units: HashMap<String, Unit>,
    symbols: HashMap<String, String>,
    names: Vec<String>,
}

impl UnitTable {
    pub fn new() -> Self {
        UnitTable::default()
    }

    /// Add a unit under its name. Its display symbol becomes an alias
    /// unless another unit already claimed it.
    pub fn register(&mut self, unit: Unit) {
        let symbol = unit.display.to_string();
        if !symbol.is_empty() {
            self.symbols.entry(symbol).or_insert_with(|| unit.name.clone());
        }
        if !self.units.contains_key(&unit.name) {
            self.names.push(unit.name.clone());
        }
        self.units.insert(unit.name.clone(), unit);
    }

    /// Get a unit by name
    pub fn get(&self, name: &str) -> Option<&Unit> {
        self.units.get(name)
    }

    /// Get a unit by display symbol
    pub fn by_symbol(&self, symbol: &str) -> Option<&Unit> {
        self.symbols.get(symbol).and_then(|name| self.units.get(name))
    }

    /// Name of the unit owning `symbol`
    pub fn name_for_symbol(&self, symbol: &str) -> Option<&str> {
        self.symbols.get(symbol).map(|s| s.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.units.contains_key(name)
    }

    /// Unit names in registration order
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// `value` of the named unit as a quantity
    pub fn make(&self, value: f64, name: &str) -> Result<Quantity> {
        let unit = self
            .get(name)
            .or_else(|| self.by_symbol(name))
            .ok_or_else(|| QuantaError::UnknownIdentifier {
                word: name.to_string(),
                position: 0,
            })?;
        Ok(unit.as_quantity().scale(value))
    }

    fn register_conversion(&mut self, name: &str, scale: f64, factors: &[(&str, i32)], symbol: &str) {
        let mut product = Unit::one();
        for &(base, exp) in factors {
            let Some(unit) = self.get(base) else {
                tracing::warn!(unit = name, base, "skipping conversion unit with unknown base");
                return;
            };
            match unit.powi(exp).and_then(|power| product.multiply(&power)) {
                Ok(next) => product = next,
                Err(err) => {
                    tracing::warn!(unit = name, %err, "skipping conversion unit");
                    return;
                }
            }
        }
        self.register(Unit::create(product.dimension, name, symbol, scale * product.value));
    }
}

/// Standard units plus every conversion unit
pub fn build_unit_table() -> UnitTable {
    let mut table = UnitTable::new();
    for unit in build_standard_units() {
        table.register(unit);
    }
    for &(name, scale, factors, symbol) in CONVERSIONS {
        table.register_conversion(name, scale, factors, symbol);
    }
    tracing::debug!(units = table.len(), "built unit table");
    table
}

/// The conversion units alone (mile, litre, eV, ...), in table order
pub fn build_derived_units() -> Vec<Unit> {
    let table = build_unit_table();
    CONVERSIONS
        .iter()
        .filter_map(|&(name, ..)| table.get(name).cloned())
        .collect()
}
