//! Dimensional analysis types
//!
//! Each physical quantity has dimensions represented as a 7-element vector:
//! [length, mass, time, current, temperature, amount, luminosity]

use std::fmt;
use serde::{Serialize, Deserialize};
use crate::error::{QuantaError, Result};

/// Dimension indices for the 7 SI base quantities
pub const LENGTH: usize = 0;
pub const MASS: usize = 1;
pub const TIME: usize = 2;
pub const CURRENT: usize = 3;
pub const TEMPERATURE: usize = 4;
pub const AMOUNT: usize = 5;
pub const LUMINOSITY: usize = 6;

/// SI base unit symbols, in slot order
pub const SI_LABELS: [&str; 7] = ["m", "kg", "s", "A", "K", "mol", "cd"];

/// The seven SI base quantities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BaseQuantity {
    Length,
    Mass,
    Time,
    Current,
    Temperature,
    Amount,
    Luminosity,
}

impl BaseQuantity {
    /// Slot of this quantity in a [`Dimension`] exponent vector
    pub fn index(self) -> usize {
        match self {
            BaseQuantity::Length => LENGTH,
            BaseQuantity::Mass => MASS,
            BaseQuantity::Time => TIME,
            BaseQuantity::Current => CURRENT,
            BaseQuantity::Temperature => TEMPERATURE,
            BaseQuantity::Amount => AMOUNT,
            BaseQuantity::Luminosity => LUMINOSITY,
        }
    }

    /// SI symbol of the base unit ("m", "kg", ...)
    pub fn symbol(self) -> &'static str {
        SI_LABELS[self.index()]
    }

    /// Look up a base quantity by quantity name, SI unit name or SI symbol.
    ///
    /// `length`, `metre`, `metres` and `m` all name the same slot.
    pub fn from_name(name: &str) -> Option<BaseQuantity> {
        let quantity = match name {
            "Length" | "length" | "metre" | "metres" | "meter" | "meters" | "m" => BaseQuantity::Length,
            "Mass" | "mass" | "kilogram" | "kilograms" | "kg" => BaseQuantity::Mass,
            "Time" | "time" | "second" | "seconds" | "s" => BaseQuantity::Time,
            "Electric Current" | "electric current" | "Current" | "current"
            | "ampere" | "amperes" | "amp" | "A" => BaseQuantity::Current,
            "Temperature" | "temperature" | "kelvin" | "kelvins" | "K" => BaseQuantity::Temperature,
            "Quantity of Substance" | "Quantity of substance" | "quantity of substance"
            | "Substance" | "substance" | "mole" | "moles" | "mol" => BaseQuantity::Amount,
            "Luminosity" | "luminosity" | "candela" | "cd" => BaseQuantity::Luminosity,
            _ => return None,
        };
        Some(quantity)
    }
}

/// Represents the dimensions of a physical quantity
/// as exponents of the 7 SI base dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimension {
    /// [length, mass, time, current, temperature, amount, luminosity]
    pub exponents: [i32; 7],
}

impl Dimension {
    /// Dimensionless quantity (all exponents zero)
    pub const DIMENSIONLESS: Dimension = Dimension { exponents: [0, 0, 0, 0, 0, 0, 0] };

    /// Length dimension [L]
    pub const LENGTH: Dimension = Dimension { exponents: [1, 0, 0, 0, 0, 0, 0] };

    /// Mass dimension [M]
    pub const MASS: Dimension = Dimension { exponents: [0, 1, 0, 0, 0, 0, 0] };

    /// Time dimension [T]
    pub const TIME: Dimension = Dimension { exponents: [0, 0, 1, 0, 0, 0, 0] };

    /// Electric current dimension [I]
    pub const CURRENT: Dimension = Dimension { exponents: [0, 0, 0, 1, 0, 0, 0] };

    /// Temperature dimension [Θ]
    pub const TEMPERATURE: Dimension = Dimension { exponents: [0, 0, 0, 0, 1, 0, 0] };

    /// Amount of substance dimension [N]
    pub const AMOUNT: Dimension = Dimension { exponents: [0, 0, 0, 0, 0, 1, 0] };

    /// Luminous intensity dimension [J]
    pub const LUMINOSITY: Dimension = Dimension { exponents: [0, 0, 0, 0, 0, 0, 1] };

    /// Velocity [L T^-1]
    pub const VELOCITY: Dimension = Dimension { exponents: [1, 0, -1, 0, 0, 0, 0] };

    /// Acceleration [L T^-2]
    pub const ACCELERATION: Dimension = Dimension { exponents: [1, 0, -2, 0, 0, 0, 0] };

    /// Force [M L T^-2]
    pub const FORCE: Dimension = Dimension { exponents: [1, 1, -2, 0, 0, 0, 0] };

    /// Energy [M L^2 T^-2]
    pub const ENERGY: Dimension = Dimension { exponents: [2, 1, -2, 0, 0, 0, 0] };

    /// Power [M L^2 T^-3]
    pub const POWER: Dimension = Dimension { exponents: [2, 1, -3, 0, 0, 0, 0] };

    /// Pressure [M L^-1 T^-2]
    pub const PRESSURE: Dimension = Dimension { exponents: [-1, 1, -2, 0, 0, 0, 0] };

    /// Area [L^2]
    pub const AREA: Dimension = Dimension { exponents: [2, 0, 0, 0, 0, 0, 0] };

    /// Volume [L^3]
    pub const VOLUME: Dimension = Dimension { exponents: [3, 0, 0, 0, 0, 0, 0] };

    /// Frequency [T^-1]
    pub const FREQUENCY: Dimension = Dimension { exponents: [0, 0, -1, 0, 0, 0, 0] };

    /// Electric charge [I T]
    pub const CHARGE: Dimension = Dimension { exponents: [0, 0, 1, 1, 0, 0, 0] };

    /// Voltage [M L^2 T^-3 I^-1]
    pub const VOLTAGE: Dimension = Dimension { exponents: [2, 1, -3, -1, 0, 0, 0] };

    /// Resistance [M L^2 T^-3 I^-2]
    pub const RESISTANCE: Dimension = Dimension { exponents: [2, 1, -3, -2, 0, 0, 0] };

    /// Create a new dimension from exponents
    pub fn new(exponents: [i32; 7]) -> Self {
        Dimension { exponents }
    }

    /// Build a dimension from `(name, exponent)` pairs.
    ///
    /// Names are resolved with [`BaseQuantity::from_name`], so force can be
    /// written as `[("length", 1), ("mass", 1), ("time", -2)]` or
    /// `[("m", 1), ("kg", 1), ("s", -2)]`.
    pub fn from_pairs(pairs: &[(&str, i32)]) -> Result<Dimension> {
        let mut exponents = [0i32; 7];
        for (position, &(name, exp)) in pairs.iter().enumerate() {
            let base = BaseQuantity::from_name(name).ok_or_else(|| QuantaError::UnknownIdentifier {
                word: name.to_string(),
                position,
            })?;
            exponents[base.index()] = exp;
        }
        Ok(Dimension { exponents })
    }

    /// Exponent of a single base quantity
    pub fn component(&self, base: BaseQuantity) -> i32 {
        self.exponents[base.index()]
    }

    /// Check if this is a dimensionless quantity
    pub fn is_dimensionless(&self) -> bool {
        self.exponents.iter().all(|&e| e == 0)
    }

    /// Multiply dimensions (add exponents)
    pub fn multiply(&self, other: &Dimension) -> Result<Dimension> {
        self.combine(other, "Multiplication", i32::checked_add)
    }

    /// Divide dimensions (subtract exponents)
    pub fn divide(&self, other: &Dimension) -> Result<Dimension> {
        self.combine(other, "Division", i32::checked_sub)
    }

    /// Raise to integer power (multiply exponents)
    pub fn power(&self, exp: i32) -> Result<Dimension> {
        let mut result = [0i32; 7];
        for i in 0..7 {
            result[i] = self.exponents[i]
                .checked_mul(exp)
                .ok_or_else(|| QuantaError::exponent_range("Power"))?;
        }
        Ok(Dimension { exponents: result })
    }

    fn combine(
        &self,
        other: &Dimension,
        operation: &str,
        op: fn(i32, i32) -> Option<i32>,
    ) -> Result<Dimension> {
        let mut result = [0i32; 7];
        for i in 0..7 {
            result[i] = op(self.exponents[i], other.exponents[i])
                .ok_or_else(|| QuantaError::exponent_range(operation))?;
        }
        Ok(Dimension { exponents: result })
    }

    /// Raise to a real power.
    ///
    /// Exponents stay integers, so this returns `None` when any resulting
    /// exponent would be fractional (e.g. `m^1` to the `0.5`).
    pub fn powf(&self, exp: f64) -> Option<Dimension> {
        let mut result = [0i32; 7];
        for i in 0..7 {
            if self.exponents[i] == 0 {
                continue;
            }
            result[i] = integral(self.exponents[i] as f64 * exp)?;
        }
        Some(Dimension { exponents: result })
    }

    /// Invert dimensions (negate exponents)
    pub fn invert(&self) -> Result<Dimension> {
        self.power(-1)
    }
}

/// Round `x` to an `i32` if it is integral (within float noise)
pub(crate) fn integral(x: f64) -> Option<i32> {
    let rounded = x.round();
    if !x.is_finite() || (x - rounded).abs() > 1e-9 || rounded.abs() > i32::MAX as f64 {
        return None;
    }
    Some(rounded as i32)
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();

        for (i, &exp) in self.exponents.iter().enumerate() {
            if exp != 0 {
                if exp == 1 {
                    parts.push(SI_LABELS[i].to_string());
                } else {
                    parts.push(format!("{}^{}", SI_LABELS[i], exp));
                }
            }
        }

        if parts.is_empty() {
            write!(f, "1")
        } else {
            write!(f, "{}", parts.join(" "))
        }
    }
}

impl Default for Dimension {
    fn default() -> Self {
        Self::DIMENSIONLESS
    }
}
