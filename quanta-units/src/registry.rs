//! Unit registries used to pick a display unit for a quantity
//!
//! Three registries are searched in order: standard (fundamental and SI
//! derived units), user (anything added with [`register_new_unit`]) and
//! additional (a few compound SI units). The first registry holding any
//! unit of the right dimension decides.

use std::sync::{LazyLock, RwLock};
use quanta_core::{Dimensions, QuantaError, Result};
use crate::units::{build_standard_units, unit_from_factors};
use crate::{Quantity, Unit};

/// Global registries, behind a single registration lock
pub static REGISTRIES: LazyLock<RwLock<Registries>> =
    LazyLock::new(|| RwLock::new(Registries::new()));

/// Ordered list of known display units
#[derive(Debug, Clone, Default)]
pub struct UnitRegistry {
    units: Vec<Unit>,
}

impl UnitRegistry {
    pub fn new() -> Self {
        UnitRegistry::default()
    }

    /// Add a unit to the registry
    pub fn add(&mut self, unit: Unit) {
        self.units.push(unit);
    }

    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Best unit for `x`.
    ///
    /// Among units sharing `x`'s dimension, the first one giving
    /// `0.1 <= |x/u| < 100` wins; failing that, the first matching unit.
    pub fn best_unit(&self, x: &Quantity) -> Result<&Unit> {
        let mut matching = self.units.iter().filter(|u| u.dimension == x.dimension).peekable();
        let first = *matching.peek().ok_or_else(|| QuantaError::UnitNotFound {
            dimension: Dimensions::proper(x.dimension),
        })?;
        let natural = matching.find(|u| {
            let m = (x.value / u.value).abs();
            (0.1..100.0).contains(&m)
        });
        let unit = natural.unwrap_or(first);
        tracing::trace!(unit = %unit.name, value = x.value, "best unit");
        Ok(unit)
    }
}

/// Search `registries` in order; the first one with any match decides
pub fn best_unit_in<'a>(registries: &[&'a UnitRegistry], x: &Quantity) -> Option<&'a Unit> {
    registries.iter().find_map(|r| r.best_unit(x).ok())
}

/// The standard, user and additional registries
#[derive(Debug, Clone)]
pub struct Registries {
    pub standard: UnitRegistry,
    pub user: UnitRegistry,
    pub additional: UnitRegistry,
}

impl Registries {
    pub fn new() -> Self {
        Registries {
            standard: build_standard_registry(),
            user: UnitRegistry::new(),
            additional: build_additional_registry(),
        }
    }

    /// Registries in search order
    pub fn ordered(&self) -> [&UnitRegistry; 3] {
        [&self.standard, &self.user, &self.additional]
    }

    pub fn best_unit(&self, x: &Quantity) -> Option<&Unit> {
        best_unit_in(&self.ordered(), x)
    }

    /// All registered units: standard, then user, then additional
    pub fn all_units(&self) -> impl Iterator<Item = &Unit> {
        self.standard
            .units()
            .iter()
            .chain(self.user.units())
            .chain(self.additional.units())
    }
}

impl Default for Registries {
    fn default() -> Self {
        Self::new()
    }
}

/// Fundamental and SI derived units
pub fn build_standard_registry() -> UnitRegistry {
    let mut registry = UnitRegistry::new();
    for unit in build_standard_units() {
        registry.add(unit);
    }
    registry
}

const ADDITIONAL: &[(&str, &[(&str, i32)])] = &[
    ("metre/second", &[("metre", 1), ("second", -1)]),
    ("metre/second^2", &[("metre", 1), ("second", -2)]),
    ("metre^2", &[("metre", 2)]),
    ("metre^3", &[("metre", 3)]),
];

/// Compound SI units (m/s, m/s^2, m^2, m^3)
pub fn build_additional_registry() -> UnitRegistry {
    let standard = build_standard_units();
    let mut registry = UnitRegistry::new();
    for &(name, factors) in ADDITIONAL {
        match unit_from_factors(&standard, factors) {
            Some(mut unit) => {
                unit.set_name(name);
                registry.add(unit);
            }
            None => tracing::warn!(unit = name, "skipping additional unit with unknown factor"),
        }
    }
    registry
}

/// Register a unit for best-unit display of quantities
pub fn register_new_unit(unit: Unit) {
    tracing::debug!(unit = %unit.name, "registering user unit");
    let mut registries = REGISTRIES.write().unwrap_or_else(|e| e.into_inner());
    registries.user.add(unit);
}

/// Snapshot of every registered unit in search order
pub fn all_registered_units() -> Vec<Unit> {
    let registries = REGISTRIES.read().unwrap_or_else(|e| e.into_inner());
    registries.all_units().cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use quanta_core::Dimension;

    #[test]
    fn test_best_unit_prefers_natural_magnitude() {
        let mut registry = UnitRegistry::new();
        registry.add(Unit::create(Dimension::LENGTH, "millimetre", "mm", 1e-3));
        registry.add(Unit::create(Dimension::LENGTH, "metre", "m", 1.0));

        let best = registry.best_unit(&Quantity::new(2.0, Dimension::LENGTH)).unwrap();
        assert_eq!(best.name, "metre");

        // Nothing natural: fall back to the first match
        let best = registry.best_unit(&Quantity::new(1e6, Dimension::LENGTH)).unwrap();
        assert_eq!(best.name, "millimetre");
    }

    #[test]
    fn test_best_unit_not_found() {
        let registry = UnitRegistry::new();
        let err = registry.best_unit(&Quantity::new(1.0, Dimension::TIME)).unwrap_err();
        assert!(matches!(err, QuantaError::UnitNotFound { .. }));
    }

    #[test]
    fn test_first_registry_with_a_match_decides() {
        let mut first = UnitRegistry::new();
        first.add(Unit::create(Dimension::LENGTH, "lightyear", "ly", 9.4607e15));
        let mut second = UnitRegistry::new();
        second.add(Unit::create(Dimension::LENGTH, "metre", "m", 1.0));

        let x = Quantity::new(3.0, Dimension::LENGTH);
        assert_eq!(best_unit_in(&[&first, &second], &x).unwrap().name, "lightyear");
        assert_eq!(best_unit_in(&[&second, &first], &x).unwrap().name, "metre");
    }

    #[test]
    fn test_default_registries() {
        let registries = Registries::new();
        assert_eq!(registries.standard.len(), 30);
        assert!(registries.user.is_empty());

        let accel = Quantity::new(9.81, Dimension::ACCELERATION);
        assert_eq!(registries.best_unit(&accel).unwrap().to_string(), "m s^-2");
        let force = Quantity::new(9.81, Dimension::FORCE);
        assert_eq!(registries.best_unit(&force).unwrap().name, "newton");
    }

    #[test]
    fn test_register_new_unit() {
        let jerk = Dimension::new([1, 0, -3, 0, 0, 0, 0]);
        let x = Quantity::new(2.0, jerk);
        assert_eq!(x.to_string(), "2 m s^-3");

        register_new_unit(Unit::create(jerk, "jerk", "jrk", 1.0));
        assert_eq!(x.to_string(), "2 jrk");
        assert!(all_registered_units().iter().any(|u| u.name == "jerk"));
    }
}
