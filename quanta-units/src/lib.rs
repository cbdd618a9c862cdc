//! Quanta Units - Physical quantities, units and registries
//!
//! Provides dimension-checked quantities and the unit tables the
//! expression parser resolves words against.
//!
//! Tables:
//! - Fundamental SI units (metre, kilogram, second, amp, kelvin, mole, candela)
//! - SI derived units (newton, joule, volt, ...)
//! - Conversion units (mile, gallon, pound, kWh, ...)
//! - SI prefixes (yocto ... yotta)

mod quantity;
mod unit;
mod units;
mod registry;
mod flyquant;
mod value;
pub mod prefix;
pub mod constants;

pub use quantity::{Comparison, Quantity};
pub use unit::{DisplayName, Unit};
pub use units::{build_derived_units, build_standard_units, build_unit_table, unit_from_factors, UnitTable, UNITS};
pub use registry::{
    all_registered_units, best_unit_in, build_additional_registry, build_standard_registry,
    register_new_unit, Registries, UnitRegistry, REGISTRIES,
};
pub use flyquant::{get_dimensions, is_dimensionless, Flyquant};
pub use value::Value;
pub use prefix::{Prefix, SI_PREFIXES};

pub use quanta_core::{Dimension, Dimensions, Flydim, QuantaError, Result};
