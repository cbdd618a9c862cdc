//! Quanta Core - Fundamental types
//!
//! This crate provides the core types used throughout Quanta:
//! - `Dimension`: exponents of the seven SI base quantities
//! - `Flydim`: dimensions invented on the fly while parsing
//! - `QuantaError`: structured, recoverable errors

mod dimension;
mod flydim;
mod error;
mod number;

pub use dimension::{BaseQuantity, Dimension, SI_LABELS};
pub use flydim::{Dimensions, Flydim};
pub use error::{QuantaError, Result, codes};
pub use number::{format_number, format_significant, SIGNIFICANT_DIGITS};

/// Dimension slot indices
pub mod slots {
    pub use crate::dimension::{AMOUNT, CURRENT, LENGTH, LUMINOSITY, MASS, TEMPERATURE, TIME};
}

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{Dimension, Dimensions, Flydim, QuantaError};
    pub use crate::error::codes;
}
