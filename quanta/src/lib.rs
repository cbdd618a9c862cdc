//! Quanta - Dimensional analysis from plain text
//!
//! ```text
//! 3 meters in miles          -> 3*meter = 0.00186411357671 * mile
//! ten thousand kg/s^2        -> (ten*thousand*kilogram)/(second)^2 = 10000 kg s^-2
//! x = 5 meters               -> x = 5*meter
//! #0 in feet                 -> (3*meter) = 9.84251968504 * feet
//! ```
//!
//! Unknown words become on-the-fly dimensions, so `6 widgets / 2 widgets`
//! is the plain number 3.

mod history;
mod parser;
mod words;

pub use history::{ParseHistory, HISTORY_CAPACITY};
pub use parser::{ParseOutcome, ParserOptions, QuantityParser, MAX_BACKREF_DEPTH};
pub use words::{word_number, WORD_NUMBERS};

pub use quanta_core::{codes, Dimension, Dimensions, Flydim, QuantaError, Result};
pub use quanta_units::{Flyquant, Quantity, Unit, UnitTable, Value, UNITS};

/// Parse `text` with default options and a throwaway history
pub fn parse(text: &str) -> Result<Value> {
    let mut history = ParseHistory::new();
    QuantityParser::new()
        .parse(text, &mut history)
        .map(|outcome| outcome.value)
}
