//! SI prefixes (2008 set)

/// A decimal SI prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Prefix {
    pub name: &'static str,
    pub symbol: &'static str,
    /// Power of ten
    pub exponent: i32,
}

impl Prefix {
    pub fn scale(&self) -> f64 {
        10f64.powi(self.exponent)
    }
}

const fn prefix(name: &'static str, symbol: &'static str, exponent: i32) -> Prefix {
    Prefix { name, symbol, exponent }
}

pub const SI_PREFIXES: [Prefix; 19] = [
    prefix("yocto", "y", -24),
    prefix("zepto", "z", -21),
    prefix("atto", "a", -18),
    prefix("femto", "f", -15),
    prefix("pico", "p", -12),
    prefix("nano", "n", -9),
    prefix("micro", "u", -6),
    prefix("milli", "m", -3),
    prefix("centi", "c", -2),
    prefix("deci", "d", -1),
    prefix("hecto", "h", 2),
    prefix("kilo", "k", 3),
    prefix("mega", "M", 6),
    prefix("giga", "G", 9),
    prefix("tera", "T", 12),
    prefix("peta", "P", 15),
    prefix("exa", "E", 18),
    prefix("zetta", "Z", 21),
    prefix("yotta", "Y", 24),
];

/// Long prefix name for a power of ten, `""` for zero
pub fn prefix_name(exponent: i32) -> Option<&'static str> {
    if exponent == 0 {
        return Some("");
    }
    SI_PREFIXES.iter().find(|p| p.exponent == exponent).map(|p| p.name)
}

/// Engineering exponent for `x`: a multiple of 3 clamped to [-24, 24]
pub fn engineering_exponent(x: f64) -> i32 {
    if x == 0.0 || !x.is_finite() {
        return 0;
    }
    let exp = x.abs().log10().floor() as i32;
    (exp - exp.rem_euclid(3)).clamp(-24, 24)
}
