//! Number formatting shared by value display and parser echoes

/// Significant digits used when printing numbers
pub const SIGNIFICANT_DIGITS: usize = 12;

/// Format a float with 12 significant digits, trailing zeros trimmed.
///
/// Switches to scientific notation (`1.5e-07`, `6.02214076e+23`) when the
/// decimal exponent is below -4 or at least 12.
pub fn format_number(x: f64) -> String {
    format_significant(x, SIGNIFICANT_DIGITS)
}

pub fn format_significant(x: f64, digits: usize) -> String {
    if x == 0.0 {
        return "0".to_string();
    }
    if x.is_nan() {
        return "nan".to_string();
    }
    if x.is_infinite() {
        return if x > 0.0 { "inf".to_string() } else { "-inf".to_string() };
    }

    let digits = digits.max(1);
    // Rust's `{:e}` rounds to the requested precision, so the exponent here
    // already accounts for carries like 9.9999 -> 1.0e1.
    let sci = format!("{:.*e}", digits - 1, x);
    let (mantissa, exp) = match sci.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => return sci,
    };

    if exp < -4 || exp >= digits as i32 {
        let mantissa = trim_zeros(mantissa);
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", mantissa, sign, exp.abs())
    } else {
        let decimals = (digits as i32 - 1 - exp).max(0) as usize;
        trim_zeros(&format!("{:.*}", decimals, x)).to_string()
    }
}

fn trim_zeros(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integers() {
        assert_eq!(format_number(3.0), "3");
        assert_eq!(format_number(-42.0), "-42");
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(1000.0), "1000");
    }

    #[test]
    fn test_fractions() {
        assert_eq!(format_number(0.5), "0.5");
        assert_eq!(format_number(1.0 / 3.0), "0.333333333333");
        assert_eq!(format_number(3.0 / 1609.344), "0.00186411357671");
    }

    #[test]
    fn test_scientific() {
        assert_eq!(format_number(1.5e-7), "1.5e-07");
        assert_eq!(format_number(6.02214076e23), "6.02214076e+23");
        assert_eq!(format_number(1e12), "1e+12");
        assert_eq!(format_number(999999999999.0), "999999999999");
    }

    #[test]
    fn test_rounding_carry() {
        assert_eq!(format_number(0.99999999999999), "1");
        assert_eq!(format_significant(9.96, 2), "10");
    }

    #[test]
    fn test_non_finite() {
        assert_eq!(format_number(f64::INFINITY), "inf");
        assert_eq!(format_number(f64::NAN), "nan");
    }
}
