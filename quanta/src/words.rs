//! Word tables and input normalisation

/// Stands in for the `in` conversion keyword after preprocessing
pub const CONVERSION_TOKEN: char = '\u{1f}';

pub const WORD_NUMBERS: &[(&str, f64)] = &[
    ("one", 1.0),
    ("two", 2.0),
    ("three", 3.0),
    ("four", 4.0),
    ("five", 5.0),
    ("six", 6.0),
    ("seven", 7.0),
    ("eight", 8.0),
    ("nine", 9.0),
    ("ten", 10.0),
    ("hundred", 100.0),
    ("thousand", 1e3),
    ("million", 1e6),
    ("billion", 1e9),
    ("trillion", 1e12),
];

pub fn word_number(word: &str) -> Option<f64> {
    WORD_NUMBERS.iter().find(|(w, _)| *w == word).map(|&(_, x)| x)
}

/// How internal imperial unit names are echoed back
const IMPERIAL_ECHO: &[(&str, &str)] = &[
    ("impGal", "(Imperial gallon)"),
    ("usGal", "(US gallon)"),
    ("impFlOz", "(Imperial fluid ounce)"),
    ("usFlOz", "(US fluid ounce)"),
];

pub fn imperial_echo(name: &str) -> Option<&'static str> {
    IMPERIAL_ECHO.iter().find(|(n, _)| *n == name).map(|&(_, echo)| echo)
}

/// Spelling variants rewritten to internal unit names, applied in order
const IMPERIAL_SPELLINGS: &[(&str, &str)] = &[
    ("Imperial", "imperial"),
    (" U.S. ", " US "),
    (" U.S ", " US "),
    (" oz. ", " ounce "),
    (" oz ", " ounce "),
    (" fl. ", " fluid "),
    (" fl ", " fluid "),
    ("imperial gallon", "impGal"),
    ("US gallon", "usGal"),
    ("gallon", "impGal"),
    ("imperial fluid ounce", "impFlOz"),
    ("US fluid ounce", "usFlOz"),
    ("fluid ounce", "impFlOz"),
];

/// Normalise imperial spellings, then turn ` in ` into the conversion
/// token and ` per ` into `/`.
pub fn preprocess(input: &str) -> String {
    let mut s = format!(" {} ", input);
    for &(from, to) in IMPERIAL_SPELLINGS {
        s = s.replace(from, to);
    }
    s.trim()
        .replace(" in ", &format!(" {} ", CONVERSION_TOKEN))
        .replace(" per ", "/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_numbers() {
        assert_eq!(word_number("ten"), Some(10.0));
        assert_eq!(word_number("million"), Some(1e6));
        assert_eq!(word_number("eleven"), None);
    }

    #[test]
    fn test_imperial_spellings() {
        assert_eq!(preprocess("2 US gallons"), "2 usGals");
        assert_eq!(preprocess("3 Imperial gallons"), "3 impGals");
        assert_eq!(preprocess("1 gallon"), "1 impGal");
        assert_eq!(preprocess("4 fl oz"), "4 impFlOz");
        assert_eq!(preprocess("4 U.S. fl. oz."), "4 usFlOz");
        assert_eq!(preprocess("5 oz"), "5 ounce");
    }

    #[test]
    fn test_keywords() {
        let converted = preprocess("3 meters in miles");
        assert_eq!(converted, format!("3 meters {} miles", CONVERSION_TOKEN));
        assert_eq!(preprocess("60 miles per hour"), "60 miles/hour");
        // only whole words are rewritten
        assert_eq!(preprocess("inch"), "inch");
    }

    #[test]
    fn test_imperial_echo() {
        assert_eq!(imperial_echo("usGal"), Some("(US gallon)"));
        assert_eq!(imperial_echo("gallon"), None);
    }
}
