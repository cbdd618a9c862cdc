//! Recursive descent parser for quantity expressions
//!
//! ```text
//! query      := expression (ws query_op expression)?
//! expression := term (ws [+-] ws term)*
//! term       := factor (ws [*/] ws factor)*
//! factor     := powterm (ws ('**'|'^') ws powterm)*
//! powterm    := '(' expression ')' | [+-] powterm | '#' integer
//!             | number (ws sentence)? | sentence
//! sentence   := (word ws (number | ('**'|'^') ws number)?)+
//! ```
//!
//! Alongside the value, every rule appends to an echo string that spells the
//! input back with each word resolved (`3 meters` echoes as `3*meter`).

use std::collections::HashMap;
use std::sync::Arc;
use serde::Serialize;
use quanta_core::{format_number, QuantaError, Result};
use quanta_units::{Flyquant, UnitTable, Value, SI_PREFIXES, UNITS};
use crate::history::ParseHistory;
use crate::words::{imperial_echo, preprocess, word_number, CONVERSION_TOKEN};

/// Deepest allowed chain of `#n` back-references
pub const MAX_BACKREF_DEPTH: usize = 32;

/// Parser switches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserOptions {
    /// Unknown words become new on-the-fly dimensions
    pub on_the_fly: bool,
    /// Allow `a in b` when `a/b` is not dimensionless
    pub false_requests: bool,
}

impl Default for ParserOptions {
    fn default() -> Self {
        ParserOptions {
            on_the_fly: true,
            false_requests: false,
        }
    }
}

/// Result of parsing one query
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParseOutcome {
    pub value: Value,
    /// Display line, e.g. `3*meter = 0.00186411357671 * mile`
    pub formatted: String,
    /// Canonical spelling of the input, substituted for `#n` references
    pub echo: String,
}

#[derive(Debug, Clone)]
pub struct QuantityParser {
    options: ParserOptions,
    table: Arc<UnitTable>,
}

impl QuantityParser {
    pub fn new() -> Self {
        QuantityParser {
            options: ParserOptions::default(),
            table: Arc::clone(&UNITS),
        }
    }

    pub fn with_on_the_fly(mut self, on_the_fly: bool) -> Self {
        self.options.on_the_fly = on_the_fly;
        self
    }

    pub fn with_false_requests(mut self, false_requests: bool) -> Self {
        self.options.false_requests = false_requests;
        self
    }

    pub fn with_options(mut self, options: ParserOptions) -> Self {
        self.options = options;
        self
    }

    /// Resolve words against `table` instead of the built-in units
    pub fn with_table(mut self, table: impl Into<Arc<UnitTable>>) -> Self {
        self.table = table.into();
        self
    }

    pub fn options(&self) -> ParserOptions {
        self.options
    }

    pub fn table(&self) -> &UnitTable {
        &self.table
    }

    /// Parse one query. The trimmed input is logged to `history` before
    /// parsing starts, so failed inputs are kept too.
    pub fn parse(&self, input: &str, history: &mut ParseHistory) -> Result<ParseOutcome> {
        self.parse_at_depth(input, history, 0)
    }

    fn parse_at_depth(&self, input: &str, history: &mut ParseHistory, depth: usize) -> Result<ParseOutcome> {
        let input = input.trim();
        history.add(input);
        tracing::debug!(input, depth, "parsing query");

        let text = preprocess(input);
        let mut state = ParseState {
            parser: self,
            chars: text.chars().collect(),
            pos: 0,
            output: String::new(),
            fly_variables: HashMap::new(),
            history,
            depth,
        };
        let outcome = state.parse_query()?;
        tracing::debug!(formatted = %outcome.formatted, "parsed query");
        Ok(outcome)
    }
}

impl Default for QuantityParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Cursor and per-call state of one parse
struct ParseState<'a> {
    parser: &'a QuantityParser,
    chars: Vec<char>,
    pos: usize,
    output: String,
    fly_variables: HashMap<String, Value>,
    history: &'a mut ParseHistory,
    depth: usize,
}

impl ParseState<'_> {
    // ========== Cursor helpers ==========

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(' ' | '\t' | '\r' | '\n')) {
            self.pos += 1;
        }
    }

    fn expect_end(&mut self) -> Result<()> {
        self.skip_whitespace();
        match self.peek() {
            None => Ok(()),
            Some(_) => Err(QuantaError::parse(self.pos, "end of input")),
        }
    }

    fn check_alpha(&mut self) -> bool {
        self.skip_whitespace();
        matches!(self.peek(), Some(c) if is_word_char(c))
    }

    fn check_number(&mut self) -> bool {
        self.skip_whitespace();
        matches!(self.peek(), Some(c) if c.is_ascii_digit() || c == '.')
    }

    /// Next operator is `+` or `-`
    fn check_plus(&mut self) -> Option<char> {
        self.skip_whitespace();
        self.peek().filter(|c| matches!(c, '+' | '-'))
    }

    /// Next operator is `*` or `/`, but not `**`
    fn check_times(&mut self) -> Option<char> {
        self.skip_whitespace();
        match (self.peek(), self.peek_at(1)) {
            (Some('*'), Some('*')) => None,
            (Some(c @ ('*' | '/')), _) => Some(c),
            _ => None,
        }
    }

    fn check_power(&mut self) -> bool {
        self.skip_whitespace();
        matches!((self.peek(), self.peek_at(1)), (Some('^'), _) | (Some('*'), Some('*')))
    }

    /// Consume `^` or `**`, echoing it as `^` when asked
    fn consume_power_op(&mut self, echo: bool) {
        self.pos += if self.peek() == Some('^') { 1 } else { 2 };
        if echo {
            self.output.push('^');
        }
    }

    // ========== Grammar ==========

    fn parse_query(&mut self) -> Result<ParseOutcome> {
        if let Some((name, after)) = self.assignment_target() {
            self.pos = after;
            let value = self.parse_expression()?;
            self.expect_end()?;
            let formatted = format!("{} = {}", name, self.output);
            tracing::debug!(variable = %name, "defining variable");
            self.history.define(name.clone(), value.clone());
            return Ok(ParseOutcome { value, formatted, echo: name });
        }

        let value = self.parse_expression()?;
        let lhs = std::mem::take(&mut self.output);
        self.skip_whitespace();

        match self.peek() {
            None => {
                let formatted = format!("{} = {}", lhs, value);
                Ok(ParseOutcome { value, formatted, echo: lhs })
            }
            Some(CONVERSION_TOKEN) => {
                self.pos += 1;
                let target = self.parse_expression()?;
                self.expect_end()?;
                let ratio = value.div(&target)?;
                if !self.parser.options.false_requests && !ratio.is_dimensionless() {
                    return Err(QuantaError::mismatch(
                        "Illegal conversion",
                        [value.dimensions(), target.dimensions()],
                    ));
                }
                let formatted = format!("{} = {} * {}", lhs, ratio, self.output);
                Ok(ParseOutcome { value: ratio, formatted, echo: lhs })
            }
            Some('=') => Err(QuantaError::parse(self.pos, "a variable name before '='")),
            Some(_) => Err(QuantaError::parse(self.pos, "a query operator or end of input")),
        }
    }

    /// `name = ...`: the text before the first `=` with spaces removed,
    /// provided it is a plain word. Returns the name and the position after `=`.
    fn assignment_target(&self) -> Option<(String, usize)> {
        let eq = self.chars.iter().position(|&c| c == '=')?;
        let name: String = self.chars[..eq].iter().filter(|c| !c.is_whitespace()).collect();
        if name.is_empty() || !name.chars().all(is_word_char) {
            return None;
        }
        Some((name, eq + 1))
    }

    fn parse_expression(&mut self) -> Result<Value> {
        self.skip_whitespace();
        if self.peek().is_none() {
            return Err(QuantaError::parse(self.pos, "an expression"));
        }

        let mut leading = self.parse_term()?;
        while let Some(op) = self.check_plus() {
            self.pos += 1;
            self.output.push(op);
            self.skip_whitespace();
            let term = self.parse_term()?;
            leading = if op == '+' {
                leading.add(&term)?
            } else {
                leading.sub(&term)?
            };
        }
        Ok(leading)
    }

    fn parse_term(&mut self) -> Result<Value> {
        let mut leading = self.parse_factor()?;
        while let Some(op) = self.check_times() {
            self.pos += 1;
            self.output.push(op);
            self.skip_whitespace();
            let factor = self.parse_factor()?;
            leading = if op == '*' {
                leading.mul(&factor)?
            } else {
                leading.div(&factor)?
            };
        }
        Ok(leading)
    }

    fn parse_factor(&mut self) -> Result<Value> {
        let base = self.parse_powterm()?;
        if self.check_power() {
            let exponent = self.parse_exponent()?;
            return base.pow(&exponent);
        }
        Ok(base)
    }

    /// Right-associative tail of `a ^ b ^ c`
    fn parse_exponent(&mut self) -> Result<Value> {
        self.consume_power_op(true);
        self.skip_whitespace();
        let powterm = self.parse_powterm()?;
        if self.check_power() {
            let exponent = self.parse_exponent()?;
            return powterm.pow(&exponent);
        }
        Ok(powterm)
    }

    fn parse_powterm(&mut self) -> Result<Value> {
        self.skip_whitespace();
        match self.peek() {
            Some('(') => self.parse_parenthesised(),
            Some('#') => self.parse_backref(),
            Some(c) if c.is_ascii_digit() || c == '.' => {
                let number = Value::Number(self.parse_number(true)?);
                if self.check_alpha() {
                    self.output.push('*');
                    let sentence = self.parse_sentence()?;
                    return number.mul(&sentence);
                }
                Ok(number)
            }
            Some(c) if is_word_char(c) => self.parse_sentence(),
            Some(op @ ('+' | '-')) => {
                self.pos += 1;
                self.output.push(op);
                self.skip_whitespace();
                let operand = self.parse_powterm()?;
                Ok(if op == '-' { operand.neg() } else { operand })
            }
            None => Err(QuantaError::parse(self.pos, "an operand")),
            Some(_) => Err(QuantaError::parse(
                self.pos,
                "'(expression)', a number, a unit or a history reference",
            )),
        }
    }

    fn parse_parenthesised(&mut self) -> Result<Value> {
        self.output.push('(');
        self.pos += 1;
        let value = self.parse_expression()?;
        self.skip_whitespace();
        if self.peek() != Some(')') {
            return Err(QuantaError::parse(self.pos, "')'"));
        }
        self.pos += 1;
        self.output.push(')');
        Ok(value)
    }

    /// `#n`: re-parse history entry `n` with a fresh parser over a copy of
    /// the history, so nothing it defines leaks back.
    fn parse_backref(&mut self) -> Result<Value> {
        let start = self.pos;
        self.pos += 1;
        if !matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            return Err(QuantaError::parse(self.pos, "an integer after '#'"));
        }
        let index = self.parse_integer()?;
        if self.depth >= MAX_BACKREF_DEPTH {
            return Err(QuantaError::parse(start, "history references nested at most 32 deep"));
        }

        let entry = self.history.read(index)?.to_string();
        tracing::debug!(index, entry = %entry, "expanding history reference");
        let mut snapshot = self.history.copy();
        let answer = self.parser.parse_at_depth(&entry, &mut snapshot, self.depth + 1)?;

        if answer.echo.starts_with('(') && answer.echo.ends_with(')') {
            self.output.push_str(&answer.echo);
        } else {
            self.output.push('(');
            self.output.push_str(&answer.echo);
            self.output.push(')');
        }
        Ok(answer.value)
    }

    fn parse_sentence(&mut self) -> Result<Value> {
        let mut sentence = Value::Number(1.0);
        let mut count = 0;
        let mut text = String::new();

        while self.check_alpha() {
            if count > 0 {
                text.push('*');
            }
            count += 1;

            let (mut word, mut echo) = self.parse_word()?;
            if let Some(power) = self.parse_word_power()? {
                echo = format!("({})^{}", echo, format_number(power));
                word = word.pow(&Value::Number(power))?;
            }
            sentence = sentence.mul(&word)?;
            text.push_str(&echo);
        }

        if count > 1 {
            text = format!("({})", text);
        }
        self.output.push_str(&text);
        Ok(sentence)
    }

    /// Exponent written right after a word: `m2`, `m^2`, `s**-1`.
    ///
    /// A `^` not followed by a number is left for the factor rule.
    fn parse_word_power(&mut self) -> Result<Option<f64>> {
        if self.check_number() {
            return self.parse_number(false).map(Some);
        }
        if !self.check_power() {
            return Ok(None);
        }

        let saved = self.pos;
        self.consume_power_op(false);
        self.skip_whitespace();
        let sign = match self.peek() {
            Some('-') => -1.0,
            Some('+') => 1.0,
            _ => 0.0,
        };
        if sign != 0.0 {
            self.pos += 1;
        }
        if !matches!(self.peek(), Some(c) if c.is_ascii_digit() || c == '.') {
            self.pos = saved;
            return Ok(None);
        }
        let magnitude = self.parse_number(false)?;
        Ok(Some(if sign < 0.0 { -magnitude } else { magnitude }))
    }

    fn parse_word(&mut self) -> Result<(Value, String)> {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if is_word_char(c)) {
            self.pos += 1;
        }
        let word: String = self.chars[start..self.pos].iter().collect();
        self.resolve_word(&word, start)
    }

    /// Resolve a word to a value and its echo: names, then symbols, then
    /// plurals, then SI prefixes, then a new on-the-fly dimension.
    fn resolve_word(&mut self, word: &str, position: usize) -> Result<(Value, String)> {
        if let Some(found) = self.lookup_name(word) {
            return Ok(found);
        }
        if let Some(found) = self.lookup_symbol(word) {
            return Ok(found);
        }
        if let Some(found) = word.strip_suffix('s').and_then(|stem| self.lookup_name(stem)) {
            return Ok(found);
        }

        let long = SI_PREFIXES.iter().map(|p| (p.name, p.scale()));
        let short = SI_PREFIXES.iter().map(|p| (p.symbol, p.scale()));
        for (prefix, scale) in long.chain(short) {
            let Some(rest) = word.strip_prefix(prefix) else { continue };
            if rest.is_empty() {
                continue;
            }
            if let Some((value, echo)) = self.lookup_prefixed(rest) {
                tracing::trace!(word, prefix, "resolved prefixed unit");
                return Ok((
                    Value::Number(scale).mul(&value)?,
                    format!("{}*{}", format_number(scale), echo),
                ));
            }
        }

        if !self.parser.options.on_the_fly {
            return Err(QuantaError::UnknownIdentifier {
                word: word.to_string(),
                position,
            });
        }
        tracing::debug!(word, "new on-the-fly dimension");
        let value = Value::Flyquant(Flyquant::named(word));
        self.fly_variables.insert(word.to_string(), value.clone());
        Ok((value, word.to_string()))
    }

    /// Defined variables shadow fly variables, which shadow word numbers,
    /// which shadow unit names.
    fn lookup_name(&self, word: &str) -> Option<(Value, String)> {
        let value = self
            .history
            .variable(word)
            .or_else(|| self.fly_variables.get(word))
            .cloned()
            .or_else(|| word_number(word).map(Value::Number))
            .or_else(|| self.parser.table.get(word).cloned().map(Value::Unit))?;
        let echo = imperial_echo(word).unwrap_or(word).to_string();
        Some((value, echo))
    }

    fn lookup_symbol(&self, word: &str) -> Option<(Value, String)> {
        let unit = self.parser.table.by_symbol(word)?;
        Some((Value::Unit(unit.clone()), unit.name.clone()))
    }

    /// What may follow an SI prefix: a symbol, a name, or a plural name
    fn lookup_prefixed(&self, rest: &str) -> Option<(Value, String)> {
        self.lookup_symbol(rest)
            .or_else(|| self.lookup_name(rest))
            .or_else(|| rest.strip_suffix('s').and_then(|stem| self.lookup_name(stem)))
    }

    /// `digits ('.' digits?)? | '.' digits`, then an optional exponent.
    ///
    /// `e` only starts an exponent when digits follow, so `3eV` is three
    /// electronvolts.
    fn parse_number(&mut self, echo: bool) -> Result<f64> {
        let start = self.pos;
        let mut digits = self.consume_digits();
        if self.peek() == Some('.') {
            self.pos += 1;
            digits += self.consume_digits();
        }
        if digits == 0 {
            return Err(QuantaError::parse(self.pos, "a digit"));
        }
        let mantissa_text: String = self.chars[start..self.pos].iter().collect();
        let mantissa: f64 = mantissa_text
            .parse()
            .map_err(|_| QuantaError::parse(start, "a number"))?;

        let mut exponent = 0i32;
        if matches!(self.peek(), Some('e' | 'E')) {
            let signed = matches!(self.peek_at(1), Some('+' | '-'));
            let digit_at = if signed { 2 } else { 1 };
            if matches!(self.peek_at(digit_at), Some(c) if c.is_ascii_digit()) {
                let negative = self.peek_at(1) == Some('-');
                self.pos += digit_at;
                let exp_start = self.pos;
                self.consume_digits();
                let exp_text: String = self.chars[exp_start..self.pos].iter().collect();
                let magnitude: i32 = exp_text
                    .parse()
                    .map_err(|_| QuantaError::parse(exp_start, "an exponent"))?;
                exponent = if negative { -magnitude } else { magnitude };
            }
        }

        if echo {
            self.output.push_str(&format_number(mantissa));
            if exponent != 0 {
                self.output.push_str(&format!("*10^{}", exponent));
            }
        }
        let text: String = self.chars[start..self.pos].iter().collect();
        text.parse().map_err(|_| QuantaError::parse(start, "a number"))
    }

    fn parse_integer(&mut self) -> Result<usize> {
        let start = self.pos;
        if self.consume_digits() == 0 {
            return Err(QuantaError::parse(start, "an integer"));
        }
        let text: String = self.chars[start..self.pos].iter().collect();
        text.parse().map_err(|_| QuantaError::parse(start, "an integer"))
    }

    fn consume_digits(&mut self) -> usize {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            self.pos += 1;
        }
        self.pos - start
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use quanta_core::Dimension;

    fn parse_one(input: &str) -> Result<ParseOutcome> {
        QuantityParser::new().parse(input, &mut ParseHistory::new())
    }

    #[test]
    fn test_number_and_unit() {
        let outcome = parse_one("3 meters").unwrap();
        assert_eq!(outcome.echo, "3*meter");
        assert_relative_eq!(outcome.value.magnitude(), 3.0);
        assert_eq!(outcome.value.proper_dimension(), Dimension::LENGTH);
        assert_eq!(outcome.formatted, "3*meter = 3 m");
    }

    #[test]
    fn test_conversion() {
        let outcome = parse_one("3 meters in miles").unwrap();
        assert_relative_eq!(outcome.value.magnitude(), 1.86411357671e-3, max_relative = 1e-10);
        assert!(outcome.formatted.contains("mile"));
        assert_eq!(outcome.formatted, "3*meter = 0.00186411357671 * mile");
        assert_eq!(outcome.echo, "3*meter");
    }

    #[test]
    fn test_illegal_conversion() {
        let err = parse_one("3 meters in seconds").unwrap_err();
        assert!(matches!(err, QuantaError::DimensionMismatch { ref operation, .. } if operation == "Illegal conversion"));

        let parser = QuantityParser::new().with_false_requests(true);
        let outcome = parser.parse("3 meters in seconds", &mut ParseHistory::new()).unwrap();
        assert_eq!(outcome.value.proper_dimension(), Dimension::VELOCITY);
    }

    #[test]
    fn test_dimension_mismatch() {
        let err = parse_one("2 meters + 3 seconds").unwrap_err();
        assert!(err.is_dimension_mismatch());
    }

    #[test]
    fn test_word_numbers_and_symbols() {
        let outcome = parse_one("ten thousand kg/s^2").unwrap();
        assert_relative_eq!(outcome.value.magnitude(), 1e4);
        assert_eq!(outcome.value.proper_dimension(), Dimension::new([0, 1, -2, 0, 0, 0, 0]));
        assert_eq!(outcome.echo, "(ten*thousand*kilogram)/(second)^2");
    }

    #[test]
    fn test_division_binds_whole_sentence() {
        let outcome = parse_one("1/ten meters").unwrap();
        assert_relative_eq!(outcome.value.magnitude(), 0.1, max_relative = 1e-12);
        assert_eq!(outcome.value.proper_dimension(), Dimension::LENGTH.invert().unwrap());
    }

    #[test]
    fn test_prefixes() {
        let outcome = parse_one("3 millimeters").unwrap();
        assert_relative_eq!(outcome.value.magnitude(), 0.003, max_relative = 1e-12);
        assert_eq!(outcome.echo, "3*0.001*meter");

        let outcome = parse_one("2 ms").unwrap();
        assert_relative_eq!(outcome.value.magnitude(), 0.002, max_relative = 1e-12);
        assert_eq!(outcome.value.proper_dimension(), Dimension::TIME);

        let outcome = parse_one("5 km").unwrap();
        assert_relative_eq!(outcome.value.magnitude(), 5000.0);
        assert_eq!(outcome.echo, "5*kilometer");
    }

    #[test]
    fn test_scientific_number() {
        let outcome = parse_one("1.5e3 meters").unwrap();
        assert_relative_eq!(outcome.value.magnitude(), 1500.0);
        assert_eq!(outcome.echo, "1.5*10^3*meter");

        let outcome = parse_one("3eV").unwrap();
        assert_relative_eq!(outcome.value.magnitude(), 3.0 * 1.60218e-19);
    }

    #[test]
    fn test_power_is_right_associative() {
        let outcome = parse_one("2^3^2").unwrap();
        assert_eq!(outcome.value, Value::Number(512.0));
        assert_eq!(outcome.echo, "2^3^2");

        let outcome = parse_one("2 ** 10").unwrap();
        assert_eq!(outcome.value, Value::Number(1024.0));
    }

    #[test]
    fn test_word_exponents() {
        let outcome = parse_one("9.81 m s^-2").unwrap();
        assert_eq!(outcome.value.proper_dimension(), Dimension::ACCELERATION);
        assert_eq!(outcome.echo, "9.81*(metre*(second)^-2)");

        let outcome = parse_one("4 m2").unwrap();
        assert_eq!(outcome.value.proper_dimension(), Dimension::AREA);
    }

    #[test]
    fn test_unary_and_parens() {
        let outcome = parse_one("-(2 meters + 3 meters)").unwrap();
        assert_relative_eq!(outcome.value.magnitude(), -5.0);
        assert_eq!(outcome.echo, "-(2*meter+3*meter)");
    }

    #[test]
    fn test_imperial() {
        let outcome = parse_one("2 US gallons in litres").unwrap();
        assert_relative_eq!(outcome.value.magnitude(), 7.570823568, max_relative = 1e-12);
        assert_eq!(outcome.echo, "2*(US gallon)");
    }

    #[test]
    fn test_per() {
        let outcome = parse_one("60 miles per hour in knots").unwrap();
        assert_relative_eq!(outcome.value.magnitude(), 60.0 * 1609.344 / 1852.0, max_relative = 1e-12);
    }

    #[test]
    fn test_on_the_fly() {
        let outcome = parse_one("6 widgets / 2 widgets").unwrap();
        assert_eq!(outcome.value, Value::Number(3.0));

        let outcome = parse_one("3 houses * 2 meters").unwrap();
        assert_eq!(outcome.value.type_name(), "Flyquant");
        assert_eq!(outcome.value.to_string(), "6 m houses");
    }

    #[test]
    fn test_on_the_fly_disabled() {
        let parser = QuantityParser::new().with_on_the_fly(false);
        let err = parser.parse("3 blorps", &mut ParseHistory::new()).unwrap_err();
        assert_eq!(err, QuantaError::UnknownIdentifier { word: "blorps".to_string(), position: 2 });
    }

    #[test]
    fn test_fly_variables_reset_between_calls() {
        let parser = QuantityParser::new();
        let mut history = ParseHistory::new();
        parser.parse("3 houses", &mut history).unwrap();
        let outcome = parser.parse("2 houses", &mut history).unwrap();
        assert_eq!(outcome.echo, "2*houses");
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(parse_one("(2 meters"), Err(QuantaError::Parse { .. })));
        assert!(matches!(parse_one("3 meters )"), Err(QuantaError::Parse { .. })));
        assert!(matches!(parse_one("3 meters in"), Err(QuantaError::Parse { .. })));
        assert!(matches!(parse_one(""), Err(QuantaError::Parse { .. })));
        assert!(matches!(parse_one("2 +"), Err(QuantaError::Parse { .. })));
        assert!(matches!(parse_one("3 = 4"), Err(QuantaError::Parse { .. })));
    }

    #[test]
    fn test_failed_parse_is_still_logged() {
        let mut history = ParseHistory::new();
        let _ = QuantityParser::new().parse("  (2 meters  ", &mut history);
        assert_eq!(history.len(), 1);
        assert_eq!(history.read(0).unwrap(), "(2 meters");
    }

    #[test]
    fn test_variables_persist() {
        let parser = QuantityParser::new();
        let mut history = ParseHistory::new();

        let outcome = parser.parse("x = 5 meters", &mut history).unwrap();
        assert_eq!(outcome.echo, "x");
        assert_eq!(outcome.formatted, "x = 5*meter");

        let outcome = parser.parse("x in feet", &mut history).unwrap();
        assert_relative_eq!(outcome.value.magnitude(), 16.4041994751, max_relative = 1e-10);
    }

    #[test]
    fn test_backref_replays() {
        let parser = QuantityParser::new();
        let mut history = ParseHistory::new();

        let first = parser.parse("3 meters", &mut history).unwrap();
        let replay = parser.parse("#0", &mut history).unwrap();
        assert_eq!(replay.value, first.value);
        assert_eq!(replay.echo, "(3*meter)");
        assert_eq!(history.len(), 2);

        let doubled = parser.parse("2 * #0 in feet", &mut history).unwrap();
        assert_relative_eq!(doubled.value.magnitude(), 6.0 / 0.3048, max_relative = 1e-10);
    }

    #[test]
    fn test_backref_does_not_leak_bindings() {
        let parser = QuantityParser::new();
        let mut history = ParseHistory::new();

        parser.parse("x = 1 meter", &mut history).unwrap();
        parser.parse("x = 2 meters", &mut history).unwrap();
        let replay = parser.parse("#0", &mut history).unwrap();

        assert_relative_eq!(replay.value.magnitude(), 1.0);
        assert_relative_eq!(history.variable("x").unwrap().magnitude(), 2.0);
        assert_eq!(history.len(), 3);
    }

    #[test]
    fn test_backref_errors() {
        let parser = QuantityParser::new();
        let mut history = ParseHistory::new();
        let err = parser.parse("#5", &mut history).unwrap_err();
        assert_eq!(err, QuantaError::HistoryOutOfRange { index: 5, len: 1 });

        // entry 1 is "#1" itself
        let err = parser.parse("#1", &mut history).unwrap_err();
        assert!(matches!(err, QuantaError::Parse { .. }));
    }

    #[test]
    fn test_custom_table() {
        let mut table = UnitTable::new();
        table.register(quanta_units::Unit::create(Dimension::LENGTH, "smoot", "smt", 1.7018));
        let parser = QuantityParser::new().with_table(table).with_on_the_fly(false);

        let outcome = parser.parse("364.4 smoots", &mut ParseHistory::new()).unwrap();
        assert_relative_eq!(outcome.value.magnitude(), 364.4 * 1.7018);
        assert!(parser.parse("3 meters", &mut ParseHistory::new()).is_err());
    }

    #[test]
    fn test_exponent_overflow_is_an_error() {
        for input in [
            "N2147483647",
            "m2000000000 m2000000000",
            "house2000000000 house2000000000",
            "m2000000000 / m^-2000000000",
        ] {
            let err = parse_one(input).unwrap_err();
            assert_eq!(err.code(), quanta_core::codes::EXPONENT_RANGE, "{input}");
        }
        assert!(parse_one("m2000000000").is_ok());
    }

    #[test]
    fn test_parsers_share_the_unit_table() {
        let a = QuantityParser::new();
        let b = QuantityParser::new().with_on_the_fly(false);
        assert!(std::ptr::eq(a.table(), b.table()));
        assert!(std::ptr::eq(a.table(), &**UNITS));
    }
}
