use std::sync::Arc;

use crate::error::{ChartError, ChartResult};

pub const SMART_NUMBER: &str = "SMART_NUMBER";

const DEFAULT_PRECISION: u8 = 6;
const SMART_MIN_POSITIONAL: f64 = 1e-6;
const SMART_MAX_POSITIONAL: f64 = 1e27;
const MAX_PRECISION: u8 = 20;
const SI_PREFIXES: [&str; 17] = [
    "y", "z", "a", "f", "p", "n", "µ", "m", "", "k", "M", "G", "T", "P", "E", "Z", "Y",
];

/// Formats values for axis ticks, bar labels and tooltips.
///
/// One instance is shared by every text producer of a chart so the same
/// value always reads the same way.
pub trait NumberFormatter: Send + Sync {
    fn format(&self, value: f64) -> String;
}

impl<F> NumberFormatter for F
where
    F: Fn(f64) -> String + Send + Sync,
{
    fn format(&self, value: f64) -> String {
        self(value)
    }
}

pub type SharedNumberFormatter = Arc<dyn NumberFormatter>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatKind {
    /// `f`: fixed-point with `precision` decimals.
    Fixed,
    /// `d`: rounded integer.
    Integer,
    /// `%`: multiplied by 100, fixed-point, `%` suffix.
    Percent,
    /// `s`: SI prefix with `precision` significant digits.
    Si,
    /// `e`: exponent notation.
    Exponent,
    /// `r`: decimal notation rounded to `precision` significant digits.
    Rounded,
    /// `g`: `precision` significant digits, switching to exponent notation
    /// for very large or very small magnitudes.
    Precision,
    /// no type: shortest round-trip representation.
    General,
}

/// Parsed d3-style specifier: `[$][+][,][.precision][~][type]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatPattern {
    pub currency: bool,
    pub explicit_plus: bool,
    pub grouping: bool,
    pub precision: Option<u8>,
    pub trim: bool,
    pub kind: FormatKind,
}

/// Built-in formatter driven by a `numbers_format` specifier string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NumberFormat {
    /// Compact adaptive format: SI suffixes from 1000 up, three significant
    /// digits below, integers verbatim. Magnitudes past the SI prefixes fall
    /// back to exponent notation.
    #[default]
    Smart,
    Pattern(FormatPattern),
}

impl NumberFormat {
    pub fn parse(specifier: &str) -> ChartResult<Self> {
        let trimmed = specifier.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(SMART_NUMBER) {
            return Ok(Self::Smart);
        }
        parse_pattern(trimmed).map(Self::Pattern)
    }
}

impl NumberFormatter for NumberFormat {
    fn format(&self, value: f64) -> String {
        if !value.is_finite() {
            return "NaN".to_owned();
        }
        match self {
            Self::Smart => format_smart(value),
            Self::Pattern(pattern) => format_pattern(*pattern, value),
        }
    }
}

fn parse_pattern(specifier: &str) -> ChartResult<FormatPattern> {
    let invalid = |reason: &str| ChartError::InvalidNumberFormat {
        specifier: specifier.to_owned(),
        reason: reason.to_owned(),
    };

    let mut chars = specifier.chars().peekable();
    let mut pattern = FormatPattern {
        currency: false,
        explicit_plus: false,
        grouping: false,
        precision: None,
        trim: false,
        kind: FormatKind::General,
    };

    if chars.peek() == Some(&'$') {
        pattern.currency = true;
        chars.next();
    }
    match chars.peek() {
        Some('+') => {
            pattern.explicit_plus = true;
            chars.next();
        }
        Some('-') => {
            chars.next();
        }
        _ => {}
    }
    if chars.peek() == Some(&',') {
        pattern.grouping = true;
        chars.next();
    }
    if chars.peek() == Some(&'.') {
        chars.next();
        let mut digits = String::new();
        while let Some(ch) = chars.peek().copied().filter(char::is_ascii_digit) {
            digits.push(ch);
            chars.next();
        }
        let precision: u8 = digits
            .parse()
            .map_err(|_| invalid("precision must follow `.`"))?;
        if precision > MAX_PRECISION {
            return Err(invalid("precision must be <= 20"));
        }
        pattern.precision = Some(precision);
    }
    if chars.peek() == Some(&'~') {
        pattern.trim = true;
        chars.next();
    }
    if let Some(kind) = chars.next() {
        pattern.kind = match kind {
            'f' => FormatKind::Fixed,
            'd' => FormatKind::Integer,
            '%' => FormatKind::Percent,
            's' => FormatKind::Si,
            'e' => FormatKind::Exponent,
            'r' => FormatKind::Rounded,
            'g' => FormatKind::Precision,
            other => return Err(invalid(&format!("unsupported format type `{other}`"))),
        };
    }
    if chars.next().is_some() {
        return Err(invalid("unexpected trailing characters"));
    }
    Ok(pattern)
}

fn format_smart(value: f64) -> String {
    let magnitude = value.abs();
    if magnitude == 0.0 {
        return "0".to_owned();
    }
    let body = if !(SMART_MIN_POSITIONAL..SMART_MAX_POSITIONAL).contains(&magnitude) {
        let (mantissa, exponent) = exponent_parts(magnitude, 2);
        format!("{}{exponent}", trim_fraction(mantissa))
    } else if magnitude >= 1_000.0 {
        let (digits, prefix) = si_parts(magnitude, 3);
        format!("{}{prefix}", trim_fraction(digits))
    } else if magnitude.fract() == 0.0 {
        format!("{magnitude:.0}")
    } else {
        let decimals = significant_decimals(magnitude, 3);
        trim_fraction(format!("{magnitude:.decimals$}"))
    };
    with_sign(value < 0.0, false, false, body, "")
}

fn format_pattern(pattern: FormatPattern, value: f64) -> String {
    let magnitude = value.abs();
    let precision = usize::from(pattern.precision.unwrap_or(DEFAULT_PRECISION));

    let (mut body, suffix) = match pattern.kind {
        FormatKind::Fixed => (format!("{magnitude:.precision$}"), String::new()),
        FormatKind::Integer => (format!("{:.0}", magnitude.round()), String::new()),
        FormatKind::Percent => (
            format!("{:.precision$}", magnitude * 100.0),
            "%".to_owned(),
        ),
        FormatKind::Si => {
            let (digits, prefix) = si_parts(magnitude, precision.max(1));
            (digits, prefix.to_owned())
        }
        FormatKind::Exponent => exponent_parts(magnitude, precision),
        FormatKind::Rounded => {
            let (digits, exponent) = significant_digits(magnitude, precision);
            (positional(&digits, exponent), String::new())
        }
        FormatKind::Precision => {
            let (digits, exponent) = significant_digits(magnitude, precision);
            if exponent < -6 || exponent >= digits.len() as i32 {
                let (lead, rest) = digits.split_at(1);
                let mantissa = if rest.is_empty() {
                    lead.to_owned()
                } else {
                    format!("{lead}.{rest}")
                };
                let sign = if exponent < 0 { '-' } else { '+' };
                (mantissa, format!("e{sign}{}", exponent.unsigned_abs()))
            } else {
                (positional(&digits, exponent), String::new())
            }
        }
        FormatKind::General => (magnitude.to_string(), String::new()),
    };

    if pattern.trim {
        body = trim_fraction(body);
    }
    if pattern.grouping {
        body = group_thousands(&body);
    }
    with_sign(
        value < 0.0,
        pattern.explicit_plus,
        pattern.currency,
        body,
        &suffix,
    )
}

fn with_sign(negative: bool, explicit_plus: bool, currency: bool, body: String, suffix: &str) -> String {
    let is_zero = body.chars().all(|ch| matches!(ch, '0' | '.' | ','));
    let sign = if negative && !is_zero {
        "-"
    } else if explicit_plus {
        "+"
    } else {
        ""
    };
    let currency = if currency { "$" } else { "" };
    format!("{sign}{currency}{body}{suffix}")
}

/// Scales `magnitude` to an SI prefix and renders `significant` digits.
fn si_parts(magnitude: f64, significant: usize) -> (String, &'static str) {
    if magnitude == 0.0 {
        let decimals = significant.saturating_sub(1);
        return (format!("{magnitude:.decimals$}"), "");
    }

    let mut exponent = ((magnitude.log10() / 3.0).floor() as i32).clamp(-8, 8);
    loop {
        let scaled = magnitude / 10f64.powi(exponent * 3);
        let decimals = significant_decimals(scaled, significant);
        let digits = format!("{scaled:.decimals$}");
        // Rounding can carry into the next prefix, e.g. 999.96k -> 1000k.
        let rounded: f64 = digits.parse().unwrap_or(scaled);
        if rounded >= 1_000.0 && exponent < 8 {
            exponent += 1;
            continue;
        }
        let prefix = SI_PREFIXES[(exponent + 8) as usize];
        return (digits, prefix);
    }
}

fn exponent_parts(magnitude: f64, precision: usize) -> (String, String) {
    let text = format!("{magnitude:.precision$e}");
    match text.split_once('e') {
        Some((mantissa, exponent)) if exponent.starts_with('-') => {
            (mantissa.to_owned(), format!("e{exponent}"))
        }
        Some((mantissa, exponent)) => (mantissa.to_owned(), format!("e+{exponent}")),
        None => (text, String::new()),
    }
}

/// Digit string and decimal exponent of `magnitude` rounded to
/// `significant` digits: `1234.0, 2` gives `("12", 3)`.
fn significant_digits(magnitude: f64, significant: usize) -> (String, i32) {
    let decimals = significant.max(1) - 1;
    let text = format!("{magnitude:.decimals$e}");
    let (mantissa, exponent) = text.split_once('e').unwrap_or((text.as_str(), "0"));
    (mantissa.replace('.', ""), exponent.parse().unwrap_or(0))
}

/// Places the decimal point into `digits` (first digit at `10^exponent`),
/// padding with zeros on either side.
fn positional(digits: &str, exponent: i32) -> String {
    let len = digits.len() as i32;
    if exponent >= len - 1 {
        format!("{digits}{}", "0".repeat((exponent - len + 1) as usize))
    } else if exponent >= 0 {
        let (integer, fraction) = digits.split_at(exponent as usize + 1);
        format!("{integer}.{fraction}")
    } else {
        format!("0.{}{digits}", "0".repeat((-exponent - 1) as usize))
    }
}

/// Number of decimals that leaves `significant` significant digits.
fn significant_decimals(magnitude: f64, significant: usize) -> usize {
    if magnitude == 0.0 || !magnitude.is_finite() {
        return significant.saturating_sub(1);
    }
    let integer_digits = magnitude.log10().floor() as i64 + 1;
    (significant as i64 - integer_digits).clamp(0, 12) as usize
}

fn trim_fraction(mut text: String) -> String {
    if text.contains('.') {
        let trimmed_len = text.trim_end_matches('0').trim_end_matches('.').len();
        text.truncate(trimmed_len);
    }
    text
}

fn group_thousands(text: &str) -> String {
    let (integer, fraction) = match text.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (text, None),
    };
    if !integer.chars().all(|ch| ch.is_ascii_digit()) {
        return text.to_owned();
    }

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3 + 8);
    for (i, ch) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if let Some(fraction) = fraction {
        grouped.push('.');
        grouped.push_str(fraction);
    }
    grouped
}
