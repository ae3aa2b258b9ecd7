//! Typst math rendering of quantities.
//!
//! `Quantity::new(5.0, "kg m s-2").format()` gives
//! `$ 5.000 \u{22C5} kg \u{22C5} m \u{22C5} s#super[-2] $`. The `\u{22C5}`
//! is written out literally as a Typst escape for the dot operator.
//!
//! Numbers get a precision chosen from their magnitude:
//!
//! | magnitude `a`            | rendering            |
//! |--------------------------|----------------------|
//! | `a == 0`                 | `0`                  |
//! | `a < 0.1`, `a > 9999.9`  | `5.00E-02`           |
//! | `0.1 <= a < 10`          | 3 decimals           |
//! | `10 <= a < 100`          | 2 decimals           |
//! | `100 <= a < 1000`        | 1 decimal            |
//! | `1000 <= a <= 9999.9`    | no decimals          |
use std::str::FromStr;

use ndarray::ArrayViewD;

use crate::error::UnitError;
use crate::parser::UnitToken;
use crate::quantity::Quantity;
use crate::value::Value;

/// Separator placed between the number and each unit token.
pub const UNIT_SEPARATOR: &str = " \\u{22C5} ";

/// Largest precision accepted in a format override.
pub const MAX_PRECISION: usize = u16::MAX as usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberFormat {
    /// No decimals.
    Integer,
    /// Fixed-point with the given number of decimals.
    Fixed(usize),
    /// Mantissa with `precision` decimals and a signed, two-digit-minimum exponent.
    Scientific { precision: usize, uppercase: bool },
}

impl NumberFormat {
    /// The rendering tier for a value, chosen from its absolute value.
    pub fn for_magnitude(value: f64) -> Self {
        let a = value.abs();
        if a == 0.0 {
            NumberFormat::Integer
        } else if a < 0.1 || a > 9999.9 {
            NumberFormat::Scientific {
                precision: 2,
                uppercase: true,
            }
        } else if a < 10.0 {
            NumberFormat::Fixed(3)
        } else if a < 100.0 {
            NumberFormat::Fixed(2)
        } else if a < 1000.0 {
            NumberFormat::Fixed(1)
        } else {
            NumberFormat::Fixed(0)
        }
    }

    pub fn apply(&self, value: f64) -> String {
        if !value.is_finite() {
            return non_finite(value, self.is_uppercase());
        }
        match *self {
            NumberFormat::Integer => format!("{:.0}", value),
            NumberFormat::Fixed(precision) => format!("{:.*}", precision, value),
            NumberFormat::Scientific {
                precision,
                uppercase,
            } => scientific(value, precision, uppercase),
        }
    }

    fn is_uppercase(&self) -> bool {
        matches!(self, NumberFormat::Scientific { uppercase: true, .. })
    }
}

fn non_finite(value: f64, uppercase: bool) -> String {
    let text = if value.is_nan() {
        "nan"
    } else if value.is_sign_negative() {
        "-inf"
    } else {
        "inf"
    };
    if uppercase {
        text.to_uppercase()
    } else {
        text.to_string()
    }
}

fn scientific(value: f64, precision: usize, uppercase: bool) -> String {
    let raw = format!("{:.*e}", precision, value);
    let Some((mantissa, exponent)) = raw.split_once('e') else {
        return raw;
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);
    format!(
        "{}{}{}{:02}",
        mantissa,
        if uppercase { 'E' } else { 'e' },
        if exponent < 0 { '-' } else { '+' },
        exponent.unsigned_abs()
    )
}

impl FromStr for NumberFormat {
    type Err = UnitError;

    /// Accepts `.Nf`, `.NE` and `.Ne`, optionally prefixed with `:`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || UnitError::InvalidFormat(s.to_string());
        let spec = s.trim().trim_start_matches(':');
        let body = spec.strip_prefix('.').ok_or_else(invalid)?;
        if body.len() < 2 {
            return Err(invalid());
        }
        let (digits, kind) = body.split_at(body.len() - 1);
        if !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        let precision: usize = digits.parse().map_err(|_| invalid())?;
        if precision > MAX_PRECISION {
            return Err(invalid());
        }
        match kind {
            "f" if precision == 0 => Ok(NumberFormat::Integer),
            "f" => Ok(NumberFormat::Fixed(precision)),
            "E" => Ok(NumberFormat::Scientific {
                precision,
                uppercase: true,
            }),
            "e" => Ok(NumberFormat::Scientific {
                precision,
                uppercase: false,
            }),
            _ => Err(invalid()),
        }
    }
}

fn render_number(value: f64, number_format: Option<NumberFormat>) -> String {
    number_format
        .unwrap_or_else(|| NumberFormat::for_magnitude(value))
        .apply(value)
}

fn render_array(view: ArrayViewD<'_, f64>, number_format: Option<NumberFormat>) -> String {
    if view.ndim() == 0 {
        return view
            .iter()
            .next()
            .map(|v| render_number(*v, number_format))
            .unwrap_or_default();
    }
    let parts: Vec<String> = view
        .outer_iter()
        .map(|sub| render_array(sub, number_format))
        .collect();
    format!("[{}]", parts.join(", "))
}

/// Numeric part only: one number for a scalar, nested brackets for arrays.
pub fn render_value(value: &Value, number_format: Option<NumberFormat>) -> String {
    match value {
        Value::Scalar(v) => render_number(*v, number_format),
        Value::Array(array) => render_array(array.view(), number_format),
    }
}

/// Unit part: tokens with an explicit exponent get `#super[..]`.
///
/// Words outside the token grammar are emitted unchanged.
pub fn render_unit(unit: &str) -> String {
    unit.split_whitespace()
        .map(|word| match UnitToken::parse(word) {
            Ok(token) if token.explicit => format!("{}#super[{}]", token.symbol, token.exponent),
            Ok(token) => token.symbol,
            Err(_) => word.to_string(),
        })
        .collect::<Vec<_>>()
        .join(UNIT_SEPARATOR)
}

impl Quantity {
    /// Render with magnitude-dependent precision.
    pub fn format(&self) -> String {
        self.format_with(None)
    }

    /// Render with `number_format` applied to every element, or the magnitude tiers when `None`.
    pub fn format_with(&self, number_format: Option<NumberFormat>) -> String {
        let number = render_value(self.value(), number_format);
        let unit = render_unit(self.unit());
        if unit.is_empty() {
            format!("$ {} $", number)
        } else {
            format!("$ {}{}{} $", number, UNIT_SEPARATOR, unit)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scientific_exponent_has_sign_and_two_digits() {
        assert_eq!(scientific(0.05, 2, true), "5.00E-02");
        assert_eq!(scientific(12345.0, 2, true), "1.23E+04");
        assert_eq!(scientific(1e-123, 1, false), "1.0e-123");
        assert_eq!(scientific(f64::INFINITY, 2, true), "inf");
    }

    #[test]
    fn parses_override_strings() {
        assert_eq!(".3f".parse::<NumberFormat>().unwrap(), NumberFormat::Fixed(3));
        assert_eq!(":.0f".parse::<NumberFormat>().unwrap(), NumberFormat::Integer);
        assert_eq!(
            ".4e".parse::<NumberFormat>().unwrap(),
            NumberFormat::Scientific {
                precision: 4,
                uppercase: false
            }
        );
        for bad in ["", "3f", ".f", ".3g", ".-1f", "abc"] {
            assert!(bad.parse::<NumberFormat>().is_err(), "'{}' should be rejected", bad);
        }
    }
}
