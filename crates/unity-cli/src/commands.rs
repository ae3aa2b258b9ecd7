//! Subcommand implementations. Each returns the text to print.
use anyhow::{Context, Result};

use unity_core::{invert, Converter, NumberFormat, Quantity, UnitTable, Value};

/// One value is a scalar; several form a 1-D array.
pub fn value_from_args(values: &[f64]) -> Value {
    match values {
        [single] => Value::Scalar(*single),
        many => Value::from(many.to_vec()),
    }
}

pub fn convert(conv: &Converter, values: &[f64], from: &str, to: &str) -> Result<String> {
    let quantity = Quantity::new(value_from_args(values), from);
    let converted = quantity
        .to(to, conv)
        .with_context(|| format!("Cannot convert '{}' to '{}'", from, to))?;
    log::debug!("{} -> {}", quantity, converted);
    Ok(converted.to_string())
}

pub fn check(conv: &Converter, a: &str, b: &str) -> String {
    if conv.is_compatible(a, b) {
        format!("'{}' and '{}' are compatible", a, b)
    } else {
        format!("'{}' and '{}' are not compatible", a, b)
    }
}

pub fn invert_unit(expr: &str) -> Result<String> {
    Ok(invert(expr)?)
}

/// Canonical form of an expression: scale relative to the base units and dimension exponents.
pub fn describe(conv: &Converter, expr: &str) -> Result<String> {
    let canonical = conv.parse(expr)?;
    Ok(format!("{} = {}", expr.trim(), canonical))
}

pub fn format_quantity(values: &[f64], unit: &str, number_format: Option<NumberFormat>) -> String {
    Quantity::new(value_from_args(values), unit).format_with(number_format)
}

pub fn list_units(table: &UnitTable, json: bool) -> Result<String> {
    if json {
        return Ok(serde_json::to_string_pretty(table)?);
    }
    let lines: Vec<String> = table
        .iter()
        .map(|(symbol, def)| {
            let dims = def
                .dims
                .iter()
                .map(|(dim, exp)| if *exp == 1 { dim.clone() } else { format!("{}{}", dim, exp) })
                .collect::<Vec<_>>()
                .join(" ");
            format!("{:<6} {:<14e} {}", symbol, def.scale, dims)
        })
        .collect();
    Ok(lines.join("\n"))
}
