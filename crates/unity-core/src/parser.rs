//! Unit expression tokenizer and canonical-form reduction.
//!
//! A unit expression is a whitespace-separated list of `symbol[exponent]`
//! words, e.g. `"kg m2 s-2 mm-1"`. The symbol is one or more ASCII letters
//! and the optional exponent is a signed integer written directly after it.
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{write_dims, UnitError};
use crate::table::{Dimensions, UnitTable};

static UNIT_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([A-Za-z]+)([-+]?[0-9]+)?$").unwrap());

/// Whether `s` is a valid unit (or dimension) symbol on its own.
pub(crate) fn is_symbol(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphabetic())
}

/// One `symbol[exponent]` word of a unit expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitToken {
    pub symbol: String,
    pub exponent: i32,
    /// Whether the exponent was written out (`"m1"`) or implied (`"m"`).
    pub explicit: bool,
}

impl UnitToken {
    pub fn parse(word: &str) -> Result<Self, UnitError> {
        let caps = UNIT_TOKEN
            .captures(word)
            .ok_or_else(|| UnitError::InvalidToken(word.to_string()))?;
        let symbol = caps[1].to_string();
        let (exponent, explicit) = match caps.get(2) {
            Some(exp) => {
                let exponent = exp
                    .as_str()
                    .parse::<i32>()
                    .map_err(|_| UnitError::InvalidToken(word.to_string()))?;
                (exponent, true)
            }
            None => (1, false),
        };
        Ok(Self {
            symbol,
            exponent,
            explicit,
        })
    }

    /// The token raised to the power -1; the suffix is dropped exactly when the result is 1.
    pub fn inverted(&self) -> Result<Self, UnitError> {
        let exponent = self
            .exponent
            .checked_neg()
            .ok_or_else(|| UnitError::InvalidToken(self.to_string()))?;
        Ok(Self {
            symbol: self.symbol.clone(),
            exponent,
            explicit: exponent != 1,
        })
    }
}

impl fmt::Display for UnitToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.explicit {
            write!(f, "{}{}", self.symbol, self.exponent)
        } else {
            write!(f, "{}", self.symbol)
        }
    }
}

/// Split a unit expression on whitespace and parse every word.
pub fn tokenize(expr: &str) -> Result<Vec<UnitToken>, UnitError> {
    expr.split_whitespace().map(UnitToken::parse).collect()
}

/// A unit reduced to a scale relative to the base system plus dimension exponents.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalUnit {
    scale: f64,
    dims: Dimensions,
}

impl CanonicalUnit {
    pub fn new(scale: f64, mut dims: Dimensions) -> Self {
        dims.retain(|_, exp| *exp != 0);
        Self { scale, dims }
    }

    /// The identity: scale 1, no dimensions.
    pub fn dimensionless() -> Self {
        Self {
            scale: 1.0,
            dims: Dimensions::new(),
        }
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn dims(&self) -> &Dimensions {
        &self.dims
    }

    pub fn is_dimensionless(&self) -> bool {
        self.dims.is_empty()
    }

    pub fn is_compatible_with(&self, other: &CanonicalUnit) -> bool {
        self.dims == other.dims
    }
}

impl fmt::Display for CanonicalUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} ", self.scale)?;
        write_dims(f, &self.dims)
    }
}

/// Reduce a unit expression to its canonical form, folding tokens left to right.
///
/// The empty expression is dimensionless. Each word is checked against the
/// token grammar and then looked up, so the first bad word decides the error.
pub fn parse(expr: &str, table: &UnitTable) -> Result<CanonicalUnit, UnitError> {
    let mut scale = 1.0_f64;
    let mut dims = Dimensions::new();

    for word in expr.split_whitespace() {
        let token = UnitToken::parse(word)?;
        let def = table
            .get(&token.symbol)
            .ok_or_else(|| UnitError::UnknownUnit(token.symbol.clone()))?;

        scale *= def.scale.powf(f64::from(token.exponent));
        if !scale.is_finite() || scale <= 0.0 {
            return Err(UnitError::InvalidToken(word.to_string()));
        }

        for (dim, dim_exp) in &def.dims {
            let entry = dims.entry(dim.clone()).or_insert(0);
            let current = *entry;
            *entry = dim_exp
                .checked_mul(token.exponent)
                .and_then(|exp| current.checked_add(exp))
                .ok_or_else(|| UnitError::InvalidToken(word.to_string()))?;
        }
    }

    Ok(CanonicalUnit::new(scale, dims))
}
