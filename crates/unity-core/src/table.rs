//! The unit table: symbol -> (scale, dimension exponents).
//!
//! Tables are plain read-only values. Callers construct one (the built-in
//! [`UnitTable::si`], an empty [`UnitTable::new`] filled through
//! [`UnitTable::define`], or a file loaded by [`crate::io`]) and hand it to a
//! [`crate::Converter`].
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::UnitError;
use crate::parser::is_symbol;

/// Base-dimension exponents keyed by dimension symbol. Zero exponents are never stored.
pub type Dimensions = BTreeMap<String, i32>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitDefinition {
    /// Multiplier relative to the base unit of its dimensions.
    pub scale: f64,
    #[serde(default)]
    pub dims: Dimensions,
}

/// Built-in definitions: (symbol, scale, dimension exponents). Base dimensions are M, L, T.
const BUILTIN_UNITS: &[(&str, f64, &[(&str, i32)])] = &[
    // Mass (base: kg)
    ("kg", 1.0, &[("M", 1)]),
    ("g", 1e-3, &[("M", 1)]),
    ("mg", 1e-6, &[("M", 1)]),
    ("t", 1e3, &[("M", 1)]),
    ("lb", 0.45359237, &[("M", 1)]),
    // Length (base: m)
    ("m", 1.0, &[("L", 1)]),
    ("mm", 1e-3, &[("L", 1)]),
    ("cm", 1e-2, &[("L", 1)]),
    ("km", 1e3, &[("L", 1)]),
    ("in", 0.0254, &[("L", 1)]),
    ("ft", 0.3048, &[("L", 1)]),
    ("mi", 1609.344, &[("L", 1)]),
    // Time (base: s)
    ("s", 1.0, &[("T", 1)]),
    ("ms", 1e-3, &[("T", 1)]),
    ("min", 60.0, &[("T", 1)]),
    ("h", 3600.0, &[("T", 1)]),
    ("d", 86400.0, &[("T", 1)]),
    // Force: N = kg m s-2
    ("N", 1.0, &[("M", 1), ("L", 1), ("T", -2)]),
    ("kN", 1e3, &[("M", 1), ("L", 1), ("T", -2)]),
    // Pressure: Pa = N m-2
    ("Pa", 1.0, &[("M", 1), ("L", -1), ("T", -2)]),
    ("kPa", 1e3, &[("M", 1), ("L", -1), ("T", -2)]),
    ("bar", 1e5, &[("M", 1), ("L", -1), ("T", -2)]),
    ("psi", 6894.757293168361, &[("M", 1), ("L", -1), ("T", -2)]),
    // Energy: J = N m
    ("J", 1.0, &[("M", 1), ("L", 2), ("T", -2)]),
    ("kJ", 1e3, &[("M", 1), ("L", 2), ("T", -2)]),
    // Power: W = J s-1
    ("W", 1.0, &[("M", 1), ("L", 2), ("T", -3)]),
    ("kW", 1e3, &[("M", 1), ("L", 2), ("T", -3)]),
    // Frequency
    ("Hz", 1.0, &[("T", -1)]),
];

/// Read-only mapping from unit symbol to [`UnitDefinition`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct UnitTable {
    units: BTreeMap<String, UnitDefinition>,
}

impl UnitTable {
    /// An empty table; only the empty (dimensionless) expression parses against it.
    pub fn new() -> Self {
        Self {
            units: BTreeMap::new(),
        }
    }

    /// The built-in SI-based table.
    pub fn si() -> Self {
        let mut table = Self::new();
        for (symbol, scale, dims) in BUILTIN_UNITS {
            table.units.insert(
                symbol.to_string(),
                UnitDefinition {
                    scale: *scale,
                    dims: to_dimensions(dims),
                },
            );
        }
        table
    }

    /// Add or replace a definition after validating it.
    pub fn define(&mut self, symbol: &str, scale: f64, dims: &[(&str, i32)]) -> Result<(), UnitError> {
        self.insert(
            symbol,
            UnitDefinition {
                scale,
                dims: to_dimensions(dims),
            },
        )
    }

    /// Add or replace an already-built definition after validating it.
    pub fn insert(&mut self, symbol: &str, mut definition: UnitDefinition) -> Result<(), UnitError> {
        if !is_symbol(symbol) {
            return Err(UnitError::InvalidDefinition(format!(
                "symbol '{}' must consist of ASCII letters only",
                symbol
            )));
        }
        if !definition.scale.is_finite() || definition.scale <= 0.0 {
            return Err(UnitError::InvalidDefinition(format!(
                "scale of '{}' must be finite and positive, got {}",
                symbol, definition.scale
            )));
        }
        if let Some(dim) = definition.dims.keys().find(|dim| !is_symbol(dim)) {
            return Err(UnitError::InvalidDefinition(format!(
                "dimension '{}' of '{}' must consist of ASCII letters only",
                dim, symbol
            )));
        }
        definition.dims.retain(|_, exp| *exp != 0);
        if self.units.insert(symbol.to_string(), definition).is_some() {
            log::debug!("Redefined unit '{}'", symbol);
        }
        Ok(())
    }

    pub fn get(&self, symbol: &str) -> Option<&UnitDefinition> {
        self.units.get(symbol)
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.units.contains_key(symbol)
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Definitions ordered by symbol.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &UnitDefinition)> {
        self.units.iter().map(|(symbol, def)| (symbol.as_str(), def))
    }
}

impl Default for UnitTable {
    fn default() -> Self {
        Self::si()
    }
}

fn to_dimensions(dims: &[(&str, i32)]) -> Dimensions {
    let mut out = Dimensions::new();
    for (dim, exp) in dims {
        *out.entry(dim.to_string()).or_insert(0) += exp;
    }
    out.retain(|_, exp| *exp != 0);
    out
}
