//! Conversion engine: compatibility checks, conversion factors and unit inversion.
use std::sync::Arc;

use ndarray::{Array, Dimension};

use crate::error::UnitError;
use crate::parser::{self, tokenize, CanonicalUnit};
use crate::table::UnitTable;
use crate::value::Value;

/// Payloads that can be multiplied by a conversion factor.
pub trait Scalable: Sized {
    fn scaled(&self, factor: f64) -> Self;
}

impl Scalable for f64 {
    fn scaled(&self, factor: f64) -> Self {
        self * factor
    }
}

impl<D: Dimension> Scalable for Array<f64, D> {
    fn scaled(&self, factor: f64) -> Self {
        self.mapv(|v| v * factor)
    }
}

impl Scalable for Value {
    fn scaled(&self, factor: f64) -> Self {
        self.map(|v| v * factor)
    }
}

/// Converts between unit expressions using a shared, read-only [`UnitTable`].
///
/// Cloning is cheap; clones share the same table.
#[derive(Debug, Clone, Default)]
pub struct Converter {
    table: Arc<UnitTable>,
}

impl Converter {
    pub fn new(table: UnitTable) -> Self {
        Self::with_shared(Arc::new(table))
    }

    pub fn with_shared(table: Arc<UnitTable>) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &UnitTable {
        &self.table
    }

    pub fn parse(&self, expr: &str) -> Result<CanonicalUnit, UnitError> {
        parser::parse(expr, &self.table)
    }

    /// Factor that takes a value expressed in `from` to the same value expressed in `to`.
    pub fn factor(&self, from: &str, to: &str) -> Result<f64, UnitError> {
        let c_from = self.parse(from)?;
        let c_to = self.parse(to)?;
        if !c_from.is_compatible_with(&c_to) {
            return Err(UnitError::IncompatibleUnits {
                from: from.to_string(),
                to: to.to_string(),
                dims: Some((c_from.dims().clone(), c_to.dims().clone())),
            });
        }
        let factor = c_from.scale() / c_to.scale();
        log::trace!("conversion factor '{}' -> '{}' = {:e}", from, to, factor);
        Ok(factor)
    }

    /// Convert a scalar, an array or a [`Value`] from one unit to another.
    pub fn convert<T: Scalable>(&self, value: &T, from: &str, to: &str) -> Result<T, UnitError> {
        let factor = self.factor(from, to)?;
        Ok(value.scaled(factor))
    }

    /// Whether two unit expressions share a dimension vector.
    ///
    /// Total over all inputs: malformed or unknown units give `false`.
    pub fn is_compatible(&self, a: &str, b: &str) -> bool {
        match (self.parse(a), self.parse(b)) {
            (Ok(c_a), Ok(c_b)) => c_a.is_compatible_with(&c_b),
            _ => false,
        }
    }
}

/// Negate every exponent of a unit expression (`"kg m s-2"` -> `"kg-1 m-1 s2"`).
///
/// Works on text only: symbols are not looked up, so unknown units pass through.
pub fn invert(expr: &str) -> Result<String, UnitError> {
    let inverted = tokenize(expr)?
        .iter()
        .map(|token| token.inverted().map(|t| t.to_string()))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(inverted.join(" "))
}
