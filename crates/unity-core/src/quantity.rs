//! Values paired with unit strings.
//!
//! A [`Quantity`] is immutable; every operation returns a new one. The unit
//! is kept as the literal expression text: multiplication concatenates unit
//! strings and division appends the inverted divisor, without simplifying.
//! `N * m` is `"N m"`, never `"J"`.
use std::fmt;
use std::ops::{Div, Mul};

use crate::conversion::{invert, Converter};
use crate::error::UnitError;
use crate::value::{Selection, Value};

#[derive(Debug, Clone, PartialEq)]
pub struct Quantity {
    value: Value,
    unit: String,
}

/// Right-hand operand of quantity arithmetic.
#[derive(Debug, Clone, Copy)]
pub enum Operand<'a> {
    Number(f64),
    Quantity(&'a Quantity),
}

impl From<f64> for Operand<'_> {
    fn from(value: f64) -> Self {
        Operand::Number(value)
    }
}

impl From<i32> for Operand<'_> {
    fn from(value: i32) -> Self {
        Operand::Number(f64::from(value))
    }
}

impl<'a> From<&'a Quantity> for Operand<'a> {
    fn from(value: &'a Quantity) -> Self {
        Operand::Quantity(value)
    }
}

/// `"a b"`, trimmed so that a dimensionless side leaves no stray space.
fn join_units(lhs: &str, rhs: &str) -> String {
    format!("{} {}", lhs, rhs).trim().to_string()
}

impl Quantity {
    pub fn new(value: impl Into<Value>, unit: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            unit: unit.into(),
        }
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    pub fn into_parts(self) -> (Value, String) {
        (self.value, self.unit)
    }

    pub fn shape(&self) -> &[usize] {
        self.value.shape()
    }

    pub fn is_scalar(&self) -> bool {
        self.value.is_scalar()
    }

    /// The same quantity expressed in `target`; the result carries `target` verbatim.
    pub fn to(&self, target: &str, conv: &Converter) -> Result<Quantity, UnitError> {
        let value = conv.convert(&self.value, &self.unit, target)?;
        Ok(Quantity::new(value, target))
    }

    /// Factor taking `other`'s values into this quantity's unit.
    ///
    /// Unparseable units count as incompatible, matching [`Converter::is_compatible`].
    fn factor_from(&self, other: &Quantity, conv: &Converter) -> Result<f64, UnitError> {
        conv.factor(&other.unit, &self.unit).map_err(|err| match err {
            UnitError::IncompatibleUnits { .. } => err,
            _ => UnitError::IncompatibleUnits {
                from: other.unit.clone(),
                to: self.unit.clone(),
                dims: None,
            },
        })
    }

    fn combine_additive<'a, F>(
        &self,
        rhs: Operand<'a>,
        conv: &Converter,
        op: &str,
        f: F,
    ) -> Result<Quantity, UnitError>
    where
        F: Fn(f64, f64) -> f64,
    {
        let other = match rhs {
            Operand::Quantity(other) => other,
            Operand::Number(n) => {
                return Err(UnitError::UnsupportedOperation(format!(
                    "cannot {} plain number {} and quantity in '{}'",
                    op, n, self.unit
                )))
            }
        };
        let factor = self.factor_from(other, conv)?;
        let converted = other.value.map(|v| v * factor);
        let value = self.value.zip_with(&converted, f)?;
        Ok(Quantity::new(value, self.unit.clone()))
    }

    /// Element-wise sum. `rhs` is converted into this quantity's unit, which the result keeps.
    pub fn add<'a>(&self, rhs: impl Into<Operand<'a>>, conv: &Converter) -> Result<Quantity, UnitError> {
        self.combine_additive(rhs.into(), conv, "add", |a, b| a + b)
    }

    /// Element-wise difference; see [`Quantity::add`].
    pub fn sub<'a>(&self, rhs: impl Into<Operand<'a>>, conv: &Converter) -> Result<Quantity, UnitError> {
        self.combine_additive(rhs.into(), conv, "subtract", |a, b| a - b)
    }

    pub fn mul<'a>(&self, rhs: impl Into<Operand<'a>>) -> Result<Quantity, UnitError> {
        match rhs.into() {
            Operand::Number(n) => Ok(Quantity::new(self.value.map(|v| v * n), self.unit.clone())),
            Operand::Quantity(other) => {
                let value = self.value.zip_with(&other.value, |a, b| a * b)?;
                Ok(Quantity::new(value, join_units(&self.unit, &other.unit)))
            }
        }
    }

    pub fn div<'a>(&self, rhs: impl Into<Operand<'a>>) -> Result<Quantity, UnitError> {
        match rhs.into() {
            Operand::Number(n) => Ok(Quantity::new(self.value.map(|v| v / n), self.unit.clone())),
            Operand::Quantity(other) => {
                let unit = join_units(&self.unit, &invert(&other.unit)?);
                let value = self.value.zip_with(&other.value, |a, b| a / b)?;
                Ok(Quantity::new(value, unit))
            }
        }
    }

    /// `lhs * self`.
    pub fn rmul(&self, lhs: f64) -> Quantity {
        Quantity::new(self.value.map(|v| lhs * v), self.unit.clone())
    }

    /// `lhs / self`: element-wise reciprocal scaled by `lhs`, with the inverted unit.
    pub fn rdiv(&self, lhs: f64) -> Result<Quantity, UnitError> {
        let unit = invert(&self.unit)?;
        Ok(Quantity::new(self.value.map(|v| lhs / v), unit))
    }

    /// Select along the first axis of an array quantity; the unit is kept.
    pub fn index(&self, selection: Selection) -> Result<Quantity, UnitError> {
        if self.value.is_scalar() {
            return Err(UnitError::UnsupportedOperation(format!(
                "cannot index a scalar quantity in '{}'",
                self.unit
            )));
        }
        let value = self.value.select(selection)?;
        Ok(Quantity::new(value, self.unit.clone()))
    }
}

impl Mul<f64> for &Quantity {
    type Output = Quantity;

    fn mul(self, rhs: f64) -> Quantity {
        Quantity::new(self.value.map(|v| v * rhs), self.unit.clone())
    }
}

impl Mul<&Quantity> for f64 {
    type Output = Quantity;

    fn mul(self, rhs: &Quantity) -> Quantity {
        rhs.rmul(self)
    }
}

impl Div<f64> for &Quantity {
    type Output = Quantity;

    fn div(self, rhs: f64) -> Quantity {
        Quantity::new(self.value.map(|v| v / rhs), self.unit.clone())
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.unit.trim().is_empty() {
            write!(f, "{}", self.value)
        } else {
            write!(f, "{} {}", self.value, self.unit)
        }
    }
}
