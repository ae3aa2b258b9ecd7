use std::error::Error;
use std::fmt;

use crate::table::Dimensions;

/// Errors raised by unit parsing, conversion and quantity arithmetic.
///
/// Every variant is a deterministic function of the inputs; nothing is
/// retried or recovered internally.
#[derive(Debug, Clone, PartialEq)]
pub enum UnitError {
    /// A word of a unit expression does not match `symbol[exponent]`.
    InvalidToken(String),
    /// A well-formed symbol missing from the unit table.
    UnknownUnit(String),
    /// Dimension vectors differ. `dims` is `None` when one side could not be parsed.
    IncompatibleUnits {
        from: String,
        to: String,
        dims: Option<(Dimensions, Dimensions)>,
    },
    /// Array operands cannot be broadcast together.
    ShapeMismatch { lhs: Vec<usize>, rhs: Vec<usize> },
    UnsupportedOperation(String),
    IndexOutOfBounds { index: isize, len: usize },
    /// A unit table entry that could never be looked up or converted.
    InvalidDefinition(String),
    /// A numeric format override that is not `.Nf`, `.NE` or `.Ne`.
    InvalidFormat(String),
}

pub(crate) fn write_dims(f: &mut fmt::Formatter<'_>, dims: &Dimensions) -> fmt::Result {
    write!(f, "{{")?;
    for (idx, (dim, exp)) in dims.iter().enumerate() {
        if idx > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}: {}", dim, exp)?;
    }
    write!(f, "}}")
}

impl fmt::Display for UnitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitError::InvalidToken(token) => write!(f, "Invalid unit token: '{}'", token),
            UnitError::UnknownUnit(symbol) => write!(f, "Unknown unit: '{}'", symbol),
            UnitError::IncompatibleUnits { from, to, dims } => match dims {
                Some((from_dims, to_dims)) => {
                    write!(f, "Incompatible units: '{}' ", from)?;
                    write_dims(f, from_dims)?;
                    write!(f, " vs '{}' ", to)?;
                    write_dims(f, to_dims)
                }
                None => write!(f, "Incompatible units: '{}' vs '{}'", from, to),
            },
            UnitError::ShapeMismatch { lhs, rhs } => write!(
                f,
                "operands could not be broadcast together with shapes {:?} and {:?}",
                lhs, rhs
            ),
            UnitError::UnsupportedOperation(msg) => write!(f, "Unsupported operation: {}", msg),
            UnitError::IndexOutOfBounds { index, len } => write!(
                f,
                "index {} is out of bounds for axis 0 with size {}",
                index, len
            ),
            UnitError::InvalidDefinition(msg) => write!(f, "Invalid unit definition: {}", msg),
            UnitError::InvalidFormat(spec) => write!(f, "Invalid number format: '{}'", spec),
        }
    }
}

impl Error for UnitError {}
