//! unity-core: dimensional analysis and unit conversion.
//!
//! This crate parses textual unit expressions such as `"kg m s-2"`, reduces
//! them to a canonical (scale, dimension-vector) form through an injected
//! [`UnitTable`], computes conversion factors between compatible units and
//! wraps scalar or N-dimensional values in a [`Quantity`] whose arithmetic
//! carries unit strings along.
//!
//! Unit strings are never normalised: `"N" * "m"` stays `"N m"`. Every
//! operation re-parses the text it needs, so textually different but
//! dimensionally equal units interoperate freely.
pub mod conversion;
pub mod error;
pub mod format;
pub mod io;
pub mod parser;
pub mod quantity;
pub mod table;
pub mod value;

pub use conversion::{invert, Converter, Scalable};
pub use error::UnitError;
pub use format::NumberFormat;
pub use parser::{parse, tokenize, CanonicalUnit, UnitToken};
pub use quantity::{Operand, Quantity};
pub use table::{Dimensions, UnitDefinition, UnitTable};
pub use value::{Selection, Value};
