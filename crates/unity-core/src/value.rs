//! Numeric payload of a quantity: a scalar or an N-dimensional `f64` array.
//!
//! All element types are widened to `f64`. Binary operations follow the usual
//! two-operand broadcasting rules: shapes are aligned from the trailing axis
//! and each aligned pair must be equal or contain a 1.
use std::fmt;

use ndarray::{Array, ArrayD, ArrayViewD, Axis, Dimension, Zip};

use crate::error::UnitError;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Scalar(f64),
    Array(ArrayD<f64>),
}

/// Element selection along the first axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// One position; negative positions count from the end.
    Index(isize),
    /// `start:stop:step` with Python slice semantics. `None` bounds take the default for the step direction.
    Slice {
        start: Option<isize>,
        stop: Option<isize>,
        step: isize,
    },
}

impl Selection {
    /// `start..stop` with step 1.
    pub fn range(start: isize, stop: isize) -> Self {
        Selection::Slice {
            start: Some(start),
            stop: Some(stop),
            step: 1,
        }
    }

    /// Every `step`-th element of the whole axis (`::step`).
    pub fn every(step: isize) -> Self {
        Selection::Slice {
            start: None,
            stop: None,
            step,
        }
    }
}

/// Positions selected by `start:stop:step` over an axis of length `len`.
pub(crate) fn slice_positions(
    len: usize,
    start: Option<isize>,
    stop: Option<isize>,
    step: isize,
) -> Result<Vec<usize>, UnitError> {
    if step == 0 {
        return Err(UnitError::UnsupportedOperation(
            "slice step cannot be zero".to_string(),
        ));
    }
    let len = len as isize;
    let (lower, upper) = if step > 0 { (0, len) } else { (-1, len - 1) };
    let clamp = |bound: isize| {
        if bound < 0 {
            (bound + len).max(lower)
        } else {
            bound.min(upper)
        }
    };
    let start = start.map(clamp).unwrap_or(if step > 0 { lower } else { upper });
    let stop = stop.map(clamp).unwrap_or(if step > 0 { upper } else { lower });

    let mut positions = Vec::new();
    let mut pos = start;
    while (step > 0 && pos < stop) || (step < 0 && pos > stop) {
        positions.push(pos as usize);
        pos = match pos.checked_add(step) {
            Some(next) => next,
            None => break,
        };
    }
    Ok(positions)
}

/// Result shape of broadcasting `lhs` against `rhs`.
pub fn broadcast_shape(lhs: &[usize], rhs: &[usize]) -> Result<Vec<usize>, UnitError> {
    let ndim = lhs.len().max(rhs.len());
    let mut shape = vec![0; ndim];
    for axis in 0..ndim {
        // Walk from the trailing axis; missing leading axes behave as 1.
        let l = lhs.len().checked_sub(axis + 1).map_or(1, |i| lhs[i]);
        let r = rhs.len().checked_sub(axis + 1).map_or(1, |i| rhs[i]);
        shape[ndim - axis - 1] = match (l, r) {
            (l, r) if l == r => l,
            (1, r) => r,
            (l, 1) => l,
            _ => {
                return Err(UnitError::ShapeMismatch {
                    lhs: lhs.to_vec(),
                    rhs: rhs.to_vec(),
                })
            }
        };
    }
    Ok(shape)
}

impl Value {
    /// Shape of the payload; empty for a scalar.
    pub fn shape(&self) -> &[usize] {
        match self {
            Value::Scalar(_) => &[],
            Value::Array(array) => array.shape(),
        }
    }

    /// Number of elements (1 for a scalar).
    pub fn len(&self) -> usize {
        match self {
            Value::Scalar(_) => 1,
            Value::Array(array) => array.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self, Value::Scalar(_))
    }

    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Value::Scalar(v) => Some(*v),
            Value::Array(_) => None,
        }
    }

    pub fn as_array(&self) -> Option<&ArrayD<f64>> {
        match self {
            Value::Scalar(_) => None,
            Value::Array(array) => Some(array),
        }
    }

    /// Elements in logical (row-major) order.
    pub fn to_vec(&self) -> Vec<f64> {
        match self {
            Value::Scalar(v) => vec![*v],
            Value::Array(array) => array.iter().copied().collect(),
        }
    }

    pub fn map<F>(&self, f: F) -> Value
    where
        F: Fn(f64) -> f64,
    {
        match self {
            Value::Scalar(v) => Value::Scalar(f(*v)),
            Value::Array(array) => Value::Array(array.mapv(f)),
        }
    }

    /// Combine two payloads element-wise with broadcasting.
    pub fn zip_with<F>(&self, other: &Value, f: F) -> Result<Value, UnitError>
    where
        F: Fn(f64, f64) -> f64,
    {
        match (self, other) {
            (Value::Scalar(a), Value::Scalar(b)) => Ok(Value::Scalar(f(*a, *b))),
            (Value::Array(a), Value::Scalar(b)) => Ok(Value::Array(a.mapv(|x| f(x, *b)))),
            (Value::Scalar(a), Value::Array(b)) => Ok(Value::Array(b.mapv(|y| f(*a, y)))),
            (Value::Array(a), Value::Array(b)) => {
                let shape = broadcast_shape(a.shape(), b.shape())?;
                let mismatch = || UnitError::ShapeMismatch {
                    lhs: a.shape().to_vec(),
                    rhs: b.shape().to_vec(),
                };
                let lhs = a.broadcast(shape.as_slice()).ok_or_else(mismatch)?;
                let rhs = b.broadcast(shape.as_slice()).ok_or_else(mismatch)?;
                Ok(Value::Array(
                    Zip::from(&lhs).and(&rhs).map_collect(|&x, &y| f(x, y)),
                ))
            }
        }
    }

    /// Select along the first axis.
    ///
    /// An integer index drops the axis, so a 1-D array yields a scalar.
    pub fn select(&self, selection: Selection) -> Result<Value, UnitError> {
        let array = match self {
            Value::Array(array) if array.ndim() > 0 => array,
            _ => {
                return Err(UnitError::UnsupportedOperation(
                    "cannot index a scalar value".to_string(),
                ))
            }
        };
        let len = array.len_of(Axis(0));

        match selection {
            Selection::Index(index) => {
                let pos = if index < 0 { index + len as isize } else { index };
                if pos < 0 || pos >= len as isize {
                    return Err(UnitError::IndexOutOfBounds { index, len });
                }
                let sub = array.index_axis(Axis(0), pos as usize);
                match sub.iter().next() {
                    Some(&v) if sub.ndim() == 0 => Ok(Value::Scalar(v)),
                    _ => Ok(Value::Array(sub.to_owned())),
                }
            }
            Selection::Slice { start, stop, step } => {
                let positions = slice_positions(len, start, stop, step)?;
                Ok(Value::Array(array.select(Axis(0), &positions)))
            }
        }
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Scalar(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Scalar(f64::from(value))
    }
}

impl From<Vec<f64>> for Value {
    fn from(values: Vec<f64>) -> Self {
        Value::Array(Array::from(values).into_dyn())
    }
}

impl From<&[f64]> for Value {
    fn from(values: &[f64]) -> Self {
        Value::from(values.to_vec())
    }
}

impl<D: Dimension> From<Array<f64, D>> for Value {
    fn from(array: Array<f64, D>) -> Self {
        Value::Array(array.into_dyn())
    }
}

fn write_array(f: &mut fmt::Formatter<'_>, view: ArrayViewD<'_, f64>) -> fmt::Result {
    if view.ndim() == 0 {
        return match view.iter().next() {
            Some(v) => write!(f, "{:?}", v),
            None => Ok(()),
        };
    }
    write!(f, "[")?;
    for (idx, sub) in view.outer_iter().enumerate() {
        if idx > 0 {
            write!(f, ", ")?;
        }
        write_array(f, sub)?;
    }
    write!(f, "]")
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Scalar(v) => write!(f, "{:?}", v),
            Value::Array(array) => write_array(f, array.view()),
        }
    }
}
