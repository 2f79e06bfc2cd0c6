// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Raw numeric chunks.
//!
//! Parsers produce 2-D row-major tables. The legacy block format yields
//! integers, the table formats yield floats. Stacking chunks of both kinds
//! promotes the result to float.

use ndarray::{concatenate, Array2, ArrayView2, Axis};

use super::error::{Result, VinoError};

/// A 2-D rows × columns numeric table.
#[derive(Debug, Clone, PartialEq)]
pub enum RawArray {
    Integer(Array2<i64>),
    Float(Array2<f64>),
}

impl RawArray {
    pub fn nrows(&self) -> usize {
        match self {
            RawArray::Integer(a) => a.nrows(),
            RawArray::Float(a) => a.nrows(),
        }
    }

    pub fn ncols(&self) -> usize {
        match self {
            RawArray::Integer(a) => a.ncols(),
            RawArray::Float(a) => a.ncols(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nrows() == 0
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, RawArray::Integer(_))
    }

    /// Float copy of the table.
    pub fn to_float(&self) -> Array2<f64> {
        match self {
            RawArray::Integer(a) => a.mapv(|v| v as f64),
            RawArray::Float(a) => a.clone(),
        }
    }

    /// Integer copy of the table.
    ///
    /// Float values must be integral.
    pub fn to_integer(&self) -> Result<Array2<i64>> {
        match self {
            RawArray::Integer(a) => Ok(a.clone()),
            RawArray::Float(a) => {
                if let Some(bad) = a.iter().find(|v| !v.is_finite() || v.fract() != 0.0) {
                    return Err(VinoError::malformed(format!(
                        "expected integer values, found {bad}"
                    )));
                }
                Ok(a.mapv(|v| v as i64))
            }
        }
    }

    /// Keep only the given columns, in the given order.
    pub fn select_columns(&self, columns: &[usize]) -> Result<RawArray> {
        let ncols = self.ncols();
        if let Some(&bad) = columns.iter().find(|&&c| c >= ncols) {
            return Err(VinoError::dimension_mismatch(format!(
                "column {bad} out of range for a {ncols}-column table"
            )));
        }
        Ok(match self {
            RawArray::Integer(a) => RawArray::Integer(a.select(Axis(1), columns)),
            RawArray::Float(a) => RawArray::Float(a.select(Axis(1), columns)),
        })
    }

    /// Stack chunks vertically, in order.
    ///
    /// Fails with [`VinoError::NoData`] when there are no chunks and with
    /// [`VinoError::Concatenation`] when column counts disagree.
    pub fn concat(chunks: Vec<RawArray>) -> Result<RawArray> {
        let mut chunks = chunks.into_iter().peekable();
        let first = chunks.next().ok_or(VinoError::NoData)?;
        if chunks.peek().is_none() {
            return Ok(first);
        }

        let rest: Vec<RawArray> = chunks.collect();
        if let Some(other) = rest.iter().find(|c| c.ncols() != first.ncols()) {
            return Err(VinoError::concatenation(format!(
                "column count {} does not match {}",
                other.ncols(),
                first.ncols()
            )));
        }

        let all_integer = first.is_integer() && rest.iter().all(RawArray::is_integer);
        let stack_err = |e: ndarray::ShapeError| VinoError::concatenation(e.to_string());

        if all_integer {
            let arrays: Vec<&Array2<i64>> = std::iter::once(&first)
                .chain(rest.iter())
                .filter_map(|c| match c {
                    RawArray::Integer(a) => Some(a),
                    RawArray::Float(_) => None,
                })
                .collect();
            let views: Vec<ArrayView2<'_, i64>> = arrays.iter().map(|a| a.view()).collect();
            concatenate(Axis(0), &views)
                .map(RawArray::Integer)
                .map_err(stack_err)
        } else {
            let arrays: Vec<Array2<f64>> = std::iter::once(&first)
                .chain(rest.iter())
                .map(RawArray::to_float)
                .collect();
            let views: Vec<ArrayView2<'_, f64>> = arrays.iter().map(|a| a.view()).collect();
            concatenate(Axis(0), &views)
                .map(RawArray::Float)
                .map_err(stack_err)
        }
    }
}

impl From<Array2<i64>> for RawArray {
    fn from(a: Array2<i64>) -> Self {
        RawArray::Integer(a)
    }
}

impl From<Array2<f64>> for RawArray {
    fn from(a: Array2<f64>) -> Self {
        RawArray::Float(a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_concat_integer_chunks() {
        let a = RawArray::Integer(array![[1, 2], [3, 4]]);
        let b = RawArray::Integer(array![[5, 6]]);
        let out = RawArray::concat(vec![a, b]).unwrap();
        assert_eq!(out, RawArray::Integer(array![[1, 2], [3, 4], [5, 6]]));
    }

    #[test]
    fn test_concat_promotes_to_float() {
        let a = RawArray::Integer(array![[1, 2]]);
        let b = RawArray::Float(array![[0.5, 1.5]]);
        let out = RawArray::concat(vec![a, b]).unwrap();
        assert_eq!(out, RawArray::Float(array![[1.0, 2.0], [0.5, 1.5]]));
    }

    #[test]
    fn test_concat_errors() {
        assert!(matches!(
            RawArray::concat(Vec::new()).unwrap_err(),
            VinoError::NoData
        ));
        let a = RawArray::Integer(array![[1, 2]]);
        let b = RawArray::Integer(array![[1, 2, 3]]);
        assert!(matches!(
            RawArray::concat(vec![a, b]).unwrap_err(),
            VinoError::Concatenation { .. }
        ));
    }

    #[test]
    fn test_to_integer_rejects_fractions() {
        let a = RawArray::Float(array![[1.0, 2.0]]);
        assert_eq!(a.to_integer().unwrap(), array![[1, 2]]);
        let b = RawArray::Float(array![[1.5]]);
        assert!(b.to_integer().is_err());
    }

    #[test]
    fn test_select_columns() {
        let a = RawArray::Integer(array![[1, 2, 3], [4, 5, 6]]);
        assert_eq!(
            a.select_columns(&[2, 0]).unwrap(),
            RawArray::Integer(array![[3, 1], [6, 4]])
        );
        assert!(a.select_columns(&[3]).is_err());
    }
}
