// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Regular grid geometry shared by grids and bar grids.

use serde::Serialize;

use crate::core::{Result, VinoError};
use crate::metadata::schema::{MAXIMAL_VALUES, MINIMAL_VALUES, POINT_NUMBER_PER_AXIS, POINT_SIZE};
use crate::metadata::Metadata;

/// Placement of a grid in state space.
///
/// `ppa[i]` is the number of grid points along axis `i`. Point 0 sits at
/// `origin[i]` and point `ppa[i] - 1` at `opposite[i]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridGeometry {
    pub origin: Vec<f64>,
    pub opposite: Vec<f64>,
    pub ppa: Vec<usize>,
}

impl GridGeometry {
    /// Build a geometry, checking that all vectors agree.
    pub fn new(origin: Vec<f64>, opposite: Vec<f64>, ppa: Vec<usize>) -> Result<Self> {
        if origin.len() != opposite.len() || origin.len() != ppa.len() {
            return Err(VinoError::dimension_mismatch(format!(
                "origin, opposite and points per axis have lengths {}, {} and {}",
                origin.len(),
                opposite.len(),
                ppa.len()
            )));
        }
        Ok(Self {
            origin,
            opposite,
            ppa,
        })
    }

    /// Read the geometry fields of a metadata record.
    ///
    /// Shape per axis is `PointNumberPerAxis / PointSize + 1`. A single
    /// `PointNumberPerAxis` value applies to every axis.
    pub fn from_metadata(metadata: &Metadata) -> Result<Self> {
        let origin = metadata
            .float_list(MINIMAL_VALUES)
            .ok_or_else(|| VinoError::missing_metadata(MINIMAL_VALUES))?;
        let opposite = metadata
            .float_list(MAXIMAL_VALUES)
            .ok_or_else(|| VinoError::missing_metadata(MAXIMAL_VALUES))?;
        let intervals = metadata
            .integer_list(POINT_NUMBER_PER_AXIS)
            .ok_or_else(|| VinoError::missing_metadata(POINT_NUMBER_PER_AXIS))?;
        let point_size = metadata
            .integer(POINT_SIZE)
            .ok_or_else(|| VinoError::missing_metadata(POINT_SIZE))?;

        if point_size <= 0 {
            return Err(VinoError::dimension_mismatch(format!(
                "{POINT_SIZE} must be positive, got {point_size}"
            )));
        }

        let intervals = broadcast(intervals, origin.len(), POINT_NUMBER_PER_AXIS)?;
        let ppa = intervals
            .into_iter()
            .map(|n| {
                if n < 0 {
                    Err(VinoError::dimension_mismatch(format!(
                        "{POINT_NUMBER_PER_AXIS} must not be negative, got {n}"
                    )))
                } else {
                    Ok((n / point_size) as usize + 1)
                }
            })
            .collect::<Result<Vec<_>>>()?;

        Self::new(origin, opposite, ppa)
    }

    /// Write the geometry fields into a metadata record, with `PointSize = 1`.
    pub fn write_metadata(&self, metadata: &mut Metadata) {
        metadata.insert(MINIMAL_VALUES, self.origin.clone());
        metadata.insert(MAXIMAL_VALUES, self.opposite.clone());
        metadata.insert(
            POINT_NUMBER_PER_AXIS,
            self.ppa
                .iter()
                .map(|&n| n.saturating_sub(1) as i64)
                .collect::<Vec<_>>(),
        );
        metadata.insert(POINT_SIZE, 1i64);
    }

    pub fn dimension(&self) -> usize {
        self.ppa.len()
    }

    /// Distance between neighbouring points along each axis.
    pub fn unit(&self) -> Vec<f64> {
        (0..self.dimension()).map(|i| self.unit_along(i)).collect()
    }

    /// World coordinate of grid index `index` along `axis`.
    pub fn coordinate(&self, axis: usize, index: f64) -> f64 {
        self.origin[axis] + index * self.unit_along(axis)
    }

    pub fn unit_along(&self, axis: usize) -> f64 {
        (self.opposite[axis] - self.origin[axis]) / self.ppa[axis].saturating_sub(1).max(1) as f64
    }

    /// Index of the grid point nearest to `point`, if it falls in the grid.
    ///
    /// A point is in the grid when it is within half a cell of a grid point.
    pub fn nearest_index(&self, point: &[f64]) -> Option<Vec<usize>> {
        point
            .iter()
            .enumerate()
            .map(|(axis, &x)| {
                let unit = self.unit_along(axis);
                let raw = if unit == 0.0 {
                    (x == self.origin[axis]).then_some(0.0)?
                } else {
                    ((x - self.origin[axis]) / unit).round()
                };
                (raw >= 0.0 && raw < self.ppa[axis] as f64).then_some(raw as usize)
            })
            .collect()
    }

    /// Total number of grid points.
    pub fn len(&self) -> usize {
        self.ppa.iter().product()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Expand a per-axis vector given with a single value.
pub(crate) fn broadcast<T: Copy>(values: &[T], dim: usize, field: &str) -> Result<Vec<T>> {
    match values {
        [single] => Ok(vec![*single; dim]),
        values if values.len() == dim => Ok(values.to_vec()),
        values => Err(VinoError::dimension_mismatch(format!(
            "{field} has {} values for {dim} axes",
            values.len()
        ))),
    }
}

/// Default labels `x1..xN`.
pub fn axis_labels(dim: usize) -> Vec<String> {
    (1..=dim).map(|i| format!("x{i}")).collect()
}
