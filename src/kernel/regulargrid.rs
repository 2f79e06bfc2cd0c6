// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Dense N-dimensional grids.

use ndarray::{Array2, ArrayD, Dimension, IxDyn};

use super::bargrid::BarGrid;
use super::grid::{axis_labels, GridGeometry};
use super::Dataformat;
use crate::core::{RawArray, Result, VinoError};
use crate::metadata::schema::{DATAFORMAT_COLUMNS, DATAFORMAT_NAME, POINT_SIZE};
use crate::metadata::Metadata;
use crate::transform::bars;

/// A grid of cells over a [`GridGeometry`].
///
/// With `T = bool` a cell is `true` when it is inside the kernel. Distance
/// transforms produce `RegularGrid<f64>` over the same geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct RegularGrid<T = bool> {
    grid: ArrayD<T>,
    geometry: GridGeometry,
    metadata: Metadata,
}

impl<T> RegularGrid<T> {
    /// Assemble a grid whose shape matches the geometry.
    ///
    /// The geometry, `dataformat.name` and (if unset or of the wrong
    /// length) `dataformat.columns` are written into the metadata.
    pub fn from_parts(grid: ArrayD<T>, geometry: GridGeometry, mut metadata: Metadata) -> Result<Self> {
        if grid.shape() != geometry.ppa.as_slice() {
            return Err(VinoError::dimension_mismatch(format!(
                "grid shape {:?} does not match points per axis {:?}",
                grid.shape(),
                geometry.ppa
            )));
        }

        geometry.write_metadata(&mut metadata);
        metadata.insert(DATAFORMAT_NAME, Dataformat::RegularGrid.name());
        let dim = geometry.dimension();
        if metadata.string_list(DATAFORMAT_COLUMNS).map(<[String]>::len) != Some(dim) {
            metadata.insert(DATAFORMAT_COLUMNS, axis_labels(dim));
        }

        Ok(Self {
            grid,
            geometry,
            metadata,
        })
    }

    pub fn grid(&self) -> &ArrayD<T> {
        &self.grid
    }

    pub fn geometry(&self) -> &GridGeometry {
        &self.geometry
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn dimension(&self) -> usize {
        self.grid.ndim()
    }

    pub fn shape(&self) -> &[usize] {
        self.grid.shape()
    }

    /// Column labels of the index rows.
    pub fn columns(&self) -> Vec<String> {
        self.metadata
            .string_list(DATAFORMAT_COLUMNS)
            .map(<[String]>::to_vec)
            .unwrap_or_else(|| axis_labels(self.dimension()))
    }
}

impl RegularGrid<bool> {
    /// Build a grid from a dense array, reading the geometry from metadata.
    pub fn new(grid: ArrayD<bool>, metadata: Metadata) -> Result<Self> {
        let geometry = GridGeometry::from_metadata(&metadata)?;
        Self::from_parts(grid, geometry, metadata)
    }

    /// Build a grid from rows of inside-cell indices.
    ///
    /// Indices are in units of `PointSize`, like bar coordinates.
    pub fn from_raw(data: &RawArray, metadata: Metadata) -> Result<Self> {
        let geometry = GridGeometry::from_metadata(&metadata)?;
        let point_size = metadata
            .integer(POINT_SIZE)
            .ok_or_else(|| VinoError::missing_metadata(POINT_SIZE))?;
        let dim = geometry.dimension();

        if data.ncols() != dim && !data.is_empty() {
            return Err(VinoError::dimension_mismatch(format!(
                "index rows have {} columns for {dim} axes",
                data.ncols()
            )));
        }

        let mut grid = ArrayD::from_elem(IxDyn(&geometry.ppa), false);
        for row in data.to_integer()?.rows() {
            let index = row
                .iter()
                .zip(&geometry.ppa)
                .map(|(&v, &n)| {
                    usize::try_from(v.div_euclid(point_size))
                        .ok()
                        .filter(|&i| i < n)
                })
                .collect::<Option<Vec<_>>>()
                .ok_or_else(|| {
                    VinoError::dimension_mismatch(format!(
                        "index {row} outside grid {:?}",
                        geometry.ppa
                    ))
                })?;
            grid[IxDyn(&index)] = true;
        }

        Self::from_parts(grid, geometry, metadata)
    }

    /// Number of inside cells.
    pub fn len(&self) -> usize {
        self.grid.iter().filter(|&&c| c).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Row-major indices of the inside cells.
    pub fn to_array(&self) -> Array2<i64> {
        let cells: Vec<IxDyn> = self
            .grid
            .indexed_iter()
            .filter(|(_, &inside)| inside)
            .map(|(index, _)| index)
            .collect();
        let mut out = Array2::zeros((cells.len(), self.dimension()));
        for (mut row, index) in out.rows_mut().into_iter().zip(&cells) {
            for (slot, &i) in row.iter_mut().zip(index.slice()) {
                *slot = i as i64;
            }
        }
        out
    }

    /// World coordinates of the inside cells, row-major.
    pub fn point_coordinates(&self) -> Array2<f64> {
        let mut points = self.to_array().mapv(|i| i as f64);
        for (axis, mut column) in points.columns_mut().into_iter().enumerate() {
            column.mapv_inplace(|i| self.geometry.coordinate(axis, i));
        }
        points
    }

    /// Run-length encode along `bar_axis`.
    pub fn to_bargrid(&self, bar_axis: usize) -> Result<BarGrid> {
        if bar_axis >= self.dimension() {
            return Err(VinoError::dimension_mismatch(format!(
                "bar axis {bar_axis} out of range for dimension {}",
                self.dimension()
            )));
        }
        let bars = bars::encode(self.grid.view(), bar_axis);
        BarGrid::new(bars, bar_axis, self.geometry.clone(), self.metadata.clone())
    }

    /// Whether the grid cell nearest to `point` is inside.
    pub fn contains(&self, point: &[f64]) -> Result<bool> {
        if point.len() != self.dimension() {
            return Err(VinoError::dimension_mismatch(format!(
                "point has {} coordinates, kernel has {} axes",
                point.len(),
                self.dimension()
            )));
        }
        Ok(self
            .geometry
            .nearest_index(point)
            .map(|index| self.grid[IxDyn(&index)])
            .unwrap_or(false))
    }
}
