// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Kd-tree cell lists.
//!
//! Each row describes one leaf cell of the tree: `N` sample coordinates,
//! then `N` interleaved `(min, max)` bound pairs, then a control value,
//! `3N + 1` columns in total. Cells may overlap.

use std::cmp::Ordering;

use ndarray::{s, Array2, ArrayView1, ArrayView2, Axis};

use super::grid::axis_labels;
use super::Dataformat;
use crate::core::{RawArray, Result, VinoError};
use crate::metadata::schema::{DATAFORMAT_COLUMNS, DATAFORMAT_NAME};
use crate::metadata::Metadata;

/// List of kd-tree cells, sorted by their lower bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct KdTree {
    cells: Array2<f64>,
    metadata: Metadata,
}

/// Canonical column labels for a `dim`-dimensional tree.
pub fn kdtree_labels(dim: usize) -> Vec<String> {
    let names = axis_labels(dim);
    let mut labels = names.clone();
    for name in &names {
        labels.push(format!("{name}min"));
        labels.push(format!("{name}max"));
    }
    labels.push("control".to_string());
    labels
}

fn compare_lower_bounds(a: &ArrayView1<'_, f64>, b: &ArrayView1<'_, f64>, dim: usize) -> Ordering {
    (0..dim)
        .map(|i| a[dim + 2 * i].total_cmp(&b[dim + 2 * i]))
        .find(|o| o.is_ne())
        .unwrap_or(Ordering::Equal)
}

impl KdTree {
    /// Build a tree from a `3N + 1` column chunk.
    pub fn from_raw(data: &RawArray, mut metadata: Metadata) -> Result<Self> {
        let ncols = data.ncols();
        if ncols < 4 || (ncols - 1) % 3 != 0 {
            return Err(VinoError::dimension_mismatch(format!(
                "kd-tree cells need 3N+1 columns, got {ncols}"
            )));
        }
        let dim = (ncols - 1) / 3;

        let raw = data.to_float();
        let mut rows: Vec<ArrayView1<'_, f64>> = raw.rows().into_iter().collect();
        rows.sort_by(|a, b| compare_lower_bounds(a, b, dim));
        let mut cells = Array2::zeros((rows.len(), ncols));
        for (mut target, source) in cells.rows_mut().into_iter().zip(&rows) {
            target.assign(source);
        }

        metadata.insert(DATAFORMAT_NAME, Dataformat::KdTree.name());
        if metadata.string_list(DATAFORMAT_COLUMNS).map(<[String]>::len) != Some(ncols) {
            metadata.insert(DATAFORMAT_COLUMNS, kdtree_labels(dim));
        }

        Ok(Self { cells, metadata })
    }

    pub fn cells(&self) -> &Array2<f64> {
        &self.cells
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn dimension(&self) -> usize {
        (self.cells.ncols() - 1) / 3
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.cells.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.nrows() == 0
    }

    pub fn columns(&self) -> Vec<String> {
        self.metadata
            .string_list(DATAFORMAT_COLUMNS)
            .map(<[String]>::to_vec)
            .unwrap_or_else(|| kdtree_labels(self.dimension()))
    }

    /// Lower bound of every cell along `axis`.
    pub fn min_column(&self, axis: usize) -> ArrayView1<'_, f64> {
        self.cells.column(self.dimension() + 2 * axis)
    }

    /// Upper bound of every cell along `axis`.
    pub fn max_column(&self, axis: usize) -> ArrayView1<'_, f64> {
        self.cells.column(self.dimension() + 2 * axis + 1)
    }

    /// Smallest lower bound and largest upper bound per axis.
    pub fn bounds(&self) -> (Vec<f64>, Vec<f64>) {
        (0..self.dimension())
            .map(|axis| {
                let min = self.min_column(axis).fold(f64::INFINITY, |m, &v| m.min(v));
                let max = self.max_column(axis).fold(f64::NEG_INFINITY, |m, &v| m.max(v));
                (min, max)
            })
            .unzip()
    }

    /// Sample point of every cell.
    pub fn point_coordinates(&self) -> Array2<f64> {
        self.cells.slice(s![.., ..self.dimension()]).to_owned()
    }

    /// Whether any cell contains `point`, bounds included.
    pub fn contains(&self, point: &[f64]) -> Result<bool> {
        let dim = self.dimension();
        if point.len() != dim {
            return Err(VinoError::dimension_mismatch(format!(
                "point has {} coordinates, kernel has {dim} axes",
                point.len()
            )));
        }
        Ok(self.cells.axis_iter(Axis(0)).any(|cell| {
            point
                .iter()
                .enumerate()
                .all(|(i, &x)| cell[dim + 2 * i] <= x && x <= cell[dim + 2 * i + 1])
        }))
    }

    /// Cell extents as `(x0, y0, x1, y1)` rows.
    pub(crate) fn rectangles(&self) -> Array2<f64> {
        let bounds: ArrayView2<'_, f64> = self.cells.slice(s![.., 2..6]);
        // (xmin, xmax, ymin, ymax) -> (xmin, ymin, xmax, ymax)
        bounds.select(Axis(1), &[0, 2, 1, 3])
    }
}
