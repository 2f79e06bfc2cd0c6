// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Two-dimensional sections of regular grids.

use ndarray::{Array1, Array2, Axis, Ix2};

use crate::core::{Result, VinoError};
use crate::kernel::RegularGrid;

impl<T: Clone> RegularGrid<T> {
    /// Slice the grid on the plane spanned by `plane`.
    ///
    /// `at` gives the index of every other axis, in increasing axis order.
    /// Rows of the result follow `plane.0`, columns `plane.1`.
    pub fn section(&self, plane: (usize, usize), at: &[usize]) -> Result<Array2<T>> {
        self.check_plane(plane)?;
        let dim = self.dimension();
        let fixed: Vec<usize> = (0..dim).filter(|&a| a != plane.0 && a != plane.1).collect();
        if fixed.len() != at.len() {
            return Err(VinoError::dimension_mismatch(format!(
                "section of a {dim}-D grid needs {} fixed indices, got {}",
                fixed.len(),
                at.len()
            )));
        }

        let mut view = self.grid().view();
        for (&axis, &index) in fixed.iter().zip(at).rev() {
            if index >= self.shape()[axis] {
                return Err(VinoError::dimension_mismatch(format!(
                    "index {index} outside axis {axis} of size {}",
                    self.shape()[axis]
                )));
            }
            view = view.index_axis_move(Axis(axis), index);
        }
        let plane_view = view
            .into_dimensionality::<Ix2>()
            .map_err(|e| VinoError::dimension_mismatch(e.to_string()))?;

        Ok(if plane.0 < plane.1 {
            plane_view.to_owned()
        } else {
            plane_view.reversed_axes().to_owned()
        })
    }

    /// World coordinates of the grid points along both plane axes.
    pub fn grid_coordinates(&self, plane: (usize, usize)) -> Result<(Array1<f64>, Array1<f64>)> {
        self.check_plane(plane)?;
        let geometry = self.geometry();
        let along = |axis: usize| {
            (0..geometry.ppa[axis])
                .map(|i| geometry.coordinate(axis, i as f64))
                .collect::<Array1<f64>>()
        };
        Ok((along(plane.0), along(plane.1)))
    }

    fn check_plane(&self, (a, b): (usize, usize)) -> Result<()> {
        let dim = self.dimension();
        if a == b || a >= dim || b >= dim {
            return Err(VinoError::dimension_mismatch(format!(
                "invalid section plane ({a}, {b}) for a {dim}-D grid"
            )));
        }
        Ok(())
    }
}
