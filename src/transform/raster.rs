// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Rasterization of kd-tree cells and polygons onto regular grids.
//!
//! The target grid spans the bounding box of the source with `ppa` cells
//! per axis; grid points sit at cell centres.

use ndarray::{ArrayD, IxDyn, Slice};
use tracing::debug;

use crate::core::{Result, VinoError};
use crate::kernel::grid::broadcast;
use crate::kernel::polygon::crossings;
use crate::kernel::{BarGrid, GridGeometry, KdTree, Polygon, RegularGrid};
use crate::metadata::schema::POINT_NUMBER_PER_AXIS;

/// Cell-centred geometry over `[min, max]` with `ppa` cells per axis.
fn cell_geometry(min: &[f64], max: &[f64], ppa: &[usize]) -> Result<(GridGeometry, Vec<f64>)> {
    let ppa = broadcast(ppa, min.len(), POINT_NUMBER_PER_AXIS)?;
    if ppa.contains(&0) {
        return Err(VinoError::dimension_mismatch(format!(
            "cells per axis must be positive, got {ppa:?}"
        )));
    }
    let unit: Vec<f64> = (0..min.len())
        .map(|axis| (max[axis] - min[axis]) / ppa[axis] as f64)
        .collect();
    let origin = (0..min.len()).map(|a| min[a] + unit[a] / 2.0).collect();
    let opposite = (0..min.len()).map(|a| max[a] - unit[a] / 2.0).collect();
    Ok((GridGeometry::new(origin, opposite, ppa)?, unit))
}

/// Grid index range `[lo, hi]` covered by `[cmin, cmax]` along one axis.
fn snap(cmin: f64, cmax: f64, min: f64, unit: f64, cells: usize) -> Result<(usize, usize)> {
    let last = cells as i64 - 1;
    if unit == 0.0 || !unit.is_finite() {
        return Ok((0, 0));
    }
    let lo = (((cmin - min) / unit).floor() as i64).clamp(0, last);
    let mut hi = ((((cmax - min) / unit).round()) as i64 - 1).clamp(0, last);
    if hi == lo - 1 && cmin <= cmax {
        hi = lo;
    }
    if lo > hi {
        return Err(VinoError::rasterization(format!(
            "bogus kd-tree rasterization: cell [{cmin}, {cmax}] maps to [{lo}, {hi}]"
        )));
    }
    Ok((lo as usize, hi as usize))
}

impl KdTree {
    /// Paint every cell onto a grid with `ppa` cells per axis.
    pub fn to_regulargrid(&self, ppa: &[usize]) -> Result<RegularGrid> {
        let dim = self.dimension();
        let (min, max) = self.bounds();
        let (geometry, unit) = cell_geometry(&min, &max, ppa)?;

        let mut grid = ArrayD::from_elem(IxDyn(&geometry.ppa), false);
        let mins: Vec<_> = (0..dim).map(|a| self.min_column(a)).collect();
        let maxs: Vec<_> = (0..dim).map(|a| self.max_column(a)).collect();
        for cell in 0..self.len() {
            let ranges = (0..dim)
                .map(|a| snap(mins[a][cell], maxs[a][cell], min[a], unit[a], geometry.ppa[a]))
                .collect::<Result<Vec<_>>>()?;
            grid.slice_each_axis_mut(|ax| {
                let (lo, hi) = ranges[ax.axis.index()];
                Slice::from(lo..hi + 1)
            })
            .fill(true);
        }
        debug!(cells = self.len(), shape = ?geometry.ppa, "rasterized kd-tree");

        RegularGrid::from_parts(grid, geometry, self.metadata().clone())
    }

    pub fn to_bargrid(&self, ppa: &[usize], bar_axis: usize) -> Result<BarGrid> {
        self.to_regulargrid(ppa)?.to_bargrid(bar_axis)
    }
}

impl Polygon {
    /// Fill the polygon onto a grid with `ppa` cells per axis.
    ///
    /// A cell is inside when its centre is. Axis 0 is `x`, axis 1 is `y`.
    pub fn to_regulargrid(&self, ppa: &[usize]) -> Result<RegularGrid> {
        let (min, max) = self.bounds();
        let (geometry, unit) = cell_geometry(&min, &max, ppa)?;
        if unit.iter().any(|u| *u == 0.0 || !u.is_finite()) {
            return Err(VinoError::rasterization(format!(
                "polygon has a degenerate bounding box {min:?} to {max:?}"
            )));
        }

        let scaled: Vec<(f64, f64)> = self
            .points()
            .into_iter()
            .map(|(x, y)| ((x - min[0]) / unit[0], (y - min[1]) / unit[1]))
            .collect();
        let (width, height) = (geometry.ppa[0], geometry.ppa[1]);

        let mut grid = ArrayD::from_elem(IxDyn(&geometry.ppa), false);
        for j in 0..height {
            let mut xs = crossings(&scaled, j as f64 + 0.5);
            xs.sort_by(f64::total_cmp);
            for span in xs.chunks_exact(2) {
                // centres i + 0.5 in [span[0], span[1])
                let first = (span[0] - 0.5).ceil().max(0.0) as usize;
                let end = ((span[1] - 0.5).ceil().max(0.0) as usize).min(width);
                for i in first..end {
                    grid[IxDyn(&[i, j])] = true;
                }
            }
        }

        RegularGrid::from_parts(grid, geometry, self.metadata().clone())
    }

    pub fn to_bargrid(&self, ppa: &[usize], bar_axis: usize) -> Result<BarGrid> {
        self.to_regulargrid(ppa)?.to_bargrid(bar_axis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::RawArray;
    use crate::metadata::schema::{MAXIMAL_VALUES, MINIMAL_VALUES, POINT_SIZE};
    use crate::metadata::Metadata;
    use ndarray::array;

    #[test]
    fn test_snap() {
        assert_eq!(snap(0.0, 1.0, 0.0, 1.0, 4).unwrap(), (0, 0));
        assert_eq!(snap(1.0, 3.0, 0.0, 1.0, 4).unwrap(), (1, 2));
        // thinner than a grid cell still marks its host
        assert_eq!(snap(1.2, 1.4, 0.0, 1.0, 4).unwrap(), (1, 1));
        assert_eq!(snap(3.0, 9.0, 0.0, 1.0, 4).unwrap(), (3, 3));
        assert_eq!(snap(0.0, 1.0, 0.0, 0.0, 1).unwrap(), (0, 0));
        assert!(matches!(
            snap(2.0, 0.5, 0.0, 1.0, 4).unwrap_err(),
            VinoError::Rasterization { .. }
        ));
    }

    #[test]
    fn test_kdtree_to_regulargrid() {
        let data = RawArray::Float(array![
            [0.5, 0.5, 0.0, 1.0, 0.0, 1.0, 0.0],
            [1.5, 1.0, 1.0, 2.0, 0.0, 2.0, 0.0],
        ]);
        let tree = KdTree::from_raw(&data, Metadata::new()).unwrap();
        let g = tree.to_regulargrid(&[2]).unwrap();
        assert_eq!(g.to_array(), array![[0, 0], [1, 0], [1, 1]]);

        let md = g.metadata();
        assert_eq!(md.integer(POINT_SIZE), Some(1));
        assert_eq!(md.integer_list(POINT_NUMBER_PER_AXIS).unwrap(), [1, 1]);
        assert_eq!(md.float_list(MINIMAL_VALUES).unwrap(), [0.5, 0.5]);
        assert_eq!(md.float_list(MAXIMAL_VALUES).unwrap(), [1.5, 1.5]);

        let bars = tree.to_bargrid(&[2], 1).unwrap();
        assert_eq!(bars.len(), 2);
    }

    #[test]
    fn test_polygon_to_regulargrid() {
        // right triangle over [0, 4] x [0, 4], hypotenuse from (4, 0) to (0, 4)
        let data = RawArray::Float(array![[0.0, 0.0], [4.0, 0.0], [0.0, 4.0]]);
        let poly = Polygon::from_raw(&data, Metadata::new()).unwrap();
        let g = poly.to_regulargrid(&[4]).unwrap();
        assert_eq!(g.shape(), [4, 4]);
        let counts: Vec<usize> = (0..4)
            .map(|j| (0..4).filter(|&i| g.grid()[IxDyn(&[i, j])]).count())
            .collect();
        // centres on the hypotenuse fall outside
        assert_eq!(counts, [3, 2, 1, 0]);
        assert_eq!(g.metadata().float_list(MINIMAL_VALUES).unwrap(), [0.5, 0.5]);
    }

    #[test]
    fn test_degenerate_polygon() {
        let data = RawArray::Float(array![[0.0, 1.0], [2.0, 1.0]]);
        let poly = Polygon::from_raw(&data, Metadata::new()).unwrap();
        assert!(matches!(
            poly.to_regulargrid(&[4]).unwrap_err(),
            VinoError::Rasterization { .. }
        ));
    }
}
