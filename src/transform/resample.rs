// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Resampling bar grids onto another grid.
//!
//! A [`ResamplePlan`] is computed from the source geometry alone, then
//! applied to the bars. Applying maps every bar independently, so the only
//! state carried across bars is the final merge sweep.

use tracing::debug;

use super::bars;
use crate::core::{Result, VinoError};
use crate::kernel::grid::broadcast;
use crate::kernel::{Bar, BarGrid, GridGeometry, RegularGrid};
use crate::metadata::schema::POINT_NUMBER_PER_AXIS;

/// Target of a resampling and the index map that reaches it.
///
/// Every source cell maps to the single nearest target cell. Upsampling
/// therefore leaves gaps across bars: a full 3×3 grid resampled to 5
/// points per axis keeps bars only at positions 0, 2 and 4. Bar extents
/// along the bar axis stay contiguous.
#[derive(Debug, Clone, PartialEq)]
pub struct ResamplePlan {
    source: GridGeometry,
    source_bar_axis: usize,
    target: GridGeometry,
    bar_axis: usize,
}

impl ResamplePlan {
    /// Plan the resampling of `source`.
    ///
    /// `ppa` defaults to the source's points per axis and may be given as a
    /// single value for every axis. `bar_axis` defaults to the source's.
    /// With `autocrop`, the target spans the tight bounding box of the
    /// covered cells instead of the declared bounds.
    pub fn new(
        source: &BarGrid,
        ppa: Option<&[usize]>,
        bar_axis: Option<usize>,
        autocrop: bool,
    ) -> Result<Self> {
        let geometry = source.geometry();
        let dim = geometry.dimension();

        let bar_axis = bar_axis.unwrap_or(source.bar_axis());
        if bar_axis >= dim {
            return Err(VinoError::dimension_mismatch(format!(
                "bar axis {bar_axis} out of range for dimension {dim}"
            )));
        }

        let ppa = match ppa {
            Some(ppa) => broadcast(ppa, dim, POINT_NUMBER_PER_AXIS)?,
            None => geometry.ppa.clone(),
        };
        if ppa.contains(&0) {
            return Err(VinoError::dimension_mismatch(format!(
                "points per axis must be positive, got {ppa:?}"
            )));
        }

        let (origin, opposite) = match autocrop.then(|| index_extent(source)).flatten() {
            Some((low, high)) => (
                low.iter()
                    .enumerate()
                    .map(|(axis, &i)| geometry.coordinate(axis, i as f64))
                    .collect(),
                high.iter()
                    .enumerate()
                    .map(|(axis, &i)| geometry.coordinate(axis, i as f64))
                    .collect(),
            ),
            None => (geometry.origin.clone(), geometry.opposite.clone()),
        };

        let target = GridGeometry::new(origin, opposite, ppa)?;
        debug!(
            from = ?geometry.ppa,
            to = ?target.ppa,
            bar_axis,
            autocrop,
            "planned resampling"
        );

        Ok(Self {
            source: geometry.clone(),
            source_bar_axis: source.bar_axis(),
            target,
            bar_axis,
        })
    }

    pub fn target(&self) -> &GridGeometry {
        &self.target
    }

    pub fn bar_axis(&self) -> usize {
        self.bar_axis
    }

    /// Map a source index along `axis` to the nearest target index.
    pub fn map_index(&self, axis: usize, index: usize) -> usize {
        let world = self.source.coordinate(axis, index as f64);
        let unit = self.target.unit_along(axis);
        let last = self.target.ppa[axis] - 1;
        if unit == 0.0 || !unit.is_finite() {
            return 0;
        }
        let mapped = ((world - self.target.origin[axis]) / unit).round();
        if mapped <= 0.0 {
            0
        } else {
            (mapped as usize).min(last)
        }
    }

    fn map_bar(&self, bar: &Bar) -> Bar {
        let axes = (0..self.target.dimension()).filter(|&a| a != self.bar_axis);
        let position = axes
            .zip(&bar.position)
            .map(|(axis, &p)| self.map_index(axis, p))
            .collect();
        Bar::new(
            position,
            self.map_index(self.bar_axis, bar.lower),
            self.map_index(self.bar_axis, bar.upper),
        )
    }

    /// Apply the plan to the grid it was computed from.
    pub fn apply(&self, source: &BarGrid) -> Result<BarGrid> {
        if source.geometry() != &self.source || source.bar_axis() != self.source_bar_axis {
            return Err(VinoError::dimension_mismatch(
                "resample plan applied to a different bar grid",
            ));
        }

        let exploded;
        let source_bars: &[Bar] = if self.bar_axis == self.source_bar_axis {
            source.bars()
        } else {
            let grid = bars::paint(source.bars(), &self.source.ppa, self.source_bar_axis)?;
            exploded = bars::encode(grid.view(), self.bar_axis);
            &exploded
        };

        let mapped = source_bars.iter().map(|bar| self.map_bar(bar)).collect();
        BarGrid::new(
            mapped,
            self.bar_axis,
            self.target.clone(),
            source.metadata().clone(),
        )
    }
}

/// Smallest and largest covered index along every axis, `None` when empty.
fn index_extent(grid: &BarGrid) -> Option<(Vec<usize>, Vec<usize>)> {
    let dim = grid.dimension();
    let bar_axis = grid.bar_axis();
    let mut low = vec![usize::MAX; dim];
    let mut high = vec![0; dim];
    for bar in grid.bars() {
        for (axis, &p) in (0..dim).filter(|&a| a != bar_axis).zip(&bar.position) {
            low[axis] = low[axis].min(p);
            high[axis] = high[axis].max(p);
        }
        low[bar_axis] = low[bar_axis].min(bar.lower);
        high[bar_axis] = high[bar_axis].max(bar.upper);
    }
    (!grid.is_empty()).then_some((low, high))
}

impl BarGrid {
    /// Resample onto a grid with `ppa` points per axis along `bar_axis`.
    pub fn resample(
        &self,
        ppa: Option<&[usize]>,
        bar_axis: Option<usize>,
        autocrop: bool,
    ) -> Result<BarGrid> {
        ResamplePlan::new(self, ppa, bar_axis, autocrop)?.apply(self)
    }
}

impl RegularGrid {
    /// Resample onto a grid with `ppa` points per axis.
    pub fn resample(&self, ppa: Option<&[usize]>, autocrop: bool) -> Result<RegularGrid> {
        let bar_axis = self.dimension().saturating_sub(1);
        self.to_bargrid(bar_axis)?
            .resample(ppa, None, autocrop)?
            .to_regulargrid()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::schema::{MAXIMAL_VALUES, MINIMAL_VALUES, POINT_SIZE};
    use crate::metadata::Metadata;

    fn geometry() -> GridGeometry {
        GridGeometry::new(vec![0.0, 0.0], vec![4.0, 4.0], vec![5, 5]).unwrap()
    }

    fn bar_grid(bars: Vec<Bar>, bar_axis: usize) -> BarGrid {
        BarGrid::new(bars, bar_axis, geometry(), Metadata::new()).unwrap()
    }

    fn assert_disjoint(grid: &BarGrid) {
        for pair in grid.bars().windows(2) {
            if pair[0].position == pair[1].position {
                assert!(pair[0].upper + 1 < pair[1].lower, "{pair:?}");
            }
        }
    }

    #[test]
    fn test_same_parameters_is_identity() {
        let g = bar_grid(
            vec![Bar::new(vec![0], 1, 3), Bar::new(vec![2], 0, 0), Bar::new(vec![2], 2, 4)],
            1,
        );
        let same = g.resample(None, None, false).unwrap();
        assert_eq!(same, g);
        assert_eq!(same.resample(None, None, false).unwrap(), same);
    }

    #[test]
    fn test_downsample_merges() {
        let g = bar_grid(
            vec![Bar::new(vec![0], 0, 1), Bar::new(vec![0], 3, 4), Bar::new(vec![1], 0, 0)],
            1,
        );
        let half = g.resample(Some(&[3]), None, false).unwrap();
        assert_eq!(half.geometry().ppa, [3, 3]);
        // halves round away from zero: 1 -> 1, 3 -> 2
        assert_eq!(
            half.bars(),
            [Bar::new(vec![0], 0, 2), Bar::new(vec![1], 0, 0)]
        );
        assert_disjoint(&half);
        assert_eq!(half.metadata().integer_list(POINT_NUMBER_PER_AXIS).unwrap(), [2, 2]);
    }

    #[test]
    fn test_upsample_leaves_gaps_across_bars() {
        let coarse = GridGeometry::new(vec![0.0, 0.0], vec![4.0, 4.0], vec![3, 3]).unwrap();
        let full = (0..3).map(|p| Bar::new(vec![p], 0, 2)).collect();
        let g = BarGrid::new(full, 1, coarse, Metadata::new()).unwrap();
        let fine = g.resample(Some(&[5]), None, false).unwrap();
        assert_eq!(fine.geometry().ppa, [5, 5]);
        assert_eq!(
            fine.bars(),
            [
                Bar::new(vec![0], 0, 4),
                Bar::new(vec![2], 0, 4),
                Bar::new(vec![4], 0, 4),
            ]
        );
    }

    #[test]
    fn test_change_bar_axis() {
        let g = bar_grid(vec![Bar::new(vec![0], 0, 2), Bar::new(vec![1], 1, 1)], 1);
        let turned = g.resample(None, Some(0), false).unwrap();
        assert_eq!(turned.bar_axis(), 0);
        assert_eq!(
            turned.bars(),
            [
                Bar::new(vec![0], 0, 0),
                Bar::new(vec![1], 0, 1),
                Bar::new(vec![2], 0, 0),
            ]
        );
        assert_eq!(
            turned.to_regulargrid().unwrap().grid(),
            g.to_regulargrid().unwrap().grid()
        );
    }

    #[test]
    fn test_autocrop() {
        let g = bar_grid(vec![Bar::new(vec![1], 2, 3), Bar::new(vec![3], 2, 2)], 1);
        let cropped = g.resample(None, None, true).unwrap();
        let target = cropped.geometry();
        assert_eq!(target.origin, [1.0, 2.0]);
        assert_eq!(target.opposite, [3.0, 3.0]);
        assert_eq!(target.ppa, [5, 5]);
        assert_disjoint(&cropped);
        let again = cropped.resample(None, None, true).unwrap();
        assert_eq!(again.geometry(), cropped.geometry());
        assert_eq!(again.bars(), cropped.bars());
    }

    #[test]
    fn test_autocrop_empty_keeps_bounds() {
        let g = bar_grid(Vec::new(), 0);
        let plan = ResamplePlan::new(&g, Some(&[3]), None, true).unwrap();
        assert_eq!(plan.target().origin, [0.0, 0.0]);
        assert_eq!(plan.target().opposite, [4.0, 4.0]);
    }

    #[test]
    fn test_plan_errors() {
        let g = bar_grid(Vec::new(), 0);
        assert!(ResamplePlan::new(&g, Some(&[0]), None, false).is_err());
        assert!(ResamplePlan::new(&g, None, Some(2), false).is_err());
        let other = bar_grid(Vec::new(), 1);
        let plan = ResamplePlan::new(&g, None, None, false).unwrap();
        assert!(plan.apply(&other).is_err());
    }

    #[test]
    fn test_regulargrid_resample() {
        let md = Metadata::new()
            .with(MINIMAL_VALUES, vec![0.0, 0.0])
            .with(MAXIMAL_VALUES, vec![4.0, 4.0])
            .with(POINT_NUMBER_PER_AXIS, vec![4i64])
            .with(POINT_SIZE, 1i64);
        let data = crate::core::RawArray::Integer(ndarray::array![[0, 0], [4, 4]]);
        let g = RegularGrid::from_raw(&data, md).unwrap();
        let small = g.resample(Some(&[3]), false).unwrap();
        assert_eq!(small.shape(), [3, 3]);
        assert_eq!(small.to_array(), ndarray::array![[0, 0], [2, 2]]);
    }
}
