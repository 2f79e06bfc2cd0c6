// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Bar grids: run-length encoded regular grids.
//!
//! A bar is a run of inside cells along one axis, the *bar axis*, at a
//! fixed position on every other axis. Bars at the same position never
//! overlap or touch; construction merges them.

use std::sync::OnceLock;

use ndarray::Array2;
use regex::Regex;
use serde::Serialize;

use super::grid::{axis_labels, GridGeometry};
use super::regulargrid::RegularGrid;
use crate::core::{RawArray, Result, VinoError};
use crate::io::formats::psp::EMPTY_COLUMN;
use crate::metadata::schema::{
    COLUMN_DESCRIPTION, DATAFORMAT_BARAXIS, DATAFORMAT_COLUMNS, DATAFORMAT_NAME, POINT_SIZE,
};
use crate::metadata::Metadata;
use crate::transform::bars;

/// Inclusive run of cells along the bar axis.
///
/// Ordering is by position, then lower bound.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Bar {
    /// Indices along every axis except the bar axis, in increasing axis order
    pub position: Vec<usize>,
    pub lower: usize,
    pub upper: usize,
}

impl Bar {
    pub fn new(position: Vec<usize>, lower: usize, upper: usize) -> Self {
        Self {
            position,
            lower,
            upper,
        }
    }

    /// Number of cells covered.
    pub fn len(&self) -> usize {
        self.upper + 1 - self.lower
    }

    pub fn is_empty(&self) -> bool {
        self.upper < self.lower
    }
}

/// Set of bars on a regular grid.
#[derive(Debug, Clone, PartialEq)]
pub struct BarGrid {
    bars: Vec<Bar>,
    bar_axis: usize,
    geometry: GridGeometry,
    metadata: Metadata,
}

fn digits() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\d+").expect("valid digit pattern"))
}

/// Axis described by a column label: its first digit run, minus one.
fn label_axis(label: &str) -> Result<usize> {
    digits()
        .find(label)
        .and_then(|m| m.as_str().parse::<usize>().ok())
        .and_then(|n| n.checked_sub(1))
        .ok_or_else(|| {
            VinoError::dimension_mismatch(format!("can't infer an axis from column label {label:?}"))
        })
}

/// Canonical column labels: positions in axis order, then the bar bounds.
pub fn bar_labels(dim: usize, bar_axis: usize) -> Vec<String> {
    let names = axis_labels(dim);
    let mut labels: Vec<String> = names
        .iter()
        .enumerate()
        .filter(|&(axis, _)| axis != bar_axis)
        .map(|(_, name)| name.clone())
        .collect();
    labels.push(names[bar_axis].clone());
    labels.push(names[bar_axis].clone());
    labels
}

impl BarGrid {
    /// Build a bar grid from bars already in grid indices.
    ///
    /// Bars are merged and checked against the geometry. The metadata is
    /// normalized to describe the result.
    pub fn new(
        bars: Vec<Bar>,
        bar_axis: usize,
        geometry: GridGeometry,
        mut metadata: Metadata,
    ) -> Result<Self> {
        let dim = geometry.dimension();
        if bar_axis >= dim {
            return Err(VinoError::dimension_mismatch(format!(
                "bar axis {bar_axis} out of range for dimension {dim}"
            )));
        }

        let other_ppa: Vec<usize> = (0..dim)
            .filter(|&a| a != bar_axis)
            .map(|a| geometry.ppa[a])
            .collect();
        for bar in &bars {
            let inside = bar.position.len() == other_ppa.len()
                && bar.position.iter().zip(&other_ppa).all(|(&p, &n)| p < n)
                && bar.lower <= bar.upper
                && bar.upper < geometry.ppa[bar_axis];
            if !inside {
                return Err(VinoError::dimension_mismatch(format!(
                    "bar {bar:?} does not fit grid {:?} with bar axis {bar_axis}",
                    geometry.ppa
                )));
            }
        }

        geometry.write_metadata(&mut metadata);
        let labels = bar_labels(dim, bar_axis);
        metadata.insert(COLUMN_DESCRIPTION, labels.clone());
        metadata.insert(DATAFORMAT_COLUMNS, labels);
        metadata.insert(DATAFORMAT_BARAXIS, bar_axis as i64);
        metadata.insert(DATAFORMAT_NAME, super::Dataformat::Bars.name());

        Ok(Self {
            bars: bars::merge(bars),
            bar_axis,
            geometry,
            metadata,
        })
    }

    /// Build a bar grid from a raw chunk described by column labels.
    ///
    /// The last two columns are the bar bounds; they name the bar axis.
    /// For every other axis the position is read from the last column
    /// before the bounds labelled with that axis. Values are in units of
    /// `PointSize`.
    pub fn from_raw(data: &RawArray, metadata: Metadata) -> Result<Self> {
        let labels = metadata
            .string_list(COLUMN_DESCRIPTION)
            .or_else(|| metadata.string_list(DATAFORMAT_COLUMNS))
            .ok_or_else(|| VinoError::missing_metadata(COLUMN_DESCRIPTION))?
            .to_vec();

        let keep: Vec<usize> = (0..labels.len())
            .filter(|&i| labels[i] != EMPTY_COLUMN)
            .collect();
        let data = if data.ncols() == labels.len() && keep.len() != labels.len() {
            data.select_columns(&keep)?
        } else {
            data.clone()
        };
        let labels: Vec<&String> = keep.iter().map(|&i| &labels[i]).collect();
        if labels.len() != data.ncols() {
            return Err(VinoError::dimension_mismatch(format!(
                "{} column labels for {} data columns",
                labels.len(),
                data.ncols()
            )));
        }
        if labels.len() < 2 {
            return Err(VinoError::dimension_mismatch(
                "bars need at least two columns",
            ));
        }

        let axes = labels
            .iter()
            .map(|l| label_axis(l))
            .collect::<Result<Vec<_>>>()?;
        let ncols = axes.len();
        let bar_axis = axes[ncols - 1];
        if axes[ncols - 2] != bar_axis {
            return Err(VinoError::dimension_mismatch(format!(
                "last two columns {:?} and {:?} must describe the same axis",
                labels[ncols - 2],
                labels[ncols - 1]
            )));
        }

        let geometry = GridGeometry::from_metadata(&metadata)?;
        let dim = geometry.dimension();
        if bar_axis >= dim {
            return Err(VinoError::dimension_mismatch(format!(
                "bar axis {bar_axis} out of range for dimension {dim}"
            )));
        }

        let position_columns = (0..dim)
            .filter(|&a| a != bar_axis)
            .map(|axis| {
                (0..ncols - 2).rev().find(|&c| axes[c] == axis).ok_or_else(|| {
                    VinoError::dimension_mismatch(format!("no column describes axis {axis}"))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let point_size = metadata
            .integer(POINT_SIZE)
            .ok_or_else(|| VinoError::missing_metadata(POINT_SIZE))?;
        let to_index = |v: i64| -> Result<usize> {
            usize::try_from(v.div_euclid(point_size)).map_err(|_| {
                VinoError::dimension_mismatch(format!("negative grid coordinate {v}"))
            })
        };

        let rows = data.to_integer()?;
        let bars = rows
            .rows()
            .into_iter()
            .map(|row| {
                let position = position_columns
                    .iter()
                    .map(|&c| to_index(row[c]))
                    .collect::<Result<Vec<_>>>()?;
                Ok(Bar::new(
                    position,
                    to_index(row[ncols - 2])?,
                    to_index(row[ncols - 1])?,
                ))
            })
            .collect::<Result<Vec<_>>>()?;

        Self::new(bars, bar_axis, geometry, metadata)
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn bar_axis(&self) -> usize {
        self.bar_axis
    }

    pub fn geometry(&self) -> &GridGeometry {
        &self.geometry
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn dimension(&self) -> usize {
        self.geometry.dimension()
    }

    /// Number of bars.
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Column labels of [`to_array`](Self::to_array).
    pub fn columns(&self) -> Vec<String> {
        bar_labels(self.dimension(), self.bar_axis)
    }

    /// Bars as rows of positions followed by lower and upper bounds.
    pub fn to_array(&self) -> Array2<i64> {
        let width = self.dimension() + 1;
        let mut out = Array2::zeros((self.bars.len(), width));
        for (mut row, bar) in out.rows_mut().into_iter().zip(&self.bars) {
            for (slot, &p) in row.iter_mut().zip(&bar.position) {
                *slot = p as i64;
            }
            row[width - 2] = bar.lower as i64;
            row[width - 1] = bar.upper as i64;
        }
        out
    }

    /// Paint every bar into a dense grid.
    pub fn to_regulargrid(&self) -> Result<RegularGrid> {
        let grid = bars::paint(&self.bars, &self.geometry.ppa, self.bar_axis)?;
        let mut metadata = self.metadata.clone();
        metadata.remove(DATAFORMAT_BARAXIS);
        let labels = axis_labels(self.dimension());
        metadata.insert(COLUMN_DESCRIPTION, labels.clone());
        metadata.insert(DATAFORMAT_COLUMNS, labels);
        RegularGrid::from_parts(grid, self.geometry.clone(), metadata)
    }

    /// Whether the grid cell nearest to `point` is covered by a bar.
    pub fn contains(&self, point: &[f64]) -> Result<bool> {
        if point.len() != self.dimension() {
            return Err(VinoError::dimension_mismatch(format!(
                "point has {} coordinates, kernel has {} axes",
                point.len(),
                self.dimension()
            )));
        }
        let Some(mut index) = self.geometry.nearest_index(point) else {
            return Ok(false);
        };
        let value = index.remove(self.bar_axis);
        let after = self
            .bars
            .partition_point(|b| (&b.position, b.lower) <= (&index, value));
        Ok(after > 0 && {
            let bar = &self.bars[after - 1];
            bar.position == index && bar.upper >= value
        })
    }

    /// World coordinates of every covered cell.
    pub fn point_coordinates(&self) -> Array2<f64> {
        let dim = self.dimension();
        let count: usize = self.bars.iter().map(Bar::len).sum();
        let mut out = Array2::zeros((count, dim));
        let mut rows = out.rows_mut().into_iter();
        for bar in &self.bars {
            for value in bar.lower..=bar.upper {
                let index = bars::full_index(&bar.position, self.bar_axis, value);
                if let Some(mut row) = rows.next() {
                    for (axis, slot) in row.iter_mut().enumerate() {
                        *slot = self.geometry.coordinate(axis, index[axis] as f64);
                    }
                }
            }
        }
        out
    }

    /// Cell extents of each bar as `(x0, y0, x1, y1)` rows.
    pub(crate) fn rectangles(&self) -> Array2<f64> {
        let half: Vec<f64> = self.geometry.unit().iter().map(|u| u / 2.0).collect();
        let mut out = Array2::zeros((self.bars.len(), 4));
        for (mut row, bar) in out.rows_mut().into_iter().zip(&self.bars) {
            let low = bars::full_index(&bar.position, self.bar_axis, bar.lower);
            let high = bars::full_index(&bar.position, self.bar_axis, bar.upper);
            for axis in 0..2 {
                row[axis] = self.geometry.coordinate(axis, low[axis] as f64) - half[axis];
                row[axis + 2] = self.geometry.coordinate(axis, high[axis] as f64) + half[axis];
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::schema::{MAXIMAL_VALUES, MINIMAL_VALUES, POINT_NUMBER_PER_AXIS};
    use ndarray::array;

    fn legacy_metadata() -> Metadata {
        Metadata::new()
            .with(COLUMN_DESCRIPTION, vec!["x1".to_string(), "x2".into(), "x1".into(), "x1".into()])
            .with(MINIMAL_VALUES, vec![0.0, 0.0])
            .with(MAXIMAL_VALUES, vec![2.0, 1.0])
            .with(POINT_NUMBER_PER_AXIS, vec![2i64, 1])
            .with(POINT_SIZE, 1i64)
    }

    #[test]
    fn test_legacy_column_selection() {
        let data = RawArray::Integer(array![[0, 0, 0, 1], [1, 1, 2, 2]]);
        let bg = BarGrid::from_raw(&data, legacy_metadata()).unwrap();
        assert_eq!(bg.bar_axis(), 0);
        assert_eq!(
            bg.bars(),
            [Bar::new(vec![0], 0, 1), Bar::new(vec![1], 2, 2)]
        );
        let md = bg.metadata();
        assert_eq!(md.string(DATAFORMAT_NAME), Some("bars"));
        assert_eq!(md.integer(DATAFORMAT_BARAXIS), Some(0));
        assert_eq!(md.string_list(DATAFORMAT_COLUMNS).unwrap(), ["x2", "x1", "x1"]);
    }

    #[test]
    fn test_point_size_scaling() {
        let md = legacy_metadata()
            .with(POINT_NUMBER_PER_AXIS, vec![4i64, 2])
            .with(POINT_SIZE, 2i64);
        let data = RawArray::Integer(array![[0, 2, 0, 3]]);
        let bg = BarGrid::from_raw(&data, md).unwrap();
        assert_eq!(bg.bars(), [Bar::new(vec![1], 0, 1)]);
        assert_eq!(bg.geometry().ppa, [3, 2]);
        assert_eq!(bg.metadata().integer(POINT_SIZE), Some(1));
        assert_eq!(bg.metadata().integer_list(POINT_NUMBER_PER_AXIS).unwrap(), [2, 1]);
    }

    #[test]
    fn test_bound_columns_must_share_axis() {
        let md = legacy_metadata().with(
            COLUMN_DESCRIPTION,
            vec!["x1".to_string(), "x1".into(), "x2".into(), "x1".into()],
        );
        let data = RawArray::Integer(array![[0, 0, 0, 1]]);
        assert!(matches!(
            BarGrid::from_raw(&data, md).unwrap_err(),
            VinoError::DimensionMismatch { .. }
        ));
    }

    #[test]
    fn test_construction_merges_bars() {
        let data = RawArray::Integer(array![[0, 0, 0, 1], [0, 0, 2, 2]]);
        let bg = BarGrid::from_raw(&data, legacy_metadata()).unwrap();
        assert_eq!(bg.bars(), [Bar::new(vec![0], 0, 2)]);
    }

    #[test]
    fn test_bar_outside_grid() {
        let data = RawArray::Integer(array![[0, 0, 0, 5]]);
        assert!(BarGrid::from_raw(&data, legacy_metadata()).is_err());
    }

    #[test]
    fn test_contains() {
        let data = RawArray::Integer(array![[0, 0, 0, 1], [1, 1, 2, 2]]);
        let bg = BarGrid::from_raw(&data, legacy_metadata()).unwrap();
        // unit is 1 on both axes
        assert!(bg.contains(&[0.0, 0.0]).unwrap());
        assert!(bg.contains(&[1.1, 0.0]).unwrap());
        assert!(!bg.contains(&[2.0, 0.0]).unwrap());
        assert!(bg.contains(&[2.0, 1.0]).unwrap());
        assert!(!bg.contains(&[5.0, 1.0]).unwrap());
        assert!(bg.contains(&[0.0]).is_err());
    }

    #[test]
    fn test_to_array_and_points() {
        let data = RawArray::Integer(array![[0, 0, 0, 1], [1, 1, 2, 2]]);
        let bg = BarGrid::from_raw(&data, legacy_metadata()).unwrap();
        assert_eq!(bg.to_array(), array![[0, 0, 1], [1, 2, 2]]);
        assert_eq!(
            bg.point_coordinates(),
            array![[0.0, 0.0], [1.0, 0.0], [2.0, 1.0]]
        );
    }

    #[test]
    fn test_label_axis() {
        assert_eq!(label_axis("x3").unwrap(), 2);
        assert_eq!(label_axis("var12min").unwrap(), 11);
        assert!(label_axis("x0").is_err());
        assert!(label_axis("time").is_err());
    }
}
