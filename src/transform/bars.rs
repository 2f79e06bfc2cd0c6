// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Run-length encoding between dense grids and bars.

use ndarray::{ArrayD, ArrayViewD, IxDyn};

use crate::core::{Result, VinoError};
use crate::kernel::Bar;

/// Grid index of a bar cell: `position` with `value` inserted at `bar_axis`.
pub fn full_index(position: &[usize], bar_axis: usize, value: usize) -> Vec<usize> {
    let mut index = Vec::with_capacity(position.len() + 1);
    index.extend_from_slice(&position[..bar_axis]);
    index.push(value);
    index.extend_from_slice(&position[bar_axis..]);
    index
}

/// Unravel a row-major flat index.
fn unravel(mut flat: usize, shape: &[usize]) -> Vec<usize> {
    let mut index = vec![0; shape.len()];
    for (slot, &n) in index.iter_mut().zip(shape).rev() {
        *slot = flat % n;
        flat /= n;
    }
    index
}

/// Encode the inside cells of a grid as bars along `bar_axis`.
///
/// Positions are visited in row-major order of the remaining axes, and
/// bars at one position in increasing order.
pub fn encode(grid: ArrayViewD<'_, bool>, bar_axis: usize) -> Vec<Bar> {
    let shape = grid.shape().to_vec();
    let length = shape[bar_axis];
    let other_shape: Vec<usize> = shape
        .iter()
        .enumerate()
        .filter(|&(axis, _)| axis != bar_axis)
        .map(|(_, &n)| n)
        .collect();

    let mut order: Vec<usize> = (0..shape.len()).filter(|&a| a != bar_axis).collect();
    order.push(bar_axis);
    let cells: Vec<bool> = grid.permuted_axes(IxDyn(&order)).iter().copied().collect();

    let mut bars = Vec::new();
    if length == 0 {
        return bars;
    }
    for (flat, lane) in cells.chunks(length).enumerate() {
        let mut start = None;
        for (i, &inside) in lane.iter().enumerate() {
            match (inside, start) {
                (true, None) => start = Some(i),
                (false, Some(lower)) => {
                    bars.push(Bar::new(unravel(flat, &other_shape), lower, i - 1));
                    start = None;
                }
                _ => {}
            }
        }
        if let Some(lower) = start {
            bars.push(Bar::new(unravel(flat, &other_shape), lower, length - 1));
        }
    }
    bars
}

/// Paint bars into a dense grid of the given shape.
pub fn paint(bars: &[Bar], shape: &[usize], bar_axis: usize) -> Result<ArrayD<bool>> {
    let mut grid = ArrayD::from_elem(IxDyn(shape), false);
    for bar in bars {
        if bar.position.len() + 1 != shape.len() {
            return Err(VinoError::dimension_mismatch(format!(
                "bar position has {} axes, grid has {}",
                bar.position.len(),
                shape.len()
            )));
        }
        let first = full_index(&bar.position, bar_axis, bar.lower);
        let last = full_index(&bar.position, bar_axis, bar.upper);
        if let Some(axis) = (0..shape.len()).find(|&a| last[a] >= shape[a] || first[a] >= shape[a]) {
            return Err(VinoError::dimension_mismatch(format!(
                "bar {bar:?} exceeds grid size {} along axis {axis}",
                shape[axis]
            )));
        }
        let mut index = first;
        for value in bar.lower..=bar.upper {
            index[bar_axis] = value;
            grid[IxDyn(&index)] = true;
        }
    }
    Ok(grid)
}

/// Sort bars and fuse overlapping or touching bars at the same position.
pub fn merge(mut bars: Vec<Bar>) -> Vec<Bar> {
    bars.sort_unstable();
    let mut merged: Vec<Bar> = Vec::with_capacity(bars.len());
    for bar in bars {
        match merged.last_mut() {
            Some(acc) if acc.position == bar.position && bar.lower <= acc.upper + 1 => {
                acc.upper = acc.upper.max(bar.upper);
            }
            _ => merged.push(bar),
        }
    }
    merged
}
