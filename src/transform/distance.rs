// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Euclidean distance to the kernel boundary.
//!
//! Exact separable transform (Felzenszwalb and Huttenlocher): a 1-D lower
//! envelope of parabolas, run along every axis in turn on squared
//! distances. Distances are in grid cells.

use ndarray::{ArrayD, Axis, IxDyn, Slice, Zip};

use crate::core::Result;
use crate::kernel::RegularGrid;

/// Stand-in for an infinite squared distance.
const FAR: f64 = 1e20;

/// Squared distance transform of one lane, in place.
fn transform_lane(f: &[f64], out: &mut [f64], v: &mut [usize], z: &mut [f64]) {
    let n = f.len();
    let parabola = |q: usize| f[q] + (q * q) as f64;

    let mut k = 0;
    v[0] = 0;
    z[0] = f64::NEG_INFINITY;
    z[1] = f64::INFINITY;
    for q in 1..n {
        let mut s;
        loop {
            let p = v[k];
            s = (parabola(q) - parabola(p)) / (2 * q - 2 * p) as f64;
            if s <= z[k] && k > 0 {
                k -= 1;
            } else {
                break;
            }
        }
        k += 1;
        v[k] = q;
        z[k] = s;
        z[k + 1] = f64::INFINITY;
    }

    k = 0;
    for (q, slot) in out.iter_mut().enumerate() {
        while z[k + 1] < q as f64 {
            k += 1;
        }
        let d = q.abs_diff(v[k]) as f64;
        *slot = d * d + f[v[k]];
    }
}

impl RegularGrid<bool> {
    /// Distance of every inside cell to the nearest outside cell.
    ///
    /// The grid is surrounded by a layer of outside cells, so border cells
    /// are at distance 1. Outside cells are at distance 0.
    pub fn with_distance(&self) -> Result<RegularGrid<f64>> {
        let padded_shape: Vec<usize> = self.shape().iter().map(|n| n + 2).collect();
        let mut squared = ArrayD::<f64>::zeros(IxDyn(&padded_shape));
        Zip::from(squared.slice_each_axis_mut(|ax| Slice::from(1..ax.len - 1)))
            .and(self.grid())
            .for_each(|d, &inside| *d = if inside { FAR } else { 0.0 });

        for axis in 0..squared.ndim() {
            let n = squared.len_of(Axis(axis));
            let mut f = vec![0.0; n];
            let mut v = vec![0; n];
            let mut z = vec![0.0; n + 1];
            let mut out = vec![0.0; n];
            for mut lane in squared.lanes_mut(Axis(axis)) {
                for (slot, &x) in f.iter_mut().zip(lane.iter()) {
                    *slot = x;
                }
                transform_lane(&f, &mut out, &mut v, &mut z);
                for (x, &d) in lane.iter_mut().zip(&out) {
                    *x = d;
                }
            }
        }

        let distances = squared
            .slice_each_axis(|ax| Slice::from(1..ax.len - 1))
            .mapv(f64::sqrt);
        RegularGrid::from_parts(distances, self.geometry().clone(), self.metadata().clone())
    }
}

impl RegularGrid<f64> {
    /// Positive distances in row-major order.
    pub fn distances(&self) -> Vec<f64> {
        self.grid().iter().copied().filter(|&d| d > 0.0).collect()
    }
}
