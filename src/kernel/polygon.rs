// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Two-dimensional polygons: the ordered vertices of a closed boundary.

use ndarray::Array2;

use super::grid::axis_labels;
use super::Dataformat;
use crate::core::{RawArray, Result, VinoError};
use crate::metadata::schema::{DATAFORMAT_COLUMNS, DATAFORMAT_NAME};
use crate::metadata::Metadata;

#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    vertices: Array2<f64>,
    metadata: Metadata,
}

impl Polygon {
    /// Build a polygon from a two-column vertex chunk.
    pub fn from_raw(data: &RawArray, mut metadata: Metadata) -> Result<Self> {
        if data.ncols() != 2 {
            return Err(VinoError::dimension_mismatch(format!(
                "polygon vertices need 2 columns, got {}",
                data.ncols()
            )));
        }

        metadata.insert(DATAFORMAT_NAME, Dataformat::Polygon.name());
        if metadata.string_list(DATAFORMAT_COLUMNS).map(<[String]>::len) != Some(2) {
            metadata.insert(DATAFORMAT_COLUMNS, axis_labels(2));
        }

        Ok(Self {
            vertices: data.to_float(),
            metadata,
        })
    }

    pub fn vertices(&self) -> &Array2<f64> {
        &self.vertices
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn dimension(&self) -> usize {
        2
    }

    /// Number of vertices.
    pub fn len(&self) -> usize {
        self.vertices.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.nrows() == 0
    }

    pub fn columns(&self) -> Vec<String> {
        self.metadata
            .string_list(DATAFORMAT_COLUMNS)
            .map(<[String]>::to_vec)
            .unwrap_or_else(|| axis_labels(2))
    }

    /// Vertex bounding box.
    pub fn bounds(&self) -> (Vec<f64>, Vec<f64>) {
        self.vertices
            .columns()
            .into_iter()
            .map(|c| {
                (
                    c.fold(f64::INFINITY, |m, &v| m.min(v)),
                    c.fold(f64::NEG_INFINITY, |m, &v| m.max(v)),
                )
            })
            .unzip()
    }

    /// Vertices as `(x, y)` pairs.
    pub fn points(&self) -> Vec<(f64, f64)> {
        self.vertices.rows().into_iter().map(|r| (r[0], r[1])).collect()
    }

    pub fn point_coordinates(&self) -> Array2<f64> {
        self.vertices.clone()
    }

    /// Even-odd point-in-polygon test.
    pub fn contains(&self, point: &[f64]) -> Result<bool> {
        let &[x, y] = point else {
            return Err(VinoError::dimension_mismatch(format!(
                "point has {} coordinates, polygon has 2 axes",
                point.len()
            )));
        };
        let inside = crossings(&self.points(), y)
            .into_iter()
            .filter(|&cx| cx > x)
            .count()
            % 2
            == 1;
        Ok(inside)
    }
}

/// X coordinates where the horizontal line at `y` crosses the closed
/// boundary through `points`.
///
/// An edge counts when exactly one of its ends lies strictly above `y`, so
/// each vertex on the line is counted once.
pub(crate) fn crossings(points: &[(f64, f64)], y: f64) -> Vec<f64> {
    let n = points.len();
    (0..n)
        .filter_map(|i| {
            let (x0, y0) = points[i];
            let (x1, y1) = points[(i + 1) % n];
            ((y0 > y) != (y1 > y)).then(|| x0 + (y - y0) * (x1 - x0) / (y1 - y0))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn square() -> Polygon {
        let data = RawArray::Float(array![[0.0, 0.0], [2.0, 0.0], [2.0, 2.0], [0.0, 2.0]]);
        Polygon::from_raw(&data, Metadata::new()).unwrap()
    }

    #[test]
    fn test_bounds() {
        assert_eq!(square().bounds(), (vec![0.0, 0.0], vec![2.0, 2.0]));
    }

    #[test]
    fn test_contains() {
        let p = square();
        assert!(p.contains(&[1.0, 1.0]).unwrap());
        assert!(!p.contains(&[3.0, 1.0]).unwrap());
        assert!(!p.contains(&[1.0, -0.5]).unwrap());
        assert!(p.contains(&[1.0]).is_err());
    }

    #[test]
    fn test_needs_two_columns() {
        let data = RawArray::Float(array![[0.0, 0.0, 0.0]]);
        assert!(Polygon::from_raw(&data, Metadata::new()).is_err());
    }
}
