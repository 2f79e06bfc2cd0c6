// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Viability kernel representations.
//!
//! - [`RegularGrid`] - Dense N-dimensional boolean grid
//! - [`BarGrid`] - Run-length encoded grid
//! - [`KdTree`] - List of kd-tree leaf cells
//! - [`Polygon`] - Closed 2-D boundary
//!
//! [`Kernel`] closes over the four; the concrete variant of a loaded kernel
//! is chosen by its `dataformat.name` metadata through [`Dataformat`].

pub mod bargrid;
pub mod grid;
pub mod kdtree;
pub mod polygon;
pub mod regulargrid;

use std::fmt;
use std::str::FromStr;

use ndarray::Array2;
use serde::Serialize;
use tracing::warn;

use crate::core::{RawArray, Result, VinoError};
use crate::metadata::schema::{DATAFORMAT_NAME, RESULTFORMAT_TITLE, STATE_VARIABLES};
use crate::metadata::{Literal, Metadata};

pub use bargrid::{Bar, BarGrid};
pub use grid::GridGeometry;
pub use kdtree::KdTree;
pub use polygon::Polygon;
pub use regulargrid::RegularGrid;

/// Registry of kernel data formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Dataformat {
    RegularGrid,
    Bars,
    KdTree,
    Polygon,
}

impl Dataformat {
    pub const ALL: [Dataformat; 4] = [
        Dataformat::RegularGrid,
        Dataformat::Bars,
        Dataformat::KdTree,
        Dataformat::Polygon,
    ];

    /// Name used in `dataformat.name`.
    pub fn name(&self) -> &'static str {
        match self {
            Dataformat::RegularGrid => "regulargrid",
            Dataformat::Bars => "bars",
            Dataformat::KdTree => "kdtree",
            Dataformat::Polygon => "polygon",
        }
    }

    /// Look up a dataformat by name.
    pub fn from_name(name: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|f| f.name() == name)
            .ok_or_else(|| VinoError::UnknownDataformat {
                name: name.to_string(),
                available: Self::ALL
                    .iter()
                    .map(|f| format!("'{}'", f.name()))
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }

    /// Dataformat declared by a metadata record.
    ///
    /// `dataformat.name` takes precedence over `resultformat.title`.
    pub fn of(metadata: &Metadata) -> Result<Self> {
        let name = metadata
            .string(DATAFORMAT_NAME)
            .or_else(|| metadata.string(RESULTFORMAT_TITLE))
            .ok_or_else(|| VinoError::missing_metadata(DATAFORMAT_NAME))?;
        Self::from_name(name)
    }

    /// Build a kernel of this format from a raw chunk.
    pub fn build(&self, data: &RawArray, metadata: Metadata) -> Result<Kernel> {
        Ok(match self {
            Dataformat::RegularGrid => Kernel::RegularGrid(RegularGrid::from_raw(data, metadata)?),
            Dataformat::Bars => Kernel::BarGrid(BarGrid::from_raw(data, metadata)?),
            Dataformat::KdTree => Kernel::KdTree(KdTree::from_raw(data, metadata)?),
            Dataformat::Polygon => Kernel::Polygon(Polygon::from_raw(data, metadata)?),
        })
    }
}

impl fmt::Display for Dataformat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Dataformat {
    type Err = VinoError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_name(s)
    }
}

/// A state variable of the viability problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Variable {
    pub order: usize,
    pub name: String,
    pub desc: String,
    pub unit: String,
}

impl Variable {
    fn from_literal(order: usize, item: &Literal) -> Option<Self> {
        let text = |l: &Literal| match l {
            Literal::Str(s) => s.clone(),
            Literal::None => String::new(),
            other => other.to_string(),
        };
        let (name, desc, unit) = match item {
            Literal::Str(name) => (name.clone(), String::new(), String::new()),
            Literal::Tuple(items) | Literal::List(items) => match items.as_slice() {
                [name] => (text(name), String::new(), String::new()),
                [name, desc] => (text(name), text(desc), String::new()),
                [name, desc, unit, ..] => (text(name), text(desc), text(unit)),
                [] => return None,
            },
            _ => return None,
        };
        Some(Self {
            order,
            name,
            desc,
            unit,
        })
    }
}

/// Grid placement reported by [`Kernel::info`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridInfo {
    pub ppa: Vec<usize>,
    pub origin: Vec<f64>,
    pub opposite: Vec<f64>,
    pub unit: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bar_axis: Option<usize>,
}

/// Summary of a kernel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KernelInfo {
    pub format: Dataformat,
    pub dim: usize,
    /// Rows in the raw representation
    pub size: usize,
    pub min: Vec<f64>,
    pub max: Vec<f64>,
    pub variables: Vec<Variable>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grid: Option<GridInfo>,
}

/// A viability kernel in one of the supported representations.
#[derive(Debug, Clone, PartialEq)]
pub enum Kernel {
    RegularGrid(RegularGrid),
    BarGrid(BarGrid),
    KdTree(KdTree),
    Polygon(Polygon),
}

impl From<RegularGrid> for Kernel {
    fn from(k: RegularGrid) -> Self {
        Kernel::RegularGrid(k)
    }
}

impl From<BarGrid> for Kernel {
    fn from(k: BarGrid) -> Self {
        Kernel::BarGrid(k)
    }
}

impl From<KdTree> for Kernel {
    fn from(k: KdTree) -> Self {
        Kernel::KdTree(k)
    }
}

impl From<Polygon> for Kernel {
    fn from(k: Polygon) -> Self {
        Kernel::Polygon(k)
    }
}

impl Kernel {
    /// Build a kernel, picking the representation from the metadata.
    pub fn from_raw(data: &RawArray, metadata: Metadata) -> Result<Self> {
        Dataformat::of(&metadata)?.build(data, metadata)
    }

    pub fn dataformat(&self) -> Dataformat {
        match self {
            Kernel::RegularGrid(_) => Dataformat::RegularGrid,
            Kernel::BarGrid(_) => Dataformat::Bars,
            Kernel::KdTree(_) => Dataformat::KdTree,
            Kernel::Polygon(_) => Dataformat::Polygon,
        }
    }

    pub fn metadata(&self) -> &Metadata {
        match self {
            Kernel::RegularGrid(k) => k.metadata(),
            Kernel::BarGrid(k) => k.metadata(),
            Kernel::KdTree(k) => k.metadata(),
            Kernel::Polygon(k) => k.metadata(),
        }
    }

    pub fn dimension(&self) -> usize {
        match self {
            Kernel::RegularGrid(k) => k.dimension(),
            Kernel::BarGrid(k) => k.dimension(),
            Kernel::KdTree(k) => k.dimension(),
            Kernel::Polygon(k) => k.dimension(),
        }
    }

    /// Rows in the raw representation: inside cells, bars, kd cells or vertices.
    pub fn len(&self) -> usize {
        match self {
            Kernel::RegularGrid(k) => k.len(),
            Kernel::BarGrid(k) => k.len(),
            Kernel::KdTree(k) => k.len(),
            Kernel::Polygon(k) => k.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Lower and upper corner of the kernel's domain.
    ///
    /// Grids report their declared extent, cell lists and polygons the
    /// bounding box of their data.
    pub fn bounds(&self) -> (Vec<f64>, Vec<f64>) {
        match self {
            Kernel::RegularGrid(k) => (k.geometry().origin.clone(), k.geometry().opposite.clone()),
            Kernel::BarGrid(k) => (k.geometry().origin.clone(), k.geometry().opposite.clone()),
            Kernel::KdTree(k) => k.bounds(),
            Kernel::Polygon(k) => k.bounds(),
        }
    }

    /// Grid geometry of grid representations.
    pub fn geometry(&self) -> Option<&GridGeometry> {
        match self {
            Kernel::RegularGrid(k) => Some(k.geometry()),
            Kernel::BarGrid(k) => Some(k.geometry()),
            Kernel::KdTree(_) | Kernel::Polygon(_) => None,
        }
    }

    /// Column labels of [`to_raw`](Self::to_raw).
    pub fn columns(&self) -> Vec<String> {
        match self {
            Kernel::RegularGrid(k) => k.columns(),
            Kernel::BarGrid(k) => k.columns(),
            Kernel::KdTree(k) => k.columns(),
            Kernel::Polygon(k) => k.columns(),
        }
    }

    /// The kernel as a raw chunk that rebuilds it through [`from_raw`](Self::from_raw).
    pub fn to_raw(&self) -> RawArray {
        match self {
            Kernel::RegularGrid(k) => RawArray::Integer(k.to_array()),
            Kernel::BarGrid(k) => RawArray::Integer(k.to_array()),
            Kernel::KdTree(k) => RawArray::Float(k.cells().clone()),
            Kernel::Polygon(k) => RawArray::Float(k.vertices().clone()),
        }
    }

    /// Representative points: inside cells for grids, sample points for
    /// kd cells, vertices for polygons.
    pub fn point_coordinates(&self) -> Array2<f64> {
        match self {
            Kernel::RegularGrid(k) => k.point_coordinates(),
            Kernel::BarGrid(k) => k.point_coordinates(),
            Kernel::KdTree(k) => k.point_coordinates(),
            Kernel::Polygon(k) => k.point_coordinates(),
        }
    }

    /// Outline of every rectangle of a 2-D kernel, ready for plotting.
    ///
    /// Each rectangle contributes its five corners (closed) followed by a
    /// `NaN` separator, in `x` and `y` separately. Polygons have no
    /// rectangles and yield `None`.
    pub fn rectangles_coordinates(&self) -> Result<Option<(Vec<f64>, Vec<f64>)>> {
        if self.dimension() != 2 {
            return Err(VinoError::dimension_mismatch(format!(
                "rectangles need a 2-D kernel, this one has {} axes",
                self.dimension()
            )));
        }
        let rectangles = match self {
            Kernel::RegularGrid(k) => k.to_bargrid(1)?.rectangles(),
            Kernel::BarGrid(k) => k.rectangles(),
            Kernel::KdTree(k) => k.rectangles(),
            Kernel::Polygon(_) => return Ok(None),
        };

        let mut xs = Vec::with_capacity(rectangles.nrows() * 6);
        let mut ys = Vec::with_capacity(rectangles.nrows() * 6);
        for r in rectangles.rows() {
            let (x0, y0, x1, y1) = (r[0], r[1], r[2], r[3]);
            xs.extend([x0, x1, x1, x0, x0, f64::NAN]);
            ys.extend([y0, y0, y1, y1, y0, f64::NAN]);
        }
        Ok(Some((xs, ys)))
    }

    /// State variables, from `viabilityproblem.statevariables` when it
    /// describes every axis, otherwise `x1..xN`.
    pub fn variables(&self) -> Vec<Variable> {
        let dim = self.dimension();
        let declared = self
            .metadata()
            .literal(STATE_VARIABLES)
            .and_then(Literal::items)
            .map(|items| {
                items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| Variable::from_literal(i, item))
                    .collect::<Option<Vec<_>>>()
            });

        match declared {
            Some(Some(vars)) if vars.len() == dim => vars,
            Some(_) => {
                warn!(dim, "state variables don't describe every axis, using defaults");
                default_variables(dim)
            }
            None => default_variables(dim),
        }
    }

    /// Whether `point` belongs to the kernel.
    pub fn contains(&self, point: &[f64]) -> Result<bool> {
        match self {
            Kernel::RegularGrid(k) => k.contains(point),
            Kernel::BarGrid(k) => k.contains(point),
            Kernel::KdTree(k) => k.contains(point),
            Kernel::Polygon(k) => k.contains(point),
        }
    }

    /// Dense grid version of the kernel.
    ///
    /// `ppa` sizes the grid of rasterized kd-trees and polygons; grids and
    /// bar grids keep their own.
    pub fn to_regulargrid(&self, ppa: &[usize]) -> Result<RegularGrid> {
        match self {
            Kernel::RegularGrid(k) => Ok(k.clone()),
            Kernel::BarGrid(k) => k.to_regulargrid(),
            Kernel::KdTree(k) => k.to_regulargrid(ppa),
            Kernel::Polygon(k) => k.to_regulargrid(ppa),
        }
    }

    /// Distance of every cell of [`Kernel::to_regulargrid`] to the kernel
    /// boundary.
    pub fn with_distance(&self, ppa: &[usize]) -> Result<RegularGrid<f64>> {
        self.to_regulargrid(ppa)?.with_distance()
    }

    /// Two-dimensional slice of [`Kernel::to_regulargrid`].
    ///
    /// See [`RegularGrid::section`] for `plane` and `at`.
    pub fn section(
        &self,
        ppa: &[usize],
        plane: (usize, usize),
        at: &[usize],
    ) -> Result<Array2<bool>> {
        self.to_regulargrid(ppa)?.section(plane, at)
    }

    /// Bar grid version of the kernel, with bars along `bar_axis`.
    pub fn to_bargrid(&self, ppa: &[usize], bar_axis: usize) -> Result<BarGrid> {
        match self {
            Kernel::RegularGrid(k) => k.to_bargrid(bar_axis),
            Kernel::BarGrid(k) if k.bar_axis() == bar_axis => Ok(k.clone()),
            Kernel::BarGrid(k) => k.resample(None, Some(bar_axis), false),
            Kernel::KdTree(k) => k.to_bargrid(ppa, bar_axis),
            Kernel::Polygon(k) => k.to_bargrid(ppa, bar_axis),
        }
    }

    /// Resample grids and bar grids; rasterize kd-trees and polygons.
    ///
    /// Grids keep their representation. Rasterized kernels become bar grids
    /// along `bar_axis` (axis 0 when unset).
    pub fn resample(
        &self,
        ppa: Option<&[usize]>,
        bar_axis: Option<usize>,
        autocrop: bool,
    ) -> Result<Kernel> {
        Ok(match self {
            Kernel::RegularGrid(k) => match bar_axis {
                Some(axis) => k.to_bargrid(axis)?.resample(ppa, None, autocrop)?.into(),
                None => k.resample(ppa, autocrop)?.into(),
            },
            Kernel::BarGrid(k) => k.resample(ppa, bar_axis, autocrop)?.into(),
            Kernel::KdTree(_) | Kernel::Polygon(_) => {
                let ppa = ppa.ok_or_else(|| {
                    VinoError::dimension_mismatch("rasterizing needs points per axis")
                })?;
                let bars = self.to_bargrid(ppa, bar_axis.unwrap_or(0))?;
                if autocrop {
                    bars.resample(None, None, true)?.into()
                } else {
                    bars.into()
                }
            }
        })
    }

    /// Summary for display and JSON export.
    pub fn info(&self) -> KernelInfo {
        let (min, max) = self.bounds();
        let grid = self.geometry().map(|g| GridInfo {
            ppa: g.ppa.clone(),
            origin: g.origin.clone(),
            opposite: g.opposite.clone(),
            unit: g.unit(),
            bar_axis: match self {
                Kernel::BarGrid(k) => Some(k.bar_axis()),
                _ => None,
            },
        });
        KernelInfo {
            format: self.dataformat(),
            dim: self.dimension(),
            size: self.len(),
            min,
            max,
            variables: self.variables(),
            grid,
        }
    }
}

fn default_variables(dim: usize) -> Vec<Variable> {
    grid::axis_labels(dim)
        .into_iter()
        .enumerate()
        .map(|(order, name)| Variable {
            order,
            name,
            desc: String::new(),
            unit: String::new(),
        })
        .collect()
}
