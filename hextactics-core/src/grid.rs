//! Hex grid geometry with offset (row, col) coordinates
//!
//! Cells are laid out in columns spaced `1.5 * size` apart; odd columns are
//! shifted down by half a cell height. Adjacency follows from that shift:
//! an odd column touches the diagonal neighbours one row *below*, an even
//! column the ones one row *above*.

use std::ops::{Add, Div, Mul, Sub};

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::error::{GridError, Result};
use crate::region::RegionId;

/// Half the height of a hexagon with unit edge length (sin 60)
pub const HALF_HEIGHT_RATIO: f64 = 0.866_025_403_784_438_6;

/// Default edge length in pixels
pub const DEFAULT_HEX_SIZE: f64 = 100.0;

// ============================================================================
// PIXEL GEOMETRY
// ============================================================================

/// A point in canvas pixel space
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance_to(&self, other: Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, other: Point) -> Point {
        Point::new(self.x + other.x, self.y + other.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, other: Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }
}

impl Mul<f64> for Point {
    type Output = Point;

    fn mul(self, factor: f64) -> Point {
        Point::new(self.x * factor, self.y * factor)
    }
}

impl Div<f64> for Point {
    type Output = Point;

    fn div(self, divisor: f64) -> Point {
        Point::new(self.x / divisor, self.y / divisor)
    }
}

// ============================================================================
// COORDINATES
// ============================================================================

/// Offset hex coordinates
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Hex {
    pub row: i32,
    pub col: i32,
}

impl Hex {
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    fn is_odd_column(&self) -> bool {
        self.col.rem_euclid(2) == 1
    }

    /// The six candidate neighbours, in or out of bounds.
    ///
    /// Order: up, down, left, right, then the two parity-dependent diagonals.
    pub fn candidate_neighbors(&self) -> [Hex; 6] {
        let diagonal_row = if self.is_odd_column() {
            self.row + 1
        } else {
            self.row - 1
        };

        [
            Hex::new(self.row - 1, self.col),
            Hex::new(self.row + 1, self.col),
            Hex::new(self.row, self.col - 1),
            Hex::new(self.row, self.col + 1),
            Hex::new(diagonal_row, self.col - 1),
            Hex::new(diagonal_row, self.col + 1),
        ]
    }
}

/// One hexagonal cell of the grid
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Cell {
    pub hex: Hex,
    boundary: [Point; 6],
    region: Option<RegionId>,
}

impl Cell {
    /// Boundary vertices, clockwise from the top-left corner
    pub fn boundary(&self) -> &[Point; 6] {
        &self.boundary
    }

    /// Region tag assigned by the region generator
    pub fn region(&self) -> Option<RegionId> {
        self.region
    }

    /// Geometric center of the boundary
    pub fn center(&self) -> Point {
        // Opposite corners 0/3 share the center as their midpoint
        (self.boundary[0] + self.boundary[3]) / 2.0
    }

    /// Check whether the point lies inside the boundary.
    ///
    /// Half-open crossing test: a point on an edge shared by two cells is
    /// claimed by exactly one of them.
    pub fn contains(&self, point: Point) -> bool {
        let mut inside = false;
        let mut j = self.boundary.len() - 1;

        for i in 0..self.boundary.len() {
            let a = self.boundary[i];
            let b = self.boundary[j];

            if (a.y > point.y) != (b.y > point.y) {
                let crossing_x = a.x + (point.y - a.y) * (b.x - a.x) / (b.y - a.y);
                if point.x < crossing_x {
                    inside = !inside;
                }
            }
            j = i;
        }

        inside
    }

    fn bounding_box(&self) -> (Point, Point) {
        let left = self.boundary[5].x;
        let right = self.boundary[2].x;
        let top = self.boundary[0].y;
        let bottom = self.boundary[3].y;
        (Point::new(left, top), Point::new(right, bottom))
    }
}

/// Compute the hexagon for a coordinate at the given edge length
pub fn hex_boundary(hex: Hex, size: f64) -> [Point; 6] {
    let half_height = HALF_HEIGHT_RATIO * size;
    let origin = 0.5 * size;

    let x = origin + hex.col as f64 * 1.5 * size;
    let column_shift = if hex.is_odd_column() { half_height } else { 0.0 };
    let y = origin + hex.row as f64 * 2.0 * half_height + column_shift;

    [
        Point::new(x + size / 2.0, y),
        Point::new(x + 1.5 * size, y),
        Point::new(x + 2.0 * size, y + half_height),
        Point::new(x + 1.5 * size, y + 2.0 * half_height),
        Point::new(x + size / 2.0, y + 2.0 * half_height),
        Point::new(x, y + half_height),
    ]
}

// ============================================================================
// GRID
// ============================================================================

/// Fixed `rows x columns` array of cells sharing one edge length
#[derive(Clone, Debug)]
pub struct HexGrid {
    rows: usize,
    columns: usize,
    hex_size: f64,
    /// Row-major
    cells: Vec<Cell>,
}

impl HexGrid {
    pub fn new(rows: usize, columns: usize, hex_size: f64) -> Result<Self> {
        if rows == 0 || columns == 0 {
            return Err(GridError::InvalidGeometry(format!(
                "grid must have at least one cell, got {}x{}",
                rows, columns
            )));
        }
        validate_hex_size(hex_size)?;

        let mut cells = Vec::with_capacity(rows * columns);
        for row in 0..rows {
            for col in 0..columns {
                let hex = Hex::new(row as i32, col as i32);
                cells.push(Cell {
                    hex,
                    boundary: hex_boundary(hex, hex_size),
                    region: None,
                });
            }
        }

        Ok(Self {
            rows,
            columns,
            hex_size,
            cells,
        })
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn hex_size(&self) -> f64 {
        self.hex_size
    }

    /// Total number of cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Check if a coordinate is inside the grid
    pub fn contains(&self, hex: Hex) -> bool {
        hex.row >= 0
            && hex.col >= 0
            && (hex.row as usize) < self.rows
            && (hex.col as usize) < self.columns
    }

    /// Iterate all cells in row-major order
    pub fn cells(&self) -> impl Iterator<Item = &Cell> + '_ {
        self.cells.iter()
    }

    /// Iterate all coordinates in row-major order
    pub fn hexes(&self) -> impl Iterator<Item = Hex> + '_ {
        self.cells.iter().map(|cell| cell.hex)
    }

    /// Direct lookup by row and column
    pub fn cell_at(&self, row: i32, col: i32) -> Result<&Cell> {
        self.cell(Hex::new(row, col))
    }

    pub fn cell(&self, hex: Hex) -> Result<&Cell> {
        let index = self.index_of(hex)?;
        Ok(&self.cells[index])
    }

    /// Center pixel of a cell
    pub fn center_of(&self, hex: Hex) -> Result<Point> {
        Ok(self.cell(hex)?.center())
    }

    fn index_of(&self, hex: Hex) -> Result<usize> {
        if !self.contains(hex) {
            return Err(GridError::OutOfBounds {
                row: hex.row,
                col: hex.col,
                rows: self.rows,
                columns: self.columns,
            });
        }
        Ok(hex.row as usize * self.columns + hex.col as usize)
    }

    // ========================================================================
    // ADJACENCY
    // ========================================================================

    /// In-bounds neighbours of a cell (up to six)
    pub fn neighbors(&self, hex: Hex) -> impl Iterator<Item = Hex> + '_ {
        hex.candidate_neighbors()
            .into_iter()
            .filter(move |n| self.contains(*n))
    }

    pub fn adjacent_cells(&self, hex: Hex) -> FxHashSet<Hex> {
        self.neighbors(hex).collect()
    }

    /// All cells within `depth` hops of `center`, excluding `center` itself.
    ///
    /// Breadth-first with an owned visited set; depth 0 yields nothing.
    pub fn neighbors_within_depth(&self, center: Hex, depth: usize) -> FxHashSet<Hex> {
        let mut found = FxHashSet::default();
        if depth == 0 || !self.contains(center) {
            return found;
        }

        let mut visited = FxHashSet::default();
        visited.insert(center);
        let mut frontier = vec![center];

        for _ in 0..depth {
            let mut next = Vec::new();
            for hex in frontier {
                for neighbor in self.neighbors(hex) {
                    if visited.insert(neighbor) {
                        found.insert(neighbor);
                        next.push(neighbor);
                    }
                }
            }
            if next.is_empty() {
                break;
            }
            frontier = next;
        }

        found
    }

    // ========================================================================
    // HIT TESTING & SIZING
    // ========================================================================

    /// Find the cell whose boundary contains the point
    pub fn hit_test(&self, point: Point) -> Option<Hex> {
        self.cells
            .iter()
            .filter(|cell| {
                let (min, max) = cell.bounding_box();
                point.x >= min.x && point.x <= max.x && point.y >= min.y && point.y <= max.y
            })
            .find(|cell| cell.contains(point))
            .map(|cell| cell.hex)
    }

    /// Change the edge length and recompute every boundary
    pub fn set_hex_size(&mut self, size: f64) -> Result<()> {
        validate_hex_size(size)?;
        self.hex_size = size;
        for cell in &mut self.cells {
            cell.boundary = hex_boundary(cell.hex, size);
        }
        tracing::debug!(size, cells = self.cells.len(), "recomputed hex boundaries");
        Ok(())
    }

    /// Pixel size of the area covered by the grid, including the margin
    pub fn pixel_extent(&self) -> Point {
        let margin = 0.5 * self.hex_size;
        let half_height = HALF_HEIGHT_RATIO * self.hex_size;
        let width = 2.0 * margin + (self.columns as f64 - 1.0) * 1.5 * self.hex_size + 2.0 * self.hex_size;
        let shift = if self.columns > 1 { half_height } else { 0.0 };
        let height = 2.0 * margin + self.rows as f64 * 2.0 * half_height + shift;
        Point::new(width, height)
    }

    // ========================================================================
    // REGION TAGS
    // ========================================================================

    pub fn region_of(&self, hex: Hex) -> Result<Option<RegionId>> {
        Ok(self.cell(hex)?.region)
    }

    pub(crate) fn set_region(&mut self, hex: Hex, region: Option<RegionId>) -> Result<()> {
        let index = self.index_of(hex)?;
        self.cells[index].region = region;
        Ok(())
    }

    pub(crate) fn clear_regions(&mut self) {
        for cell in &mut self.cells {
            cell.region = None;
        }
    }
}

fn validate_hex_size(size: f64) -> Result<()> {
    if !size.is_finite() || size <= 0.0 {
        return Err(GridError::InvalidGeometry(format!(
            "hex size must be a positive number of pixels, got {}",
            size
        )));
    }
    Ok(())
}
