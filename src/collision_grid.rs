// Uniform-grid index answering "does this label box overlap anything already
// placed?".
// The grid covers a fixed bound and is split into `cell_width` x
// `cell_height` cells. A box is recorded in every cell it spans, so a query
// only compares against boxes sharing at least one cell with it. The grid is
// insert-only and lives for a single layout pass.

use serde::Serialize;
use thiserror::Error;

use crate::geom::{BoundingBox, box_height, box_width, boxes_intersect};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum GridError {
    #[error("cell width must be positive and finite, got {0}")]
    InvalidCellWidth(f32),
    #[error("cell height must be positive and finite, got {0}")]
    InvalidCellHeight(f32),
    #[error("grid bound must be finite, got {0:?}")]
    NonFiniteBound(BoundingBox),
    #[error("grid bound is inverted: {0:?}")]
    InvertedBound(BoundingBox),
    #[error("grid of {columns} x {rows} cells is too large")]
    TooManyCells { columns: usize, rows: usize },
}

/// Outcome of [`CollisionGrid::place`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Placement {
    /// No conflict; the box is now recorded in the grid.
    Placed,
    /// No conflict; test-only query, nothing was recorded.
    Fits,
    /// The box does not touch the grid bound at all, or has a NaN corner.
    OutOfBounds,
    /// The box intersects a previously placed box.
    Collision,
}

impl Placement {
    pub fn is_accepted(self) -> bool {
        matches!(self, Placement::Placed | Placement::Fits)
    }
}

/// Inclusive cell range spanned by a box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CellRange {
    min_x: usize,
    max_x: usize,
    min_y: usize,
    max_y: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridStats {
    pub columns: usize,
    pub rows: usize,
    pub boxes: usize,
    pub occupied_cells: usize,
    pub bucket_entries: usize,
    pub max_bucket_len: usize,
}

#[derive(Debug, Clone)]
pub struct CollisionGrid {
    bound: BoundingBox,
    cell_width: f32,
    cell_height: f32,
    num_horiz_cells: usize,
    num_vert_cells: usize,
    /// Flat row-major cells; cell `(i, j)` lives at `j * num_horiz_cells + i`.
    /// Each bucket holds indices into `boxes`.
    cells: Vec<Vec<usize>>,
    /// Accepted boxes in acceptance order.
    boxes: Vec<BoundingBox>,
}

impl CollisionGrid {
    /// Creates an empty grid over `bound`.
    ///
    /// # Panics
    ///
    /// Panics when a cell dimension is not a positive finite number or the
    /// bound is inverted or non-finite. Use [`CollisionGrid::try_new`] to get
    /// an error instead.
    pub fn new(bound: BoundingBox, cell_width: f32, cell_height: f32) -> Self {
        match Self::try_new(bound, cell_width, cell_height) {
            Ok(grid) => grid,
            Err(err) => panic!("invalid collision grid: {err}"),
        }
    }

    pub fn try_new(bound: BoundingBox, cell_width: f32, cell_height: f32) -> Result<Self, GridError> {
        if !(cell_width.is_finite() && cell_width > 0.0) {
            return Err(GridError::InvalidCellWidth(cell_width));
        }
        if !(cell_height.is_finite() && cell_height > 0.0) {
            return Err(GridError::InvalidCellHeight(cell_height));
        }
        let finite = [bound.lo_x, bound.lo_y, bound.hi_x, bound.hi_y]
            .iter()
            .all(|v| v.is_finite());
        if !finite {
            return Err(GridError::NonFiniteBound(bound));
        }
        if bound.is_inverted() {
            return Err(GridError::InvertedBound(bound));
        }

        // A zero-extent axis still gets one cell.
        let num_horiz_cells = ((box_width(&bound) / cell_width).ceil() as usize).max(1);
        let num_vert_cells = ((box_height(&bound) / cell_height).ceil() as usize).max(1);
        let cell_count = num_horiz_cells
            .checked_mul(num_vert_cells)
            .filter(|count| *count <= isize::MAX as usize / std::mem::size_of::<Vec<usize>>())
            .ok_or(GridError::TooManyCells {
                columns: num_horiz_cells,
                rows: num_vert_cells,
            })?;

        Ok(Self {
            bound,
            cell_width,
            cell_height,
            num_horiz_cells,
            num_vert_cells,
            cells: vec![Vec::new(); cell_count],
            boxes: Vec::new(),
        })
    }

    /// Checks `bbox` against every box already placed in the cells it spans
    /// and records it when nothing conflicts. With `just_test` the grid is
    /// left untouched.
    ///
    /// Returns `false` both for boxes entirely outside the bound and for
    /// boxes that intersect an earlier one; see [`CollisionGrid::place`] to
    /// tell the two apart.
    pub fn insert(&mut self, bbox: BoundingBox, just_test: bool) -> bool {
        self.place(bbox, just_test).is_accepted()
    }

    /// Read-only form of `insert(bbox, true)`.
    pub fn fits(&self, bbox: &BoundingBox) -> bool {
        self.scan(bbox).is_ok()
    }

    pub fn place(&mut self, bbox: BoundingBox, just_test: bool) -> Placement {
        let range = match self.scan(&bbox) {
            Ok(range) => range,
            Err(rejection) => return rejection,
        };
        if just_test {
            return Placement::Fits;
        }

        let idx = self.boxes.len();
        self.boxes.push(bbox);
        for j in range.min_y..=range.max_y {
            let row = j * self.num_horiz_cells;
            for i in range.min_x..=range.max_x {
                self.cells[row + i].push(idx);
            }
        }
        Placement::Placed
    }

    fn scan(&self, bbox: &BoundingBox) -> Result<CellRange, Placement> {
        let bound = &self.bound;
        let has_nan = [bbox.lo_x, bbox.lo_y, bbox.hi_x, bbox.hi_y]
            .iter()
            .any(|v| v.is_nan());
        if has_nan
            || bbox.hi_x < bound.lo_x
            || bbox.lo_x > bound.hi_x
            || bbox.hi_y < bound.lo_y
            || bbox.lo_y > bound.hi_y
        {
            return Err(Placement::OutOfBounds);
        }

        let range = CellRange {
            min_x: self.cell_x(bbox.lo_x),
            max_x: self.cell_x(bbox.hi_x),
            min_y: self.cell_y(bbox.lo_y),
            max_y: self.cell_y(bbox.hi_y),
        };
        for j in range.min_y..=range.max_y {
            let row = j * self.num_horiz_cells;
            for i in range.min_x..=range.max_x {
                let hit = self.cells[row + i]
                    .iter()
                    .any(|&idx| boxes_intersect(bbox, &self.boxes[idx]));
                if hit {
                    return Err(Placement::Collision);
                }
            }
        }
        Ok(range)
    }

    /// Column index of the cell containing `x`, clamped to the grid.
    fn cell_x(&self, x: f32) -> usize {
        clamp_cell((x - self.bound.lo_x) / self.cell_width, self.num_horiz_cells)
    }

    /// Row index of the cell containing `y`, clamped to the grid.
    fn cell_y(&self, y: f32) -> usize {
        clamp_cell((y - self.bound.lo_y) / self.cell_height, self.num_vert_cells)
    }

    pub fn bound(&self) -> BoundingBox {
        self.bound
    }

    pub fn cell_width(&self) -> f32 {
        self.cell_width
    }

    pub fn cell_height(&self) -> f32 {
        self.cell_height
    }

    pub fn num_horiz_cells(&self) -> usize {
        self.num_horiz_cells
    }

    pub fn num_vert_cells(&self) -> usize {
        self.num_vert_cells
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Number of accepted boxes.
    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    pub fn boxes(&self) -> &[BoundingBox] {
        &self.boxes
    }

    /// Boxes recorded in cell `(i, j)`, or `None` when the cell is outside the
    /// grid.
    pub fn cell(&self, i: usize, j: usize) -> Option<impl Iterator<Item = &BoundingBox> + '_> {
        if i >= self.num_horiz_cells || j >= self.num_vert_cells {
            return None;
        }
        let bucket = &self.cells[j * self.num_horiz_cells + i];
        Some(bucket.iter().map(|&idx| &self.boxes[idx]))
    }

    pub fn stats(&self) -> GridStats {
        let mut stats = GridStats {
            columns: self.num_horiz_cells,
            rows: self.num_vert_cells,
            boxes: self.boxes.len(),
            ..GridStats::default()
        };
        for bucket in &self.cells {
            if bucket.is_empty() {
                continue;
            }
            stats.occupied_cells += 1;
            stats.bucket_entries += bucket.len();
            stats.max_bucket_len = stats.max_bucket_len.max(bucket.len());
        }
        stats
    }
}

fn clamp_cell(offset: f32, count: usize) -> usize {
    let cell = offset.floor();
    // NaN and negative offsets land in the first cell.
    if !(cell > 0.0) {
        return 0;
    }
    (cell as usize).min(count - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bb(lo_x: f32, lo_y: f32, hi_x: f32, hi_y: f32) -> BoundingBox {
        BoundingBox::new(lo_x, lo_y, hi_x, hi_y)
    }

    fn grid_100() -> CollisionGrid {
        CollisionGrid::new(bb(0.0, 0.0, 100.0, 100.0), 10.0, 10.0)
    }

    #[test]
    fn cell_counts_round_up() {
        let grid = CollisionGrid::new(bb(0.0, 0.0, 100.0, 50.0), 30.0, 25.0);
        assert_eq!(grid.num_horiz_cells(), 4);
        assert_eq!(grid.num_vert_cells(), 2);
        assert_eq!(grid.cell_count(), 8);
        assert!(grid.is_empty());
    }

    #[test]
    fn cell_counts_for_offset_bound() {
        let grid = CollisionGrid::new(bb(-50.0, 20.0, 50.0, 70.0), 25.0, 10.0);
        assert_eq!(grid.num_horiz_cells(), 4);
        assert_eq!(grid.num_vert_cells(), 5);
    }

    #[test]
    fn zero_extent_axis_gets_one_cell() {
        let grid = CollisionGrid::new(bb(0.0, 0.0, 0.0, 40.0), 10.0, 10.0);
        assert_eq!(grid.num_horiz_cells(), 1);
        assert_eq!(grid.num_vert_cells(), 4);
    }

    #[test]
    fn invalid_cell_sizes_are_errors() {
        let bound = bb(0.0, 0.0, 10.0, 10.0);
        assert_eq!(
            CollisionGrid::try_new(bound, 0.0, 1.0).unwrap_err(),
            GridError::InvalidCellWidth(0.0)
        );
        assert_eq!(
            CollisionGrid::try_new(bound, 1.0, -2.0).unwrap_err(),
            GridError::InvalidCellHeight(-2.0)
        );
        assert!(matches!(
            CollisionGrid::try_new(bound, f32::NAN, 1.0),
            Err(GridError::InvalidCellWidth(_))
        ));
        assert!(matches!(
            CollisionGrid::try_new(bb(10.0, 0.0, 0.0, 10.0), 1.0, 1.0),
            Err(GridError::InvertedBound(_))
        ));
        assert!(matches!(
            CollisionGrid::try_new(bb(0.0, 0.0, f32::INFINITY, 10.0), 1.0, 1.0),
            Err(GridError::NonFiniteBound(_))
        ));
    }

    #[test]
    #[should_panic(expected = "invalid collision grid")]
    fn new_panics_on_zero_cell_width() {
        let _ = CollisionGrid::new(bb(0.0, 0.0, 10.0, 10.0), 0.0, 1.0);
    }

    #[test]
    fn placement_scenario() {
        let mut grid = grid_100();
        assert!(grid.insert(bb(0.0, 0.0, 15.0, 15.0), false));
        assert!(grid.insert(bb(20.0, 0.0, 35.0, 15.0), false));
        assert!(!grid.insert(bb(10.0, 10.0, 25.0, 25.0), false));
        assert!(!grid.insert(bb(200.0, 200.0, 210.0, 210.0), false));
        assert_eq!(grid.len(), 2);
    }

    #[test]
    fn rejects_boxes_fully_outside_bound() {
        let mut grid = grid_100();
        let outside = [
            bb(-20.0, 10.0, -0.5, 20.0),
            bb(100.5, 10.0, 120.0, 20.0),
            bb(10.0, -30.0, 20.0, -1.0),
            bb(10.0, 101.0, 20.0, 110.0),
        ];
        for bbox in outside {
            assert_eq!(grid.place(bbox, false), Placement::OutOfBounds);
            assert!(!grid.insert(bbox, true));
        }
        assert!(grid.is_empty());
        assert_eq!(grid.stats().bucket_entries, 0);
    }

    #[test]
    fn first_in_bounds_insert_succeeds() {
        let mut grid = grid_100();
        assert_eq!(grid.place(bb(42.0, 42.0, 58.0, 61.0), false), Placement::Placed);
        assert_eq!(grid.boxes(), &[bb(42.0, 42.0, 58.0, 61.0)]);
    }

    #[test]
    fn overlap_rejected_and_stays_rejected() {
        let mut grid = grid_100();
        assert!(grid.insert(bb(10.0, 10.0, 30.0, 20.0), false));
        let b = bb(25.0, 15.0, 45.0, 25.0);
        assert_eq!(grid.place(b, false), Placement::Collision);
        assert!(!grid.insert(b, true));
        assert!(!grid.fits(&b));
        assert_eq!(grid.len(), 1);
    }

    #[test]
    fn touching_edge_counts_as_collision() {
        let mut grid = grid_100();
        assert!(grid.insert(bb(10.0, 10.0, 20.0, 20.0), false));
        assert!(!grid.insert(bb(20.0, 12.0, 30.0, 18.0), false));
        assert!(!grid.insert(bb(12.0, 20.0, 18.0, 30.0), false));
        assert!(grid.insert(bb(20.5, 12.0, 30.0, 18.0), false));
    }

    #[test]
    fn same_cells_but_disjoint_boxes_are_accepted() {
        let mut grid = CollisionGrid::new(bb(0.0, 0.0, 100.0, 100.0), 50.0, 50.0);
        assert!(grid.insert(bb(1.0, 1.0, 10.0, 10.0), false));
        assert!(grid.insert(bb(20.0, 1.0, 30.0, 10.0), false));
        assert!(grid.insert(bb(1.0, 20.0, 10.0, 30.0), false));
        assert_eq!(grid.cell(0, 0).map(|c| c.count()), Some(3));
    }

    #[test]
    fn disjoint_boxes_accepted_in_any_order() {
        let boxes = [
            bb(0.0, 0.0, 9.0, 9.0),
            bb(12.0, 0.0, 28.0, 6.0),
            bb(40.0, 40.0, 75.0, 48.0),
            bb(0.0, 60.0, 99.0, 70.0),
            bb(85.0, 0.0, 99.0, 30.0),
        ];
        let mut forward = grid_100();
        let mut backward = grid_100();
        assert!(boxes.iter().all(|b| forward.insert(*b, false)));
        assert!(boxes.iter().rev().all(|b| backward.insert(*b, false)));
        assert_eq!(forward.len(), backward.len());
        assert_eq!(forward.stats().bucket_entries, backward.stats().bucket_entries);
    }

    #[test]
    fn just_test_never_mutates() {
        let mut grid = grid_100();
        let b = bb(30.0, 30.0, 45.0, 38.0);
        let c = bb(60.0, 30.0, 70.0, 38.0);
        for _ in 0..5 {
            assert_eq!(grid.place(b, true), Placement::Fits);
        }
        assert!(grid.is_empty());
        assert!(grid.insert(c, false));
        assert!(grid.insert(b, false));
        assert_eq!(grid.len(), 2);
    }

    #[test]
    fn box_is_recorded_in_every_spanned_cell() {
        let mut grid = grid_100();
        assert!(grid.insert(bb(5.0, 5.0, 25.0, 15.0), false));
        for (i, j) in [(0, 0), (1, 0), (2, 0), (0, 1), (1, 1), (2, 1)] {
            assert_eq!(grid.cell(i, j).map(|c| c.count()), Some(1), "cell ({i}, {j})");
        }
        assert_eq!(grid.cell(3, 0).map(|c| c.count()), Some(0));
        assert!(grid.cell(10, 0).is_none());
        let stats = grid.stats();
        assert_eq!(stats.occupied_cells, 6);
        assert_eq!(stats.bucket_entries, 6);
        assert_eq!(stats.max_bucket_len, 1);
    }

    #[test]
    fn box_reaching_bound_edge_uses_last_cell() {
        let mut grid = grid_100();
        assert!(grid.insert(bb(95.0, 95.0, 100.0, 100.0), false));
        assert_eq!(grid.cell(9, 9).map(|c| c.count()), Some(1));
        assert!(!grid.insert(bb(99.0, 99.0, 100.0, 100.0), false));
    }

    #[test]
    fn overhanging_boxes_are_clamped_into_border_cells() {
        let mut grid = grid_100();
        assert!(grid.insert(bb(92.0, -15.0, 130.0, 4.0), false));
        assert_eq!(grid.cell(9, 0).map(|c| c.count()), Some(1));
        assert!(!grid.insert(bb(120.0, -12.0, 140.0, 2.0).translate(-25.0, 0.0), false));
        assert!(grid.insert(bb(-40.0, 50.0, 3.0, 55.0), false));
        assert_eq!(grid.cell(0, 5).map(|c| c.count()), Some(1));
    }

    #[test]
    fn nan_box_is_refused_and_never_stored() {
        let mut grid = grid_100();
        let weird = bb(f32::NAN, 10.0, 20.0, 20.0);
        assert_eq!(grid.place(weird, true), Placement::OutOfBounds);
        assert!(!grid.insert(weird, false));
        assert!(!grid.fits(&weird));
        assert!(grid.is_empty());
        assert_eq!(grid.stats().bucket_entries, 0);
        assert!(grid.insert(bb(5.0, 10.0, 20.0, 20.0), false));
    }
}
