//! Coordinate grid used to approximate proximity between segments.
//!
//! Each polyline is densified so no edge is longer than half a cell, every
//! resulting point is snapped to the nearest multiple of the cell size and
//! the segment is registered in each cell it passes through. Two populated cells are
//! adjacent when they are at most one cell apart on both axes, which turns
//! "are these segments close?" into a flood fill over cells.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use geo::{Coord, Densify, Euclidean, MultiLineString};

/// Integer grid coordinates of a cell. Ordered by row (latitude) and then
/// column (longitude).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellKey {
    /// `round(lat / cell_size)`.
    pub row: i64,
    /// `round(lng / cell_size)`.
    pub col: i64,
}

impl CellKey {
    /// Snaps a `(lng, lat)` coordinate to its cell.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn snap(coord: &Coord<f64>, cell_size: f64) -> Self {
        Self {
            row: (coord.y / cell_size).round() as i64,
            col: (coord.x / cell_size).round() as i64,
        }
    }

    /// Returns `true` if `other` is this cell or one of its 8 neighbours.
    #[must_use]
    pub const fn is_adjacent(self, other: Self) -> bool {
        self.row.abs_diff(other.row) <= 1 && self.col.abs_diff(other.col) <= 1
    }

    /// The 8 surrounding cells.
    pub fn neighbours(self) -> impl Iterator<Item = Self> {
        (-1..=1_i64).flat_map(move |dr| {
            (-1..=1_i64).filter_map(move |dc| {
                if dr == 0 && dc == 0 {
                    None
                } else {
                    Some(Self {
                        row: self.row.saturating_add(dr),
                        col: self.col.saturating_add(dc),
                    })
                }
            })
        })
    }
}

/// Cell registrations for one group of segments.
///
/// Members are identified by their position in the group (`0..n`), in the
/// order they were registered.
#[derive(Debug, Clone)]
pub struct CellGrid {
    cell_size: f64,
    cells: BTreeMap<CellKey, Vec<usize>>,
    member_cells: Vec<Vec<CellKey>>,
}

impl CellGrid {
    /// Creates an empty grid. `cell_size` must be finite and positive.
    #[must_use]
    pub const fn new(cell_size: f64) -> Self {
        Self {
            cell_size,
            cells: BTreeMap::new(),
            member_cells: Vec::new(),
        }
    }

    /// Registers the next member against every cell its vertices fall in
    /// and returns its member position.
    pub fn register<'a>(&mut self, coords: impl IntoIterator<Item = &'a Coord<f64>>) -> usize {
        let member = self.member_cells.len();

        let touched: BTreeSet<CellKey> = coords
            .into_iter()
            .map(|c| CellKey::snap(c, self.cell_size))
            .collect();

        for &cell in &touched {
            self.cells.entry(cell).or_default().push(member);
        }
        self.member_cells.push(touched.into_iter().collect());

        member
    }

    /// Registers the next member against every cell its polylines pass
    /// through, not only the cells holding its vertices.
    pub fn register_polylines(&mut self, lines: &MultiLineString<f64>) -> usize {
        let dense = Euclidean.densify(lines, self.cell_size / 2.0);

        for line in &dense.0 {
            debug_assert!(line.0.windows(2).all(|pair| {
                CellKey::snap(&pair[0], self.cell_size)
                    .is_adjacent(CellKey::snap(&pair[1], self.cell_size))
            }));
        }

        self.register(dense.0.iter().flat_map(|line| line.0.iter()))
    }

    /// Number of populated cells.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Partitions the members into connected components.
    ///
    /// Cells are the graph nodes. A cell is linked to its populated
    /// neighbours and to every other cell touched by one of its members,
    /// so a member never ends up in two components. Components are
    /// returned ordered by their smallest cell; members within a component
    /// are ascending. Members that touched no cell appear in no component.
    #[must_use]
    pub fn components(&self) -> Vec<Vec<usize>> {
        let mut visited: BTreeSet<CellKey> = BTreeSet::new();
        let mut member_seen = vec![false; self.member_cells.len()];
        let mut components = Vec::new();

        // Ascending iteration means each start cell is the smallest cell of
        // its component, which fixes the component order.
        for &start in self.cells.keys() {
            if !visited.insert(start) {
                continue;
            }

            let mut queue = VecDeque::from([start]);
            let mut members = Vec::new();

            while let Some(cell) = queue.pop_front() {
                for &member in self.cells.get(&cell).into_iter().flatten() {
                    if member_seen[member] {
                        continue;
                    }
                    member_seen[member] = true;
                    members.push(member);

                    for &other in &self.member_cells[member] {
                        if visited.insert(other) {
                            queue.push_back(other);
                        }
                    }
                }

                for neighbour in cell.neighbours() {
                    if self.cells.contains_key(&neighbour) && visited.insert(neighbour) {
                        queue.push_back(neighbour);
                    }
                }
            }

            members.sort_unstable();
            components.push(members);
        }

        components
    }
}
