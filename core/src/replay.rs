use core::fmt;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Player-visible state of a single cell during replay.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Visibility {
    Hidden,
    Revealed,
    Flagged,
    Exploded,
}

impl Default for Visibility {
    fn default() -> Self {
        Self::Hidden
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DisplayCell {
    pub visibility: Visibility,
    pub value: CellValue,
}

impl DisplayCell {
    pub const fn hidden(value: CellValue) -> Self {
        Self {
            visibility: Visibility::Hidden,
            value,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ApplyOutcome {
    Applied,
    /// The move pointed outside the grid and was ignored.
    Skipped,
}

/// Per-cell render model derived from a grid and a prefix of its moves.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayGrid {
    cells: Array2<DisplayCell>,
}

impl DisplayGrid {
    /// Every cell hidden, carrying its transformed value.
    pub fn initial(grid: &Grid) -> Self {
        Self {
            cells: grid
                .cells()
                .map(|&raw| DisplayCell::hidden(CellValue::from_raw(raw))),
        }
    }

    pub fn size(&self) -> Coord2 {
        let (rows, cols) = self.cells.dim();
        (cols as Coord, rows as Coord)
    }

    pub fn cell_at(&self, coords: Coord2) -> Option<DisplayCell> {
        checked_coords(coords, self.size()).map(|coords| self.cells[coords.to_nd_index()])
    }

    /// Cells row by row, top row first.
    pub fn rows(&self) -> impl Iterator<Item = impl Iterator<Item = &DisplayCell>> {
        self.cells.rows().into_iter().map(|row| row.into_iter())
    }

    pub fn count(&self, visibility: Visibility) -> usize {
        self.cells
            .iter()
            .filter(|cell| cell.visibility == visibility)
            .count()
    }

    /// Applies a single move on top of the current state.
    ///
    /// Reveals take the solver's result as the cell value when it has one and keep the existing value otherwise.
    /// Flags only change visibility. Moves on cells that were already revealed are applied anyway, the trace is
    /// trusted over the current state.
    pub fn apply(&mut self, mv: &Move) -> ApplyOutcome {
        let Some(coords) = checked_coords(mv.coords(), self.size()) else {
            return ApplyOutcome::Skipped;
        };
        let cell = &mut self.cells[coords.to_nd_index()];

        match mv.kind {
            MoveKind::Reveal | MoveKind::Exploded => {
                if let Some(result) = mv.result {
                    cell.value = CellValue::from_raw(result);
                }
                cell.visibility = match mv.kind {
                    MoveKind::Exploded => Visibility::Exploded,
                    _ => Visibility::Revealed,
                };
            }
            MoveKind::Flag => {
                cell.visibility = Visibility::Flagged;
            }
        }

        ApplyOutcome::Applied
    }
}

impl fmt::Display for DisplayGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            for cell in row {
                match (cell.visibility, cell.value) {
                    (Visibility::Hidden, _) => f.write_str(".")?,
                    (Visibility::Flagged, _) => f.write_str("F")?,
                    (Visibility::Exploded, _) => f.write_str("X")?,
                    (Visibility::Revealed, CellValue::Number(0)) => f.write_str(" ")?,
                    (Visibility::Revealed, value) => write!(f, "{value}")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Renders from scratch: the initial grid with moves `0..=upto` applied in order.
///
/// `None` shows the initial grid. Targets past the end of the trace clamp to the last move, and holes in the trace
/// are skipped.
pub fn render(grid: &Grid, moves: &MoveList, upto: Option<usize>) -> DisplayGrid {
    let mut display = DisplayGrid::initial(grid);
    let Some(last) = upto.zip(moves.last_index()).map(|(upto, last)| upto.min(last)) else {
        return display;
    };

    let mut skipped = 0;
    for mv in (0..=last).filter_map(|index| moves.get(index)) {
        if display.apply(mv) == ApplyOutcome::Skipped {
            skipped += 1;
        }
    }
    if skipped > 0 {
        log::debug!("skipped {} move(s) outside the grid", skipped);
    }
    display
}

/// Replay cursor and the grid it shows, for one problem.
///
/// The displayed grid is always equal to [`render`] of the problem at [`ReplayState::move_index`], whichever way the
/// cursor got there.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayState {
    problem_id: u32,
    /// Number of trace slots applied, so `0` is the initial grid.
    applied: usize,
    display: DisplayGrid,
}

impl ReplayState {
    pub fn new(problem: &Problem) -> Self {
        Self {
            problem_id: problem.id(),
            applied: 0,
            display: DisplayGrid::initial(problem.grid()),
        }
    }

    pub fn problem_id(&self) -> u32 {
        self.problem_id
    }

    pub fn display(&self) -> &DisplayGrid {
        &self.display
    }

    /// How many moves have been applied so far.
    pub fn applied(&self) -> usize {
        self.applied
    }

    /// Index of the last applied move, `None` when showing the initial grid.
    pub fn move_index(&self) -> Option<usize> {
        self.applied.checked_sub(1)
    }

    pub fn is_at_end(&self, problem: &Problem) -> bool {
        self.applied >= problem.total_moves()
    }

    pub fn reset(&mut self, problem: &Problem) {
        *self = Self::new(problem);
    }

    /// Jumps to `target` by rendering from scratch.
    pub fn seek(&mut self, problem: &Problem, target: Option<usize>) {
        self.ensure_problem(problem);
        let target = target.zip(problem.moves().last_index()).map(|(target, last)| target.min(last));
        self.display = render(problem.grid(), problem.moves(), target);
        self.applied = target.map_or(0, |index| index + 1);
    }

    /// Applies the next move on top of the current grid, returning its index, or `None` at the end of the trace.
    pub fn step_forward(&mut self, problem: &Problem) -> Option<usize> {
        self.ensure_problem(problem);
        if self.is_at_end(problem) {
            return None;
        }

        let index = self.applied;
        match problem.moves().get(index) {
            Some(mv) => {
                if self.display.apply(mv) == ApplyOutcome::Skipped {
                    log::debug!("move {} of problem {} is outside the grid: {:?}", index, problem.id(), mv);
                }
            }
            None => log::debug!("skipping hole at move {} of problem {}", index, problem.id()),
        }
        self.applied += 1;
        Some(index)
    }

    /// Moves back one step, returning whether the cursor changed.
    pub fn step_backward(&mut self, problem: &Problem) -> bool {
        self.ensure_problem(problem);
        match self.move_index() {
            None => false,
            Some(index) => {
                self.seek(problem, index.checked_sub(1));
                true
            }
        }
    }

    fn ensure_problem(&mut self, problem: &Problem) {
        if self.problem_id != problem.id() || self.display.size() != problem.grid().size() {
            log::warn!(
                "replay state for problem {} used with problem {}, resetting",
                self.problem_id,
                problem.id()
            );
            self.reset(problem);
        }
    }
}

impl fmt::Display for ReplayState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.display, f)
    }
}
