use progress_data::ProgressState;
use stage_schema::{GroupId, StageCatalog, StageId};

use crate::time::{secs_to_millis, Millis};

/// Rows, columns and diagonals of a 3×3 grid, cells numbered row-major.
pub const BINGO_LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

const GRID_CELLS: usize = 9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GroupBingo {
    pub lines: u32,
    pub is_all_bingo: bool,
}

/// Grid cells of a group: its non-exam stages in id order, when there are
/// exactly nine of them.
pub fn grid_cells(stages: &StageCatalog, group: GroupId) -> Option<Vec<StageId>> {
    let cells: Vec<StageId> = stages
        .group_stages(group)
        .filter(|s| !s.is_exam)
        .map(|s| s.id)
        .collect();
    (cells.len() == GRID_CELLS).then_some(cells)
}

/// A line scores when all three cells are cleared with exactly the same
/// best error.
pub fn check_group_bingo(stages: &StageCatalog, state: &ProgressState, group: GroupId) -> GroupBingo {
    let Some(cells) = grid_cells(stages, group) else {
        return GroupBingo::default();
    };
    let diffs: Vec<Option<Millis>> = cells
        .iter()
        .map(|id| state.best_diff(*id).map(secs_to_millis))
        .collect();

    let lines = BINGO_LINES
        .iter()
        .filter(|[a, b, c]| match (diffs[*a], diffs[*b], diffs[*c]) {
            (Some(a), Some(b), Some(c)) => a == b && b == c,
            _ => false,
        })
        .count() as u32;

    let is_all_bingo = match diffs[0] {
        Some(first) => diffs.iter().all(|d| *d == Some(first)),
        None => false,
    };

    GroupBingo { lines, is_all_bingo }
}

pub fn total_bingo_lines(stages: &StageCatalog, state: &ProgressState) -> u32 {
    stages
        .groups()
        .into_iter()
        .map(|g| check_group_bingo(stages, state, g).lines)
        .sum()
}

pub fn all_bingo_count(stages: &StageCatalog, state: &ProgressState) -> u32 {
    stages
        .groups()
        .into_iter()
        .filter(|g| check_group_bingo(stages, state, *g).is_all_bingo)
        .count() as u32
}
