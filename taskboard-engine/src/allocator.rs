//! Position allocation
//!
//! Pure arithmetic over positions. Nothing here reads or writes storage; the
//! task operations turn the returned [`Shift`]s into [`PositionShift`]s scoped
//! to a `(board, column)` pair and commit them together with the moved task.

use crate::store::{PositionShift, ShiftRange};
use crate::types::{BoardId, ColumnId};

/// A renumbering of every sibling whose position falls in `range`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shift {
    pub range: ShiftRange,
    pub delta: isize,
}

impl Shift {
    /// Close the gap left at `position`
    pub fn close_gap(position: usize) -> Self {
        Self {
            range: ShiftRange::from(position + 1),
            delta: -1,
        }
    }

    /// Make room at `position`
    pub fn open_slot(position: usize) -> Self {
        Self {
            range: ShiftRange::from(position),
            delta: 1,
        }
    }

    /// Scope the shift to one column
    pub fn in_column(self, board: &BoardId, column: &ColumnId) -> PositionShift {
        PositionShift::new(board.clone(), column.clone(), self.range, self.delta)
    }
}

/// Position of a task appended to a column whose highest position is `max`
pub fn allocate_for_insert(max: Option<usize>) -> usize {
    max.map_or(0, |max| max + 1)
}

/// Outcome of moving a task inside its own column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reorder {
    /// Final position of the moved task
    pub position: usize,
    /// Sibling renumbering, `None` when the task stays put
    pub shift: Option<Shift>,
}

impl Reorder {
    pub fn is_noop(&self) -> bool {
        self.shift.is_none()
    }
}

/// Move a task from `old` to `requested` within a column whose highest
/// position is `max` (the moved task included). Requests past the end
/// clamp to `max`.
pub fn reorder_within_column(old: usize, requested: usize, max: usize) -> Reorder {
    let position = requested.min(max.max(old));
    let shift = if position > old {
        Some(Shift {
            range: ShiftRange::between(old + 1, position),
            delta: -1,
        })
    } else if position < old {
        Some(Shift {
            range: ShiftRange::between(position, old - 1),
            delta: 1,
        })
    } else {
        None
    };
    Reorder { position, shift }
}

/// Outcome of moving a task into another column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transfer {
    /// Renumbering of the column the task leaves
    pub source: Shift,
    /// Renumbering of the column the task enters, `None` when appending
    pub destination: Option<Shift>,
    /// Final position in the destination column
    pub position: usize,
}

/// Move a task at `old` into a column whose highest position is
/// `destination_max`. Without a requested position, or with one past the
/// end, the task is appended.
pub fn move_across_columns(
    old: usize,
    destination_max: Option<usize>,
    requested: Option<usize>,
) -> Transfer {
    let source = Shift::close_gap(old);
    match (requested, destination_max) {
        (Some(requested), Some(max)) if requested <= max => Transfer {
            source,
            destination: Some(Shift::open_slot(requested)),
            position: requested,
        },
        _ => Transfer {
            source,
            destination: None,
            position: allocate_for_insert(destination_max),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Apply a shift to a list of positions the way the repository does
    fn apply(positions: &mut [usize], shift: &Shift) {
        for p in positions.iter_mut() {
            if shift.range.contains(*p) {
                *p = p.saturating_add_signed(shift.delta);
            }
        }
    }

    #[test]
    fn test_insert() {
        assert_eq!(allocate_for_insert(None), 0);
        assert_eq!(allocate_for_insert(Some(0)), 1);
        assert_eq!(allocate_for_insert(Some(6)), 7);
    }

    #[test]
    fn test_reorder_down() {
        // task at 1 moves to 3 in [0..=4]
        let plan = reorder_within_column(1, 3, 4);
        assert_eq!(plan.position, 3);
        assert_eq!(
            plan.shift,
            Some(Shift {
                range: ShiftRange::between(2, 3),
                delta: -1
            })
        );

        let mut siblings = vec![0, 2, 3, 4];
        apply(&mut siblings, &plan.shift.unwrap());
        siblings.push(plan.position);
        siblings.sort();
        assert_eq!(siblings, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_reorder_up() {
        let plan = reorder_within_column(3, 0, 4);
        assert_eq!(plan.position, 0);

        let mut siblings = vec![0, 1, 2, 4];
        apply(&mut siblings, &plan.shift.unwrap());
        assert_eq!(siblings, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_reorder_same_position_is_noop() {
        let plan = reorder_within_column(2, 2, 4);
        assert!(plan.is_noop());
        assert_eq!(plan.position, 2);
    }

    #[test]
    fn test_reorder_clamps_past_end() {
        let plan = reorder_within_column(1, 99, 3);
        assert_eq!(plan.position, 3);

        // already last: clamping lands on the current slot
        let plan = reorder_within_column(3, 99, 3);
        assert!(plan.is_noop());
    }

    #[test]
    fn test_move_across_with_requested_position() {
        // position 2 of a five-task column into a three-task column at 1
        let plan = move_across_columns(2, Some(2), Some(1));
        assert_eq!(plan.position, 1);

        let mut source = vec![0, 1, 3, 4];
        apply(&mut source, &plan.source);
        assert_eq!(source, vec![0, 1, 2, 3]);

        let mut destination = vec![0, 1, 2];
        apply(&mut destination, &plan.destination.unwrap());
        assert_eq!(destination, vec![0, 2, 3]);
    }

    #[test]
    fn test_move_across_appends() {
        let plan = move_across_columns(0, Some(4), None);
        assert_eq!(plan.position, 5);
        assert!(plan.destination.is_none());

        let plan = move_across_columns(0, None, Some(3));
        assert_eq!(plan.position, 0);
        assert!(plan.destination.is_none());
    }

    #[test]
    fn test_move_across_clamps_to_append() {
        let plan = move_across_columns(0, Some(2), Some(10));
        assert_eq!(plan.position, 3);
        assert!(plan.destination.is_none());

        // one past the end is also an append
        let plan = move_across_columns(0, Some(2), Some(3));
        assert_eq!(plan.position, 3);
        assert!(plan.destination.is_none());
    }

    #[test]
    fn test_in_column_scopes_shift() {
        let shift = Shift::close_gap(4).in_column(&BoardId::from("b"), &ColumnId::from("c"));
        assert_eq!(shift.delta, -1);
        assert_eq!(shift.range, ShiftRange::from(5));
        assert_eq!(shift.column, ColumnId::from("c"));
    }
}
