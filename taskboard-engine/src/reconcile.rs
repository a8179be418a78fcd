//! Column reconciliation
//!
//! Turns a board's current column list and a requested one into the final
//! list plus the task migrations it implies. The work is split in two:
//!
//! - [`diff_columns`] is pure: it matches requested entries against existing
//!   columns by id, decides which columns are retained, added or removed, and
//!   whether the fallback column must stay.
//! - [`Reconciler::reconcile`] reads the tasks of removed columns, appends them
//!   to the fallback column and packages everything as one [`Changeset`].
//!
//! Matching by id is rename-in-place: the column keeps its identity and its
//! tasks, only its title changes. A requested entry whose id is unknown is a
//! new column and gets a fresh id. A new entry titled like the fallback column
//! resolves to the fallback column itself so the board never carries two
//! columns with that title.
//!
//! Task titles are unique per column, so a migrated task whose title is
//! already taken in the fallback column is renamed with [`free_title`].

use crate::allocator::allocate_for_insert;
use crate::error::Result;
use crate::store::{Changeset, Repository, TaskFilter};
use crate::types::{Board, Column, ColumnId, ColumnSpec, Task};
use crate::validate::{ensure_distinct_titles, validate_column_specs};
use std::collections::HashSet;
use taskboard_config::{EngineConfig, FallbackPolicy};
use tracing::{debug, info};

/// Result of matching a requested column list against a board
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDiff {
    /// Retained and new columns in request order
    pub columns: Vec<Column>,
    /// Existing columns absent from the request, in board order
    pub removed: Vec<Column>,
    /// The board's fallback column, carrying its requested title if renamed
    pub fallback: Column,
    /// Whether the fallback must end up in the list regardless of tasks
    pub keep_fallback: bool,
}

impl ColumnDiff {
    /// Whether the fallback column is among the requested columns
    pub fn includes_fallback(&self) -> bool {
        self.columns.iter().any(|c| c.id == self.fallback.id)
    }

    /// Final column list, given whether any task ended up in the fallback
    pub fn final_columns(&self, fallback_populated: bool) -> Vec<Column> {
        let mut columns = self.columns.clone();
        if (fallback_populated || self.keep_fallback) && !self.includes_fallback() {
            columns.push(self.fallback.clone());
        }
        columns
    }
}

/// Match `requested` against the board's columns.
///
/// `requested` must already have passed [`validate_column_specs`].
pub fn diff_columns(board: &Board, requested: &[ColumnSpec], policy: FallbackPolicy) -> ColumnDiff {
    let mut fallback = board.fallback_column.clone();
    let mut columns = Vec::with_capacity(requested.len());

    for spec in requested {
        let title = spec.normalized_title();
        let known = spec
            .id
            .as_ref()
            .filter(|id| board.has_column(id) || **id == fallback.id);

        let column = match known {
            Some(id) => Column::with_id(id.clone(), &title),
            None if title == fallback.title => Column::with_id(fallback.id.clone(), &title),
            None => Column::new(&title),
        };

        if column.id == fallback.id {
            fallback.title = column.title.clone();
        }
        columns.push(column);
    }

    let removed = board
        .columns
        .iter()
        .filter(|existing| !columns.iter().any(|c| c.id == existing.id))
        .cloned()
        .collect();

    ColumnDiff {
        columns,
        removed,
        fallback,
        keep_fallback: policy == FallbackPolicy::Eager,
    }
}

/// `title`, or the first of `title (2)`, `title (3)`, ... whose
/// case-insensitive form is not in `taken`
pub fn free_title(title: &str, taken: &HashSet<String>) -> String {
    if !taken.contains(&title.to_lowercase()) {
        return title.to_string();
    }
    (2..)
        .map(|n| format!("{title} ({n})"))
        .find(|candidate| !taken.contains(&candidate.to_lowercase()))
        .unwrap_or_else(|| title.to_string())
}

/// A reconciled board ready to be committed
#[derive(Debug, Clone)]
pub struct Reconciliation {
    /// The board carrying its final column list
    pub board: Board,
    /// Board save followed by the migrated task saves
    pub changeset: Changeset,
    /// Number of tasks moved into the fallback column
    pub migrated: usize,
    /// Ids of the columns that left the board
    pub removed: Vec<ColumnId>,
}

/// Applies a requested column list to a board
pub struct Reconciler<'a> {
    repo: &'a dyn Repository,
    config: &'a EngineConfig,
}

impl<'a> Reconciler<'a> {
    pub fn new(repo: &'a dyn Repository, config: &'a EngineConfig) -> Self {
        Self { repo, config }
    }

    /// Compute the board's new column list and the task migrations it needs.
    ///
    /// Nothing is written; commit the returned changeset to apply it.
    pub async fn reconcile(&self, board: &Board, requested: &[ColumnSpec]) -> Result<Reconciliation> {
        validate_column_specs(requested, &self.config.column_title)?;

        let diff = diff_columns(board, requested, self.config.fallback.policy);
        let fallback_id = diff.fallback.id.clone();

        let mut changeset = Changeset::new();
        let mut fallback_populated = false;
        let mut migrated = 0;

        if !diff.removed.is_empty() {
            let resident = self
                .repo
                .find_tasks(&TaskFilter::board(&board.id).in_column(&fallback_id))
                .await?;
            let max = resident.last().map(|t| t.position);
            fallback_populated = max.is_some();
            let mut next = allocate_for_insert(max);
            let mut taken: HashSet<String> = resident.iter().map(Task::title_key).collect();

            for column in diff.removed.iter().filter(|c| c.id != fallback_id) {
                let filter = TaskFilter::board(&board.id).in_column(&column.id);
                for mut task in self.repo.find_tasks(&filter).await? {
                    let title = free_title(&task.title, &taken);
                    if title != task.title {
                        info!(
                            task_id = %task.id,
                            from = %task.title,
                            to = %title,
                            "Renamed migrated task to keep titles unique in the fallback column"
                        );
                        task.title = title;
                    }
                    taken.insert(task.title_key());
                    task.place(fallback_id.clone(), next);
                    changeset.save(task);
                    next += 1;
                    migrated += 1;
                }
            }
            fallback_populated |= migrated > 0;
        }

        let columns = diff.final_columns(fallback_populated);
        ensure_distinct_titles(&columns)?;

        let mut updated = board.clone();
        updated.fallback_column = diff.fallback.clone();
        updated.columns = columns;
        updated.touch();

        let removed: Vec<ColumnId> = diff
            .removed
            .iter()
            .filter(|c| !updated.has_column(&c.id))
            .map(|c| c.id.clone())
            .collect();

        if migrated > 0 {
            info!(
                board_id = %board.id,
                column_id = %fallback_id,
                migrated,
                "Migrated tasks of removed columns to the fallback column"
            );
        }
        debug!(
            board_id = %board.id,
            columns = updated.columns.len(),
            removed = removed.len(),
            "Reconciled board columns"
        );

        Ok(Reconciliation {
            changeset: Changeset {
                board: Some(updated.clone()),
                tasks: changeset.tasks,
            },
            board: updated,
            migrated,
            removed,
        })
    }
}
