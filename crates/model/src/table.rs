//! Table model
//!
//! Headless state and pure functions behind the sortable data table:
//! flattened rows, the sort cycle, stable ordering with nulls last, the
//! memoized permutation and the loading/empty placeholder.

use crate::column::ColumnDef;
use condo_core::{CellValue, Record, RecordId, record_id};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::Arc;

// ============================================================================
// Row
// ============================================================================

/// A record flattened into the cells its table columns reference
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    /// Record id, used as the render key when present
    pub id: Option<RecordId>,

    /// Cell values keyed by column key
    pub cells: BTreeMap<String, CellValue>,
}

static NULL_CELL: CellValue = CellValue::Null;

impl Row {
    /// Create an empty row
    pub fn new(id: Option<RecordId>) -> Self {
        Self {
            id,
            cells: BTreeMap::new(),
        }
    }

    /// Add a cell
    pub fn with(mut self, key: impl Into<String>, value: impl Into<CellValue>) -> Self {
        self.cells.insert(key.into(), value.into());
        self
    }

    /// Project a record through column definitions
    pub fn project(record: &Record, columns: &[ColumnDef], id_key: &str) -> Self {
        let cells = columns
            .iter()
            .map(|col| (col.key.clone(), col.project(record)))
            .collect();
        Self {
            id: record_id(record, id_key),
            cells,
        }
    }

    /// Cell value for a column, null when absent
    pub fn get(&self, key: &str) -> &CellValue {
        self.cells.get(key).unwrap_or(&NULL_CELL)
    }
}

/// Render key of a row: its id, or its position when it has none
pub fn row_key(row: &Row, index: usize) -> String {
    match row.id {
        Some(id) => id.to_string(),
        None => format!("#{index}"),
    }
}

// ============================================================================
// Sorting
// ============================================================================

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Active sort: at most one column with a direction
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct SortState(Option<(String, SortDirection)>);

/// Header indicator of a sortable column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortIndicator {
    Neutral,
    Ascending,
    Descending,
}

impl SortIndicator {
    /// Glyph shown beside the header label
    pub fn glyph(&self) -> &'static str {
        match self {
            SortIndicator::Neutral => "⇅",
            SortIndicator::Ascending => "▲",
            SortIndicator::Descending => "▼",
        }
    }
}

impl SortState {
    /// Unsorted state
    pub fn unsorted() -> Self {
        Self(None)
    }

    /// Sorted by a column
    pub fn by(key: impl Into<String>, direction: SortDirection) -> Self {
        Self(Some((key.into(), direction)))
    }

    /// Active column and direction
    pub fn active(&self) -> Option<(&str, SortDirection)> {
        self.0.as_ref().map(|(key, dir)| (key.as_str(), *dir))
    }

    /// Advance the cycle for a header click.
    ///
    /// A new column starts ascending; the active column goes ascending to
    /// descending to unsorted. Non-sortable columns leave the state alone.
    pub fn toggle(&mut self, column: &ColumnDef) {
        if !column.sortable {
            return;
        }
        self.0 = match self.0.take() {
            Some((key, SortDirection::Ascending)) if key == column.key => {
                Some((key, SortDirection::Descending))
            }
            Some((key, SortDirection::Descending)) if key == column.key => None,
            _ => Some((column.key.clone(), SortDirection::Ascending)),
        };
        tracing::debug!(column = %column.key, state = ?self.0, "Sort toggled");
    }

    /// Indicator for a column; `None` for non-sortable columns
    pub fn indicator(&self, column: &ColumnDef) -> Option<SortIndicator> {
        if !column.sortable {
            return None;
        }
        Some(match self.active() {
            Some((key, SortDirection::Ascending)) if key == column.key => SortIndicator::Ascending,
            Some((key, SortDirection::Descending)) if key == column.key => {
                SortIndicator::Descending
            }
            _ => SortIndicator::Neutral,
        })
    }
}

/// Compare two cells for a sort direction.
///
/// Nulls go last in both directions. Two numbers compare numerically;
/// anything else compares as lower-cased text.
pub fn compare_cells(a: &CellValue, b: &CellValue, direction: SortDirection) -> Ordering {
    let ordering = match (a, b) {
        (CellValue::Null, CellValue::Null) => return Ordering::Equal,
        (CellValue::Null, _) => return Ordering::Greater,
        (_, CellValue::Null) => return Ordering::Less,
        (a, b) if a.is_numeric() && b.is_numeric() => {
            let (x, y) = (a.as_float().unwrap_or(0.0), b.as_float().unwrap_or(0.0));
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (a, b) => a.to_text().to_lowercase().cmp(&b.to_text().to_lowercase()),
    };
    match direction {
        SortDirection::Ascending => ordering,
        SortDirection::Descending => ordering.reverse(),
    }
}

/// Permutation of row indices for a sort state; identity when unsorted.
///
/// The sort is stable, so rows with equal keys keep their input order.
pub fn sorted_indices(rows: &[Row], state: &SortState) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..rows.len()).collect();
    if let Some((key, direction)) = state.active() {
        indices.sort_by(|&a, &b| compare_cells(rows[a].get(key), rows[b].get(key), direction));
    }
    indices
}

/// Memoized sort permutation.
///
/// Recomputes only when the row collection (by `Arc` identity) or the sort
/// state changes.
#[derive(Debug, Default)]
pub struct SortMemo {
    cached: Option<(Arc<[Row]>, SortState, Arc<[usize]>)>,
}

impl SortMemo {
    /// Create an empty memo
    pub fn new() -> Self {
        Self::default()
    }

    /// Permutation for the given rows and state
    pub fn order(&mut self, rows: &Arc<[Row]>, state: &SortState) -> Arc<[usize]> {
        if let Some((cached_rows, cached_state, order)) = &self.cached {
            if Arc::ptr_eq(cached_rows, rows) && cached_state == state {
                return order.clone();
            }
        }
        let order: Arc<[usize]> = sorted_indices(rows, state).into();
        self.cached = Some((rows.clone(), state.clone(), order.clone()));
        order
    }
}

// ============================================================================
// Placeholder and footer
// ============================================================================

/// What the table body shows instead of rows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    Loading,
    Empty,
}

impl Placeholder {
    /// Placeholder for the current state; loading wins over empty
    pub fn for_state(loading: bool, row_count: usize) -> Option<Placeholder> {
        if loading {
            Some(Placeholder::Loading)
        } else if row_count == 0 {
            Some(Placeholder::Empty)
        } else {
            None
        }
    }
}

/// Record count shown in the footer; zero while loading
pub fn footer_count(loading: bool, row_count: usize) -> usize {
    if loading { 0 } else { row_count }
}

// ============================================================================
// Tests
// ============================================================================
