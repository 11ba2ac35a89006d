//! # Data Table Component
//!
//! Generic, sortable, non-paginated table. Rows come already projected
//! through the entity's column definitions; the table only orders, formats
//! and lays them out, and hands the clicked row back to the page.

use condo_model::{
    ColumnDef, Placeholder, RenderedCell, Row, SortMemo, SortState, Tone, footer_count, row_key,
};
use dioxus::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

// ============================================================================
// Component Props
// ============================================================================

#[derive(Props, Clone, PartialEq)]
pub struct DataTableProps {
    /// Heading above the table
    #[props(default = "Gestionar".to_string())]
    pub title: String,

    pub columns: Vec<ColumnDef>,

    /// Rows in load order; a new `Arc` means a new collection
    pub rows: Arc<[Row]>,

    #[props(default = false)]
    pub loading: bool,

    #[props(default = "Sin registros".to_string())]
    pub empty_message: String,

    #[props(default = "Opciones".to_string())]
    pub actions_label: String,

    /// Tighter row spacing
    #[props(default = false)]
    pub compact: bool,

    /// Whether the deleted-records view is active
    #[props(default = false)]
    pub deleted_active: bool,

    #[props(default)]
    pub on_create: Option<EventHandler<()>>,

    #[props(default)]
    pub on_edit: Option<EventHandler<Row>>,

    #[props(default)]
    pub on_delete: Option<EventHandler<Row>>,

    /// Shows the "Ver Eliminados" / "Ver Activos" button when set
    #[props(default)]
    pub on_toggle_deleted: Option<EventHandler<()>>,
}

// ============================================================================
// Main Component
// ============================================================================

/// Sortable table with optional create/edit/delete actions
#[component]
pub fn DataTable(props: DataTableProps) -> Element {
    let mut sort = use_signal(SortState::unsorted);
    let memo = use_hook(|| Rc::new(RefCell::new(SortMemo::new())));

    let order = memo.borrow_mut().order(&props.rows, &sort.read());
    let placeholder = Placeholder::for_state(props.loading, props.rows.len());
    let count = footer_count(props.loading, props.rows.len());
    let has_row_actions = props.on_edit.is_some() || props.on_delete.is_some();
    let span = column_span(props.columns.len(), has_row_actions);
    let table_class = table_class(props.compact);

    rsx! {
        div {
            class: "table-card",

            // Header with title and table-level actions
            div {
                class: "table-header",
                h2 { class: "table-title", "{props.title}" }
                div {
                    class: "table-actions",
                    if let Some(on_toggle) = props.on_toggle_deleted {
                        button {
                            class: "btn btn-secondary",
                            onclick: move |_| on_toggle.call(()),
                            "{deleted_toggle_label(props.deleted_active)}"
                        }
                    }
                    if let Some(on_create) = props.on_create {
                        button {
                            class: "btn btn-primary",
                            onclick: move |_| on_create.call(()),
                            span { class: "label-wide", "Crear nuevo" }
                            span { class: "label-narrow", "＋" }
                        }
                    }
                }
            }

            div {
                class: "table-scroll",
                table {
                    class: "{table_class}",
                    thead {
                        tr {
                            for column in props.columns.iter().cloned() {
                                HeaderCell {
                                    key: "{column.key}",
                                    indicator: sort.read().indicator(&column).map(|i| i.glyph()),
                                    on_click: {
                                        let column = column.clone();
                                        move |_| sort.write().toggle(&column)
                                    },
                                    column: column,
                                }
                            }
                            if has_row_actions {
                                th { class: "actions-cell", "{props.actions_label}" }
                            }
                        }
                    }
                    tbody {
                        match placeholder {
                            Some(Placeholder::Loading) => rsx! {
                                tr {
                                    td {
                                        class: "placeholder loading",
                                        colspan: "{span}",
                                        div { class: "dots", span {} span {} span {} }
                                        span { "Cargando..." }
                                    }
                                }
                            },
                            Some(Placeholder::Empty) => rsx! {
                                tr {
                                    td {
                                        class: "placeholder",
                                        colspan: "{span}",
                                        "{props.empty_message}"
                                    }
                                }
                            },
                            None => rsx! {
                                for (position, &index) in order.iter().enumerate() {
                                    BodyRow {
                                        key: "{row_key(&props.rows[index], index)}",
                                        row: props.rows[index].clone(),
                                        columns: props.columns.clone(),
                                        striped: position % 2 == 1,
                                        show_actions: has_row_actions,
                                        on_edit: props.on_edit,
                                        on_delete: props.on_delete,
                                    }
                                }
                            },
                        }
                    }
                }
            }

            div {
                class: "table-footer",
                "Mostrando {count} registros"
            }
        }
    }
}

// ============================================================================
// Sub-components
// ============================================================================

#[component]
fn HeaderCell(
    column: ColumnDef,
    indicator: Option<&'static str>,
    on_click: EventHandler<()>,
) -> Element {
    let sortable_class = if column.sortable { "sortable" } else { "" };
    let hide_class = column.hide_class();
    let style = column
        .width
        .as_ref()
        .map(|w| format!("width: {w};"))
        .unwrap_or_default();

    rsx! {
        th {
            class: "{sortable_class} {hide_class}",
            style: "{style}",
            onclick: move |_| on_click.call(()),
            div {
                class: "header-label",
                span { "{column.label}" }
                if let Some(glyph) = indicator {
                    span { class: "sort-indicator", "{glyph}" }
                }
            }
        }
    }
}

#[component]
fn BodyRow(
    row: Row,
    columns: Vec<ColumnDef>,
    striped: bool,
    show_actions: bool,
    on_edit: Option<EventHandler<Row>>,
    on_delete: Option<EventHandler<Row>>,
) -> Element {
    let cells: Vec<(String, &'static str, RenderedCell)> = columns
        .iter()
        .map(|c| (c.key.clone(), c.hide_class(), c.render(row.get(&c.key))))
        .collect();
    let row_class = if striped { "striped" } else { "" };

    rsx! {
        tr {
            class: "{row_class}",
            for (key, hide_class, cell) in cells {
                td {
                    key: "{key}",
                    class: "{hide_class}",
                    title: cell.title.clone().unwrap_or_default(),
                    if let Some(tone) = cell.tone {
                        span { class: "badge {tone_class(tone)}", "{cell.text}" }
                    } else {
                        "{cell.text}"
                    }
                }
            }
            if show_actions {
                td {
                    class: "actions-cell",
                    div {
                        class: "row-actions",
                        if let Some(on_edit) = on_edit {
                            button {
                                class: "btn btn-small btn-edit",
                                title: "Editar",
                                onclick: {
                                    let row = row.clone();
                                    move |_| on_edit.call(row.clone())
                                },
                                span { class: "label-wide", "Editar" }
                                span { class: "label-narrow", "✎" }
                            }
                        }
                        if let Some(on_delete) = on_delete {
                            button {
                                class: "btn btn-small btn-delete",
                                title: "Eliminar",
                                onclick: {
                                    let row = row.clone();
                                    move |_| on_delete.call(row.clone())
                                },
                                span { class: "label-wide", "Eliminar" }
                                span { class: "label-narrow", "🗑️" }
                            }
                        }
                    }
                }
            }
        }
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Actions get their own column only when a row action exists
fn column_span(columns: usize, has_row_actions: bool) -> usize {
    columns + usize::from(has_row_actions)
}

fn table_class(compact: bool) -> &'static str {
    if compact {
        "data-table compact"
    } else {
        "data-table"
    }
}

fn tone_class(tone: Tone) -> &'static str {
    match tone {
        Tone::Positive => "badge-positive",
        Tone::Negative => "badge-negative",
    }
}

fn deleted_toggle_label(deleted_active: bool) -> &'static str {
    if deleted_active {
        "Ver Activos"
    } else {
        "Ver Eliminados"
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deleted_toggle_label() {
        assert_eq!(deleted_toggle_label(false), "Ver Eliminados");
        assert_eq!(deleted_toggle_label(true), "Ver Activos");
    }

    #[test]
    fn test_column_span() {
        assert_eq!(column_span(4, true), 5);
        assert_eq!(column_span(4, false), 4);
    }

    #[test]
    fn test_table_class() {
        assert_eq!(table_class(false), "data-table");
        assert_eq!(table_class(true), "data-table compact");
    }

    #[test]
    fn test_tone_class() {
        assert_eq!(tone_class(Tone::Positive), "badge-positive");
        assert_eq!(tone_class(Tone::Negative), "badge-negative");
    }
}
