//! Entity Page Component
//!
//! One page serves every catalog entity: it loads the collection with its
//! reference collections, feeds the table, opens the record editor and the
//! delete confirmation, performs the writes and refetches afterwards.
//!
//! Schedules (`horarios`) add a weekly view that shows one area's
//! availability instead of the table.

use condo_client::{ApiClient, ClientError};
use condo_core::{Record, RecordId, record_id};
use condo_model::{EntitySchema, Row, Submission, WeeklyGrid, catalog};
use dioxus::prelude::*;
use std::sync::Arc;

use crate::components::{ConfirmDeleteDialog, DataTable, RecordEditor, ScheduleGrid, Select};
use crate::state::{Editor, PageState, handle_client_error};

/// Entity with the extra weekly view
const SCHEDULE_ENTITY: &str = "horarios";

/// Reference collection the weekly view picks its area from
const AREA_SOURCE: &str = "areas";

// ============================================================================
// Page Component
// ============================================================================

/// Table page for a catalog entity
#[component]
pub fn EntityPage(entity: &'static str) -> Element {
    match catalog().get(entity) {
        Ok(schema) => rsx! {
            EntityView { key: "{entity}", schema: schema }
        },
        Err(e) => {
            tracing::error!("{}", e);
            rsx! {
                div {
                    class: "page-message",
                    h2 { "Página no encontrada" }
                    p { class: "muted", "{e}" }
                }
            }
        }
    }
}

/// Layout of a page with the list/weekly toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Layout {
    #[default]
    List,
    Weekly,
}

#[component]
fn EntityView(schema: &'static EntitySchema) -> Element {
    let api = use_context::<ApiClient>();
    let mut page = use_signal(PageState::new);
    let rows = use_signal(|| Arc::<[Row]>::from(Vec::new()));
    let mut layout = use_signal(Layout::default);

    // Initial load
    {
        let api = api.clone();
        use_hook(move || start_fetch(api, schema, page, rows));
    }

    let state = page.read();
    let loading = state.loading;
    let saving = state.saving;
    let editor = state.editor;
    let editor_key = editor.key();
    let error = state.error.clone();
    let editing_record = state.editing_record(schema).cloned();
    let references = state.references.clone();
    let delete_prompt = state.delete_prompt(schema);
    let records = state.records.clone();
    let areas = references.get(AREA_SOURCE).cloned().unwrap_or_default();
    drop(state);

    let writable = !schema.read_only;
    let has_weekly = schema.name == SCHEDULE_ENTITY;

    // ── Table actions ────────────────────────────────────────────────────
    let on_create = writable.then(|| {
        EventHandler::new(move |_| {
            page.write().open_create();
        })
    });

    let on_edit = writable.then(|| {
        EventHandler::new(move |row: Row| {
            let Some(id) = row.id else {
                tracing::warn!("Row without id cannot be edited");
                return;
            };
            if let Err(e) = page.write().open_edit(schema, id) {
                tracing::warn!("{}", e);
            }
        })
    });

    let on_delete = writable.then(|| {
        EventHandler::new(move |row: Row| {
            let Some(id) = row.id else {
                tracing::warn!("Row without id cannot be deleted");
                return;
            };
            if let Err(e) = page.write().request_delete(schema, id) {
                tracing::warn!("{}", e);
            }
        })
    });

    // ── Writes ───────────────────────────────────────────────────────────
    let on_submit = {
        let api = api.clone();
        move |submission: Submission| {
            page.write().begin_write();
            let api = api.clone();
            spawn(async move {
                let result = api
                    .save(schema, &submission)
                    .await
                    .map(|_| ())
                    .map_err(|e| describe_error(&api, &e));
                if page.write().finish_write(result) {
                    start_fetch(api, schema, page, rows);
                }
            });
        }
    };

    let on_confirm_delete = {
        let api = api.clone();
        move |_| {
            let Some(id) = page.read().pending_delete else {
                return;
            };
            page.write().begin_write();
            let api = api.clone();
            spawn(async move {
                let result = api
                    .remove(schema, id)
                    .await
                    .map_err(|e| describe_error(&api, &e));
                if page.write().finish_write(result) {
                    start_fetch(api, schema, page, rows);
                }
            });
        }
    };

    let current_layout = *layout.read();

    rsx! {
        div {
            class: "entity-page",

            if has_weekly {
                div {
                    class: "layout-toggle",
                    button {
                        class: toggle_class(current_layout == Layout::List),
                        onclick: move |_| layout.set(Layout::List),
                        "📋 Lista"
                    }
                    button {
                        class: toggle_class(current_layout == Layout::Weekly),
                        onclick: move |_| layout.set(Layout::Weekly),
                        "📅 Tabla semanal"
                    }
                }
            }

            // The editor shows its own failures
            if editor == Editor::Closed {
                if let Some(message) = &error {
                    div {
                        class: "alert alert-error",
                        span { "{message}" }
                        button {
                            class: "alert-dismiss",
                            onclick: move |_| page.write().error = None,
                            "✕"
                        }
                    }
                }
            }

            if current_layout == Layout::Weekly && has_weekly {
                WeeklyView {
                    schema: schema,
                    schedules: records,
                    areas: areas,
                    loading: loading,
                }
            } else {
                DataTable {
                    title: schema.title.clone(),
                    columns: schema.columns.clone(),
                    rows: rows.read().clone(),
                    loading: loading,
                    empty_message: empty_message(schema),
                    compact: schema.read_only,
                    on_create: on_create,
                    on_edit: on_edit,
                    on_delete: on_delete,
                }
            }

            if editor != Editor::Closed {
                RecordEditor {
                    key: "{editor_key}",
                    schema: schema,
                    record: editing_record,
                    references: references,
                    saving: saving,
                    error: error.clone(),
                    on_submit: on_submit,
                    on_cancel: move |_| page.write().close_editor(),
                }
            }

            if let Some(message) = delete_prompt {
                ConfirmDeleteDialog {
                    message: message,
                    busy: saving,
                    on_confirm: on_confirm_delete,
                    on_cancel: move |_| page.write().cancel_delete(),
                }
            }
        }
    }
}

// ============================================================================
// Weekly View
// ============================================================================

#[component]
fn WeeklyView(
    schema: &'static EntitySchema,
    schedules: Vec<Record>,
    areas: Vec<Record>,
    loading: bool,
) -> Element {
    let mut selected = use_signal(String::new);

    let options = schema
        .get_reference(AREA_SOURCE)
        .map(|source| source.options(&areas))
        .unwrap_or_default();
    let chosen: Option<RecordId> = selected.read().parse().ok();
    let area = chosen.and_then(|id| areas.iter().find(|a| record_id(a, "id") == Some(id)));
    let grid = area.map(|area| WeeklyGrid::for_area(area, &schedules));

    rsx! {
        div {
            class: "weekly-view",

            div {
                class: "weekly-picker",
                Select {
                    value: selected.read().clone(),
                    options: options,
                    label: Some("Área".to_string()),
                    placeholder: Some("Seleccionar área".to_string()),
                    disabled: loading,
                    on_change: move |v: String| selected.set(v),
                }
            }

            if loading {
                div { class: "schedule-empty", "Cargando..." }
            } else if let Some(grid) = grid {
                ScheduleGrid { grid: grid }
            } else {
                div { class: "schedule-empty", "Seleccione un área para ver su disponibilidad" }
            }
        }
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Load the collection and its references, then publish new rows
fn start_fetch(
    api: ApiClient,
    schema: &'static EntitySchema,
    mut page: Signal<PageState>,
    mut rows: Signal<Arc<[Row]>>,
) {
    page.write().begin_fetch();
    spawn(async move {
        let result = api
            .load_page(schema)
            .await
            .map_err(|e| describe_error(&api, &e));
        if let Ok((records, _)) = &result {
            rows.set(schema.rows(records).into());
        }
        page.write().finish_fetch(result);
    });
}

fn describe_error(api: &ApiClient, err: &ClientError) -> String {
    tracing::error!("Request failed: {}", err);
    handle_client_error(err, api.session())
}

fn empty_message(schema: &EntitySchema) -> String {
    format!("No hay registros de {}", schema.title.to_lowercase())
}

fn toggle_class(active: bool) -> &'static str {
    if active {
        "btn btn-toggle active"
    } else {
        "btn btn-toggle"
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schedule_entity_has_area_source() {
        let schema = catalog().get(SCHEDULE_ENTITY).unwrap();
        assert!(schema.get_reference(AREA_SOURCE).is_some());
    }

    #[test]
    fn test_empty_message_names_entity() {
        let schema = catalog().get("vehiculos").unwrap();
        assert_eq!(empty_message(schema), "No hay registros de vehículos");
        let audit = catalog().get("bitacora").unwrap();
        assert_eq!(empty_message(audit), "No hay registros de bitácora");
    }

    #[test]
    fn test_toggle_class() {
        assert!(toggle_class(true).ends_with("active"));
        assert_eq!(toggle_class(false), "btn btn-toggle");
    }
}
