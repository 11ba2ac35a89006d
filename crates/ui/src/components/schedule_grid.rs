//! # Schedule Grid Component
//!
//! Weekly availability of one common area: hourly rows from 07:00 to 23:00,
//! one column per weekday, open cells tagged with the area badge.

use condo_model::{EMPTY_MESSAGE, WeeklyGrid, short_day};
use dioxus::prelude::*;

#[derive(Props, Clone, PartialEq)]
pub struct ScheduleGridProps {
    pub grid: WeeklyGrid,
}

/// Weekly availability table
#[component]
pub fn ScheduleGrid(props: ScheduleGridProps) -> Element {
    let grid = props.grid;

    if grid.is_empty {
        return rsx! {
            div { class: "schedule-empty", "{EMPTY_MESSAGE}" }
        };
    }

    let headers: Vec<String> = grid.days.iter().map(|(day, _)| short_day(day)).collect();
    let rows: Vec<(String, Vec<bool>)> = grid
        .slots
        .iter()
        .map(|slot| {
            let open = (0..grid.days.len())
                .map(|day| grid.is_available(day, slot))
                .collect();
            (slot.label(), open)
        })
        .collect();

    rsx! {
        div {
            class: "schedule-card",

            div {
                class: "table-scroll",
                table {
                    class: "schedule-grid",
                    thead {
                        tr {
                            th { class: "schedule-hour", "HORARIO" }
                            for header in headers {
                                th { key: "{header}", "{header}" }
                            }
                        }
                    }
                    tbody {
                        for (label, open) in rows {
                            tr {
                                key: "{label}",
                                td { class: "schedule-hour", "{label}" }
                                for (day, available) in open.into_iter().enumerate() {
                                    td {
                                        key: "{day}",
                                        class: "{cell_class(available, grid.color)}",
                                        if available {
                                            "{grid.badge}"
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }

            // Legend
            div {
                class: "schedule-legend",
                span {
                    class: "legend-item",
                    span { class: "legend-swatch {grid.color}" }
                    "Disponible"
                }
                span {
                    class: "legend-item",
                    span { class: "legend-swatch slot-closed" }
                    "No disponible"
                }
                span {
                    class: "legend-count",
                    "{grid.open_slots()} franjas abiertas"
                }
            }
        }
    }
}

fn cell_class(available: bool, color: &str) -> String {
    if available {
        format!("slot {color}")
    } else {
        "slot slot-closed".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_class() {
        assert_eq!(cell_class(true, "slot-green"), "slot slot-green");
        assert_eq!(cell_class(false, "slot-green"), "slot slot-closed");
    }
}
