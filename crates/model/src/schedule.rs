//! Weekly availability grid
//!
//! Turns the opening hours configured for a common area into an hourly
//! grid from 07:00 to 23:00, one column per weekday.

use crate::catalog::WEEKDAYS;
use crate::path::{lookup, scalar_text};
use crate::value::parse_time;
use chrono::NaiveTime;
use condo_core::{Record, RecordId, record_id};

/// First slot start hour
pub const FIRST_HOUR: u32 = 7;

/// Hour the last slot ends
pub const LAST_HOUR: u32 = 23;

/// Cell colors cycled by area id
pub const AREA_COLORS: [&str; 6] = [
    "slot-green",
    "slot-blue",
    "slot-purple",
    "slot-yellow",
    "slot-pink",
    "slot-indigo",
];

/// Shown when the area has no schedules at all
pub const EMPTY_MESSAGE: &str = "No hay horarios configurados para esta área";

// ============================================================================
// Slots and entries
// ============================================================================

/// One hour of the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSlot {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl TimeSlot {
    /// `07:00 - 08:00`
    pub fn label(&self) -> String {
        format!("{} - {}", self.start.format("%H:%M"), self.end.format("%H:%M"))
    }
}

/// All hourly slots of a day
pub fn day_slots() -> Vec<TimeSlot> {
    (FIRST_HOUR..LAST_HOUR)
        .filter_map(|hour| {
            Some(TimeSlot {
                start: NaiveTime::from_hms_opt(hour, 0, 0)?,
                end: NaiveTime::from_hms_opt(hour + 1, 0, 0)?,
            })
        })
        .collect()
}

/// Three-letter column header for a weekday
pub fn short_day(day: &str) -> String {
    day.chars().take(3).collect()
}

/// Opening hours of an area on one day
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleEntry {
    pub area: Option<RecordId>,
    pub day: String,
    pub opens: NaiveTime,
    pub closes: NaiveTime,
    pub active: bool,
}

impl ScheduleEntry {
    /// Read a schedule record; records with unparseable hours yield `None`
    pub fn from_record(record: &Record) -> Option<Self> {
        let text = |key: &str| lookup(record, key).as_ref().and_then(scalar_text);
        Some(Self {
            area: record_id(record, "area"),
            day: text("dia_semana")?,
            opens: parse_time(&text("hora_apertura")?).ok()?,
            closes: parse_time(&text("hora_cierre")?).ok()?,
            active: record
                .get("activo")
                .and_then(|v| v.as_bool())
                .unwrap_or(false),
        })
    }

    /// Whether the whole slot falls inside opening hours
    pub fn covers(&self, slot: &TimeSlot) -> bool {
        slot.start >= self.opens && slot.end <= self.closes
    }
}

// ============================================================================
// WeeklyGrid
// ============================================================================

/// Availability of one area across the week
#[derive(Debug, Clone, PartialEq)]
pub struct WeeklyGrid {
    pub slots: Vec<TimeSlot>,
    /// Effective schedule per weekday, Monday first
    pub days: Vec<(String, Option<ScheduleEntry>)>,
    pub badge: String,
    pub color: &'static str,
    /// No schedules were configured for the area
    pub is_empty: bool,
}

impl WeeklyGrid {
    /// Build the grid for `area` from the schedules loaded for the page
    pub fn for_area(area: &Record, schedules: &[Record]) -> Self {
        let area_id = record_id(area, "id");
        let entries: Vec<ScheduleEntry> = schedules
            .iter()
            .filter_map(ScheduleEntry::from_record)
            .filter(|e| e.area.is_some() && e.area == area_id)
            .collect();
        tracing::debug!(area = ?area_id, entries = entries.len(), "building weekly grid");

        // Only the first active schedule of a day counts
        let days = WEEKDAYS
            .iter()
            .map(|day| {
                let entry = entries.iter().find(|e| e.active && e.day == *day).cloned();
                (day.to_string(), entry)
            })
            .collect();

        let name = lookup(area, "nombre")
            .as_ref()
            .and_then(scalar_text)
            .unwrap_or_default();

        Self {
            slots: day_slots(),
            days,
            badge: area_badge(&name, area_id),
            color: area_color(area_id),
            is_empty: entries.is_empty(),
        }
    }

    /// Whether `slot` is open on the `day_index`-th weekday
    pub fn is_available(&self, day_index: usize, slot: &TimeSlot) -> bool {
        self.days
            .get(day_index)
            .and_then(|(_, entry)| entry.as_ref())
            .is_some_and(|entry| entry.covers(slot))
    }

    /// Number of open slots across the week
    pub fn open_slots(&self) -> usize {
        (0..self.days.len())
            .map(|day| self.slots.iter().filter(|s| self.is_available(day, s)).count())
            .sum()
    }
}

/// Short tag printed inside open cells
///
/// Multi-word names become their initials plus the id, single words are
/// cut to eight characters.
pub fn area_badge(name: &str, id: Option<RecordId>) -> String {
    let upper = name.to_uppercase();
    let words: Vec<&str> = upper.split_whitespace().collect();
    if words.len() > 1 {
        let initials: String = words.iter().filter_map(|w| w.chars().next()).collect();
        match id {
            Some(id) if id != 0 => format!("{initials} - {id}"),
            _ => initials,
        }
    } else {
        upper.chars().take(8).collect()
    }
}

/// Color class for an area's open cells
pub fn area_color(id: Option<RecordId>) -> &'static str {
    let index = id.map_or(0, |id| id.rem_euclid(AREA_COLORS.len() as i64) as usize);
    AREA_COLORS[index]
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};

    fn record(value: Value) -> Record {
        value.as_object().cloned().unwrap()
    }

    fn slot(hour: u32) -> TimeSlot {
        day_slots()[(hour - FIRST_HOUR) as usize]
    }

    #[test]
    fn test_day_slots() {
        let slots = day_slots();
        assert_eq!(slots.len(), 16);
        assert_eq!(slots[0].label(), "07:00 - 08:00");
        assert_eq!(slots[15].label(), "22:00 - 23:00");
        assert_eq!(short_day("Miércoles"), "Mié");
    }

    #[test]
    fn test_availability() {
        let area = record(json!({"id": 4, "nombre": "Salón de Eventos"}));
        let schedules = vec![
            record(json!({"area": 4, "dia_semana": "Lunes", "hora_apertura": "08:00",
                          "hora_cierre": "12:00", "activo": true})),
            record(json!({"area": 4, "dia_semana": "Lunes", "hora_apertura": "07:00",
                          "hora_cierre": "23:00", "activo": true})),
            record(json!({"area": 4, "dia_semana": "Martes", "hora_apertura": "07:00",
                          "hora_cierre": "23:00", "activo": false})),
            record(json!({"area": 9, "dia_semana": "Miércoles", "hora_apertura": "07:00",
                          "hora_cierre": "23:00", "activo": true})),
        ];
        let grid = WeeklyGrid::for_area(&area, &schedules);

        assert!(!grid.is_empty);
        assert!(!grid.is_available(0, &slot(7)));
        assert!(grid.is_available(0, &slot(8)));
        assert!(grid.is_available(0, &slot(11)));
        assert!(!grid.is_available(0, &slot(12)));
        assert!(!grid.is_available(1, &slot(9)));
        assert!(!grid.is_available(2, &slot(9)));
        assert_eq!(grid.open_slots(), 4);
        assert_eq!(grid.badge, "SDE - 4");
        assert_eq!(grid.color, "slot-pink");
    }

    #[test]
    fn test_seconds_in_hours_are_accepted() {
        let area = record(json!({"id": 1, "nombre": "Gimnasio"}));
        let schedules = vec![record(json!({
            "area": "1", "dia_semana": "Domingo", "hora_apertura": "09:00:00",
            "hora_cierre": "10:00:00", "activo": true
        }))];
        let grid = WeeklyGrid::for_area(&area, &schedules);
        assert!(grid.is_available(6, &slot(9)));
        assert_eq!(grid.open_slots(), 1);
    }

    #[test]
    fn test_empty_area() {
        let area = record(json!({"id": 2, "nombre": "Piscina"}));
        let grid = WeeklyGrid::for_area(&area, &[]);
        assert!(grid.is_empty);
        assert_eq!(grid.open_slots(), 0);
    }

    #[test]
    fn test_area_badge() {
        assert_eq!(area_badge("Piscina", Some(2)), "PISCINA");
        assert_eq!(area_badge("Gimnasio Principal", Some(3)), "GP - 3");
        assert_eq!(area_badge("Sala de juegos infantiles", None), "SDJI");
        assert_eq!(area_badge("Estacionamiento", Some(5)), "ESTACION");
    }
}
