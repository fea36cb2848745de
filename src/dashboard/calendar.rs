// src/dashboard/calendar.rs
//
// Staff calendar over a pre-fetched appointment list. Views are derived from
// the list on every call; the list itself is never modified.

use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{
    dashboard::filter::ServiceFilter,
    dates::{
        add_months, first_of_month, floor_to_hour, long_date, month_label, month_short, parse_dmy,
        start_of_week_sunday,
    },
    models::Appointment,
};

/// Hour rows of the week and day grids (9 AM to 3 PM).
pub const GRID_HOURS: [u32; 7] = [9, 10, 11, 12, 13, 14, 15];
pub const MONTH_CELLS: usize = 42;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    #[default]
    Week,
    Month,
    Day,
    List,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Nav {
    Prev,
    Next,
    This,
}

/// Where a document click landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClickTarget {
    DetailPanel,
    AppointmentCard,
    FilterDropdown,
    Elsewhere,
}

#[derive(Debug, Clone, Default)]
pub struct CalendarState {
    pub appointments: Vec<Appointment>,
    pub mode: ViewMode,
    pub offset: i32,
    pub filter: ServiceFilter,
    /// Appointment shown in the detail panel; `None` when the panel is closed.
    pub selected: Option<String>,
}

/* ============================================================
   Derived views
   ============================================================ */

#[derive(Debug)]
pub struct HourGrid<'a> {
    pub columns: Vec<NaiveDate>,
    /// (column, hour) -> appointments, input order kept.
    pub cells: BTreeMap<(usize, u32), Vec<&'a Appointment>>,
    /// In range but without a matching grid row.
    pub outside: Vec<&'a Appointment>,
    pub range_text: String,
}

impl<'a> HourGrid<'a> {
    fn new(columns: Vec<NaiveDate>, range_text: String) -> Self {
        Self {
            columns,
            cells: BTreeMap::new(),
            outside: Vec::new(),
            range_text,
        }
    }

    fn place(&mut self, column: usize, a: &'a Appointment) {
        match floor_to_hour(&a.time).filter(|h| GRID_HOURS.contains(h)) {
            Some(hour) => self.cells.entry((column, hour)).or_default().push(a),
            None => {
                tracing::debug!(id = %a.id, time = %a.time, "appointment outside grid hours");
                self.outside.push(a);
            }
        }
    }

    pub fn cell(&self, column: usize, hour: u32) -> &[&'a Appointment] {
        self.cells.get(&(column, hour)).map(Vec::as_slice).unwrap_or(&[])
    }

    #[cfg(test)]
    pub fn placed_count(&self) -> usize {
        self.cells.values().map(Vec::len).sum()
    }
}

#[derive(Debug)]
pub struct MonthCell<'a> {
    pub date: NaiveDate,
    /// Leading/trailing day of a neighbouring month.
    pub muted: bool,
    pub items: Vec<&'a Appointment>,
}

#[derive(Debug)]
pub struct MonthView<'a> {
    pub first: NaiveDate,
    pub cells: Vec<MonthCell<'a>>,
    pub range_text: String,
}

impl CalendarState {
    pub fn new(appointments: Vec<Appointment>) -> Self {
        Self {
            appointments,
            ..Default::default()
        }
    }

    /// Swaps in a freshly fetched list. The panel closes when its appointment is gone.
    pub fn reload(&mut self, appointments: Vec<Appointment>) {
        self.appointments = appointments;
        if self.selected_appointment().is_none() {
            self.selected = None;
        }
    }

    /* -------------------------
       Navigation
    --------------------------*/

    pub fn switch_view(&mut self, mode: ViewMode) {
        self.mode = mode;
        self.offset = 0;
        self.close_detail();
    }

    pub fn navigate(&mut self, nav: Nav) {
        match nav {
            Nav::Prev => self.offset -= 1,
            Nav::Next => self.offset += 1,
            Nav::This => self.offset = 0,
        }
        self.close_detail();
    }

    pub fn this_label(&self) -> &'static str {
        match self.mode {
            ViewMode::Week => "This week",
            ViewMode::Month => "This month",
            ViewMode::Day => "This day",
            ViewMode::List => "All",
        }
    }

    /* -------------------------
       Detail panel & clicks
    --------------------------*/

    pub fn select(&mut self, id: &str) -> Option<&Appointment> {
        let found = self.appointments.iter().position(|a| a.id == id)?;
        self.selected = Some(id.to_string());
        self.appointments.get(found)
    }

    pub fn selected_appointment(&self) -> Option<&Appointment> {
        let id = self.selected.as_deref()?;
        self.appointments.iter().find(|a| a.id == id)
    }

    pub fn close_detail(&mut self) {
        self.selected = None;
    }

    pub fn document_click(&mut self, target: ClickTarget) {
        if self.filter.is_open() && target != ClickTarget::FilterDropdown {
            self.filter.discard();
        }
        if !matches!(
            target,
            ClickTarget::DetailPanel | ClickTarget::AppointmentCard | ClickTarget::FilterDropdown
        ) {
            self.close_detail();
        }
    }

    /* -------------------------
       Filter
    --------------------------*/

    pub fn apply_filter(&mut self) {
        self.filter.apply();
        self.close_detail();
    }

    pub fn reset_filters(&mut self) {
        self.filter.reset();
        self.close_detail();
    }

    pub fn filtered(&self) -> impl Iterator<Item = &Appointment> {
        self.appointments.iter().filter(|a| self.filter.matches(&a.service))
    }

    /* -------------------------
       Views
    --------------------------*/

    pub fn week(&self, today: NaiveDate) -> HourGrid<'_> {
        let start = start_of_week_sunday(today) + Duration::days(7 * i64::from(self.offset));
        let end = start + Duration::days(6);
        let columns = (0..7).map(|i| start + Duration::days(i)).collect();
        let range = format!(
            "{} {} - {} {}, {}",
            month_short(start.month()),
            start.day(),
            month_short(end.month()),
            end.day(),
            end.year()
        );

        let mut grid = HourGrid::new(columns, range);
        for a in self.filtered() {
            let Some(date) = parse_dmy(&a.date) else {
                continue;
            };
            let column = (date - start).num_days();
            if (0..7).contains(&column) {
                grid.place(column as usize, a);
            }
        }
        grid
    }

    pub fn day(&self, today: NaiveDate) -> HourGrid<'_> {
        let day = today + Duration::days(i64::from(self.offset));
        let mut grid = HourGrid::new(vec![day], long_date(day));
        for a in self.filtered() {
            if parse_dmy(&a.date) == Some(day) {
                grid.place(0, a);
            }
        }
        grid
    }

    /// Always 42 cells (six Sunday-first weeks).
    pub fn month(&self, today: NaiveDate) -> MonthView<'_> {
        let first = add_months(first_of_month(today), self.offset);
        let next = add_months(first, 1);
        let grid_start = start_of_week_sunday(first);

        let mut cells: Vec<MonthCell<'_>> = (0..MONTH_CELLS as i64)
            .map(|i| {
                let date = grid_start + Duration::days(i);
                MonthCell {
                    date,
                    muted: date.month() != first.month(),
                    items: Vec::new(),
                }
            })
            .collect();

        for a in self.filtered() {
            let Some(date) = parse_dmy(&a.date) else {
                continue;
            };
            if date < first || date >= next {
                continue;
            }
            let index = (date - grid_start).num_days() as usize;
            if let Some(cell) = cells.get_mut(index) {
                cell.items.push(a);
            }
        }

        MonthView {
            first,
            cells,
            range_text: month_label(first.year(), first.month()),
        }
    }

    /// Newest first: date descending (unparseable dates last), then time descending.
    pub fn list(&self) -> Vec<&Appointment> {
        let mut items: Vec<&Appointment> = self.filtered().collect();
        items.sort_by(|a, b| {
            parse_dmy(&b.date)
                .cmp(&parse_dmy(&a.date))
                .then_with(|| b.time.cmp(&a.time))
        });
        items
    }

    /// Print order: oldest first.
    pub fn print_rows(&self) -> Vec<&Appointment> {
        let mut items: Vec<&Appointment> = self.filtered().collect();
        items.sort_by(|a, b| {
            parse_dmy(&a.date)
                .cmp(&parse_dmy(&b.date))
                .then_with(|| a.time.cmp(&b.time))
        });
        items
    }

    pub fn force_list_view(&mut self) {
        if self.mode != ViewMode::List {
            self.mode = ViewMode::List;
            self.offset = 0;
        }
    }
}
