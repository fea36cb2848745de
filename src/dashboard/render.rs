// src/dashboard/render.rs

use chrono::{Datelike, NaiveDate};

use crate::{
    dashboard::calendar::{CalendarState, HourGrid, MonthView, ViewMode, GRID_HOURS},
    dates::{hhmm, iso, weekday_upper},
    models::Appointment,
    services::ServiceCatalog,
    view::{el, Element},
};

const EMPTY: &str = "—";
const VIEWS: [(ViewMode, &str, &str); 4] = [
    (ViewMode::Week, "week", "Week"),
    (ViewMode::Month, "month", "Month"),
    (ViewMode::Day, "day", "Day"),
    (ViewMode::List, "list", "List"),
];

pub fn render(state: &CalendarState, catalog: &ServiceCatalog, today: NaiveDate) -> Element {
    let (range_text, body) = match state.mode {
        ViewMode::Week => {
            let grid = state.week(today);
            (grid.range_text.clone(), hour_grid("apWeekView", &grid))
        }
        ViewMode::Day => {
            let grid = state.day(today);
            (grid.range_text.clone(), hour_grid("apDayView", &grid))
        }
        ViewMode::Month => {
            let month = state.month(today);
            (month.range_text.clone(), month_view(&month))
        }
        ViewMode::List => ("All appointments".to_string(), list_view(&state.list())),
    };

    el("div")
        .id("adminCalendar")
        .class("ap-dashboard")
        .attr("data-view", view_key(state.mode))
        .child(toolbar(state, range_text))
        .child(filter_dropdown(state, catalog))
        .child(body)
        .child(detail_panel(state.selected_appointment()))
}

fn view_key(mode: ViewMode) -> &'static str {
    VIEWS
        .iter()
        .find(|(m, _, _)| *m == mode)
        .map(|(_, key, _)| *key)
        .unwrap_or("week")
}

fn toolbar(state: &CalendarState, range_text: String) -> Element {
    let view_buttons = VIEWS.iter().map(|(mode, key, label)| {
        el("button")
            .class("ap-view-btn")
            .class_if(*mode == state.mode, "active")
            .attr("data-view", *key)
            .text(*label)
    });

    el("div")
        .class("ap-toolbar")
        .child(el("div").class("ap-views").children(view_buttons))
        .child(
            el("div")
                .class("ap-nav")
                .child(el("button").id("btnPrevWeek").class("btn").text("‹"))
                .child(el("button").id("btnThisWeek").class("btn").text(state.this_label()))
                .child(el("button").id("btnNextWeek").class("btn").text("›")),
        )
        .child(el("div").id("dateRangeText").text(range_text))
        .child(el("button").id("btnClearFilters").class("btn").text("Clear Filters"))
        .child(el("button").id("btnPrintList").class("btn").text("Print"))
}

fn filter_dropdown(state: &CalendarState, catalog: &ServiceCatalog) -> Element {
    let f = &state.filter;
    let mut wrap = el("div").class("ap-filter").child(
        el("button")
            .id("servicesFilterBtn")
            .class("btn")
            .text("Services: ")
            .child(el("span").id("servicesFilterLabel").text(f.label())),
    );
    if !f.is_open() {
        return wrap;
    }

    let rows = f.rows(catalog).into_iter().map(|(name, checked)| {
        el("label")
            .class("ap-filter-row")
            .child(
                el("input")
                    .attr("type", "checkbox")
                    .attr("value", name)
                    .attr_if(checked, "checked", "checked"),
            )
            .child(el("span").text(name))
    });

    wrap = wrap.child(
        el("div")
            .id("servicesFilterDropdown")
            .class("ap-filter-dropdown")
            .child(
                el("input")
                    .id("servicesFilterSearch")
                    .attr("type", "search")
                    .attr("value", f.query()),
            )
            .child(el("div").id("servicesFilterList").children(rows))
            .child(el("button").id("servicesFilterClear").class("btn").text("Clear"))
            .child(el("button").id("servicesFilterApply").class("btn").class("btn-primary").text("Apply")),
    );
    wrap
}

/* -------------------------
   Views
--------------------------*/

fn hour_label(hour: u32) -> String {
    let suffix = if hour >= 12 { "PM" } else { "AM" };
    format!("{} {suffix}", (hour + 11) % 12 + 1)
}

fn head_cell(date: NaiveDate) -> Element {
    el("div")
        .class("ap-cal-head-cell")
        .attr("data-date", iso(date))
        .text(weekday_upper(date))
        .child(el("br"))
        .child(el("strong").text(format!("{:02}", date.day())))
}

fn card(a: &Appointment) -> Element {
    el("div")
        .class("ap-apt")
        .attr("data-id", a.id.clone())
        .child(el("div").class("ap-apt-title").text(a.service.clone()))
        .child(el("div").class("ap-apt-sub").text(a.display_name()))
        .child(el("div").class("ap-apt-meta").text(hhmm(&a.time)))
}

fn hour_grid(id: &str, grid: &HourGrid<'_>) -> Element {
    let head = el("div")
        .class("ap-cal-head")
        .child(el("div").class("ap-cal-head-cell").class("time"))
        .children(grid.columns.iter().map(|d| head_cell(*d)));

    let rows = GRID_HOURS.iter().map(|&hour| {
        let cells = (0..grid.columns.len()).map(|col| {
            el("div")
                .class("ap-cell")
                .attr("data-time", format!("{hour:02}:00"))
                .attr("data-col", col.to_string())
                .children(grid.cell(col, hour).iter().map(|a| card(a)))
        });
        el("div")
            .class("ap-row")
            .child(el("div").class("ap-time").text(hour_label(hour)))
            .children(cells)
    });

    let mut root = el("div")
        .id(id)
        .child(head)
        .child(el("div").id("calendarBody").class("ap-cal-body").children(rows));

    if !grid.outside.is_empty() {
        root = root.child(
            el("div")
                .id("apOutsideHours")
                .class("ap-outside")
                .child(el("strong").text("Outside grid hours"))
                .children(grid.outside.iter().map(|a| card(a))),
        );
    }
    root
}

fn month_view(month: &MonthView<'_>) -> Element {
    let head = el("div")
        .class("ap-month-head")
        .children(["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"].map(|d| el("div").text(d)));

    let cells = month.cells.iter().map(|c| {
        let items = c.items.iter().map(|a| {
            el("div")
                .class("ap-month-item")
                .attr("data-id", a.id.clone())
                .text(format!("{} • {}", hhmm(&a.time), a.service))
        });
        el("div")
            .class("ap-month-day")
            .class_if(c.muted, "muted")
            .attr("data-date", iso(c.date))
            .child(el("div").class("ap-month-date").text(c.date.day().to_string()))
            .child(el("div").class("ap-month-items").children(items))
    });

    el("div").id("apMonthView").child(
        el("div")
            .class("ap-month")
            .child(head)
            .child(el("div").id("apMonthGrid").class("ap-month-grid").children(cells)),
    )
}

fn list_view(items: &[&Appointment]) -> Element {
    let head = el("div")
        .class("ap-list-head")
        .children(["Date", "Time", "Service", "Name", "DOB", "NHS", "Email"].map(|h| el("div").child(el("strong").text(h))));

    let body = if items.is_empty() {
        el("div")
            .id("apListBody")
            .class("ap-list-body")
            .child(el("div").class("ap-empty").text("No appointments found."))
    } else {
        el("div").id("apListBody").class("ap-list-body").children(items.iter().map(|a| {
            el("div")
                .class("ap-list-row")
                .attr("data-id", a.id.clone())
                .children(
                    [
                        a.date.clone(),
                        hhmm(&a.time),
                        a.service.clone(),
                        a.display_name(),
                        a.dob.clone(),
                        a.nhs.clone(),
                        a.email.clone(),
                    ]
                    .map(|v| el("div").text(v)),
                )
        }))
    };

    el("div")
        .id("apListView")
        .child(el("div").class("ap-list").child(head).child(body))
}

/* -------------------------
   Detail panel
--------------------------*/

fn or_dash(value: &str) -> String {
    if value.trim().is_empty() {
        EMPTY.to_string()
    } else {
        value.to_string()
    }
}

fn detail_panel(selected: Option<&Appointment>) -> Element {
    let panel = el("aside")
        .id("apDetailPanel")
        .class("ap-detail")
        .class_if(selected.is_some(), "open")
        .child(el("button").id("apDetailCloseBtn").class("btn").text("×"));

    let Some(a) = selected else {
        return panel;
    };

    let fields = [
        ("apDetailService", "Service", or_dash(&a.service)),
        ("apDetailName", "Name", a.display_name()),
        ("apDetailDob", "DOB", or_dash(&a.dob)),
        ("apDetailPostcode", "Postcode", or_dash(&a.postcode)),
        ("apDetailEmail", "Email", or_dash(&a.email)),
        ("apDetailPhone", "Phone", or_dash(&a.phone)),
        ("apDetailNhs", "NHS", or_dash(&a.nhs)),
        ("apDetailNote", "Note", or_dash(&a.note)),
    ];

    panel
        .child(el("h3").id("apDetailTitle").text("Appointment"))
        .child(el("div").id("apDetailDate").text(format!("{} • {}", a.date, a.time)))
        .children(fields.into_iter().map(|(id, label, value)| {
            el("div")
                .class("ap-detail-row")
                .child(el("span").class("muted").text(label))
                .child(el("span").id(id).text(value))
        }))
}
