// src/booking/render.rs

use chrono::{Datelike, NaiveDate};

use crate::{
    booking::slots::{month_grid, time_groups, DayCell},
    booking::wizard::{Account, Step, Wizard},
    dates::{iso, month_label},
    view::{el, Element},
};

pub fn render(w: &Wizard, today: NaiveDate) -> Element {
    let pane = match w.step {
        Step::ServiceSelect => services_pane(w),
        Step::DateTime => date_time_pane(w, today),
        Step::AccountChoice => account_pane(w),
        Step::ContactForm => contact_pane(w),
        Step::Confirmation => confirmation_pane(w),
    };

    let mut root = el("div")
        .id("bookingModal")
        .class("booking-modal")
        .attr("data-step", w.step.index().to_string());

    if w.step.index() >= 1 {
        root = root.child(chips(w));
    }
    if let Some(n) = &w.notice {
        root = root.child(
            el("div")
                .id("bookingNotice")
                .class("notice")
                .class(format!("notice-{}", n.level.as_str()))
                .child(el("strong").text(n.title.clone()))
                .child(el("p").text(n.message.clone())),
        );
    }

    root.child(pane).child(footer(w.step))
}

fn chips(w: &Wizard) -> Element {
    el("div")
        .id("bookingChips")
        .class("chips")
        .child(el("div").id("chipService").class("chip").child(el("span").text(w.draft.services_line())))
        .child(
            el("div")
                .id("chipDateTime")
                .class("chip")
                .child(el("span").text(w.date_time_chip().unwrap_or_default())),
        )
}

fn footer(step: Step) -> Element {
    let mut f = el("div").class("modal-footer");
    f = f.child(
        el("button")
            .id("btnBack")
            .class("btn")
            .class_if(step == Step::ServiceSelect, "invisible")
            .text("Back"),
    );
    if step != Step::Confirmation {
        f = f.child(el("button").id("btnClose").class("btn").text("Close"));
    }
    if step < Step::ContactForm {
        f = f.child(el("button").id("btnNext").class("btn").class("btn-primary").text("Next"));
    }
    if step == Step::ContactForm {
        f = f.child(el("button").id("btnBook").class("btn").class("btn-primary").text("Book"));
    }
    if step == Step::Confirmation {
        f = f.child(el("button").id("btnStartAgain").class("btn").text("Start again"));
    }
    f
}

/* -------------------------
   Panes
--------------------------*/

fn services_pane(w: &Wizard) -> Element {
    let items = w.visible_services().into_iter().map(|name| {
        el("div")
            .class("service-item")
            .class_if(w.draft.services.iter().any(|s| s == name), "selected")
            .attr("data-service", name)
            .child(el("span").class("tick"))
            .child(el("span").class("service-name").text(name))
    });

    el("div")
        .id("step1")
        .class("step")
        .child(
            el("input")
                .id("serviceSearch")
                .attr("type", "search")
                .attr("placeholder", "Search services")
                .attr("value", w.service_query.clone()),
        )
        .child(el("div").id("serviceList").children(items))
}

fn date_time_pane(w: &Wizard, today: NaiveDate) -> Element {
    let (year, month) = w.calendar;

    let cells = month_grid(year, month, w.picked_date, today).into_iter().map(|c| match c {
        DayCell::Blank => el("div").class("cal-day").class("blank"),
        DayCell::Day { date, disabled, selected } => el("div")
            .class("cal-day")
            .class_if(disabled, "disabled")
            .class_if(selected, "selected")
            .attr_if(disabled, "title", "Past date (disabled)")
            .attr("data-date", iso(date))
            .text(date.day().to_string()),
    });

    let selected_time = w.draft.slot.as_ref().map(|s| s.time.as_str());
    let groups = time_groups(w.picked_date, &w.booked_times(), selected_time, today)
        .into_iter()
        .map(|g| {
            let count = g.slots.len();
            let slots = g.slots.into_iter().map(|s| {
                el("button")
                    .class("slot")
                    .attr("type", "button")
                    .attr("data-time", s.time.clone())
                    .class_if(s.disabled, "disabled")
                    .attr_if(s.disabled, "disabled", "disabled")
                    .class_if(s.booked, "booked")
                    .attr_if(s.booked, "title", "Already booked")
                    .class_if(s.selected, "selected")
                    .text(s.time)
            });
            el("div")
                .class("time-group")
                .child(
                    el("div")
                        .class("time-group-head")
                        .child(el("strong").text(g.hour))
                        .child(el("span").class("muted").text(format!("({count} slots)"))),
                )
                .child(el("div").class("slots").children(slots))
        });

    el("div")
        .id("step2")
        .class("step")
        .child(
            el("div")
                .class("cal-head")
                .child(el("button").id("calPrev").class("btn").text("‹"))
                .child(el("span").id("calMonthLabel").text(month_label(year, month)))
                .child(el("button").id("calNext").class("btn").text("›")),
        )
        .child(el("div").id("calGrid").children(cells))
        .child(el("div").id("timeGroups").children(groups))
}

fn account_pane(w: &Wizard) -> Element {
    el("div")
        .id("step3")
        .class("step")
        .child(
            el("button")
                .id("btnLoginChoice")
                .class("choice")
                .class_if(w.draft.account == Account::Login, "selected")
                .text("Log in"),
        )
        .child(
            el("button")
                .id("btnGuestChoice")
                .class("choice")
                .class_if(w.draft.account == Account::Guest, "selected")
                .text("Continue as guest"),
        )
}

fn contact_pane(w: &Wizard) -> Element {
    let c = &w.contact;
    let fields = [
        ("firstName", "first_name", "First name", c.first_name.as_str()),
        ("lastName", "last_name", "Last name", c.last_name.as_str()),
        ("dob", "dob", "Date of birth", c.dob.as_str()),
        ("postcode", "postcode", "Postcode", c.postcode.as_str()),
        ("emailBooking", "email", "Email", c.email.as_str()),
        ("phone", "phone", "Phone Number", c.phone.as_str()),
        ("nhs", "nhs", "NHS Number", c.nhs.as_str()),
    ];

    let inputs = fields.into_iter().map(|(id, name, label, value)| {
        el("label")
            .class("field")
            .text(label)
            .child(el("input").id(id).attr("name", name).attr("value", value))
    });

    el("div")
        .id("step4")
        .class("step")
        .children(inputs)
        .child(
            el("label")
                .class("field")
                .text("Note")
                .child(el("textarea").id("note").attr("name", "note").text(c.note.clone())),
        )
        .child(
            el("label").class("terms").child(
                el("input")
                    .id("tosCheck")
                    .attr("type", "checkbox")
                    .attr("name", "accept_terms")
                    .attr_if(c.accept_terms, "checked", "checked"),
            ),
        )
}

fn confirmation_pane(w: &Wizard) -> Element {
    let (text, headline) = w
        .confirmation
        .as_ref()
        .map(|c| (c.text.clone(), c.headline.clone()))
        .unwrap_or_default();
    el("div")
        .id("step5")
        .class("step")
        .child(el("p").id("confirmText").text(text))
        .child(el("h3").id("confirmBig").text(headline))
}
