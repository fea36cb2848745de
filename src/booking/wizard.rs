// src/booking/wizard.rs

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{
    booking::slots::all_slot_times,
    booking::validation::{strip_whitespace, ContactForm, FormError},
    dates::{chip_date, iso, is_past, long_date, parse_iso, shift_month, to_am_pm},
    models::CreateAppointmentRequest,
    services::{join_services, ServiceCatalog},
};

/* ============================================================
   Types
   ============================================================ */

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    ServiceSelect,
    DateTime,
    AccountChoice,
    ContactForm,
    Confirmation,
}

impl Step {
    pub fn index(self) -> usize {
        self as usize
    }

    fn forward(self) -> Option<Step> {
        match self {
            Step::ServiceSelect => Some(Step::DateTime),
            Step::DateTime => Some(Step::AccountChoice),
            Step::AccountChoice => Some(Step::ContactForm),
            // ContactForm only moves on through a confirmed booking
            Step::ContactForm | Step::Confirmation => None,
        }
    }

    fn backward(self) -> Option<Step> {
        match self {
            Step::DateTime => Some(Step::ServiceSelect),
            Step::AccountChoice => Some(Step::DateTime),
            Step::ContactForm => Some(Step::AccountChoice),
            Step::ServiceSelect | Step::Confirmation => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Account {
    #[default]
    Guest,
    Login,
}

/// A chosen appointment time. Date and time only ever exist together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Slot {
    pub date: NaiveDate,
    pub time: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Draft {
    /// Ordered set: selection order, no duplicates.
    pub services: Vec<String>,
    pub slot: Option<Slot>,
    pub account: Account,
}

impl Draft {
    pub fn services_line(&self) -> String {
        join_services(&self.services)
    }
}

/// Booked times of one date. Replaced wholesale, never merged across dates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookedTimes {
    pub date: NaiveDate,
    pub times: BTreeSet<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

impl NoticeLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            NoticeLevel::Info => "info",
            NoticeLevel::Warning => "warning",
            NoticeLevel::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn new(level: NoticeLevel, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level,
            title: title.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Confirmation {
    pub text: String,
    pub headline: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountOutcome {
    Continue,
    /// The caller leaves the wizard for the login flow.
    LoginRequired,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WizardError {
    #[error("Please complete this step first.")]
    StepIncomplete,
    #[error("unknown service: {0}")]
    UnknownService(String),
    #[error("past dates cannot be booked")]
    PastDate,
    #[error("pick a date first")]
    NoDate,
    #[error("time slot {0} is not available")]
    SlotUnavailable(String),
    #[error("not available on the current step")]
    WrongStep,
    #[error("{}", .0.message)]
    Invalid(FormError),
}

impl WizardError {
    fn notice(&self) -> Notice {
        match self {
            WizardError::StepIncomplete => {
                Notice::new(NoticeLevel::Info, "Select Required", self.to_string())
            }
            WizardError::Invalid(e) => {
                let level = if e.title == "Missing Field" || e.title == "Terms Required" {
                    NoticeLevel::Warning
                } else {
                    NoticeLevel::Error
                };
                Notice::new(level, e.title, e.message.clone())
            }
            other => Notice::new(NoticeLevel::Warning, "Not Available", other.to_string()),
        }
    }
}

/* ============================================================
   Wizard
   ============================================================ */

#[derive(Debug, Clone)]
pub struct Wizard {
    catalog: Arc<ServiceCatalog>,
    pub step: Step,
    pub draft: Draft,
    pub service_query: String,
    /// Month shown by the calendar widget (year, 1-based month).
    pub calendar: (i32, u32),
    /// Day highlighted in the calendar; becomes part of the draft with a time.
    pub picked_date: Option<NaiveDate>,
    pub booked: Option<BookedTimes>,
    /// Last submitted contact details, kept so a rejected booking re-renders them.
    pub contact: ContactForm,
    pub confirmation: Option<Confirmation>,
    pub notice: Option<Notice>,
}

impl Wizard {
    pub fn open(catalog: Arc<ServiceCatalog>, today: NaiveDate) -> Self {
        Self {
            catalog,
            step: Step::ServiceSelect,
            draft: Draft::default(),
            service_query: String::new(),
            calendar: (today.year(), today.month()),
            picked_date: None,
            booked: None,
            contact: ContactForm::default(),
            confirmation: None,
            notice: None,
        }
    }

    /// "Start again": a fresh draft, calendar back on the current month.
    pub fn reset(&mut self, today: NaiveDate) {
        *self = Self::open(self.catalog.clone(), today);
    }

    fn fail(&mut self, err: WizardError) -> WizardError {
        self.notice = Some(err.notice());
        err
    }

    fn expect_step(&mut self, step: Step) -> Result<(), WizardError> {
        if self.step == step {
            Ok(())
        } else {
            Err(self.fail(WizardError::WrongStep))
        }
    }

    /* -------------------------
       Step 0: services
    --------------------------*/

    /// Returns whether the service is selected afterwards.
    pub fn toggle_service(&mut self, name: &str) -> Result<bool, WizardError> {
        self.expect_step(Step::ServiceSelect)?;
        if !self.catalog.contains(name) {
            return Err(self.fail(WizardError::UnknownService(name.to_string())));
        }
        self.notice = None;

        if let Some(pos) = self.draft.services.iter().position(|s| s == name) {
            self.draft.services.remove(pos);
            Ok(false)
        } else {
            self.draft.services.push(name.to_string());
            Ok(true)
        }
    }

    pub fn search_services(&mut self, query: &str) {
        self.service_query = query.to_string();
    }

    pub fn visible_services(&self) -> Vec<&str> {
        self.catalog.search(&self.service_query)
    }

    /* -------------------------
       Step 1: date & time
    --------------------------*/

    pub fn shift_month(&mut self, delta: i32) {
        let (y, m) = self.calendar;
        self.calendar = shift_month(y, m, delta);
    }

    /// Highlights `date` and drops any chosen slot. The caller fetches the
    /// booked times of the returned date and hands them to `apply_booked_times`.
    pub fn pick_date(&mut self, date: NaiveDate, today: NaiveDate) -> Result<NaiveDate, WizardError> {
        self.expect_step(Step::DateTime)?;
        if is_past(date, today) {
            return Err(self.fail(WizardError::PastDate));
        }
        self.notice = None;
        self.picked_date = Some(date);
        self.draft.slot = None;
        self.booked = Some(BookedTimes {
            date,
            times: BTreeSet::new(),
        });
        Ok(date)
    }

    /// Replaces the booked-times cache. Results for a date that is no longer
    /// picked are dropped, so a slow fetch cannot overwrite a newer one.
    pub fn apply_booked_times<I>(&mut self, date: NaiveDate, times: I) -> bool
    where
        I: IntoIterator<Item = String>,
    {
        if self.picked_date != Some(date) {
            return false;
        }
        let times = times
            .into_iter()
            .map(|t| t.chars().take(5).collect::<String>())
            .filter(|t| t.contains(':'))
            .collect();
        self.booked = Some(BookedTimes { date, times });

        // a chosen time that turned out to be taken is no longer a valid slot
        if self.draft.slot.as_ref().is_some_and(|s| self.is_booked(&s.time)) {
            self.draft.slot = None;
        }
        true
    }

    pub fn is_booked(&self, time: &str) -> bool {
        match (&self.booked, self.picked_date) {
            (Some(b), Some(d)) if b.date == d => b.times.contains(time),
            _ => false,
        }
    }

    pub fn booked_times(&self) -> BTreeSet<String> {
        match (&self.booked, self.picked_date) {
            (Some(b), Some(d)) if b.date == d => b.times.clone(),
            _ => BTreeSet::new(),
        }
    }

    pub fn pick_time(&mut self, time: &str, today: NaiveDate) -> Result<(), WizardError> {
        self.expect_step(Step::DateTime)?;
        let Some(date) = self.picked_date else {
            return Err(self.fail(WizardError::NoDate));
        };
        if is_past(date, today) {
            return Err(self.fail(WizardError::PastDate));
        }
        let time = time.chars().take(5).collect::<String>();
        if !all_slot_times().contains(&time) || self.is_booked(&time) {
            return Err(self.fail(WizardError::SlotUnavailable(time)));
        }
        self.notice = None;
        self.draft.slot = Some(Slot { date, time });
        Ok(())
    }

    /* -------------------------
       Transitions
    --------------------------*/

    pub fn can_advance(&self, today: NaiveDate) -> bool {
        match self.step {
            Step::ServiceSelect => !self.draft.services.is_empty(),
            Step::DateTime => self
                .draft
                .slot
                .as_ref()
                .is_some_and(|s| !is_past(s.date, today) && !self.is_booked(&s.time)),
            Step::AccountChoice | Step::ContactForm => true,
            Step::Confirmation => false,
        }
    }

    pub fn next(&mut self, today: NaiveDate) -> Result<Step, WizardError> {
        let Some(target) = self.step.forward() else {
            return Err(self.fail(WizardError::WrongStep));
        };
        if !self.can_advance(today) {
            return Err(self.fail(WizardError::StepIncomplete));
        }
        self.notice = None;
        self.step = target;
        tracing::debug!(step = ?self.step, "booking wizard advanced");
        Ok(self.step)
    }

    pub fn back(&mut self) -> Step {
        if let Some(prev) = self.step.backward() {
            self.notice = None;
            self.step = prev;
        }
        self.step
    }

    pub fn choose_account(&mut self, account: Account) -> Result<AccountOutcome, WizardError> {
        self.expect_step(Step::AccountChoice)?;
        self.draft.account = account;
        self.notice = None;
        match account {
            Account::Guest => {
                self.step = Step::ContactForm;
                Ok(AccountOutcome::Continue)
            }
            Account::Login => Ok(AccountOutcome::LoginRequired),
        }
    }

    /* -------------------------
       Step 3: submission
    --------------------------*/

    /// Validates the form and builds the upstream payload. Nothing is sent
    /// when any rule fails.
    pub fn prepare_submission(&mut self, form: ContactForm) -> Result<CreateAppointmentRequest, WizardError> {
        self.expect_step(Step::ContactForm)?;
        self.contact = form;

        let Some(slot) = self.draft.slot.clone() else {
            return Err(self.fail(WizardError::StepIncomplete));
        };
        if self.draft.services.is_empty() {
            return Err(self.fail(WizardError::StepIncomplete));
        }
        if let Err(e) = self.contact.validate() {
            return Err(self.fail(WizardError::Invalid(e)));
        }
        self.notice = None;

        let f = &self.contact;
        Ok(CreateAppointmentRequest {
            service: self.draft.services_line(),
            date: iso(slot.date),
            time: slot.time,
            first_name: f.first_name.trim().to_string(),
            last_name: f.last_name.trim().to_string(),
            dob: f.dob.trim().to_string(),
            postcode: f.postcode.trim().to_string(),
            email: f.email.trim().to_string(),
            phone: strip_whitespace(&f.phone),
            nhs_number: strip_whitespace(&f.nhs),
            note: f.note.trim().to_string(),
        })
    }

    /// Upstream refused the booking; the step stays put. The caller refreshes
    /// the booked times of the slot's date afterwards.
    pub fn booking_rejected(&mut self, message: Option<String>) -> Option<NaiveDate> {
        let message = message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| "Could not save appointment.".to_string());
        self.notice = Some(Notice::new(NoticeLevel::Error, "Error", message));
        self.draft.slot.as_ref().map(|s| s.date)
    }

    pub fn booking_failed(&mut self) {
        self.notice = Some(Notice::new(
            NoticeLevel::Error,
            "Error",
            "Network error. Please try again.",
        ));
    }

    /// Upstream accepted `request`. The confirmation and the booked cache
    /// follow what was sent, even if the draft moved on while it was in flight.
    pub fn booking_confirmed(&mut self, request: &CreateAppointmentRequest) {
        let date = parse_iso(&request.date);
        let when = date.map_or_else(|| request.date.clone(), long_date);

        if let Some(date) = date {
            let slot = Slot {
                date,
                time: request.time.clone(),
            };
            match self.booked.as_mut().filter(|b| b.date == date) {
                Some(b) => {
                    b.times.insert(slot.time.clone());
                }
                None => {
                    self.booked = Some(BookedTimes {
                        date,
                        times: BTreeSet::from([slot.time.clone()]),
                    });
                }
            }
            self.picked_date = Some(date);
            self.draft.slot = Some(slot);
        }

        let full_name = format!("{} {}", request.first_name, request.last_name)
            .trim()
            .to_string();
        self.confirmation = Some(Confirmation {
            text: format!(
                "Your '{}' appointment has been confirmed for {}",
                request.service, full_name
            ),
            headline: format!("{} @ {}", when, to_am_pm(&request.time)),
        });
        self.notice = None;
        self.step = Step::Confirmation;
    }

    /* -------------------------
       Display helpers
    --------------------------*/

    /// "16 Oct, 09:05" once a slot is chosen.
    pub fn date_time_chip(&self) -> Option<String> {
        self.draft
            .slot
            .as_ref()
            .map(|s| format!("{}, {}", chip_date(s.date), s.time))
    }
}
