use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::{
    booking::Wizard,
    dashboard::CalendarState,
    reports::ReportsPanel,
    services::ServiceCatalog,
    sessions::SessionStore,
    upstream::PharmacyApi,
};

#[derive(Clone)]
pub struct AppState {
    pub upstream: Arc<dyn PharmacyApi>,
    pub services: Arc<ServiceCatalog>,
    pub wizards: SessionStore<Wizard>,
    pub calendars: SessionStore<CalendarState>,
    pub reports: SessionStore<ReportsPanel>,
    pub reports_default_days: u32,
    /// Local calendar date; swapped for a fixed day in tests.
    pub today: fn() -> NaiveDate,
}

pub fn local_today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/* -------------------------
   API DTOs
--------------------------*/

#[derive(Debug, Serialize)]
pub struct ApiOk<T> {
    pub data: T,
}

#[derive(Debug, Serialize)]
pub struct Flash {
    pub title: &'static str,
    pub message: String,
}

/* -------------------------
   Upstream wire models
--------------------------*/

/// Appointment as listed by the admin endpoint. Read-only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Appointment {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    /// Services joined by " + ".
    pub service: String,
    /// DD-MM-YYYY
    pub date: String,
    /// HH:MM or HH:MM:SS
    pub time: String,
    pub name: String,
    pub first_name: String,
    pub last_name: String,
    pub dob: String,
    pub postcode: String,
    pub email: String,
    pub phone: String,
    pub nhs: String,
    pub note: String,
}

impl Appointment {
    pub fn display_name(&self) -> String {
        if !self.name.trim().is_empty() {
            return self.name.clone();
        }
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }
}

fn string_or_number<'de, D>(de: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Str(String),
        Num(i64),
        Null(()),
    }

    Ok(match Raw::deserialize(de)? {
        Raw::Str(s) => s,
        Raw::Num(n) => n.to_string(),
        Raw::Null(()) => String::new(),
    })
}

#[derive(Debug, Deserialize)]
pub struct StatusEnvelope {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
}

impl StatusEnvelope {
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

#[derive(Debug, Deserialize)]
pub struct AppointmentsEnvelope {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub appointments: Vec<Appointment>,
}

#[derive(Debug, Deserialize)]
pub struct BookedTimesEnvelope {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub times: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct ReportsEnvelope {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub booked: Vec<serde_json::Value>,
    #[serde(default)]
    pub open: Vec<serde_json::Value>,
    #[serde(default)]
    pub total_slots_per_day: Option<u32>,
}

/// Body of POST /appointments/create/ upstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateAppointmentRequest {
    pub service: String,
    /// YYYY-MM-DD
    pub date: String,
    pub time: String,
    pub first_name: String,
    pub last_name: String,
    pub dob: String,
    pub postcode: String,
    pub email: String,
    pub phone: String,
    pub nhs_number: String,
    pub note: String,
}
