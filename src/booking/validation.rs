// src/booking/validation.rs

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static UK_MOBILE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:07\d{9}|\+447\d{9})$").expect("static regex"));
static NHS_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{10}$").expect("static regex"));

/// Step 3 contact details as typed by the patient.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ContactForm {
    pub first_name: String,
    pub last_name: String,
    pub dob: String,
    pub postcode: String,
    pub email: String,
    pub phone: String,
    pub nhs: String,
    pub note: String,
    pub accept_terms: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormError {
    pub title: &'static str,
    pub message: String,
    /// Field to focus, when the failure belongs to one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<&'static str>,
}

pub fn strip_whitespace(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}

pub fn is_valid_uk_mobile(phone: &str) -> bool {
    UK_MOBILE.is_match(&strip_whitespace(phone))
}

pub fn is_valid_nhs_number(nhs: &str) -> bool {
    NHS_NUMBER.is_match(&strip_whitespace(nhs))
}

impl ContactForm {
    fn required(&self) -> [(&'static str, &'static str, &str); 7] {
        [
            ("first_name", "First name", &self.first_name),
            ("last_name", "Last name", &self.last_name),
            ("dob", "Date of birth", &self.dob),
            ("postcode", "Postcode", &self.postcode),
            ("email", "Email", &self.email),
            ("phone", "Phone Number", &self.phone),
            ("nhs", "NHS Number", &self.nhs),
        ]
    }

    /// First failing rule wins.
    pub fn validate(&self) -> Result<(), FormError> {
        for (field, label, value) in self.required() {
            if value.trim().is_empty() {
                return Err(FormError {
                    title: "Missing Field",
                    message: format!("{label} is required."),
                    field: Some(field),
                });
            }
        }

        if !is_valid_uk_mobile(&self.phone) {
            return Err(FormError {
                title: "Invalid Phone Number",
                message: "UK mobile format: 07400 123456 or +447400123456".into(),
                field: Some("phone"),
            });
        }

        if !is_valid_nhs_number(&self.nhs) {
            return Err(FormError {
                title: "Invalid NHS Number",
                message: "NHS number must be 10 digits (spaces allowed).".into(),
                field: Some("nhs"),
            });
        }

        if !self.accept_terms {
            return Err(FormError {
                title: "Terms Required",
                message: "Please accept Terms of Service and Privacy Policy.".into(),
                field: None,
            });
        }

        Ok(())
    }
}
