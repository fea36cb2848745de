// src/upstream.rs
//
// The pharmacy site's JSON endpoints. Routes only see `PharmacyApi`; the
// reqwest client is one implementation, test doubles are another.

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{header, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::{
    dates::iso,
    middleware::cookies::UpstreamCredentials,
    models::{
        Appointment, AppointmentsEnvelope, BookedTimesEnvelope, CreateAppointmentRequest,
        ReportsEnvelope, StatusEnvelope,
    },
    reports::ReportsData,
};

#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("upstream unreachable: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("upstream answered {0}")]
    Status(StatusCode),
    #[error("upstream refused: {0}")]
    Rejected(String),
}

/// Result of `POST /appointments/create/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateOutcome {
    Created,
    /// Conflict or validation failure; carries the upstream message when there is one.
    Rejected(Option<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignupForm {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Login/signup answer plus any cookies the site set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Relayed {
    pub ok: bool,
    pub message: Option<String>,
    pub set_cookies: Vec<String>,
}

#[async_trait]
pub trait PharmacyApi: Send + Sync {
    async fn list_appointments(&self, creds: &UpstreamCredentials) -> Result<Vec<Appointment>, UpstreamError>;
    async fn reports_data(&self, days: u32, creds: &UpstreamCredentials) -> Result<ReportsData, UpstreamError>;
    async fn booked_times(&self, date: NaiveDate) -> Result<Vec<String>, UpstreamError>;
    async fn create_appointment(
        &self,
        request: &CreateAppointmentRequest,
        creds: &UpstreamCredentials,
    ) -> Result<CreateOutcome, UpstreamError>;
    async fn login(&self, form: &LoginForm, creds: &UpstreamCredentials) -> Result<Relayed, UpstreamError>;
    async fn signup(&self, form: &SignupForm, creds: &UpstreamCredentials) -> Result<Relayed, UpstreamError>;
}

/* ============================================================
   reqwest implementation
   ============================================================ */

#[derive(Debug, Clone)]
pub struct HttpPharmacyApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpPharmacyApi {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, UpstreamError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn with_credentials(req: RequestBuilder, creds: &UpstreamCredentials) -> RequestBuilder {
        let req = match creds.cookie_header() {
            Some(cookie) => req.header(header::COOKIE, cookie),
            None => req,
        };
        match &creds.csrf_token {
            Some(token) => req.header("X-CSRFToken", token),
            None => req,
        }
    }

    async fn json_ok<T: DeserializeOwned>(res: Response) -> Result<T, UpstreamError> {
        let status = res.status();
        if !status.is_success() {
            return Err(UpstreamError::Status(status));
        }
        Ok(res.json::<T>().await?)
    }

    async fn relay(res: Response) -> Result<Relayed, UpstreamError> {
        let set_cookies = res
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .map(str::to_string)
            .collect();
        let status = res.status();
        let body: StatusEnvelope = match res.json().await {
            Ok(body) => body,
            Err(_) if !status.is_success() => return Err(UpstreamError::Status(status)),
            Err(e) => return Err(e.into()),
        };
        Ok(Relayed {
            ok: body.is_ok(),
            message: body.message,
            set_cookies,
        })
    }
}

fn rejected(status: &str) -> UpstreamError {
    UpstreamError::Rejected(format!("status {status:?}"))
}

#[async_trait]
impl PharmacyApi for HttpPharmacyApi {
    async fn list_appointments(&self, creds: &UpstreamCredentials) -> Result<Vec<Appointment>, UpstreamError> {
        let req = self.client.get(self.url("/admin-dashboard/appointments/"));
        let res = Self::with_credentials(req, creds).send().await?;
        let body: AppointmentsEnvelope = Self::json_ok(res).await?;
        if body.status != "ok" {
            return Err(rejected(&body.status));
        }
        Ok(body.appointments)
    }

    async fn reports_data(&self, days: u32, creds: &UpstreamCredentials) -> Result<ReportsData, UpstreamError> {
        let req = self
            .client
            .get(self.url("/admin-dashboard/reports/data/"))
            .query(&[("days", days)]);
        let res = Self::with_credentials(req, creds).send().await?;
        let body: ReportsEnvelope = Self::json_ok(res).await?;
        if body.status != "ok" {
            return Err(rejected(&body.status));
        }
        Ok(body.into())
    }

    async fn booked_times(&self, date: NaiveDate) -> Result<Vec<String>, UpstreamError> {
        let res = self
            .client
            .get(self.url("/appointments/booked/"))
            .query(&[("date", iso(date))])
            .send()
            .await?;
        let body: BookedTimesEnvelope = Self::json_ok(res).await?;
        if body.status != "ok" {
            return Err(rejected(&body.status));
        }
        Ok(body.times)
    }

    async fn create_appointment(
        &self,
        request: &CreateAppointmentRequest,
        creds: &UpstreamCredentials,
    ) -> Result<CreateOutcome, UpstreamError> {
        let req = self.client.post(self.url("/appointments/create/")).json(request);
        let res = Self::with_credentials(req, creds).send().await?;
        let status = res.status();

        // Any answer with a `{status, message}` body is a refusal worth showing,
        // whatever its status code.
        let body: Option<StatusEnvelope> = res.json().await.ok();
        match body {
            Some(b) if status.is_success() && b.is_ok() => Ok(CreateOutcome::Created),
            Some(b) => Ok(CreateOutcome::Rejected(b.message)),
            None if status.is_client_error() => Ok(CreateOutcome::Rejected(None)),
            None => Err(UpstreamError::Status(status)),
        }
    }

    async fn login(&self, form: &LoginForm, creds: &UpstreamCredentials) -> Result<Relayed, UpstreamError> {
        let req = self.client.post(self.url("/login/")).form(&[
            ("username", form.username.as_str()),
            ("password", form.password.as_str()),
        ]);
        let res = Self::with_credentials(req, creds).send().await?;
        Self::relay(res).await
    }

    async fn signup(&self, form: &SignupForm, creds: &UpstreamCredentials) -> Result<Relayed, UpstreamError> {
        let req = self.client.post(self.url("/signup/")).form(&[
            ("username", form.username.as_str()),
            ("email", form.email.as_str()),
            ("password", form.password.as_str()),
        ]);
        let res = Self::with_credentials(req, creds).send().await?;
        Self::relay(res).await
    }
}
