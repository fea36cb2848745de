use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::TypedHeader;
use headers::Cookie;

use crate::error::ApiError;
use crate::models::AppState;

pub const CSRF_COOKIE: &str = "csrftoken";
pub const SESSION_COOKIE: &str = "sessionid";

/// Browser cookies forwarded to the pharmacy site. Both are optional; the
/// upstream decides whether a call needs them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpstreamCredentials {
    pub csrf_token: Option<String>,
    pub session_id: Option<String>,
}

impl UpstreamCredentials {
    /// `Cookie` header value for the upstream request, if there is anything to send.
    pub fn cookie_header(&self) -> Option<String> {
        let pairs: Vec<String> = [
            (CSRF_COOKIE, self.csrf_token.as_deref()),
            (SESSION_COOKIE, self.session_id.as_deref()),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.map(|v| format!("{name}={v}")))
        .collect();

        (!pairs.is_empty()).then(|| pairs.join("; "))
    }
}

impl FromRequestParts<AppState> for UpstreamCredentials {
    type Rejection = ApiError;

    fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        async move {
            // No Cookie header at all is fine: anonymous caller.
            let cookies: Option<TypedHeader<Cookie>> =
                Option::<TypedHeader<Cookie>>::from_request_parts(parts, state)
                    .await
                    .map_err(|_| ApiError::BadRequest("BAD_COOKIE", "Malformed Cookie header".into()))?;

            let Some(TypedHeader(cookie)) = cookies else {
                return Ok(Self::default());
            };

            let pick = |name: &str| {
                cookie
                    .get(name)
                    .map(str::to_string)
                    .filter(|v| !v.is_empty())
            };

            Ok(Self {
                csrf_token: pick(CSRF_COOKIE),
                session_id: pick(SESSION_COOKIE),
            })
        }
    }
}
