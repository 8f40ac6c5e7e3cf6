use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;

use crate::{
    domain::image::errors::ImageError,
    presentation::http::{errors::AppError, state::AppState},
};

/// Value of the cookie named `name`, when present and non-empty.
pub fn session_cookie(jar: &CookieJar, name: &str) -> Option<String> {
    jar.get(name)
        .filter(|cookie| !cookie.value().is_empty())
        .map(|cookie| cookie.value().to_string())
}

/// Reject requests without a session cookie before the body is touched.
pub async fn require_session(
    State(state): State<AppState>,
    jar: CookieJar,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    if session_cookie(&jar, &state.config.session_cookie_name).is_none() {
        return Err(ImageError::Unauthorized.into());
    }

    Ok(next.run(req).await)
}
