use crate::auth::LoginRedirector;
use crate::server::{InternalError, COOKIE_NAME};
use axum::{
    extract::{Query, State},
    http::{
        header::{LOCATION, SET_COOKIE},
        HeaderMap, StatusCode,
    },
    response::IntoResponse,
};
use serde::Deserialize;
use tracing::instrument;

#[derive(Debug, Deserialize)]
pub struct LoginParams {
    consent: Option<String>,
}

#[instrument(skip(redirector))]
pub async fn login(
    State(redirector): State<LoginRedirector>,
    Query(params): Query<LoginParams>,
) -> Result<impl IntoResponse, InternalError> {
    // Only the literal `y` requests administrator consent; `yes`, `Y` and
    // friends do not.
    let admin_consent = params.consent.as_deref() == Some("y");
    let url = redirector.authorize_url(admin_consent);

    // Plant the correlation cookie, then send the user agent off to the
    // provider.
    let mut headers = HeaderMap::new();
    headers.insert(
        SET_COOKIE,
        format!("{}={}", COOKIE_NAME, redirector.state()).parse()?,
    );
    headers.insert(LOCATION, url.parse()?);

    Ok((StatusCode::FOUND, headers))
}
