//! The encrypted cookie that carries a user's session.
//!
//! The cookie holds a JSON [Token] with the user's ID and an expiry. Its
//! expiry is pushed out on each authenticated request, so a session ends
//! after [DEFAULT_COOKIE_DURATION] of inactivity unless the user asked to
//! be remembered.

use axum_extra::extract::{
    PrivateCookieJar,
    cookie::{Cookie, SameSite},
};
use time::{Duration, OffsetDateTime, UtcOffset};

use crate::{Error, UserID, auth::token::Token};

pub(crate) const COOKIE_TOKEN: &str = "token";

/// How long a session lasts without activity.
pub const DEFAULT_COOKIE_DURATION: Duration = Duration::minutes(5);

fn auth_cookie(value: String, expires_at: OffsetDateTime) -> Cookie<'static> {
    Cookie::build((COOKIE_TOKEN, value))
        .expires(expires_at)
        .http_only(true)
        .same_site(SameSite::Strict)
        .secure(true)
        .build()
}

fn add_token(jar: PrivateCookieJar, token: &Token) -> Result<PrivateCookieJar, Error> {
    let value = serde_json::to_string(token).map_err(|error| {
        Error::InvalidDateFormat(error.to_string(), token.expires_at.to_string())
    })?;

    Ok(jar.add(auth_cookie(value, token.expires_at)))
}

/// Log `user_id` in for `duration`, with the expiry written in `local_offset`.
///
/// # Errors
///
/// Returns [Error::InvalidDateFormat] if the expiry cannot be serialised.
pub fn set_auth_cookie(
    jar: PrivateCookieJar,
    user_id: UserID,
    duration: Duration,
    local_offset: UtcOffset,
) -> Result<PrivateCookieJar, Error> {
    let expires_at = OffsetDateTime::now_utc().to_offset(local_offset) + duration;

    add_token(jar, &Token { user_id, expires_at })
}

/// Overwrite the auth cookie with one the browser drops immediately.
pub fn invalidate_auth_cookie(jar: PrivateCookieJar) -> PrivateCookieJar {
    let mut cookie = auth_cookie("deleted".to_owned(), OffsetDateTime::UNIX_EPOCH);
    cookie.set_max_age(Duration::ZERO);

    jar.add(cookie)
}

/// The session token in `jar`, if it is present, readable and unexpired.
///
/// # Errors
///
/// Returns [Error::CookieMissing] if there is no auth cookie, or
/// [Error::InvalidCredentials] if it cannot be parsed or has expired.
pub(crate) fn get_token_from_cookies(jar: &PrivateCookieJar) -> Result<Token, Error> {
    let cookie = jar.get(COOKIE_TOKEN).ok_or(Error::CookieMissing)?;

    match serde_json::from_str::<Token>(cookie.value_trimmed()) {
        Ok(token) if token.expires_at > OffsetDateTime::now_utc() => Ok(token),
        _ => Err(Error::InvalidCredentials),
    }
}

/// Make the session last at least `duration` from now. A later expiry, such
/// as from "keep me logged in", is kept.
///
/// # Errors
///
/// Returns the errors of [get_token_from_cookies] if there is no valid
/// session, or [Error::InvalidDateFormat] if now plus `duration` overflows.
pub(crate) fn extend_auth_cookie_duration_if_needed(
    jar: PrivateCookieJar,
    duration: Duration,
    local_offset: UtcOffset,
) -> Result<PrivateCookieJar, Error> {
    let token = get_token_from_cookies(&jar)?;

    let now = OffsetDateTime::now_utc().to_offset(local_offset);
    let Some(extended) = now.checked_add(duration) else {
        return Err(Error::InvalidDateFormat(
            format!("adding {duration} overflows the date time"),
            now.to_string(),
        ));
    };

    add_token(
        jar,
        &Token {
            expires_at: token.expires_at.max(extended),
            ..token
        },
    )
}
