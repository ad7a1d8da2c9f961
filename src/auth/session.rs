use actix_session::Session;
use uuid::Uuid;

use crate::errors::AppError;
use crate::remote::AuthSession;
use crate::store::{Owner, Toast};

const USER_ID: &str = "user_id";
const ACCESS_TOKEN: &str = "access_token";
const EMAIL: &str = "email";
const IS_ADMIN: &str = "is_admin";
const FLASH: &str = "flash";
const THEME: &str = "theme";

pub const DEFAULT_THEME: &str = "dark";

/// Store the backend session after a successful sign-in.
pub fn sign_in(session: &Session, auth: &AuthSession, is_admin: bool) -> Result<(), AppError> {
    session.renew();
    session
        .insert(USER_ID, auth.user_id)
        .and_then(|_| session.insert(ACCESS_TOKEN, &auth.access_token))
        .and_then(|_| session.insert(EMAIL, &auth.email))
        .and_then(|_| session.insert(IS_ADMIN, is_admin))
        .map_err(|e| AppError::Session(format!("Failed to store sign-in: {e}")))
}

/// The signed-in owner, if the session carries both id and token.
pub fn current_owner(session: &Session) -> Option<Owner> {
    let user_id = session.get::<Uuid>(USER_ID).unwrap_or(None)?;
    let access_token = session.get::<String>(ACCESS_TOKEN).unwrap_or(None)?;
    Some(Owner { user_id, access_token })
}

pub fn require_owner(session: &Session) -> Result<Owner, AppError> {
    current_owner(session).ok_or_else(|| AppError::Session("User not signed in".to_string()))
}

pub fn get_email(session: &Session) -> Result<String, AppError> {
    match session.get::<String>(EMAIL) {
        Ok(Some(email)) => Ok(email),
        Ok(None) => Err(AppError::Session("No e-mail in session".to_string())),
        Err(e) => Err(AppError::Session(format!("Session error: {e}"))),
    }
}

pub fn is_admin(session: &Session) -> bool {
    session.get::<bool>(IS_ADMIN).unwrap_or(None).unwrap_or(false)
}

/// Campaign management is reserved to admins.
pub fn require_admin(session: &Session) -> Result<(), AppError> {
    if is_admin(session) {
        Ok(())
    } else {
        Err(AppError::PermissionDenied("campaign management".to_string()))
    }
}

/// Queue toasts for the next rendered page.
pub fn push_flash(session: &Session, toasts: Vec<Toast>) {
    if toasts.is_empty() {
        return;
    }
    let mut queued = session.get::<Vec<Toast>>(FLASH).unwrap_or(None).unwrap_or_default();
    queued.extend(toasts);
    let _ = session.insert(FLASH, queued);
}

pub fn take_flash(session: &Session) -> Vec<Toast> {
    let flash = session.get::<Vec<Toast>>(FLASH).unwrap_or(None).unwrap_or_default();
    if !flash.is_empty() {
        session.remove(FLASH);
    }
    flash
}

pub fn get_theme(session: &Session) -> String {
    session
        .get::<String>(THEME)
        .unwrap_or(None)
        .unwrap_or_else(|| DEFAULT_THEME.to_string())
}

pub fn toggle_theme(session: &Session) -> String {
    let next = if get_theme(session) == "dark" { "light" } else { "dark" };
    let _ = session.insert(THEME, next);
    next.to_string()
}

/// Drop everything but the theme, e.g. once the backend rejects the token.
pub fn end(session: &Session) {
    let theme = get_theme(session);
    session.clear();
    let _ = session.insert(THEME, theme);
}
