// Template context structures for Askama templates, organized by page.
// All types are re-exported: `use attini::templates_structs::*`

use actix_session::Session;

use crate::app::AppState;
use crate::auth::csrf;
use crate::auth::session::{get_email, get_theme, is_admin, take_flash};
use crate::errors::AppError;
use crate::store::Toast;

/// Common context shared by all signed-in pages.
/// Templates access these as `ctx.email`, `ctx.toasts`, etc.
pub struct PageContext {
    pub email: String,
    pub avatar_initial: String,
    pub toasts: Vec<Toast>,
    pub app_name: String,
    pub csrf_token: String,
    pub theme: String,
    pub is_admin: bool,
}

impl PageContext {
    pub fn build(session: &Session, state: &AppState) -> Result<Self, AppError> {
        let email = get_email(session)?;
        let avatar_initial = email.chars().next().unwrap_or('?').to_uppercase().to_string();
        Ok(Self {
            avatar_initial,
            email,
            toasts: take_flash(session),
            app_name: state.config.app_name.clone(),
            csrf_token: csrf::get_or_create_token(session),
            theme: get_theme(session),
            is_admin: is_admin(session),
        })
    }

    /// Add toasts raised while building this page (e.g. a failed list).
    pub fn with_toasts(mut self, toasts: Vec<Toast>) -> Self {
        self.toasts.extend(toasts);
        self
    }
}

mod auth;
mod campaign;
mod resources;

pub use auth::*;
pub use campaign::*;
pub use resources::*;
