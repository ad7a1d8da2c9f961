use actix_web::{HttpResponse, ResponseError};
use askama::Template;
use std::fmt;

use crate::remote::RemoteError;

#[derive(Debug)]
pub enum AppError {
    Remote(RemoteError),
    Template(askama::Error),
    Session(String),
    Csrf,
    NotFound,
    PermissionDenied(String),
    Upload(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Remote(e) => write!(f, "Remote service error: {e}"),
            AppError::Template(e) => write!(f, "Template error: {e}"),
            AppError::Session(e) => write!(f, "Session error: {e}"),
            AppError::Csrf => write!(f, "Invalid or missing CSRF token"),
            AppError::NotFound => write!(f, "Not found"),
            AppError::PermissionDenied(what) => write!(f, "Permission denied: {what}"),
            AppError::Upload(e) => write!(f, "Upload error: {e}"),
        }
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::NotFound => crate::app::not_found_page(),
            AppError::Csrf => HttpResponse::Forbidden().body("Invalid or missing CSRF token"),
            AppError::PermissionDenied(_) => {
                log::warn!("{self}");
                HttpResponse::Forbidden().body("Acesso negado")
            }
            AppError::Upload(e) => HttpResponse::BadRequest().body(e.clone()),
            _ => {
                log::error!("{self}");
                HttpResponse::InternalServerError().body("Internal Server Error")
            }
        }
    }
}

impl From<RemoteError> for AppError {
    fn from(e: RemoteError) -> Self {
        AppError::Remote(e)
    }
}

impl From<askama::Error> for AppError {
    fn from(e: askama::Error) -> Self {
        AppError::Template(e)
    }
}

impl From<actix_multipart::MultipartError> for AppError {
    fn from(e: actix_multipart::MultipartError) -> Self {
        AppError::Upload(e.to_string())
    }
}

/// Render a template into a 200 HTML response.
pub fn render(tmpl: impl Template) -> Result<HttpResponse, AppError> {
    let html = tmpl.render()?;
    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(html))
}
