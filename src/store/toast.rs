use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    Success,
    Error,
}

/// A user-facing notification. Carried to the next page through the session flash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Toast {
    pub kind: ToastKind,
    pub title: String,
    pub description: String,
}

impl Toast {
    pub fn success(title: &str, description: &str) -> Self {
        Self { kind: ToastKind::Success, title: title.to_string(), description: description.to_string() }
    }

    pub fn error(title: &str, description: &str) -> Self {
        Self { kind: ToastKind::Error, title: title.to_string(), description: description.to_string() }
    }

    pub fn is_error(&self) -> bool {
        self.kind == ToastKind::Error
    }

    /// CSS modifier used by the base template.
    pub fn css_class(&self) -> &'static str {
        match self.kind {
            ToastKind::Success => "toast-success",
            ToastKind::Error => "toast-destructive",
        }
    }
}
