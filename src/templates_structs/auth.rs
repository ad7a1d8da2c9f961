use askama::Template;

/// Which tab of the auth page is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    Login,
    Signup,
}

impl AuthMode {
    pub fn from_query(value: Option<&str>) -> Self {
        match value {
            Some("cadastro") => AuthMode::Signup,
            _ => AuthMode::Login,
        }
    }

    pub fn is_signup(&self) -> bool {
        *self == AuthMode::Signup
    }
}

#[derive(Template)]
#[template(path = "auth.html")]
pub struct AuthTemplate {
    pub app_name: String,
    pub csrf_token: String,
    pub theme: String,
    pub mode: AuthMode,
    pub email: String,
    pub error: Option<String>,
    pub notice: Option<String>,
}
