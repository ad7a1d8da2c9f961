use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::duration::{estimate_duration_secs, format_duration};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SpotStatus {
    #[default]
    Pending,
    InProduction,
    Done,
}

impl SpotStatus {
    pub const ALL: [SpotStatus; 3] = [SpotStatus::Pending, SpotStatus::InProduction, SpotStatus::Done];

    pub fn as_str(&self) -> &'static str {
        match self {
            SpotStatus::Pending => "pending",
            SpotStatus::InProduction => "in_production",
            SpotStatus::Done => "done",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SpotStatus::Pending => "Pendente",
            SpotStatus::InProduction => "Em Produção",
            SpotStatus::Done => "Concluído",
        }
    }

    /// Accepts the stored names and the form's Portuguese values.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "pending" | "pendente" => Some(SpotStatus::Pending),
            "in_production" | "em_producao" => Some(SpotStatus::InProduction),
            "done" | "concluido" => Some(SpotStatus::Done),
            _ => None,
        }
    }
}

/// A row from `solicitacao_spot`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SpotRequest {
    pub id: Uuid,
    pub campaign_id: Uuid,
    pub user_id: Uuid,
    pub script: String,
    /// Seconds, derived from `script`.
    pub estimated_duration: u32,
    #[serde(default)]
    pub status: SpotStatus,
    pub created_at: DateTime<Utc>,
}

impl SpotRequest {
    pub fn duration_label(&self) -> String {
        format_duration(self.estimated_duration)
    }
}

/// Insert payload. The duration can only come from the script.
#[derive(Debug, Clone, Serialize)]
pub struct NewSpotRequest {
    script: String,
    estimated_duration: u32,
    status: SpotStatus,
}

impl NewSpotRequest {
    pub fn from_script(script: &str) -> Self {
        let script = script.trim().to_string();
        let estimated_duration = estimate_duration_secs(&script);
        Self { script, estimated_duration, status: SpotStatus::Pending }
    }

    pub fn with_status(mut self, status: SpotStatus) -> Self {
        self.status = status;
        self
    }

    pub fn script(&self) -> &str {
        &self.script
    }

    pub fn estimated_duration(&self) -> u32 {
        self.estimated_duration
    }
}

/// Partial update. Setting a script always sets its duration with it.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateSpotRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    script: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    estimated_duration: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<SpotStatus>,
}

impl UpdateSpotRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script(mut self, script: &str) -> Self {
        let script = script.trim().to_string();
        self.estimated_duration = Some(estimate_duration_secs(&script));
        self.script = Some(script);
        self
    }

    pub fn status(mut self, status: SpotStatus) -> Self {
        self.status = Some(status);
        self
    }
}

/// Spot form. Only the text and status are user input.
#[derive(Debug, Clone, Deserialize)]
pub struct SpotForm {
    pub texto: String,
    #[serde(default)]
    pub status: String,
    pub csrf_token: String,
}

impl SpotForm {
    pub fn validate(&self) -> Vec<String> {
        let mut errors = vec![];
        if let Some(e) = crate::auth::validate::validate_required(&self.texto, "Texto do spot", 5000) {
            errors.push(e);
        }
        errors
    }

    pub fn to_new(&self) -> NewSpotRequest {
        NewSpotRequest::from_script(&self.texto)
            .with_status(SpotStatus::parse(&self.status).unwrap_or_default())
    }

    /// Unknown status leaves the stored one alone.
    pub fn to_update(&self) -> UpdateSpotRequest {
        let update = UpdateSpotRequest::new().script(&self.texto);
        match SpotStatus::parse(&self.status) {
            Some(status) => update.status(status),
            None => update,
        }
    }
}

/// Body of the live estimate endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DurationEstimate {
    pub words: u32,
    pub seconds: u32,
    pub label: String,
}

impl DurationEstimate {
    pub fn for_text(text: &str) -> Self {
        let seconds = estimate_duration_secs(text);
        Self { words: super::word_count(text), seconds, label: format_duration(seconds) }
    }
}
