use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle status shared by campaigns, graphic assets and material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CampaignStatus {
    #[default]
    Active,
    Paused,
    Completed,
}

impl CampaignStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CampaignStatus::Active => "active",
            CampaignStatus::Paused => "paused",
            CampaignStatus::Completed => "completed",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CampaignStatus::Active => "Publicado",
            CampaignStatus::Paused => "Rascunho",
            CampaignStatus::Completed => "Concluído",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "active" | "publicado" => Some(CampaignStatus::Active),
            "paused" | "rascunho" => Some(CampaignStatus::Paused),
            "completed" | "concluido" => Some(CampaignStatus::Completed),
            _ => None,
        }
    }
}

/// A row from the `campaigns` table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Campaign {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub cover_image: Option<String>,
    pub status: CampaignStatus,
    #[serde(rename = "show_pecas_graficas", default = "visible")]
    pub show_graphic_assets: bool,
    #[serde(rename = "show_solicitacao_spot", default = "visible")]
    pub show_spot_requests: bool,
    #[serde(rename = "show_material_explicativo", default = "visible")]
    pub show_material: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn visible() -> bool {
    true
}

/// Insert payload. The store adds `user_id`.
#[derive(Debug, Clone, Serialize)]
pub struct NewCampaign {
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    pub status: CampaignStatus,
    #[serde(rename = "show_pecas_graficas")]
    pub show_graphic_assets: bool,
    #[serde(rename = "show_solicitacao_spot")]
    pub show_spot_requests: bool,
    #[serde(rename = "show_material_explicativo")]
    pub show_material: bool,
}

/// Partial update. Only `Some` fields are sent.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateCampaign {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<CampaignStatus>,
    #[serde(rename = "show_pecas_graficas", skip_serializing_if = "Option::is_none")]
    pub show_graphic_assets: Option<bool>,
    #[serde(rename = "show_solicitacao_spot", skip_serializing_if = "Option::is_none")]
    pub show_spot_requests: Option<bool>,
    #[serde(rename = "show_material_explicativo", skip_serializing_if = "Option::is_none")]
    pub show_material: Option<bool>,
}

/// Form input for creating/editing a campaign.
///
/// Checkboxes are absent from the body when unticked, hence the defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct CampaignForm {
    pub nome: String,
    pub descricao: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub show_pecas_graficas: Option<String>,
    #[serde(default)]
    pub show_solicitacao_spot: Option<String>,
    #[serde(default)]
    pub show_material_explicativo: Option<String>,
    pub csrf_token: String,
}

impl CampaignForm {
    /// Required-field check; returns the messages to show.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = vec![];
        if let Some(e) = crate::auth::validate::validate_required(&self.nome, "Nome da campanha", 120) {
            errors.push(e);
        }
        if let Some(e) = crate::auth::validate::validate_required(&self.descricao, "Descrição", 2000) {
            errors.push(e);
        }
        errors
    }

    /// Unknown or empty status falls back to draft, as the form's default.
    pub fn status(&self) -> CampaignStatus {
        CampaignStatus::parse(&self.status).unwrap_or(CampaignStatus::Paused)
    }

    pub fn to_new(&self) -> NewCampaign {
        NewCampaign {
            title: self.nome.trim().to_string(),
            description: self.descricao.trim().to_string(),
            cover_image: None,
            status: self.status(),
            show_graphic_assets: self.show_pecas_graficas.is_some(),
            show_spot_requests: self.show_solicitacao_spot.is_some(),
            show_material: self.show_material_explicativo.is_some(),
        }
    }

    pub fn to_update(&self) -> UpdateCampaign {
        UpdateCampaign {
            title: Some(self.nome.trim().to_string()),
            description: Some(self.descricao.trim().to_string()),
            cover_image: None,
            status: Some(self.status()),
            show_graphic_assets: Some(self.show_pecas_graficas.is_some()),
            show_spot_requests: Some(self.show_solicitacao_spot.is_some()),
            show_material: Some(self.show_material_explicativo.is_some()),
        }
    }
}
