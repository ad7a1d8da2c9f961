use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::validate::validate_required;
use crate::models::campaign::CampaignStatus;

/// A row from `material_explicativo`. `order_index` is the zero-based
/// position among the campaign's materials.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExplanatoryMaterial {
    pub id: Uuid,
    pub campaign_id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub file_url: Option<String>,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub file_type: Option<String>,
    #[serde(default)]
    pub status: CampaignStatus,
    #[serde(default)]
    pub order_index: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewExplanatoryMaterial {
    pub title: String,
    pub content: String,
    pub status: CampaignStatus,
    pub order_index: i32,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateExplanatoryMaterial {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<CampaignStatus>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MaterialForm {
    pub titulo: String,
    #[serde(default)]
    pub conteudo: String,
    #[serde(default)]
    pub status: String,
    pub csrf_token: String,
}

impl MaterialForm {
    pub fn validate(&self) -> Vec<String> {
        let mut errors = vec![];
        if let Some(e) = validate_required(&self.titulo, "Título", 200) {
            errors.push(e);
        }
        if let Some(e) = validate_required(&self.conteudo, "Conteúdo", 50_000) {
            errors.push(e);
        }
        errors
    }

    fn status(&self) -> CampaignStatus {
        CampaignStatus::parse(&self.status).unwrap_or_default()
    }

    /// New material goes after its `existing` siblings.
    pub fn to_new(&self, existing: usize) -> NewExplanatoryMaterial {
        NewExplanatoryMaterial {
            title: self.titulo.trim().to_string(),
            content: self.conteudo.trim().to_string(),
            status: self.status(),
            order_index: existing as i32,
        }
    }

    /// Missing or unknown status leaves the stored one alone.
    pub fn to_update(&self) -> UpdateExplanatoryMaterial {
        UpdateExplanatoryMaterial {
            title: Some(self.titulo.trim().to_string()),
            content: Some(self.conteudo.trim().to_string()),
            status: CampaignStatus::parse(&self.status),
        }
    }
}

/// Reorder form: material ids, comma separated, in their new order.
#[derive(Debug, Clone, Deserialize)]
pub struct ReorderForm {
    pub ordem: String,
    pub csrf_token: String,
}

impl ReorderForm {
    /// `None` if any entry is not a uuid.
    pub fn ids(&self) -> Option<Vec<Uuid>> {
        self.ordem
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| Uuid::parse_str(s).ok())
            .collect()
    }
}
