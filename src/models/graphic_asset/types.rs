use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::validate::{validate_optional, validate_required};
use crate::models::campaign::CampaignStatus;

/// A row from `pecas_graficas`: a linked or uploaded creative file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GraphicAsset {
    pub id: Uuid,
    pub campaign_id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub file_url: Option<String>,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub file_size: Option<i64>,
    #[serde(default)]
    pub file_type: Option<String>,
    #[serde(default)]
    pub status: CampaignStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl GraphicAsset {
    pub fn is_image(&self) -> bool {
        self.file_type.as_deref().is_some_and(|t| t.starts_with("image/"))
    }

    /// "1.2 MB" style size for the card footer.
    pub fn size_label(&self) -> Option<String> {
        let bytes = self.file_size?;
        Some(if bytes < 1024 {
            format!("{bytes} B")
        } else if bytes < 1024 * 1024 {
            format!("{:.1} KB", bytes as f64 / 1024.0)
        } else {
            format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
        })
    }
}

/// Insert payload. The store adds `user_id` and `campaign_id`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NewGraphicAsset {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_size: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_type: Option<String>,
    pub status: CampaignStatus,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateGraphicAsset {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_size: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<CampaignStatus>,
}

/// Asset form: name, type line and an optional external link.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphicAssetForm {
    pub nome: String,
    #[serde(default)]
    pub tipo: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub status: String,
    pub csrf_token: String,
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

impl GraphicAssetForm {
    pub fn validate(&self) -> Vec<String> {
        let mut errors = vec![];
        if let Some(e) = validate_required(&self.nome, "Nome da peça", 120) {
            errors.push(e);
        }
        if let Some(e) = validate_optional(&self.tipo, "Tipo", 500) {
            errors.push(e);
        }
        let link = self.link.trim();
        if !link.is_empty() && !(link.starts_with("http://") || link.starts_with("https://")) {
            errors.push("Link deve começar com http:// ou https://".to_string());
        }
        errors
    }

    pub fn status(&self) -> CampaignStatus {
        CampaignStatus::parse(&self.status).unwrap_or_default()
    }

    pub fn to_new(&self) -> NewGraphicAsset {
        NewGraphicAsset {
            title: self.nome.trim().to_string(),
            description: non_empty(&self.tipo),
            file_url: non_empty(&self.link),
            status: self.status(),
            ..Default::default()
        }
    }

    /// Blank link keeps the stored file reference; missing or unknown
    /// status keeps the stored status.
    pub fn to_update(&self) -> UpdateGraphicAsset {
        UpdateGraphicAsset {
            title: Some(self.nome.trim().to_string()),
            description: Some(self.tipo.trim().to_string()),
            file_url: non_empty(&self.link),
            status: CampaignStatus::parse(&self.status),
            ..Default::default()
        }
    }
}
