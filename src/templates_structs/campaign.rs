use askama::Template;
use uuid::Uuid;

use crate::models::campaign::{Campaign, CampaignStatus, SectionLink};

use super::PageContext;

pub const PLACEHOLDER_COVER: &str = "/static/img/campaign-placeholder.svg";

/// A campaign as drawn on the grid.
pub struct CampaignCard {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub cover: String,
    pub status: CampaignStatus,
    pub sections: Vec<SectionLink>,
}

impl From<&Campaign> for CampaignCard {
    fn from(c: &Campaign) -> Self {
        Self {
            id: c.id,
            title: c.title.clone(),
            description: c.description.clone(),
            cover: c.cover_image.clone().unwrap_or_else(|| PLACEHOLDER_COVER.to_string()),
            status: c.status,
            sections: c.sections(),
        }
    }
}

/// Title and cover shown above every sub-resource page.
pub struct CampaignHeader {
    pub id: Uuid,
    pub title: String,
    pub cover: String,
}

impl From<&Campaign> for CampaignHeader {
    fn from(c: &Campaign) -> Self {
        Self {
            id: c.id,
            title: c.title.clone(),
            cover: c.cover_image.clone().unwrap_or_else(|| PLACEHOLDER_COVER.to_string()),
        }
    }
}

#[derive(Template)]
#[template(path = "campaigns/index.html")]
pub struct CampaignsTemplate {
    pub ctx: PageContext,
    pub campaigns: Vec<CampaignCard>,
    pub errors: Vec<String>,
}

#[derive(Template)]
#[template(path = "campaigns/edit.html")]
pub struct CampaignEditTemplate {
    pub ctx: PageContext,
    pub campaign: Campaign,
    pub errors: Vec<String>,
}
