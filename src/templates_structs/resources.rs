use askama::Template;

use crate::models::explanatory_material::ExplanatoryMaterial;
use crate::models::graphic_asset::GraphicAsset;
use crate::models::spot_request::{SpotRequest, SpotStatus};

use super::{CampaignHeader, PageContext};

#[derive(Template)]
#[template(path = "graphic_assets/index.html")]
pub struct GraphicAssetsTemplate {
    pub ctx: PageContext,
    pub campaign: CampaignHeader,
    pub assets: Vec<GraphicAsset>,
    pub errors: Vec<String>,
}

#[derive(Template)]
#[template(path = "spot_requests/index.html")]
pub struct SpotRequestsTemplate {
    pub ctx: PageContext,
    pub campaign: CampaignHeader,
    pub spots: Vec<SpotRequest>,
    pub statuses: [SpotStatus; 3],
    pub draft: String,
    pub errors: Vec<String>,
}

/// A material with the `ordem` values for its move-up / move-down buttons.
pub struct MaterialRow {
    pub material: ExplanatoryMaterial,
    pub move_up: Option<String>,
    pub move_down: Option<String>,
}

impl MaterialRow {
    /// Rows for `materials` in their current order.
    pub fn build(materials: Vec<ExplanatoryMaterial>) -> Vec<MaterialRow> {
        let ids: Vec<_> = materials.iter().map(|m| m.id).collect();
        let swapped = |a: usize, b: usize| {
            let mut order = ids.clone();
            order.swap(a, b);
            order.iter().map(|id| id.to_string()).collect::<Vec<_>>().join(",")
        };
        let last = ids.len().saturating_sub(1);
        materials
            .into_iter()
            .enumerate()
            .map(|(i, material)| MaterialRow {
                material,
                move_up: (i > 0).then(|| swapped(i - 1, i)),
                move_down: (i < last).then(|| swapped(i, i + 1)),
            })
            .collect()
    }
}

#[derive(Template)]
#[template(path = "materials/index.html")]
pub struct MaterialsTemplate {
    pub ctx: PageContext,
    pub campaign: CampaignHeader,
    pub materials: Vec<MaterialRow>,
    pub guide: &'static str,
    pub errors: Vec<String>,
}
