use uuid::Uuid;

use super::types::Campaign;

/// The three sub-resource entry points a campaign card can expose.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    GraphicAssets,
    SpotRequests,
    Material,
}

impl Section {
    pub const ALL: [Section; 3] = [Section::GraphicAssets, Section::SpotRequests, Section::Material];

    pub fn slug(&self) -> &'static str {
        match self {
            Section::GraphicAssets => "pecas-graficas",
            Section::SpotRequests => "solicitacao-spot",
            Section::Material => "material-explicativo",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Section::GraphicAssets => "Peças Gráficas",
            Section::SpotRequests => "Solicitação de Spot",
            Section::Material => "Material Explicativo",
        }
    }

    pub fn href(&self, campaign_id: Uuid) -> String {
        format!("/campanha/{}/{}", campaign_id, self.slug())
    }
}

/// Link rendered on a campaign card.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionLink {
    pub section: Section,
    pub label: &'static str,
    pub href: String,
}

impl Campaign {
    pub fn shows(&self, section: Section) -> bool {
        match section {
            Section::GraphicAssets => self.show_graphic_assets,
            Section::SpotRequests => self.show_spot_requests,
            Section::Material => self.show_material,
        }
    }

    /// Entry points whose visibility flag is on, in card order.
    pub fn sections(&self) -> Vec<SectionLink> {
        Section::ALL
            .iter()
            .filter(|s| self.shows(**s))
            .map(|s| SectionLink { section: *s, label: s.label(), href: s.href(self.id) })
            .collect()
    }
}
