mod sections;
mod types;
pub mod queries;

pub use sections::{Section, SectionLink};
pub use types::*;

use uuid::Uuid;

use crate::store::{Keyed, Messages, Resource};

impl Keyed for Campaign {
    fn key(&self) -> Uuid {
        self.id
    }
}

impl Resource for Campaign {
    type New = NewCampaign;
    type Update = UpdateCampaign;

    const TABLE: &'static str = "campaigns";
    const MESSAGES: Messages = Messages {
        load_failed: ("Erro ao carregar campanhas", "Não foi possível carregar as campanhas."),
        created: ("Campanha criada!", "A campanha \"{title}\" foi criada com sucesso."),
        create_failed: ("Erro ao criar campanha", "Não foi possível criar a campanha."),
        updated: ("Campanha atualizada!", "A campanha foi atualizada com sucesso."),
        update_failed: ("Erro ao atualizar campanha", "Não foi possível atualizar a campanha."),
        deleted: ("Campanha excluída!", "A campanha foi excluída com sucesso."),
        delete_failed: ("Erro ao excluir campanha", "Não foi possível excluir a campanha."),
    };

    fn display_title(&self) -> String {
        self.title.clone()
    }
}
