pub mod guide;
mod types;

pub use guide::{CAMPAIGN_GUIDE, download_file_name};
pub use types::*;

use uuid::Uuid;

use crate::remote::{Query, SortDir};
use crate::store::{Keyed, Messages, Ordered, Resource};

impl Keyed for ExplanatoryMaterial {
    fn key(&self) -> Uuid {
        self.id
    }
}

impl Resource for ExplanatoryMaterial {
    type New = NewExplanatoryMaterial;
    type Update = UpdateExplanatoryMaterial;

    const TABLE: &'static str = "material_explicativo";
    const PARENT_COLUMN: Option<&'static str> = Some("campaign_id");
    const MESSAGES: Messages = Messages {
        load_failed: ("Erro ao carregar materiais", "Não foi possível carregar os materiais explicativos."),
        created: ("Material criado!", "O material \"{title}\" foi criado com sucesso."),
        create_failed: ("Erro ao criar material", "Não foi possível criar o material explicativo."),
        updated: ("Material atualizado!", "O material foi atualizado com sucesso."),
        update_failed: ("Erro ao atualizar material", "Não foi possível atualizar o material."),
        deleted: ("Material excluído!", "O material foi excluído com sucesso."),
        delete_failed: ("Erro ao excluir material", "Não foi possível excluir o material."),
    };

    fn display_title(&self) -> String {
        self.title.clone()
    }

    fn ordering(query: Query) -> Query {
        query
            .order(Self::ORDER_COLUMN, SortDir::Asc)
            .order("created_at", SortDir::Desc)
    }
}

impl Ordered for ExplanatoryMaterial {
    fn order_index(&self) -> i32 {
        self.order_index
    }
}
