mod types;

pub use types::*;

use uuid::Uuid;

use crate::store::{Keyed, Messages, Resource};

impl Keyed for GraphicAsset {
    fn key(&self) -> Uuid {
        self.id
    }
}

impl Resource for GraphicAsset {
    type New = NewGraphicAsset;
    type Update = UpdateGraphicAsset;

    const TABLE: &'static str = "pecas_graficas";
    const PARENT_COLUMN: Option<&'static str> = Some("campaign_id");
    const MESSAGES: Messages = Messages {
        load_failed: ("Erro ao carregar peças gráficas", "Não foi possível carregar as peças gráficas."),
        created: ("Peça gráfica criada!", "A peça gráfica \"{title}\" foi criada com sucesso."),
        create_failed: ("Erro ao criar peça gráfica", "Não foi possível criar a peça gráfica."),
        updated: ("Peça gráfica atualizada!", "A peça gráfica foi atualizada com sucesso."),
        update_failed: ("Erro ao atualizar peça gráfica", "Não foi possível atualizar a peça gráfica."),
        deleted: ("Peça gráfica excluída!", "A peça gráfica foi excluída com sucesso."),
        delete_failed: ("Erro ao excluir peça gráfica", "Não foi possível excluir a peça gráfica."),
    };

    fn display_title(&self) -> String {
        self.title.clone()
    }
}
