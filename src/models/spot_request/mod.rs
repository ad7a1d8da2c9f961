pub mod duration;
mod types;

pub use duration::{estimate_duration_secs, format_duration, word_count};
pub use types::*;

use uuid::Uuid;

use crate::store::{Keyed, Messages, Resource};

impl Keyed for SpotRequest {
    fn key(&self) -> Uuid {
        self.id
    }
}

impl Resource for SpotRequest {
    type New = NewSpotRequest;
    type Update = UpdateSpotRequest;

    const TABLE: &'static str = "solicitacao_spot";
    const PARENT_COLUMN: Option<&'static str> = Some("campaign_id");
    const MESSAGES: Messages = Messages {
        load_failed: ("Erro ao carregar solicitações", "Não foi possível carregar as solicitações de spot."),
        created: ("Solicitação criada!", "A solicitação \"{title}\" foi criada com sucesso."),
        create_failed: ("Erro ao criar solicitação", "Não foi possível criar a solicitação de spot."),
        updated: ("Solicitação atualizada!", "A solicitação foi atualizada com sucesso."),
        update_failed: ("Erro ao atualizar solicitação", "Não foi possível atualizar a solicitação."),
        deleted: ("Solicitação excluída!", "A solicitação foi excluída com sucesso."),
        delete_failed: ("Erro ao excluir solicitação", "Não foi possível excluir a solicitação."),
    };

    /// The first words of the script.
    fn display_title(&self) -> String {
        const MAX_CHARS: usize = 40;
        let script = self.script.split_whitespace().collect::<Vec<_>>().join(" ");
        if script.chars().count() <= MAX_CHARS {
            script
        } else {
            let head: String = script.chars().take(MAX_CHARS).collect();
            format!("{}...", head.trim_end())
        }
    }
}
