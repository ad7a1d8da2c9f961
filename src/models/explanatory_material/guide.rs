//! The campaign guide offered for download on the material page.

use uuid::Uuid;

pub const CAMPAIGN_GUIDE: &str = "# Guia da Campanha de Marketing

## Objetivo da Campanha
Esta campanha visa aumentar a visibilidade da marca e gerar mais leads qualificados através de uma abordagem multi-canal integrada.

## Público-Alvo
- **Demografia**: Adultos de 25-45 anos
- **Interesses**: Tecnologia, inovação, lifestyle
- **Localização**: Principais centros urbanos
- **Comportamento**: Ativos digitalmente, buscam soluções práticas

## Principais Mensagens
1. **Proposta de Valor**: Solução inovadora que simplifica o dia a dia
2. **Diferencial Competitivo**: Tecnologia de ponta com atendimento humanizado
3. **Call to Action**: \"Descubra como transformar sua rotina hoje mesmo\"

## Canais de Comunicação
- **Digital**: Redes sociais, e-mail marketing, Google Ads
- **Tradicional**: Rádio, outdoor, material impresso
- **Eventos**: Feiras, workshops, demonstrações

## Cronograma
- **Fase 1 (Semanas 1-2)**: Lançamento e awareness
- **Fase 2 (Semanas 3-4)**: Engajamento e conversão
- **Fase 3 (Semanas 5-6)**: Retenção e fidelização

## Métricas de Sucesso
- Alcance: +50% na base atual
- Engajamento: Taxa de clique >3%
- Conversão: +25% em leads qualificados
- ROI: Retorno mínimo de 300%

## Materiais Disponíveis
- Peças gráficas para todas as plataformas
- Scripts para spots de rádio
- Templates de e-mail marketing
- Guias de tom de voz e identidade visual

## Contatos da Equipe
- **Gerente de Campanha**: marketing@empresa.com
- **Designer**: design@empresa.com
- **Copywriter**: copy@empresa.com
- **Mídia**: midia@empresa.com

## Observações Importantes
- Todos os materiais devem seguir o manual da marca
- Aprovações necessárias antes da veiculação
- Relatórios semanais de performance
- Ajustes podem ser feitos conforme resultados

---

*Este documento é confidencial e destinado exclusivamente ao uso interno da equipe de marketing.*
";

pub fn download_file_name(campaign_id: Uuid) -> String {
    format!("material-explicativo-campanha-{campaign_id}.txt")
}
