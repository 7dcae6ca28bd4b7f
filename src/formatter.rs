//! Renders selected records as the text block shown in the kiosk chat.

use std::borrow::Cow;

use tracing::warn;

use crate::error::Result;
use crate::knowledge::{fields, Category, KnowledgeRecord};
use crate::selector::Selection;

/// Entries rendered in full; the rest are only counted
pub const DETAIL_LIMIT: usize = 4;

const HEADER: &str = "📍 **Informações Detalhadas:**\n\n";
const DIVIDER: &str = "\n---\n\n";
pub const MAP_LINK_NOTICE: &str =
    "🔗 *Todos os links do Google Maps são clicáveis para facilitar sua navegação!*";

const TRANSPORT_DESCRIPTION_CHARS: usize = 80;
const SUMMARY_DESCRIPTION_CHARS: usize = 100;
const ATTRACTION_TAGS: usize = 4;

/// Render a candidate, `None` when there is nothing to show.
///
/// Records that fail to render are logged and left out.
pub fn format(candidate: &[Selection<'_>]) -> Option<String> {
    if candidate.is_empty() {
        return None;
    }

    let shown = &candidate[..candidate.len().min(DETAIL_LIMIT)];
    let entries: Vec<String> = shown
        .iter()
        .filter_map(|selection| match render(selection.record) {
            Ok(entry) => Some(entry),
            Err(err) => {
                warn!(error = %err, "Skipping record that failed to format");
                None
            }
        })
        .collect();

    let mut response = String::from(HEADER);
    response.push_str(&entries.join(DIVIDER));

    let hidden = candidate.len() - shown.len();
    if hidden > 0 {
        response.push_str(&format!(
            "\n\n💬 *Encontrei mais {} opções adicionais. Para ver outras sugestões, faça uma pergunta mais específica ou me diga que tipo de experiência você procura!*",
            hidden
        ));
    }

    response.push_str("\n\n");
    response.push_str(MAP_LINK_NOTICE);
    Some(response)
}

/// Render one record with its category template
pub fn render(record: &KnowledgeRecord) -> Result<String> {
    let mut entry = Entry::default();
    match record.category() {
        Category::Attraction => {
            entry.title("🏛️", record.name()?, "Local");
            entry.line("📍 Endereço: ", record.address()?);
            entry.line("🗺️ Google Maps: ", record.map_link()?);
            entry.line("💰 Preço: ", record.text(fields::PRICE)?);
            entry.line("🕒 Horário: ", record.text(fields::HOURS)?);
            entry.line("🌐 Website: ", record.website()?);
            entry.line("📞 Telefone: ", record.phone()?);
            entry.line("💡 Dicas: ", record.tips()?);
            entry.list("🏷️ Tags: ", record.tags()?.map(|tags| {
                tags.into_iter().take(ATTRACTION_TAGS).collect()
            }));
        }
        Category::Restaurant => {
            entry.title("🍽️", record.name()?, "Restaurante");
            entry.line("🏷️ Categoria: ", record.text(fields::KIND)?);
            entry.line("🍲 Especialidade: ", record.text(fields::SPECIALTY)?);
            entry.line("📍 Endereço: ", record.address()?);
            entry.line("🗺️ Google Maps: ", record.map_link()?);
            entry.line("💰 Preço médio: ", record.text(fields::AVERAGE_PRICE)?);
            entry.line("🕒 Horário: ", record.text(fields::HOURS)?);
            entry.line("🌐 Website: ", record.website()?);
            entry.line("📞 Telefone: ", record.phone()?);
            entry.list("⭐ Pratos famosos: ", record.list(fields::FAMOUS_DISHES)?);
            entry.line("💡 Dicas: ", record.tips()?);
        }
        Category::Hotel => {
            let name = record.name()?;
            entry.title("🏨", name.clone(), "Hotel");
            entry.line(
                "⭐ Categoria: ",
                record.text(fields::KIND)?.map(|kind| Cow::Owned(kind.replacen('_', " ", 1))),
            );
            entry.line("📍 **Endereço:** ", record.address()?);
            if let Some(link) = record.map_link()? {
                entry.push(&format!("🗺️ **Ver no Mapa:** [Abrir no Google Maps]({})", link));
            } else if let Some(name) = name {
                entry.push(&format!("🗺️ **Ver no Mapa:** [Buscar no Google Maps]({})", map_search_link(&name)));
            }
            entry.line("💰 **Preço da diária:** ", record.text(fields::NIGHTLY_PRICE)?);
            if let Some(site) = record.website()? {
                entry.push(&format!("🌐 **Website:** [{}]({})", site, site));
            }
            entry.line("📞 Telefone: ", record.phone()?);
            entry.list("✨ Comodidades: ", record.list(fields::AMENITIES)?);
            entry.line("💡 Dicas: ", record.tips()?);
        }
        Category::Transport => {
            let kind = match record.text(fields::TRANSPORT_TYPE)? {
                Some(kind) => Some(kind),
                None => record.name()?,
            };
            entry.title("🚌", kind, "Transporte");
            if let Some(description) = record.description()? {
                entry.push(&format!("📝 {}...", truncate_chars(&description, TRANSPORT_DESCRIPTION_CHARS)));
            }
            entry.line("💰 ", record.text(fields::PRICE)?);
        }
        Category::Event => {
            entry.title("🌍", record.name()?, "COP 30 em Belém");
            entry.line("📅 ", record.text(fields::DATE)?);
            entry.line("📍 ", record.text(fields::MAIN_VENUE)?);
            if let Some(description) = record.description()? {
                entry.push(&format!("📝 {}", truncate_chars(&description, SUMMARY_DESCRIPTION_CHARS)));
            }
        }
        Category::Safety | Category::Climate | Category::Shopping => {
            entry.title("ℹ️", record.name()?, "Informação");
            if let Some(description) = record.description()? {
                entry.push(&format!("📝 {}", truncate_chars(&description, SUMMARY_DESCRIPTION_CHARS)));
            }
        }
    }
    Ok(entry.out)
}

/// Google Maps search link for a place without a stored map link
pub fn map_search_link(name: &str) -> String {
    let query = format!("{} Belém Pará", name);
    format!("https://maps.google.com/?q={}", urlencoding::encode(&query))
}

fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[derive(Default)]
struct Entry {
    out: String,
}

impl Entry {
    fn push(&mut self, line: &str) {
        self.out.push_str(line);
        self.out.push('\n');
    }

    fn title(&mut self, emoji: &str, name: Option<Cow<'_, str>>, fallback: &str) {
        let name = name.unwrap_or(Cow::Borrowed(fallback));
        self.push(&format!("{} **{}**", emoji, name));
    }

    fn line(&mut self, label: &str, value: Option<Cow<'_, str>>) {
        if let Some(value) = value {
            self.push(&format!("{}{}", label, value));
        }
    }

    fn list(&mut self, label: &str, values: Option<Vec<Cow<'_, str>>>) {
        if let Some(values) = values.filter(|v| !v.is_empty()) {
            self.push(&format!("{}{}", label, values.join(", ")));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::KnowledgeBase;
    use serde_json::json;

    fn kb() -> KnowledgeBase {
        KnowledgeBase::from_json(json!({
            "hoteis": [
                {"nome": "Ibis Styles Belém", "categoria": "3_estrelas", "preco_diaria": "R$ 250",
                 "comodidades": ["Wi-Fi", "Café da manhã"]},
                {"nome": "Atrium Quinta de Pedras", "google_maps_link": "https://maps.app/atrium",
                 "website": "https://atrium.example"},
                {"nome": "Quebrado", "endereco": {"rua": "sem texto"}},
                {"nome": "Radisson"},
                {"nome": "Mercure"}
            ],
            "transporte": [
                {"tipo": "BRT Belém", "descricao": "x".repeat(120), "preco": "R$ 4,30"}
            ]
        }))
        .unwrap()
    }

    fn selections(kb: &KnowledgeBase, category: Category) -> Vec<Selection<'_>> {
        kb.records(category)
            .unwrap()
            .iter()
            .map(|record| Selection {
                category,
                record,
                score: 1,
            })
            .collect()
    }

    #[test]
    fn empty_candidate_formats_to_none() {
        assert_eq!(format(&[]), None);
    }

    #[test]
    fn non_empty_candidate_ends_with_map_notice() {
        let kb = kb();
        let text = format(&selections(&kb, Category::Transport)).unwrap();
        assert!(text.starts_with(HEADER));
        assert!(text.ends_with(MAP_LINK_NOTICE));
        assert!(!text.contains("Encontrei mais"));
    }

    #[test]
    fn hotel_template_generates_search_link_and_skips_malformed_records() {
        let kb = kb();
        let text = format(&selections(&kb, Category::Hotel)).unwrap();

        assert!(text.contains("🏨 **Ibis Styles Belém**"));
        assert!(text.contains("⭐ Categoria: 3 estrelas"));
        assert!(text.contains("https://maps.google.com/?q=Ibis%20Styles%20Bel%C3%A9m%20Bel%C3%A9m%20Par%C3%A1"));
        assert!(text.contains("[Abrir no Google Maps](https://maps.app/atrium)"));
        assert!(text.contains("[https://atrium.example](https://atrium.example)"));
        assert!(text.contains("✨ Comodidades: Wi-Fi, Café da manhã"));
        // malformed address: skipped without aborting the rest
        assert!(!text.contains("Quebrado"));
        assert!(text.contains("Radisson"));
        // five selected, four rendered in detail
        assert!(!text.contains("Mercure"));
        assert!(text.contains("Encontrei mais 1 opções adicionais"));
        assert_eq!(text.matches(DIVIDER).count(), 2);
    }

    #[test]
    fn transport_description_is_truncated() {
        let kb = kb();
        let record = &kb.records(Category::Transport).unwrap()[0];
        let entry = render(record).unwrap();
        assert!(entry.starts_with("🚌 **BRT Belém**"));
        assert!(entry.contains(&format!("📝 {}...\n", "x".repeat(80))));
        assert!(entry.contains("💰 R$ 4,30"));
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        assert_eq!(truncate_chars("açaí paraense", 4), "açaí");
        assert_eq!(truncate_chars("curto", 80), "curto");
    }
}
