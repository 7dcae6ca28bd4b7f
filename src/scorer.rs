//! Weighted keyword scoring of free-text queries against knowledge categories.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::knowledge::Category;

/// Keyword weight class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    High,
    Medium,
    Low,
}

impl Tier {
    pub fn weight(self) -> u32 {
        match self {
            Tier::High => 3,
            Tier::Medium => 2,
            Tier::Low => 1,
        }
    }
}

/// Keywords of one category, split by tier
#[derive(Debug, Clone)]
pub struct TieredKeywords {
    pub high: Vec<String>,
    pub medium: Vec<String>,
    pub low: Vec<String>,
}

impl TieredKeywords {
    pub fn new(high: &[&str], medium: &[&str], low: &[&str]) -> Self {
        let owned = |words: &[&str]| words.iter().map(|w| w.to_lowercase()).collect();
        Self {
            high: owned(high),
            medium: owned(medium),
            low: owned(low),
        }
    }

    fn tiers(&self) -> [(Tier, &[String]); 3] {
        [
            (Tier::High, self.high.as_slice()),
            (Tier::Medium, self.medium.as_slice()),
            (Tier::Low, self.low.as_slice()),
        ]
    }

    /// Weighted count of keywords contained in an already lowercased query
    fn score(&self, query: &str) -> u32 {
        self.tiers()
            .iter()
            .map(|(tier, words)| {
                let hits = words.iter().filter(|w| query.contains(w.as_str())).count() as u32;
                hits * tier.weight()
            })
            .sum()
    }
}

/// Immutable category → tiered keyword configuration
#[derive(Debug, Clone)]
pub struct CategoryScoreTable {
    entries: BTreeMap<Category, TieredKeywords>,
}

impl CategoryScoreTable {
    pub fn new(entries: impl IntoIterator<Item = (Category, TieredKeywords)>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    /// Keyword table for Belém and COP 30 questions
    pub fn belem() -> Self {
        Self::new([
            (
                Category::Attraction,
                TieredKeywords::new(
                    &["ver-o-peso", "docas", "theatro", "mangal", "basilica", "museu", "forte", "casa onze janelas"],
                    &["onde visitar", "turismo", "ponto turistico", "conhecer", "o que fazer", "passeio"],
                    &["visitar", "ver", "lugar", "local"],
                ),
            ),
            (
                Category::Restaurant,
                TieredKeywords::new(
                    &["acai", "tacaca", "maniçoba", "remanso", "point", "cairu", "manjar"],
                    &["onde comer", "restaurante", "comida", "almoco", "jantar", "gastronomia"],
                    &["comer", "prato", "bar", "lanche"],
                ),
            ),
            (
                Category::Hotel,
                TieredKeywords::new(
                    &["atrium", "radisson", "mercure", "ibis"],
                    &[
                        "onde ficar",
                        "hospedagem",
                        "hotel",
                        "pousada",
                        "hospedar",
                        "me hospedar",
                        "locais para me hospedar",
                        "link de locais",
                    ],
                    &["dormir", "pernoitar", "ficar", "estadia", "acomodacao", "quartos", "reserva"],
                ),
            ),
            (
                Category::Transport,
                TieredKeywords::new(
                    &["uber", "99", "aeroporto", "brt"],
                    &["como chegar", "transporte", "taxi", "onibus"],
                    &["ir", "chegar"],
                ),
            ),
            (
                Category::Event,
                TieredKeywords::new(
                    &["cop30", "cop 30", "conferencia clima"],
                    &["onu", "mudancas climaticas", "conferencia"],
                    &["evento", "2025"],
                ),
            ),
            (
                Category::Safety,
                TieredKeywords::new(
                    &["seguranca", "seguro", "cuidado", "perigo"],
                    &["emergencia", "policia", "risco"],
                    &["atencao"],
                ),
            ),
            (
                Category::Climate,
                TieredKeywords::new(
                    &["clima", "tempo", "chuva", "quando visitar"],
                    &["temperatura", "estacao", "sol"],
                    &["calor"],
                ),
            ),
            (
                Category::Shopping,
                TieredKeywords::new(
                    &["shopping", "comprar", "boulevard", "icoaraci"],
                    &["artesanato", "souvenir", "ceramica"],
                    &["loja", "mercado"],
                ),
            ),
        ])
    }

    pub fn keywords(&self, category: Category) -> Option<&TieredKeywords> {
        self.entries.get(&category)
    }
}

impl Default for CategoryScoreTable {
    fn default() -> Self {
        Self::belem()
    }
}

/// Category with a positive score for one query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScoredCategory {
    pub category: Category,
    pub score: u32,
}

/// Score every category of `table` against `query`.
///
/// Categories scoring zero are left out of the result.
pub fn score(query: &str, table: &CategoryScoreTable) -> BTreeMap<Category, u32> {
    let query = query.to_lowercase();
    if query.trim().is_empty() {
        return BTreeMap::new();
    }

    table
        .entries
        .iter()
        .map(|(category, keywords)| (*category, keywords.score(&query)))
        .filter(|(_, score)| *score > 0)
        .collect()
}

/// Order scores descending, ties broken by category priority
pub fn rank(scores: &BTreeMap<Category, u32>) -> Vec<ScoredCategory> {
    let mut ranked: Vec<ScoredCategory> = scores
        .iter()
        .map(|(category, score)| ScoredCategory {
            category: *category,
            score: *score,
        })
        .collect();
    ranked.sort_by(|a, b| b.score.cmp(&a.score).then(a.category.cmp(&b.category)));
    ranked
}
