//! Turns category scores into a bounded list of records to show.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use crate::knowledge::{fields, Category, KnowledgeBase, KnowledgeRecord};
use crate::scorer;

/// Records returned by a forced-intent override
pub const FORCED_INTENT_LIMIT: usize = 4;
/// Score attached to forced-intent records
pub const FORCED_INTENT_SCORE: u32 = 5;
/// Categories kept from the ranking
pub const TOP_CATEGORIES: usize = 2;
/// Records taken from each selected category
pub const PER_CATEGORY_LIMIT: usize = 3;
/// Hard cap on the whole candidate
pub const MAX_SELECTIONS: usize = 5;

const GENERIC_INTENT_SCORE: u32 = 1;

struct IntentRule {
    category: Category,
    triggers: &'static [&'static str],
}

impl IntentRule {
    fn matches(&self, query: &str) -> bool {
        self.triggers.iter().any(|t| query.contains(t))
    }
}

// Lodging is checked before dining.
const FORCED_INTENTS: [IntentRule; 2] = [
    IntentRule {
        category: Category::Hotel,
        triggers: &["hosped", "hotel", "ficar", "dormir", "acomod", "link de locais"],
    },
    IntentRule {
        category: Category::Restaurant,
        triggers: &["comer", "restaurante", "comida", "almoç", "jantar"],
    },
];

const GENERIC_INTENTS: [IntentRule; 3] = [
    IntentRule {
        category: Category::Hotel,
        triggers: &["hotel", "hosped", "ficar", "dormir"],
    },
    IntentRule {
        category: Category::Restaurant,
        triggers: &["comer", "restaurante", "comida"],
    },
    IntentRule {
        category: Category::Attraction,
        triggers: &["visitar", "turismo", "conhecer"],
    },
];

/// One record chosen for an answer
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Selection<'kb> {
    pub category: Category,
    pub record: &'kb KnowledgeRecord,
    pub score: u32,
}

/// Ordered selections for one query, never more than [`MAX_SELECTIONS`]
pub type AnswerCandidate<'kb> = Vec<Selection<'kb>>;

/// Pick the records that answer `raw_query`.
///
/// Rules are tried in order and the first one producing records wins:
/// forced intent, ranked categories, token matching, generic intent.
pub fn select<'kb>(
    scored: &BTreeMap<Category, u32>,
    kb: &'kb KnowledgeBase,
    raw_query: &str,
) -> AnswerCandidate<'kb> {
    let query = raw_query.to_lowercase();

    if let Some(forced) = forced_intent(&query, kb) {
        return forced;
    }

    let mut selections = ranked_categories(scored, kb);
    if selections.is_empty() {
        selections = token_matches(&query, kb);
    }
    if selections.is_empty() {
        selections = generic_intents(&query, kb);
    }

    selections.truncate(MAX_SELECTIONS);
    selections
}

fn take<'kb>(
    category: Category,
    records: &'kb [KnowledgeRecord],
    limit: usize,
    score: u32,
) -> impl Iterator<Item = Selection<'kb>> {
    records.iter().take(limit).map(move |record| Selection {
        category,
        record,
        score,
    })
}

fn forced_intent<'kb>(query: &str, kb: &'kb KnowledgeBase) -> Option<AnswerCandidate<'kb>> {
    FORCED_INTENTS.iter().find_map(|rule| {
        if !rule.matches(query) {
            return None;
        }
        let records = kb.records(rule.category)?;
        debug!(category = %rule.category, "Forced intent override");
        Some(take(rule.category, records, FORCED_INTENT_LIMIT, FORCED_INTENT_SCORE).collect())
    })
}

fn ranked_categories<'kb>(scored: &BTreeMap<Category, u32>, kb: &'kb KnowledgeBase) -> AnswerCandidate<'kb> {
    scorer::rank(scored)
        .into_iter()
        .take(TOP_CATEGORIES)
        .filter_map(|ranked| {
            kb.records(ranked.category)
                .map(|records| take(ranked.category, records, PER_CATEGORY_LIMIT, ranked.score))
        })
        .flatten()
        .collect()
}

fn token_score(record: &KnowledgeRecord, tokens: &[&str]) -> u32 {
    let name = record.searchable(fields::NAME);
    let description = record.searchable(fields::DESCRIPTION);
    let tags = record.searchable_tags();

    tokens
        .iter()
        .map(|token| {
            let mut score = 0;
            if name.as_deref().is_some_and(|n| n.contains(token)) {
                score += 2;
            }
            if description.as_deref().is_some_and(|d| d.contains(token)) {
                score += 1;
            }
            if tags.iter().any(|tag| tag.contains(token)) {
                score += 1;
            }
            score
        })
        .sum()
}

/// Scans every record of each category, not just the leading few, and keeps
/// at most `PER_CATEGORY_LIMIT` matches per category in record order.
fn token_matches<'kb>(query: &str, kb: &'kb KnowledgeBase) -> AnswerCandidate<'kb> {
    let tokens: Vec<&str> = query
        .split_whitespace()
        .filter(|word| word.chars().count() > 2)
        .collect();
    if tokens.is_empty() {
        return Vec::new();
    }

    kb.categories()
        .flat_map(|(category, records)| {
            records
                .iter()
                .filter_map(|record| {
                    let score = token_score(record, &tokens);
                    (score > 0).then_some(Selection {
                        category,
                        record,
                        score,
                    })
                })
                .take(PER_CATEGORY_LIMIT)
                .collect::<Vec<_>>()
        })
        .collect()
}

fn generic_intents<'kb>(query: &str, kb: &'kb KnowledgeBase) -> AnswerCandidate<'kb> {
    GENERIC_INTENTS
        .iter()
        .filter(|rule| rule.matches(query))
        .filter_map(|rule| {
            kb.records(rule.category)
                .map(|records| take(rule.category, records, PER_CATEGORY_LIMIT, GENERIC_INTENT_SCORE))
        })
        .flatten()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scorer::{score, CategoryScoreTable};
    use serde_json::json;

    fn fixture() -> KnowledgeBase {
        KnowledgeBase::from_json(json!({
            "pontos_turisticos": [
                {"nome": "Mercado Ver-o-Peso", "tags": ["feira", "mercado"]},
                {"nome": "Theatro da Paz"},
                {"nome": "Mangal das Garças"},
                {"nome": "Estação das Docas"}
            ],
            "restaurantes": [
                {"nome": "Remanso do Bosque"},
                {"nome": "Point do Açaí", "tags": ["açaí", "tacacá"]},
                {"nome": "Lá em Casa"},
                {"nome": "Manjar das Garças"},
                {"nome": "Cairu"}
            ],
            "hoteis": [
                {"nome": "Atrium Quinta de Pedras"},
                {"nome": "Radisson Maiorana"},
                {"nome": "Grand Mercure"},
                {"nome": "Ibis Styles"},
                {"nome": "Hotel Grão Pará"}
            ],
            "clima": [
                {"nome": "Estação chuvosa", "descricao": "Chuvas diárias de dezembro a maio"}
            ],
            "compras": [
                {"nome": "Feira de Icoaraci", "descricao": "Cerâmica marajoara"}
            ]
        }))
        .unwrap()
    }

    fn run<'kb>(query: &str, kb: &'kb KnowledgeBase) -> AnswerCandidate<'kb> {
        select(&score(query, &CategoryScoreTable::belem()), kb, query)
    }

    #[test]
    fn lodging_intent_overrides_other_keywords() {
        let kb = fixture();
        let picked = run("hospedagem perto do ver-o-peso com museu e forte", &kb);
        assert_eq!(picked.len(), FORCED_INTENT_LIMIT);
        assert!(picked.iter().all(|s| s.category == Category::Hotel));
        assert!(picked.iter().all(|s| s.score == FORCED_INTENT_SCORE));
    }

    #[test]
    fn lodging_wins_over_dining_when_both_present() {
        let kb = fixture();
        let picked = run("onde comer perto do hotel", &kb);
        assert!(picked.iter().all(|s| s.category == Category::Hotel));
    }

    #[test]
    fn forced_intent_falls_through_when_category_absent() {
        let kb = KnowledgeBase::from_json(json!({
            "pontos_turisticos": [{"nome": "Theatro da Paz"}]
        }))
        .unwrap();
        let picked = run("hotel perto do theatro", &kb);
        assert_eq!(picked.len(), 1);
        assert_eq!(picked[0].category, Category::Attraction);
    }

    #[test]
    fn ranked_selection_takes_top_two_categories() {
        let kb = fixture();
        // Attraction: docas(3) + mangal(3); Climate: chuva(3)
        let picked = run("docas e mangal na chuva", &kb);
        let categories: Vec<Category> = picked.iter().map(|s| s.category).collect();
        assert_eq!(
            categories,
            vec![
                Category::Attraction,
                Category::Attraction,
                Category::Attraction,
                Category::Climate
            ]
        );
        assert_eq!(picked[0].score, 6);
        assert_eq!(picked[0].record.display_name(), "Mercado Ver-o-Peso");
    }

    #[test]
    fn token_fallback_matches_name_description_and_tags() {
        let kb = fixture();
        let picked = run("marajoara", &kb);
        assert_eq!(picked.len(), 1);
        assert_eq!(picked[0].category, Category::Shopping);
        assert_eq!(picked[0].score, 1);

        let picked = run("garças", &kb);
        assert!(picked.iter().all(|s| s.score == 2));
        assert_eq!(picked.len(), 2);
    }

    #[test]
    fn token_fallback_ignores_short_words() {
        let kb = fixture();
        assert!(run("xo pa", &kb).is_empty());
    }

    #[test]
    fn never_returns_more_than_five() {
        let kb = fixture();
        for query in [
            "hotel",
            "comer",
            "docas mangal theatro acai tacaca remanso",
            "garças",
            "das",
            "abc xyz",
        ] {
            assert!(run(query, &kb).len() <= MAX_SELECTIONS, "query {query}");
        }
    }

    #[test]
    fn token_fallback_caps_each_category() {
        let kb = fixture();
        // "das" appears in names across several categories
        let picked = run("das", &kb);
        let attractions = picked.iter().filter(|s| s.category == Category::Attraction).count();
        assert!(attractions <= PER_CATEGORY_LIMIT);
        assert!(picked.len() <= MAX_SELECTIONS);
    }

    #[test]
    fn token_fallback_reaches_records_past_the_third() {
        let kb = fixture();
        // fourth hotel
        let picked = run("styles", &kb);
        assert_eq!(picked.len(), 1);
        assert_eq!(picked[0].category, Category::Hotel);
        assert_eq!(picked[0].record.display_name(), "Ibis Styles");
    }

    #[test]
    fn no_match_yields_empty_candidate() {
        let kb = fixture();
        assert!(run("abc xyz", &kb).is_empty());
    }
}
