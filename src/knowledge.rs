use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::{OraculumError, Result};

/// Category of local knowledge.
///
/// Variant order is the ranking tie-break order: when two categories score the
/// same, the one declared first wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema)]
pub enum Category {
    #[serde(rename = "pontos_turisticos")]
    Attraction,
    #[serde(rename = "restaurantes")]
    Restaurant,
    #[serde(rename = "hoteis")]
    Hotel,
    #[serde(rename = "transporte")]
    Transport,
    #[serde(rename = "cop30")]
    Event,
    #[serde(rename = "seguranca")]
    Safety,
    #[serde(rename = "clima")]
    Climate,
    #[serde(rename = "compras")]
    Shopping,
}

impl Category {
    /// All categories in priority order
    pub const ALL: [Category; 8] = [
        Category::Attraction,
        Category::Restaurant,
        Category::Hotel,
        Category::Transport,
        Category::Event,
        Category::Safety,
        Category::Climate,
        Category::Shopping,
    ];

    /// Key used by the knowledge-base JSON document
    pub fn key(self) -> &'static str {
        match self {
            Category::Attraction => "pontos_turisticos",
            Category::Restaurant => "restaurantes",
            Category::Hotel => "hoteis",
            Category::Transport => "transporte",
            Category::Event => "cop30",
            Category::Safety => "seguranca",
            Category::Climate => "clima",
            Category::Shopping => "compras",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|category| category.key() == s)
            .ok_or_else(|| format!("unknown knowledge category '{}'", s))
    }
}

/// JSON field names of a knowledge record
pub mod fields {
    pub const NAME: &str = "nome";
    pub const DESCRIPTION: &str = "descricao";
    pub const ADDRESS: &str = "endereco";
    pub const MAP_LINK: &str = "google_maps_link";
    pub const PRICE: &str = "preco";
    pub const AVERAGE_PRICE: &str = "preco_medio";
    pub const NIGHTLY_PRICE: &str = "preco_diaria";
    pub const HOURS: &str = "horario";
    pub const WEBSITE: &str = "website";
    pub const PHONE: &str = "telefone";
    pub const TIPS: &str = "dicas";
    pub const TAGS: &str = "tags";
    pub const AMENITIES: &str = "comodidades";
    pub const FAMOUS_DISHES: &str = "pratos_famosos";
    pub const KIND: &str = "categoria";
    pub const SPECIALTY: &str = "especialidade";
    pub const TRANSPORT_TYPE: &str = "tipo";
    pub const DATE: &str = "data";
    pub const MAIN_VENUE: &str = "local_principal";
}

/// One entry of the knowledge base.
///
/// Records keep their original JSON fields; the accessors below interpret the
/// known ones. A text field holding an array or object, or a list holding
/// objects, is reported as a [`OraculumError::FormatFailure`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KnowledgeRecord {
    #[serde(skip)]
    category: Category,
    #[serde(flatten)]
    fields: Map<String, Value>,
}

impl KnowledgeRecord {
    pub fn new(category: Category, fields: Map<String, Value>) -> Self {
        Self { category, fields }
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Name for logs and error messages, never fails
    pub fn display_name(&self) -> &str {
        self.fields
            .get(fields::NAME)
            .and_then(Value::as_str)
            .unwrap_or("<unnamed>")
    }

    /// Read a text field. Empty strings count as absent.
    pub fn text(&self, field: &str) -> Result<Option<Cow<'_, str>>> {
        match self.fields.get(field) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
            Some(Value::String(s)) => Ok(Some(Cow::Borrowed(s.as_str()))),
            Some(Value::Number(n)) => Ok(Some(Cow::Owned(n.to_string()))),
            Some(Value::Bool(b)) => Ok(Some(Cow::Owned(b.to_string()))),
            Some(other) => Err(self.malformed(field, other)),
        }
    }

    /// Read a list field. Anything that is not an array counts as absent.
    pub fn list(&self, field: &str) -> Result<Option<Vec<Cow<'_, str>>>> {
        let Some(Value::Array(items)) = self.fields.get(field) else {
            return Ok(None);
        };

        items
            .iter()
            .map(|item| match item {
                Value::String(s) => Ok(Cow::Borrowed(s.as_str())),
                Value::Number(n) => Ok(Cow::Owned(n.to_string())),
                other => Err(self.malformed(field, other)),
            })
            .collect::<Result<Vec<_>>>()
            .map(Some)
    }

    pub fn name(&self) -> Result<Option<Cow<'_, str>>> {
        self.text(fields::NAME)
    }

    pub fn description(&self) -> Result<Option<Cow<'_, str>>> {
        self.text(fields::DESCRIPTION)
    }

    pub fn address(&self) -> Result<Option<Cow<'_, str>>> {
        self.text(fields::ADDRESS)
    }

    pub fn map_link(&self) -> Result<Option<Cow<'_, str>>> {
        self.text(fields::MAP_LINK)
    }

    pub fn website(&self) -> Result<Option<Cow<'_, str>>> {
        self.text(fields::WEBSITE)
    }

    pub fn phone(&self) -> Result<Option<Cow<'_, str>>> {
        self.text(fields::PHONE)
    }

    pub fn tips(&self) -> Result<Option<Cow<'_, str>>> {
        self.text(fields::TIPS)
    }

    pub fn tags(&self) -> Result<Option<Vec<Cow<'_, str>>>> {
        self.list(fields::TAGS)
    }

    /// Lowercased text of a string field, ignoring anything malformed.
    /// Used by matching, which must never fail.
    pub(crate) fn searchable(&self, field: &str) -> Option<String> {
        self.fields
            .get(field)
            .and_then(Value::as_str)
            .map(str::to_lowercase)
    }

    /// Lowercased string tags, ignoring anything malformed
    pub(crate) fn searchable_tags(&self) -> Vec<String> {
        match self.fields.get(fields::TAGS) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_lowercase)
                .collect(),
            _ => Vec::new(),
        }
    }

    fn malformed(&self, field: &str, found: &Value) -> OraculumError {
        let kind = match found {
            Value::Array(_) => "an array",
            Value::Object(_) => "an object",
            _ => "an unexpected value",
        };
        OraculumError::FormatFailure {
            category: self.category,
            record: self.display_name().to_string(),
            reason: format!("field '{}' holds {}", field, kind),
        }
    }
}

/// Categorized, read-only collection of local knowledge.
///
/// A category missing from the source document is absent (`records` returns
/// `None`), which differs from a category present with no entries.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct KnowledgeBase {
    categories: BTreeMap<Category, Vec<KnowledgeRecord>>,
}

impl KnowledgeBase {
    /// Build from the JSON document served by the kiosk backend
    pub fn from_json(value: Value) -> Result<Self> {
        let Value::Object(root) = value else {
            return Err(OraculumError::source_unavailable(
                "knowledge base document must be a JSON object",
            ));
        };

        let mut categories = BTreeMap::new();
        for (key, entries) in root {
            let Ok(category) = key.parse::<Category>() else {
                debug!(key = %key, "Ignoring unknown knowledge category");
                continue;
            };

            let records = match entries {
                Value::Array(items) => items
                    .into_iter()
                    .filter_map(|item| match item {
                        Value::Object(fields) => Some(KnowledgeRecord::new(category, fields)),
                        _ => {
                            debug!(category = %category, "Skipping non-object knowledge entry");
                            None
                        }
                    })
                    .collect(),
                Value::Object(fields) => vec![KnowledgeRecord::new(category, fields)],
                _ => {
                    warn!(category = %category, "Knowledge category is neither a list nor an object");
                    continue;
                }
            };
            categories.insert(category, records);
        }

        Ok(Self { categories })
    }

    /// Parse a raw JSON document
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let value: Value = serde_json::from_slice(bytes).map_err(OraculumError::source_unavailable)?;
        Self::from_json(value)
    }

    /// Records of a category, `None` when the category is absent
    pub fn records(&self, category: Category) -> Option<&[KnowledgeRecord]> {
        self.categories.get(&category).map(Vec::as_slice)
    }

    /// Present categories in priority order
    pub fn categories(&self) -> impl Iterator<Item = (Category, &[KnowledgeRecord])> {
        self.categories
            .iter()
            .map(|(category, records)| (*category, records.as_slice()))
    }

    pub fn record_count(&self) -> usize {
        self.categories.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.record_count() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn loads_arrays_objects_and_ignores_unknown_keys() {
        let kb = KnowledgeBase::from_json(json!({
            "hoteis": [{"nome": "Atrium Quinta de Pedras"}, "not a record"],
            "cop30": {"nome": "COP 30", "data": "Novembro de 2025"},
            "noticias": [{"nome": "ignored"}],
            "compras": []
        }))
        .unwrap();

        assert_eq!(kb.records(Category::Hotel).unwrap().len(), 1);
        assert_eq!(kb.records(Category::Event).unwrap().len(), 1);
        assert_eq!(kb.records(Category::Shopping), Some(&[][..]));
        assert!(kb.records(Category::Restaurant).is_none());
        assert_eq!(kb.record_count(), 2);
    }

    #[test]
    fn rejects_non_object_document() {
        let err = KnowledgeBase::from_json(json!([1, 2, 3])).unwrap_err();
        assert!(matches!(err, OraculumError::SourceUnavailable(_)));
    }

    #[test]
    fn typed_accessors_report_malformed_fields() {
        let kb = KnowledgeBase::from_json(json!({
            "restaurantes": [{
                "nome": "Remanso do Bosque",
                "preco_medio": 120,
                "endereco": ["not", "text"],
                "tags": ["regional", 5],
                "dicas": ""
            }]
        }))
        .unwrap();
        let record = &kb.records(Category::Restaurant).unwrap()[0];

        assert_eq!(record.name().unwrap().as_deref(), Some("Remanso do Bosque"));
        assert_eq!(record.text(fields::AVERAGE_PRICE).unwrap().as_deref(), Some("120"));
        assert_eq!(record.tips().unwrap(), None);
        assert_eq!(record.tags().unwrap().unwrap(), vec!["regional", "5"]);
        assert!(matches!(
            record.address(),
            Err(OraculumError::FormatFailure { category: Category::Restaurant, .. })
        ));
    }

    #[test]
    fn category_keys_round_trip_through_from_str() {
        for category in Category::ALL {
            assert_eq!(category.key().parse::<Category>().unwrap(), category);
        }
        assert!("noticias".parse::<Category>().is_err());
    }

    #[test]
    fn serializes_back_to_keyed_document() {
        let doc = json!({"hoteis": [{"nome": "Ibis Styles Belém", "preco_diaria": "R$ 250"}]});
        let kb = KnowledgeBase::from_json(doc.clone()).unwrap();
        assert_eq!(serde_json::to_value(&kb).unwrap(), doc);
    }
}
