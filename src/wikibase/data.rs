use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::BTreeMap;

/// Property linking an item to the class it is an instance of.
pub const INSTANCE_OF: &str = "P31";

/// Language code -> labelled value, iterated in ascending language code order.
pub type LanguageMap = BTreeMap<String, LanguageValue>;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LanguageValue {
    pub language: String,
    pub value: String,
}

#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub search: Vec<SearchItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchItem {
    pub id: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Entities {
    #[serde(default, deserialize_with = "lenient_map")]
    pub entities: BTreeMap<String, Entity>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Entity {
    pub id: String,
    #[serde(default, deserialize_with = "lenient_map")]
    pub labels: LanguageMap,
    #[serde(default, deserialize_with = "lenient_map")]
    pub descriptions: LanguageMap,
    /// Items carry `claims`, Commons MediaInfo entities carry `statements`.
    #[serde(default, alias = "statements", deserialize_with = "lenient_map")]
    pub claims: BTreeMap<String, Vec<Statement>>,
    #[serde(default)]
    missing: Option<Value>,
}

impl Entity {
    pub fn is_missing(&self) -> bool {
        self.missing.is_some()
    }

    pub fn statements(&self, property: &str) -> &[Statement] {
        self.claims.get(property).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn instance_of_ids(&self) -> Vec<String> {
        entity_ids(self.statements(INSTANCE_OF))
    }
}

/// Referenced entity ids of the given statements, in order.
/// `somevalue`/`novalue` snaks and non entity values are skipped.
pub fn entity_ids(statements: &[Statement]) -> Vec<String> {
    statements
        .iter()
        .map(|s| &s.mainsnak)
        .filter(|snak| snak.snaktype == VALUE_SNAK)
        .filter_map(|snak| match &snak.datavalue {
            Some(WikibaseValue::EntityId(id)) => Some(id.clone()),
            _ => None,
        })
        .collect()
}

#[derive(Debug, Clone, Deserialize)]
pub struct Statement {
    pub mainsnak: Snak,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Snak {
    /// `value`, `somevalue` or `novalue`
    #[serde(default = "default_snaktype")]
    pub snaktype: String,
    pub datavalue: Option<WikibaseValue>,
}

const VALUE_SNAK: &str = "value";

fn default_snaktype() -> String {
    String::from(VALUE_SNAK)
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawDataValue")]
pub enum WikibaseValue {
    EntityId(String),
    String(String),
    Quantity(String),
    Time(String),
    MonolingualText { language: String, text: String },
    Other(String),
}

#[derive(Deserialize)]
struct RawDataValue {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    value: Value,
}

impl From<RawDataValue> for WikibaseValue {
    fn from(raw: RawDataValue) -> Self {
        let value = &raw.value;
        let parsed = match raw.kind.as_str() {
            "wikibase-entityid" => entity_id_of(value).map(WikibaseValue::EntityId),
            "string" => value.as_str().map(|s| WikibaseValue::String(s.to_string())),
            "quantity" => str_field(value, "amount").map(WikibaseValue::Quantity),
            "time" => str_field(value, "time").map(WikibaseValue::Time),
            "monolingualtext" => str_field(value, "language")
                .zip(str_field(value, "text"))
                .map(|(language, text)| WikibaseValue::MonolingualText { language, text }),
            _ => None,
        };
        parsed.unwrap_or(WikibaseValue::Other(raw.kind))
    }
}

fn str_field(value: &Value, field: &str) -> Option<String> {
    value.get(field).and_then(Value::as_str).map(str::to_string)
}

/// Older dumps only carry `entity-type` and `numeric-id`, so the id is rebuilt from those.
fn entity_id_of(value: &Value) -> Option<String> {
    if let Some(id) = str_field(value, "id") {
        return Some(id);
    }

    let prefix = match value.get("entity-type")?.as_str()? {
        "item" => 'Q',
        "property" => 'P',
        "lexeme" => 'L',
        "mediainfo" => 'M',
        _ => return None,
    };
    let numeric_id = value.get("numeric-id")?.as_u64()?;
    Some(format!("{prefix}{numeric_id}"))
}

/// The api serializes empty objects as `[]`.
fn lenient_map<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(T::default()),
        Value::Array(a) if a.is_empty() => Ok(T::default()),
        other => serde_json::from_value(other).map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    fn statement(datavalue: Value) -> Value {
        json!({ "mainsnak": { "snaktype": "value", "property": "P31", "datavalue": datavalue } })
    }

    #[test]
    fn test_entity_from_wbgetentities() {
        let entities: Entities = serde_json::from_value(json!({
            "entities": {
                "Q146": {
                    "type": "item",
                    "id": "Q146",
                    "labels": {
                        "en": { "language": "en", "value": "house cat" },
                        "fr": { "language": "fr", "value": "chat" }
                    },
                    "descriptions": {
                        "en": { "language": "en", "value": "domesticated feline" }
                    },
                    "claims": {
                        "P31": [statement(json!({
                            "type": "wikibase-entityid",
                            "value": { "entity-type": "item", "numeric-id": 55983715, "id": "Q55983715" }
                        }))]
                    }
                }
            },
            "success": 1
        }))
        .unwrap();

        let cat = &entities.entities["Q146"];
        assert_eq!(cat.labels["fr"].value, "chat");
        assert_eq!(cat.descriptions["en"].value, "domesticated feline");
        assert_eq!(cat.instance_of_ids(), vec!["Q55983715"]);
        assert!(!cat.is_missing());
    }

    #[test]
    fn test_instance_of_keeps_only_entity_values() {
        let entity: Entity = serde_json::from_value(json!({
            "id": "Q1",
            "claims": {
                "P31": [
                    statement(json!({ "type": "string", "value": "not an item" })),
                    statement(json!({ "type": "wikibase-entityid", "value": { "id": "Q5" } })),
                    statement(json!({ "type": "quantity", "value": { "amount": "+12", "unit": "1" } })),
                    { "mainsnak": { "snaktype": "novalue", "property": "P31" } },
                    {
                        "mainsnak": {
                            "snaktype": "somevalue",
                            "property": "P31",
                            "datavalue": { "type": "wikibase-entityid", "value": { "id": "Q6" } }
                        }
                    },
                    statement(json!({ "type": "wikibase-entityid", "value": { "entity-type": "item", "numeric-id": 7 } }))
                ]
            }
        }))
        .unwrap();

        assert_eq!(entity.instance_of_ids(), vec!["Q5", "Q7"]);
    }

    #[test]
    fn test_entity_without_instance_of() {
        let entity: Entity = serde_json::from_value(json!({ "id": "Q1" })).unwrap();
        assert!(entity.instance_of_ids().is_empty());
        assert!(entity.labels.is_empty());
    }

    #[test]
    fn test_mediainfo_with_empty_arrays() {
        let entity: Entity = serde_json::from_value(json!({
            "type": "mediainfo",
            "id": "M123",
            "labels": [],
            "descriptions": [],
            "statements": {
                "P180": [statement(json!({ "type": "wikibase-entityid", "value": { "id": "Q146" } }))]
            }
        }))
        .unwrap();

        assert!(entity.labels.is_empty());
        assert_eq!(entity_ids(entity.statements("P180")), vec!["Q146"]);
    }

    #[test]
    fn test_missing_entity() {
        let entities: Entities = serde_json::from_value(json!({
            "entities": { "Q999999999999": { "id": "Q999999999999", "missing": "" } }
        }))
        .unwrap();

        assert!(entities.entities["Q999999999999"].is_missing());
    }

    #[test]
    fn test_value_kinds() {
        let value: WikibaseValue = serde_json::from_value(json!({
            "type": "monolingualtext",
            "value": { "text": "Felis catus", "language": "la" }
        }))
        .unwrap();
        assert_eq!(
            value,
            WikibaseValue::MonolingualText {
                language: String::from("la"),
                text: String::from("Felis catus"),
            }
        );

        let value: WikibaseValue = serde_json::from_value(json!({
            "type": "globecoordinate",
            "value": { "latitude": 1.0, "longitude": 2.0 }
        }))
        .unwrap();
        assert_eq!(value, WikibaseValue::Other(String::from("globecoordinate")));
    }
}
