use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SparqlResponse {
    #[serde(default)]
    pub results: SparqlResults,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SparqlResults {
    #[serde(default)]
    pub bindings: Vec<Binding>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Binding {
    pub item: SparqlValue,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SparqlValue {
    pub value: String,
}

impl Binding {
    /// Entity id of the bound item, ex. `http://www.wikidata.org/entity/Q42` -> `Q42`
    pub fn id(&self) -> &str {
        let value = self.item.value.trim_end_matches('/');
        value.rsplit('/').next().unwrap_or(value)
    }
}

impl SparqlResponse {
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.results.bindings.iter().map(Binding::id)
    }
}
