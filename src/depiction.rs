use crate::error::{DepictsError, Result};
use crate::language::{LanguagePreferenceProvider, SystemLocale, DEFAULT_LANGUAGE};
use crate::wikibase::data::{Entities, Entity, LanguageMap};
use crate::wikibase::sparql::SparqlResponse;
use crate::wikibase::EntityLookupService;
use log::{debug, warn};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio_stream::StreamExt;

/// An entity resolved for display, as in "this media depicts X".
#[derive(Debug, Clone)]
pub struct DepictedItem {
    entity: Entity,
    name: String,
    description: String,
}

impl DepictedItem {
    pub fn id(&self) -> &str {
        &self.entity.id
    }

    pub fn entity(&self) -> &Entity {
        &self.entity
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

/// Value for `language` if present, else the first value of the map, else an empty string.
pub fn by_language_or_first_or_empty(values: &LanguageMap, language: &str) -> String {
    values
        .get(language)
        .or_else(|| values.values().next())
        .map(|v| v.value.clone())
        .unwrap_or_default()
}

pub struct DepictionResolver<S: EntityLookupService> {
    service: Arc<S>,
    preferences: Arc<dyn LanguagePreferenceProvider>,
    locale: Arc<dyn SystemLocale>,
}

impl<S: EntityLookupService> DepictionResolver<S> {
    pub fn new(
        service: S,
        preferences: impl LanguagePreferenceProvider + 'static,
        locale: impl SystemLocale + 'static,
    ) -> Self {
        Self {
            service: Arc::new(service),
            preferences: Arc::new(preferences),
            locale: Arc::new(locale),
        }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    /// App ui language used for labels and descriptions.
    pub fn active_language(&self) -> String {
        self.preferences
            .current_app_language()
            .filter(|l| !l.is_empty())
            .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string())
    }

    /// Searches depictions with the system locale language, then resolves them in the app language.
    pub async fn search_for_depictions(
        &self,
        query: &str,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<DepictedItem>> {
        let search_language = self.locale.language();
        let active_language = self.active_language();

        let results = self
            .service
            .search(query, limit, &search_language, &search_language, offset)
            .await?;

        debug!(
            "Search '{query}' returned {} ids (language {search_language}, offset {offset})",
            results.len()
        );

        self.resolve(results.iter().map(|r| r.id.as_str()), &active_language)
            .await
    }

    pub async fn get_entities(&self, ids: &str) -> Result<Entities> {
        self.service.fetch_entities(ids).await
    }

    /// Resolves ids coming from any source, ex. a SPARQL result set.
    pub async fn resolve_ids<I, T>(&self, ids: I) -> Result<Vec<DepictedItem>>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let active_language = self.active_language();
        self.resolve(ids, &active_language).await
    }

    pub async fn to_depictions(&self, response: &SparqlResponse) -> Result<Vec<DepictedItem>> {
        self.resolve_ids(response.ids()).await
    }

    async fn resolve<I, T>(&self, ids: I, language: &str) -> Result<Vec<DepictedItem>>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let ids: Vec<String> = ids
            .into_iter()
            .map(|id| id.as_ref().to_string())
            .filter(|id| !id.is_empty())
            .collect();

        if ids.is_empty() {
            debug!("No ids to resolve, skipping entity fetch");
            return Ok(vec![]);
        }

        let entities = self.get_entities(&ids.join("|")).await?;
        let entities = in_request_order(&ids, entities.entities);

        tokio_stream::iter(entities)
            .then(|entity| self.resolve_entity(entity, language))
            .collect::<Result<Vec<_>>>()
            .await
    }

    /// Picks name and description in `language`. An entity without any description
    /// gets the label of its first "instance of" class instead.
    pub async fn resolve_entity(&self, entity: Entity, language: &str) -> Result<DepictedItem> {
        let name = by_language_or_first_or_empty(&entity.labels, language);
        let description = by_language_or_first_or_empty(&entity.descriptions, language);

        if !description.is_empty() {
            return Ok(DepictedItem {
                entity,
                name,
                description,
            });
        }

        let description = match entity.instance_of_ids().first() {
            Some(class_id) => {
                debug!("{} has no description, using label of {class_id}", entity.id);
                self.class_label(class_id, language).await?
            }
            None => String::new(),
        };

        Ok(DepictedItem {
            entity,
            name,
            description,
        })
    }

    async fn class_label(&self, class_id: &str, language: &str) -> Result<String> {
        let mut entities = self.get_entities(class_id).await?.entities;

        let class = match entities.remove(class_id) {
            Some(class) => class,
            None => entities
                .into_values()
                .next()
                .ok_or_else(|| DepictsError::EntityNotFound(class_id.to_string()))?,
        };

        Ok(by_language_or_first_or_empty(&class.labels, language))
    }
}

/// Entities in the order they were requested, followed by any the api returned under other keys.
fn in_request_order(ids: &[String], mut entities: BTreeMap<String, Entity>) -> Vec<Entity> {
    let mut ordered: Vec<Entity> = ids.iter().filter_map(|id| entities.remove(id)).collect();
    ordered.extend(entities.into_values());

    ordered.retain(|entity| {
        if entity.is_missing() {
            warn!("Entity {} does not exist, it is skipped", entity.id);
        }
        !entity.is_missing()
    });

    ordered
}
