//! Resolves Wikibase search results and SPARQL result sets into display ready depicted items.

pub mod depiction;
pub mod error;
pub mod language;
pub mod wikibase;

pub use depiction::{DepictedItem, DepictionResolver};
pub use error::{DepictsError, Result};
pub use wikibase::{EntityLookupService, WikibaseClient, WikibaseConfig};
