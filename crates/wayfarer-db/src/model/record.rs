use diesel::{pg::Pg, prelude::*};
use serde::{Deserialize, Serialize};

use crate::db::schema;

/// A routable resource (a hotel, a package) as stored and as served by the
/// lookup API.
#[derive(
    Debug, Clone, PartialEq, Eq, Identifiable, Queryable, Selectable, Serialize, Deserialize,
)]
#[diesel(table_name = schema::resource_record)]
#[diesel(check_for_backend(Pg))]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub id: String,
    pub collection: String,
    pub name: Option<String>,
    pub slug: Option<String>,
    #[serde(default)]
    pub legacy_slugs: Vec<String>,
    #[serde(default)]
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(default)]
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Record {
    /// ## Summary
    /// True if `segment` is exactly this record's canonical slug.
    #[must_use]
    pub fn is_canonical(&self, segment: &str) -> bool {
        self.slug.as_deref() == Some(segment)
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = schema::resource_record)]
pub struct NewRecord<'a> {
    pub id: &'a str,
    pub collection: &'a str,
    pub name: Option<&'a str>,
    pub slug: Option<&'a str>,
    pub legacy_slugs: Vec<String>,
}
