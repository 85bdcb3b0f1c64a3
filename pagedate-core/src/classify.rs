//! Maps a candidate's field name to the timestamp it describes.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Created,
    Modified,
    Published,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Created, Role::Modified, Role::Published];
}

/// Classify a field name by case-sensitive keyword matching.
///
/// Modified is checked before created, and both before the generic "date"
/// fallback, so `dcterms.modified` or `dc.date.created` never land in
/// published. Fields matching nothing (e.g. `text-pattern`) have no role.
pub fn classify(field: &str) -> Option<Role> {
    let has = |needle: &str| field.contains(needle);

    if has("modified") || has("updated") || has("Modified") {
        return Some(Role::Modified);
    }
    if has("created") || has("Created") {
        return Some(Role::Created);
    }
    if has("published")
        || has("pubdate")
        || (has("date") && !has("modified") && !has("created") && !has("Modified"))
    {
        return Some(Role::Published);
    }
    None
}
