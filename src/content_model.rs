//! Data model definitions for the content store.
//!
//! The store persists editable website copy as flat [`ContentItem`] rows:
//! a `(section, key)` addressed string value with optional JSON metadata,
//! a display order and a soft-delete flag. Structured sub-resources (the
//! mission roles) are flattened into families of these rows by the codec in
//! [`crate::mission_roles`].

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Coarse category tag partitioning content rows.
///
/// Sections group items for bulk retrieval: the public site fetches a whole
/// section in one call and the admin dashboard edits within one section at a
/// time. Wire format is SCREAMING_SNAKE_CASE (`"MISSION_ROLES"` etc.).
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Section {
    Hero,
    MissionRoles,
    Footer,
    About,
    Faq,
}

impl Section {
    /// Canonical wire name, matching the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Hero => "HERO",
            Section::MissionRoles => "MISSION_ROLES",
            Section::Footer => "FOOTER",
            Section::About => "ABOUT",
            Section::Faq => "FAQ",
        }
    }

    /// Parses a wire name back into a section tag.
    ///
    /// ```rust
    /// use taste_grow_content_core::content_model::Section;
    ///
    /// assert_eq!(Section::parse("MISSION_ROLES"), Some(Section::MissionRoles));
    /// assert_eq!(Section::parse("mission_roles"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Section> {
        match s {
            "HERO" => Some(Section::Hero),
            "MISSION_ROLES" => Some(Section::MissionRoles),
            "FOOTER" => Some(Section::Footer),
            "ABOUT" => Some(Section::About),
            "FAQ" => Some(Section::Faq),
            _ => None,
        }
    }
}

impl std::fmt::Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn default_active() -> bool {
    true
}

/// A single stored content row.
///
/// # Structure
///
/// - **id**: opaque identifier assigned by the store at creation, immutable
/// - **section**: category tag, part of the uniqueness constraint
/// - **key**: label unique within the section; encoded sub-resources use the
///   `role_<roleId>_<field>` convention
/// - **value**: free-text UTF-8 payload (larger payloads may hold serialized JSON)
/// - **metadata**: optional structured attachment, opaque to the store
/// - **order**: display/tie-break sequence within the section
/// - **active**: soft-delete flag; inactive rows are excluded from default reads
///
/// # Examples
///
/// ```rust
/// use taste_grow_content_core::content_model::{ContentItem, Section};
///
/// let item = ContentItem {
///     id: "ci_000001".to_string(),
///     section: Section::Hero,
///     key: "headline".to_string(),
///     value: "Taste the seasons, grow the school garden".to_string(),
///     metadata: None,
///     order: 1,
///     active: true,
/// };
///
/// let json = serde_json::to_string(&item).unwrap();
/// let back: ContentItem = serde_json::from_str(&json).unwrap();
/// assert_eq!(back.key, item.key);
/// ```
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ContentItem {
    /// Store-assigned identifier, unique across all sections.
    pub id: String,
    pub section: Section,
    /// Unique within `(section, key)`; a colliding create fails with a conflict.
    pub key: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<JsonValue>,
    #[serde(default)]
    pub order: i64,
    #[serde(default = "default_active")]
    pub active: bool,
}

/// Input shape for creating a row; the store assigns the id.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct NewContentItem {
    pub section: Section,
    pub key: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<JsonValue>,
    #[serde(default)]
    pub order: i64,
    #[serde(default = "default_active")]
    pub active: bool,
}

/// Field-level patch for an existing row.
///
/// `section` and `key` are immutable; only the payload columns can change.
/// `None` means "leave untouched", so `metadata` cannot be unset through a
/// patch, only replaced.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct ContentPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<JsonValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

/// One entry of a bulk update: target id plus the patch fields, flattened.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct BulkUpdateEntry {
    pub id: String,
    #[serde(flatten)]
    pub patch: ContentPatch,
}

/// Per-entry result of a bulk update. Entries are applied independently, so
/// a failed entry reports its error here without aborting the rest.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct BulkUpdateOutcome {
    pub id: String,
    pub updated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item: Option<ContentItem>,
}
