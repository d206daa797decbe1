//! Mission-role codec.
//!
//! A role is not stored as its own entity: it is a view computed over a
//! family of content rows in the `MISSION_ROLES` section whose keys follow
//! the `role_<roleId>_<field>` convention. Encoding flattens a role record
//! into one row per field; decoding groups rows back by the shared key
//! prefix. The delimiter and field set are schema constants here, never
//! inferred from the stored strings.

use std::collections::BTreeMap;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::app_response::AppResponse;
use crate::content_model::{ContentItem, NewContentItem, Section};
use crate::content_store::{BatchOp, ContentStore};

pub const ROLE_SECTION: Section = Section::MissionRoles;
pub const ROLE_KEY_PREFIX: &str = "role";
pub const ROLE_KEY_SEP: &str = "_";
/// Field set of the encoding, in key order. The index of a field doubles as
/// its order offset when a role is created.
pub const ROLE_FIELDS: [&str; 5] = ["name", "title", "mission", "link", "bgColor"];
/// Base order used when the section holds no role rows yet.
pub const DEFAULT_BASE_ORDER: i64 = 6;

/// Input record for creating a role. When `id` is omitted the roleId is
/// derived from `name` (lowercased, whitespace stripped).
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RoleInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub title: String,
    pub mission: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bg_color: Option<String>,
}

/// Decoded role view. Fields that have no backing row decode to `""`, never
/// absence; `content_ids` maps each present field to its row id so callers
/// can address individual rows later.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    pub id: String,
    pub name: String,
    pub title: String,
    pub mission: String,
    pub link: String,
    pub bg_color: String,
    pub content_ids: BTreeMap<String, String>,
}

/// Partial update; only present fields are touched.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct RolePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mission: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bg_color: Option<String>,
}

impl RolePatch {
    fn field(&self, field: &str) -> Option<&String> {
        match field {
            "name" => self.name.as_ref(),
            "title" => self.title.as_ref(),
            "mission" => self.mission.as_ref(),
            "link" => self.link.as_ref(),
            "bgColor" => self.bg_color.as_ref(),
            _ => None,
        }
    }
}

/// Derives a roleId from a display name: lowercase, all whitespace stripped.
///
/// ```rust
/// use taste_grow_content_core::mission_roles::derive_role_id;
///
/// assert_eq!(derive_role_id("Seed Guardian"), "seedguardian");
/// assert_eq!(derive_role_id("  SOIL  scout "), "soilscout");
/// ```
pub fn derive_role_id(name: &str) -> String {
    name.to_lowercase().chars().filter(|c| !c.is_whitespace()).collect()
}

pub fn role_key(role_id: &str, field: &str) -> String {
    format!("{ROLE_KEY_PREFIX}{ROLE_KEY_SEP}{role_id}{ROLE_KEY_SEP}{field}")
}

fn role_prefix(role_id: &str) -> String {
    format!("{ROLE_KEY_PREFIX}{ROLE_KEY_SEP}{role_id}{ROLE_KEY_SEP}")
}

/// Splits an encoded key into `(roleId, field)`. Requires at least three
/// `_`-separated segments with the first equal to the role prefix; the
/// remainder past the roleId is rejoined, so field names may themselves
/// contain the separator (`bg_color`-style variants decode as one field).
pub fn split_role_key(key: &str) -> Option<(String, String)> {
    let segments: Vec<&str> = key.split(ROLE_KEY_SEP).collect();
    if segments.len() < 3 || segments[0] != ROLE_KEY_PREFIX {
        return None;
    }
    Some((segments[1].to_string(), segments[2..].join(ROLE_KEY_SEP)))
}

/// Groups content rows into role views. Items must arrive in ascending
/// `order`; roles then come out sorted by their minimum field order, which is
/// the ordering the public site renders.
fn decode_items(items: &[ContentItem]) -> Vec<Role> {
    let mut roles: Vec<Role> = Vec::new();
    for item in items {
        let Some((role_id, field)) = split_role_key(&item.key) else {
            continue;
        };
        let idx = match roles.iter().position(|r| r.id == role_id) {
            Some(i) => i,
            None => {
                roles.push(Role {
                    id: role_id,
                    ..Role::default()
                });
                roles.len() - 1
            }
        };
        let role = &mut roles[idx];
        match field.as_str() {
            "name" => role.name = item.value.clone(),
            "title" => role.title = item.value.clone(),
            "mission" => role.mission = item.value.clone(),
            "link" => role.link = item.value.clone(),
            "bgColor" => role.bg_color = item.value.clone(),
            other => {
                warn!("Skipping unknown mission-role field '{other}' in key '{}'", item.key);
                continue;
            }
        }
        role.content_ids.insert(field, item.id.clone());
    }
    roles
}

/// Lists all roles decoded from the active rows of the section.
pub fn list_roles(store: &ContentStore) -> Result<Vec<Role>, AppResponse> {
    let items = store.list_section(ROLE_SECTION, false)?;
    Ok(decode_items(&items))
}

pub fn get_role(store: &ContentStore, role_id: &str) -> Result<Option<Role>, AppResponse> {
    Ok(list_roles(store)?.into_iter().find(|r| r.id == role_id))
}

/// Encodes a role into content rows, all written in one transaction.
///
/// Required fields (`name`, `title`, `mission`) are always written; `link`
/// and `bgColor` only when provided. Each written field gets
/// `order = baseOrder + fieldIndex`, where `baseOrder` is one past the
/// highest order among existing role rows, or [`DEFAULT_BASE_ORDER`] when
/// the section holds none.
///
/// A roleId that collides with an existing role fails with `Conflict`; the
/// store's `(section, key)` uniqueness makes the first field row of the
/// duplicate collide, and the aborted transaction leaves nothing behind.
pub fn create_role(store: &ContentStore, input: RoleInput) -> Result<Role, AppResponse> {
    if input.name.trim().is_empty()
        || input.title.trim().is_empty()
        || input.mission.trim().is_empty()
    {
        return Err(AppResponse::ValidationError(
            "Role name, title and mission are required".to_string(),
        ));
    }

    let role_id = match &input.id {
        Some(id) if !id.trim().is_empty() => id.trim().to_string(),
        _ => derive_role_id(&input.name),
    };
    if role_id.is_empty() {
        return Err(AppResponse::ValidationError(
            "Role id derived from name is empty".to_string(),
        ));
    }
    // A separator inside the roleId would shift the field segment on decode.
    if role_id.contains(ROLE_KEY_SEP) {
        return Err(AppResponse::ValidationError(format!(
            "Role id '{role_id}' must not contain '{ROLE_KEY_SEP}'"
        )));
    }

    let existing = store.list_section(ROLE_SECTION, true)?;
    let base_order = existing
        .iter()
        .filter(|i| split_role_key(&i.key).is_some())
        .map(|i| i.order)
        .max()
        .map(|max| max + 1)
        .unwrap_or(DEFAULT_BASE_ORDER);

    let mut ops = Vec::new();
    for (idx, field) in ROLE_FIELDS.iter().enumerate() {
        let value = match *field {
            "name" => Some(input.name.clone()),
            "title" => Some(input.title.clone()),
            "mission" => Some(input.mission.clone()),
            "link" => input.link.clone(),
            "bgColor" => input.bg_color.clone(),
            _ => None,
        };
        let Some(value) = value else { continue };
        ops.push(BatchOp::Insert(NewContentItem {
            section: ROLE_SECTION,
            key: role_key(&role_id, field),
            value,
            metadata: None,
            order: base_order + idx as i64,
            active: true,
        }));
    }

    let written = store.apply_batch(ops)?;
    decode_items(&written)
        .pop()
        .ok_or_else(|| AppResponse::DatabaseError("Role encode produced no rows".to_string()))
}

/// Applies a field-level patch to an existing role, all writes in one
/// transaction.
///
/// Per present field: an existing row has its value overwritten (an empty
/// string overwrites too, and a soft-deleted row still counts as existing);
/// a missing row is created when the incoming value is non-empty, placed at
/// `mission.order + field distance` past the mission row (or one past the
/// role's highest order when the mission row is gone); a missing row with an
/// empty incoming value is a no-op. Patching a roleId with no rows at all is
/// `NotFound`.
pub fn update_role(
    store: &ContentStore,
    role_id: &str,
    patch: RolePatch,
) -> Result<Role, AppResponse> {
    // Rows are resolved by exact key, active or not: an inactive row must be
    // overwritten, never shadowed by an Insert that would collide with it.
    let items = store.list_section(ROLE_SECTION, true)?;
    let prefix = role_prefix(role_id);
    let existing: Vec<&ContentItem> = items.iter().filter(|i| i.key.starts_with(&prefix)).collect();
    if existing.is_empty() {
        return Err(AppResponse::NotFound(format!(
            "No mission role with id: {role_id}"
        )));
    }

    let mission_key = role_key(role_id, "mission");
    let mission_order = existing.iter().find(|i| i.key == mission_key).map(|i| i.order);
    let max_order = existing.iter().map(|i| i.order).max().unwrap_or(DEFAULT_BASE_ORDER);
    let mission_idx = ROLE_FIELDS.iter().position(|f| *f == "mission").unwrap_or(2) as i64;

    let mut ops = Vec::new();
    for (idx, field) in ROLE_FIELDS.iter().enumerate() {
        let Some(value) = patch.field(field) else { continue };
        let key = role_key(role_id, field);
        match existing.iter().find(|i| i.key == key) {
            Some(item) => ops.push(BatchOp::SetValue {
                id: item.id.clone(),
                value: value.clone(),
            }),
            None if !value.is_empty() => {
                let order = match mission_order {
                    Some(m) => m + (idx as i64 - mission_idx).max(1),
                    None => max_order + 1,
                };
                ops.push(BatchOp::Insert(NewContentItem {
                    section: ROLE_SECTION,
                    key,
                    value: value.clone(),
                    metadata: None,
                    order,
                    active: true,
                }));
            }
            None => {}
        }
    }

    if !ops.is_empty() {
        store.apply_batch(ops)?;
    }
    get_role(store, role_id)?.ok_or_else(|| {
        AppResponse::NotFound(format!("No mission role with id: {role_id}"))
    })
}

/// Removes every row, active or not, carrying the role's key prefix, in one
/// transaction. An unknown roleId removes nothing and is not an error.
pub fn delete_role(store: &ContentStore, role_id: &str) -> Result<u64, AppResponse> {
    let items = store.list_section(ROLE_SECTION, true)?;
    let prefix = role_prefix(role_id);
    let ops: Vec<BatchOp> = items
        .into_iter()
        .filter(|i| i.key.starts_with(&prefix))
        .map(|i| BatchOp::Remove { id: i.id })
        .collect();
    let removed = ops.len() as u64;
    if !ops.is_empty() {
        store.apply_batch(ops)?;
    }
    Ok(removed)
}
