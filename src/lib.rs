//! # Taste & Grow Content Core
//!
//! Embedded content store for the Taste & Grow school-engagement platform,
//! built on redb for stability and crash-safe transactional writes, and
//! exposed through a C FFI surface for embedding in the admin dashboard
//! tooling.
//!
//! ## Features
//!
//! - **redb-based storage**: a single-file, ACID, pure-Rust embedded database
//! - **Flat content model**: `(section, key, value)` rows with metadata,
//!   display order and soft-delete, `(section, key)` unique
//! - **Mission-role codec**: structured role records flattened into
//!   `role_<roleId>_<field>` rows and decoded back by prefix grouping
//! - **Transactional multi-row writes**: role create/update/delete commit
//!   atomically; a mid-batch failure leaves no partial role
//! - **Deterministic access codes**: school code, QR token and parent invite
//!   link derived by pure functions
//! - **Safe error handling**: no `unwrap()` calls in production code
//!
//! ## Quick Start
//!
//! ```no_run
//! use taste_grow_content_core::{create_store, post_mission_role};
//! use std::ffi::CString;
//!
//! let name = CString::new("taste_grow").unwrap();
//! let store = create_store(name.as_ptr());
//!
//! let role = CString::new(
//!     r#"{"name":"Seed Guardian","title":"Kids","mission":"Collect, taste, and protect lost seeds."}"#,
//! ).unwrap();
//! let result = post_mission_role(store, role.as_ptr());
//! ```
//!
//! ## FFI Functions
//!
//! Every function returns a JSON-encoded [`AppResponse`](app_response::AppResponse)
//! C string (except [`create_store`], which returns the state pointer):
//!
//! - [`create_store`] - Open or create a store file
//! - [`post_content`] / [`push_content`] - Insert a content row
//! - [`get_content_by_id`], [`get_content_by_key`] - Point lookups
//! - [`get_section`], [`get_section_with_inactive`] - Section listings
//! - [`update_content`] / [`put_content`] - Patch a row by id
//! - [`delete_content_by_id`] - Remove a row
//! - [`bulk_update_content`] - Patch many rows, each independently
//! - [`get_mission_roles`], [`get_mission_role`] - Decode role views
//! - [`post_mission_role`], [`patch_mission_role`], [`delete_mission_role`] - Role writes
//! - [`school_access_code`], [`qr_code_id`], [`parent_invite_link`] - Stateless derivations
//! - [`clear_all_records`], [`reset_store`], [`close_store`] - Lifecycle

pub mod access_codes;
pub mod app_response;
pub mod content_model;
pub mod content_store;
pub mod mission_roles;

use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::path::Path;

use log::{info, warn};
use serde::Serialize;

use crate::app_response::AppResponse;
use crate::content_model::{BulkUpdateEntry, NewContentItem, Section};
use crate::content_store::ContentStore;
use crate::mission_roles::{RoleInput, RolePatch};

/// Opens (or creates) a content store with the specified name.
///
/// The backing file is created as `<name>.redb` in the working directory.
///
/// # Parameters
///
/// * `name` - A null-terminated C string containing the store name
///
/// # Returns
///
/// Returns a pointer to the [`ContentStore`] instance on success, or a null
/// pointer on failure. The caller owns the returned pointer.
///
/// # Safety
///
/// This function is unsafe because it:
/// - Dereferences a raw pointer without validation
/// - Returns a raw pointer that must be properly managed
/// - Requires the input string to be valid UTF-8
///
/// # Examples
///
/// ```no_run
/// use std::ffi::CString;
/// use taste_grow_content_core::create_store;
///
/// let name = CString::new("taste_grow").unwrap();
/// let store = create_store(name.as_ptr());
///
/// if !store.is_null() {
///     // Store opened successfully
/// }
/// ```
///
/// # Errors
///
/// Returns null pointer if:
/// - Input name pointer is null
/// - Input string contains invalid UTF-8
/// - The database file cannot be created or opened
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn create_store(name: *const c_char) -> *mut ContentStore {
    if name.is_null() {
        warn!("Null name pointer passed to create_store");
        return std::ptr::null_mut();
    }

    let name_str = match unsafe { CStr::from_ptr(name).to_str() } {
        Ok(s) => s,
        Err(e) => {
            warn!("Invalid UTF-8 in name parameter: {e}");
            return std::ptr::null_mut();
        }
    };

    let store_file = format!("{name_str}.redb");
    if Path::new(&store_file).exists() {
        info!("Opening existing store at: {store_file}");
    } else {
        info!("Creating new store at: {store_file}");
    }

    match ContentStore::init(name_str.to_string()) {
        Ok(store) => {
            info!("Store initialized successfully");
            Box::into_raw(Box::new(store))
        }
        Err(e) => {
            warn!("Failed to initialize store at {store_file}: {e}");
            std::ptr::null_mut()
        }
    }
}

/// Inserts a new content row.
///
/// Deserializes the provided JSON into a `NewContentItem` and stores it; the
/// store assigns the id. A `(section, key)` collision fails with `Conflict`
/// and never overwrites the existing row.
///
/// # Parameters
///
/// * `state` - Pointer to the store instance
/// * `json_ptr` - Null-terminated C string with the row JSON
///
/// # Returns
///
/// A JSON-formatted C string containing the operation result. The returned
/// string must be freed by the caller.
///
/// # Safety
///
/// Both parameters must be valid pointers to their respective types.
///
/// # JSON Format
///
/// ```json
/// {
///   "section": "HERO",
///   "key": "headline",
///   "value": "Taste the seasons",
///   "metadata": { "locale": "en" },
///   "order": 1,
///   "active": true
/// }
/// ```
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn post_content(state: *mut ContentStore, json_ptr: *const c_char) -> *const c_char {
    let store = match unsafe { state.as_ref() } {
        Some(s) => s,
        None => {
            let error = AppResponse::BadRequest("Null state pointer".to_string());
            return response_to_c_string(&error);
        }
    };

    let json_str = match c_ptr_to_string(json_ptr, "JSON") {
        Ok(json) => json,
        Err(error_ptr) => return error_ptr,
    };

    let item: NewContentItem = match serde_json::from_str(&json_str) {
        Ok(i) => i,
        Err(e) => {
            let error = AppResponse::SerializationError(format!("Invalid JSON: {e}"));
            return response_to_c_string(&error);
        }
    };

    match store.create(item) {
        Ok(created) => ok_json(&created),
        Err(e) => response_to_c_string(&e),
    }
}

/// Inserts a new content row (push-style naming).
///
/// Alias for [`post_content`].
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn push_content(state: *mut ContentStore, json_ptr: *const c_char) -> *const c_char {
    post_content(state, json_ptr)
}

/// Retrieves a content row by its store-assigned id.
///
/// # Safety
///
/// Both parameters must be valid pointers. The id string must be valid UTF-8.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn get_content_by_id(state: *mut ContentStore, id: *const c_char) -> *const c_char {
    let store = match unsafe { state.as_ref() } {
        Some(s) => s,
        None => {
            let error = AppResponse::BadRequest("Null state pointer passed to get_content_by_id".to_string());
            return response_to_c_string(&error);
        }
    };

    let id_str = match c_ptr_to_string(id, "id") {
        Ok(id) => id,
        Err(error_ptr) => return error_ptr,
    };

    match store.get_by_id(&id_str) {
        Ok(Some(item)) => ok_json(&item),
        Ok(None) => {
            let error = AppResponse::NotFound(format!("No content item with id: {id_str}"));
            response_to_c_string(&error)
        }
        Err(e) => response_to_c_string(&e),
    }
}

/// Retrieves a content row by `(section, key)`.
///
/// # Parameters
///
/// * `state` - Pointer to the store instance
/// * `section` - Wire name of the section, e.g. `"MISSION_ROLES"`
/// * `key` - The content key within the section
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn get_content_by_key(
    state: *mut ContentStore,
    section: *const c_char,
    key: *const c_char,
) -> *const c_char {
    let store = match unsafe { state.as_ref() } {
        Some(s) => s,
        None => {
            let error = AppResponse::BadRequest("Null state pointer passed to get_content_by_key".to_string());
            return response_to_c_string(&error);
        }
    };

    let section = match parse_section_ptr(section) {
        Ok(s) => s,
        Err(error_ptr) => return error_ptr,
    };
    let key_str = match c_ptr_to_string(key, "key") {
        Ok(k) => k,
        Err(error_ptr) => return error_ptr,
    };

    match store.get_by_key(section, &key_str) {
        Ok(Some(item)) => ok_json(&item),
        Ok(None) => {
            let error = AppResponse::NotFound(format!(
                "No content item with key '{key_str}' in section {section}"
            ));
            response_to_c_string(&error)
        }
        Err(e) => response_to_c_string(&e),
    }
}

/// Lists the active rows of a section, sorted by display order.
///
/// Soft-deleted rows are excluded; use [`get_section_with_inactive`] for the
/// admin view that includes them.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn get_section(state: *mut ContentStore, section: *const c_char) -> *const c_char {
    list_section_ffi(state, section, false)
}

/// Lists all rows of a section including soft-deleted ones.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn get_section_with_inactive(
    state: *mut ContentStore,
    section: *const c_char,
) -> *const c_char {
    list_section_ffi(state, section, true)
}

fn list_section_ffi(
    state: *mut ContentStore,
    section: *const c_char,
    include_inactive: bool,
) -> *const c_char {
    let store = match unsafe { state.as_ref() } {
        Some(s) => s,
        None => {
            let error = AppResponse::BadRequest("Null state pointer passed to get_section".to_string());
            return response_to_c_string(&error);
        }
    };

    let section = match parse_section_ptr(section) {
        Ok(s) => s,
        Err(error_ptr) => return error_ptr,
    };

    match store.list_section(section, include_inactive) {
        Ok(items) => ok_json(&items),
        Err(e) => response_to_c_string(&e),
    }
}

/// Patches a content row by id.
///
/// The JSON body carries the id plus any of `value`, `metadata`, `order`,
/// `active`; absent fields are left untouched. `section` and `key` are
/// immutable.
///
/// # JSON Format
///
/// ```json
/// { "id": "ci_000003", "value": "Updated copy", "active": false }
/// ```
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn update_content(state: *mut ContentStore, json_ptr: *const c_char) -> *const c_char {
    let store = match unsafe { state.as_ref() } {
        Some(s) => s,
        None => {
            let error = AppResponse::BadRequest("Null state pointer passed to update_content".to_string());
            return response_to_c_string(&error);
        }
    };

    let json_str = match c_ptr_to_string(json_ptr, "JSON") {
        Ok(json) => json,
        Err(error_ptr) => return error_ptr,
    };

    let entry: BulkUpdateEntry = match serde_json::from_str(&json_str) {
        Ok(e) => e,
        Err(e) => {
            let error = AppResponse::SerializationError(format!("Error deserializing JSON: {e}"));
            return response_to_c_string(&error);
        }
    };

    match store.update(&entry.id, entry.patch) {
        Ok(Some(item)) => ok_json(&item),
        Ok(None) => {
            let error = AppResponse::NotFound(format!("No content item with id: {}", entry.id));
            response_to_c_string(&error)
        }
        Err(e) => response_to_c_string(&e),
    }
}

/// Patches a content row (put-style naming).
///
/// Alias for [`update_content`].
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn put_content(state: *mut ContentStore, json_ptr: *const c_char) -> *const c_char {
    update_content(state, json_ptr)
}

/// Deletes a content row by id.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn delete_content_by_id(state: *mut ContentStore, id: *const c_char) -> *const c_char {
    let store = match unsafe { state.as_ref() } {
        Some(s) => s,
        None => {
            let error = AppResponse::BadRequest("Null state pointer passed to delete_content_by_id".to_string());
            return response_to_c_string(&error);
        }
    };

    let id_str = match c_ptr_to_string(id, "id") {
        Ok(id) => id,
        Err(error_ptr) => return error_ptr,
    };

    match store.delete_by_id(&id_str) {
        Ok(true) => {
            let success = AppResponse::Ok("Content item deleted successfully".to_string());
            response_to_c_string(&success)
        }
        Ok(false) => {
            let not_found = AppResponse::NotFound(format!("No content item with id: {id_str}"));
            response_to_c_string(&not_found)
        }
        Err(e) => response_to_c_string(&e),
    }
}

/// Patches many content rows in one call.
///
/// The JSON body is an array of `{ "id": ..., ...patch }` entries. Entries
/// are applied independently with no atomicity across the batch; each entry
/// reports its own outcome in the returned array.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn bulk_update_content(state: *mut ContentStore, json_ptr: *const c_char) -> *const c_char {
    let store = match unsafe { state.as_ref() } {
        Some(s) => s,
        None => {
            let error = AppResponse::BadRequest("Null state pointer passed to bulk_update_content".to_string());
            return response_to_c_string(&error);
        }
    };

    let json_str = match c_ptr_to_string(json_ptr, "JSON") {
        Ok(json) => json,
        Err(error_ptr) => return error_ptr,
    };

    let entries: Vec<BulkUpdateEntry> = match serde_json::from_str(&json_str) {
        Ok(e) => e,
        Err(e) => {
            let error = AppResponse::SerializationError(format!("Error deserializing JSON: {e}"));
            return response_to_c_string(&error);
        }
    };

    let outcomes = store.bulk_update(entries);
    ok_json(&outcomes)
}

/// Decodes and lists all mission roles.
///
/// Roles are views over `role_<roleId>_<field>` rows of the
/// `MISSION_ROLES` section, recomputed fresh on every call. Fields with no
/// backing row come back as `""`; callers treat the empty string as
/// "not set".
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn get_mission_roles(state: *mut ContentStore) -> *const c_char {
    let store = match unsafe { state.as_ref() } {
        Some(s) => s,
        None => {
            let error = AppResponse::BadRequest("Null state pointer passed to get_mission_roles".to_string());
            return response_to_c_string(&error);
        }
    };

    match mission_roles::list_roles(store) {
        Ok(roles) => ok_json(&roles),
        Err(e) => response_to_c_string(&e),
    }
}

/// Decodes a single mission role by roleId.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn get_mission_role(state: *mut ContentStore, role_id: *const c_char) -> *const c_char {
    let store = match unsafe { state.as_ref() } {
        Some(s) => s,
        None => {
            let error = AppResponse::BadRequest("Null state pointer passed to get_mission_role".to_string());
            return response_to_c_string(&error);
        }
    };

    let role_id_str = match c_ptr_to_string(role_id, "roleId") {
        Ok(id) => id,
        Err(error_ptr) => return error_ptr,
    };

    match mission_roles::get_role(store, &role_id_str) {
        Ok(Some(role)) => ok_json(&role),
        Ok(None) => {
            let error = AppResponse::NotFound(format!("No mission role with id: {role_id_str}"));
            response_to_c_string(&error)
        }
        Err(e) => response_to_c_string(&e),
    }
}

/// Creates (encodes) a mission role.
///
/// The body carries `{name, title, mission, link?, bgColor?}` and optionally
/// an explicit `id`; without one the roleId is derived from the name. Field
/// rows are written in a single transaction; a roleId collision fails with
/// `Conflict` and writes nothing.
///
/// # JSON Format
///
/// ```json
/// {
///   "name": "Seed Guardian",
///   "title": "Kids",
///   "mission": "Collect, taste, and protect lost seeds."
/// }
/// ```
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn post_mission_role(state: *mut ContentStore, json_ptr: *const c_char) -> *const c_char {
    let store = match unsafe { state.as_ref() } {
        Some(s) => s,
        None => {
            let error = AppResponse::BadRequest("Null state pointer passed to post_mission_role".to_string());
            return response_to_c_string(&error);
        }
    };

    let json_str = match c_ptr_to_string(json_ptr, "JSON") {
        Ok(json) => json,
        Err(error_ptr) => return error_ptr,
    };

    let input: RoleInput = match serde_json::from_str(&json_str) {
        Ok(i) => i,
        Err(e) => {
            let error = AppResponse::SerializationError(format!("Invalid JSON: {e}"));
            return response_to_c_string(&error);
        }
    };

    match mission_roles::create_role(store, input) {
        Ok(role) => ok_json(&role),
        Err(e) => response_to_c_string(&e),
    }
}

/// Partially updates a mission role.
///
/// Present fields overwrite their rows; a missing row is created when the
/// incoming value is non-empty. All writes commit in one transaction.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn patch_mission_role(
    state: *mut ContentStore,
    role_id: *const c_char,
    json_ptr: *const c_char,
) -> *const c_char {
    let store = match unsafe { state.as_ref() } {
        Some(s) => s,
        None => {
            let error = AppResponse::BadRequest("Null state pointer passed to patch_mission_role".to_string());
            return response_to_c_string(&error);
        }
    };

    let role_id_str = match c_ptr_to_string(role_id, "roleId") {
        Ok(id) => id,
        Err(error_ptr) => return error_ptr,
    };
    let json_str = match c_ptr_to_string(json_ptr, "JSON") {
        Ok(json) => json,
        Err(error_ptr) => return error_ptr,
    };

    let patch: RolePatch = match serde_json::from_str(&json_str) {
        Ok(p) => p,
        Err(e) => {
            let error = AppResponse::SerializationError(format!("Invalid JSON: {e}"));
            return response_to_c_string(&error);
        }
    };

    match mission_roles::update_role(store, &role_id_str, patch) {
        Ok(role) => ok_json(&role),
        Err(e) => response_to_c_string(&e),
    }
}

/// Deletes every content row belonging to a mission role.
///
/// An unknown roleId matches nothing and reports zero removals rather than
/// an error.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn delete_mission_role(state: *mut ContentStore, role_id: *const c_char) -> *const c_char {
    let store = match unsafe { state.as_ref() } {
        Some(s) => s,
        None => {
            let error = AppResponse::BadRequest("Null state pointer passed to delete_mission_role".to_string());
            return response_to_c_string(&error);
        }
    };

    let role_id_str = match c_ptr_to_string(role_id, "roleId") {
        Ok(id) => id,
        Err(error_ptr) => return error_ptr,
    };

    match mission_roles::delete_role(store, &role_id_str) {
        Ok(removed) => {
            let success = AppResponse::Ok(format!(
                "Deleted {removed} content items for role '{role_id_str}'"
            ));
            response_to_c_string(&success)
        }
        Err(e) => response_to_c_string(&e),
    }
}

/// Derives the deterministic school access code for a name and year.
///
/// Stateless; no store pointer is involved.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn school_access_code(name: *const c_char, year: u32) -> *const c_char {
    let name_str = match c_ptr_to_string(name, "name") {
        Ok(n) => n,
        Err(error_ptr) => return error_ptr,
    };

    let code = access_codes::school_code(&name_str, year);
    response_to_c_string(&AppResponse::Ok(code))
}

/// Derives the QR payload id for a school access code.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn qr_code_id(code: *const c_char) -> *const c_char {
    let code_str = match c_ptr_to_string(code, "code") {
        Ok(c) => c,
        Err(error_ptr) => return error_ptr,
    };

    let token = access_codes::qr_token(&code_str);
    response_to_c_string(&AppResponse::Ok(token))
}

/// Builds the parent invite link for a school access code.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn parent_invite_link(base_url: *const c_char, code: *const c_char) -> *const c_char {
    let base_str = match c_ptr_to_string(base_url, "baseUrl") {
        Ok(b) => b,
        Err(error_ptr) => return error_ptr,
    };
    let code_str = match c_ptr_to_string(code, "code") {
        Ok(c) => c,
        Err(error_ptr) => return error_ptr,
    };

    let link = access_codes::parent_link(&base_str, &code_str);
    response_to_c_string(&AppResponse::Ok(link))
}

/// Clears all content rows while keeping the store operational.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn clear_all_records(state: *mut ContentStore) -> *const c_char {
    let store = match unsafe { state.as_ref() } {
        Some(s) => s,
        None => {
            let error = AppResponse::BadRequest("Null state pointer passed to clear_all_records".to_string());
            return response_to_c_string(&error);
        }
    };

    match store.clear_all_records() {
        Ok(removed) => {
            let success = AppResponse::Ok(format!("Cleared {removed} content items"));
            response_to_c_string(&success)
        }
        Err(e) => response_to_c_string(&e),
    }
}

/// Resets the store to a clean state under a new name.
///
/// Closes the current database file, removes it, and opens a fresh one.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn reset_store(state: *mut ContentStore, name_ptr: *const c_char) -> *const c_char {
    if state.is_null() {
        let error = AppResponse::BadRequest("Null state pointer passed to reset_store".to_string());
        return response_to_c_string(&error);
    }

    let name = match c_ptr_to_string(name_ptr, "name") {
        Ok(name) => name,
        Err(error_ptr) => return error_ptr,
    };

    let store = unsafe { &mut *state };

    match store.reset(&name) {
        Ok(_) => {
            let success = AppResponse::Ok(format!("Store '{name}' was reset successfully"));
            response_to_c_string(&success)
        }
        Err(e) => response_to_c_string(&e),
    }
}

/// Explicitly closes the store's database handle.
///
/// Useful for hot-restart scenarios where the embedding runtime wants to
/// release the file lock before reconnecting. Any later operation on this
/// state fails with a BadRequest until a new store is created.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn close_store(state: *mut ContentStore) -> *const c_char {
    if state.is_null() {
        let error = AppResponse::BadRequest("Null state pointer passed to close_store".to_string());
        return response_to_c_string(&error);
    }

    let store = unsafe { &mut *state };

    match store.close() {
        Ok(_) => {
            let success = AppResponse::Ok("Store connection closed successfully".to_string());
            response_to_c_string(&success)
        }
        Err(e) => response_to_c_string(&e),
    }
}

/// Serializes a payload into an `Ok` response C string.
fn ok_json<T: Serialize>(value: &T) -> *const c_char {
    match serde_json::to_string(value) {
        Ok(json) => response_to_c_string(&AppResponse::Ok(json)),
        Err(e) => {
            let error = AppResponse::SerializationError(format!("Failed to serialize result: {e}"));
            response_to_c_string(&error)
        }
    }
}

/// Parses a section wire name out of a C string pointer.
fn parse_section_ptr(ptr: *const c_char) -> Result<Section, *const c_char> {
    let section_str = c_ptr_to_string(ptr, "section")?;
    Section::parse(&section_str).ok_or_else(|| {
        let error = AppResponse::BadRequest(format!("Unknown section: {section_str}"));
        response_to_c_string(&error)
    })
}

/// Converts an [`AppResponse`] to a C-compatible string.
///
/// Returns a null pointer if serialization or C string creation fails; the
/// caller frees the returned memory.
fn response_to_c_string(response: &AppResponse) -> *const c_char {
    let json = match serde_json::to_string(response) {
        Ok(j) => j,
        Err(e) => {
            warn!("Error serializing response: {e}");
            return std::ptr::null();
        }
    };

    match CString::new(json) {
        Ok(c_str) => c_str.into_raw(),
        Err(e) => {
            warn!("Error creating CString: {e}");
            std::ptr::null()
        }
    }
}

/// Converts a C string pointer to a Rust String, mapping null pointers and
/// invalid UTF-8 to ready-to-return error responses.
fn c_ptr_to_string(ptr: *const c_char, field_name: &str) -> Result<String, *const c_char> {
    if ptr.is_null() {
        let error = AppResponse::BadRequest(format!("Null {field_name} pointer"));
        return Err(response_to_c_string(&error));
    }

    match unsafe { CStr::from_ptr(ptr).to_str() } {
        Ok(s) => Ok(s.to_string()),
        Err(e) => {
            let error = AppResponse::BadRequest(format!("Invalid UTF-8 in {field_name}: {e}"));
            Err(response_to_c_string(&error))
        }
    }
}
