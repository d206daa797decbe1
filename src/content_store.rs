//! redb-backed content store.
//!
//! One `content` table keyed by store-assigned id, a `content_keys` index
//! enforcing `(section, key)` uniqueness, and a `meta` table holding the id
//! sequence. Multi-row writes go through [`ContentStore::apply_batch`], which
//! runs every operation of the batch inside a single write transaction.

use std::path::PathBuf;

use log::{debug, info};
use redb::{Database, ReadableTable, Table, TableDefinition};

use crate::app_response::AppResponse;
use crate::content_model::{
    BulkUpdateEntry, BulkUpdateOutcome, ContentItem, ContentPatch, NewContentItem, Section,
};

const CONTENT: TableDefinition<&str, &str> = TableDefinition::new("content");
const KEY_INDEX: TableDefinition<&str, &str> = TableDefinition::new("content_keys");
const META: TableDefinition<&str, u64> = TableDefinition::new("meta");

const SEQ_KEY: &str = "content_seq";

// Separator for the (section, key) index entries. Section names never
// contain U+001F, so two distinct (section, key) pairs cannot alias.
const INDEX_SEP: char = '\u{1f}';

fn index_key(section: Section, key: &str) -> String {
    format!("{}{}{}", section.as_str(), INDEX_SEP, key)
}

fn next_id(meta: &mut Table<'_, &str, u64>) -> Result<String, AppResponse> {
    let next = meta.get(SEQ_KEY)?.map(|g| g.value()).unwrap_or(0) + 1;
    meta.insert(SEQ_KEY, next)?;
    Ok(format!("ci_{next:06}"))
}

/// One operation of an atomic batch. The whole batch commits or none of it
/// does; a conflict or missing row aborts the enclosing transaction.
#[derive(Debug, Clone)]
pub enum BatchOp {
    Insert(NewContentItem),
    SetValue { id: String, value: String },
    Remove { id: String },
}

pub struct ContentStore {
    db: Option<Database>,
    path: PathBuf,
}

impl ContentStore {
    pub fn init(name: String) -> Result<Self, AppResponse> {
        let (db, path) = Self::open(&name)?;
        Ok(Self { db: Some(db), path })
    }

    fn open(name: &str) -> Result<(Database, PathBuf), AppResponse> {
        let path = PathBuf::from(format!("{name}.redb"));
        let db = Database::create(&path)?;

        // Create the tables up front so reads never hit TableDoesNotExist.
        let tx = db.begin_write()?;
        {
            tx.open_table(CONTENT)?;
            tx.open_table(KEY_INDEX)?;
            tx.open_table(META)?;
        }
        tx.commit()?;

        Ok((db, path))
    }

    fn db(&self) -> Result<&Database, AppResponse> {
        self.db
            .as_ref()
            .ok_or_else(|| AppResponse::BadRequest("Store is closed".to_string()))
    }

    /// Applies a batch of writes in one transaction, returning the items
    /// produced by `Insert` and `SetValue` ops in batch order. Any failure
    /// aborts the transaction and leaves the store untouched.
    pub fn apply_batch(&self, ops: Vec<BatchOp>) -> Result<Vec<ContentItem>, AppResponse> {
        let db = self.db()?;
        let tx = db.begin_write()?;
        let mut touched = Vec::new();
        {
            let mut content = tx.open_table(CONTENT)?;
            let mut index = tx.open_table(KEY_INDEX)?;
            let mut meta = tx.open_table(META)?;

            for op in ops {
                match op {
                    BatchOp::Insert(new) => {
                        if new.key.is_empty() {
                            return Err(AppResponse::ValidationError(
                                "Content key must not be empty".to_string(),
                            ));
                        }
                        let ik = index_key(new.section, &new.key);
                        if index.get(ik.as_str())?.is_some() {
                            return Err(AppResponse::Conflict(format!(
                                "Content key '{}' already exists in section {}",
                                new.key, new.section
                            )));
                        }
                        let id = next_id(&mut meta)?;
                        let item = ContentItem {
                            id: id.clone(),
                            section: new.section,
                            key: new.key,
                            value: new.value,
                            metadata: new.metadata,
                            order: new.order,
                            active: new.active,
                        };
                        let json = serde_json::to_string(&item)?;
                        content.insert(id.as_str(), json.as_str())?;
                        index.insert(ik.as_str(), id.as_str())?;
                        touched.push(item);
                    }
                    BatchOp::SetValue { id, value } => {
                        let json = match content.get(id.as_str())? {
                            Some(guard) => guard.value().to_string(),
                            None => {
                                return Err(AppResponse::NotFound(format!(
                                    "No content item with id: {id}"
                                )))
                            }
                        };
                        let mut item: ContentItem = serde_json::from_str(&json)?;
                        item.value = value;
                        let json = serde_json::to_string(&item)?;
                        content.insert(id.as_str(), json.as_str())?;
                        touched.push(item);
                    }
                    BatchOp::Remove { id } => {
                        let json = match content.remove(id.as_str())? {
                            Some(guard) => guard.value().to_string(),
                            // Removing a row that is already gone is a no-op.
                            None => continue,
                        };
                        let item: ContentItem = serde_json::from_str(&json)?;
                        index.remove(index_key(item.section, &item.key).as_str())?;
                    }
                }
            }
        }
        tx.commit()?;
        Ok(touched)
    }

    pub fn create(&self, item: NewContentItem) -> Result<ContentItem, AppResponse> {
        debug!("Creating content item {}/{}", item.section, item.key);
        let mut created = self.apply_batch(vec![BatchOp::Insert(item)])?;
        created
            .pop()
            .ok_or_else(|| AppResponse::DatabaseError("Insert batch returned no item".to_string()))
    }

    pub fn get_by_id(&self, id: &str) -> Result<Option<ContentItem>, AppResponse> {
        let db = self.db()?;
        let tx = db.begin_read()?;
        let content = tx.open_table(CONTENT)?;
        match content.get(id)? {
            Some(guard) => Ok(Some(serde_json::from_str(guard.value())?)),
            None => Ok(None),
        }
    }

    pub fn get_by_key(&self, section: Section, key: &str) -> Result<Option<ContentItem>, AppResponse> {
        let db = self.db()?;
        let tx = db.begin_read()?;
        let index = tx.open_table(KEY_INDEX)?;
        let id = match index.get(index_key(section, key).as_str())? {
            Some(guard) => guard.value().to_string(),
            None => return Ok(None),
        };
        let content = tx.open_table(CONTENT)?;
        match content.get(id.as_str())? {
            Some(guard) => Ok(Some(serde_json::from_str(guard.value())?)),
            None => Ok(None),
        }
    }

    /// Lists a section sorted by `(order, key)` ascending. Default reads pass
    /// `include_inactive = false`, excluding soft-deleted rows.
    pub fn list_section(
        &self,
        section: Section,
        include_inactive: bool,
    ) -> Result<Vec<ContentItem>, AppResponse> {
        let mut items: Vec<ContentItem> = Vec::new();
        self.scan(|item| {
            if item.section == section && (include_inactive || item.active) {
                items.push(item);
            }
        })?;
        items.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.key.cmp(&b.key)));
        Ok(items)
    }

    pub fn list_all(&self) -> Result<Vec<ContentItem>, AppResponse> {
        let mut items: Vec<ContentItem> = Vec::new();
        self.scan(|item| items.push(item))?;
        items.sort_by(|a, b| {
            a.section
                .cmp(&b.section)
                .then_with(|| a.order.cmp(&b.order))
                .then_with(|| a.key.cmp(&b.key))
        });
        Ok(items)
    }

    fn scan(&self, mut visit: impl FnMut(ContentItem)) -> Result<(), AppResponse> {
        let db = self.db()?;
        let tx = db.begin_read()?;
        let content = tx.open_table(CONTENT)?;
        for entry in content.iter()? {
            let (_, value) = entry?;
            let item: ContentItem = serde_json::from_str(value.value())?;
            visit(item);
        }
        Ok(())
    }

    /// Patches the payload columns of a row. Returns `None` for an unknown id.
    pub fn update(&self, id: &str, patch: ContentPatch) -> Result<Option<ContentItem>, AppResponse> {
        let db = self.db()?;
        let tx = db.begin_write()?;
        let updated;
        {
            let mut content = tx.open_table(CONTENT)?;
            let json = match content.get(id)? {
                Some(guard) => guard.value().to_string(),
                None => return Ok(None),
            };
            let mut item: ContentItem = serde_json::from_str(&json)?;
            if let Some(value) = patch.value {
                item.value = value;
            }
            if let Some(metadata) = patch.metadata {
                item.metadata = Some(metadata);
            }
            if let Some(order) = patch.order {
                item.order = order;
            }
            if let Some(active) = patch.active {
                item.active = active;
            }
            let json = serde_json::to_string(&item)?;
            content.insert(id, json.as_str())?;
            updated = item;
        }
        tx.commit()?;
        Ok(Some(updated))
    }

    pub fn delete_by_id(&self, id: &str) -> Result<bool, AppResponse> {
        let db = self.db()?;
        let tx = db.begin_write()?;
        let found;
        {
            let mut content = tx.open_table(CONTENT)?;
            match content.remove(id)? {
                Some(guard) => {
                    let item: ContentItem = serde_json::from_str(guard.value())?;
                    drop(guard);
                    let mut index = tx.open_table(KEY_INDEX)?;
                    index.remove(index_key(item.section, &item.key).as_str())?;
                    found = true;
                }
                None => found = false,
            };
        }
        tx.commit()?;
        Ok(found)
    }

    /// Applies each entry independently. There is no atomicity across the
    /// batch: a failing entry is reported in its outcome and the remaining
    /// entries still run.
    pub fn bulk_update(&self, entries: Vec<BulkUpdateEntry>) -> Vec<BulkUpdateOutcome> {
        entries
            .into_iter()
            .map(|entry| match self.update(&entry.id, entry.patch) {
                Ok(Some(item)) => BulkUpdateOutcome {
                    id: entry.id,
                    updated: true,
                    error: None,
                    item: Some(item),
                },
                Ok(None) => BulkUpdateOutcome {
                    error: Some(format!("No content item with id: {}", entry.id)),
                    id: entry.id,
                    updated: false,
                    item: None,
                },
                Err(err) => BulkUpdateOutcome {
                    id: entry.id,
                    updated: false,
                    error: Some(err.to_string()),
                    item: None,
                },
            })
            .collect()
    }

    /// Removes every row while keeping the store operational. Returns the
    /// number of rows removed. The id sequence is not reset.
    pub fn clear_all_records(&self) -> Result<u64, AppResponse> {
        let db = self.db()?;
        let tx = db.begin_write()?;
        let removed;
        {
            let content = tx.open_table(CONTENT)?;
            removed = content.iter()?.count() as u64;
        }
        tx.delete_table(CONTENT)?;
        tx.delete_table(KEY_INDEX)?;
        {
            tx.open_table(CONTENT)?;
            tx.open_table(KEY_INDEX)?;
        }
        tx.commit()?;
        info!("Cleared {removed} content items");
        Ok(removed)
    }

    /// Drops the current database file and reopens a fresh store under the
    /// given name.
    pub fn reset(&mut self, name: &str) -> Result<(), AppResponse> {
        self.db = None;
        if self.path.exists() {
            std::fs::remove_file(&self.path).map_err(|e| {
                AppResponse::DatabaseError(format!(
                    "Could not remove store file {}: {e}",
                    self.path.display()
                ))
            })?;
        }
        let (db, path) = Self::open(name)?;
        self.db = Some(db);
        self.path = path;
        info!("Store reset to '{name}'");
        Ok(())
    }

    /// Releases the database handle. Further operations fail with a
    /// BadRequest until the state is recreated.
    pub fn close(&mut self) -> Result<(), AppResponse> {
        self.db = None;
        info!("Store at {} closed", self.path.display());
        Ok(())
    }
}
