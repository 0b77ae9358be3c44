//! Snapshot serialization: the full entity store to/from JSON.
//!
//! RULES:
//!   - One save slot. Every save first purges every other file in the
//!     snapshot directory except the canonical active file and a
//!     config file that happens to share the directory.
//!   - Writes go to a temp file which is renamed over the target, so a
//!     failed save never leaves a half-written snapshot behind.
//!   - Load validates the whole document before touching the store,
//!     then replaces the store wholesale. Nothing is merged.
//!
//! Top-level keys are part of the file format and must not change:
//! `metadata`, `produits`, `fournisseurs`, `entreprises`, `prix`.

use crate::{
    config::CONFIG_FILE,
    error::{SimError, SimResult},
    model::{Company, Product, Supplier},
    pricing::PriceTable,
    store::EntityStore,
    types::Tick,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

pub const SNAPSHOT_VERSION: &str = "1.0";

/// File stem of the single retained save.
pub const ACTIVE_SNAPSHOT: &str = "active_game";

pub const REQUIRED_KEYS: [&str; 5] = ["metadata", "produits", "fournisseurs", "entreprises", "prix"];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SnapshotMetadata {
    /// RFC 3339 creation timestamp (UTC).
    pub date_creation: String,
    pub version: String,
    /// Engine tick at save time. Absent in files written without it.
    #[serde(default)]
    pub tick: Tick,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotDocument {
    pub metadata: SnapshotMetadata,
    #[serde(rename = "produits")]
    pub products: Vec<Product>,
    #[serde(rename = "fournisseurs")]
    pub suppliers: Vec<Supplier>,
    #[serde(rename = "entreprises")]
    pub companies: Vec<Company>,
    #[serde(rename = "prix")]
    pub prices: BTreeMap<String, f64>,
}

impl SnapshotDocument {
    pub fn capture(store: &EntityStore, tick: Tick) -> Self {
        Self {
            metadata: SnapshotMetadata {
                date_creation: chrono::Utc::now().to_rfc3339(),
                version: SNAPSHOT_VERSION.to_string(),
                tick,
            },
            products:  store.products.iter().cloned().collect(),
            suppliers: store.suppliers.iter().cloned().collect(),
            companies: store.companies.iter().cloned().collect(),
            prices:    store.prices().to_wire(),
        }
    }

    /// Build a fresh store from this document. Fails on duplicate ids,
    /// malformed price keys or out-of-range values.
    pub fn into_store(self) -> SimResult<EntityStore> {
        for p in &self.products {
            if !(p.base_price.is_finite() && p.base_price > 0.0) {
                return Err(SimError::corrupt(format!(
                    "product {} has invalid base_price {}",
                    p.id, p.base_price
                )));
            }
        }
        for c in &self.companies {
            if !(c.budget.is_finite() && c.budget_initial.is_finite()) {
                return Err(SimError::corrupt(format!("company {} has a non-finite budget", c.id)));
            }
        }
        let prices = PriceTable::from_wire(&self.prices)?;
        EntityStore::from_parts(self.products, self.suppliers, self.companies, prices)
            .map_err(|e| SimError::corrupt(e.to_string()))
    }
}

/// Encode the store as a snapshot JSON string.
pub fn encode(store: &EntityStore, tick: Tick) -> SimResult<String> {
    Ok(serde_json::to_string_pretty(&SnapshotDocument::capture(store, tick))?)
}

/// Decode and fully validate a snapshot JSON string.
pub fn decode(json: &str) -> SimResult<(SnapshotMetadata, EntityStore)> {
    let value: serde_json::Value = serde_json::from_str(json)
        .map_err(|e| SimError::corrupt(format!("not valid JSON: {e}")))?;
    let object = value
        .as_object()
        .ok_or_else(|| SimError::corrupt("top level is not an object"))?;
    for key in REQUIRED_KEYS {
        if !object.contains_key(key) {
            return Err(SimError::corrupt(format!("missing key '{key}'")));
        }
    }

    let document: SnapshotDocument = serde_json::from_value(value)
        .map_err(|e| SimError::corrupt(format!("malformed record: {e}")))?;
    if document.metadata.version != SNAPSHOT_VERSION {
        log::warn!(
            "snapshot: version {} differs from {SNAPSHOT_VERSION}, loading anyway",
            document.metadata.version
        );
    }
    let metadata = document.metadata.clone();
    let store = document.into_store()?;
    Ok((metadata, store))
}

/// Reads and writes snapshots under one directory.
#[derive(Debug, Clone)]
pub struct SnapshotService {
    dir: PathBuf,
}

impl SnapshotService {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, name: Option<&str>) -> SimResult<PathBuf> {
        let stem = name.unwrap_or(ACTIVE_SNAPSHOT);
        if stem.is_empty() || stem.contains(['/', '\\']) || stem.contains("..") {
            return Err(SimError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("invalid snapshot name '{stem}'"),
            )));
        }
        Ok(self.dir.join(format!("{stem}.json")))
    }

    /// Save `store` and return the written path.
    pub fn save(&self, store: &EntityStore, tick: Tick, name: Option<&str>) -> SimResult<PathBuf> {
        let path = self.path_for(name)?;
        fs::create_dir_all(&self.dir)?;
        let purged = self.purge_stale()?;

        let json = encode(store, tick)?;
        write_atomic(&path, json.as_bytes())?;

        log::info!(
            "snapshot: saved {} products, {} suppliers, {} companies to {} ({purged} stale files purged)",
            store.products.len(),
            store.suppliers.len(),
            store.companies.len(),
            path.display()
        );
        Ok(path)
    }

    /// Replace `store` with the named snapshot.
    ///
    /// Ok(None) if no such file exists. A corrupt file is an error and
    /// leaves `store` untouched.
    pub fn load(&self, store: &mut EntityStore, name: Option<&str>) -> SimResult<Option<SnapshotMetadata>> {
        let path = self.path_for(name)?;
        if !path.exists() {
            log::warn!("snapshot: {} not found", path.display());
            return Ok(None);
        }
        let json = fs::read_to_string(&path)?;
        let (metadata, loaded) = decode(&json)?;
        store.replace_all(loaded);
        log::info!(
            "snapshot: loaded {} (created {}, tick {})",
            path.display(),
            metadata.date_creation,
            metadata.tick
        );
        Ok(Some(metadata))
    }

    /// Delete every file in the directory except the active snapshot
    /// and the simulation config.
    fn purge_stale(&self) -> SimResult<usize> {
        let keep = format!("{ACTIVE_SNAPSHOT}.json");
        let mut purged = 0;
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            let name = entry.file_name();
            if !entry.file_type()?.is_file() || name == keep.as_str() || name == CONFIG_FILE {
                continue;
            }
            fs::remove_file(entry.path())?;
            log::debug!("snapshot: purged {}", entry.path().display());
            purged += 1;
        }
        Ok(purged)
    }
}

fn write_atomic(path: &Path, bytes: &[u8]) -> SimResult<()> {
    let tmp = path.with_extension("json.tmp");
    let result = (|| -> std::io::Result<()> {
        let mut file = fs::File::create(&tmp)?;
        file.write_all(bytes)?;
        file.sync_all()?;
        fs::rename(&tmp, path)
    })();
    if let Err(e) = result {
        let _ = fs::remove_file(&tmp);
        return Err(e.into());
    }
    Ok(())
}
