//! Offline source reading a directory mirror of the API.
//!
//! A reference `/api/monsters/goblin` resolves to
//! `<root>/api/monsters/goblin.json`, and the monsters list to
//! `<root>/api/monsters.json`.

use serde_json::Value;
use srd::{Collection, ResourceList, RulesSource, SourceError};
use std::fs;
use std::path::{Component, Path, PathBuf};

pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, reference: &str) -> Result<PathBuf, SourceError> {
        let path = strip_origin(reference).trim_matches('/');
        if path.is_empty() {
            return Err(SourceError::Transport(format!(
                "Empty reference: {:?}",
                reference
            )));
        }
        let relative = Path::new(path);
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)))
        {
            return Err(SourceError::Transport(format!(
                "Reference escapes mirror root: {}",
                reference
            )));
        }
        Ok(self.root.join(format!("{}.json", path)))
    }

    fn read_json(path: &Path) -> Result<Value, SourceError> {
        let contents = fs::read_to_string(path)?;
        serde_json::from_str(&contents)
            .map_err(|e| SourceError::Decode(format!("{}: {}", path.display(), e)))
    }
}

/// Drop `scheme://host` from an absolute URL
fn strip_origin(reference: &str) -> &str {
    match reference.split_once("://") {
        Some((_, rest)) => rest.find('/').map_or("", |i| &rest[i..]),
        None => reference,
    }
}

impl RulesSource for DirSource {
    fn fetch_list(&self, collection: Collection) -> Result<ResourceList, SourceError> {
        let path = self.path_for(&format!("/api/{}", collection.path()))?;
        Ok(ResourceList::from_value(&Self::read_json(&path)?))
    }

    fn fetch_detail(&self, reference: &str) -> Result<Value, SourceError> {
        Self::read_json(&self.path_for(reference)?)
    }
}
