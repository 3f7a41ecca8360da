//! JSON file-backed store implementation
//!
//! A store directory holds two documents: `families.json` and
//! `students.json`. Fetches deserialize the files; persistence does a
//! read-modify-write of the family list. Concurrent writers are
//! last-write-wins, which is acceptable for the single-operator CLI this
//! store backs.

use super::{ChildAddition, FamilyStore, apply_additions};
use crate::error::{AssignmentError, Result};
use crate::models::{Family, Student};
use log::info;
use rustc_hash::FxHashSet;
use std::path::{Path, PathBuf};

/// File name of the family documents
pub const FAMILIES_FILE: &str = "families.json";

/// File name of the student documents
pub const STUDENTS_FILE: &str = "students.json";

/// A store backed by JSON files in one directory
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Open a store directory, verifying both documents exist
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        for file in [FAMILIES_FILE, STUDENTS_FILE] {
            let path = dir.join(file);
            if !path.is_file() {
                return Err(AssignmentError::Store(format!(
                    "store file not found: {}",
                    path.display()
                )));
            }
        }
        Ok(Self { dir })
    }

    /// Create a store directory, writing both documents
    pub async fn create(
        dir: impl Into<PathBuf>,
        families: &[Family],
        students: &[Student],
    ) -> Result<Self> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir).await?;
        let store = Self { dir };
        store.write_json(FAMILIES_FILE, families).await?;
        store.write_json(STUDENTS_FILE, students).await?;
        Ok(store)
    }

    /// Directory the store reads and writes
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    async fn read_json<T: serde::de::DeserializeOwned>(&self, file: &str) -> Result<T> {
        let content = tokio::fs::read_to_string(self.dir.join(file)).await?;
        Ok(serde_json::from_str(&content)?)
    }

    async fn write_json<T: serde::Serialize + ?Sized>(&self, file: &str, value: &T) -> Result<()> {
        let content = serde_json::to_string_pretty(value)?;
        tokio::fs::write(self.dir.join(file), content).await?;
        Ok(())
    }
}

impl FamilyStore for JsonFileStore {
    async fn fetch_families(&self, _batch: &str) -> Result<Vec<Family>> {
        let families: Vec<Family> = self.read_json(FAMILIES_FILE).await?;
        info!("Fetched {} families from {}", families.len(), self.dir.display());
        Ok(families)
    }

    async fn fetch_students(&self, _batch: &str) -> Result<Vec<Student>> {
        let students: Vec<Student> = self.read_json(STUDENTS_FILE).await?;
        info!("Fetched {} students from {}", students.len(), self.dir.display());
        Ok(students)
    }

    async fn persist_family_children(
        &self,
        family_id: &str,
        additions: &[ChildAddition],
    ) -> Result<()> {
        let mut families: Vec<Family> = self.read_json(FAMILIES_FILE).await?;
        let existing_ids: FxHashSet<String> = families
            .iter()
            .flat_map(Family::child_ids)
            .map(str::to_string)
            .collect();
        let family = families
            .iter_mut()
            .find(|f| f.id == family_id)
            .ok_or_else(|| AssignmentError::Store(format!("unknown family {family_id}")))?;
        apply_additions(family, additions, &existing_ids)?;
        self.write_json(FAMILIES_FILE, &families).await
    }
}
