use std::sync::RwLock;

use serde::Deserialize;
use uuid::Uuid;

use super::StoreError;
use crate::models::Document;

/// Lock-guarded list of uploaded documents, in upload order.
pub struct DocumentStore {
    documents: RwLock<Vec<Document>>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self {
            documents: RwLock::new(Vec::new()),
        }
    }

    /// Append a document. Ids are generator-assigned and assumed unique.
    pub fn append(&self, document: Document) -> Result<(), StoreError> {
        let mut documents = self
            .documents
            .write()
            .map_err(|_| StoreError::LockPoisoned)?;
        documents.push(document);
        Ok(())
    }

    /// Snapshot of every document in upload order.
    pub fn list(&self) -> Result<Vec<Document>, StoreError> {
        let documents = self
            .documents
            .read()
            .map_err(|_| StoreError::LockPoisoned)?;
        Ok(documents.clone())
    }

    /// Remove exactly one document and return it.
    pub fn remove(&self, id: &Uuid) -> Result<Document, StoreError> {
        let mut documents = self
            .documents
            .write()
            .map_err(|_| StoreError::LockPoisoned)?;
        let index = documents
            .iter()
            .position(|d| &d.id == id)
            .ok_or(StoreError::DocumentNotFound(*id))?;
        Ok(documents.remove(index))
    }

    /// Documents owned by one student id.
    pub fn list_for_owner(&self, owner: &str) -> Result<Vec<Document>, StoreError> {
        let documents = self
            .documents
            .read()
            .map_err(|_| StoreError::LockPoisoned)?;
        Ok(documents
            .iter()
            .filter(|d| d.owner() == owner)
            .cloned()
            .collect())
    }

    /// Documents matching any criterion of `query`.
    pub fn find_for_student(&self, query: &StudentQuery) -> Result<Vec<Document>, StoreError> {
        let documents = self
            .documents
            .read()
            .map_err(|_| StoreError::LockPoisoned)?;
        Ok(documents
            .iter()
            .filter(|d| query.matches(d))
            .cloned()
            .collect())
    }

    pub fn len(&self) -> Result<usize, StoreError> {
        let documents = self
            .documents
            .read()
            .map_err(|_| StoreError::LockPoisoned)?;
        Ok(documents.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }
}

impl Default for DocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Lookup used by the teacher review screen.
///
/// A document matches when its owner equals `student_id`, its roll number
/// equals `roll_no`, or its student name equals `name` ignoring case.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentQuery {
    #[serde(default)]
    pub student_id: Option<String>,
    #[serde(default)]
    pub roll_no: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

impl StudentQuery {
    /// True when no non-blank criterion was supplied.
    pub fn is_empty(&self) -> bool {
        criterion(&self.student_id).is_none()
            && criterion(&self.roll_no).is_none()
            && criterion(&self.name).is_none()
    }

    pub fn matches(&self, document: &Document) -> bool {
        let by_id = criterion(&self.student_id).is_some_and(|id| document.owner() == id);
        let by_roll = criterion(&self.roll_no).is_some_and(|roll| document.roll_no == roll);
        let by_name = criterion(&self.name)
            .is_some_and(|name| document.student_name.to_lowercase() == name.to_lowercase());
        by_id || by_roll || by_name
    }
}

fn criterion(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
