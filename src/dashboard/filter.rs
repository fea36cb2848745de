// src/dashboard/filter.rs

use std::collections::BTreeSet;

use serde::Serialize;

use crate::services::{split_services, ServiceCatalog};

/// Services filter with two phases: checkbox edits land in `draft` and only
/// gate rendering once `apply` copies them into `applied`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ServiceFilter {
    applied: BTreeSet<String>,
    draft: BTreeSet<String>,
    open: bool,
    query: String,
}

impl ServiceFilter {
    pub fn applied(&self) -> &BTreeSet<String> {
        &self.applied
    }

    pub fn draft(&self) -> &BTreeSet<String> {
        &self.draft
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Opening starts the draft from what is currently applied.
    pub fn open_dropdown(&mut self) {
        self.draft = self.applied.clone();
        self.open = true;
    }

    pub fn toggle(&mut self, service: &str) -> bool {
        if !self.draft.remove(service) {
            self.draft.insert(service.to_string());
            true
        } else {
            false
        }
    }

    pub fn search(&mut self, query: &str) {
        self.query = query.to_string();
    }

    pub fn clear_draft(&mut self) {
        self.draft.clear();
    }

    pub fn apply(&mut self) {
        self.applied = self.draft.clone();
        self.open = false;
    }

    /// Closes without committing the draft.
    pub fn discard(&mut self) {
        self.open = false;
    }

    /// Empties both phases ("Clear Filters").
    pub fn reset(&mut self) {
        self.applied.clear();
        self.draft.clear();
    }

    /// Preview of the draft while editing, the applied set otherwise.
    pub fn label(&self) -> String {
        let set = if self.open { &self.draft } else { &self.applied };
        if set.is_empty() {
            "All".to_string()
        } else {
            format!("Selected ({})", set.len())
        }
    }

    /// An empty applied set means every service.
    pub fn matches(&self, service: &str) -> bool {
        self.applied.is_empty()
            || split_services(service)
                .iter()
                .any(|part| self.applied.contains(part))
    }

    /// Dropdown rows: (service, checked) for the current search text.
    pub fn rows<'a>(&self, catalog: &'a ServiceCatalog) -> Vec<(&'a str, bool)> {
        catalog
            .search(&self.query)
            .into_iter()
            .map(|s| (s, self.draft.contains(s)))
            .collect()
    }
}
