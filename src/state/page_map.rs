use crate::extract::{AnalyticsRecord, FormRecord, SeoFields};
use std::collections::HashMap;

/// Everything extracted from one successfully fetched page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRecord {
    pub url: String,
    pub title: String,
    pub description: String,
    pub raw_content_html: String,
    pub markdown: String,
    pub seo: SeoFields,
    pub images: Vec<String>,
    pub forms: Vec<FormRecord>,
    pub analytics_scripts: Vec<AnalyticsRecord>,
}

impl PageRecord {
    pub fn has_forms(&self) -> bool {
        !self.forms.is_empty()
    }

    pub fn has_analytics(&self) -> bool {
        !self.analytics_scripts.is_empty()
    }
}

/// Page records keyed by canonical URL key, iterated in insertion order
#[derive(Debug, Default)]
pub struct PageMap {
    records: Vec<PageRecord>,
    index: HashMap<String, usize>,
}

impl PageMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a record under `key`
    ///
    /// Returns false and leaves the map unchanged if the key already exists.
    pub fn insert(&mut self, key: &str, record: PageRecord) -> bool {
        if self.index.contains_key(key) {
            return false;
        }
        self.index.insert(key.to_string(), self.records.len());
        self.records.push(record);
        true
    }

    #[cfg(test)]
    fn get(&self, key: &str) -> Option<&PageRecord> {
        self.index.get(key).map(|&i| &self.records[i])
    }

    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in processing order
    pub fn iter(&self) -> impl Iterator<Item = &PageRecord> {
        self.records.iter()
    }
}
