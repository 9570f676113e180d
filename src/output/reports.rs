//! Migration reports
//!
//! Four read-only aggregates computed from the final page map. Each is built
//! by an independent pass and written to its own JSON file.

use crate::extract::{AnalyticsProvider, AnalyticsRecord, FieldRecord};
use crate::output::documents::{document_path, page_path};
use crate::output::write_json;
use crate::state::{PageMap, PageStatus};
use crate::Result;
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

pub const MIGRATION_REPORT_FILE: &str = "migration-report.json";
pub const URL_AUDIT_FILE: &str = "url-audit.json";
pub const FORMS_REPORT_FILE: &str = "forms.json";
pub const ANALYTICS_REPORT_FILE: &str = "analytics-audit.json";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrationReport {
    pub total_pages: usize,
    pub successful_pages: usize,
    pub failed_pages: usize,
    pub pages_with_forms: usize,
    pub pages_with_analytics: usize,
    pub config_hash: String,
    pub pages: Vec<MigratedPage>,
    pub failed_urls: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MigratedPage {
    pub url: String,
    pub title: String,
    pub filepath: String,
    pub status: PageStatus,
    pub forms: usize,
    pub analytics: Vec<String>,
    pub images: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlAudit {
    pub mappings: Vec<UrlMapping>,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlMapping {
    pub source_url: String,
    pub destination_path: String,
    pub status: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormsReport {
    pub total_forms: usize,
    pub forms: Vec<FormEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormEntry {
    pub url: String,
    pub form_id: String,
    pub field_count: usize,
    pub fields: Vec<FieldRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsReport {
    pub detected_scripts: Vec<DetectedScript>,
    pub pages: Vec<PageScripts>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectedScript {
    #[serde(rename = "type")]
    pub provider: AnalyticsProvider,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub occurrences: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageScripts {
    pub url: String,
    pub scripts: Vec<AnalyticsRecord>,
}

impl MigrationReport {
    /// Per-page status and totals; `failed_urls` lists pages dropped after retries
    pub fn build(
        pages: &PageMap,
        failed_urls: &[String],
        extension: &str,
        config_hash: &str,
    ) -> Self {
        let entries: Vec<MigratedPage> = pages
            .iter()
            .map(|page| MigratedPage {
                url: page.url.clone(),
                title: page.title.clone(),
                filepath: document_path(&page_path(&page.url), extension)
                    .map(|p| p.to_string_lossy().replace('\\', "/"))
                    .unwrap_or_default(),
                status: PageStatus::Success,
                forms: page.forms.len(),
                analytics: page
                    .analytics_scripts
                    .iter()
                    .map(|s| s.provider.label().to_string())
                    .collect(),
                images: page.images.len(),
            })
            .collect();

        Self {
            total_pages: pages.len() + failed_urls.len(),
            successful_pages: pages.len(),
            failed_pages: failed_urls.len(),
            pages_with_forms: pages.iter().filter(|p| p.has_forms()).count(),
            pages_with_analytics: pages.iter().filter(|p| p.has_analytics()).count(),
            config_hash: config_hash.to_string(),
            pages: entries,
            failed_urls: failed_urls.to_vec(),
        }
    }
}

impl UrlAudit {
    pub fn build(pages: &PageMap) -> Self {
        let mappings: Vec<UrlMapping> = pages
            .iter()
            .map(|page| UrlMapping {
                source_url: page.url.clone(),
                destination_path: page_path(&page.url),
                status: "preserved",
            })
            .collect();

        Self {
            total: mappings.len(),
            mappings,
        }
    }
}

impl FormsReport {
    pub fn build(pages: &PageMap) -> Self {
        let forms: Vec<FormEntry> = pages
            .iter()
            .flat_map(|page| page.forms.iter())
            .map(|form| FormEntry {
                url: form.source_url.clone(),
                form_id: form.form_id.clone(),
                field_count: form.fields.len(),
                fields: form.fields.clone(),
            })
            .collect();

        Self {
            total_forms: forms.len(),
            forms,
        }
    }
}

impl AnalyticsReport {
    /// Groups scripts by (provider, tracking ID) in first-seen order
    pub fn build(pages: &PageMap) -> Self {
        let mut detected: Vec<DetectedScript> = Vec::new();
        let mut index: HashMap<(AnalyticsProvider, Option<String>), usize> = HashMap::new();
        let mut per_page = Vec::new();

        for page in pages.iter().filter(|p| p.has_analytics()) {
            for script in &page.analytics_scripts {
                let key = (script.provider, script.tracking_id.clone());
                match index.get(&key) {
                    Some(&i) => detected[i].occurrences += 1,
                    None => {
                        index.insert(key, detected.len());
                        detected.push(DetectedScript {
                            provider: script.provider,
                            id: script.tracking_id.clone(),
                            occurrences: 1,
                        });
                    }
                }
            }

            per_page.push(PageScripts {
                url: page.url.clone(),
                scripts: page.analytics_scripts.clone(),
            });
        }

        Self {
            detected_scripts: detected,
            pages: per_page,
        }
    }
}

/// Builds and writes all four reports into `reports_dir`
pub fn write_reports(
    reports_dir: &Path,
    pages: &PageMap,
    failed_urls: &[String],
    extension: &str,
    config_hash: &str,
) -> Result<()> {
    let migration = MigrationReport::build(pages, failed_urls, extension, config_hash);
    write_json(
        &reports_dir.join(MIGRATION_REPORT_FILE),
        "migration report",
        &migration,
    )?;

    let audit = UrlAudit::build(pages);
    write_json(&reports_dir.join(URL_AUDIT_FILE), "URL audit", &audit)?;

    let forms = FormsReport::build(pages);
    write_json(&reports_dir.join(FORMS_REPORT_FILE), "forms report", &forms)?;

    let analytics = AnalyticsReport::build(pages);
    write_json(
        &reports_dir.join(ANALYTICS_REPORT_FILE),
        "analytics report",
        &analytics,
    )?;

    info!(
        "Wrote reports to {} ({} pages, {} URLs, {} forms, {} script types)",
        reports_dir.display(),
        migration.pages.len(),
        audit.total,
        forms.total_forms,
        analytics.detected_scripts.len()
    );
    Ok(())
}
