//! Form structure extraction

use crate::extract::document::{Document, Element};
use serde::Serialize;

/// Field types that never carry user input worth migrating
const SKIPPED_TYPES: &[&str] = &["submit", "button", "hidden"];

/// One retained form field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldRecord {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    pub required: bool,
    /// Present only for select, radio and checkbox fields
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
}

/// A form with at least one retained field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormRecord {
    pub source_url: String,
    pub form_id: String,
    pub fields: Vec<FieldRecord>,
    pub submit_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    pub method: String,
}

/// Extracts every form that has at least one named, user-facing field
pub fn extract_forms(source_url: &str, html: &str) -> Vec<FormRecord> {
    let doc = Document::parse(html);

    doc.select("form")
        .into_iter()
        .enumerate()
        .filter_map(|(index, form)| extract_form(&doc, source_url, index, form))
        .collect()
}

fn extract_form(
    doc: &Document,
    source_url: &str,
    index: usize,
    form: Element<'_>,
) -> Option<FormRecord> {
    let fields: Vec<FieldRecord> = form
        .select("input, textarea, select")
        .into_iter()
        .filter_map(|field| extract_field(doc, field))
        .collect();

    if fields.is_empty() {
        return None;
    }

    let form_id = non_empty(form.attr("id"))
        .or_else(|| non_empty(form.attr("class")))
        .unwrap_or_else(|| format!("form-{}", index));

    let method = non_empty(form.attr("method"))
        .map(|m| m.to_uppercase())
        .unwrap_or_else(|| "GET".to_string());

    Some(FormRecord {
        source_url: source_url.to_string(),
        form_id,
        fields,
        submit_text: submit_text(form),
        action: non_empty(form.attr("action")),
        method,
    })
}

fn extract_field(doc: &Document, field: Element<'_>) -> Option<FieldRecord> {
    let field_type = non_empty(field.attr("type"))
        .map(|t| t.to_lowercase())
        .unwrap_or_else(|| field.tag().to_string());

    if SKIPPED_TYPES.contains(&field_type.as_str()) {
        return None;
    }

    let name = non_empty(field.attr("name")).or_else(|| non_empty(field.attr("id")))?;
    let placeholder = non_empty(field.attr("placeholder"));

    let label = label_for(doc, field)
        .or_else(|| field.closest("label").map(|l| l.text()).filter(|t| !t.is_empty()))
        .or_else(|| placeholder.clone())
        .unwrap_or_else(|| name.clone());

    let required = field.has_attr("required") || field.has_class("required");

    let options = if field.tag() == "select" {
        Some(
            field
                .select("option")
                .into_iter()
                .map(|opt| opt.text())
                .filter(|t| !t.is_empty())
                .collect(),
        )
    } else if field_type == "radio" || field_type == "checkbox" {
        non_empty(field.attr("value")).map(|v| vec![v])
    } else {
        None
    };

    Some(FieldRecord {
        name,
        field_type,
        label,
        placeholder,
        required,
        options,
    })
}

/// Text of a `<label for=...>` pointing at the field's id
fn label_for(doc: &Document, field: Element<'_>) -> Option<String> {
    let id = non_empty(field.attr("id"))?;
    doc.select("label[for]")
        .into_iter()
        .find(|label| label.attr("for") == Some(id.as_str()))
        .map(|label| label.text())
        .filter(|t| !t.is_empty())
}

fn submit_text(form: Element<'_>) -> String {
    form.first("button[type='submit'], input[type='submit']")
        .and_then(|submit| non_empty(submit.attr("value")).or_else(|| non_empty(Some(&submit.text()))))
        .unwrap_or_else(|| "Submit".to_string())
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
