//! Analytics and tracking script detection

use crate::extract::document::{Document, Element};
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::LazyLock;

/// Maximum number of characters kept from an inline script
pub const SNIPPET_LEN: usize = 200;

/// Known analytics providers, in detection priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AnalyticsProvider {
    #[serde(rename = "Google Analytics (gtag.js)")]
    GoogleAnalyticsGtag,
    #[serde(rename = "Google Analytics (analytics.js)")]
    GoogleAnalyticsLegacy,
    #[serde(rename = "Google Tag Manager")]
    GoogleTagManager,
    #[serde(rename = "Facebook Pixel")]
    FacebookPixel,
    #[serde(rename = "Hotjar")]
    Hotjar,
    #[serde(rename = "Mixpanel")]
    Mixpanel,
    #[serde(rename = "Segment")]
    Segment,
    #[serde(rename = "Plausible")]
    Plausible,
    #[serde(rename = "Matomo")]
    Matomo,
    #[serde(rename = "Google Tag Manager (noscript)")]
    GoogleTagManagerNoscript,
    #[serde(rename = "Facebook Pixel (noscript)")]
    FacebookPixelNoscript,
}

impl AnalyticsProvider {
    /// Providers tested against `<script>` elements, first match wins
    pub const SCRIPT_PROVIDERS: [AnalyticsProvider; 9] = [
        AnalyticsProvider::GoogleAnalyticsGtag,
        AnalyticsProvider::GoogleAnalyticsLegacy,
        AnalyticsProvider::GoogleTagManager,
        AnalyticsProvider::FacebookPixel,
        AnalyticsProvider::Hotjar,
        AnalyticsProvider::Mixpanel,
        AnalyticsProvider::Segment,
        AnalyticsProvider::Plausible,
        AnalyticsProvider::Matomo,
    ];

    /// Human-readable provider name, as written to reports
    pub fn label(&self) -> &'static str {
        match self {
            AnalyticsProvider::GoogleAnalyticsGtag => "Google Analytics (gtag.js)",
            AnalyticsProvider::GoogleAnalyticsLegacy => "Google Analytics (analytics.js)",
            AnalyticsProvider::GoogleTagManager => "Google Tag Manager",
            AnalyticsProvider::FacebookPixel => "Facebook Pixel",
            AnalyticsProvider::Hotjar => "Hotjar",
            AnalyticsProvider::Mixpanel => "Mixpanel",
            AnalyticsProvider::Segment => "Segment",
            AnalyticsProvider::Plausible => "Plausible",
            AnalyticsProvider::Matomo => "Matomo",
            AnalyticsProvider::GoogleTagManagerNoscript => "Google Tag Manager (noscript)",
            AnalyticsProvider::FacebookPixelNoscript => "Facebook Pixel (noscript)",
        }
    }

    fn detection(&self) -> Option<&'static Regex> {
        let re: &'static LazyLock<Regex> = match self {
            AnalyticsProvider::GoogleAnalyticsGtag => &GTAG_DETECT,
            AnalyticsProvider::GoogleAnalyticsLegacy => &LEGACY_DETECT,
            AnalyticsProvider::GoogleTagManager => &GTM_DETECT,
            AnalyticsProvider::FacebookPixel => &FB_DETECT,
            AnalyticsProvider::Hotjar => &HOTJAR_DETECT,
            AnalyticsProvider::Mixpanel => &MIXPANEL_DETECT,
            AnalyticsProvider::Segment => &SEGMENT_DETECT,
            AnalyticsProvider::Plausible => &PLAUSIBLE_DETECT,
            AnalyticsProvider::Matomo => &MATOMO_DETECT,
            _ => return None,
        };
        Some(LazyLock::force(re))
    }

    fn id_pattern(&self) -> Option<&'static Regex> {
        let re: &'static LazyLock<Regex> = match self {
            AnalyticsProvider::GoogleAnalyticsGtag => &GTAG_ID,
            AnalyticsProvider::GoogleAnalyticsLegacy => &UA_ID,
            AnalyticsProvider::GoogleTagManager => &GTM_ID,
            AnalyticsProvider::FacebookPixel => &FB_ID,
            AnalyticsProvider::Hotjar => &HOTJAR_ID,
            _ => return None,
        };
        Some(LazyLock::force(re))
    }

    /// Extracts a tracking ID, preferring the script URL over inline code
    fn tracking_id(&self, src: &str, content: &str) -> Option<String> {
        let re = self.id_pattern()?;
        [src, content].into_iter().find_map(|haystack| {
            re.captures(haystack)
                .and_then(|caps| caps.get(1).or_else(|| caps.get(0)))
                .map(|m| m.as_str().to_string())
        })
    }
}

impl fmt::Display for AnalyticsProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Where a script was found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScriptLocation {
    Head,
    Body,
}

/// One detected tracking script
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalyticsRecord {
    #[serde(rename = "type")]
    pub provider: AnalyticsProvider,
    #[serde(rename = "id", skip_serializing_if = "Option::is_none")]
    pub tracking_id: Option<String>,
    #[serde(rename = "code")]
    pub snippet: String,
    pub location: ScriptLocation,
}

macro_rules! pattern {
    ($name:ident, $re:expr) => {
        static $name: LazyLock<Regex> =
            LazyLock::new(|| Regex::new($re).expect("hardcoded regex pattern is valid"));
    };
}

pattern!(GTAG_DETECT, r"(?i)gtag\(|googletagmanager\.com/gtag");
pattern!(LEGACY_DETECT, r"(?i)google-analytics\.com/analytics\.js|ga\('create'");
pattern!(GTM_DETECT, r"(?i)googletagmanager\.com/gtm\.js");
pattern!(FB_DETECT, r"(?i)connect\.facebook\.net/.*/fbevents\.js|fbq\(");
pattern!(HOTJAR_DETECT, r"(?i)static\.hotjar\.com");
pattern!(MIXPANEL_DETECT, r"(?i)cdn\.mxpnl\.com|mixpanel\.");
pattern!(SEGMENT_DETECT, r"(?i)cdn\.segment\.com");
pattern!(PLAUSIBLE_DETECT, r"(?i)plausible\.io");
pattern!(MATOMO_DETECT, r"(?i)matomo\.js|piwik\.js");

pattern!(GTAG_ID, r"\b(G-[A-Z0-9]+|UA-\d+-\d+|AW-\d+)\b");
pattern!(UA_ID, r"\b(UA-\d+-\d+)\b");
pattern!(GTM_ID, r"\b(GTM-[A-Z0-9]+)\b");
pattern!(FB_ID, r#"fbq\(\s*['"]init['"]\s*,\s*['"](\d+)['"]"#);
pattern!(HOTJAR_ID, r"hjid\s*:\s*(\d+)");

pattern!(NOSCRIPT_GTM, r"(?i)googletagmanager\.com");
pattern!(NOSCRIPT_FB, r"(?i)facebook\.com/tr");

/// Detects tracking scripts in a full HTML page
///
/// Each `<script>` yields at most one record. `<noscript>` fallbacks for
/// Tag Manager and the Facebook pixel yield their own records.
pub fn detect_analytics(html: &str) -> Vec<AnalyticsRecord> {
    let doc = Document::parse(html);

    let mut records: Vec<AnalyticsRecord> = doc
        .select("script")
        .into_iter()
        .filter_map(classify_script)
        .collect();

    records.extend(doc.select("noscript").into_iter().filter_map(classify_noscript));

    records
}

fn classify_script(script: Element<'_>) -> Option<AnalyticsRecord> {
    let src = script.attr("src").unwrap_or("").trim();
    let content = script.raw_text();

    let provider = AnalyticsProvider::SCRIPT_PROVIDERS
        .into_iter()
        .find(|p| {
            p.detection()
                .map(|re| re.is_match(src) || re.is_match(&content))
                .unwrap_or(false)
        })?;

    let location = if script.has_ancestor("head") {
        ScriptLocation::Head
    } else {
        ScriptLocation::Body
    };

    let snippet = if src.is_empty() {
        truncate(&content)
    } else {
        src.to_string()
    };

    Some(AnalyticsRecord {
        provider,
        tracking_id: provider.tracking_id(src, &content),
        snippet,
        location,
    })
}

fn classify_noscript(noscript: Element<'_>) -> Option<AnalyticsRecord> {
    let content = noscript.inner_html();

    let provider = if NOSCRIPT_GTM.is_match(&content) {
        AnalyticsProvider::GoogleTagManagerNoscript
    } else if NOSCRIPT_FB.is_match(&content) {
        AnalyticsProvider::FacebookPixelNoscript
    } else {
        return None;
    };

    Some(AnalyticsRecord {
        provider,
        tracking_id: None,
        snippet: truncate(&content),
        location: ScriptLocation::Body,
    })
}

fn truncate(text: &str) -> String {
    text.chars().take(SNIPPET_LEN).collect()
}
