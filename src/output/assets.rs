//! Image asset downloading

use crate::config::AssetConfig;
use crate::crawler::{Fetcher, Scheduler};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use url::Url;

/// Counts for a batch of downloads
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AssetOutcome {
    pub downloaded: usize,
    pub failed: usize,
}

/// Maps an image URL to its location under the public directory
///
/// Upload paths keep their structure below the uploads segment, so
/// `/wp-content/uploads/2023/01/a.png` lands at
/// `<public>/wp-content/uploads/2023/01/a.png`. Anything else is flattened
/// into `<public>/<images_dir>/<filename>`.
///
/// Returns None for URLs without a file name or with `.`/`..` segments.
pub fn asset_path(public_dir: &Path, image_url: &Url, assets: &AssetConfig) -> Option<PathBuf> {
    let path = image_url.path();
    let segment = assets.uploads_segment.as_str();

    if let Some(pos) = path.find(segment) {
        let rest = &path[pos + segment.len()..];
        let parts = safe_segments(rest)?;
        let mut dest = public_dir.to_path_buf();
        dest.extend(segment.split('/').filter(|s| !s.is_empty()));
        dest.extend(parts);
        return Some(dest);
    }

    let filename = safe_segments(path)?.pop()?;
    Some(public_dir.join(&assets.images_dir).join(filename))
}

/// Splits a URL path into segments, rejecting traversal and empty file names
fn safe_segments(path: &str) -> Option<Vec<&str>> {
    if path.ends_with('/') {
        return None;
    }
    let parts: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    if parts.is_empty() || parts.iter().any(|s| *s == "." || *s == "..") {
        return None;
    }
    Some(parts)
}

/// Downloads every distinct image into the public directory
///
/// Each request waits on the scheduler. Failures are logged and counted;
/// they never abort the batch.
pub async fn download_images<'a, I>(
    fetcher: &Fetcher,
    scheduler: &mut Scheduler,
    images: I,
    public_dir: &Path,
    assets: &AssetConfig,
) -> AssetOutcome
where
    I: IntoIterator<Item = &'a str>,
{
    let mut outcome = AssetOutcome::default();
    let mut seen = HashSet::new();

    for raw in images {
        if !seen.insert(raw) {
            continue;
        }

        let Ok(url) = Url::parse(raw) else {
            warn!("Skipping unparsable image URL {}", raw);
            outcome.failed += 1;
            continue;
        };

        let Some(dest) = asset_path(public_dir, &url, assets) else {
            warn!("Skipping image with unsafe or empty path: {}", raw);
            outcome.failed += 1;
            continue;
        };

        if let Some(parent) = dest.parent() {
            if let Err(e) = tokio::fs::create_dir_all(parent).await {
                warn!("Cannot create {}: {}", parent.display(), e);
                outcome.failed += 1;
                continue;
            }
        }

        scheduler.wait().await;
        match fetcher.download_to(url.as_str(), &dest).await {
            Ok(bytes) => {
                debug!("Downloaded {} ({} bytes) to {}", url, bytes, dest.display());
                outcome.downloaded += 1;
            }
            Err(e) => {
                warn!("Failed to download {}: {}", url, e);
                outcome.failed += 1;
            }
        }
    }

    info!(
        "Downloaded {} images ({} failed)",
        outcome.downloaded, outcome.failed
    );
    outcome
}

/// Downloads the site logo into `<public>/<images_dir>/`
///
/// Returns the public path of the stored logo (e.g. `/images/logo.svg`), or
/// None if the logo is not an absolute URL or the download failed.
pub async fn download_logo(
    fetcher: &Fetcher,
    scheduler: &mut Scheduler,
    logo: &str,
    public_dir: &Path,
    assets: &AssetConfig,
) -> Option<String> {
    let url = Url::parse(logo).ok()?;
    let filename = safe_segments(url.path())?.pop()?.to_string();

    let dir = public_dir.join(&assets.images_dir);
    if let Err(e) = tokio::fs::create_dir_all(&dir).await {
        warn!("Cannot create {}: {}", dir.display(), e);
        return None;
    }

    scheduler.wait().await;
    match fetcher.download_to(url.as_str(), &dir.join(&filename)).await {
        Ok(_) => {
            info!("Downloaded logo {}", url);
            Some(format!("/{}/{}", assets.images_dir.trim_matches('/'), filename))
        }
        Err(e) => {
            warn!("Failed to download logo {}: {}", url, e);
            None
        }
    }
}
