//! Storage key namespaces for derived assets.
//!
//! Every derived object lives in a namespace selected by the first path segment,
//! so it can be computed from its source key without any index:
//!
//! - **Source**: any key outside the namespaces below, e.g. `photos/cat.jpg`
//! - **Optimized**: `optimized/{source}`
//! - **Optimized + transformed**: `optimized-transformed/{source}/{transformation}`
//! - **Document preview**: `preview/{source}/{page}`
//!
//! The trailing `{transformation}` and `{page}` parts are always exactly one path
//! segment. Listing `optimized-transformed/{source}/` therefore yields the full
//! variant set of one source.

use serde::{Deserialize, Serialize};

pub const OPTIMIZED_IMAGE_PREFIX: &str = "optimized/";
pub const OPTIMIZED_TRANSFORMED_IMAGE_PREFIX: &str = "optimized-transformed/";
pub const DOCUMENT_PREVIEW_PREFIX: &str = "preview/";

/// Image extensions that get an optimized rendition.
pub const SUPPORTED_IMAGES: &[&str] = &["jpg", "jpeg", "png", "gif", "svg", "webp"];

/// Image extensions the transformation pipeline produces variants for.
pub const SUPPORTED_TRANSFORMABLE_IMAGES: &[&str] = &["jpg", "jpeg", "webp"];

/// Document extensions that get page previews.
pub const SUPPORTED_DOCUMENTS: &[&str] = &["pdf"];

pub fn is_supported_image(extension: &str) -> bool {
    SUPPORTED_IMAGES.contains(&extension)
}

pub fn is_transformable_image(extension: &str) -> bool {
    SUPPORTED_TRANSFORMABLE_IMAGES.contains(&extension)
}

pub fn is_supported_document(extension: &str) -> bool {
    SUPPORTED_DOCUMENTS.contains(&extension)
}

/// Reject keys that are empty, absolute or contain parent-directory segments.
pub fn validate_key(key: &str) -> Result<(), String> {
    if key.trim().is_empty() {
        return Err("key is empty".to_string());
    }
    if key.starts_with('/') {
        return Err(format!("key must not start with '/': {}", key));
    }
    if key.split('/').any(|segment| segment == "..") {
        return Err(format!("key must not contain '..' segments: {}", key));
    }
    Ok(())
}

/// Resolve the source key a (possibly derived) key was computed from.
///
/// Keys outside the derived namespaces are returned unchanged.
pub fn source_key(key: &str) -> &str {
    if let Some(rest) = key.strip_prefix(OPTIMIZED_TRANSFORMED_IMAGE_PREFIX) {
        return strip_last_segment(rest);
    }
    if let Some(rest) = key.strip_prefix(DOCUMENT_PREVIEW_PREFIX) {
        return strip_last_segment(rest);
    }
    if let Some(rest) = key.strip_prefix(OPTIMIZED_IMAGE_PREFIX) {
        return rest;
    }
    key
}

fn strip_last_segment(rest: &str) -> &str {
    let rest = rest.trim_end_matches('/');
    match rest.rsplit_once('/') {
        Some((source, _)) => source,
        None => rest,
    }
}

/// Lowercase file-type suffix of the source behind `key`, without the dot.
///
/// Derived keys resolve to their source first, so `optimized-transformed/a.JPG/w-300`
/// yields `jpg`. Dotfiles such as `.env` and names ending in a dot have no extension.
pub fn extension(key: &str) -> Option<String> {
    let source = source_key(key);
    let filename = source.rsplit('/').next().unwrap_or(source);
    let (stem, ext) = filename.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// Transformations applied by the image pipeline when it renders a variant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageTransformations {
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl ImageTransformations {
    pub fn width(width: u32) -> Self {
        Self {
            width: Some(width),
            height: None,
        }
    }

    pub fn resize(width: u32, height: u32) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width.is_none() && self.height.is_none()
    }

    /// Single path segment naming this variant, e.g. `w-300_h-200`.
    pub fn segment(&self) -> Option<String> {
        let parts: Vec<String> = [
            self.width.map(|w| format!("w-{}", w)),
            self.height.map(|h| format!("h-{}", h)),
        ]
        .into_iter()
        .flatten()
        .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.join("_"))
        }
    }
}

/// Key of the optimized rendition of `key`, or of one of its transformed variants.
pub fn image_key(key: &str, transformations: Option<&ImageTransformations>) -> String {
    let source = source_key(key);
    match transformations.and_then(ImageTransformations::segment) {
        Some(segment) => format!(
            "{}{}/{}",
            OPTIMIZED_TRANSFORMED_IMAGE_PREFIX, source, segment
        ),
        None => format!("{}{}", OPTIMIZED_IMAGE_PREFIX, source),
    }
}

/// Prefix shared by every transformed variant of `key`.
pub fn optimized_transformed_image_key_prefix(key: &str) -> String {
    format!("{}{}/", OPTIMIZED_TRANSFORMED_IMAGE_PREFIX, source_key(key))
}

/// Prefix shared by every page preview of the document behind `key`.
pub fn document_preview_key_prefix(key: &str) -> String {
    format!("{}{}/", DOCUMENT_PREVIEW_PREFIX, source_key(key))
}

pub fn document_preview_key(key: &str, page: u32) -> String {
    format!("{}page-{}", document_preview_key_prefix(key), page)
}
