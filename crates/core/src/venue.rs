//! Venue defaults.

/// Image shown for venues that have no uploaded image.
pub const DEFAULT_VENUE_IMAGE_URL: &str = "/images/default-placeholder.png";

/// Resolve the image URL to persist, falling back to the placeholder when
/// none (or a blank one) was supplied.
pub fn resolve_image_url(image_url: Option<&str>) -> String {
    match image_url.map(str::trim) {
        Some(url) if !url.is_empty() => url.to_string(),
        _ => DEFAULT_VENUE_IMAGE_URL.to_string(),
    }
}
