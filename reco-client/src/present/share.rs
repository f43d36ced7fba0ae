//! Share text and WhatsApp share links.

use crate::types::{non_blank, CitationResult};

/// Title used in share text when the citation has none.
pub const SHARE_UNTITLED: &str = "(Tanpa judul)";

/// Prefix of the prefilled WhatsApp share link.
pub const WHATSAPP_SHARE_PREFIX: &str = "https://wa.me/?text=";

/// `{title}{ (year)}{\n url}`
pub fn build_share_text(item: &CitationResult) -> String {
    let mut text = non_blank(item.title.as_deref())
        .unwrap_or(SHARE_UNTITLED)
        .to_owned();
    if let Some(year) = item.year_prefix() {
        text.push_str(&format!(" ({year})"));
    }
    if let Some(url) = non_blank(item.url.as_deref()) {
        text.push('\n');
        text.push_str(url);
    }
    text
}

/// WhatsApp link with `text` percent-encoded.
pub fn share_url(text: &str) -> String {
    format!("{WHATSAPP_SHARE_PREFIX}{}", urlencoding::encode(text))
}
