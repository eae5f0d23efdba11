use std::sync::LazyLock;

use linkbot_core::normalize_title;
use regex::Regex;
use scraper::{Html, Selector};

static TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<title[^>]*>(.+?)</title>").expect("valid title regex"));

/// Pulls a display title out of a page.
///
/// Implementations return the title entity-decoded, with newline, tab and
/// carriage-return runs collapsed and surrounding whitespace trimmed, or
/// `None` when the page has no usable title.
pub trait TitleExtractor: Send + Sync {
    fn extract_title(&self, html: &str) -> Option<String>;
}

/// First `<title>` match by regex.
///
/// Best effort only: it does not understand comments, scripts or CDATA, so a
/// `<title>` inside any of those can win. [`HtmlTitleExtractor`] is the
/// conformant alternative.
#[derive(Debug, Default, Clone, Copy)]
pub struct RegexTitleExtractor;

impl TitleExtractor for RegexTitleExtractor {
    fn extract_title(&self, html: &str) -> Option<String> {
        let raw = TITLE_RE.captures(html)?.get(1)?.as_str();
        clean_title(&decode_entities(raw))
    }
}

/// `<title>` lookup through a full HTML5 parse.
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlTitleExtractor;

impl TitleExtractor for HtmlTitleExtractor {
    fn extract_title(&self, html: &str) -> Option<String> {
        let doc = Html::parse_document(html);
        let selector = Selector::parse("title").ok()?;
        let raw: String = doc.select(&selector).next()?.text().collect();
        clean_title(&raw)
    }
}

/// Decode HTML character references (`&amp;`, `&#39;`, `&eacute;`, ...).
/// Anything tag-shaped is kept as literal text.
pub fn decode_entities(raw: &str) -> String {
    if !raw.contains('&') {
        return raw.to_string();
    }
    let escaped = raw.replace('<', "&lt;");
    let fragment = Html::parse_fragment(&escaped);
    fragment.root_element().text().collect()
}

fn clean_title(raw: &str) -> Option<String> {
    let title = normalize_title(raw).trim().to_string();
    (!title.is_empty()).then_some(title)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entities_are_decoded() {
        assert_eq!(decode_entities("Tom &amp; Jerry"), "Tom & Jerry");
        assert_eq!(decode_entities("it&#39;s &quot;fine&quot;"), "it's \"fine\"");
        assert_eq!(decode_entities("caf&eacute;"), "café");
        assert_eq!(decode_entities("no entities"), "no entities");
        assert_eq!(decode_entities("Option<T> &amp; <b>"), "Option<T> & <b>");
    }

    #[test]
    fn blank_title_is_none() {
        assert_eq!(clean_title(" \n\t "), None);
    }
}
