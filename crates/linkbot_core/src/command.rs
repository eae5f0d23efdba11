use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use crate::{Category, RenderMode};

static START_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^/start(?:@\w+)?(?:\s|$)").expect("valid start regex"));
static HELP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^/help(?:@\w+)?(?:\s|$)").expect("valid help regex"));
static NEW_COLLECTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"new collection (.+)").expect("valid collection regex"));
static URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)(?:https?://|www\.)[^\s<>"'`]+"#).expect("valid url regex")
});
static MARKDOWN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)generate markdown").expect("valid markdown regex"));
static PREVIEW_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)generate preview").expect("valid preview regex"));

/// What an inbound text message asks the bot to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    NewCollection(String),
    IngestUrl(String),
    Classify(Category),
    Render(RenderMode),
    Unrecognized,
}

impl Command {
    /// Short label for logs; never includes message content.
    pub fn kind(&self) -> &'static str {
        match self {
            Command::Start => "start",
            Command::Help => "help",
            Command::NewCollection(_) => "new_collection",
            Command::IngestUrl(_) => "ingest_url",
            Command::Classify(_) => "classify",
            Command::Render(RenderMode::Markdown) => "render_markdown",
            Command::Render(RenderMode::Preview) => "render_preview",
            Command::Unrecognized => "unrecognized",
        }
    }
}

/// Match a message against the handlers in precedence order; first match wins.
pub fn parse_command(text: &str) -> Command {
    let trimmed = text.trim();
    if START_RE.is_match(trimmed) {
        return Command::Start;
    }
    if HELP_RE.is_match(trimmed) {
        return Command::Help;
    }
    if let Some(name) = NEW_COLLECTION_RE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .filter(|name| !name.is_empty())
    {
        return Command::NewCollection(name.to_string());
    }
    if let Some(url) = extract_first_url(text) {
        return Command::IngestUrl(url);
    }
    if let Some(category) = Category::from_name(text) {
        return Command::Classify(category);
    }
    if MARKDOWN_RE.is_match(text) {
        return Command::Render(RenderMode::Markdown);
    }
    if PREVIEW_RE.is_match(text) {
        return Command::Render(RenderMode::Preview);
    }
    Command::Unrecognized
}

/// First http(s) or `www.` URL in `text`. Bare `www.` hosts get an `http://` scheme.
pub fn extract_first_url(text: &str) -> Option<String> {
    URL_RE.find_iter(text).find_map(|m| {
        let candidate = trim_trailing_punctuation(m.as_str());
        let candidate = if candidate
            .get(..4)
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case("www."))
        {
            format!("http://{candidate}")
        } else {
            candidate.to_string()
        };
        let parsed = Url::parse(&candidate).ok()?;
        parsed.host_str().filter(|host| !host.is_empty())?;
        Some(candidate)
    })
}

fn trim_trailing_punctuation(candidate: &str) -> &str {
    let mut end = candidate;
    loop {
        let Some(last) = end.chars().last() else {
            return end;
        };
        let strip = match last {
            '.' | ',' | '!' | '?' | ';' | ':' | ']' => true,
            ')' => end.matches('(').count() < end.matches(')').count(),
            _ => false,
        };
        if !strip {
            return end;
        }
        end = &end[..end.len() - last.len_utf8()];
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn start_and_help_accept_bot_suffix() {
        assert_eq!(parse_command("/start"), Command::Start);
        assert_eq!(parse_command("/start@linkbot"), Command::Start);
        assert_eq!(parse_command("/help"), Command::Help);
        assert_eq!(parse_command("/help@linkbot extra"), Command::Help);
        assert_eq!(parse_command("/starting"), Command::Unrecognized);
    }

    #[test]
    fn new_collection_takes_rest_of_line() {
        assert_eq!(
            parse_command("new collection Reading List"),
            Command::NewCollection("Reading List".to_string())
        );
        assert_eq!(
            parse_command("please new collection Weekly #12\nsecond line"),
            Command::NewCollection("Weekly #12".to_string())
        );
    }

    #[test]
    fn blank_collection_name_falls_through() {
        assert_eq!(parse_command("new collection    "), Command::Unrecognized);
    }

    #[test]
    fn new_collection_wins_over_url() {
        assert_eq!(
            parse_command("new collection https://example.com"),
            Command::NewCollection("https://example.com".to_string())
        );
    }

    #[test]
    fn first_url_is_selected() {
        assert_eq!(
            parse_command("check this https://example.com/a out https://example.com/b"),
            Command::IngestUrl("https://example.com/a".to_string())
        );
    }

    #[test]
    fn url_keeps_query_and_drops_sentence_punctuation() {
        assert_eq!(
            extract_first_url("see https://example.com/p?q=1&r=2."),
            Some("https://example.com/p?q=1&r=2".to_string())
        );
        assert_eq!(
            extract_first_url("(https://en.wikipedia.org/wiki/Rust_(programming_language))"),
            Some("https://en.wikipedia.org/wiki/Rust_(programming_language)".to_string())
        );
    }

    #[test]
    fn bare_www_gets_scheme() {
        assert_eq!(
            extract_first_url("go to www.example.org/x!"),
            Some("http://www.example.org/x".to_string())
        );
    }

    #[test]
    fn text_without_url_has_none() {
        assert_eq!(extract_first_url("nothing to see here"), None);
        assert_eq!(extract_first_url("https://"), None);
    }

    #[test]
    fn category_requires_exact_name() {
        assert_eq!(
            parse_command("Articles & News"),
            Command::Classify(Category::ArticlesAndNews)
        );
        assert_eq!(parse_command("articles & news"), Command::Unrecognized);
        assert_eq!(parse_command("Releases "), Command::Unrecognized);
        assert_eq!(parse_command(" Silly stuff"), Command::Unrecognized);
    }

    #[test]
    fn render_commands_are_case_insensitive() {
        assert_eq!(
            parse_command("Generate Markdown please"),
            Command::Render(RenderMode::Markdown)
        );
        assert_eq!(
            parse_command("GENERATE PREVIEW"),
            Command::Render(RenderMode::Preview)
        );
    }

    #[test]
    fn kind_labels_are_stable() {
        assert_eq!(Command::IngestUrl("x".into()).kind(), "ingest_url");
        assert_eq!(Command::Render(RenderMode::Preview).kind(), "render_preview");
    }
}
