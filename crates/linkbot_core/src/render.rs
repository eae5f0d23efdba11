use crate::{normalize_title, Category, Link};

const EMPTY_SECTION: &str = " - No links yet\n";

/// How a rendered collection is handed to the transport. The document is the same.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Raw Markdown source, link previews suppressed.
    Markdown,
    /// Markdown formatting applied by the transport, link previews suppressed.
    Preview,
}

/// Render links grouped by category, one `## <category>` section per category
/// in declared order, links in first-seen order within each section.
pub fn render_markdown(links: &[Link]) -> String {
    let mut doc = String::new();
    for category in Category::ALL {
        doc.push_str("\n## ");
        doc.push_str(category.name());
        doc.push('\n');

        let mut any = false;
        for link in links.iter().filter(|link| link.category == Some(category)) {
            any = true;
            doc.push_str(&format!(
                "- [{}]({})\n",
                normalize_title(&link.title),
                link.url
            ));
        }
        if !any {
            doc.push_str(EMPTY_SECTION);
        }
    }
    doc
}

/// Split `text` into chunks of at most `max_len` bytes, preferring line breaks,
/// then spaces, and never cutting inside a UTF-8 sequence.
pub fn split_message(text: &str, max_len: usize) -> Vec<String> {
    if text.len() <= max_len {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut remaining = text;
    while !remaining.is_empty() {
        if remaining.len() <= max_len {
            chunks.push(remaining.to_string());
            break;
        }

        let mut end = max_len;
        while end > 0 && !remaining.is_char_boundary(end) {
            end -= 1;
        }
        let window = &remaining[..end];
        // A break at a separator consumes exactly that one character.
        let (split_at, separator_len) = match window
            .rfind('\n')
            .or_else(|| window.rfind(' '))
            .filter(|&idx| idx > 0)
        {
            Some(idx) => (idx, 1),
            None => (end, 0),
        };
        if split_at == 0 {
            // max_len smaller than the first character; emit it whole.
            let first = remaining.chars().next().map_or(1, char::len_utf8);
            chunks.push(remaining[..first].to_string());
            remaining = &remaining[first..];
            continue;
        }

        chunks.push(remaining[..split_at].to_string());
        remaining = &remaining[split_at + separator_len..];
    }
    chunks
}
