use std::sync::LazyLock;

use bot_logging::bot_warn;
use chardetng::EncodingDetector;
use encoding_rs::Encoding;
use regex::Regex;

/// How far into the document a `<meta charset>` declaration is looked for.
const META_SNIFF_BYTES: usize = 1024;

static META_CHARSET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]+charset\s*=\s*["']?([a-z0-9_\-:.]+)"#)
        .expect("valid meta charset regex")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedBody {
    pub text: String,
    pub encoding_label: String,
    /// Malformed sequences were replaced with U+FFFD.
    pub lossy: bool,
}

/// Decode raw bytes into UTF-8 using: BOM -> Content-Type charset -> meta charset -> chardetng.
///
/// Malformed input never fails; a page title is still useful with a few
/// replacement characters in the body.
pub fn decode_body(bytes: &[u8], content_type: Option<&str>) -> DecodedBody {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return decode_with(bytes, encoding);
    }

    if let Some(enc) = content_type
        .and_then(header_charset)
        .and_then(|label| Encoding::for_label(label.as_bytes()))
    {
        return decode_with(bytes, enc);
    }

    if let Some(enc) = meta_charset(bytes).and_then(|label| Encoding::for_label(label.as_bytes())) {
        return decode_with(bytes, enc);
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    let enc = detector.guess(None, true);
    decode_with(bytes, enc)
}

fn header_charset(content_type: &str) -> Option<String> {
    content_type
        .split(';')
        .filter_map(|part| {
            let (key, value) = part.split_once('=')?;
            key.trim()
                .eq_ignore_ascii_case("charset")
                .then(|| value.trim().trim_matches(['"', '\'']).to_string())
        })
        .find(|label| !label.is_empty())
}

fn meta_charset(bytes: &[u8]) -> Option<String> {
    let head = &bytes[..bytes.len().min(META_SNIFF_BYTES)];
    let head = String::from_utf8_lossy(head);
    META_CHARSET_RE
        .captures(&head)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

fn decode_with(bytes: &[u8], enc: &'static Encoding) -> DecodedBody {
    let (text, used, had_errors) = enc.decode(bytes);
    if had_errors {
        bot_warn!("body had invalid {} sequences; decoded lossily", used.name());
    }
    DecodedBody {
        text: text.into_owned(),
        encoding_label: used.name().to_string(),
        lossy: had_errors,
    }
}
