//! Value checking and cleaning helpers
//!
//! Attribute values arrive from heterogeneous sources (CSV exports, database
//! dumps, OSM extracts) and carry artifacts that would corrupt the resulting
//! triples: placeholder null strings, stray quotes and newlines, malformed
//! URLs, whitespace inside identifier fragments.

use once_cell::sync::Lazy;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use regex::Regex;

/// Characters percent-encoded in URI fragments: everything but ASCII
/// alphanumerics and the unreserved `-`, `_`, `.`, `~`, `*`
const FRAGMENT_ESCAPE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'*');

/// Test whether an attribute value is worth emitting
///
/// A value is considered empty when it is absent, the empty string, or
/// contains the placeholder substring `"Null"`. The substring check is
/// intentional data-cleaning policy: exported datasets routinely carry
/// `"Null"`, `"NullValue"` and similar markers in place of missing data.
pub fn is_empty_value(value: Option<&str>) -> bool {
    match value {
        None => true,
        Some(v) => v.is_empty() || v.contains("Null"),
    }
}

/// Replace every whitespace character with an underscore
///
/// Applied to minted URI fragments, which must never contain whitespace.
pub fn replace_whitespace(value: &str) -> String {
    value
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect()
}

/// Percent-encode a string for use as a URI fragment
///
/// Unreserved characters pass through, so identifiers like UUIDs and
/// underscore-separated attribute keys keep their spelling.
pub fn encode_fragment(value: &str) -> String {
    utf8_percent_encode(value, FRAGMENT_ESCAPE).to_string()
}

/// Strip characters that are not allowed in literal values
///
/// Newlines and tabs become single spaces; double quotes and backslashes are
/// removed; the result is trimmed.
pub fn scrub_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\n' | '\r' | '\t' => out.push(' '),
            '"' | '\\' => {}
            _ => out.push(c),
        }
    }
    out.trim().to_string()
}

/// Repair a malformed URL value
///
/// Trims surrounding whitespace, percent-encodes interior whitespace, and
/// prepends `http://` when no scheme is present.
pub fn cleanup_url(value: &str) -> String {
    static SCHEME_RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.-]*://").expect("valid regex"));

    let trimmed = value.trim();
    let mut url = String::with_capacity(trimmed.len());
    for c in trimmed.chars() {
        if c.is_whitespace() {
            url.push_str("%20");
        } else {
            url.push(c);
        }
    }

    if SCHEME_RE.is_match(&url) {
        url
    } else {
        format!("http://{url}")
    }
}

/// ISO 639-1 two-letter language codes
const ISO_639_1: &[&str] = &[
    "aa", "ab", "ae", "af", "ak", "am", "an", "ar", "as", "av", "ay", "az", "ba", "be", "bg", "bh",
    "bi", "bm", "bn", "bo", "br", "bs", "ca", "ce", "ch", "co", "cr", "cs", "cu", "cv", "cy", "da",
    "de", "dv", "dz", "ee", "el", "en", "eo", "es", "et", "eu", "fa", "ff", "fi", "fj", "fo", "fr",
    "fy", "ga", "gd", "gl", "gn", "gu", "gv", "ha", "he", "hi", "ho", "hr", "ht", "hu", "hy", "hz",
    "ia", "id", "ie", "ig", "ii", "ik", "io", "is", "it", "iu", "ja", "jv", "ka", "kg", "ki", "kj",
    "kk", "kl", "km", "kn", "ko", "kr", "ks", "ku", "kv", "kw", "ky", "la", "lb", "lg", "li", "ln",
    "lo", "lt", "lu", "lv", "mg", "mh", "mi", "mk", "ml", "mn", "mr", "ms", "mt", "my", "na", "nb",
    "nd", "ne", "ng", "nl", "nn", "no", "nr", "nv", "ny", "oc", "oj", "om", "or", "os", "pa", "pi",
    "pl", "ps", "pt", "qu", "rm", "rn", "ro", "ru", "rw", "sa", "sc", "sd", "se", "sg", "si", "sk",
    "sl", "sm", "sn", "so", "sq", "sr", "ss", "st", "su", "sv", "sw", "ta", "te", "tg", "th", "ti",
    "tk", "tl", "tn", "to", "tr", "ts", "tt", "tw", "ty", "ug", "uk", "ur", "uz", "ve", "vi", "vo",
    "wa", "wo", "xh", "yi", "yo", "za", "zh", "zu",
];

/// Check whether a tag is a valid ISO 639-1 language code
pub fn is_valid_iso_language(tag: &str) -> bool {
    tag.len() == 2 && ISO_639_1.binary_search(&tag).is_ok()
}
