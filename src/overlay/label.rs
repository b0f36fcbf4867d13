//! Parsing helpers for the bracketed-tag label convention
//!
//! Labels look like `@Key[Ctrl+S]` or `@Click[Left]`: an optional `@<word>[`
//! prefix, the content, and a closing `]`. The prefix and the suffix are
//! stripped independently, so a label missing either half still yields
//! sensible content and never fails.

/// Tag used for keyboard labels
pub const KEY_TAG: &str = "Key";

/// Remove a leading `@<tag>[` (ASCII case-insensitive) and a trailing `]`.
pub fn strip_tag<'a>(label: &'a str, tag: &str) -> &'a str {
    let prefix_len = tag.len() + 2;
    let has_prefix = label
        .get(..prefix_len)
        .map(|head| {
            head.starts_with('@')
                && head.ends_with('[')
                && head[1..prefix_len - 1].eq_ignore_ascii_case(tag)
        })
        .unwrap_or(false);

    let rest = if has_prefix { &label[prefix_len..] } else { label };
    rest.strip_suffix(']').unwrap_or(rest)
}

/// Bare content of a keyboard label (`@Key[abc]` -> `abc`)
pub fn key_content(label: &str) -> &str {
    strip_tag(label, KEY_TAG)
}

/// Wrap bare keyboard content back into the tag convention
pub fn wrap_key(content: &str) -> String {
    format!("@{}[{}]", KEY_TAG, content)
}

/// First `[...]` group of a label, brackets included (`@Click[Left]` -> `[Left]`)
pub fn first_bracket_group(label: &str) -> Option<&str> {
    let open = label.find('[')?;
    let close = label[open + 1..].find(']')? + open + 1;
    Some(&label[open..=close])
}

/// Human-readable text for a label: drops a leading `@<word>[` and a trailing `]`.
///
/// `<word>` is one or more ASCII letters, digits or underscores. Labels that do
/// not follow the convention (system notices) are returned untouched.
pub fn display_label(label: &str) -> &str {
    let rest = label
        .strip_prefix('@')
        .and_then(|after_at| {
            let word_len = after_at
                .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                .unwrap_or(after_at.len());
            if word_len == 0 {
                return None;
            }
            after_at[word_len..].strip_prefix('[')
        })
        .unwrap_or(label);
    rest.strip_suffix(']').unwrap_or(rest)
}

/// Exactly one ASCII letter or digit
pub fn is_single_alphanumeric(content: &str) -> bool {
    let bytes = content.as_bytes();
    bytes.len() == 1 && bytes[0].is_ascii_alphanumeric()
}

/// Non-empty run of ASCII letters and digits (a typed word in progress)
pub fn is_alphanumeric_word(content: &str) -> bool {
    !content.is_empty() && content.bytes().all(|b| b.is_ascii_alphanumeric())
}
