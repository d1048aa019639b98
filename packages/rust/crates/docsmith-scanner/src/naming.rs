//! File-name conventions: `NN-<prefix>--<type>-<name>.md`.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::config::NamingConventions;
use crate::extract::compile_regex;

static NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| compile_regex(r"^(\d+)(?:-(\d+))?-(.+)$"));
static KEYWORD_SPLIT_RE: LazyLock<Regex> = LazyLock::new(|| compile_regex(r"[-_]"));

/// Parsed parts of a document file name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DocFileName {
    /// Leading number, e.g. `2` for `02-1-…`.
    pub number: Option<u32>,
    /// Sub-number, e.g. `1` for `02-1-…`.
    pub sub_number: Option<u32>,
    /// Name without extension and without the number part.
    pub rest: String,
    /// Whether the project prefix appears in the name.
    pub has_prefix: bool,
    /// Doc-type marker found in the name.
    pub doc_type: Option<String>,
    /// Bare title after the number, prefix and doc type.
    pub title: String,
}

/// Strip a trailing `.md` (any case).
#[must_use]
pub fn file_stem(name: &str) -> &str {
    let cut = name.len().saturating_sub(3);
    if name.is_char_boundary(cut) && name[cut..].eq_ignore_ascii_case(".md") {
        &name[..cut]
    } else {
        name
    }
}

/// Split `NN[-M]-rest` into `(number, sub_number, rest)`.
///
/// Names without a leading number come back unchanged with `None`s.
#[must_use]
pub fn split_number(name: &str) -> (Option<u32>, Option<u32>, &str) {
    let Some(caps) = NUMBER_RE.captures(name) else {
        return (None, None, name);
    };
    let number = caps.get(1).and_then(|m| m.as_str().parse().ok());
    let Some(number) = number else {
        return (None, None, name);
    };
    let sub_number = caps.get(2).and_then(|m| m.as_str().parse().ok());
    let rest = caps.get(3).map_or(name, |m| m.as_str());
    (Some(number), sub_number, rest)
}

/// Strip `prefix` and the dashes that follow it.
fn strip_marker<'a>(text: &'a str, marker: &str) -> Option<&'a str> {
    if marker.is_empty() {
        return None;
    }
    text.strip_prefix(marker).map(|rest| rest.trim_start_matches('-'))
}

/// Parse a document file name against the naming conventions.
#[must_use]
pub fn parse_file_name(name: &str, conventions: &NamingConventions) -> DocFileName {
    let stem = file_stem(name);
    let (number, sub_number, rest) = split_number(stem);

    let doc_type = conventions.doc_type_of(stem).map(ToString::to_string);
    let has_prefix = !conventions.prefix.is_empty() && stem.contains(&conventions.prefix);

    let mut title = rest;
    if let Some(stripped) = strip_marker(title, &conventions.prefix) {
        title = stripped;
    }
    if let Some(stripped) = doc_type.as_deref().and_then(|dt| strip_marker(title, dt)) {
        title = stripped;
    }

    DocFileName {
        number,
        sub_number,
        rest: rest.to_string(),
        has_prefix,
        doc_type,
        title: title.to_string(),
    }
}

/// Keywords carried by a file name.
///
/// Removes the extension, number, project prefix, doc type and brand code,
/// splits on `-`/`_`, and drops stop words.
#[must_use]
pub fn keywords_from_file_name(name: &str, conventions: &NamingConventions) -> Vec<String> {
    let stem = file_stem(name);
    let mut core = split_number(stem).2;
    for marker in [conventions.prefix.as_str()]
        .into_iter()
        .chain(conventions.doc_types.iter().map(String::as_str))
        .chain([conventions.brand_code.as_str()])
    {
        if let Some(stripped) = strip_marker(core, marker) {
            core = stripped;
        }
    }

    KEYWORD_SPLIT_RE
        .split(core)
        .filter(|word| !word.is_empty())
        .filter(|word| !conventions.keyword_stop_words.iter().any(|stop| stop == word))
        .map(ToString::to_string)
        .collect()
}
