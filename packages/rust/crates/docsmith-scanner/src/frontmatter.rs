//! YAML frontmatter parsing.
//!
//! A frontmatter block must open on the first line of the document. The
//! standard `**@file**` header shares the `---` fences but is not YAML, so it
//! is rejected here and picked up by `extract::extract_header` instead.

/// Raw text between the opening and closing `---` fences.
#[must_use]
pub fn frontmatter_block(content: &str) -> Option<&str> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let after_open = content
        .strip_prefix("---\r\n")
        .or_else(|| content.strip_prefix("---\n"))?;

    let mut offset = 0;
    for line in after_open.split_inclusive('\n') {
        if line.trim_end() == "---" {
            return Some(&after_open[..offset]);
        }
        offset += line.len();
    }
    None
}

/// Parse the frontmatter block as a YAML mapping.
///
/// Returns `None` when there is no block, it is not valid YAML, or it is not
/// a mapping.
#[must_use]
pub fn extract_frontmatter(content: &str) -> Option<serde_yaml::Value> {
    let block = frontmatter_block(content)?;
    match serde_yaml::from_str::<serde_yaml::Value>(block) {
        Ok(value @ serde_yaml::Value::Mapping(_)) => Some(value),
        Ok(_) => None,
        Err(e) => {
            log::debug!("Ignoring non-YAML frontmatter: {e}");
            None
        }
    }
}

/// String field of a frontmatter mapping.
#[must_use]
pub fn frontmatter_str<'a>(frontmatter: &'a serde_yaml::Value, key: &str) -> Option<&'a str> {
    frontmatter.get(key).and_then(serde_yaml::Value::as_str)
}
