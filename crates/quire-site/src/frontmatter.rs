//! YAML front matter.

use serde_json::{Map, Value};

const FENCE: &str = "---";

/// Parsed front matter of a page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrontMatter {
    /// `title` field, if a string.
    pub title: Option<String>,
    /// `description` field, if a string.
    pub description: Option<String>,
    /// Every field, as written.
    pub fields: Map<String, Value>,
}

/// Front matter that could not be parsed.
#[derive(Debug, thiserror::Error)]
pub enum FrontMatterError {
    /// Malformed YAML.
    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    /// YAML that is not a mapping.
    #[error("front matter must be a mapping")]
    NotAMapping,
}

/// Split a leading `---` fenced YAML block off `content`.
///
/// Returns default front matter and the whole content when there is no
/// block or it is never closed.
///
/// # Errors
///
/// Returns an error if the block is not a valid YAML mapping.
pub fn split(content: &str) -> Result<(FrontMatter, &str), FrontMatterError> {
    let Some((yaml, body)) = fenced_block(content) else {
        return Ok((FrontMatter::default(), content));
    };

    if yaml.trim().is_empty() {
        return Ok((FrontMatter::default(), body));
    }
    let fields = match serde_yaml::from_str::<Value>(yaml)? {
        Value::Null => Map::new(),
        Value::Object(map) => map,
        _ => return Err(FrontMatterError::NotAMapping),
    };
    let string_field = |key: &str| fields.get(key).and_then(Value::as_str).map(str::to_owned);

    let front_matter = FrontMatter {
        title: string_field("title"),
        description: string_field("description"),
        fields,
    };
    Ok((front_matter, body))
}

/// Locate the YAML text and the remaining body.
fn fenced_block(content: &str) -> Option<(&str, &str)> {
    let rest = content.strip_prefix('\u{feff}').unwrap_or(content);
    let first_line_end = rest.find('\n')?;
    if rest[..first_line_end].trim_end() != FENCE {
        return None;
    }
    let yaml_start = first_line_end + 1;

    let mut offset = yaml_start;
    for line in rest[yaml_start..].split_inclusive('\n') {
        if line.trim_end() == FENCE {
            return Some((&rest[yaml_start..offset], &rest[offset + line.len()..]));
        }
        offset += line.len();
    }
    None
}
