use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer};

/// Open-ended, author-supplied page data.
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// Separates the YAML block from the markdown body.
pub const DELIMITER: &str = "---";

/// Per-file parse failure. These never abort a build.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("failed to read {}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid front matter format in {}", path.display())]
    MalformedContent { path: PathBuf },
    #[error("failed to decode front matter in {}", path.display())]
    FrontMatter {
        path: PathBuf,
        source: serde_yaml::Error,
    },
    #[error("output path `{output}` in {} leaves the output directory", path.display())]
    OutsideOutput { path: PathBuf, output: String },
}

impl ParseError {
    pub fn path(&self) -> &Path {
        match self {
            ParseError::Read { path, .. }
            | ParseError::MalformedContent { path }
            | ParseError::FrontMatter { path, .. }
            | ParseError::OutsideOutput { path, .. } => path,
        }
    }
}

/// The YAML header of a content file. Unknown keys are ignored and
/// missing keys stay empty.
#[derive(Deserialize, Debug, Default, PartialEq)]
#[serde(default)]
pub struct FrontMatter {
    #[serde(deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub template: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub path: String,
    pub meta: Option<Metadata>,
}

// `path:` with no value is YAML null
fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Split `source` into its front matter and body regions.
///
/// Anything before the first delimiter is discarded. Returns `None`
/// when there are fewer than two delimiters.
pub fn split(source: &str) -> Option<(&str, &str)> {
    let mut regions = source.splitn(3, DELIMITER);
    regions.next()?;
    let front = regions.next()?;
    let body = regions.next()?;
    Some((front, body))
}

/// Split and decode a content file. `path` is only used for error reporting.
pub fn parse<'a>(path: &Path, source: &'a str) -> Result<(FrontMatter, &'a str), ParseError> {
    let (front, body) = split(source).ok_or_else(|| ParseError::MalformedContent {
        path: path.to_path_buf(),
    })?;

    // An empty YAML document decodes to nothing at all
    if front.trim().is_empty() {
        return Ok((FrontMatter::default(), body));
    }

    let front_matter =
        serde_yaml::from_str(front).map_err(|source| ParseError::FrontMatter {
            path: path.to_path_buf(),
            source,
        })?;

    Ok((front_matter, body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn splits_into_front_matter_and_body() {
        let (front, body) = split("---\ntitle: Hi\n---\n# Body\n").unwrap();
        assert_eq!(front, "\ntitle: Hi\n");
        assert_eq!(body, "\n# Body\n");
    }

    #[test]
    fn body_keeps_later_delimiters() {
        let (_, body) = split("---\ntitle: Hi\n---\nabove\n\n---\n\nbelow\n").unwrap();
        assert_eq!(body, "\nabove\n\n---\n\nbelow\n");
    }

    #[test]
    fn missing_delimiter_is_malformed() {
        let err = parse(Path::new("a.md"), "title: nope\n# Body").unwrap_err();
        assert!(matches!(err, ParseError::MalformedContent { .. }));
        assert_eq!(err.path(), Path::new("a.md"));
        assert!(err.to_string().contains("a.md"));

        let err = parse(Path::new("b.md"), "---\ntitle: only one\n").unwrap_err();
        assert!(matches!(err, ParseError::MalformedContent { .. }));
    }

    #[test]
    fn decodes_known_fields_and_ignores_unknown() {
        let source = "---\ntitle: Hello\ntemplate: article\npath: hello\nauthor: someone\nmeta:\n  tags: [a, b]\n  draft: false\n---\n# Hi\n";
        let (front, body) = parse(Path::new("hello.md"), source).unwrap();

        assert_eq!(front.title, "Hello");
        assert_eq!(front.template, "article");
        assert_eq!(front.path, "hello");
        let meta = front.meta.unwrap();
        assert_eq!(meta["tags"], json!(["a", "b"]));
        assert_eq!(meta["draft"], json!(false));
        assert_eq!(body, "\n# Hi\n");
    }

    #[test]
    fn missing_fields_are_empty() {
        let (front, _) = parse(Path::new("x.md"), "---\ntitle: Only\n---\nbody").unwrap();
        assert_eq!(front.template, "");
        assert_eq!(front.path, "");
        assert_eq!(front.meta, None);
    }

    #[test]
    fn null_fields_are_empty() {
        let (front, _) = parse(Path::new("x.md"), "---\ntitle: Home\npath:\ntemplate: home\n---\n").unwrap();
        assert_eq!(front.path, "");
        assert_eq!(front.template, "home");
    }

    #[test]
    fn null_meta_is_none() {
        let (front, _) = parse(Path::new("x.md"), "---\ntitle: T\nmeta:\n---\nbody").unwrap();
        assert_eq!(front.meta, None);
    }

    #[test]
    fn empty_front_matter_is_default() {
        let (front, body) = parse(Path::new("x.md"), "------\nbody").unwrap();
        assert_eq!(front, FrontMatter::default());
        assert_eq!(body, "\nbody");
    }

    #[test]
    fn invalid_yaml_is_front_matter_error() {
        let err = parse(Path::new("bad.md"), "---\ntitle: [unclosed\n---\nbody").unwrap_err();
        assert!(matches!(err, ParseError::FrontMatter { .. }));
        assert!(err.to_string().contains("bad.md"));
    }
}
