use std::path::{Component, Path, PathBuf};

use chrono::Datelike;
use serde::Serialize;
use serde_json::Value;

use crate::articles::Article;
use crate::frontmatter::{self, Metadata, ParseError};
use crate::markdown::render_markdown;

/// Template that receives the article index.
pub const HOME_TEMPLATE: &str = "home";
/// Template whose pages are listed on the home page.
pub const ARTICLE_TEMPLATE: &str = "article";

/// Metadata key overwritten with the build year on every page.
pub const YEAR_KEY: &str = "Year";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    pub title: String,
    pub template: String,
    pub path: String,
    pub meta: Metadata,
    /// Rendered markdown body. Trusted HTML, never escaped again.
    pub content: String,
}

impl Page {
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self, ParseError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ParseError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(path, &source)
    }

    /// Build a page from the raw text of a content file.
    pub fn parse(path: &Path, source: &str) -> Result<Self, ParseError> {
        let (front, body) = frontmatter::parse(path, source)?;

        // Only plain directory names, so output stays under the output root
        let relative = Path::new(front.path.trim_start_matches('/'));
        if !relative.components().all(|c| matches!(c, Component::Normal(_))) {
            return Err(ParseError::OutsideOutput {
                path: path.to_path_buf(),
                output: front.path,
            });
        }

        Ok(Page {
            title: front.title,
            template: front.template,
            path: front.path,
            meta: front.meta.unwrap_or_default(),
            content: render_markdown(body),
        })
    }

    pub fn inject_build_fields(&mut self, fields: &BuildFields) {
        self.meta.insert(YEAR_KEY.to_string(), Value::from(fields.year));
    }

    pub fn is_home(&self) -> bool {
        self.template == HOME_TEMPLATE
    }

    pub fn is_article(&self) -> bool {
        self.template == ARTICLE_TEMPLATE
    }

    /// Summary of this page for the home page listing, if it is an article.
    pub fn article(&self) -> Option<Article> {
        self.is_article().then(|| Article {
            path: self.path.clone(),
            title: self.title.clone(),
            meta: self.meta.clone(),
        })
    }

    /// Output file relative to the output root.
    pub fn out_path(&self) -> PathBuf {
        PathBuf::from(self.path.trim_start_matches('/')).join("index.html")
    }
}

/// Values stamped onto every page at build time rather than read from content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildFields {
    pub year: i32,
}

impl BuildFields {
    pub fn current() -> Self {
        Self {
            year: chrono::Local::now().year(),
        }
    }

    pub fn with_year(year: Option<i32>) -> Self {
        year.map_or_else(Self::current, |year| Self { year })
    }
}
