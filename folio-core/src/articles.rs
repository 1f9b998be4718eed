use serde::Serialize;

use crate::frontmatter::Metadata;
use crate::site::Page;

/// An article as listed on the home page. Carries no body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Article {
    pub path: String,
    pub title: String,
    pub meta: Metadata,
}

/// Every article of a build, ordered by title.
///
/// Equal titles keep their discovery order and duplicates are kept.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ArticleIndex(Vec<Article>);

impl ArticleIndex {
    pub fn new(mut articles: Vec<Article>) -> Self {
        // sort_by is stable
        articles.sort_by(|a, b| a.title.cmp(&b.title));
        Self(articles)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Article> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a ArticleIndex {
    type Item = &'a Article;
    type IntoIter = std::slice::Iter<'a, Article>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Template data for the home page: the page's own fields plus `articles`.
#[derive(Debug, Serialize)]
pub struct HomePage<'a> {
    #[serde(flatten)]
    pub page: &'a Page,
    pub articles: &'a ArticleIndex,
}
