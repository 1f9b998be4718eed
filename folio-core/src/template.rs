use serde::Serialize;
use std::path::{Path, PathBuf};
use tera::{Context, Tera};

use crate::articles::{ArticleIndex, HomePage};
use crate::site::Page;

/// Shared layout every page template extends.
pub const LAYOUT: &str = "main.html";

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// The layout or page template is missing or does not parse.
    #[error("failed to load template `{template}`")]
    Template {
        template: String,
        source: tera::Error,
    },
    /// The template rejected the data it was given.
    #[error("failed to execute template for {}", path.display())]
    Execute { path: PathBuf, source: tera::Error },
    #[error("failed to write {}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Renders pages through `main.html` and their own `<template>.html`.
///
/// A page template extends the layout and fills its blocks:
///
/// ```text
/// {% extends "main.html" %}
/// {% block content %}{{ content | safe }}{% endblock %}
/// ```
///
/// Values are autoescaped, so `content` has to go through `safe`.
pub struct TemplateRenderer {
    templates_dir: PathBuf,
    output_dir: PathBuf,
}

impl TemplateRenderer {
    pub fn new<T: AsRef<Path>, O: AsRef<Path>>(templates_dir: T, output_dir: O) -> Self {
        Self {
            templates_dir: templates_dir.as_ref().to_path_buf(),
            output_dir: output_dir.as_ref().to_path_buf(),
        }
    }

    /// Load the layout and the named template into a fresh engine.
    fn load(&self, template: &str) -> Result<(Tera, String), RenderError> {
        let file_name = format!("{template}.html");
        let mut tera = Tera::default();
        tera.add_template_files(vec![
            (self.templates_dir.join(LAYOUT), Some(LAYOUT)),
            (self.templates_dir.join(&file_name), Some(file_name.as_str())),
        ])
        .map_err(|source| RenderError::Template {
            template: template.to_string(),
            source,
        })?;

        Ok((tera, file_name))
    }

    /// Render `data` with `template` into `<output>/<output_path>`.
    pub fn render_to_file<T: Serialize>(
        &self,
        output_path: &Path,
        template: &str,
        data: &T,
    ) -> Result<PathBuf, RenderError> {
        let (tera, file_name) = self.load(template)?;
        let execute_err = |source: tera::Error| RenderError::Execute {
            path: output_path.to_path_buf(),
            source,
        };

        let context = Context::from_serialize(data).map_err(execute_err)?;
        let rendered = tera.render(&file_name, &context).map_err(execute_err)?;

        let full_path = self.output_dir.join(output_path);
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| RenderError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        std::fs::write(&full_path, rendered).map_err(|source| RenderError::Write {
            path: full_path.clone(),
            source,
        })?;

        Ok(full_path)
    }

    /// Render a page. Home pages also receive the article index.
    pub fn render_page(&self, page: &Page, articles: &ArticleIndex) -> Result<PathBuf, RenderError> {
        let out_path = page.out_path();
        if page.is_home() {
            let home = HomePage { page, articles };
            self.render_to_file(&out_path, &page.template, &home)
        } else {
            self.render_to_file(&out_path, &page.template, page)
        }
    }
}
