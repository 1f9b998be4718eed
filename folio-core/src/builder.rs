use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::articles::{Article, ArticleIndex};
use crate::assets::{CopyError, copy_dir};
use crate::config::BuildConfig;
use crate::frontmatter::ParseError;
use crate::lock::BuildLock;
use crate::scanner::scan_content;
use crate::site::{BuildFields, Page};
use crate::template::{RenderError, TemplateRenderer};

/// The fatal stages of a build, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Clean,
    CopyAssets,
    Discover,
    Render,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Clean => "clean",
            Stage::CopyAssets => "copy assets",
            Stage::Discover => "discover",
            Stage::Render => "render",
        };
        f.write_str(name)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("failed to prepare output directory {}", path.display())]
    Setup {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("another build holds {}", lock.display())]
    Busy { lock: PathBuf },
    #[error("failed to copy static directory")]
    AssetCopy(#[from] CopyError),
    #[error("failed to read content directory {}", path.display())]
    Discovery {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to render page")]
    Render(#[from] RenderError),
}

impl BuildError {
    pub fn stage(&self) -> Stage {
        match self {
            BuildError::Setup { .. } | BuildError::Busy { .. } => Stage::Clean,
            BuildError::AssetCopy(_) => Stage::CopyAssets,
            BuildError::Discovery { .. } => Stage::Discover,
            BuildError::Render(_) => Stage::Render,
        }
    }
}

/// Outcome of a successful build.
#[derive(Debug, Default)]
pub struct BuildReport {
    /// Rendered files, in render order
    pub generated: Vec<PathBuf>,
    /// Content files left out because they failed to parse
    pub skipped: Vec<ParseError>,
    pub articles: usize,
}

/// Collects parsed pages and their article projections for one build.
pub struct SiteBuilder {
    fields: BuildFields,
    pages: Vec<Page>,
    articles: Vec<Article>,
    skipped: Vec<ParseError>,
}

impl SiteBuilder {
    pub fn new(fields: BuildFields) -> Self {
        Self {
            fields,
            pages: Vec::new(),
            articles: Vec::new(),
            skipped: Vec::new(),
        }
    }

    pub fn add_page(mut self, mut page: Page) -> Self {
        page.inject_build_fields(&self.fields);
        if let Some(article) = page.article() {
            self.articles.push(article);
        }
        self.pages.push(page);
        self
    }

    /// Parse a content file and add it. A file that fails to parse is
    /// logged and left out of the site.
    pub fn add_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        match Page::read(path.as_ref()) {
            Ok(page) => self.add_page(page),
            Err(e) => {
                warn!(
                    error = &e as &dyn std::error::Error,
                    "Skipping Markdown file {}",
                    path.as_ref().display()
                );
                self.skipped.push(e);
                self
            }
        }
    }

    pub fn build(self) -> Site {
        Site {
            pages: self.pages,
            articles: ArticleIndex::new(self.articles),
            skipped: self.skipped,
        }
    }
}

/// Every page of a build plus the article index shared by home pages.
pub struct Site {
    pages: Vec<Page>,
    articles: ArticleIndex,
    skipped: Vec<ParseError>,
}

impl Site {
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn articles(&self) -> &ArticleIndex {
        &self.articles
    }

    pub fn skipped(&self) -> &[ParseError] {
        &self.skipped
    }

    /// Render pages in discovery order, stopping at the first failure.
    pub fn render_all(&self, renderer: &TemplateRenderer) -> Result<Vec<PathBuf>, RenderError> {
        let mut generated = Vec::with_capacity(self.pages.len());
        for page in &self.pages {
            let path = renderer.render_page(page, &self.articles)?;
            info!("Generated: {}", path.display());
            generated.push(path);
        }
        Ok(generated)
    }
}

/// Delete and recreate the output root.
pub fn clean_output_dir(output_dir: &Path) -> Result<(), BuildError> {
    let setup_err = |source: std::io::Error| BuildError::Setup {
        path: output_dir.to_path_buf(),
        source,
    };

    match std::fs::remove_dir_all(output_dir) {
        Err(e) if e.kind() != std::io::ErrorKind::NotFound => return Err(setup_err(e)),
        _ => {}
    }
    std::fs::create_dir_all(output_dir).map_err(setup_err)
}

/// Run one complete build.
///
/// Builds against the same output directory are serialized through a
/// lock file next to it; a second concurrent build fails with
/// [`BuildError::Busy`] before touching anything.
pub fn build_site(config: &BuildConfig) -> Result<BuildReport, BuildError> {
    let lock = BuildLock::acquire(&config.output_dir).map_err(|source| {
        if source.kind() == std::io::ErrorKind::WouldBlock {
            BuildError::Busy {
                lock: BuildLock::path_for(&config.output_dir),
            }
        } else {
            BuildError::Setup {
                path: config.output_dir.clone(),
                source,
            }
        }
    })?;

    info!("Building static site...");
    clean_output_dir(&config.output_dir)?;

    copy_dir(&config.static_dir, &config.output_dir)?;
    info!(
        "Static assets copied: {} -> {}",
        config.static_dir.display(),
        config.output_dir.display()
    );

    let files = scan_content(&config.content_dir).map_err(|source| BuildError::Discovery {
        path: config.content_dir.clone(),
        source,
    })?;

    let site = files
        .iter()
        .fold(SiteBuilder::new(BuildFields::with_year(config.year)), |builder, file| {
            builder.add_file(file)
        })
        .build();

    let renderer = TemplateRenderer::new(&config.templates_dir, &config.output_dir);
    let generated = site.render_all(&renderer)?;

    info!("Static site generation complete.");
    drop(lock);

    Ok(BuildReport {
        generated,
        articles: site.articles.len(),
        skipped: site.skipped,
    })
}
