pub mod articles;
pub mod assets;
pub mod builder;
pub mod config;
pub mod frontmatter;
pub mod lock;
pub mod markdown;
pub mod scanner;
pub mod site;
pub mod template;

// Re-export main types
pub use articles::{Article, ArticleIndex, HomePage};
pub use builder::{BuildError, BuildReport, Site, SiteBuilder, Stage, build_site};
pub use config::BuildConfig;
pub use frontmatter::{Metadata, ParseError};
pub use site::{BuildFields, Page};
pub use template::{RenderError, TemplateRenderer};
