use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Locations and build-time overrides for a single site build.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct BuildConfig {
    /// Static assets, copied as-is into the output root
    pub static_dir: PathBuf,
    /// Holds `main.html` plus one `<template>.html` per page template
    pub templates_dir: PathBuf,
    /// Flat directory of markdown files with front matter
    pub content_dir: PathBuf,
    /// Deleted and recreated on every build
    pub output_dir: PathBuf,
    /// Fixed value for `meta.Year`. Uses the current year when unset.
    pub year: Option<i32>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            static_dir: PathBuf::from("web/static"),
            templates_dir: PathBuf::from("web/templates"),
            content_dir: PathBuf::from("web/content"),
            output_dir: PathBuf::from("_dist"),
            year: None,
        }
    }
}

impl BuildConfig {
    /// Lay out the conventional `static`, `templates` and `content`
    /// directories under `root`, writing into `output_dir`.
    pub fn rooted_at<P: Into<PathBuf>, O: Into<PathBuf>>(root: P, output_dir: O) -> Self {
        let root = root.into();
        Self {
            static_dir: root.join("static"),
            templates_dir: root.join("templates"),
            content_dir: root.join("content"),
            output_dir: output_dir.into(),
            year: None,
        }
    }

    pub fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }
}
