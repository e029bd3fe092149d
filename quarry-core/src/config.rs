//! Configuration parsing and management.

use crate::index::MediaSource;
use crate::kind::{KindTag, PageKind};
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    ParseError(#[from] serde_yaml::Error),

    #[error("Unknown extension '{0}'")]
    UnknownExtension(String),
}

/// Main configuration struct matching the quarry.yml schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_source_root")]
    pub source_root: PathBuf,

    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    #[serde(default)]
    pub pretty_urls: bool,

    #[serde(default)]
    pub kinds: KindsConfig,

    #[serde(default)]
    pub media: MediaConfig,

    #[serde(default)]
    pub extensions: Vec<String>,

    // Internal: path to config file (for relative path resolution)
    #[serde(skip)]
    config_path: Option<PathBuf>,
}

fn default_source_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("_site")
}

/// Source/output directory overrides for the built-in kinds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KindsConfig {
    #[serde(default = "default_pages")]
    pub pages: DirectoryPair,

    #[serde(default = "default_posts")]
    pub posts: DirectoryPair,

    #[serde(default = "default_docs")]
    pub docs: DirectoryPair,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryPair {
    pub source: String,

    #[serde(default)]
    pub output: String,
}

impl DirectoryPair {
    fn new(source: &str, output: &str) -> Self {
        Self {
            source: source.to_string(),
            output: output.to_string(),
        }
    }
}

fn default_pages() -> DirectoryPair {
    DirectoryPair::new("_pages", "")
}

fn default_posts() -> DirectoryPair {
    DirectoryPair::new("_posts", "posts")
}

fn default_docs() -> DirectoryPair {
    DirectoryPair::new("_docs", "docs")
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaConfig {
    #[serde(default = "default_media_dir")]
    pub directory: String,

    #[serde(default = "default_media_extensions")]
    pub extensions: Vec<String>,
}

fn default_media_dir() -> String {
    String::from("_media")
}

fn default_media_extensions() -> Vec<String> {
    ["png", "svg", "jpg", "jpeg", "webp", "gif", "ico", "css", "js"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let mut config = Self::from_yaml(&contents)?;

        // Store config file path for relative path resolution
        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    /// Load the file if it exists, otherwise fall back to defaults rooted at
    /// the directory the file would have lived in.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            return Self::from_file(path);
        }
        tracing::debug!("No config at {:?}; using defaults", path);
        Ok(Self {
            config_path: Some(path.to_path_buf()),
            ..Self::default()
        })
    }

    pub fn from_yaml(contents: &str) -> Result<Self, ConfigError> {
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(contents)?)
    }

    /// Project root, resolved relative to config file
    pub fn project_root(&self) -> PathBuf {
        self.resolve_path(&self.source_root)
    }

    /// Output directory, resolved relative to config file
    pub fn output_dir(&self) -> PathBuf {
        self.resolve_path(&self.output_dir)
    }

    /// Output directory relative to the project root, when it lies inside it.
    pub fn output_dir_in_project(&self) -> Option<String> {
        let root = lexical(&self.project_root());
        let output = lexical(&self.output_dir());
        let rel = output.strip_prefix(&root).ok()?;
        let rel = rel.to_str()?.replace('\\', "/");
        (!rel.is_empty()).then_some(rel)
    }

    /// Built-in page kinds with configured directories applied, in
    /// registration order.
    pub fn page_kinds(&self) -> Vec<PageKind> {
        PageKind::builtins()
            .into_iter()
            .map(|kind| {
                let dirs = match kind.tag {
                    KindTag::MarkdownPost => &self.kinds.posts,
                    KindTag::DocumentationPage => &self.kinds.docs,
                    _ => &self.kinds.pages,
                };
                kind.with_source_directory(&dirs.source)
                    .with_output_directory(&dirs.output)
            })
            .collect()
    }

    pub fn media_source(&self) -> MediaSource {
        MediaSource {
            directory: self.media.directory.clone(),
            extensions: self.media.extensions.clone(),
        }
    }

    /// Resolve a path relative to the config file location
    fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else if let Some(config_path) = &self.config_path {
            match config_path.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent.join(path),
                _ => path.to_path_buf(),
            }
        } else {
            path.to_path_buf()
        }
    }

    /// Get a nested config value using dotted path (e.g., "kinds.posts.output")
    pub fn get(&self, key: &str) -> Option<String> {
        let parts: Vec<&str> = key.split('.').collect();
        let dirs = |name: &str| match name {
            "pages" => Some(&self.kinds.pages),
            "posts" => Some(&self.kinds.posts),
            "docs" => Some(&self.kinds.docs),
            _ => None,
        };
        match parts.as_slice() {
            ["source_root"] => Some(self.source_root.display().to_string()),
            ["output_dir"] => Some(self.output_dir.display().to_string()),
            ["pretty_urls"] => Some(self.pretty_urls.to_string()),
            ["media", "directory"] => Some(self.media.directory.clone()),
            ["media", "extensions"] => Some(self.media.extensions.join(",")),
            ["extensions"] => Some(self.extensions.join(",")),
            ["kinds", kind, "source"] => dirs(*kind).map(|d| d.source.clone()),
            ["kinds", kind, "output"] => dirs(*kind).map(|d| d.output.clone()),
            _ => None,
        }
    }
}

fn lexical(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_root: default_source_root(),
            output_dir: default_output_dir(),
            pretty_urls: false,
            kinds: KindsConfig::default(),
            media: MediaConfig::default(),
            extensions: Vec::new(),
            config_path: None,
        }
    }
}

impl Default for KindsConfig {
    fn default() -> Self {
        Self {
            pages: default_pages(),
            posts: default_posts(),
            docs: default_docs(),
        }
    }
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            directory: default_media_dir(),
            extensions: default_media_extensions(),
        }
    }
}
