//! Parsed pages and the parser that produces them.

use crate::discover::SourceFile;
use crate::frontmatter::{split_front_matter, FrontMatter};
use crate::kind::{normalize_path, PageKind, ParseStrategy};
use crate::{Error, Lookup};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A content entity: one parsed source file, or a virtual page contributed by
/// an extension.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    /// Path relative to the kind's source directory, extension stripped.
    pub identifier: String,
    pub front_matter: FrontMatter,
    /// Raw, un-rendered content.
    pub body: String,
    pub kind: Arc<PageKind>,
    /// Project-relative source path; `None` for virtual pages.
    pub source_path: Option<String>,
}

impl Page {
    /// A page with no backing file.
    pub fn virtual_page(
        kind: Arc<PageKind>,
        identifier: impl Into<String>,
        front_matter: FrontMatter,
        body: impl Into<String>,
    ) -> Self {
        Self {
            identifier: identifier.into().trim_matches('/').to_string(),
            front_matter,
            body: body.into(),
            kind,
            source_path: None,
        }
    }

    pub fn is_virtual(&self) -> bool {
        self.source_path.is_none()
    }

    pub fn route_key(&self) -> String {
        self.kind.route_key(&self.identifier)
    }

    pub fn output_path(&self) -> String {
        self.kind.output_path(&self.identifier)
    }

    /// Title from front matter, falling back to the last identifier segment
    /// with dashes and underscores turned into spaces and words capitalised.
    pub fn title(&self) -> String {
        if let Some(title) = self.front_matter.title() {
            return title.to_string();
        }
        let stem = self.identifier.rsplit('/').next().unwrap_or(&self.identifier);
        stem.split(['-', '_'])
            .filter(|w| !w.is_empty())
            .map(capitalize)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Key this page is stored under in the page index.
    pub fn index_key(&self) -> String {
        match &self.source_path {
            Some(path) => path.clone(),
            None => format!("virtual:{}", self.route_key()),
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Reads source files from a project root and turns them into [`Page`]s.
#[derive(Debug, Clone)]
pub struct PageParser {
    project_root: PathBuf,
}

impl PageParser {
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
        }
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Parse a discovered file.
    pub fn parse_file(&self, file: &SourceFile) -> Result<Page, Error> {
        let Some(kind) = &file.kind else {
            return Err(Error::not_found(Lookup::PageKind, file.path.clone()));
        };
        let path = normalize_path(&file.path);
        let identifier = kind
            .identifier_for(&path)
            .ok_or_else(|| Error::not_found(Lookup::PageKind, path.clone()))?;
        self.parse_at(Arc::clone(kind), identifier, path)
    }

    /// Parse a page on demand from its kind and identifier.
    pub fn parse_identifier(&self, kind: &Arc<PageKind>, identifier: &str) -> Result<Page, Error> {
        let identifier = normalize_path(identifier).trim_matches('/').to_string();
        let path = kind.source_path(&identifier);
        self.parse_at(Arc::clone(kind), identifier, path)
    }

    fn parse_at(&self, kind: Arc<PageKind>, identifier: String, path: String) -> Result<Page, Error> {
        // `_`-prefixed files are invisible however they are asked for.
        if is_hidden(&path) {
            return Err(Error::not_found(Lookup::SourceFile, path));
        }

        let full_path = self.project_root.join(&path);
        let content = fs::read_to_string(&full_path).map_err(|source| {
            if source.kind() == ErrorKind::NotFound {
                Error::not_found(Lookup::SourceFile, path.clone())
            } else {
                Error::Io {
                    path: PathBuf::from(&path),
                    source,
                }
            }
        })?;

        let (front_matter, body) = match kind.strategy {
            ParseStrategy::FrontMatter => split_front_matter(&content).map_err(|e| {
                let (start_line, end_line) = e.line_range();
                Error::MalformedMetadata {
                    path: PathBuf::from(&path),
                    start_line,
                    end_line,
                    message: e.to_string(),
                }
            })?,
            ParseStrategy::Raw => (FrontMatter::new(), content),
        };

        tracing::debug!(path = %path, identifier = %identifier, "Parsed page");

        Ok(Page {
            identifier,
            front_matter,
            body,
            kind,
            source_path: Some(path),
        })
    }
}

fn is_hidden(path: &str) -> bool {
    path.rsplit('/').next().is_some_and(|name| name.starts_with('_'))
}
