//! The booted project: every index, built once and then only read.

use crate::config::{Config, ConfigError};
use crate::extension::{extension_by_name, BootContext, Extension, ExtensionRegistry};
use crate::index::{FileIndex, MediaSource, PageIndex};
use crate::kind::{normalize_path, PageKind, PageKindRegistry};
use crate::page::PageParser;
use crate::route::{Route, RouteIndex};
use crate::{Error, Lookup};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Errors gathered while booting that did not stop the boot.
#[derive(Debug, Default)]
pub struct BootReport {
    pub errors: Vec<Error>,
}

impl BootReport {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Collects kinds and extensions, then boots a [`Project`].
pub struct ProjectBuilder {
    root: PathBuf,
    kinds: Vec<PageKind>,
    media: Option<MediaSource>,
    output_dir: Option<String>,
    extensions: ExtensionRegistry,
}

impl ProjectBuilder {
    /// Builder with the default built-in kinds and no media directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            kinds: PageKind::builtins(),
            media: None,
            output_dir: None,
            extensions: ExtensionRegistry::new(),
        }
    }

    /// Builder for a loaded configuration: configured kinds, media, and the
    /// built-in extensions it enables.
    pub fn from_config(config: &Config) -> Result<Self, Error> {
        let mut builder = Self::new(config.project_root())
            .kinds(config.page_kinds())
            .media(config.media_source());
        if let Some(output_dir) = config.output_dir_in_project() {
            builder = builder.output_dir(output_dir);
        }
        for name in &config.extensions {
            let extension = extension_by_name(name)
                .ok_or_else(|| ConfigError::UnknownExtension(name.clone()))?;
            builder = builder.extension(extension);
        }
        Ok(builder)
    }

    /// Replace the built-in kinds (e.g. with configured directories).
    pub fn kinds(mut self, kinds: Vec<PageKind>) -> Self {
        self.kinds = kinds;
        self
    }

    pub fn media(mut self, media: MediaSource) -> Self {
        self.media = Some(media);
        self
    }

    /// Project-relative directory where rendered output lands; files under it
    /// are never indexed, even when a kind's source root is the project root.
    pub fn output_dir(mut self, dir: impl Into<String>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    pub fn extension(mut self, extension: Box<dyn Extension>) -> Self {
        self.extensions.register(extension);
        self
    }

    pub fn boot(self) -> Result<Project, Error> {
        let mut kinds = PageKindRegistry::new();
        for kind in self.kinds {
            kinds.register(kind);
        }
        self.extensions.register_page_kinds(&mut kinds);

        let mut project = Project {
            root: self.root,
            kinds,
            media: self.media,
            output_dir: self.output_dir,
            extensions: self.extensions,
            files: FileIndex::new(),
            pages: PageIndex::new(),
            routes: RouteIndex::new(),
            report: BootReport::default(),
        };
        project.rebuild()?;
        Ok(project)
    }
}

/// Explicit context holding the file, page and route indexes of one project.
///
/// Built once by [`ProjectBuilder::boot`] and passed by reference to whatever
/// renders, lists or syndicates routes. Nothing mutates it after boot except a
/// full [`Project::rebuild`].
#[derive(Debug)]
pub struct Project {
    root: PathBuf,
    kinds: PageKindRegistry,
    media: Option<MediaSource>,
    output_dir: Option<String>,
    extensions: ExtensionRegistry,
    files: FileIndex,
    pages: PageIndex,
    routes: RouteIndex,
    report: BootReport,
}

impl Project {
    pub fn builder(root: impl Into<PathBuf>) -> ProjectBuilder {
        ProjectBuilder::new(root)
    }

    /// Load-then-boot shortcut for a configuration.
    pub fn from_config(config: &Config) -> Result<Self, Error> {
        ProjectBuilder::from_config(config)?.boot()
    }

    /// Rebuild every index from disk.
    ///
    /// Parse failures are collected in [`Project::report`]. A failing
    /// extension hook aborts the rebuild and leaves the previous indexes in
    /// place.
    pub fn rebuild(&mut self) -> Result<(), Error> {
        tracing::info!("Booting project at {:?}", self.root);

        let mut files = FileIndex::build(&self.kinds, self.media.as_ref(), &self.root)?;
        if let Some(output_dir) = &self.output_dir {
            let excluded = files.exclude_directory(output_dir);
            if excluded > 0 {
                tracing::debug!(output_dir = %output_dir, excluded, "Ignored files under output directory");
            }
        }
        let parser = PageParser::new(&self.root);
        let (mut pages, errors) = PageIndex::build(&files, &self.kinds, &parser);

        let ctx = BootContext { kinds: &self.kinds };
        self.extensions.contribute_pages(&ctx, &mut pages)?;

        let mut routes = RouteIndex::from_pages(pages.in_insertion_order());
        self.extensions.contribute_routes(&ctx, &mut routes)?;

        for err in &errors {
            tracing::warn!("{}", err);
        }
        tracing::info!(
            files = files.len(),
            pages = pages.len(),
            routes = routes.len(),
            errors = errors.len(),
            "Project indexed"
        );

        self.files = files;
        self.pages = pages;
        self.routes = routes;
        self.report = BootReport { errors };
        Ok(())
    }

    /// Parse one source file and compute its route without touching the
    /// indexes, for "rebuild this page" workflows.
    pub fn resolve_source(&self, path: &str) -> Result<Route, Error> {
        let path = normalize_path(path);
        let kind = self
            .kinds
            .kind_for_path(&path)
            .ok_or_else(|| Error::not_found(Lookup::PageKind, path.clone()))?;
        let identifier = kind
            .identifier_for(&path)
            .ok_or_else(|| Error::not_found(Lookup::PageKind, path.clone()))?;
        let page = self.parser().parse_identifier(kind, &identifier)?;
        Ok(Route::new(Arc::new(page)))
    }

    pub fn output_dir(&self) -> Option<&str> {
        self.output_dir.as_deref()
    }

    pub fn parser(&self) -> PageParser {
        PageParser::new(&self.root)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn kinds(&self) -> &PageKindRegistry {
        &self.kinds
    }

    pub fn extensions(&self) -> &ExtensionRegistry {
        &self.extensions
    }

    pub fn files(&self) -> &FileIndex {
        &self.files
    }

    pub fn pages(&self) -> &PageIndex {
        &self.pages
    }

    pub fn routes(&self) -> &RouteIndex {
        &self.routes
    }

    pub fn report(&self) -> &BootReport {
        &self.report
    }
}
