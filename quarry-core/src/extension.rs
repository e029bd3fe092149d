//! Extensions: third-party page kinds, virtual pages and routes.
//!
//! Hooks run at fixed points of [`Project`](crate::Project) boot:
//!
//! 1. [`Extension::page_kinds`] after the built-in kinds are registered
//! 2. [`Extension::contribute_pages`] after every discovered file is parsed
//! 3. [`Extension::contribute_routes`] after a route exists for every page
//!
//! Each hook runs for all extensions in registration order, which makes the
//! last registered extension the winner of any route key collision.

use crate::frontmatter::FrontMatter;
use crate::index::PageIndex;
use crate::kind::{KindTag, PageKind, PageKindRegistry};
use crate::page::Page;
use crate::route::{Route, RouteIndex};
use crate::{Error, Lookup};
use std::sync::Arc;

/// What an extension hook can see of the project being booted.
#[derive(Debug, Clone, Copy)]
pub struct BootContext<'a> {
    pub kinds: &'a PageKindRegistry,
}

impl<'a> BootContext<'a> {
    /// Registered kind for a tag, or `NotFound`.
    pub fn kind(&self, tag: &KindTag) -> Result<Arc<PageKind>, Error> {
        self.kinds
            .get(tag)
            .cloned()
            .ok_or_else(|| Error::not_found(Lookup::PageKind, tag.as_str()))
    }
}

/// A contributor of page kinds, virtual pages and routes.
pub trait Extension: Send + Sync {
    /// Name used in logs, errors and configuration.
    fn name(&self) -> &str;

    /// Additional kinds, appended after the built-ins.
    fn page_kinds(&self) -> Vec<PageKind> {
        Vec::new()
    }

    /// Insert pages with no backing file.
    fn contribute_pages(&self, _ctx: &BootContext<'_>, _pages: &mut PageIndex) -> Result<(), Error> {
        Ok(())
    }

    /// Add or replace routes once every page has one.
    fn contribute_routes(&self, _ctx: &BootContext<'_>, _routes: &mut RouteIndex) -> Result<(), Error> {
        Ok(())
    }
}

/// Extensions in registration order.
#[derive(Default)]
pub struct ExtensionRegistry {
    extensions: Vec<Box<dyn Extension>>,
}

impl std::fmt::Debug for ExtensionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

impl ExtensionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, extension: Box<dyn Extension>) {
        tracing::debug!(extension = extension.name(), "Registered extension");
        self.extensions.push(extension);
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Extension> {
        self.extensions.iter().map(|e| {
            let extension: &dyn Extension = &**e;
            extension
        })
    }

    pub fn names(&self) -> Vec<&str> {
        self.extensions.iter().map(|e| e.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.extensions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }

    /// Append every extension's kinds to the registry.
    pub fn register_page_kinds(&self, kinds: &mut PageKindRegistry) {
        for extension in self.iter() {
            for kind in extension.page_kinds() {
                kinds.register(kind);
            }
        }
    }

    pub fn contribute_pages(&self, ctx: &BootContext<'_>, pages: &mut PageIndex) -> Result<(), Error> {
        for extension in self.iter() {
            extension
                .contribute_pages(ctx, pages)
                .map_err(|e| hook_failure(extension, e))?;
        }
        Ok(())
    }

    pub fn contribute_routes(&self, ctx: &BootContext<'_>, routes: &mut RouteIndex) -> Result<(), Error> {
        for extension in self.iter() {
            extension
                .contribute_routes(ctx, routes)
                .map_err(|e| hook_failure(extension, e))?;
        }
        Ok(())
    }
}

fn hook_failure(extension: &dyn Extension, err: Error) -> Error {
    match err {
        err @ Error::Extension { .. } => err,
        other => Error::Extension {
            name: extension.name().to_string(),
            message: other.to_string(),
        },
    }
}

// ============================================================================
// Built-in extensions
// ============================================================================

/// Adds a `docs/search` page for documentation sites.
#[derive(Debug, Default)]
pub struct DocumentationSearch;

impl Extension for DocumentationSearch {
    fn name(&self) -> &str {
        "documentation-search"
    }

    fn contribute_pages(&self, ctx: &BootContext<'_>, pages: &mut PageIndex) -> Result<(), Error> {
        let kind = ctx.kind(&KindTag::DocumentationPage)?;
        let mut front_matter = FrontMatter::new();
        front_matter.insert("title", "Search");
        front_matter.insert("navigation", serde_yaml::Value::Bool(false));
        pages.insert_virtual(Page::virtual_page(kind, "search", front_matter, ""));
        Ok(())
    }
}

/// Adds a `404` page unless the project already has one.
#[derive(Debug, Default)]
pub struct NotFoundPage;

impl Extension for NotFoundPage {
    fn name(&self) -> &str {
        "not-found"
    }

    fn contribute_routes(&self, ctx: &BootContext<'_>, routes: &mut RouteIndex) -> Result<(), Error> {
        if routes.contains("404") {
            return Ok(());
        }
        let kind = ctx.kind(&KindTag::MarkdownPage)?;
        let mut front_matter = FrontMatter::new();
        front_matter.insert("title", "Page not found");
        let page = Page::virtual_page(
            kind,
            "404",
            front_matter,
            "# 404\n\nSorry, the page you are looking for could not be found.\n",
        );
        routes.add_route(Route::new(Arc::new(page)));
        Ok(())
    }
}

/// Built-in extension by configuration name.
pub fn extension_by_name(name: &str) -> Option<Box<dyn Extension>> {
    match name {
        "documentation-search" => Some(Box::new(DocumentationSearch)),
        "not-found" => Some(Box::new(NotFoundPage)),
        _ => None,
    }
}

/// Names accepted by [`extension_by_name`].
pub fn available_extensions() -> Vec<&'static str> {
    vec!["documentation-search", "not-found"]
}
