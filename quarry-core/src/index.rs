//! Aggregate collections of discovered files and parsed pages.

use crate::discover::{discover, discover_media, SourceFile};
use crate::kind::{normalize_dir, normalize_path, PageKind, PageKindRegistry};
use crate::page::{Page, PageParser};
use crate::{Error, Lookup};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

/// Media settings consulted when building the file index.
#[derive(Debug, Clone, Default)]
pub struct MediaSource {
    pub directory: String,
    pub extensions: Vec<String>,
}

/// Every source file found on disk, keyed by project-relative path.
#[derive(Debug, Clone, Default)]
pub struct FileIndex {
    files: BTreeMap<String, SourceFile>,
}

impl FileIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Discover files for every registered kind, then media assets.
    ///
    /// A file only enters the index under the kind that reverse lookup assigns
    /// it, so `about.blade.php` is never also picked up by a `.php` kind.
    pub fn build(
        registry: &PageKindRegistry,
        media: Option<&MediaSource>,
        project_root: &Path,
    ) -> Result<Self, Error> {
        let mut index = Self::new();

        for kind in registry.all() {
            for file in discover(kind, project_root)? {
                match registry.kind_for_path(&file.path) {
                    Some(owner) if Arc::ptr_eq(owner, kind) => index.insert(file),
                    Some(_) => tracing::debug!(
                        path = %file.path,
                        kind = %kind.tag,
                        "Skipping file claimed by a more specific kind"
                    ),
                    None => tracing::warn!(
                        path = %file.path,
                        kind = %kind.tag,
                        "Skipping file no kind owns"
                    ),
                }
            }
        }

        if let Some(media) = media {
            for file in discover_media(&media.directory, &media.extensions, project_root)? {
                // A page always beats a media asset at the same path.
                if index.contains(&file.path) {
                    tracing::debug!(path = %file.path, "Media file already indexed as a page");
                    continue;
                }
                index.insert(file);
            }
        }

        tracing::info!("Indexed {} source files", index.len());
        Ok(index)
    }

    pub fn insert(&mut self, file: SourceFile) {
        self.files.insert(file.path.clone(), file);
    }

    /// Drop every file under a project-relative directory, returning how many
    /// were removed. Used to keep generated output out of a source root.
    pub fn exclude_directory(&mut self, dir: &str) -> usize {
        let dir = normalize_dir(dir);
        if dir.is_empty() {
            return 0;
        }
        let before = self.files.len();
        self.files.retain(|path, _| {
            path.strip_prefix(&dir)
                .map_or(true, |rest| !rest.starts_with('/'))
        });
        before - self.files.len()
    }

    pub fn get(&self, path: &str) -> Result<&SourceFile, Error> {
        let path = normalize_path(path);
        self.files
            .get(&path)
            .ok_or_else(|| Error::not_found(Lookup::SourceFile, path))
    }

    pub fn contains(&self, path: &str) -> bool {
        self.files.contains_key(&normalize_path(path))
    }

    /// Files owned by exactly this registered kind instance.
    pub fn owned_by<'a>(&'a self, kind: &'a Arc<PageKind>) -> impl Iterator<Item = &'a SourceFile> + 'a {
        self.files
            .values()
            .filter(move |f| f.kind.as_ref().is_some_and(|k| Arc::ptr_eq(k, kind)))
    }

    pub fn filter_by_kind<'a>(&'a self, kind: &'a PageKind) -> impl Iterator<Item = &'a SourceFile> + 'a {
        self.files
            .values()
            .filter(move |f| f.kind.as_deref() == Some(kind))
    }

    /// Files that belong to no page kind.
    pub fn media(&self) -> impl Iterator<Item = &SourceFile> {
        self.files.values().filter(|f| f.is_media())
    }

    pub fn all(&self) -> impl Iterator<Item = &SourceFile> {
        self.files.values()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Every parsed page, keyed by source path (or a `virtual:` key for pages with
/// no backing file).
///
/// Lookups and [`PageIndex::all`] go by key. Insertion order is kept
/// separately because it decides which page owns a shared route key.
#[derive(Debug, Clone, Default)]
pub struct PageIndex {
    pages: BTreeMap<String, Arc<Page>>,
    order: Vec<String>,
}

impl PageIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse every kind-owned file, kind by kind in registry order.
    ///
    /// A file that fails to parse is left out and its error returned in the
    /// second element; the other files are still indexed.
    pub fn build(
        files: &FileIndex,
        registry: &PageKindRegistry,
        parser: &PageParser,
    ) -> (Self, Vec<Error>) {
        let mut index = Self::new();
        let mut errors = Vec::new();

        for kind in registry.all() {
            for file in files.owned_by(kind) {
                match parser.parse_file(file) {
                    Ok(page) => index.insert(page),
                    Err(err) => {
                        tracing::warn!("Failed to parse {}: {}", file.path, err);
                        errors.push(err);
                    }
                }
            }
        }

        tracing::info!("Parsed {} pages ({} failed)", index.len(), errors.len());
        (index, errors)
    }

    /// Insert or replace a page under its index key.
    pub fn insert(&mut self, page: Page) {
        let key = page.index_key();
        if self.pages.insert(key.clone(), Arc::new(page)).is_some() {
            tracing::debug!(key = %key, "Replaced page in index");
            self.order.retain(|k| k != &key);
        }
        self.order.push(key);
    }

    /// Insert a page with no backing file. A source path on the page is dropped.
    pub fn insert_virtual(&mut self, mut page: Page) {
        page.source_path = None;
        self.insert(page);
    }

    /// Page by source path, or by `virtual:<route key>` for virtual pages.
    pub fn get(&self, path: &str) -> Result<&Arc<Page>, Error> {
        let path = normalize_path(path);
        self.pages
            .get(&path)
            .ok_or_else(|| Error::not_found(Lookup::Page, path))
    }

    pub fn all_of_kind<'a>(&'a self, kind: &'a PageKind) -> impl Iterator<Item = &'a Arc<Page>> + 'a {
        self.pages.values().filter(move |p| p.kind.as_ref() == kind)
    }

    pub fn all(&self) -> impl Iterator<Item = &Arc<Page>> {
        self.pages.values()
    }

    /// Pages in the order they were inserted; a replaced page moves to the end.
    pub fn in_insertion_order(&self) -> impl Iterator<Item = &Arc<Page>> {
        self.order.iter().filter_map(|key| self.pages.get(key))
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontmatter::FrontMatter;
    use crate::kind::{KindTag, ParseStrategy};
    use std::fs;
    use tempfile::tempdir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn site() -> tempfile::TempDir {
        let dir = tempdir().unwrap();
        write(dir.path(), "_pages/index.md", "# Home");
        write(dir.path(), "_pages/about.blade.php", "<h1>About</h1>");
        write(dir.path(), "_pages/contact.html", "<h1>Contact</h1>");
        write(dir.path(), "_posts/hello.md", "---\ntitle: Hello\n---\nHi");
        write(dir.path(), "_posts/broken.md", "---\ntitle: [\n---\n");
        write(dir.path(), "_docs/setup.md", "Setup");
        write(dir.path(), "_media/logo.png", "png");
        dir
    }

    fn media() -> MediaSource {
        MediaSource {
            directory: "_media".into(),
            extensions: vec!["png".into()],
        }
    }

    #[test]
    fn test_file_index_lookup() {
        let dir = site();
        let registry = PageKindRegistry::with_builtins();
        let files = FileIndex::build(&registry, Some(&media()), dir.path()).unwrap();

        assert_eq!(files.len(), 7);
        let about = files.get("_pages/about.blade.php").unwrap();
        assert_eq!(about.kind.as_ref().unwrap().tag, KindTag::BladePage);
        assert!(files.get("_media/logo.png").unwrap().is_media());
        assert!(files.get("_pages/missing.md").unwrap_err().is_not_found());

        let posts = registry.get(&KindTag::MarkdownPost).unwrap();
        assert_eq!(files.filter_by_kind(posts).count(), 2);
        assert_eq!(files.media().count(), 1);
    }

    #[test]
    fn test_more_specific_kind_claims_file() {
        let dir = site();
        let mut registry = PageKindRegistry::with_builtins();
        registry.register(PageKind::new(
            KindTag::Custom("php-page".into()),
            "_pages",
            "",
            ".php",
            "php",
            ParseStrategy::Raw,
        ));
        write(dir.path(), "_pages/legacy.php", "<?php");

        let files = FileIndex::build(&registry, None, dir.path()).unwrap();
        let php = registry.get(&KindTag::Custom("php-page".into())).unwrap();
        let php_files: Vec<_> = files.filter_by_kind(php).map(|f| f.path.as_str()).collect();
        assert_eq!(php_files, vec!["_pages/legacy.php"]);
    }

    #[test]
    fn test_dot_prefixed_source_directory() {
        let dir = tempdir().unwrap();
        write(dir.path(), "_blog/first.md", "First");

        let mut registry = PageKindRegistry::new();
        registry.register(PageKind::markdown_post().with_source_directory("./_blog"));
        let files = FileIndex::build(&registry, None, dir.path()).unwrap();
        let (pages, errors) = PageIndex::build(&files, &registry, &PageParser::new(dir.path()));

        assert!(errors.is_empty());
        assert_eq!(pages.get("_blog/first.md").unwrap().route_key(), "posts/first");
    }

    #[test]
    fn test_media_never_replaces_a_page() {
        let dir = tempdir().unwrap();
        write(dir.path(), "_pages/widget.js", "export {}");

        let mut registry = PageKindRegistry::with_builtins();
        let script = registry.register(PageKind::new(
            KindTag::Custom("script-page".into()),
            "_pages",
            "",
            ".js",
            "script",
            ParseStrategy::Raw,
        ));
        let media = MediaSource {
            directory: "_pages".into(),
            extensions: vec!["js".into()],
        };
        let files = FileIndex::build(&registry, Some(&media), dir.path()).unwrap();

        let widget = files.get("_pages/widget.js").unwrap();
        assert!(Arc::ptr_eq(widget.kind.as_ref().unwrap(), &script));
        assert_eq!(files.media().count(), 0);
    }

    #[test]
    fn test_exclude_directory() {
        let dir = tempdir().unwrap();
        write(dir.path(), "index.md", "Home");
        write(dir.path(), "_site/index.html", "<p>built</p>");
        write(dir.path(), "_site2/keep.html", "<p>keep</p>");

        let mut registry = PageKindRegistry::new();
        registry.register(PageKind::markdown_page().with_source_directory(""));
        registry.register(PageKind::html_page().with_source_directory(""));
        let mut files = FileIndex::build(&registry, None, dir.path()).unwrap();
        assert_eq!(files.len(), 3);

        assert_eq!(files.exclude_directory("./_site/"), 1);
        assert!(!files.contains("_site/index.html"));
        assert!(files.contains("_site2/keep.html"));
        assert!(files.contains("index.md"));
        assert_eq!(files.exclude_directory(""), 0);
    }

    #[test]
    fn test_page_index_collects_errors() {
        let dir = site();
        let registry = PageKindRegistry::with_builtins();
        let files = FileIndex::build(&registry, Some(&media()), dir.path()).unwrap();
        let (pages, errors) = PageIndex::build(&files, &registry, &PageParser::new(dir.path()));

        assert_eq!(pages.len(), 5);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].path(), Some(Path::new("_posts/broken.md")));

        let hello = pages.get("_posts/hello.md").unwrap();
        assert_eq!(hello.front_matter.title(), Some("Hello"));
        assert!(pages.get("_posts/broken.md").is_err());

        let docs = registry.get(&KindTag::DocumentationPage).unwrap();
        let ids: Vec<_> = pages.all_of_kind(docs).map(|p| p.identifier.as_str()).collect();
        assert_eq!(ids, vec!["setup"]);
    }

    #[test]
    fn test_insertion_order_follows_registry() {
        let dir = tempdir().unwrap();
        write(dir.path(), "_pages/index.md", "Home");
        write(dir.path(), "_landing/index.md", "Landing");

        let mut registry = PageKindRegistry::with_builtins();
        registry.register(PageKind::new(
            KindTag::Custom("landing".into()),
            "_landing",
            "",
            ".md",
            "landing",
            ParseStrategy::FrontMatter,
        ));
        let files = FileIndex::build(&registry, None, dir.path()).unwrap();
        let (pages, _) = PageIndex::build(&files, &registry, &PageParser::new(dir.path()));

        let sorted: Vec<_> = pages.all().filter_map(|p| p.source_path.as_deref()).collect();
        assert_eq!(sorted, vec!["_landing/index.md", "_pages/index.md"]);

        let inserted: Vec<_> = pages
            .in_insertion_order()
            .filter_map(|p| p.source_path.as_deref())
            .collect();
        assert_eq!(inserted, vec!["_pages/index.md", "_landing/index.md"]);
    }

    #[test]
    fn test_virtual_pages_use_synthetic_keys() {
        let mut pages = PageIndex::new();
        let kind = Arc::new(PageKind::documentation_page());
        let mut page = Page::virtual_page(kind, "search", FrontMatter::new(), "");
        page.source_path = Some("_docs/search.md".into());
        pages.insert_virtual(page);

        let page = pages.get("virtual:docs/search").unwrap();
        assert!(page.is_virtual());
        assert!(pages.get("_docs/search.md").is_err());
    }
}
