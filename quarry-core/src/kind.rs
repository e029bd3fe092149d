//! Page kinds: the categories of content a project can contain.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Identity of a page kind.
///
/// Built-in kinds are closed variants; kinds contributed by extensions use
/// `Custom` with a name chosen by the extension.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum KindTag {
    HtmlPage,
    BladePage,
    MarkdownPage,
    MarkdownPost,
    DocumentationPage,
    Custom(String),
}

impl KindTag {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "html-page" | "html" => Some(KindTag::HtmlPage),
            "blade-page" | "blade" => Some(KindTag::BladePage),
            "markdown-page" | "page" => Some(KindTag::MarkdownPage),
            "markdown-post" | "post" => Some(KindTag::MarkdownPost),
            "documentation-page" | "doc" | "docs" => Some(KindTag::DocumentationPage),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            KindTag::HtmlPage => "html-page",
            KindTag::BladePage => "blade-page",
            KindTag::MarkdownPage => "markdown-page",
            KindTag::MarkdownPost => "markdown-post",
            KindTag::DocumentationPage => "documentation-page",
            KindTag::Custom(name) => name,
        }
    }
}

impl fmt::Display for KindTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a file of this kind is split into metadata and body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ParseStrategy {
    /// Leading `---` YAML block followed by the body.
    FrontMatter,
    /// The whole file is the body.
    Raw,
}

/// Static description of one content category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageKind {
    pub tag: KindTag,
    pub source_directory: String,
    pub output_directory: String,
    pub file_extension: String,
    pub template_id: String,
    pub strategy: ParseStrategy,
}

impl PageKind {
    pub fn new(
        tag: KindTag,
        source_directory: &str,
        output_directory: &str,
        file_extension: &str,
        template_id: &str,
        strategy: ParseStrategy,
    ) -> Self {
        Self {
            tag,
            source_directory: normalize_dir(source_directory),
            output_directory: normalize_dir(output_directory),
            file_extension: normalize_extension(file_extension),
            template_id: template_id.to_string(),
            strategy,
        }
    }

    pub fn html_page() -> Self {
        Self::new(KindTag::HtmlPage, "_pages", "", ".html", "html-page", ParseStrategy::Raw)
    }

    pub fn blade_page() -> Self {
        Self::new(
            KindTag::BladePage,
            "_pages",
            "",
            ".blade.php",
            "blade-page",
            ParseStrategy::Raw,
        )
    }

    pub fn markdown_page() -> Self {
        Self::new(
            KindTag::MarkdownPage,
            "_pages",
            "",
            ".md",
            "markdown-page",
            ParseStrategy::FrontMatter,
        )
    }

    pub fn markdown_post() -> Self {
        Self::new(
            KindTag::MarkdownPost,
            "_posts",
            "posts",
            ".md",
            "markdown-post",
            ParseStrategy::FrontMatter,
        )
    }

    pub fn documentation_page() -> Self {
        Self::new(
            KindTag::DocumentationPage,
            "_docs",
            "docs",
            ".md",
            "documentation-page",
            ParseStrategy::FrontMatter,
        )
    }

    /// Built-in kinds in registration order.
    pub fn builtins() -> Vec<PageKind> {
        vec![
            Self::html_page(),
            Self::blade_page(),
            Self::markdown_page(),
            Self::markdown_post(),
            Self::documentation_page(),
        ]
    }

    pub fn with_source_directory(mut self, dir: &str) -> Self {
        self.source_directory = normalize_dir(dir);
        self
    }

    pub fn with_output_directory(mut self, dir: &str) -> Self {
        self.output_directory = normalize_dir(dir);
        self
    }

    /// Whether a project-relative path sits under this kind's source directory
    /// and carries its extension.
    pub fn owns_path(&self, path: &str) -> bool {
        let in_dir = if self.source_directory.is_empty() {
            true
        } else {
            path.strip_prefix(&self.source_directory)
                .is_some_and(|rest| rest.starts_with('/'))
        };
        in_dir && path.ends_with(&self.file_extension)
    }

    /// Identifier for a project-relative source path, or `None` when the path
    /// does not belong to this kind.
    pub fn identifier_for(&self, path: &str) -> Option<String> {
        let path = normalize_path(path);
        let path = path.as_str();
        if !self.owns_path(path) {
            return None;
        }
        let rest = if self.source_directory.is_empty() {
            path
        } else {
            &path[self.source_directory.len() + 1..]
        };
        let identifier = rest.strip_suffix(&self.file_extension)?;
        if identifier.is_empty() {
            return None;
        }
        Some(identifier.to_string())
    }

    /// Project-relative source path for an identifier.
    pub fn source_path(&self, identifier: &str) -> String {
        join_path(&self.source_directory, &format!("{}{}", identifier, self.file_extension))
    }

    /// Route key for an identifier: `output_directory/identifier` without a
    /// leading slash.
    pub fn route_key(&self, identifier: &str) -> String {
        join_path(&self.output_directory, identifier)
            .trim_start_matches('/')
            .to_string()
    }

    /// Output path for an identifier, relative to the site output root.
    pub fn output_path(&self, identifier: &str) -> String {
        format!("{}.html", self.route_key(identifier))
    }
}

/// Ordered, append-only set of page kinds.
///
/// Built-in kinds come first, extension kinds after them. There is no removal;
/// once a [`Project`](crate::Project) is booted the registry is only read.
#[derive(Debug, Clone, Default)]
pub struct PageKindRegistry {
    kinds: Vec<Arc<PageKind>>,
}

impl PageKindRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-populated with the built-in kinds.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for kind in PageKind::builtins() {
            registry.register(kind);
        }
        registry
    }

    pub fn register(&mut self, kind: PageKind) -> Arc<PageKind> {
        tracing::debug!(
            kind = %kind.tag,
            source = %kind.source_directory,
            extension = %kind.file_extension,
            "Registered page kind"
        );
        let kind = Arc::new(kind);
        self.kinds.push(Arc::clone(&kind));
        kind
    }

    pub fn all(&self) -> &[Arc<PageKind>] {
        &self.kinds
    }

    /// Last registered kind carrying the tag.
    pub fn get(&self, tag: &KindTag) -> Option<&Arc<PageKind>> {
        self.kinds.iter().rev().find(|k| &k.tag == tag)
    }

    /// Reverse lookup: which kind owns a project-relative path.
    ///
    /// The longest matching source directory wins, then the longest extension,
    /// so `_pages/about.blade.php` resolves to the Blade kind even though a
    /// `.php` kind would also match. Among equal candidates the later
    /// registration wins.
    pub fn kind_for_path(&self, path: &str) -> Option<&Arc<PageKind>> {
        let path = normalize_path(path);
        let mut best: Option<&Arc<PageKind>> = None;
        for kind in &self.kinds {
            if kind.identifier_for(&path).is_none() {
                continue;
            }
            best = match best {
                Some(current)
                    if (current.source_directory.len(), current.file_extension.len())
                        > (kind.source_directory.len(), kind.file_extension.len()) =>
                {
                    Some(current)
                }
                _ => Some(kind),
            };
        }
        best
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}

pub(crate) fn normalize_dir(dir: &str) -> String {
    normalize_path(dir.trim()).trim_matches('/').to_string()
}

/// Forward slashes only, with `.` segments dropped (`./_blog/a.md` is
/// `_blog/a.md`, `.` is empty).
pub(crate) fn normalize_path(path: &str) -> String {
    path.replace('\\', "/")
        .split('/')
        .filter(|segment| *segment != ".")
        .collect::<Vec<_>>()
        .join("/")
}

fn normalize_extension(ext: &str) -> String {
    let ext = ext.trim();
    if ext.is_empty() || ext.starts_with('.') {
        ext.to_string()
    } else {
        format!(".{}", ext)
    }
}

fn join_path(dir: &str, rest: &str) -> String {
    if dir.is_empty() {
        rest.to_string()
    } else {
        format!("{}/{}", dir, rest)
    }
}
