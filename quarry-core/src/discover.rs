//! Filesystem discovery of source files.

use crate::kind::{normalize_path, PageKind};
use crate::Error;
use std::path::Path;
use std::sync::Arc;
use walkdir::{DirEntry, WalkDir};

/// A file found during discovery.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceFile {
    /// Project-relative path, `/`-separated.
    pub path: String,
    /// Owning kind; `None` for media assets.
    pub kind: Option<Arc<PageKind>>,
}

impl SourceFile {
    pub fn new(path: impl Into<String>, kind: Option<Arc<PageKind>>) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    pub fn is_media(&self) -> bool {
        self.kind.is_none()
    }

    /// Identifier derived from the path, for files that belong to a kind.
    pub fn identifier(&self) -> Option<String> {
        self.kind.as_ref()?.identifier_for(&self.path)
    }
}

/// Find every source file of `kind` under `project_root`.
///
/// Files whose basename starts with `_` are skipped at any depth. A missing
/// source directory yields no files.
pub fn discover(kind: &Arc<PageKind>, project_root: &Path) -> Result<Vec<SourceFile>, Error> {
    let files = walk(project_root, &kind.source_directory, |name| {
        name.ends_with(&kind.file_extension) && name.len() > kind.file_extension.len()
    })?;

    tracing::debug!(
        kind = %kind.tag,
        count = files.len(),
        "Discovered source files"
    );

    Ok(files
        .into_iter()
        .map(|path| SourceFile::new(path, Some(Arc::clone(kind))))
        .collect())
}

/// Find media assets: files under `directory` whose extension is listed.
pub fn discover_media(
    directory: &str,
    extensions: &[String],
    project_root: &Path,
) -> Result<Vec<SourceFile>, Error> {
    let files = walk(project_root, directory, |name| {
        Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| extensions.iter().any(|allowed| allowed.eq_ignore_ascii_case(ext)))
    })?;

    tracing::debug!(directory, count = files.len(), "Discovered media files");

    Ok(files.into_iter().map(|path| SourceFile::new(path, None)).collect())
}

fn walk(
    project_root: &Path,
    directory: &str,
    matches: impl Fn(&str) -> bool,
) -> Result<Vec<String>, Error> {
    let base = project_root.join(directory);
    if !base.is_dir() {
        tracing::debug!("Source directory {:?} does not exist; nothing to discover", base);
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(&base).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                tracing::warn!("Skipping unreadable entry under {:?}: {}", base, err);
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(name) = entry.file_name().to_str() else {
            tracing::warn!("Skipping non UTF-8 file name {:?}", entry.path());
            continue;
        };
        if name.starts_with('_') {
            tracing::debug!("Ignoring {:?}: underscore prefix", entry.path());
            continue;
        }
        if !matches(name) {
            continue;
        }
        if let Some(rel) = relative_path(&entry, project_root) {
            files.push(rel);
        }
    }
    Ok(files)
}

fn relative_path(entry: &DirEntry, project_root: &Path) -> Option<String> {
    let rel = entry.path().strip_prefix(project_root).ok()?;
    rel.to_str().map(normalize_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::PageKind;
    use std::fs;
    use tempfile::tempdir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "content").unwrap();
    }

    #[test]
    fn test_discovers_nested_files() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "_posts/hello.md");
        touch(dir.path(), "_posts/2024/deep/nested.md");
        touch(dir.path(), "_posts/notes.txt");

        let kind = Arc::new(PageKind::markdown_post());
        let files = discover(&kind, dir.path()).unwrap();
        let mut paths: Vec<_> = files.iter().map(|f| f.path.as_str()).collect();
        paths.sort();
        assert_eq!(paths, vec!["_posts/2024/deep/nested.md", "_posts/hello.md"]);
        assert_eq!(files[0].kind.as_deref(), Some(kind.as_ref()));
    }

    #[test]
    fn test_underscore_files_excluded_at_any_depth() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "_pages/_draft.md");
        touch(dir.path(), "_pages/guide/_partial.md");
        touch(dir.path(), "_pages/guide/visible.md");

        let kind = Arc::new(PageKind::markdown_page());
        let files = discover(&kind, dir.path()).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].path, "_pages/guide/visible.md");
    }

    #[test]
    fn test_only_draft_yields_nothing() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "_pages/_draft.md");
        let kind = Arc::new(PageKind::markdown_page());
        assert!(discover(&kind, dir.path()).unwrap().is_empty());
    }

    #[test]
    fn test_missing_directory_is_empty() {
        let dir = tempdir().unwrap();
        let kind = Arc::new(PageKind::documentation_page());
        assert!(discover(&kind, dir.path()).unwrap().is_empty());
    }

    #[test]
    fn test_bare_extension_is_not_a_page() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "_posts/.md");
        let kind = Arc::new(PageKind::markdown_post());
        assert!(discover(&kind, dir.path()).unwrap().is_empty());
    }

    #[test]
    fn test_media_discovery() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "_media/logo.PNG");
        touch(dir.path(), "_media/css/app.css");
        touch(dir.path(), "_media/readme.md");
        touch(dir.path(), "_media/_hidden.png");

        let exts = vec!["png".to_string(), "css".to_string()];
        let files = discover_media("_media", &exts, dir.path()).unwrap();
        let mut paths: Vec<_> = files.iter().map(|f| f.path.as_str()).collect();
        paths.sort();
        assert_eq!(paths, vec!["_media/css/app.css", "_media/logo.PNG"]);
        assert!(files.iter().all(SourceFile::is_media));
    }
}
