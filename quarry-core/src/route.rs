//! The route index: a pre-computed mapping from route key to page and paths.

use crate::kind::PageKind;
use crate::page::Page;
use crate::{Error, Lookup};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Canonical identity of one output page.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    /// Site-wide unique key, e.g. `posts/hello-world`.
    pub route_key: String,
    pub page: Arc<Page>,
    /// Project-relative source path; `None` for virtual pages.
    pub source_path: Option<String>,
    /// Output path relative to the site root, e.g. `posts/hello-world.html`.
    pub output_path: String,
}

impl Route {
    pub fn new(page: Arc<Page>) -> Self {
        Self {
            route_key: page.route_key(),
            source_path: page.source_path.clone(),
            output_path: page.output_path(),
            page,
        }
    }

    pub fn kind(&self) -> &PageKind {
        &self.page.kind
    }

    pub fn is_virtual(&self) -> bool {
        self.source_path.is_none()
    }

    /// Site-relative link to the route.
    ///
    /// With pretty URLs, `docs/index` links as `docs/` and `about` as `about`;
    /// otherwise the output path is used as-is.
    pub fn url(&self, pretty: bool) -> String {
        if !pretty {
            return self.output_path.clone();
        }
        if self.route_key == "index" {
            return String::new();
        }
        match self.route_key.strip_suffix("/index") {
            Some(dir) => format!("{}/", dir),
            None => self.route_key.clone(),
        }
    }
}

/// Route key to route. Later insertions overwrite earlier ones.
#[derive(Debug, Clone, Default)]
pub struct RouteIndex {
    routes: BTreeMap<String, Route>,
}

impl RouteIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// One route per page, in page index order.
    pub fn from_pages<'a>(pages: impl IntoIterator<Item = &'a Arc<Page>>) -> Self {
        let mut index = Self::new();
        for page in pages {
            index.add_route(Route::new(Arc::clone(page)));
        }
        index
    }

    /// Insert a route, silently replacing any route with the same key.
    pub fn add_route(&mut self, route: Route) {
        let key = route.route_key.clone();
        if let Some(previous) = self.routes.insert(key.clone(), route) {
            tracing::debug!(
                route = %key,
                replaced = previous.source_path.as_deref().unwrap_or("virtual"),
                "Route key overwritten"
            );
        }
    }

    pub fn get(&self, route_key: &str) -> Result<&Route, Error> {
        let key = route_key.trim_start_matches('/');
        self.routes
            .get(key)
            .ok_or_else(|| Error::not_found(Lookup::Route, key))
    }

    pub fn contains(&self, route_key: &str) -> bool {
        self.routes.contains_key(route_key.trim_start_matches('/'))
    }

    pub fn get_by_kind<'a>(&'a self, kind: &'a PageKind) -> impl Iterator<Item = &'a Route> + 'a {
        self.routes.values().filter(move |r| r.kind() == kind)
    }

    pub fn all(&self) -> impl Iterator<Item = &Route> {
        self.routes.values()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontmatter::FrontMatter;
    use crate::kind::{KindTag, ParseStrategy};

    fn page(kind: PageKind, identifier: &str, source: Option<&str>) -> Arc<Page> {
        let mut page = Page::virtual_page(Arc::new(kind), identifier, FrontMatter::new(), "");
        page.source_path = source.map(str::to_string);
        Arc::new(page)
    }

    #[test]
    fn test_route_derivation() {
        let route = Route::new(page(
            PageKind::markdown_post(),
            "hello-world",
            Some("_posts/hello-world.md"),
        ));
        assert_eq!(route.route_key, "posts/hello-world");
        assert_eq!(route.output_path, "posts/hello-world.html");
        assert_eq!(route.source_path.as_deref(), Some("_posts/hello-world.md"));
        assert!(!route.is_virtual());
    }

    #[test]
    fn test_last_write_wins() {
        let builtin = page(PageKind::markdown_page(), "index", Some("_pages/index.md"));
        let custom_kind = PageKind::new(
            KindTag::Custom("landing".into()),
            "_landing",
            "",
            ".md",
            "landing",
            ParseStrategy::FrontMatter,
        );
        let extension = page(custom_kind, "index", Some("_landing/index.md"));

        let mut routes = RouteIndex::new();
        routes.add_route(Route::new(builtin));
        routes.add_route(Route::new(extension));

        assert_eq!(routes.len(), 1);
        let route = routes.get("index").unwrap();
        assert_eq!(route.source_path.as_deref(), Some("_landing/index.md"));
        assert_eq!(route.kind().tag, KindTag::Custom("landing".into()));
    }

    #[test]
    fn test_unknown_key() {
        let routes = RouteIndex::new();
        let err = routes.get("/nope").unwrap_err();
        assert_eq!(err.to_string(), "route not found: nope");
    }

    #[test]
    fn test_round_trip_and_kind_filter() {
        let routes = RouteIndex::from_pages(&[
            page(PageKind::markdown_post(), "a", Some("_posts/a.md")),
            page(PageKind::markdown_post(), "b", Some("_posts/b.md")),
            page(PageKind::documentation_page(), "index", Some("_docs/index.md")),
        ]);

        for route in routes.all() {
            assert_eq!(routes.get(&route.route_key).unwrap(), route);
        }
        let post_kind = PageKind::markdown_post();
        assert_eq!(routes.get_by_kind(&post_kind).count(), 2);
        assert!(routes.contains("/docs/index"));
    }

    #[test]
    fn test_pretty_urls() {
        let home = Route::new(page(PageKind::markdown_page(), "index", None));
        let docs = Route::new(page(PageKind::documentation_page(), "index", None));
        let post = Route::new(page(PageKind::markdown_post(), "hello", None));

        assert_eq!(home.url(true), "");
        assert_eq!(docs.url(true), "docs/");
        assert_eq!(post.url(true), "posts/hello");
        assert_eq!(post.url(false), "posts/hello.html");
        assert!(home.is_virtual());
    }
}
