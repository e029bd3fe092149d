//! # quarry-core
//!
//! Content discovery and route resolution for the quarry static site
//! generator.
//!
//! Given a project tree, this crate decides which source files exist, which
//! [`PageKind`] each belongs to, what identifier and route key it maps to and
//! where its output will be written. Rendering, feeds and sitemaps are left to
//! consumers of the [`RouteIndex`].
//!
//! ```text
//! PageKindRegistry ─► discover ─► FileIndex ─► PageParser ─► PageIndex ─► RouteIndex
//!        ▲                                                      ▲             ▲
//!        └──────────────────── Extension hooks ─────────────────┴─────────────┘
//! ```
//!
//! ```no_run
//! use quarry_core::Project;
//!
//! let project = Project::builder("my-site").boot()?;
//! for route in project.routes().all() {
//!     println!("{} -> {}", route.route_key, route.output_path);
//! }
//! # Ok::<(), quarry_core::Error>(())
//! ```

pub mod config;
pub mod discover;
pub mod error;
pub mod extension;
pub mod frontmatter;
pub mod index;
pub mod kind;
pub mod page;
pub mod project;
pub mod route;

pub use config::{Config, ConfigError};
pub use discover::{discover, discover_media, SourceFile};
pub use error::{Error, Lookup};
pub use extension::{
    available_extensions, extension_by_name, BootContext, Extension, ExtensionRegistry,
};
pub use frontmatter::{split_front_matter, FrontMatter, FrontMatterError};
pub use index::{FileIndex, MediaSource, PageIndex};
pub use kind::{KindTag, PageKind, PageKindRegistry, ParseStrategy};
pub use page::{Page, PageParser};
pub use project::{BootReport, Project, ProjectBuilder};
pub use route::{Route, RouteIndex};
