//! Init command implementation.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"# quarry project configuration
source_root: "."
output_dir: "_site"
pretty_urls: false

kinds:
  pages: { source: _pages, output: "" }
  posts: { source: _posts, output: posts }
  docs: { source: _docs, output: docs }

media:
  directory: _media

extensions:
  - not-found
"#;

/// Initialize a new quarry project
pub fn init_project(path: Option<&Path>) -> Result<()> {
    let root = path.unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(root).with_context(|| format!("Failed to create {:?}", root))?;

    write_config(root)?;
    scaffold_sources(root)?;

    println!("✓ quarry initialized in {:?}", root);
    println!("  - Edit quarry.yml to change source and output directories");
    println!("  - Run `quarry routes` to see what will be built");
    Ok(())
}

fn write_config(root: &Path) -> Result<()> {
    let config_path = root.join("quarry.yml");
    if config_path.exists() {
        println!("quarry.yml already exists at {:?}", config_path);
        return Ok(());
    }

    fs::write(&config_path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {:?}", config_path))?;
    println!("Created {:?}", config_path);
    Ok(())
}

fn scaffold_sources(root: &Path) -> Result<()> {
    for dir in ["_pages", "_posts", "_docs", "_media"] {
        let dir = root.join(dir);
        fs::create_dir_all(&dir).with_context(|| format!("Failed to create {:?}", dir))?;
    }

    let index = root.join("_pages").join("index.md");
    if !index.exists() {
        fs::write(&index, sample_page())?;
        println!("Created {:?}", index);
    }
    Ok(())
}

fn sample_page() -> &'static str {
    r#"---
title: Home
---

# Welcome

Pages live in `_pages/`, posts in `_posts/` and documentation in `_docs/`.
Files whose name starts with `_` are ignored.
"#
}
