//! Route listing and lookup.

use super::project::load_project;
use anyhow::{Context, Result};
use quarry_core::{KindTag, Route};
use serde::Serialize;
use std::path::Path;

#[derive(Serialize)]
struct RouteRow<'a> {
    key: &'a str,
    kind: &'a str,
    source: Option<&'a str>,
    output: &'a str,
    url: String,
    title: String,
}

impl<'a> RouteRow<'a> {
    fn new(route: &'a Route, pretty_urls: bool) -> Self {
        Self {
            key: &route.route_key,
            kind: route.kind().tag.as_str(),
            source: route.source_path.as_deref(),
            output: &route.output_path,
            url: format!("/{}", route.url(pretty_urls)),
            title: route.page.title(),
        }
    }
}

/// Print every route, optionally restricted to one kind.
pub fn list_routes(config_path: &Path, kind: Option<&str>, json: bool) -> Result<()> {
    let (config, project) = load_project(config_path)?;

    let tag = match kind {
        Some(name) => Some(
            KindTag::from_str(name)
                .or_else(|| {
                    project
                        .kinds()
                        .all()
                        .iter()
                        .find(|k| k.tag.as_str() == name)
                        .map(|k| k.tag.clone())
                })
                .with_context(|| format!("Unknown page kind '{}'", name))?,
        ),
        None => None,
    };

    let rows: Vec<RouteRow> = project
        .routes()
        .all()
        .filter(|r| tag.as_ref().map_or(true, |t| &r.kind().tag == t))
        .map(|r| RouteRow::new(r, config.pretty_urls))
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    let key_width = rows.iter().map(|r| r.key.len()).max().unwrap_or(0).max(5);
    let kind_width = rows.iter().map(|r| r.kind.len()).max().unwrap_or(0).max(4);
    println!(
        "{:<key_width$}  {:<kind_width$}  {:<30}  OUTPUT",
        "ROUTE", "KIND", "SOURCE"
    );
    for row in &rows {
        println!(
            "{:<key_width$}  {:<kind_width$}  {:<30}  {}",
            row.key,
            row.kind,
            row.source.unwrap_or("(virtual)"),
            row.output
        );
    }
    println!("{} routes", rows.len());
    Ok(())
}

/// Print one route; fails with a non-zero exit when the key is unknown.
pub fn show_route(config_path: &Path, key: &str, json: bool) -> Result<()> {
    let (config, project) = load_project(config_path)?;
    let route = project.routes().get(key)?;
    let row = RouteRow::new(route, config.pretty_urls);

    if json {
        #[derive(Serialize)]
        struct RouteDetail<'a> {
            #[serde(flatten)]
            route: RouteRow<'a>,
            front_matter: &'a serde_yaml::Mapping,
        }
        let detail = RouteDetail {
            route: row,
            front_matter: route.page.front_matter.as_mapping(),
        };
        println!("{}", serde_json::to_string_pretty(&detail)?);
        return Ok(());
    }

    println!("route:  {}", row.key);
    println!("title:  {}", row.title);
    println!("kind:   {}", row.kind);
    println!("source: {}", row.source.unwrap_or("(virtual)"));
    println!("output: {}", row.output);
    println!("url:    {}", row.url);
    Ok(())
}
