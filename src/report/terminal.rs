use anyhow::Result;
use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, ContentArrangement, Table};

use crate::graph::DependencyGraph;
use crate::models::DependencyRecord;

use super::listing;

/// How `--build-graph` prints the graph to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphStyle {
    Flat,
    Tree,
    Json,
}

fn heading(title: &str) {
    println!("\n{}", title.bold());
}

/// `- group:artifact:version` per declared dependency.
pub fn direct_dependency_lines(deps: &[DependencyRecord]) -> Vec<String> {
    deps.iter().map(|d| format!("- {}", d.coordinates())).collect()
}

pub fn print_direct_dependencies(deps: Option<&[DependencyRecord]>) {
    let Some(deps) = deps else {
        println!("{}", "unable to load dependencies".yellow());
        return;
    };

    heading("Direct dependencies:");
    for line in direct_dependency_lines(deps) {
        println!("{}", line);
    }
}

pub fn print_graph(graph: &DependencyGraph, root: &str, style: GraphStyle) -> Result<()> {
    match style {
        GraphStyle::Flat => {
            heading("Dependency graph:");
            println!("{}", listing::render_flat(graph));
        }
        GraphStyle::Tree => {
            heading("Dependency tree:");
            println!("{}", listing::render_tree(graph, root));
        }
        GraphStyle::Json => {
            println!("{}", serde_json::to_string_pretty(graph)?);
        }
    }
    Ok(())
}

pub fn print_load_order(order: &[String], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(order)?);
        return Ok(());
    }

    heading("Load order:");
    if order.is_empty() {
        println!("no dependencies found");
    } else {
        for key in order {
            println!("{}", key);
        }
    }
    Ok(())
}

/// Key/value table of the effective parameters; unset values are blank.
pub fn parameter_table(params: &[(&str, Option<String>)]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Parameter").add_attribute(Attribute::Bold),
            Cell::new("Value").add_attribute(Attribute::Bold),
        ]);

    for (key, value) in params {
        table.add_row(vec![
            Cell::new(key),
            Cell::new(value.as_deref().unwrap_or("")),
        ]);
    }
    table
}

pub fn print_parameters(params: &[(&str, Option<String>)]) {
    heading("Parameters (key - value):");
    println!("{}", parameter_table(params));
}

/// Report a failed output write without aborting the run.
pub fn print_write_failure(what: &str, err: &anyhow::Error) {
    eprintln!("{} error writing {} file: {:#}", "✗".red(), what, err);
}
