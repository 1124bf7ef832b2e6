//! Renderers for dependency graphs and console output.
//!
//! - [`listing`] — flat `node - deps` listing and the indented ASCII tree.
//! - [`plantuml`] — deterministic PlantUML description of the graph.
//! - [`svg`] — leveled SVG diagram laid out breadth-first from the root.
//! - [`terminal`] — colored console sections, JSON output and the parameter table.

pub mod listing;
pub mod plantuml;
pub mod svg;
pub mod terminal;
