//! Abovesaid Server Library
//!
//! Highlights the important passages of a web page and fact-checks the
//! factual ones. The main server binary is in main.rs.
//!
//! # Modules
//!
//! - `dom`: arena document tree the highlighter works on
//! - `highlight`: offset indexing, rendering and stripping of highlights
//! - `html`: parsing and serializing page HTML
//! - `analysis`: classifier and fact-checker clients
//! - `db` / `pages`: per-page highlight storage
//! - `routes`: the HTTP API

pub mod analysis;
pub mod config;
pub mod db;
pub mod dom;
pub mod error;
pub mod highlight;
pub mod html;
pub mod pages;
pub mod routes;
pub mod state;
