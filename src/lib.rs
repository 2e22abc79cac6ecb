//! # getitems - CSV lookup service
//!
//! getitems reads a CSV file once at startup, indexes every row by its `id`
//! column, and answers `GET /get-items?id=..&id=..` with the matching rows as
//! a JSON array.
//!
//! ## Architecture
//!
//! - [`index`] - Builds the immutable id index, rendering each row to JSON once
//! - [`server`] - Lookup semantics and the HTTP server around them
//! - [`utils`] - Configuration, logging and progress display
//!
//! ## Quick Start
//!
//! ```no_run
//! use getitems::index::build_index;
//! use getitems::server::lookup;
//! use std::path::Path;
//!
//! let index = build_index(Path::new("data.csv")).unwrap();
//! let response = lookup(&index, ["2", "1", "2"]);
//!
//! println!("{}", String::from_utf8_lossy(&response.body));
//! ```
//!
//! ## Response format
//!
//! Rows keep the header's column order. Requested ids are answered in request
//! order, repeats included. If any id is unknown the whole request fails with
//! `404` and the body `id is absent in data`.

pub mod index;
pub mod server;
pub mod utils;
