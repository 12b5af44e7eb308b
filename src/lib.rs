// src/lib.rs
//
// adoc-reflow: re-wrap the prose of AsciiDoc-style documents to a column
// width. Headings, fenced blocks, tables, attributes, comments, macros and
// anything else structural come out byte for byte as they went in.
//
// Pipeline, one forward pass per call:
//   classify  line -> LineKind (ordered rule table, first match wins)
//   block     verbatim-block tracking (fences, tables, open and comment blocks)
//   collect   paragraph buffering and list-item lookahead
//   wrap      greedy word wrap with hanging indents
//   scan      the pass itself
//
// `edit` and `config` are for hosts (the CLI, editor integrations).

pub mod block;
pub mod classify;
pub mod collect;
pub mod config;
pub mod edit;
pub mod error;
pub mod scan;
pub mod wrap;

pub use block::BlockState;
pub use classify::{classify, Context, LineKind};
pub use collect::{collect_list_item, ListItem};
pub use config::Config;
pub use error::{ConfigError, Error};
pub use scan::reflow;
pub use wrap::wrap;
