//! `termlink_core` turns delimiter-bounded spans in prose into hyperlinks.
//! Authors write `{Discord}` or `{libs:Serde}` and the annotator replaces every
//! span that names a known term with a link, leaving everything else exactly
//! as written.
//!
//! ## Processing Pipeline
//!
//! ```text
//! termlink.toml (+ term files)
//!   → Dictionary (delimiters + sources, built once, read-only)
//! Text run
//!   → Scanner (finds `{term}` / `{source:term}` spans)
//!   → Dictionary::resolve (global or prefixed lookup, class list)
//!   → annotate (text and link fragments)
//!   → transform (splices fragments into the host tree)
//! ```
//!
//! ## Modules
//!
//! - [`config`]: Loading `termlink.toml` and term files (JSON, TOML, YAML).
//! - [`tree`]: The [`Node`](tree::Node) capability and the already-linked
//!   guard.
//! - [`document`]: An arena document tree implementing [`tree::Node`].
//! - [`markdown`]: Building a [`Document`](document::Document) from markdown
//!   and splicing links back into the source.
//! - [`transform`]: Annotating every eligible text node of a document.
//!
//! ## Quick Start
//!
//! ```rust
//! use termlink_core::Dictionary;
//! use termlink_core::Fragment;
//! use termlink_core::TermEntry;
//! use termlink_core::annotate;
//!
//! let dictionary = Dictionary::builder()
//! 	.entry(
//! 		"global",
//! 		TermEntry::new("discord", ["Discord"], "https://discord.com"),
//! 	)
//! 	.build()
//! 	.unwrap();
//!
//! let fragments = annotate("Join us on {discord}!", &dictionary);
//! assert_eq!(fragments.len(), 3);
//! assert!(matches!(&fragments[1], Fragment::Link(link) if link.text == "discord"));
//! ```

pub use annotate::*;
pub use dictionary::*;
pub use error::*;
pub use scanner::*;

mod annotate;
pub mod config;
mod dictionary;
pub mod document;
#[allow(unused_assignments)]
mod error;
pub mod markdown;
mod scanner;
pub mod transform;
pub mod tree;
