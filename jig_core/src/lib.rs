//! `jig_core` provides [`Jig`], a persistent string template made of content
//! interleaved with named gaps. Gaps are plugged with text, values, other
//! jigs, more gaps or deferred computations, producing new jigs until every
//! gap is closed and the result is rendered.
//!
//! ## Structure
//!
//! ```text
//! cell  gap  cell  gap  cell
//!  0     1    2     3    4      <- logical positions
//! ```
//!
//! A jig always has one more content cell than it has gaps. Plugging a gap
//! merges the replacement into the two cells around it, so a jig never
//! nests: every gap of a plugged-in jig becomes a gap of the host.
//!
//! ## Modules
//!
//! - [`config`] loads `jig.toml`: a default template, fill values and files
//!   whose text plugs a gap.
//! - [`document`] decodes JSON, TOML and YAML documents into items and
//!   jigs.
//!
//! ## Key Types
//!
//! - [`Jig`] is the template value. Methods taking `&self` return a new
//!   jig. The `_in_place` variants change the receiver.
//! - [`Gap`] is a named position, optionally with a transform applied to
//!   its replacement.
//! - [`Item`] is anything that can be pushed into a jig or plugged into a
//!   gap.
//! - [`JigError`] covers slicing, replication, positional plugging, thunk
//!   and document errors.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::collections::HashMap;
//!
//! use jig_core::Item;
//! use jig_core::Jig;
//! use jig_core::gap;
//! use jig_core::jig;
//!
//! let page = jig!["<h1>", gap("title"), "</h1><ul>", gap("items"), "</ul>"];
//! let row = jig!["<li>", Jig::new(), "</li>"];
//!
//! let values = HashMap::from([
//! 	("title", Item::from("Fruit")),
//! 	("items", Item::from(row.repeat_each(["apple", "pear"]))),
//! ]);
//!
//! let filled = page.fill(&values);
//! assert!(filled.is_closed());
//! assert_eq!(
//! 	filled.render().unwrap(),
//! 	"<h1>Fruit</h1><ul><li>apple</li><li>pear</li></ul>"
//! );
//! ```

pub use config::*;
pub use error::*;
pub use gap::*;
pub use item::*;
pub use jig::*;
pub use position::SliceRange;
pub use splice::GapValues;

pub mod config;
pub mod document;
#[allow(unused_assignments)]
mod error;
mod gap;
mod item;
mod jig;
mod position;
mod render;
mod repeat;
mod splice;

#[cfg(test)]
mod __fixtures;
#[cfg(test)]
mod __tests;
