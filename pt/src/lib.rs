//! PromptText - prompt templates in, structured JSON out
//!
//! The two text-processing ends of an LLM call:
//!
//! - [`template`] turns a human-authored markdown prompt document into a
//!   [`PromptTemplate`] with `%{name}` placeholders and renders it against a
//!   variable map.
//! - [`recovery`] turns whatever the model replied into the best JSON text it
//!   can, and [`decode`] decodes that into a [`StructuredResult`].
//!
//! Everything here is pure and synchronous: no I/O, no shared state. All
//! functions are safe to call from any number of threads at once.
//!
//! # Example
//!
//! ```
//! use std::collections::HashMap;
//! use prompttext::{PromptTemplate, decode};
//!
//! let doc = "## Prompt Template\n```\nRate {name}\n```\n## Parameters\n- name\n";
//! let template = PromptTemplate::extract(doc)?;
//! let prompt = template.render(&HashMap::from([("name", "this CV")]))?;
//! assert_eq!(prompt, "Rate this CV");
//!
//! let result = decode("Sure!\n```json\n{\"score\": 8}\n```")?;
//! assert_eq!(result["score"], 8);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod decode;
pub mod error;
pub mod placeholder;
pub mod recovery;
pub mod template;

pub use decode::{StructuredResult, decode, decode_as};
pub use error::{ResponseParseError, TemplateError};
pub use recovery::clean;
pub use template::{PromptTemplate, extract};
