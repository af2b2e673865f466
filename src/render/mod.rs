//! Pure string rendering shared by the generators.
//!
//! - [`escape`]: XML, HTML and inline-script escaping
//! - [`html`]: rich-text document trees to HTML fragments
//! - [`slugify`]: ASCII slugs for archive file names
//!
//! Nothing here performs I/O; the exporter composes these into files.

mod escape;
mod html;
mod slugify;

pub use escape::{escape_html, escape_xml, js_string, js_value};
pub use html::{render_document, render_plain_text};
pub use slugify::slugify;
