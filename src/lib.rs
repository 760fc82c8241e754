// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. markup::MarkupOptions)
    clippy::module_name_repetitions
)]

//! # Hashmark
//!
//! A small `#`-escaped markup language rendered into styled text runs.
//!
//! Markup is plain text where `#` starts a directive: `#b` toggles bold,
//! `#n` breaks the line, `#Lurl text#T` makes a link, `#Sname` embeds a
//! symbol. Hashmark scans it once, left to right, and produces a
//! [`StyledText`](markup::StyledText): a list of runs, each with one
//! resolved style, link and optional image.
//!
//! ## Modules
//!
//! - [`markup`]: Directive scanner, styled runs and symbol resolvers
//! - [`markdown`]: Restricted Markdown rewritten into markup
//! - [`color`]: Named markup colors and light/dark palettes
//! - [`ui`]: Terminal layout, ratatui text and ANSI output
//! - [`params`]: Schema-driven JSON parameters
//! - [`text`]: String conveniences
//! - [`config`]: Saved command-line defaults
//! - [`logging`]: Per-category debug logging

pub mod color;
pub mod config;
pub mod logging;
pub mod markdown;
pub mod markup;
pub mod params;
pub mod text;
pub mod ui;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::color::{Appearance, MarkupColor, Palette, Rgb};
    pub use crate::markdown::{markdown_to_markup, render_markdown};
    pub use crate::markup::{
        Font, MarkupOptions, ResolverChain, Run, StyledText, SymbolResolver, remove_markup,
        render, safe_escape,
    };
    pub use crate::ui::{to_text, write_ansi};
}
