//! The `#` inline markup language.
//!
//! `#` is the escape character. The character after it selects a directive:
//!
//! - `#b` / `#i` toggle bold and italic
//! - `#h` and `##` produce a literal `#`
//! - `#n` is a newline and `#t` a tab (literal `\n` and `\t` also work)
//! - `#+ #- #) #( #] #[` change the point size by 1, 2 or 4
//! - `#X` switches to the fixed-width font, `#P` pops back
//! - `#D #! #U #K #E` are appearance-aware colors; `#0 #O #G #A #R #B #C #Y
//!   #N #M #W` are black, orange, green, gray, red, blue, cyan, yellow,
//!   brown, magenta and white
//! - `#> #<` move the indent, `#~ #.` move the second tab stop, `#2` hangs
//!   the indent on the second tab stop and `#|` centers
//! - `#Lhttp://apple.com Text#T` is a link; the URL ends at the space
//! - `#Sname` inserts a named symbol and `#Fname` a bundled image
//!
//! Rendering never fails. Anything that is not a complete directive is kept
//! as literal text, and symbols no resolver knows are listed in
//! [`StyledText::unresolved`].
//!
//! # Example
//!
//! ```
//! use hashmark::markup::{render, Font, MarkupOptions};
//!
//! let text = render("#bHello#b World", &MarkupOptions::new(Font::system(12.0)));
//! assert_eq!(text.runs()[0].text(), "Hello");
//! assert!(text.runs()[0].is_bold());
//! assert_eq!(text.plain_text(), "Hello World");
//! ```

mod directive;
mod resolver;
mod scanner;
mod types;

pub use directive::{Directive, ESCAPE};
pub use resolver::{
    CatalogResolver, PlaceholderResolver, ResolverChain, SymbolRequest, SymbolResolver,
};
pub use types::{
    DEFAULT_POINT_SIZE, Font, Image, ImageKind, MIN_POINT_SIZE, ParagraphStyle, Run, RunStyle,
    StyledText, Unresolved,
};

use crate::color::MarkupColor;

/// Fonts and resolvers used for one render.
#[derive(Debug, Clone, Default)]
pub struct MarkupOptions {
    /// Base font; size directives are relative to it.
    pub font: Font,
    /// Family used by `#X`. Its size is ignored: the fixed font always takes
    /// the current point size.
    pub fixed_font: Option<Font>,
    pub resolvers: ResolverChain,
}

impl MarkupOptions {
    pub fn new(font: Font) -> Self {
        Self {
            font,
            fixed_font: None,
            resolvers: ResolverChain::new(),
        }
    }

    #[must_use]
    pub fn with_fixed_font(mut self, font: Font) -> Self {
        self.fixed_font = Some(font);
        self
    }

    #[must_use]
    pub fn with_resolvers(mut self, resolvers: ResolverChain) -> Self {
        self.resolvers = resolvers;
        self
    }
}

/// Render markup into styled runs.
pub fn render(input: &str, options: &MarkupOptions) -> StyledText {
    scanner::Scanner::new(input, options).run()
}

impl StyledText {
    pub fn from_markup(input: &str, options: &MarkupOptions) -> Self {
        render(input, options)
    }
}

/// Escape every `#` so `text` renders exactly as written.
pub fn safe_escape(text: &str) -> String {
    text.replace(ESCAPE, "##")
}

/// Strip all markup, keeping only the text it would display.
///
/// Symbols and images are dropped.
pub fn remove_markup(text: &str) -> String {
    render(text, &MarkupOptions::default()).plain_text()
}

/// A styled text holding just the named symbol at `font`'s size.
///
/// The result is empty, with the name in [`StyledText::unresolved`], when no
/// resolver knows the symbol.
pub fn symbol_text(
    name: &str,
    font: &Font,
    color: Option<MarkupColor>,
    resolvers: &ResolverChain,
) -> StyledText {
    single_image(name, ImageKind::Symbol, font, color, resolvers)
}

/// A styled text holding just the named bundled image at `font`'s size.
pub fn image_text(name: &str, font: &Font, resolvers: &ResolverChain) -> StyledText {
    single_image(name, ImageKind::Bundled, font, None, resolvers)
}

fn single_image(
    name: &str,
    kind: ImageKind,
    font: &Font,
    color: Option<MarkupColor>,
    resolvers: &ResolverChain,
) -> StyledText {
    let mut style = RunStyle::plain(font.clone());
    style.color = color;
    let request = SymbolRequest {
        name,
        kind,
        point_size: font.size,
        bold: false,
        color,
    };
    match resolvers.resolve(&request) {
        Some(image) => {
            StyledText::from_parts(vec![Run::attachment(image, style, None)], Vec::new())
        }
        None => StyledText::from_parts(
            Vec::new(),
            vec![Unresolved {
                name: name.to_string(),
                kind,
                offset: 0,
            }],
        ),
    }
}
