//! Debug logging configuration.
//!
//! Debug output is grouped into categories that can be switched on one by
//! one. The selection lives in a [`LogConfig`] built once at startup and
//! handed to [`init`]; nothing in the library reads a global log level.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::{Directive, ParseError};

#[derive(Debug, Error)]
pub enum LogError {
    #[error("unknown log category `{0}` (expected markup, markdown, params, resolver, cli or all)")]
    UnknownCategory(String),

    #[error("invalid filter directive")]
    Directive(#[from] ParseError),

    #[error("failed to install log subscriber: {0}")]
    Init(String),
}

/// A subsystem whose debug output can be enabled separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    Markup,
    Markdown,
    Params,
    Resolver,
    Cli,
}

impl Category {
    pub const ALL: [Self; 5] = [
        Self::Markup,
        Self::Markdown,
        Self::Params,
        Self::Resolver,
        Self::Cli,
    ];

    /// The `tracing` target prefix this category covers.
    pub const fn target(self) -> &'static str {
        match self {
            Self::Markup => "hashmark::markup",
            Self::Markdown => "hashmark::markdown",
            Self::Params => "hashmark::params",
            Self::Resolver => "hashmark::markup::resolver",
            Self::Cli => "hashmark::cli",
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Markup => "markup",
            Self::Markdown => "markdown",
            Self::Params => "params",
            Self::Resolver => "resolver",
            Self::Cli => "cli",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Category {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| LogError::UnknownCategory(s.to_string()))
    }
}

/// Which categories log at debug level, and the level for everything else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub level: Level,
    categories: BTreeSet<Category>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::WARN,
            categories: BTreeSet::new(),
        }
    }
}

impl LogConfig {
    /// Parse a comma-separated category list such as `markup,params` or `all`.
    pub fn parse(spec: &str) -> Result<Self, LogError> {
        let mut config = Self::default();
        for item in spec.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            if item.eq_ignore_ascii_case("all") {
                config.categories.extend(Category::ALL);
            } else {
                config.categories.insert(item.parse()?);
            }
        }
        Ok(config)
    }

    #[must_use]
    pub fn with_category(mut self, category: Category) -> Self {
        self.categories.insert(category);
        self
    }

    #[must_use]
    pub const fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    pub fn is_enabled(&self, category: Category) -> bool {
        self.categories.contains(&category)
    }

    pub fn categories(&self) -> impl Iterator<Item = Category> + '_ {
        self.categories.iter().copied()
    }

    /// Any category enabled; log lines then carry file and line.
    pub fn is_verbose(&self) -> bool {
        !self.categories.is_empty()
    }

    /// Build the filter: `base` plus a debug directive per enabled category.
    pub fn filter_with(&self, base: EnvFilter) -> Result<EnvFilter, LogError> {
        let mut filter = base.add_directive(Directive::from(self.level));
        for category in &self.categories {
            let directive: Directive = format!("{}=debug", category.target()).parse()?;
            filter = filter.add_directive(directive);
        }
        Ok(filter)
    }

    pub fn filter(&self) -> Result<EnvFilter, LogError> {
        self.filter_with(EnvFilter::default())
    }
}

/// Install the global `tracing` subscriber, writing to stderr.
///
/// `RUST_LOG` directives are honored in addition to the configuration.
pub fn init(config: &LogConfig) -> Result<(), LogError> {
    let filter = config.filter_with(EnvFilter::from_default_env())?;
    let verbose = config.is_verbose();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_file(verbose)
        .with_line_number(verbose)
        .with_target(verbose)
        .try_init()
        .map_err(|err| LogError::Init(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_parse_categories() {
        let config = LogConfig::parse("markup, Params").unwrap();
        assert!(config.is_enabled(Category::Markup));
        assert!(config.is_enabled(Category::Params));
        assert!(!config.is_enabled(Category::Markdown));
        assert!(config.is_verbose());
    }

    #[test]
    fn test_parse_all() {
        let config = LogConfig::parse("all").unwrap();
        assert_eq!(config.categories().count(), Category::ALL.len());
    }

    #[test]
    fn test_parse_empty_is_quiet() {
        let config = LogConfig::parse(" , ").unwrap();
        assert_eq!(config, LogConfig::default());
        assert!(!config.is_verbose());
    }

    #[test]
    fn test_unknown_category_is_error() {
        let err = LogConfig::parse("markup,bogus").unwrap_err();
        assert!(matches!(err, LogError::UnknownCategory(ref name) if name == "bogus"));
    }

    #[test]
    fn test_filter_contains_category_targets() {
        let config = LogConfig::default()
            .with_category(Category::Markdown)
            .with_level(Level::INFO);
        let filter = config.filter().unwrap().to_string();
        assert!(filter.contains("hashmark::markdown=debug"), "{filter}");
        assert!(filter.contains("info"), "{filter}");
    }

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl Captured {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    fn scan_with(config: &LogConfig) -> String {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(config.filter().unwrap())
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();
        tracing::subscriber::with_default(subscriber, || {
            crate::markup::remove_markup("#x");
        });
        captured.text()
    }

    #[test]
    fn test_markup_category_shows_scanner_events() {
        let output = scan_with(&LogConfig::parse("markup").unwrap());
        assert!(output.contains("unknown directive kept literal"), "{output}");
        assert!(output.contains("markup scanned"), "{output}");
    }

    #[test]
    fn test_scanner_events_hidden_by_default() {
        assert_eq!(scan_with(&LogConfig::default()), "");
        assert_eq!(scan_with(&LogConfig::parse("params").unwrap()), "");
    }

    #[test]
    fn test_category_round_trips_through_name() {
        for category in Category::ALL {
            assert_eq!(category.name().parse::<Category>().unwrap(), category);
        }
    }
}
