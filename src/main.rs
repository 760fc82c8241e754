//! Hashmark - render `#`-escaped markup in the terminal.
//!
//! # Usage
//!
//! ```bash
//! hashmark note.txt
//! hashmark --markdown README.md
//! echo '#bHello#b World' | hashmark
//! ```

use std::io::{self, IsTerminal, Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use hashmark::color::Palette;
use hashmark::config::{
    ConfigFlags, ThemeMode, clear_config_flags, global_config_path, load_config_flags,
    local_override_path, save_config_flags,
};
use hashmark::logging::{self, LogConfig};
use hashmark::markdown::{markdown_to_markup, render_markdown};
use hashmark::markup::{
    DEFAULT_POINT_SIZE, Font, MarkupOptions, PlaceholderResolver, ResolverChain, render,
    safe_escape,
};
use hashmark::ui::{AnsiOptions, write_ansi};

/// Render hashmark markup with terminal styles
#[derive(Parser, Debug)]
#[command(name = "hashmark", version, about, long_about = None)]
struct Cli {
    /// Input file; standard input when absent or `-`
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Treat the input as Markdown
    #[arg(long)]
    markdown: bool,

    /// Print the displayed text without styling
    #[arg(long)]
    plain: bool,

    /// Print the input with every `#` escaped
    #[arg(long, conflicts_with_all = ["plain", "to_markup"])]
    escape: bool,

    /// Print the markup produced from Markdown input
    #[arg(long)]
    to_markup: bool,

    /// Disable ANSI colors and attributes
    #[arg(long)]
    no_color: bool,

    /// Color palette to render with
    #[arg(long, value_enum)]
    theme: Option<ThemeMode>,

    /// Base font size in points
    #[arg(long, value_name = "POINTS")]
    font_size: Option<u16>,

    /// Enable debug logging for categories (markup,markdown,params,resolver,cli or all)
    #[arg(long, value_name = "CATEGORIES")]
    log: Option<String>,

    /// Save current command-line flags as defaults
    #[arg(long)]
    save: bool,

    /// Clear saved defaults
    #[arg(long)]
    clear: bool,
}

impl Cli {
    fn flags(&self) -> ConfigFlags {
        ConfigFlags {
            markdown: self.markdown,
            plain: self.plain,
            no_color: self.no_color,
            theme: self.theme,
            font_size: self.font_size,
            log: self.log.clone(),
        }
    }
}

fn read_input(file: Option<&PathBuf>) -> Result<String> {
    match file {
        Some(path) if path.as_os_str() != "-" => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        _ => {
            let mut input = String::new();
            io::stdin()
                .read_to_string(&mut input)
                .context("Failed to read standard input")?;
            Ok(input)
        }
    }
}

fn terminal_width() -> Option<u16> {
    if !io::stdout().is_terminal() {
        return None;
    }
    crossterm::terminal::size().ok().map(|(cols, _)| cols)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = cli.flags();

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);

    let log_config = match effective.log.as_deref() {
        Some(spec) => LogConfig::parse(spec).context("Invalid --log value")?,
        None => LogConfig::default(),
    };
    logging::init(&log_config).context("Failed to initialize logging")?;
    tracing::debug!(target: "hashmark::cli", ?effective, "effective flags");

    let input = read_input(cli.file.as_ref())?;
    let mut stdout = io::stdout().lock();

    if cli.escape {
        writeln!(stdout, "{}", safe_escape(&input)).context("Failed to write output")?;
        return Ok(());
    }
    if cli.to_markup {
        writeln!(stdout, "{}", markdown_to_markup(&input)).context("Failed to write output")?;
        return Ok(());
    }

    let point_size = effective.font_size.map_or(DEFAULT_POINT_SIZE, f32::from);
    let options = MarkupOptions::new(Font::system(point_size))
        .with_fixed_font(Font::monospaced(point_size))
        .with_resolvers(ResolverChain::new().with(PlaceholderResolver));
    let text = if effective.markdown {
        render_markdown(&input, &options)
    } else {
        render(&input, &options)
    };
    for missing in text.unresolved() {
        tracing::debug!(target: "hashmark::cli", name = %missing.name, "unresolved image");
    }

    if effective.plain {
        writeln!(stdout, "{}", text.plain_text()).context("Failed to write output")?;
        return Ok(());
    }

    let palette = Palette::new(effective.theme.unwrap_or(ThemeMode::Auto).appearance());
    let ansi = AnsiOptions {
        color: !effective.no_color && io::stdout().is_terminal(),
        width: terminal_width(),
        points_per_cell: point_size / 2.0,
    };
    tracing::debug!(target: "hashmark::cli", runs = text.runs().len(), ?ansi, "rendering");
    write_ansi(&mut stdout, &text, &palette, &ansi).context("Failed to write output")
}
