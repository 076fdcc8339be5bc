//! `tagdown`: compiles a tagdown document to HTML.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use serde::Serialize;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

use tagdown_core::{
    CompileOptions, Diagnostic, ParseError, ReadOptions, SourceError, compile_with_options,
    parse_tree, read_source, read_source_from,
};
use tagdown_renderer::{Renderer, Theme};

/// Compile a tagdown document into HTML
#[derive(Parser)]
#[command(name = "tagdown")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Document to compile (reads stdin when omitted)
    input: Option<PathBuf>,

    /// Filter the output through the HTML allow-list
    #[arg(long)]
    sanitized: bool,

    /// Print the bare HTML fragment instead of a full page
    #[arg(long)]
    raw: bool,

    /// Colour theme of the page wrapper
    #[arg(long, value_enum, default_value_t = ThemeArg::Auto)]
    theme: ThemeArg,

    /// Link the Bootstrap stylesheet from the page wrapper
    #[arg(long)]
    bootstrap: bool,

    /// Write the stylesheet to this directory instead of inlining it
    #[arg(long, value_name = "DIR")]
    assets_dir: Option<PathBuf>,

    /// Format of rejected-document diagnostics on stderr
    #[arg(long, value_enum, default_value_t = DiagnosticsMode::Pretty)]
    diagnostics: DiagnosticsMode,

    /// Print the parsed tag tree instead of HTML (no validation)
    #[arg(long)]
    tree: bool,

    /// Maximum number of input bytes read
    #[arg(long, value_name = "N")]
    max_bytes: Option<usize>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum ThemeArg {
    Auto,
    Light,
    Dark,
}

impl From<ThemeArg> for Theme {
    fn from(value: ThemeArg) -> Self {
        match value {
            ThemeArg::Auto => Theme::Auto,
            ThemeArg::Light => Theme::Light,
            ThemeArg::Dark => Theme::Dark,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum DiagnosticsMode {
    Pretty,
    Json,
}

#[derive(Serialize)]
struct JsonDiagnostic<'a> {
    kind: &'static str,
    code: &'static str,
    message: &'a str,
    line: usize,
    column: usize,
    offset: usize,
}

impl<'a> From<&'a Diagnostic> for JsonDiagnostic<'a> {
    fn from(diagnostic: &'a Diagnostic) -> Self {
        Self {
            kind: diagnostic.kind.as_str(),
            code: diagnostic.code,
            message: &diagnostic.message,
            line: diagnostic.position.line + 1,
            column: diagnostic.position.column + 1,
            offset: diagnostic.position.offset,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let mut read_options = ReadOptions::default();
    if let Some(max_bytes) = cli.max_bytes {
        read_options.max_bytes = max_bytes;
    }

    let source = match read_input(cli.input.as_ref(), &read_options) {
        Ok(source) => source,
        Err(err) => {
            error!("{}", err);
            return ExitCode::from(2);
        }
    };

    if cli.tree {
        return match parse_tree(&source) {
            Ok(root) => {
                print!("{}", root);
                ExitCode::SUCCESS
            }
            Err(err) => {
                emit_diagnostics(&ParseError::from(err), cli.diagnostics);
                ExitCode::from(1)
            }
        };
    }

    let options = CompileOptions {
        sanitize: cli.sanitized,
    };
    let fragment = match compile_with_options(&source, &options) {
        Ok(fragment) => fragment,
        Err(err) => {
            emit_diagnostics(&err, cli.diagnostics);
            return ExitCode::from(1);
        }
    };
    debug!(bytes = fragment.len(), "compiled document");

    if cli.raw {
        println!("{}", fragment);
        return ExitCode::SUCCESS;
    }

    let mut renderer = Renderer::new(cli.theme.into());
    if cli.bootstrap {
        renderer = renderer.with_bootstrap();
    }
    if let Some(title) = cli
        .input
        .as_ref()
        .and_then(|path| path.file_stem())
        .and_then(|stem| stem.to_str())
    {
        renderer = renderer.with_title(title);
    }

    let inline_css = match &cli.assets_dir {
        Some(dir) => {
            if let Err(err) = renderer.generate_files(dir) {
                error!("failed to write assets to {}: {}", dir.display(), err);
                return ExitCode::from(2);
            }
            renderer = renderer.with_stylesheet(dir.join("tagdown.css").display().to_string());
            false
        }
        None => true,
    };

    print!("{}", renderer.embed_html(&fragment, inline_css));
    ExitCode::SUCCESS
}

fn read_input(input: Option<&PathBuf>, options: &ReadOptions) -> Result<String, SourceError> {
    match input {
        Some(path) => read_source(path, options),
        None => read_source_from(io::stdin().lock(), options),
    }
}

fn emit_diagnostics(err: &ParseError, mode: DiagnosticsMode) {
    match mode {
        DiagnosticsMode::Pretty => eprintln!("{}", err),
        DiagnosticsMode::Json => {
            let diagnostics = err.diagnostics();
            let json: Vec<JsonDiagnostic<'_>> = diagnostics.iter().map(JsonDiagnostic::from).collect();
            match serde_json::to_string_pretty(&json) {
                Ok(text) => eprintln!("{}", text),
                Err(err) => error!("failed to serialize diagnostics: {}", err),
            }
        }
    }
}
