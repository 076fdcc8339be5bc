mod ast;
mod cursor;
mod diagnostic;
mod emit;
mod parser;
mod position;
mod source;
mod text;
mod validate;

pub use ast::{DOCUMENT_KIND, Options, TEXT_KIND, Tag, TagKind};
pub use diagnostic::{
    CompileError, Diagnostic, DiagnosticKind, E_NESTING_DEPTH, E_OPTION_SYNTAX, E_ROOT_MISSING,
    E_ROOT_MULTIPLE, E_TAG_NAME, E_UNEXPECTED_CLOSE, E_UNEXPECTED_EOF, E_UNEXPECTED_TOKEN,
    ParseError, SourceError, SyntaxError, V_OPTION_REQUIRED, V_OPTION_VALUE, V_ROOT_KIND,
    ValidationError, ValidationErrors,
};
pub use emit::{render, render_sanitized};
pub use parser::{MAX_DEPTH, parse, parse_tree};
pub use position::Position;
pub use source::{ReadOptions, read_source, read_source_from};
pub use text::{compress_spaces, is_whitespace_only, split_words};
pub use validate::validate;

use std::path::Path;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct CompileOptions {
    /// Filter the output through the HTML allow-list.
    pub sanitize: bool,
}

/// Parses, validates and renders a document.
pub fn compile(source: &str) -> Result<String, ParseError> {
    compile_with_options(source, &CompileOptions::default())
}

pub fn compile_with_options(source: &str, options: &CompileOptions) -> Result<String, ParseError> {
    let root = parse(source)?;
    Ok(if options.sanitize {
        render_sanitized(&root)
    } else {
        render(&root)
    })
}

pub fn compile_file(
    path: &Path,
    options: &CompileOptions,
    read_options: &ReadOptions,
) -> Result<String, CompileError> {
    let source = read_source(path, read_options)?;
    Ok(compile_with_options(&source, options)?)
}
