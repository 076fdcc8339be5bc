use pretty_assertions::assert_eq;
use rstest::rstest;
use std::path::Path;
use tagdown_core::{
    CompileError, CompileOptions, E_ROOT_MISSING, E_ROOT_MULTIPLE, ParseError, ReadOptions,
    V_OPTION_REQUIRED, V_OPTION_VALUE, V_ROOT_KIND, compile, compile_file, compile_with_options,
    parse, parse_tree, render,
};

fn validation_codes(source: &str) -> Vec<&'static str> {
    match parse(source) {
        Err(ParseError::Validation(errors)) => errors.0.iter().map(|error| error.code).collect(),
        other => panic!("expected validation errors, got {:?}", other),
    }
}

#[test]
fn heading_defaults_match_explicit_options() {
    let implicit = compile("@main{@heading{Title}}").expect("valid");
    let explicit = compile(r#"@main{@heading(level: "1", alignment: "left"){Title}}"#).expect("valid");
    assert_eq!(implicit, explicit);
}

#[rstest]
#[case("", E_ROOT_MISSING, "no root tag found")]
#[case("   \n  ", E_ROOT_MISSING, "no root tag found")]
#[case("@a{}@b{}", E_ROOT_MULTIPLE, "multiple root tags found")]
#[case("@main{} trailing", E_ROOT_MULTIPLE, "multiple root tags found")]
fn single_root_is_enforced(
    #[case] source: &str,
    #[case] code: &str,
    #[case] message: &str,
) {
    let error = parse_tree(source).expect_err("root count error");
    assert_eq!(error.code, code);
    assert!(error.to_string().contains(message), "{}", error);
}

#[test]
fn root_kind_is_checked_after_parsing() {
    assert!(parse_tree("@notmain{}").is_ok());
    let error = parse("@notmain{}").expect_err("wrong root");
    assert_eq!(
        error.to_string(),
        "Validation Error: root tag must be @main (line 1, column 1)"
    );
    assert_eq!(validation_codes("@notmain{}"), vec![V_ROOT_KIND]);
}

#[test]
fn escaped_line_break_renders_one_break() {
    let html = compile(r"@main{a\nb}").expect("valid");
    assert_eq!(html.matches("<br/>").count(), 1);
    assert!(html.contains("a<br/>b"));
}

#[test]
fn escaped_backslash_renders_literally() {
    let html = compile(r"@main{a\\b}").expect("valid");
    assert_eq!(html, "<div class=\"main-tag\">a\\b</div>");
}

#[rstest]
#[case("@main{@image(){}}", V_OPTION_REQUIRED, "uri parameter is required")]
#[case("@main{@link{x}}", V_OPTION_REQUIRED, "uri parameter is required")]
#[case(r#"@main{@list(style: "bogus"){}}"#, V_OPTION_VALUE, "style must be: unordered, ordered")]
#[case(r#"@main{@paragraph(alignment: "top"){}}"#, V_OPTION_VALUE, "alignment must be: left, right, center")]
#[case(r#"@main{@heading(level: "6"){}}"#, V_OPTION_VALUE, "level must be: 1, 2, 3, 4, 5")]
fn structural_rules_reject(#[case] source: &str, #[case] code: &str, #[case] message: &str) {
    let error = parse(source).expect_err("invalid document");
    assert_eq!(validation_codes(source), vec![code]);
    assert!(error.to_string().contains(message), "{}", error);
}

#[test]
fn image_with_uri_renders() {
    let html = compile(r#"@main{@image(uri: "x.png"){}}"#).expect("valid");
    assert!(html.contains(r#"<img src="x.png" class="rounded mx-auto d-block" >"#));
}

#[test]
fn ordered_list_wraps_items() {
    let html = compile(r#"@main{@list(style: "ordered"){@text1{}}}"#).expect("valid");
    assert_eq!(
        html,
        "<div class=\"main-tag\"><ol><li><span></span></li></ol></div>"
    );
}

#[test]
fn error_position_is_reported_one_based() {
    let source = "@main{\n  first\n    @b${}\n}";
    let error = parse(source).expect_err("bad name");
    assert_eq!(
        error.to_string(),
        "Syntax Error: invalid tag name `b$` (line 3, column 8)"
    );
    let source = "@main{\nfoo\n@ba x{}}";
    let error = parse(source).expect_err("bad token");
    assert!(error.to_string().ends_with("(line 3, column 5)"), "{}", error);
}

#[test]
fn all_violations_are_reported_together() {
    let source = "@page{\n@image{}\n@list(style: \"x\"){@link{y}}}";
    let error = parse(source).expect_err("invalid");
    let text = error.to_string();
    assert_eq!(text.lines().count(), 4);
    assert!(text.lines().all(|line| line.starts_with("Validation Error: ")));
    assert_eq!(error.diagnostics().len(), 4);
}

#[test]
fn duplicate_options_keep_the_last_value() {
    let html = compile(r#"@main{@heading(level: "2", level: "3"){t}}"#).expect("valid");
    assert_eq!(html, "<div class=\"main-tag\"><p class=\"h3 text-left\">t</p></div>");
}

#[test]
fn html_in_text_is_passed_through_unless_sanitized() {
    let source = "@main{<b onclick=\"x()\">hi</b>}";
    let raw = compile(source).expect("valid");
    assert!(raw.contains("onclick"));

    let options = CompileOptions { sanitize: true };
    let clean = compile_with_options(source, &options).expect("valid");
    assert!(!clean.contains("onclick"));
    assert!(clean.contains("hi"));
}

#[test]
fn render_is_deterministic() {
    let root = parse(r#"@main{@font(size: "9", color: "red"){a}@columns{@bold{b}}}"#).expect("valid");
    assert_eq!(render(&root), render(&root.clone()));
}

#[test]
fn compile_file_reads_and_compiles() {
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../tests/fixtures");
    let html = compile_file(
        &fixtures.join("escapes.tgd"),
        &CompileOptions::default(),
        &ReadOptions::default(),
    )
    .expect("valid fixture");
    assert!(html.starts_with("<div class=\"main-tag\">"));

    match compile_file(
        &fixtures.join("unterminated.tgd"),
        &CompileOptions::default(),
        &ReadOptions::default(),
    ) {
        Err(CompileError::Parse(ParseError::Syntax(error))) => {
            assert_eq!(error.message, "unexpected end of content");
        }
        other => panic!("expected a syntax error, got {:?}", other),
    }

    let missing = compile_file(
        &fixtures.join("missing.tgd"),
        &CompileOptions::default(),
        &ReadOptions::default(),
    );
    assert!(matches!(missing, Err(CompileError::Source(_))));
}
