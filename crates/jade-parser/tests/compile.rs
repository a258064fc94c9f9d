//! End-to-end tests: template source in, HTML and error count out.

use std::sync::{Arc, Mutex};

use jade_lexer::{LexErrorKind, LexerOptions};
use jade_parser::{compile, compile_bytes, compile_with, Output};
use pretty_assertions::assert_eq;

/// Compile without writing diagnostics to stderr.
fn quiet(source: &str) -> Output {
    compile_with(source, LexerOptions::new().on_error(|_, _| {}))
}

#[test]
fn test_page() {
    let source = "\
html
\thead
\t\ttitle My page
\tbody class=home
\t\th1 Some Big Header
\t\tdiv id=main class='wide dark'
\t\t\tp Hello, World!
\t\t\tp
\t\t\t\t` Second paragraph,
\t\t\t\t` two lines.
\t\tfooter Bye
";
    assert_eq!(
        compile(source).html,
        "<html><head><title>My page</title></head>\
<body class='home'><h1>Some Big Header</h1>\
<div id='main' class='wide dark'><p>Hello, World!</p>\
<p>Second paragraph, two lines.</p></div>\
<footer>Bye</footer></body></html>"
    );
}

#[test]
fn test_line_endings_are_equivalent() {
    let unix = compile("div\n\tp One\n\tp Two").html;
    assert_eq!(compile("div\r\n\tp One\r\n\tp Two").html, unix);
    assert_eq!(compile("div\r\tp One\r\tp Two").html, unix);
}

#[test]
fn test_mixed_tabs_and_spaces() {
    let out = compile("ul\n\tli a\n        li b\n\tli c");
    assert_eq!(out.html, "<ul><li>a</li><li>b</li><li>c</li></ul>");
}

#[test]
fn test_comments_are_ignored() {
    let out = compile("// header comment\ndiv /* inline */ hello\n\t// nested\n\tp x");
    assert_eq!(out.html, "<div>hello<p>x</p></div>");
    assert_eq!(out.error_count, 0);
}

#[test]
fn test_deterministic() {
    let source = "div a=1 b='x y'\n\tp q, r s\n\t\t` t\nspan";
    assert_eq!(compile(source), compile(source));
}

#[test]
fn test_unterminated_string_still_closes_nodes() {
    let out = quiet("div\n\tp title='oops\n\t\tspan x");
    assert_eq!(out.error_count, 1);
    assert_eq!(out.diagnostics[0].kind, LexErrorKind::UnterminatedLiteral);
    assert_eq!(out.html, "<div><p title='oops'><span>x</span></p></div>");
}

#[test]
fn test_unterminated_comment_at_eof() {
    let out = quiet("div\n\tp a /* never closed");
    assert_eq!(out.error_count, 1);
    assert_eq!(out.html, "<div><p>a</p></div>");
}

#[test]
fn test_error_limit_truncates_but_closes() {
    let options = LexerOptions::new().max_errors(0).on_error(|_, _| {});
    let out = compile_with("div\n\tp 0x1 09\n\tp never", options);
    assert_eq!(out.error_count, 2);
    assert_eq!(out.diagnostics[1].kind, LexErrorKind::TooManyErrors);
    assert_eq!(out.html, "<div><p>0x1 09</p></div>");
}

#[test]
fn test_hook_sees_positions() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let options = LexerOptions::new()
        .name("page.jade")
        .on_error(move |pos, kind| sink.lock().unwrap().push(format!("{pos}: {kind}")));
    compile_with("div\n\tp '\\z'", options);
    assert_eq!(
        *seen.lock().unwrap(),
        vec!["page.jade:2:6: illegal char escape".to_string()]
    );
}

#[test]
fn test_invalid_utf8_input() {
    let out = compile_bytes(b"p caf\xE9 au lait", LexerOptions::new().on_error(|_, _| {}));
    assert_eq!(out.error_count, 1);
    assert_eq!(out.html, "<p>caf\u{FFFD} au lait</p>");
}

#[test]
fn test_leading_comment_or_punctuation_keeps_column() {
    assert_eq!(compile("div\n/* c */ p").html, "<div></div><p></p>");
    assert_eq!(compile("div\n| text").html, "<div></div><text></text>");
}

#[test]
fn test_same_column_after_misaligned_dedent() {
    assert_eq!(
        compile("a\n    b\n  c\n  d").html,
        "<a><b></b></a><c></c><d></d>"
    );
}

#[test]
fn test_inline_text_then_text_child() {
    assert_eq!(compile("p Hello\n\t` world").html, "<p>Hello world</p>");
}
