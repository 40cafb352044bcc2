use tomlbind_core::{parse, parse_with, Config, Error, Offset, ValueKind};

/// Helper: parse and return the single value stored under `v`.
fn value_of(source: &str) -> ValueKind {
    let doc = parse(source).unwrap_or_else(|e| panic!("parse failed for {source:?}: {e}"));
    doc.root()
        .value("v")
        .unwrap_or_else(|| panic!("no value `v` in {source:?}"))
        .kind
        .clone()
}

fn string_of(source: &str) -> String {
    match value_of(source) {
        ValueKind::String(s) => s,
        other => panic!("expected string, got {other:?}"),
    }
}

fn syntax_error(source: &str) -> (usize, String) {
    match parse(source) {
        Err(Error::Syntax { line, message }) => (line, message),
        other => panic!("expected syntax error for {source:?}, got {other:?}"),
    }
}

// ============================================================================
// Document structure
// ============================================================================

#[test]
fn empty_document() {
    let doc = parse("").unwrap();
    assert!(doc.root().is_empty());
}

#[test]
fn comments_and_blank_lines_only() {
    let doc = parse("# heading\n\n   \n\t# indented comment\n").unwrap();
    assert!(doc.root().is_empty());
}

#[test]
fn crlf_line_endings() {
    let doc = parse("a = 1\r\nb = 2\r\n").unwrap();
    assert_eq!(doc.root().value("b").unwrap().line, 2);
}

#[test]
fn lone_carriage_return_is_rejected() {
    let (line, message) = syntax_error("a = 1\rb = 2");
    assert_eq!(line, 1);
    assert!(message.contains("U+000D"), "{message}");
}

#[test]
fn byte_order_mark_is_skipped() {
    let doc = parse("\u{feff}a = 1").unwrap();
    assert_eq!(doc.root().value("a").unwrap().as_integer(), Some(1));
}

#[test]
fn two_expressions_on_one_line_are_rejected() {
    let (line, message) = syntax_error("a = 1 b = 2");
    assert_eq!(line, 1);
    assert!(message.contains("expected newline"), "{message}");
}

#[test]
fn trailing_comment_after_value() {
    let doc = parse("a = 1 # one\nb = 2").unwrap();
    assert_eq!(doc.root().len(), 2);
}

#[test]
fn key_order_is_preserved() {
    let doc = parse("zeta = 1\nalpha = 2\nmid = 3").unwrap();
    let keys: Vec<_> = doc.root().iter().map(|(k, _)| k).collect();
    assert_eq!(keys, ["zeta", "alpha", "mid"]);
}

#[test]
fn missing_equals_sign() {
    let (_, message) = syntax_error("a 1");
    assert!(message.contains("`=`"), "{message}");
}

#[test]
fn error_line_points_at_failing_line() {
    let (line, _) = syntax_error("a = 1\nb = 2\nc = @\n");
    assert_eq!(line, 3);
}

// ============================================================================
// Keys
// ============================================================================

#[test]
fn bare_keys_allow_dash_and_underscore() {
    let doc = parse("bare-key_1 = 1\n1234 = 2").unwrap();
    assert!(doc.root().value("bare-key_1").is_some());
    assert!(doc.root().value("1234").is_some());
}

#[test]
fn quoted_keys() {
    let doc = parse("\"127.0.0.1\" = 1\n\"ʎǝʞ\" = 2\n'key2' = 3\n\"a\\tb\" = 4").unwrap();
    assert!(doc.root().value("127.0.0.1").is_some());
    assert!(doc.root().value("ʎǝʞ").is_some());
    assert!(doc.root().value("key2").is_some());
    assert!(doc.root().value("a\tb").is_some());
}

#[test]
fn multiline_string_key_is_rejected() {
    let (_, message) = syntax_error("\"\"\"k\"\"\" = 1");
    assert!(message.contains("multi-line"), "{message}");
}

#[test]
fn header_segments_may_be_spaced_and_quoted() {
    let doc = parse("[ dog . \"tater.man\" ]\ntype = \"pug\"").unwrap();
    let dog = doc.root().table("dog").unwrap();
    assert!(dog.table("tater.man").unwrap().value("type").is_some());
}

#[test]
fn empty_header_is_rejected() {
    let (_, message) = syntax_error("[]");
    assert!(message.contains("a key"), "{message}");
}

#[test]
fn unterminated_header() {
    let (_, message) = syntax_error("[a");
    assert_eq!(message, "unterminated table header");
}

#[test]
fn array_table_header_needs_double_bracket() {
    let (_, message) = syntax_error("[[a]\n");
    assert!(message.contains("`]]`"), "{message}");
}

#[test]
fn empty_header_segment_is_rejected() {
    let (line, message) = syntax_error("x = 1\n[a..b]");
    assert_eq!(line, 2);
    assert!(message.starts_with("expected a key"), "{message}");
}

#[test]
fn leading_dot_in_header_is_rejected() {
    let (line, message) = syntax_error("[.a]");
    assert_eq!(line, 1);
    assert!(message.starts_with("expected a key"), "{message}");
}

#[test]
fn trailing_dot_in_header_is_rejected() {
    let (line, message) = syntax_error("\n\n[a.]");
    assert_eq!(line, 3);
    assert!(message.starts_with("expected a key"), "{message}");
}

#[test]
fn missing_key_before_equals() {
    let (line, message) = syntax_error("a = 1\n= 1");
    assert_eq!(line, 2);
    assert!(message.starts_with("expected a key"), "{message}");
}

#[test]
fn header_must_end_its_line() {
    let (line, message) = syntax_error("[a] b = 1");
    assert_eq!(line, 1);
    assert!(message.starts_with("expected newline"), "{message}");
}

// ============================================================================
// Strings
// ============================================================================

#[test]
fn basic_string_escapes() {
    assert_eq!(
        string_of(r#"v = "tab\there \"quoted\" back\\slash \/ \b\f\r\n""#),
        "tab\there \"quoted\" back\\slash / \u{8}\u{c}\r\n"
    );
}

#[test]
fn unicode_escapes() {
    assert_eq!(string_of(r#"v = "\u00E9 \U0001F600""#), "é 😀");
}

#[test]
fn invalid_escape_is_rejected() {
    let (_, message) = syntax_error(r#"v = "\q""#);
    assert!(message.contains("invalid escape"), "{message}");
}

#[test]
fn surrogate_unicode_escape_is_rejected() {
    let (_, message) = syntax_error(r#"v = "\uD800""#);
    assert!(message.contains("invalid unicode scalar"), "{message}");
}

#[test]
fn short_unicode_escape_is_rejected() {
    let (_, message) = syntax_error(r#"v = "\u12""#);
    assert!(message.contains("4 hex digits"), "{message}");
}

#[test]
fn unterminated_basic_string() {
    let (_, message) = syntax_error("v = \"abc");
    assert_eq!(message, "unterminated string");
}

#[test]
fn newline_in_basic_string_is_rejected() {
    let (_, message) = syntax_error("v = \"abc\ndef\"");
    assert!(message.contains("newline"), "{message}");
}

#[test]
fn control_character_in_string_is_rejected() {
    let (_, message) = syntax_error("v = \"a\u{1}b\"");
    assert!(message.contains("U+0001"), "{message}");
}

#[test]
fn literal_string_keeps_backslashes() {
    assert_eq!(string_of(r"v = 'C:\Users\nodejs'"), r"C:\Users\nodejs");
}

#[test]
fn multiline_basic_trims_first_newline() {
    assert_eq!(string_of("v = \"\"\"\nRoses\nViolets\"\"\""), "Roses\nViolets");
}

#[test]
fn multiline_basic_line_ending_backslash() {
    let source = "v = \"\"\"\nThe quick brown \\\n\n\n   fox jumps over \\\n     the lazy dog.\"\"\"";
    assert_eq!(string_of(source), "The quick brown fox jumps over the lazy dog.");
}

#[test]
fn multiline_basic_normalizes_crlf() {
    assert_eq!(string_of("v = \"\"\"\r\na\r\nb\"\"\""), "a\nb");
}

#[test]
fn multiline_quotes_before_delimiter() {
    assert_eq!(string_of("v = \"\"\"a\"\"\"\"\""), "a\"\"");
    assert_eq!(string_of("v = '''a'''''"), "a''");
}

#[test]
fn multiline_literal_is_verbatim() {
    assert_eq!(
        string_of("v = '''\nThe first newline is\ntrimmed in raw \\n strings.\n'''"),
        "The first newline is\ntrimmed in raw \\n strings.\n"
    );
}

#[test]
fn unterminated_multiline_string() {
    let (_, message) = syntax_error("v = \"\"\"abc\n");
    assert_eq!(message, "unterminated multi-line string");
}

#[test]
fn multiline_string_advances_line_count() {
    let doc = parse("a = \"\"\"\none\ntwo\n\"\"\"\nb = 1").unwrap();
    assert_eq!(doc.root().value("b").unwrap().line, 5);
}

// ============================================================================
// Integers
// ============================================================================

fn integer_of(source: &str) -> i64 {
    parse(source).unwrap().root().value("v").unwrap().as_integer().unwrap()
}

#[test]
fn decimal_integers() {
    assert_eq!(integer_of("v = +99"), 99);
    assert_eq!(integer_of("v = 42"), 42);
    assert_eq!(integer_of("v = 0"), 0);
    assert_eq!(integer_of("v = -17"), -17);
    assert_eq!(integer_of("v = 1_000"), 1000);
    assert_eq!(integer_of("v = 5_349_221"), 5_349_221);
}

#[test]
fn prefixed_integers() {
    assert_eq!(integer_of("v = 0xDEADBEEF"), 0xDEAD_BEEF);
    assert_eq!(integer_of("v = 0xdead_beef"), 0xDEAD_BEEF);
    assert_eq!(integer_of("v = 0o755"), 0o755);
    assert_eq!(integer_of("v = 0b1101_0110"), 0b1101_0110);
}

#[test]
fn signed_prefixed_integer() {
    assert_eq!(integer_of("v = -0x10"), -16);
}

#[test]
fn leading_zero_is_rejected() {
    assert!(parse("v = 0123").is_err());
}

#[test]
fn underscore_rules() {
    assert!(parse("v = 1__000").is_err());
    assert!(parse("v = 1000_").is_err());
    assert!(parse("v = _1000").is_err());
}

#[test]
fn integer_wider_than_i64_is_kept_as_written() {
    let doc = parse("v = 170141183460469231731687303715884105727").unwrap();
    match &doc.root().value("v").unwrap().kind {
        ValueKind::Integer(int) => assert_eq!(int.to_i128(), Some(i128::MAX)),
        other => panic!("expected integer, got {other:?}"),
    }
}

// ============================================================================
// Floats
// ============================================================================

fn float_of(source: &str) -> f64 {
    parse(source).unwrap().root().value("v").unwrap().as_float().unwrap()
}

#[test]
fn fractional_and_exponent_floats() {
    assert_eq!(float_of("v = +1.0"), 1.0);
    assert_eq!(float_of("v = 3.1415"), 3.1415);
    assert_eq!(float_of("v = -0.01"), -0.01);
    assert_eq!(float_of("v = 5e+22"), 5e22);
    assert_eq!(float_of("v = 1e06"), 1e6);
    assert_eq!(float_of("v = -2E-2"), -0.02);
    assert_eq!(float_of("v = 6.626e-34"), 6.626e-34);
    assert_eq!(float_of("v = 224_617.445_991_228"), 224_617.445_991_228);
}

#[test]
fn special_floats() {
    assert_eq!(float_of("v = inf"), f64::INFINITY);
    assert_eq!(float_of("v = -inf"), f64::NEG_INFINITY);
    assert!(float_of("v = nan").is_nan());
}

#[test]
fn dot_requires_digits_on_both_sides() {
    assert!(parse("v = 1.").is_err());
    assert!(parse("v = .5").is_err());
    assert!(parse("v = 1.e5").is_err());
}

// ============================================================================
// Booleans and datetimes
// ============================================================================

#[test]
fn booleans() {
    assert_eq!(value_of("v = true"), ValueKind::Boolean(true));
    assert_eq!(value_of("v = false"), ValueKind::Boolean(false));
    assert!(parse("v = True").is_err());
}

fn datetime_of(source: &str) -> tomlbind_core::Datetime {
    *parse(source).unwrap().root().value("v").unwrap().as_datetime().unwrap()
}

#[test]
fn offset_datetime_with_z() {
    let dt = datetime_of("v = 1979-05-27T07:32:00Z");
    assert_eq!(dt.offset, Some(Offset::Z));
    assert_eq!(dt.to_string(), "1979-05-27T07:32:00Z");
}

#[test]
fn offset_datetime_with_fraction_and_offset() {
    let dt = datetime_of("v = 1979-05-27T00:32:00.999999-07:00");
    assert_eq!(dt.time.unwrap().nanosecond, 999_999_000);
    assert_eq!(dt.offset, Some(Offset::Custom { minutes: -420 }));
    assert_eq!(dt.to_string(), "1979-05-27T00:32:00.999999-07:00");
}

#[test]
fn datetime_with_space_separator() {
    let dt = datetime_of("v = 1979-05-27 07:32:00Z");
    assert_eq!(dt.to_string(), "1979-05-27T07:32:00Z");
}

#[test]
fn local_date_and_time() {
    let date = datetime_of("v = 1979-05-27");
    assert!(date.time.is_none() && date.offset.is_none());
    let time = datetime_of("v = 07:32:00");
    assert!(time.date.is_none());
    assert_eq!(time.to_string(), "07:32:00");
}

#[test]
fn invalid_calendar_date_is_rejected() {
    let (_, message) = syntax_error("v = 2023-02-30");
    assert!(message.contains("invalid date"), "{message}");
}

#[test]
fn invalid_time_is_rejected() {
    let (_, message) = syntax_error("v = 1979-05-27T25:00:00Z");
    assert!(message.contains("invalid time"), "{message}");
}

#[test]
fn malformed_offset_is_rejected() {
    let (_, message) = syntax_error("v = 1979-05-27T07:32:00+7");
    assert!(message.contains("malformed offset"), "{message}");
}

// ============================================================================
// Arrays
// ============================================================================

#[test]
fn array_allows_trailing_comma_newlines_and_comments() {
    let source = "v = [\n  1, # first\n  2,\n\n  3,\n]";
    match value_of(source) {
        ValueKind::Array(items) => {
            let ints: Vec<_> = items.iter().map(|v| v.as_integer().unwrap()).collect();
            assert_eq!(ints, [1, 2, 3]);
        }
        other => panic!("expected array, got {other:?}"),
    }
}

#[test]
fn empty_array() {
    assert_eq!(value_of("v = [ ]"), ValueKind::Array(Vec::new()));
}

#[test]
fn nested_arrays_keep_their_lines() {
    let doc = parse("v = [\n  [1, 2],\n  [\"a\"],\n]").unwrap();
    let items = doc.root().value("v").unwrap().as_array().unwrap();
    assert_eq!(items[0].line, 2);
    assert_eq!(items[1].line, 3);
}

#[test]
fn array_missing_comma() {
    let (_, message) = syntax_error("v = [1 2]");
    assert!(message.contains("`,` or `]`"), "{message}");
}

#[test]
fn unterminated_array() {
    let (_, message) = syntax_error("v = [1, 2");
    assert_eq!(message, "unterminated array");
}

#[test]
fn scanner_accepts_mixed_arrays() {
    match value_of("v = [1, \"two\", 3.0]") {
        ValueKind::Array(items) => assert_eq!(items.len(), 3),
        other => panic!("expected array, got {other:?}"),
    }
}

#[test]
fn array_value_span_is_exact_source() {
    let doc = parse("ports = [ 8000, 8001 ]  # web").unwrap();
    let span = doc.root().value("ports").unwrap().span;
    assert_eq!(doc.slice(span), "[ 8000, 8001 ]");
}

// ============================================================================
// Inline tables
// ============================================================================

#[test]
fn inline_table_becomes_table_entry() {
    let doc = parse("point = { x = 1, y = 2 }").unwrap();
    let point = doc.root().table("point").unwrap();
    assert_eq!(point.value("y").unwrap().as_integer(), Some(2));
}

#[test]
fn nested_inline_tables() {
    let doc = parse("a = { b = { c = true } }").unwrap();
    let c = doc.root().table("a").unwrap().table("b").unwrap().value("c");
    assert_eq!(c.unwrap().as_bool(), Some(true));
}

#[test]
fn inline_table_rejects_trailing_comma() {
    let (_, message) = syntax_error("a = { x = 1, }");
    assert_eq!(message, "trailing comma in inline table");
}

#[test]
fn inline_table_rejects_newline() {
    assert!(parse("a = { x = 1,\n y = 2 }").is_err());
}

#[test]
fn inline_table_missing_comma() {
    let (_, message) = syntax_error("a = { x = 1 y = 2 }");
    assert!(message.contains("`,` or `}`"), "{message}");
}

#[test]
fn empty_inline_table() {
    let doc = parse("a = {}").unwrap();
    assert!(doc.root().table("a").unwrap().is_empty());
}

#[test]
fn inline_tables_as_array_elements() {
    let doc = parse("points = [ { x = 1 }, { x = 2, y = 3 } ]").unwrap();
    let items = doc.root().value("points").unwrap().as_array().unwrap();
    match &items[1].kind {
        ValueKind::Table(t) => assert_eq!(t.value("y").unwrap().as_integer(), Some(3)),
        other => panic!("expected inline table, got {other:?}"),
    }
}

#[test]
fn inline_table_span_covers_braces() {
    let doc = parse("a = { x = 1 }\n").unwrap();
    let span = doc.root().table("a").unwrap().span;
    assert_eq!(doc.slice(span), "{ x = 1 }");
}

// ============================================================================
// Depth guard
// ============================================================================

#[test]
fn nested_arrays_beyond_limit_fail_cleanly() {
    let config = Config { max_depth: 3 };
    let err = parse_with("v = [[[[1]]]]", &config).unwrap_err();
    assert_eq!(err, Error::TooDeep { line: 1, limit: 3 });
}

#[test]
fn deeply_nested_input_does_not_overflow_the_stack() {
    let source = format!("v = {}{}", "[".repeat(100_000), "]".repeat(100_000));
    assert!(matches!(parse(&source), Err(Error::TooDeep { .. })));
}

#[test]
fn header_segments_beyond_limit() {
    let config = Config { max_depth: 2 };
    assert!(parse_with("[a.b]", &config).is_ok());
    assert!(matches!(
        parse_with("[a.b.c]", &config),
        Err(Error::TooDeep { .. })
    ));
}
