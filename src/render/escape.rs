//! Escaping for the three contexts generated files embed strings in.
//!
//! - [`escape_xml`]: manifest text and attribute values
//! - [`escape_html`]: HTML text and attribute values
//! - [`js_string`]: string literals inside inline `<script>` blocks

/// Escape XML special characters, including both quote styles.
///
/// Characters XML 1.0 does not allow at all (C0 controls other than tab,
/// newline and carriage return, plus U+FFFE and U+FFFF) are dropped;
/// vertical tab and form feed become a space.
///
/// # Examples
///
/// ```
/// use scormkit::render::escape_xml;
///
/// assert_eq!(escape_xml("Q&A <1>"), "Q&amp;A &lt;1&gt;");
/// assert_eq!(escape_xml("l'\"x\""), "l&apos;&quot;x&quot;");
/// assert_eq!(escape_xml("Excel\u{B}Initiation\u{1}"), "Excel Initiation");
/// ```
pub fn escape_xml(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + s.len() / 8);
    for c in s.chars() {
        match c {
            '\u{B}' | '\u{C}' => result.push(' '),
            '\t' | '\n' | '\r' => result.push(c),
            '\u{0}'..='\u{1F}' | '\u{FFFE}' | '\u{FFFF}' => {}
            _ => push_escaped(c, "&apos;", &mut result),
        }
    }
    result
}

/// Escape HTML special characters, including both quote styles.
///
/// Uses the numeric reference for `'` since `&apos;` is not an HTML 4
/// entity.
///
/// # Examples
///
/// ```
/// use scormkit::render::escape_html;
///
/// assert_eq!(escape_html("<script>"), "&lt;script&gt;");
/// assert_eq!(escape_html("it's"), "it&#39;s");
/// ```
pub fn escape_html(s: &str) -> String {
    escape_with(s, "&#39;")
}

fn escape_with(s: &str, apos: &str) -> String {
    let mut result = String::with_capacity(s.len() + s.len() / 8);
    for c in s.chars() {
        push_escaped(c, apos, &mut result);
    }
    result
}

fn push_escaped(c: char, apos: &str, out: &mut String) {
    match c {
        '&' => out.push_str("&amp;"),
        '<' => out.push_str("&lt;"),
        '>' => out.push_str("&gt;"),
        '"' => out.push_str("&quot;"),
        '\'' => out.push_str(apos),
        _ => out.push(c),
    }
}

/// Encode a string as a JavaScript string literal (quotes included).
///
/// The literal is JSON, with `</` and the two JS line terminators that JSON
/// leaves raw escaped so the value cannot close the surrounding script
/// element.
///
/// # Examples
///
/// ```
/// use scormkit::render::js_string;
///
/// assert_eq!(js_string("a'b"), r#""a'b""#);
/// assert_eq!(js_string("</script>"), r#""<\/script>""#);
/// ```
pub fn js_string(s: &str) -> String {
    let json = serde_json::Value::String(s.to_string()).to_string();
    neutralize_script_close(&json)
}

/// Serialize a value to JSON safe for embedding in an inline script.
pub fn js_value<T: serde::Serialize + ?Sized>(value: &T) -> serde_json::Result<String> {
    serde_json::to_string(value).map(|json| neutralize_script_close(&json))
}

fn neutralize_script_close(json: &str) -> String {
    json.replace("</", "<\\/")
        .replace('\u{2028}', "\\u2028")
        .replace('\u{2029}', "\\u2029")
}
