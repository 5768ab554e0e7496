//! JavaScript and HTML fragment IR, with printing to source text.

pub mod myfrom;
pub mod js;
pub mod markup;

use std::borrow::Cow;

use anyhow::Result;

pub use js::{Js, Stmt};
pub use markup::{Markup, Element, att, opt_att};
pub use myfrom::{MyFrom, ks};

const INDENT: &str = "    ";

/// Accumulates printed source text, tracking the indentation level
/// for line breaks.
pub struct Printer {
    out: String,
    indent: usize,
}

impl Printer {
    pub fn new() -> Self {
        Printer { out: String::new(), indent: 0 }
    }

    pub fn push(&mut self, s: &str) {
        self.out.push_str(s)
    }

    pub fn newline(&mut self) {
        self.out.push('\n');
        for _ in 0..self.indent {
            self.out.push_str(INDENT);
        }
    }

    /// Run `f` with the indentation level increased by one.
    pub fn indented<F>(&mut self, f: F) -> Result<()>
    where F: FnOnce(&mut Self) -> Result<()>
    {
        self.indent += 1;
        let r = f(self);
        self.indent -= 1;
        r
    }

    pub fn finish(self) -> String {
        self.out
    }
}

impl Default for Printer {
    fn default() -> Self {
        Self::new()
    }
}

pub trait Print {
    fn print(&self, p: &mut Printer) -> Result<()>;

    fn to_code_string(&self) -> Result<String> {
        let mut p = Printer::new();
        self.print(&mut p)?;
        Ok(p.finish())
    }
}

impl<T: Print> Print for [T] {
    /// One item per line.
    fn print(&self, p: &mut Printer) -> Result<()> {
        for (i, item) in self.iter().enumerate() {
            if i > 0 {
                p.newline();
            }
            item.print(p)?;
        }
        Ok(())
    }
}

impl<T: Print> Print for Vec<T> {
    fn print(&self, p: &mut Printer) -> Result<()> {
        self.as_slice().print(p)
    }
}

/// Escape text for use in HTML element bodies and attribute values.
pub fn html_escape(s: &str) -> Cow<'_, str> {
    if ! s.contains(|c| matches!(c, '&' | '<' | '>' | '"' | '\'')) {
        return Cow::Borrowed(s)
    }
    let mut buf = String::with_capacity(s.len() + 16);
    for c in s.chars() {
        match c {
            '&' => buf.push_str("&amp;"),
            '<' => buf.push_str("&lt;"),
            '>' => buf.push_str("&gt;"),
            '"' => buf.push_str("&quot;"),
            '\'' => buf.push_str("&#39;"),
            _ => buf.push(c)
        }
    }
    Cow::Owned(buf)
}

/// Make JSON text safe for embedding inside a `<script>` element: no
/// `<` at all (so neither `</script` nor `<!--` can appear), and no raw
/// line or paragraph separators. JSON only has these inside strings,
/// where the `\u` escapes denote the same characters.
fn script_safe(json: String) -> String {
    if ! json.contains(|c| matches!(c, '<' | '\u{2028}' | '\u{2029}')) {
        return json
    }
    let mut buf = String::with_capacity(json.len() + 16);
    for c in json.chars() {
        match c {
            '<' => buf.push_str("\\u003c"),
            '\u{2028}' => buf.push_str("\\u2028"),
            '\u{2029}' => buf.push_str("\\u2029"),
            _ => buf.push(c)
        }
    }
    buf
}

/// A double-quoted JavaScript string literal.
pub fn js_string(s: &str) -> Result<String> {
    Ok(script_safe(serde_json::to_string(s)?))
}

/// A JavaScript literal for arbitrary JSON data.
pub fn js_json(v: &serde_json::Value) -> Result<String> {
    Ok(script_safe(serde_json::to_string(v)?))
}

pub fn is_identifier(s: &str) -> bool {
    let mut cs = s.chars();
    match cs.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' =>
            cs.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$'),
        _ => false
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn t_html_escape() {
        assert_eq!(html_escape("plain"), "plain");
        assert_eq!(html_escape("There's <b>"), "There&#39;s &lt;b&gt;");
        assert_eq!(html_escape("a & \"b\""), "a &amp; &quot;b&quot;");
    }

    #[test]
    fn t_js_string() {
        assert_eq!(js_string("abc").unwrap(), "\"abc\"");
        assert_eq!(js_string("say \"hi\"\n").unwrap(), "\"say \\\"hi\\\"\\n\"");
        assert_eq!(js_string("</script>").unwrap(), "\"\\u003c/script>\"");
    }

    #[test]
    fn t_js_json_in_script() {
        let v = serde_json::json!([{"s": "a\u{2028}b\u{2029} <!--<script>"}]);
        let s = js_json(&v).unwrap();
        assert_eq!(s, "[{\"s\":\"a\\u2028b\\u2029 \\u003c!--\\u003cscript>\"}]");
        assert!(! s.contains('<'));
        assert_eq!(serde_json::from_str::<serde_json::Value>(&s).unwrap(), v);
    }

    #[test]
    fn t_is_identifier() {
        assert!(is_identifier("minOpacity"));
        assert!(is_identifier("_x$1"));
        assert!(! is_identifier("1x"));
        assert!(! is_identifier("fill-color"));
        assert!(! is_identifier(""));
    }
}
