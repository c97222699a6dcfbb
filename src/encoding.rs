// encoding.rs
use serde::Serialize;
use serde_json::ser::Formatter;
use std::io;

/// JSON formatter that writes `<`, `>`, `&`, U+2028 and U+2029 as `\u` escapes, so
/// records and responses stay byte-compatible with clients of the existing service.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlSafeFormatter;

impl Formatter for HtmlSafeFormatter {
    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        let mut start = 0;
        for (i, c) in fragment.char_indices() {
            let escaped = match c {
                '<' => "\\u003c",
                '>' => "\\u003e",
                '&' => "\\u0026",
                '\u{2028}' => "\\u2028",
                '\u{2029}' => "\\u2029",
                _ => continue,
            };
            writer.write_all(fragment[start..i].as_bytes())?;
            writer.write_all(escaped.as_bytes())?;
            start = i + c.len_utf8();
        }
        writer.write_all(fragment[start..].as_bytes())
    }
}

/// Serializes `value` as compact JSON through [`HtmlSafeFormatter`].
pub fn to_string<T>(value: &T) -> serde_json::Result<String>
where
    T: ?Sized + Serialize,
{
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, HtmlSafeFormatter);
    value.serialize(&mut ser)?;
    String::from_utf8(buf).map_err(<serde_json::Error as serde::ser::Error>::custom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn escapes_html_sensitive_characters() {
        let value = json!({ "title": "Tom & Jerry <3>", "note": "a\u{2028}b" });
        assert_eq!(
            to_string(&value).unwrap(),
            r#"{"note":"a\u2028b","title":"Tom \u0026 Jerry \u003c3\u003e"}"#
        );
    }

    #[test]
    fn other_text_matches_serde_json() {
        let value = json!({ "title": "Amélie \"quoted\"\n", "id": "x" });
        assert_eq!(
            to_string(&value).unwrap(),
            serde_json::to_string(&value).unwrap()
        );
    }

    #[test]
    fn escaped_output_decodes_to_the_same_text() {
        let text = "<b>&amp;</b>";
        let encoded = to_string(text).unwrap();
        assert_eq!(encoded, r#""\u003cb\u003e\u0026amp;\u003c/b\u003e""#);
        let decoded: String = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, text);
    }
}
