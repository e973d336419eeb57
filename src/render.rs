// Stream renderer: prints the assistant's reply as it arrives, one NDJSON
// fragment at a time, so the operator sees the answer being "typed".
//
// Ollama sends lines like:
//   {"model":"llama3","message":{"role":"assistant","content":"Hola"},"done":false}
// Only `message.content` matters here.

use serde::Deserialize;
use std::io::{self, Write};

/// Printed before the reply, even when the reply is empty.
pub const REPLY_LABEL: &str = "🤖 Asistente de Python: ";

#[derive(Deserialize, Debug)]
struct StreamFragment {
    message: Option<FragmentMessage>,
}

#[derive(Deserialize, Debug)]
struct FragmentMessage {
    content: Option<String>,
}

/// Text carried by one NDJSON line, if the line decodes and has any.
pub fn fragment_text(line: &str) -> Option<String> {
    match serde_json::from_str::<StreamFragment>(line) {
        Ok(fragment) => fragment.message.and_then(|m| m.content),
        Err(e) => {
            // Partial or garbage lines are expected on a chunked stream.
            log::trace!("Skipping undecodable fragment ({}): {:?}", e, line);
            None
        }
    }
}

/// Write the label, every fragment in arrival order without separators and
/// one trailing newline. Each fragment is flushed as soon as it is written.
pub fn render<I, W>(lines: I, out: &mut W) -> io::Result<()>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
    W: Write + ?Sized,
{
    write!(out, "{}", REPLY_LABEL)?;
    out.flush()?;
    for line in lines {
        if let Some(text) = fragment_text(line.as_ref()) {
            out.write_all(text.as_bytes())?;
            out.flush()?;
        }
    }
    writeln!(out)?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(lines: &[&str]) -> String {
        let mut out = Vec::new();
        render(lines.iter(), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn skips_malformed_lines() {
        let out = rendered(&[
            r#"{"message":{"content":"Hola"}}"#,
            "not json",
            r#"{"message":{"content":" mundo"}}"#,
        ]);
        assert_eq!(out, format!("{}Hola mundo\n", REPLY_LABEL));
    }

    #[test]
    fn empty_stream_prints_label_and_newline() {
        assert_eq!(rendered(&[]), format!("{}\n", REPLY_LABEL));
    }

    #[test]
    fn fragments_without_content_are_ignored() {
        let out = rendered(&[
            r#"{"model":"llama3","done":false}"#,
            r#"{"message":{"role":"assistant"}}"#,
            r#"{"message":{"role":"assistant","content":"ok"},"done":false}"#,
            r#"{"message":{"role":"assistant","content":""},"done":true,"eval_count":3}"#,
        ]);
        assert_eq!(out, format!("{}ok\n", REPLY_LABEL));
    }

    #[test]
    fn keeps_arrival_order() {
        let out = rendered(&[
            r#"{"message":{"content":"c"}}"#,
            r#"{"message":{"content":"a"}}"#,
            r#"{"message":{"content":"b"}}"#,
        ]);
        assert!(out.ends_with("cab\n"));
    }

    #[test]
    fn fragment_text_extracts_content() {
        assert_eq!(
            fragment_text(r#"{"message":{"content":"x"}}"#).as_deref(),
            Some("x")
        );
        assert_eq!(fragment_text(r#"{"message":{"con"#), None);
        assert_eq!(fragment_text(""), None);
    }
}
