//! HTML for the browser demo form.

/// Result block shown under the form after a submission.
pub enum Outcome<'a> {
    Label(&'a str),
    Error(&'a str),
}

pub struct DemoPage<'a> {
    pub model_loaded: bool,
    /// Text to pre-fill in the textarea.
    pub message: &'a str,
    pub outcome: Option<Outcome<'a>>,
}

pub fn render(page: &DemoPage<'_>) -> String {
    let status = if page.model_loaded {
        r#"<p class="status ready">Model loaded</p>"#
    } else {
        r#"<p class="status pending">Model not loaded yet; the first prediction loads it.</p>"#
    };

    let outcome = match &page.outcome {
        None => String::new(),
        Some(Outcome::Label(label)) => format!(
            r#"<div class="result">Prediction: <strong>{}</strong></div>"#,
            escape(label)
        ),
        Some(Outcome::Error(message)) => {
            format!(r#"<div class="error">{}</div>"#, escape(message))
        }
    };

    format!(
        r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Veritas news classifier</title>
<style>
body {{ font-family: sans-serif; max-width: 40rem; margin: 2rem auto; }}
textarea {{ width: 100%; min-height: 8rem; }}
.status.ready {{ color: #1a7f37; }}
.status.pending {{ color: #9a6700; }}
.result {{ margin-top: 1rem; font-size: 1.25rem; }}
.error {{ margin-top: 1rem; color: #cf222e; }}
</style>
</head>
<body>
<h1>Is this news real?</h1>
{status}
<form method="post" action="/predict-form">
<textarea name="message" placeholder="Paste a headline or sentence">{message}</textarea>
<button type="submit">Classify</button>
</form>
{outcome}
</body>
</html>
"#,
        message = escape(page.message),
    )
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_page_has_form_and_status() {
        let html = render(&DemoPage {
            model_loaded: false,
            message: "",
            outcome: None,
        });
        assert!(html.contains(r#"action="/predict-form""#));
        assert!(html.contains("Model not loaded yet"));
        assert!(!html.contains("Prediction:"));
    }

    #[test]
    fn label_and_message_are_escaped() {
        let html = render(&DemoPage {
            model_loaded: true,
            message: "<script>alert('x')</script>",
            outcome: Some(Outcome::Label("FAKE")),
        });
        assert!(html.contains("&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;"));
        assert!(!html.contains("<script>"));
        assert!(html.contains("<strong>FAKE</strong>"));
        assert!(html.contains("Model loaded"));
    }

    #[test]
    fn error_block_rendered() {
        let html = render(&DemoPage {
            model_loaded: false,
            message: "",
            outcome: Some(Outcome::Error("Model artifacts not found on server.")),
        });
        assert!(html.contains(r#"<div class="error">Model artifacts not found on server.</div>"#));
    }
}
