use quire_common::RichTextSpan;

/// Render one span as inline Markdown.
///
/// The text is trimmed, then wrapped bold → italic → strikethrough → code,
/// each wrap enclosing the previous ones. A non-empty link wraps last.
pub fn render_span(span: &RichTextSpan) -> String {
    let mut text = span.text.trim().to_string();
    let annotations = &span.annotations;

    if annotations.bold {
        text = format!("**{text}**");
    }
    if annotations.italic {
        text = format!("*{text}*");
    }
    if annotations.strikethrough {
        text = format!("~~{text}~~");
    }
    if annotations.code {
        text = format!("`{text}`");
    }
    if let Some(url) = span.link.as_deref().filter(|url| !url.is_empty()) {
        text = format!("[{text}]({url})");
    }

    text
}

/// Render a run of spans back to back
pub fn render_spans(spans: &[RichTextSpan]) -> String {
    spans.iter().map(render_span).collect()
}

/// Concatenated plain text, ignoring annotations and links
pub fn plain_text(spans: &[RichTextSpan]) -> String {
    spans.iter().map(|span| span.plain_text.as_str()).collect()
}
