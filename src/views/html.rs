//! HTML building blocks

use std::fmt::Write;

/// Escape text for element content and quoted attributes
pub fn escape(text: &str) -> String {
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

/// A button that posts to `action`, with optional hidden fields
pub fn post_button(action: &str, label: &str, hidden: &[(&str, &str)]) -> String {
    let mut html = format!(r#"<form method="post" action="{}" class="inline">"#, escape(action));
    for (name, value) in hidden {
        let _ = write!(
            html,
            r#"<input type="hidden" name="{}" value="{}">"#,
            escape(name),
            escape(value)
        );
    }
    let _ = write!(html, r#"<button type="submit">{}</button></form>"#, escape(label));
    html
}

pub fn document(body: &str) -> String {
    format!(
        concat!(
            "<!DOCTYPE html>\n",
            "<html lang=\"en\">\n",
            "<head><meta charset=\"utf-8\"><title>Library Book Register</title></head>\n",
            "<body><main>\n",
            "<h1>Welcome to Library Book Register System</h1>\n",
            "{}",
            "</main></body>\n",
            "</html>\n"
        ),
        body
    )
}
