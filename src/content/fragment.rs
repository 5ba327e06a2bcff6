//! String-level handling of fetched HTML fragments.
//!
//! Fragments are static pages, often with unescaped source code inside
//! `<pre><code>`. They are never run through a full HTML parser before the
//! code blocks have been escaped, so everything here works on raw text.

/// Attribute set on a code block once it has been escaped.
pub const ESCAPED_MARKER: &str = r#"data-escaped="true""#;

struct OpenTag<'a> {
    name: String,
    attrs: &'a str,
    /// Byte index just past the closing `>`.
    end: usize,
    self_closing: bool,
}

fn next_open_tag(html: &str, from: usize) -> Option<OpenTag<'_>> {
    let mut search = from;
    while let Some(rel) = html.get(search..)?.find('<') {
        let start = search + rel;
        let rest = &html[start + 1..];
        if !rest.starts_with(|c: char| c.is_ascii_alphabetic()) {
            search = start + 1;
            continue;
        }
        let name_len = rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-'))
            .unwrap_or(rest.len());
        let attrs_start = start + 1 + name_len;
        let end = tag_end(html, attrs_start)?;
        let attrs = &html[attrs_start..end - 1];
        // `a<b` in unescaped code is not a tag.
        if attrs.contains('<') {
            search = start + 1;
            continue;
        }
        return Some(OpenTag {
            name: rest[..name_len].to_ascii_lowercase(),
            attrs,
            end,
            self_closing: attrs.trim_end().ends_with('/'),
        });
    }
    None
}

/// Index just past the `>` that closes a tag, skipping quoted values.
fn tag_end(html: &str, from: usize) -> Option<usize> {
    let mut quote: Option<char> = None;
    for (i, c) in html[from..].char_indices() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None if c == '"' || c == '\'' => quote = Some(c),
            None if c == '>' => return Some(from + i + 1),
            None => {}
        }
    }
    None
}

fn attr_value<'a>(attrs: &'a str, wanted: &str) -> Option<&'a str> {
    let mut rest = attrs;
    loop {
        rest = rest.trim_start_matches(|c: char| c.is_whitespace() || c == '/');
        if rest.is_empty() {
            return None;
        }
        let name_end = rest
            .find(|c: char| c.is_whitespace() || c == '=' || c == '/')
            .unwrap_or(rest.len());
        let name = &rest[..name_end];
        rest = rest[name_end..].trim_start();

        let value = match rest.strip_prefix('=') {
            Some(after_eq) => {
                let after_eq = after_eq.trim_start();
                match after_eq.chars().next() {
                    Some(q @ ('"' | '\'')) => {
                        let body = &after_eq[1..];
                        let close = body.find(q).unwrap_or(body.len());
                        rest = body.get(close + 1..).unwrap_or("");
                        &body[..close]
                    }
                    _ => {
                        let end = after_eq
                            .find(char::is_whitespace)
                            .unwrap_or(after_eq.len());
                        rest = &after_eq[end..];
                        &after_eq[..end]
                    }
                }
            }
            None => "",
        };

        if name.eq_ignore_ascii_case(wanted) {
            return Some(value);
        }
    }
}

fn has_class(attrs: &str, class: &str) -> bool {
    attr_value(attrs, "class").is_some_and(|v| v.split_whitespace().any(|c| c == class))
}

fn find_ci(haystack: &str, needle: &str, from: usize) -> Option<usize> {
    haystack
        .get(from..)?
        .to_ascii_lowercase()
        .find(needle)
        .map(|i| i + from)
}

fn is_name_boundary(byte: Option<&u8>) -> bool {
    matches!(byte, None | Some(b'>' | b'/' | b' ' | b'\t' | b'\n' | b'\r'))
}

/// Byte index of the `</name` that closes an element whose content starts
/// at `from`, counting nested elements of the same name.
fn matching_close(html: &str, name: &str, from: usize) -> Option<usize> {
    let lower = html.to_ascii_lowercase();
    let bytes = lower.as_bytes();
    let open_pat = format!("<{name}");
    let close_pat = format!("</{name}");
    let mut depth = 1usize;
    let mut pos = from;

    loop {
        let close = lower[pos..].find(&close_pat)? + pos;
        let mut scan = pos;
        while let Some(rel) = lower[scan..close].find(&open_pat) {
            let at = scan + rel;
            if is_name_boundary(bytes.get(at + open_pat.len())) {
                depth += 1;
            }
            scan = at + open_pat.len();
        }
        pos = close + close_pat.len();
        if !is_name_boundary(bytes.get(pos)) {
            continue;
        }
        depth -= 1;
        if depth == 0 {
            return Some(close);
        }
    }
}

/// Inner HTML of the first element carrying the `content` class, or the
/// whole fragment when there is none. Full pages exported with their own
/// chrome are cut down to their article this way.
pub fn extract_content_region(html: &str) -> &str {
    let mut from = 0;
    while let Some(tag) = next_open_tag(html, from) {
        if !tag.self_closing && has_class(tag.attrs, "content") {
            let close = matching_close(html, &tag.name, tag.end).unwrap_or(html.len());
            return &html[tag.end..close];
        }
        from = tag.end;
    }
    html
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + text.len() / 8);
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            c => out.push(c),
        }
    }
    out
}

/// Escape the raw text of every `<pre><code>` block not yet marked
/// [`ESCAPED_MARKER`], then mark it.
///
/// A block is escaped only when it contains `<` and no `&lt;`, so text that
/// is already escaped is left alone. Running this twice gives the same
/// output as running it once.
pub fn escape_code_blocks(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut copied = 0;
    let mut from = 0;

    while let Some(pre) = next_open_tag(html, from) {
        from = pre.end;
        if pre.name != "pre" || pre.self_closing {
            continue;
        }
        let pre_close = find_ci(html, "</pre", pre.end).unwrap_or(html.len());
        let region = &html[..pre_close];

        let mut inner_from = pre.end;
        while let Some(code) = next_open_tag(region, inner_from) {
            inner_from = code.end;
            if code.name != "code" || code.self_closing {
                continue;
            }
            let Some(code_close) = find_ci(region, "</code", code.end) else {
                break;
            };
            if attr_value(code.attrs, "data-escaped") != Some("true") {
                let body = &html[code.end..code_close];
                out.push_str(&html[copied..code.end - 1]);
                out.push(' ');
                out.push_str(ESCAPED_MARKER);
                out.push('>');
                if body.contains('<') && !body.contains("&lt;") {
                    out.push_str(&escape_html(body));
                } else {
                    out.push_str(body);
                }
                copied = code_close;
            }
            inner_from = code_close;
        }
        from = from.max(pre_close);
    }

    out.push_str(&html[copied..]);
    out
}
