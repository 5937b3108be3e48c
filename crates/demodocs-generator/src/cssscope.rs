//! CSS selector scoping for demo stylesheets.
//!
//! Rewrites every top-level rule's selector list so each selector becomes
//! `.<scope_class> <selector>`, leaving statement at-rules and the bodies of
//! non-conditional at-rules intact. Conditional group rules (`@media`,
//! `@supports`) are scoped recursively. Pure selector nesting; no prefix
//! text is added.

/// Wrap all top-level selectors of `css` under `scope_class`.
#[must_use]
pub fn scope_css(css: &str, scope_class: &str) -> String {
    let mut out = String::with_capacity(css.len() + 64);
    let bytes = css.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        // Comments and whitespace pass through verbatim.
        if css[i..].starts_with("/*") {
            let end = css[i..].find("*/").map_or(css.len(), |p| i + p + 2);
            out.push_str(&css[i..end]);
            i = end;
            continue;
        }
        if bytes[i].is_ascii_whitespace() {
            let mut j = i;
            while j < bytes.len() && bytes[j].is_ascii_whitespace() {
                j += 1;
            }
            out.push_str(&css[i..j]);
            i = j;
            continue;
        }

        // Scan the prelude up to '{' (a rule) or ';' (a statement at-rule).
        let start = i;
        let mut j = i;
        while j < bytes.len() && bytes[j] != b'{' && bytes[j] != b';' {
            if bytes[j] == b'/' && css[j..].starts_with("/*") {
                j = css[j..].find("*/").map_or(css.len(), |p| j + p + 2);
            } else if bytes[j] == b'"' || bytes[j] == b'\'' {
                j = skip_string(bytes, j);
            } else {
                j += 1;
            }
        }

        if j >= bytes.len() || bytes[j] == b';' {
            // @import / @charset style statement, emitted unchanged.
            let end = (j + 1).min(css.len());
            out.push_str(&css[start..end]);
            i = end;
            continue;
        }

        let prelude = &css[start..j];
        let close = find_block_end(css, j);
        let body = &css[j + 1..close];
        let trimmed = prelude.trim();

        if let Some(at_rule) = trimmed.strip_prefix('@') {
            let name = at_rule
                .split(|c: char| c.is_whitespace() || c == '(')
                .next()
                .unwrap_or("");
            out.push_str(prelude);
            out.push('{');
            if matches!(name, "media" | "supports" | "document") {
                out.push_str(&scope_css(body, scope_class));
            } else {
                // @keyframes, @font-face, @page: body left intact.
                out.push_str(body);
            }
            out.push('}');
        } else {
            let scoped: Vec<String> = split_selectors(prelude)
                .iter()
                .map(|s| format!(".{scope_class} {}", s.trim()))
                .collect();
            out.push_str(&scoped.join(", "));
            out.push('{');
            out.push_str(body);
            out.push('}');
        }

        i = (close + 1).min(css.len());
    }

    out
}

/// Split a selector list on commas outside parens, brackets, and strings.
fn split_selectors(prelude: &str) -> Vec<&str> {
    let bytes = prelude.as_bytes();
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'(' | b'[' => {
                depth += 1;
                i += 1;
            }
            b')' | b']' => {
                depth -= 1;
                i += 1;
            }
            b'"' | b'\'' => i = skip_string(bytes, i),
            b',' if depth == 0 => {
                parts.push(&prelude[start..i]);
                i += 1;
                start = i;
            }
            _ => i += 1,
        }
    }

    parts.push(&prelude[start..]);
    parts
}

/// Index just past the closing quote of the string starting at `start`.
fn skip_string(bytes: &[u8], start: usize) -> usize {
    let quote = bytes[start];
    let mut i = start + 1;
    while i < bytes.len() {
        if bytes[i] == b'\\' {
            i += 2;
        } else if bytes[i] == quote {
            return i + 1;
        } else {
            i += 1;
        }
    }
    bytes.len()
}

/// Index of the brace matching the one at `open`, comment- and string-aware.
fn find_block_end(css: &str, open: usize) -> usize {
    let bytes = css.as_bytes();
    let mut depth = 0usize;
    let mut i = open;

    while i < bytes.len() {
        if bytes[i] == b'/' && css[i..].starts_with("/*") {
            i = css[i..].find("*/").map_or(css.len(), |p| i + p + 2);
            continue;
        }
        match bytes[i] {
            b'"' | b'\'' => {
                i = skip_string(bytes, i);
                continue;
            }
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return i;
                }
            }
            _ => {}
        }
        i += 1;
    }

    css.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_rule() {
        assert_eq!(
            scope_css(".btn{color:red}", "btnDemo"),
            ".btnDemo .btn{color:red}"
        );
    }

    #[test]
    fn test_selector_list() {
        assert_eq!(
            scope_css("h1, .title{margin:0}", "demo"),
            ".demo h1, .demo .title{margin:0}"
        );
    }

    #[test]
    fn test_media_block_scoped_recursively() {
        let css = "@media (min-width: 600px){.btn{color:red}}";
        assert_eq!(
            scope_css(css, "demo"),
            "@media (min-width: 600px){.demo .btn{color:red}}"
        );
    }

    #[test]
    fn test_keyframes_left_intact() {
        let css = "@keyframes spin{from{transform:none}to{transform:rotate(1turn)}}";
        assert_eq!(scope_css(css, "demo"), css);
    }

    #[test]
    fn test_import_statement_left_intact() {
        let css = "@import url(\"base.css\");\n.btn{color:red}";
        assert_eq!(
            scope_css(css, "demo"),
            "@import url(\"base.css\");\n.demo .btn{color:red}"
        );
    }

    #[test]
    fn test_comment_preserved() {
        let css = "/* header */\n.btn{color:red}";
        assert_eq!(scope_css(css, "demo"), "/* header */\n.demo .btn{color:red}");
    }

    #[test]
    fn test_comma_inside_functional_selector_not_split() {
        let css = ":is(h1, h2){margin:0}";
        assert_eq!(scope_css(css, "demo"), ".demo :is(h1, h2){margin:0}");
    }

    #[test]
    fn test_multiple_rules() {
        let css = ".a{x:1}\n.b{y:2}";
        assert_eq!(scope_css(css, "s"), ".s .a{x:1}\n.s .b{y:2}");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(scope_css("", "demo"), "");
    }
}
