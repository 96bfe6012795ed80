/// Escapes `source` for embedding between the double quotes of a JavaScript
/// string literal that lives inside an inline `<script>` element.
///
/// Rules, in order:
/// 1. `\` becomes `\\`
/// 2. `"` becomes `\"`
/// 3. a newline becomes the two characters `\n`
/// 4. carriage returns are removed
/// 5. `</` becomes `<\/`
/// 6. `<!--` becomes `<\!--`
///
/// The last two keep the HTML tokenizer in plain script data, so neither a
/// closing tag nor a comment opener in the source can move the end of the
/// enclosing script element. Backslashes must be handled before anything
/// that introduces a backslash.
pub fn escape_js_string(source: &str) -> String {
    source
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "")
        .replace("</", "<\\/")
        .replace("<!--", "<\\!--")
}

/// Decodes the body of a double-quoted JavaScript string literal.
///
/// Understands the single-character escapes, `\xHH` and `\uHHHH` / `\u{H..}`.
/// An escape the language does not define yields the escaped character
/// itself, matching how engines treat non-escape characters.
pub fn unescape_js_string(literal: &str) -> String {
    let mut out = String::with_capacity(literal.len());
    let mut chars = literal.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }

        let Some(escaped) = chars.next() else {
            out.push('\\');
            break;
        };

        match escaped {
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'b' => out.push('\u{8}'),
            'f' => out.push('\u{c}'),
            'v' => out.push('\u{b}'),
            '0' => out.push('\0'),
            // line continuation
            '\n' => {}
            'x' => {
                let hex: String = chars.by_ref().take(2).collect();
                push_code_point(&mut out, &hex, 'x');
            }
            'u' => {
                let hex: String = if chars.peek() == Some(&'{') {
                    chars.next();
                    chars.by_ref().take_while(|c| *c != '}').collect()
                } else {
                    chars.by_ref().take(4).collect()
                };
                push_code_point(&mut out, &hex, 'u');
            }
            other => out.push(other),
        }
    }

    out
}

fn push_code_point(out: &mut String, hex: &str, kind: char) {
    match u32::from_str_radix(hex, 16).ok().and_then(char::from_u32) {
        Some(c) => out.push(c),
        None => {
            out.push(kind);
            out.push_str(hex);
        }
    }
}
