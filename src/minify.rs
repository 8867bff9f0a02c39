//! Whitespace and comment stripping over raw JSON text.
//!
//! A single left-to-right pass that never looks at the value tree: bare
//! whitespace, `//` line comments, and `/* */` block comments disappear,
//! while everything inside a double-quoted string is copied verbatim,
//! including escaped quotes. Malformed JSON passes through mangled rather
//! than rejected; this is a text transform, not a validator.

/// Strip insignificant whitespace and comments from JSON text.
pub fn minify(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out: Vec<u8> = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b' ' | b'\t' | b'\r' | b'\n' => i += 1,
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                // Line comment, through end of line.
                while i < bytes.len() && bytes[i] != b'\n' {
                    i += 1;
                }
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                // Block comment; an unterminated one runs to end of input.
                i += 2;
                while i + 1 < bytes.len() && !(bytes[i] == b'*' && bytes[i + 1] == b'/') {
                    i += 1;
                }
                i = (i + 2).min(bytes.len());
            }
            b'"' => {
                // String literal: copy verbatim, escapes as two-byte units.
                out.push(bytes[i]);
                i += 1;
                while i < bytes.len() && bytes[i] != b'"' {
                    if bytes[i] == b'\\' {
                        out.push(bytes[i]);
                        i += 1;
                        if i >= bytes.len() {
                            break;
                        }
                    }
                    out.push(bytes[i]);
                    i += 1;
                }
                if i < bytes.len() {
                    out.push(bytes[i]);
                    i += 1;
                }
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }
    // Comments and whitespace are removed whole, so the output is still the
    // UTF-8 the input was.
    String::from_utf8(out)
        .unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned())
}
