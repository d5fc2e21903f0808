//! Redaction of search text for logs.
//!
//! Search strings routinely embed user names, hostnames and tokens. Only the
//! shape of a search is logged: quoted literals and the values of
//! `field=value` comparisons are replaced with `***`.

const MASK: &str = "***";

/// Mask quoted literals and comparison values in `search`.
pub fn redact_search(search: &str) -> String {
    let chars: Vec<char> = search.chars().collect();
    let mut out = String::with_capacity(search.len());
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            '"' | '\'' => {
                out.push(c);
                out.push_str(MASK);
                i = skip_quoted(&chars, i + 1, c);
                if i < chars.len() {
                    out.push(c);
                    i += 1;
                }
            }
            '=' => {
                while i < chars.len() && chars[i] == '=' {
                    out.push('=');
                    i += 1;
                }
                if i < chars.len() && !matches!(chars[i], '"' | '\'') {
                    let end = skip_bare_value(&chars, i);
                    if end > i {
                        out.push_str(MASK);
                        i = end;
                    }
                }
            }
            _ => {
                out.push(c);
                i += 1;
            }
        }
    }

    out
}

/// Index of the closing `quote` (or end of input), honoring backslash escapes.
fn skip_quoted(chars: &[char], mut i: usize, quote: char) -> usize {
    while i < chars.len() {
        match chars[i] {
            '\\' => i += 2,
            c if c == quote => return i,
            _ => i += 1,
        }
    }
    chars.len()
}

fn skip_bare_value(chars: &[char], mut i: usize) -> usize {
    while i < chars.len() && !chars[i].is_whitespace() && !matches!(chars[i], '|' | ')' | ']' | ',')
    {
        i += 1;
    }
    i
}
