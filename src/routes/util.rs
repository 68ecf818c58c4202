//! Shared parsing and escaping helpers for route handlers.

/// Parse a URL-encoded form body into key-value pairs.
/// Handles `key=value&key2=value2` (HTMX POST bodies and the worker bridge).
pub fn parse_form_body(body: &str) -> Vec<(String, String)> {
    if body.is_empty() {
        return Vec::new();
    }
    body.split('&')
        .filter_map(|pair| {
            let mut parts = pair.splitn(2, '=');
            let key = parts.next()?;
            let val = parts.next().unwrap_or("");
            Some((percent_decode(key), percent_decode(val)))
        })
        .collect()
}

/// Parse a query string (with or without the leading `?`).
pub fn parse_query(query: &str) -> Vec<(String, String)> {
    parse_form_body(query.strip_prefix('?').unwrap_or(query))
}

/// Percent-decode a URL-encoded value (`+` becomes space).
/// Escapes decode into a byte buffer first so multi-byte UTF-8 sequences
/// (non-ASCII nicknames) come back out as the original characters.
pub fn percent_decode(input: &str) -> String {
    let mut decoded = Vec::with_capacity(input.len());
    let mut bytes = input.bytes();
    while let Some(b) = bytes.next() {
        if b == b'%' {
            let hi = bytes.next().unwrap_or(b'0');
            let lo = bytes.next().unwrap_or(b'0');
            let hex = [hi, lo];
            if let Ok(s) = core::str::from_utf8(&hex) {
                if let Ok(val) = u8::from_str_radix(s, 16) {
                    decoded.push(val);
                    continue;
                }
            }
            decoded.push(b'%');
            decoded.push(hi);
            decoded.push(lo);
        } else if b == b'+' {
            decoded.push(b' ');
        } else {
            decoded.push(b);
        }
    }
    String::from_utf8_lossy(&decoded).into_owned()
}

/// Get a value by key from parsed parameters.
pub fn get_param<'a>(params: &'a [(String, String)], key: &str) -> Option<&'a str> {
    params.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
}

/// Get a `u64` parameter, defaulting to zero when missing or malformed.
/// Used for the `now` timestamps the JS bridge attaches to requests.
pub fn get_u64_param(params: &[(String, String)], key: &str) -> u64 {
    get_param(params, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(0)
}

/// Escape user-supplied text for inclusion in an HTML fragment.
/// Nicknames are free-form input; everything else rendered is static.
pub fn html_escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
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

/// Quote one CSV cell: wrap in double quotes, double any embedded quote.
pub fn csv_cell(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_body_parses_pairs() {
        let pairs = parse_form_body("slot=dns&component=Route+53&now=1000");
        assert_eq!(pairs.len(), 3);
        assert_eq!(get_param(&pairs, "slot"), Some("dns"));
        assert_eq!(get_param(&pairs, "component"), Some("Route 53"));
    }

    #[test]
    fn empty_body_yields_no_pairs() {
        assert!(parse_form_body("").is_empty());
    }

    #[test]
    fn query_prefix_is_optional() {
        assert_eq!(get_param(&parse_query("?arch=2"), "arch"), Some("2"));
        assert_eq!(get_param(&parse_query("arch=2"), "arch"), Some("2"));
    }

    #[test]
    fn percent_decoding() {
        assert_eq!(percent_decode("Route%2053"), "Route 53");
        assert_eq!(percent_decode("a+b"), "a b");
    }

    #[test]
    fn percent_decoding_multibyte_utf8() {
        assert_eq!(percent_decode("Ni%C3%B1a"), "Niña");
        assert_eq!(percent_decode("%E6%97%A5%E6%9C%AC"), "日本");
        // Stray escapes survive without corrupting the rest.
        assert_eq!(percent_decode("100%zz"), "100%zz");
    }

    #[test]
    fn u64_param_defaults_to_zero() {
        let pairs = parse_form_body("now=1234&bad=xyz");
        assert_eq!(get_u64_param(&pairs, "now"), 1234);
        assert_eq!(get_u64_param(&pairs, "bad"), 0);
        assert_eq!(get_u64_param(&pairs, "missing"), 0);
    }

    #[test]
    fn html_escaping() {
        assert_eq!(
            html_escape(r#"<b onclick="x('y')">&"#),
            "&lt;b onclick=&quot;x(&#39;y&#39;)&quot;&gt;&amp;"
        );
        assert_eq!(html_escape("plain"), "plain");
    }

    #[test]
    fn csv_cell_quoting() {
        assert_eq!(csv_cell("plain"), "\"plain\"");
        assert_eq!(csv_cell("say \"hi\""), "\"say \"\"hi\"\"\"");
    }
}
