/// Parse a `Cookie` header string into ordered (name, value) pairs
///
/// Pairs are separated by `"; "`. Entries without `=` are ignored, the value
/// is everything after the first `=` with surrounding quotes removed.
pub fn parse_cookies(cookie_string: &str) -> Vec<(String, String)> {
    cookie_string
        .trim()
        .split("; ")
        .filter_map(|cookie| cookie.split_once('='))
        .map(|(name, value)| (name.to_string(), value.trim_matches('"').to_string()))
        .collect()
}

/// Look up one cookie by name
pub fn cookie_value<'a>(cookies: &'a [(String, String)], name: &str) -> Option<&'a str> {
    cookies
        .iter()
        .find(|(n, _)| n == name)
        .map(|(_, v)| v.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cookies() {
        let cookies = parse_cookies("fbcity=31; token=\"a=b==\"; broken; zl=en\n");

        assert_eq!(
            cookies,
            vec![
                ("fbcity".to_string(), "31".to_string()),
                ("token".to_string(), "a=b==".to_string()),
                ("zl".to_string(), "en".to_string()),
            ]
        );
        assert_eq!(cookie_value(&cookies, "token"), Some("a=b=="));
        assert_eq!(cookie_value(&cookies, "csrf"), None);
    }

    #[test]
    fn test_empty_cookie_string() {
        assert!(parse_cookies("").is_empty());
    }
}
