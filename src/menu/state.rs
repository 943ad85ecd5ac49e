//! Locating the preloaded state blob embedded in a restaurant page

use crate::error::ExtractError;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use serde_json::Value;

const STATE_MARKER: &str = "__PRELOADED_STATE__";

static SCRIPT_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("script").unwrap());

static PRELOADED_STATE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"window\.__PRELOADED_STATE__\s*=\s*JSON\.parse\((.*?)\);").unwrap()
});

/// Text of the first `<script>` mentioning the preloaded state
pub fn find_state_script(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    document
        .select(&SCRIPT_SELECTOR)
        .map(|script| script.text().collect::<String>())
        .find(|text| text.contains(STATE_MARKER))
}

/// Parse the `JSON.parse("...")` argument out of a state script
///
/// The argument is a JSON string literal whose content is itself JSON, so it
/// is decoded twice. A non-string argument is taken as the state directly.
pub fn parse_state_script(script: &str) -> Result<Value, ExtractError> {
    let captures = PRELOADED_STATE_REGEX
        .captures(script)
        .ok_or(ExtractError::StateNotParsed)?;

    match serde_json::from_str::<Value>(&captures[1])? {
        Value::String(inner) => Ok(serde_json::from_str(&inner)?),
        other => Ok(other),
    }
}

/// Extract the preloaded state tree from a full HTML page
pub fn preloaded_state(html: &str) -> Result<Value, ExtractError> {
    let script = find_state_script(html).ok_or(ExtractError::StateNotFound)?;
    parse_state_script(&script)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn page_with_state(state: &Value) -> String {
        let inner = serde_json::to_string(state).unwrap();
        let literal = serde_json::to_string(&inner).unwrap();
        format!(
            "<html><head><script>var x = 1;</script></head><body>\
             <script>window.__PRELOADED_STATE__ = JSON.parse({});</script>\
             </body></html>",
            literal
        )
    }

    #[test]
    fn test_state_is_double_decoded() {
        let state = json!({"pages": {"current": {"name": "a \"quoted\" name"}}});
        let html = page_with_state(&state);

        let parsed = preloaded_state(&html).unwrap();

        assert_eq!(parsed, state);
    }

    #[test]
    fn test_missing_script() {
        let result = preloaded_state("<html><script>var y = 2;</script></html>");
        assert!(matches!(result, Err(ExtractError::StateNotFound)));
    }

    #[test]
    fn test_marker_without_parse_call() {
        let html = "<script>window.__PRELOADED_STATE__ = {};</script>";
        let result = preloaded_state(html);
        assert!(matches!(result, Err(ExtractError::StateNotParsed)));
    }

    #[test]
    fn test_bad_inner_json() {
        let script = r#"window.__PRELOADED_STATE__ = JSON.parse("{not json");"#;
        let result = parse_state_script(script);
        assert!(matches!(result, Err(ExtractError::Json(_))));
    }
}
