// SPDX-License-Identifier: MIT OR Apache-2.0

//! Property maps and `${name}` placeholder substitution.
//!
//! Every attribute and body text read from a configuration or mapping document is
//! passed through [`substitute`] with the resolved variable set, so later stages
//! only ever observe substituted values.

use std::collections::BTreeMap;

/// A flat, ordered set of string properties.
pub type Properties = BTreeMap<String, String>;

/// Variable that enables `${name:fallback}` placeholders when set to `true`.
pub const ENABLE_DEFAULT_VALUE: &str = "mapcfg.variables.enable-default-value";

/// Variable that overrides the separator between a placeholder name and its fallback.
pub const DEFAULT_VALUE_SEPARATOR: &str = "mapcfg.variables.default-value-separator";

const OPEN_TOKEN: &str = "${";
const CLOSE_TOKEN: char = '}';

/// Replaces every `${name}` placeholder in `text` with its value from `variables`.
///
/// Placeholders without a value are left untouched and `\${` produces a literal
/// `${`. When [`ENABLE_DEFAULT_VALUE`] is `true`, `${name:fallback}` yields
/// `fallback` for names without a value.
///
/// # Examples
///
/// ```
/// use mapcfg::domain::variables::{substitute, Properties};
///
/// let mut variables = Properties::new();
/// variables.insert("user".to_string(), "scott".to_string());
///
/// assert_eq!(substitute("name=${user}", &variables), "name=scott");
/// assert_eq!(substitute("${missing}", &variables), "${missing}");
/// assert_eq!(substitute("\\${user}", &variables), "${user}");
/// ```
pub fn substitute(text: &str, variables: &Properties) -> String {
    if !text.contains(OPEN_TOKEN) {
        return text.to_string();
    }

    let defaults_enabled = variables
        .get(ENABLE_DEFAULT_VALUE)
        .map(|v| v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);
    let separator = variables
        .get(DEFAULT_VALUE_SEPARATOR)
        .map(String::as_str)
        .unwrap_or(":");

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find(OPEN_TOKEN) {
        if start > 0 && rest.as_bytes()[start - 1] == b'\\' {
            out.push_str(&rest[..start - 1]);
            out.push_str(OPEN_TOKEN);
            rest = &rest[start + OPEN_TOKEN.len()..];
            continue;
        }

        out.push_str(&rest[..start]);
        let after_open = &rest[start + OPEN_TOKEN.len()..];
        let Some(end) = after_open.find(CLOSE_TOKEN) else {
            out.push_str(&rest[start..]);
            return out;
        };

        let expression = &after_open[..end];
        out.push_str(&resolve(expression, variables, defaults_enabled, separator));
        rest = &after_open[end + 1..];
    }
    out.push_str(rest);
    out
}

fn resolve(expression: &str, variables: &Properties, defaults_enabled: bool, separator: &str) -> String {
    if defaults_enabled && !separator.is_empty() {
        if let Some((name, fallback)) = expression.split_once(separator) {
            return variables
                .get(name)
                .cloned()
                .unwrap_or_else(|| fallback.to_string());
        }
    }
    match variables.get(expression) {
        Some(value) => value.clone(),
        None => format!("{OPEN_TOKEN}{expression}{CLOSE_TOKEN}"),
    }
}

/// Merges `layers` into one map; entries in later layers win on key collision.
pub fn layer<'a, I>(layers: I) -> Properties
where
    I: IntoIterator<Item = &'a Properties>,
{
    let mut merged = Properties::new();
    for layer in layers {
        merged.extend(layer.iter().map(|(k, v)| (k.clone(), v.clone())));
    }
    merged
}
