//! Fixture file directives and `FUN` templates.
//!
//! Fixtures are JavaScript programs with optional `// @key: value`
//! directive comments. A fixture mentioning the identifier `FUN` is a
//! template, instantiated once per operation name:
//!
//! ```javascript
//! // @kinds: map, filter
//! // @thisArg: reject
//! var result = [1, 2, 3].FUN(function (x) { return x > 1; });
//! ```
//!
//! Recognised directives: `kinds` (templates only), `operations` and
//! `thisArg` (lowering options), `skip`.

use std::collections::HashMap;

use anyhow::Context;
use loopdown_emitter::{HofKind, LoweringOptions, ThisArgPolicy};
use once_cell::sync::Lazy;
use regex::Regex;

/// Matches: // @key: value (captures entire rest of line as value)
static DIRECTIVE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*//\s*@(\w+)\s*:\s*([^\r\n]*)").expect("directive pattern is valid")
});

static PLACEHOLDER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bFUN\b").expect("placeholder pattern is valid"));

/// Directive values keyed by lowercased name.
#[derive(Debug, Default, Clone)]
pub struct FixtureDirectives {
    pub options: HashMap<String, String>,
}

impl FixtureDirectives {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.options.get(key).map(String::as_str)
    }
}

pub fn parse_directives(content: &str) -> FixtureDirectives {
    let mut directives = FixtureDirectives::default();
    for line in content.lines() {
        if let Some(cap) = DIRECTIVE_RE.captures(line)
            && let (Some(key), Some(value)) = (cap.get(1), cap.get(2))
        {
            directives
                .options
                .insert(key.as_str().to_lowercase(), value.as_str().trim().to_string());
        }
    }
    directives
}

/// Why a fixture should not run, if it should not.
pub fn should_skip(directives: &FixtureDirectives) -> Option<&'static str> {
    directives.options.contains_key("skip").then_some("@skip")
}

pub fn is_template(content: &str) -> bool {
    PLACEHOLDER_RE.is_match(content)
}

/// Replace every `FUN` identifier with `kind`'s method name.
pub fn instantiate(template: &str, kind: HofKind) -> String {
    PLACEHOLDER_RE
        .replace_all(template, kind.method_name())
        .into_owned()
}

fn parse_kind_list(value: &str) -> anyhow::Result<Vec<HofKind>> {
    value
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(|name| name.parse::<HofKind>().map_err(anyhow::Error::msg))
        .collect()
}

/// Operations a template is instantiated for (`@kinds`, default all).
pub fn template_kinds(directives: &FixtureDirectives) -> anyhow::Result<Vec<HofKind>> {
    match directives.get("kinds") {
        Some(value) => parse_kind_list(value).context("invalid @kinds"),
        None => Ok(HofKind::ALL.to_vec()),
    }
}

/// Lowering options from `@operations` and `@thisArg`.
pub fn lowering_options(directives: &FixtureDirectives) -> anyhow::Result<LoweringOptions> {
    let mut options = LoweringOptions::default();
    if let Some(value) = directives.get("operations") {
        options.operations = parse_kind_list(value).context("invalid @operations")?;
    }
    if let Some(value) = directives.get("thisarg") {
        options.this_arg = value
            .parse::<ThisArgPolicy>()
            .map_err(anyhow::Error::msg)
            .context("invalid @thisArg")?;
    }
    Ok(options)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_directives() {
        let content = "// @kinds: map, some\n// @ThisArg: reject\nvar x = 1;\n";
        let directives = parse_directives(content);
        assert_eq!(directives.get("kinds"), Some("map, some"));
        assert_eq!(directives.get("thisarg"), Some("reject"));
        assert!(directives.get("ThisArg").is_none());
    }

    #[test]
    fn test_template_kinds() {
        let directives = parse_directives("// @kinds: map, some\n");
        assert_eq!(
            template_kinds(&directives).unwrap(),
            vec![HofKind::Map, HofKind::Some]
        );
        assert_eq!(
            template_kinds(&FixtureDirectives::default()).unwrap().len(),
            6
        );
        assert!(template_kinds(&parse_directives("// @kinds: flatMap\n")).is_err());
    }

    #[test]
    fn test_lowering_options() {
        let directives = parse_directives("// @operations: reduce\n// @thisArg: reject\n");
        let options = lowering_options(&directives).unwrap();
        assert_eq!(options.operations, vec![HofKind::Reduce]);
        assert_eq!(options.this_arg, ThisArgPolicy::Reject);
        assert!(lowering_options(&parse_directives("// @thisArg: bind\n")).is_err());
    }

    #[test]
    fn test_instantiate_whole_identifiers_only() {
        let template = "xs.FUN(f); var FUNNY = 1; // FUN\n";
        assert!(is_template(template));
        assert_eq!(
            instantiate(template, HofKind::Every),
            "xs.every(f); var FUNNY = 1; // every\n"
        );
        assert!(!is_template("var FUNNY = 1;"));
    }

    #[test]
    fn test_skip() {
        assert_eq!(should_skip(&parse_directives("// @skip: true\n")), Some("@skip"));
        assert_eq!(should_skip(&FixtureDirectives::default()), None);
    }
}
