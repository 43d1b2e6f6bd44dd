use std::collections::HashSet;

use crate::error::{Error, StyleResult};

mod pattern;
mod raw;

pub use pattern::{CompiledPattern, NEVER_MATCH_PATTERN, PatternCompiler};
pub(crate) use pattern::PatternMatch;
pub use raw::{RawLanguage, RawRule};

/// A named pattern: text matched by `pattern` gets the style `name`.
///
/// `group_name` is only used internally to find out which rule matched once all the rules
/// of a language are combined into a single pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    name: String,
    pattern: String,
    group_name: String,
}

impl Rule {
    pub fn new(
        name: impl Into<String>,
        pattern: impl Into<String>,
        group_name: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            pattern: pattern.into(),
            group_name: group_name.into(),
        }
    }

    /// Creates a rule whose group name is derived from its style name.
    ///
    /// Two rules sharing a style name will also share a group name so this is only
    /// suitable when style names are unique within the language.
    pub fn named(name: impl Into<String>, pattern: impl Into<String>) -> Self {
        let name = name.into();
        let group_name = sanitize_group_name(&name);
        Self::new(name, pattern, group_name)
    }

    /// The style identifier assigned to text matched by this rule
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The regex source, in Oniguruma syntax
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn group_name(&self) -> &str {
        &self.group_name
    }
}

/// Turns an arbitrary string into something usable as a named group: `[A-Za-z_][A-Za-z0-9_]*`
pub(crate) fn sanitize_group_name(name: &str) -> String {
    let mut out: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if out.is_empty() || out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    out
}

fn is_valid_group_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// An ordered, immutable list of rules.
///
/// The order of the rules is their priority: when several rules could match at the same
/// position, the first one wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Language {
    name: String,
    aliases: Vec<String>,
    file_types: Vec<String>,
    rules: Vec<Rule>,
}

impl Language {
    /// Creates a language after checking that every rule has a style name and that group
    /// names are valid and unique.
    ///
    /// Patterns themselves are only checked when the language gets compiled.
    pub fn new(name: impl Into<String>, rules: Vec<Rule>) -> StyleResult<Self> {
        let name = name.into();
        let mut seen = HashSet::with_capacity(rules.len());

        for (index, rule) in rules.iter().enumerate() {
            if rule.name.is_empty() {
                return Err(Error::EmptyStyleName {
                    language: name,
                    index,
                });
            }
            if !is_valid_group_name(&rule.group_name) {
                return Err(Error::InvalidGroupName {
                    language: name,
                    group: rule.group_name.clone(),
                });
            }
            if !seen.insert(rule.group_name.as_str()) {
                return Err(Error::DuplicateGroupName {
                    language: name,
                    group: rule.group_name.clone(),
                });
            }
        }

        Ok(Self {
            name,
            aliases: Vec::new(),
            file_types: Vec::new(),
            rules,
        })
    }

    /// A language without any rule: everything is plain text.
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            aliases: Vec::new(),
            file_types: Vec::new(),
            rules: Vec::new(),
        }
    }

    /// Other names the registry will accept for this language
    pub fn with_aliases<S: Into<String>>(
        mut self,
        aliases: impl IntoIterator<Item = S>,
    ) -> Self {
        self.aliases = aliases.into_iter().map(Into::into).collect();
        self
    }

    /// File extensions, without the leading dot
    pub fn with_file_types<S: Into<String>>(
        mut self,
        file_types: impl IntoIterator<Item = S>,
    ) -> Self {
        self.file_types = file_types.into_iter().map(Into::into).collect();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub fn file_types(&self) -> &[String] {
        &self.file_types
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_group_names_from_style_names() {
        assert_eq!(Rule::named("keyword", r"\bif\b").group_name(), "keyword");
        assert_eq!(
            Rule::named("string.quoted", "\"").group_name(),
            "string_quoted"
        );
        assert_eq!(Rule::named("1st", "x").group_name(), "_1st");
        assert_eq!(sanitize_group_name(""), "_");
    }

    #[test]
    fn rejects_duplicate_group_names() {
        let res = Language::new(
            "test",
            vec![Rule::new("a", "a", "g"), Rule::new("b", "b", "g")],
        );
        assert!(matches!(
            res,
            Err(Error::DuplicateGroupName { ref group, .. }) if group == "g"
        ));
    }

    #[test]
    fn rejects_invalid_group_names() {
        for group in ["", "1abc", "has space", "dash-ed"] {
            let res = Language::new("test", vec![Rule::new("a", "a", group)]);
            assert!(
                matches!(res, Err(Error::InvalidGroupName { .. })),
                "{group:?} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_empty_style_names() {
        let res = Language::new(
            "test",
            vec![Rule::new("a", "a", "a"), Rule::new("", "b", "b")],
        );
        assert!(matches!(res, Err(Error::EmptyStyleName { index: 1, .. })));
    }

    #[test]
    fn keeps_rule_order() {
        let lang = Language::new(
            "test",
            vec![
                Rule::named("number", r"\d+"),
                Rule::named("word", "[a-zA-Z]+"),
            ],
        )
        .unwrap();
        let names: Vec<_> = lang.rules().iter().map(Rule::name).collect();
        assert_eq!(names, ["number", "word"]);
    }
}
