use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::Deserialize;

use crate::error::StyleResult;
use crate::language::{Language, Rule, sanitize_group_name};

/// A single rule as written in a language definition file
///
/// # Examples
/// ```json
/// { "name": "keyword", "pattern": "\\b(if|else|while)\\b" }
/// ```
///
/// ```json
/// { "name": "string", "pattern": "\"(?:[^\"\\\\]|\\\\.)*\"", "group": "dq_string" }
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct RawRule {
    /// The style name given to matched text
    pub name: String,
    /// Regex in Oniguruma syntax
    pub pattern: String,
    /// Group name used to identify the rule in the combined pattern.
    /// Derived from the rule name and position when missing.
    #[serde(default)]
    pub group: Option<String>,
}

/// A language definition file
///
/// # Examples
/// ```json
/// {
///   "name": "java",
///   "aliases": ["jav"],
///   "fileTypes": ["java"],
///   "rules": [
///     { "name": "comment", "pattern": "//.*" },
///     { "name": "keyword", "pattern": "\\b(class|public|static|void)\\b" },
///     { "name": "number", "pattern": "\\b\\d+\\b" }
///   ]
/// }
/// ```
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all(deserialize = "camelCase"))]
pub struct RawLanguage {
    pub name: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    /// File extensions this language applies to, without the dot
    #[serde(default)]
    pub file_types: Vec<String>,
    /// The rules, highest priority first
    #[serde(default)]
    pub rules: Vec<RawRule>,
}

impl RawLanguage {
    pub fn load_from_file(path: impl AsRef<Path>) -> StyleResult<Self> {
        let file = File::open(path)?;
        let raw_language = serde_json::from_reader(BufReader::new(file))?;
        Ok(raw_language)
    }

    pub fn from_json_str(content: &str) -> StyleResult<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Validates the rules and builds the language.
    ///
    /// Rules without an explicit group get `r{index}_{name}` so that several rules can share
    /// a style name.
    pub fn into_language(self) -> StyleResult<Language> {
        let rules = self
            .rules
            .into_iter()
            .enumerate()
            .map(|(index, raw)| {
                let group = raw
                    .group
                    .unwrap_or_else(|| format!("r{index}_{}", sanitize_group_name(&raw.name)));
                Rule::new(raw.name, raw.pattern, group)
            })
            .collect();

        Ok(Language::new(self.name, rules)?
            .with_aliases(self.aliases)
            .with_file_types(self.file_types))
    }
}
