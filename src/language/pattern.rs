use std::collections::HashMap;
use std::fmt::{self, Debug, Formatter};

use onig::{Regex, RegexOptions, Region, SearchOptions, Syntax};

use crate::error::{Error, StyleResult};
use crate::language::Language;

/// Used instead of an alternation when a language has no rules: it cannot match anywhere.
pub const NEVER_MATCH_PATTERN: &str = "(?!x)x";

/// A match of a [`CompiledPattern`], as byte offsets in the searched text.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub(crate) struct PatternMatch {
    /// Index of the owning rule in its language, if it could be identified
    pub rule: Option<usize>,
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CompiledRule {
    style: String,
    /// Capture group number of the group wrapping this rule in the combined pattern
    group: usize,
}

/// All the rules of a language combined into a single alternation, ready for scanning.
///
/// The rules keep their language order, both in the alternation and in the table used to
/// find the owning rule of a match.
pub struct CompiledPattern {
    language: String,
    source: String,
    regex: Regex,
    rules: Vec<CompiledRule>,
}

impl CompiledPattern {
    /// Name of the language this pattern was built from
    pub fn language(&self) -> &str {
        &self.language
    }

    /// The combined regex source
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Style name of the rule at `index`
    pub fn style(&self, index: usize) -> Option<&str> {
        self.rules.get(index).map(|r| r.style.as_str())
    }

    /// Finds the leftmost match starting at or after `pos`.
    ///
    /// The whole text is given to the regex engine so that look-behinds can see what comes
    /// before `pos`. `region` is scratch space reused across calls.
    pub(crate) fn find_at(
        &self,
        text: &str,
        pos: usize,
        region: &mut Region,
    ) -> Option<PatternMatch> {
        self.regex.search_with_options(
            text,
            pos,
            text.len(),
            SearchOptions::SEARCH_OPTION_NONE,
            Some(&mut *region),
        )?;
        let (start, end) = region.pos(0)?;

        // Only one top-level group can take part in a match, the first one found in rule
        // order owns it.
        let rule = self
            .rules
            .iter()
            .position(|r| region.pos(r.group).is_some());

        Some(PatternMatch { rule, start, end })
    }
}

impl Debug for CompiledPattern {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CompiledPattern({}, {} rules)",
            self.language,
            self.rules.len()
        )
    }
}

/// Builds the combined pattern of a language.
#[derive(Debug, Clone, Copy, Default)]
pub struct PatternCompiler;

impl PatternCompiler {
    /// Returns the alternation of every rule pattern, each wrapped in a group named after
    /// its rule: `(?<g1>p1)|(?<g2>p2)|...`.
    ///
    /// A language without rules gets [`NEVER_MATCH_PATTERN`].
    pub fn combined_pattern(language: &Language) -> String {
        if language.is_empty() {
            return NEVER_MATCH_PATTERN.to_owned();
        }

        let capacity = language
            .rules()
            .iter()
            .map(|r| r.pattern().len() + r.group_name().len() + 6)
            .sum();
        let mut out = String::with_capacity(capacity);
        for (i, rule) in language.rules().iter().enumerate() {
            if i > 0 {
                out.push('|');
            }
            out.push_str(&format!("(?<{}>{})", rule.group_name(), rule.pattern()));
        }
        out
    }

    /// Compiles the combined pattern of the language.
    ///
    /// Every rule pattern is first compiled on its own so an error can point at the rule
    /// responsible for it.
    pub fn compile(language: &Language) -> StyleResult<CompiledPattern> {
        for rule in language.rules() {
            if let Err(err) = new_regex(rule.pattern()) {
                return Err(Error::InvalidPattern {
                    language: language.name().to_owned(),
                    group: Some(rule.group_name().to_owned()),
                    message: err.to_string(),
                });
            }
        }

        let source = Self::combined_pattern(language);
        #[cfg(feature = "debug")]
        log::debug!(
            "[compile] Language '{}' with {} rules: {source}",
            language.name(),
            language.rules().len()
        );

        let regex = new_regex(&source).map_err(|err| Error::InvalidPattern {
            language: language.name().to_owned(),
            group: None,
            message: err.to_string(),
        })?;

        let mut groups_by_name: HashMap<String, Vec<u32>> = HashMap::new();
        regex.foreach_name(|name, groups| {
            groups_by_name.insert(name.to_owned(), groups.to_vec());
            true
        });

        let mut rules = Vec::with_capacity(language.rules().len());
        for rule in language.rules() {
            match groups_by_name.get(rule.group_name()).map(Vec::as_slice) {
                Some([group]) => rules.push(CompiledRule {
                    style: rule.name().to_owned(),
                    group: *group as usize,
                }),
                // Another rule pattern declares a group with the same name
                Some(_) => {
                    return Err(Error::DuplicateGroupName {
                        language: language.name().to_owned(),
                        group: rule.group_name().to_owned(),
                    });
                }
                None => {
                    return Err(Error::InvalidPattern {
                        language: language.name().to_owned(),
                        group: Some(rule.group_name().to_owned()),
                        message: "group missing from the combined pattern".to_owned(),
                    });
                }
            }
        }

        Ok(CompiledPattern {
            language: language.name().to_owned(),
            source,
            regex,
            rules,
        })
    }
}

/// Only named groups capture: numbered groups inside rule patterns are plain groupings.
fn new_regex(pattern: &str) -> Result<Regex, onig::Error> {
    Regex::with_options(pattern, RegexOptions::REGEX_OPTION_NONE, Syntax::default())
}
