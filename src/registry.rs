use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::error::{Error, StyleResult};
use crate::language::{CompiledPattern, Language, PatternCompiler, RawLanguage};
use crate::options::StyleOptions;
use crate::span::StyleSpans;
use crate::styler::Styler;

/// The default language name, where nothing is styled
pub const PLAIN_LANGUAGE_NAME: &str = "plain";

/// Holds all the languages and hands out stylers for them.
///
/// Compiled patterns are memoized per language, so every styler for the same language
/// shares a single compilation. The cache can be filled from `&self` and from several
/// threads at once.
#[derive(Default)]
pub struct Registry {
    languages: Vec<Language>,
    // language name or alias -> index in `languages`
    language_id_by_name: HashMap<String, usize>,
    // lowercased file extension -> index in `languages`
    language_id_by_file_type: HashMap<String, usize>,
    // index in `languages` -> compiled pattern
    compiled: papaya::HashMap<usize, Arc<CompiledPattern>>,
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("languages", &self.language_names())
            .field("compiled", &self.compiled.pin().len())
            .finish()
    }
}

impl Registry {
    /// Adds a language, replacing any language with the same name.
    ///
    /// Its aliases and file types are registered as well. A replaced language loses the
    /// aliases and file types it had.
    pub fn add_language(&mut self, language: Language) {
        let name = language.name().to_owned();
        let id = match self.languages.iter().position(|l| l.name() == name) {
            Some(id) => {
                #[cfg(feature = "debug")]
                log::debug!("[add_language] Replacing language '{name}'");
                self.language_id_by_name.retain(|_, v| *v != id);
                self.language_id_by_file_type.retain(|_, v| *v != id);
                self.compiled.pin().remove(&id);
                self.languages[id] = language;
                id
            }
            None => {
                self.languages.push(language);
                self.languages.len() - 1
            }
        };

        let language = &self.languages[id];
        for alias in language.aliases() {
            self.language_id_by_name.insert(alias.clone(), id);
        }
        for file_type in language.file_types() {
            self.language_id_by_file_type
                .insert(file_type.to_lowercase(), id);
        }
        self.language_id_by_name.insert(name, id);
    }

    /// Reads a JSON language definition and adds it.
    pub fn add_language_from_path(&mut self, path: impl AsRef<Path>) -> StyleResult<()> {
        let raw_language = RawLanguage::load_from_file(path)?;
        self.add_language(raw_language.into_language()?);
        Ok(())
    }

    /// Adds an empty language that will not match anything. Useful as a fallback if the
    /// language is not found.
    ///
    /// It will get the `plain` language name.
    pub fn add_plain_language(&mut self, aliases: &[&str]) {
        let plain = Language::empty(PLAIN_LANGUAGE_NAME)
            .with_aliases(aliases.iter().copied());
        self.add_language(plain);
    }

    /// Adds an alias for the given language
    pub fn add_alias(&mut self, language_name: &str, alias: &str) {
        if let Some(id) = self.language_id_by_name.get(language_name) {
            self.language_id_by_name.insert(alias.to_string(), *id);
        }
    }

    /// Checks whether the given language is available in the registry with its name
    /// or aliases
    pub fn contains_language(&self, name: &str) -> bool {
        self.language_id_by_name.contains_key(name)
    }

    pub fn language(&self, name: &str) -> Option<&Language> {
        self.language_id_by_name
            .get(name)
            .map(|id| &self.languages[*id])
    }

    /// Finds a language from a file extension, with or without the leading dot.
    pub fn find_by_file_type(&self, extension: &str) -> Option<&Language> {
        let extension = extension.trim_start_matches('.').to_lowercase();
        self.language_id_by_file_type
            .get(&extension)
            .map(|id| &self.languages[*id])
    }

    /// Names of all the languages, aliases excluded, sorted
    pub fn language_names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.languages.iter().map(Language::name).collect();
        names.sort_unstable();
        names
    }

    fn resolve(&self, name: &str, options: &StyleOptions<'_>) -> StyleResult<usize> {
        self.language_id_by_name
            .get(name)
            .or_else(|| {
                if options.fallback_to_plain {
                    self.language_id_by_name.get(PLAIN_LANGUAGE_NAME)
                } else {
                    None
                }
            })
            .copied()
            .ok_or_else(|| Error::LanguageNotFound(name.to_string()))
    }

    fn compiled_pattern(&self, id: usize) -> StyleResult<Arc<CompiledPattern>> {
        let compiled = self.compiled.pin();
        if let Some(pattern) = compiled.get(&id) {
            return Ok(Arc::clone(pattern));
        }

        let language = &self.languages[id];
        #[cfg(feature = "debug")]
        log::debug!("[compiled_pattern] Compiling '{}'", language.name());
        let pattern = Arc::new(PatternCompiler::compile(language)?);
        // Another thread may have compiled it in the meantime, keep whichever got in first
        Ok(Arc::clone(compiled.get_or_insert(id, pattern)))
    }

    /// Returns a styler for the given language name or alias.
    ///
    /// Fails if the language is unknown, unless `fallback_to_plain` is set and a plain
    /// language was added, or if one of its patterns is invalid.
    pub fn styler(&self, name: &str, options: &StyleOptions<'_>) -> StyleResult<Styler> {
        let id = self.resolve(name, options)?;
        Ok(Styler::from_pattern(self.compiled_pattern(id)?))
    }

    /// Splits `text` into spans using the given language.
    pub fn style(
        &self,
        text: &str,
        name: &str,
        options: &StyleOptions<'_>,
    ) -> StyleResult<StyleSpans> {
        let styler = self.styler(name, options)?;
        Ok(styler.compute_style_with(text, options))
    }
}
