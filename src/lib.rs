//! Rule-based lexical highlighting.
//!
//! A [`Language`] is an ordered list of [`Rule`]s, each a regex tagged with a style name.
//! The rules are combined into a single pattern and a [`Styler`] scans a text with it,
//! producing [`StyleSpans`]: spans covering the whole text, each with the style of the rule
//! that matched it or no style at all.
//!
//! ```
//! use rulestyle::{Language, Rule, Span, Styler};
//!
//! let language = Language::new(
//!     "demo",
//!     vec![Rule::named("number", r"\d+"), Rule::named("word", "[a-zA-Z]+")],
//! )?;
//! let spans = Styler::new(&language)?.compute_style("a1 22b");
//! assert_eq!(
//!     spans.into_vec(),
//!     vec![
//!         Span::styled("word", 1),
//!         Span::styled("number", 1),
//!         Span::plain(1),
//!         Span::styled("number", 2),
//!         Span::styled("word", 1),
//!     ]
//! );
//! # Ok::<(), rulestyle::Error>(())
//! ```

mod error;
mod language;
mod options;
mod registry;
mod span;
mod styler;

pub use error::Error;
pub use language::{
    CompiledPattern, Language, NEVER_MATCH_PATTERN, PatternCompiler, RawLanguage, RawRule, Rule,
};
pub use options::{FALLBACK_STYLE, LengthUnit, StyleOptions};
pub use registry::{PLAIN_LANGUAGE_NAME, Registry};
pub use span::{Span, StyleSpans};
pub use styler::Styler;
