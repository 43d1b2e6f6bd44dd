use std::sync::Arc;

use onig::Region;

use crate::error::StyleResult;
use crate::language::{CompiledPattern, Language, PatternCompiler, PatternMatch};
use crate::options::{LengthUnit, StyleOptions};
use crate::span::{Span, StyleSpans};

/// Small wrapper so we only produce valid spans.
/// Positions are byte offsets, lengths are converted to the requested unit when a span is
/// produced.
#[derive(Debug)]
struct SpanAccumulator<'t> {
    text: &'t str,
    spans: Vec<Span>,
    /// Position up to which spans have been generated
    /// (start of next span to be produced)
    last_end_pos: usize,
    unit: LengthUnit,
    merge_same_style: bool,
}

impl<'t> SpanAccumulator<'t> {
    fn new(text: &'t str, options: &StyleOptions<'_>) -> Self {
        Self {
            text,
            spans: Vec::new(),
            last_end_pos: 0,
            unit: options.length_unit,
            merge_same_style: options.merge_same_style_spans,
        }
    }

    fn produce(&mut self, end_pos: usize, style: Option<&str>) {
        // Skip empty spans: no gap before a match, or a match ending the text
        if self.last_end_pos >= end_pos {
            return;
        }

        let len = self.unit.measure(&self.text[self.last_end_pos..end_pos]);
        #[cfg(feature = "debug")]
        log::trace!(
            "[produce]: [{}..{end_pos}] {:?} => {}",
            self.last_end_pos,
            &self.text[self.last_end_pos..end_pos],
            style.unwrap_or("<plain>")
        );

        match self.spans.last_mut() {
            Some(last) if self.merge_same_style && last.style.as_deref() == style => {
                last.len += len;
            }
            _ => self.spans.push(Span {
                style: style.map(str::to_owned),
                len,
            }),
        }

        self.last_end_pos = end_pos;
    }

    /// Covers the rest of the text with a plain span.
    /// An empty text still gets its single empty span.
    fn finalize(mut self) -> StyleSpans {
        self.produce(self.text.len(), None);
        if self.spans.is_empty() {
            self.spans.push(Span::plain(0));
        }
        StyleSpans::new(self.spans, self.unit)
    }
}

/// Applies the rules of a language to texts.
///
/// A styler is bound to a compiled language from the start so a broken language fails
/// before any text is looked at. It is cheap to clone and can be shared between threads.
#[derive(Debug, Clone)]
pub struct Styler {
    pattern: Arc<CompiledPattern>,
}

impl Styler {
    /// Compiles the language. Fails on the first invalid rule pattern.
    pub fn new(language: &Language) -> StyleResult<Self> {
        let pattern = PatternCompiler::compile(language)?;
        Ok(Self::from_pattern(Arc::new(pattern)))
    }

    /// Reuses an already compiled language
    pub fn from_pattern(pattern: Arc<CompiledPattern>) -> Self {
        Self { pattern }
    }

    pub fn pattern(&self) -> &CompiledPattern {
        &self.pattern
    }

    /// Splits `text` into spans with the default options: lengths in chars and no merging.
    pub fn compute_style(&self, text: &str) -> StyleSpans {
        self.compute_style_with(text, &StyleOptions::default())
    }

    /// Splits `text` into spans: one styled span per match, named after the rule owning it,
    /// and plain spans for the text in between.
    ///
    /// Matches are leftmost and non-overlapping, each search resuming where the previous
    /// match ended. Empty matches are stepped over without producing a span.
    pub fn compute_style_with(&self, text: &str, options: &StyleOptions<'_>) -> StyleSpans {
        let mut accumulator = SpanAccumulator::new(text, options);
        let mut region = Region::new();
        let mut pos = 0;

        while pos < text.len() {
            let Some(m) = self.pattern.find_at(text, pos, &mut region) else {
                break;
            };

            if m.start == m.end {
                match text[m.start..].chars().next() {
                    Some(c) => pos = m.start + c.len_utf8(),
                    None => break,
                }
                continue;
            }

            self.produce_match(&mut accumulator, m, options);
            pos = m.end;
        }

        accumulator.finalize()
    }

    /// Covers the gap before a non-empty match with a plain span, then the match itself.
    ///
    /// A match whose owning rule can't be found gets the fallback style.
    fn produce_match(
        &self,
        accumulator: &mut SpanAccumulator<'_>,
        m: PatternMatch,
        options: &StyleOptions<'_>,
    ) {
        let style = m
            .rule
            .and_then(|idx| self.pattern.style(idx))
            .unwrap_or(options.fallback_style);
        #[cfg(feature = "debug")]
        log::debug!(
            "[compute_style] Matched {style} from {} to {} => {:?}",
            m.start,
            m.end,
            &accumulator.text[m.start..m.end]
        );

        accumulator.produce(m.start, None);
        accumulator.produce(m.end, Some(style));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::Rule;
    use crate::options::FALLBACK_STYLE;

    fn styler(rules: Vec<Rule>) -> Styler {
        Styler::new(&Language::new("test", rules).unwrap()).unwrap()
    }

    fn number_word() -> Styler {
        styler(vec![
            Rule::named("number", r"\d+"),
            Rule::named("word", "[a-zA-Z]+"),
        ])
    }

    fn format_spans(spans: &StyleSpans, text: &str) -> String {
        let mut out = String::new();
        for (piece, style) in spans.slices(text) {
            out.push_str(&format!("{:<10}{:?}\n", style.unwrap_or("-"), piece));
        }
        out.trim_end().to_string()
    }

    #[test]
    fn keyword_then_plain() {
        let spans = styler(vec![Rule::named("keyword", r"\bif\b")]).compute_style("if(x)");
        assert_eq!(
            spans.into_vec(),
            vec![Span::styled("keyword", 2), Span::plain(3)]
        );
    }

    #[test]
    fn alternates_rules_and_gaps() {
        let spans = number_word().compute_style("a1 22b");
        assert_eq!(
            spans.into_vec(),
            vec![
                Span::styled("word", 1),
                Span::styled("number", 1),
                Span::plain(1),
                Span::styled("number", 2),
                Span::styled("word", 1),
            ]
        );
    }

    #[test]
    fn no_rules_is_one_plain_span() {
        let styler = Styler::new(&Language::empty("plain")).unwrap();
        assert_eq!(
            styler.compute_style("anything").into_vec(),
            vec![Span::plain(8)]
        );
        assert_eq!(styler.compute_style("").into_vec(), vec![Span::plain(0)]);
    }

    #[test]
    fn empty_text_is_one_empty_span() {
        assert_eq!(
            number_word().compute_style("").into_vec(),
            vec![Span::plain(0)]
        );
    }

    #[test]
    fn text_without_matches_is_plain() {
        assert_eq!(
            number_word().compute_style("  ,;  ").into_vec(),
            vec![Span::plain(6)]
        );
    }

    #[test]
    fn steps_over_empty_matches() {
        let spans = styler(vec![Rule::named("xs", "x*")]).compute_style("axx");
        assert_eq!(
            spans.into_vec(),
            vec![Span::plain(1), Span::styled("xs", 2)]
        );

        let boundary = styler(vec![Rule::named("boundary", r"\b")]);
        let spans = boundary.compute_style("ab cd");
        assert_eq!(spans.into_vec(), vec![Span::plain(5)]);
    }

    #[test]
    fn lengths_follow_the_unit() {
        let styler = styler(vec![Rule::named("accent", "é+")]);
        let text = "aéé 😀";

        let chars = styler.compute_style(text);
        assert_eq!(
            chars.as_slice(),
            [Span::plain(1), Span::styled("accent", 2), Span::plain(2)]
        );

        let bytes =
            styler.compute_style_with(text, &StyleOptions::new().length_unit(LengthUnit::Bytes));
        assert_eq!(
            bytes.as_slice(),
            [Span::plain(1), Span::styled("accent", 4), Span::plain(5)]
        );

        let utf16 =
            styler.compute_style_with(text, &StyleOptions::new().length_unit(LengthUnit::Utf16));
        assert_eq!(
            utf16.as_slice(),
            [Span::plain(1), Span::styled("accent", 2), Span::plain(3)]
        );
        assert_eq!(utf16.unit(), LengthUnit::Utf16);
    }

    #[test]
    fn unidentified_matches_get_the_fallback_style() {
        let styler = number_word();
        let text = "ab cd";

        let options = StyleOptions::default();
        let mut accumulator = SpanAccumulator::new(text, &options);
        let m = PatternMatch {
            rule: None,
            start: 3,
            end: 5,
        };
        styler.produce_match(&mut accumulator, m, &options);
        assert_eq!(
            accumulator.finalize().into_vec(),
            vec![Span::plain(3), Span::styled(FALLBACK_STYLE, 2)]
        );

        let options = StyleOptions::new().fallback_style("unknown");
        let mut accumulator = SpanAccumulator::new(text, &options);
        let m = PatternMatch {
            rule: Some(7),
            start: 0,
            end: 2,
        };
        styler.produce_match(&mut accumulator, m, &options);
        assert_eq!(
            accumulator.finalize().into_vec(),
            vec![Span::styled("unknown", 2), Span::plain(3)]
        );
    }

    #[test]
    fn can_merge_same_style_spans() {
        let styler = styler(vec![Rule::named("letter", r"\w")]);
        assert_eq!(
            styler.compute_style("ab c").into_vec(),
            vec![
                Span::styled("letter", 1),
                Span::styled("letter", 1),
                Span::plain(1),
                Span::styled("letter", 1),
            ]
        );

        let merged =
            styler.compute_style_with("ab c", &StyleOptions::new().merge_same_style_spans(true));
        assert_eq!(
            merged.into_vec(),
            vec![
                Span::styled("letter", 2),
                Span::plain(1),
                Span::styled("letter", 1),
            ]
        );
    }

    #[test]
    fn spans_partition_the_text() {
        let stylers = [
            number_word(),
            Styler::new(&Language::empty("plain")).unwrap(),
            styler(vec![Rule::named("xs", "x*"), Rule::named("dot", r"\.")]),
            styler(vec![
                Rule::named("comment", "#.*"),
                Rule::named("string", r#""[^"]*""#),
                Rule::named("ident", r"\w+"),
            ]),
        ];
        let texts = [
            "",
            " ",
            "x",
            "a1 22b",
            "xx.x..y",
            "let s = \"a # b\" # trailing\nnext line",
            "héllo wörld 42 😀x",
        ];
        let units = [LengthUnit::Chars, LengthUnit::Bytes, LengthUnit::Utf16];

        for styler in &stylers {
            for text in texts {
                for unit in units {
                    let spans =
                        styler.compute_style_with(text, &StyleOptions::new().length_unit(unit));
                    assert_eq!(spans.total_len(), unit.measure(text), "{text:?} in {unit:?}");
                    let rebuilt: String = spans.slices(text).into_iter().map(|(s, _)| s).collect();
                    assert_eq!(rebuilt, text);
                    if !text.is_empty() {
                        assert!(spans.iter().all(|s| s.len > 0), "empty span in {text:?}");
                    }
                    // Plain spans are always separated by a styled one
                    assert!(
                        spans
                            .as_slice()
                            .windows(2)
                            .all(|w| !(w[0].is_plain() && w[1].is_plain()))
                    );
                }
            }
        }
    }

    #[test]
    fn styles_come_from_the_language() {
        let spans = styler(vec![
            Rule::named("comment", "#.*"),
            Rule::named("string", r#""[^"]*""#),
            Rule::named("ident", r"\w+"),
        ])
        .compute_style("say \"hi # there\" # done");
        let text = "say \"hi # there\" # done";
        insta::assert_snapshot!(format_spans(&spans, text), @r##"
        ident     "say"
        -         " "
        string    "\"hi # there\""
        -         " "
        comment   "# done"
        "##);
    }

    #[test]
    fn can_be_shared_between_threads() {
        let styler = number_word();
        std::thread::scope(|s| {
            let handles: Vec<_> = (0..4)
                .map(|i| {
                    let styler = &styler;
                    s.spawn(move || styler.compute_style(&format!("abc {i} def")).len())
                })
                .collect();
            for handle in handles {
                assert_eq!(handle.join().unwrap(), 5);
            }
        });
    }
}
