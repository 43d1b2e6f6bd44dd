use rulestyle::{Language, Rule, Styler};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let language = Language::new(
        "demo",
        vec![
            Rule::named("comment", "//.*"),
            Rule::named("keyword", r"\b(?:let|fn|if|else|return)\b"),
            Rule::named("number", r"\b\d+\b"),
        ],
    )?;
    let styler = Styler::new(&language)?;

    let code = "let x = 42; // the answer";
    let spans = styler.compute_style(code);
    for (text, style) in spans.slices(code) {
        println!("{:<10}{text:?}", style.unwrap_or("-"));
    }

    Ok(())
}
