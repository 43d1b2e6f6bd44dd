use std::fs;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use rulestyle::{LengthUnit, Registry, StyleOptions};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Unit {
    Chars,
    Bytes,
    Utf16,
}

impl From<Unit> for LengthUnit {
    fn from(unit: Unit) -> Self {
        match unit {
            Unit::Chars => LengthUnit::Chars,
            Unit::Bytes => LengthUnit::Bytes,
            Unit::Utf16 => LengthUnit::Utf16,
        }
    }
}

/// Prints the style spans of a file
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// JSON language definition
    #[arg(short, long)]
    language: PathBuf,

    /// File to style
    input: PathBuf,

    #[arg(short, long, value_enum, default_value_t = Unit::Chars)]
    unit: Unit,

    /// Merge consecutive spans with the same style
    #[arg(short, long)]
    merge: bool,

    /// Print the spans as JSON instead of one span per line
    #[arg(long)]
    json: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut registry = Registry::default();
    registry.add_language_from_path(&cli.language)?;
    let name = registry
        .language_names()
        .first()
        .map(|n| n.to_string())
        .ok_or("no language loaded")?;

    let text = fs::read_to_string(&cli.input)?;
    let options = StyleOptions::new()
        .length_unit(cli.unit.into())
        .merge_same_style_spans(cli.merge);
    let spans = registry.style(&text, &name, &options)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&spans)?);
        return Ok(());
    }

    for (span, (piece, _)) in spans.iter().zip(spans.slices(&text)) {
        println!(
            "{:<20}{:>6}  {piece:?}",
            span.style.as_deref().unwrap_or("-"),
            span.len
        );
    }
    Ok(())
}
