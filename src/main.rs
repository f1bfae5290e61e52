use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};

use doctransfer::{HeaderFooterPick, StyleMap, TransferConfig, transfer_folder};

#[derive(Clone, Copy, ValueEnum)]
enum Pick {
    First,
    Last,
}

impl From<Pick> for HeaderFooterPick {
    fn from(pick: Pick) -> Self {
        match pick {
            Pick::First => HeaderFooterPick::First,
            Pick::Last => HeaderFooterPick::Last,
        }
    }
}

#[derive(Parser)]
#[command(name = "doctransfer")]
#[command(version)]
#[command(about = "Migrate DOCX content into a styled template", long_about = None)]
struct Cli {
    /// Folder holding the documents to transfer
    #[arg(value_name = "INPUT", default_value = "Insert Non-Transferred Document Here")]
    input: PathBuf,

    /// Template document the content is written into
    #[arg(short, long, value_name = "FILE", default_value = "resources/template.docx")]
    template: PathBuf,

    /// Folder receiving the transferred documents
    #[arg(short, long, value_name = "DIR", default_value = "Transferred Document Will Be Here")]
    output: PathBuf,

    /// Scratch folder for images pulled from the source documents
    #[arg(long, value_name = "DIR", default_value = "resources/extracted_images")]
    staging: PathBuf,

    /// Extra style mapping, e.g. --map "Body Text=00_TEXT" (repeatable)
    #[arg(long = "map", value_name = "FROM=TO", value_parser = parse_mapping)]
    mappings: Vec<(String, String)>,

    /// Which header/footer table wins when the source has several
    #[arg(long, value_enum, default_value = "last")]
    header_pick: Pick,

    /// Width of placed figures, in inches
    #[arg(long, default_value_t = 3.0, value_parser = parse_width)]
    image_width: f32,

    /// Also save every source table to <name>_supplemental_tables.docx
    #[arg(long)]
    supplemental_tables: bool,
}

fn parse_mapping(s: &str) -> Result<(String, String), String> {
    let (from, to) = s
        .split_once('=')
        .ok_or_else(|| format!("expected FROM=TO, got '{s}'"))?;
    if from.is_empty() || to.is_empty() {
        return Err(format!("empty style name in '{s}'"));
    }
    Ok((from.to_string(), to.to_string()))
}

fn parse_width(s: &str) -> Result<f32, String> {
    let width: f32 = s.parse().map_err(|e| format!("invalid width '{s}': {e}"))?;
    if !width.is_finite() || width <= 0.0 {
        return Err(format!("width must be a positive number of inches, got '{s}'"));
    }
    Ok(width)
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let config = TransferConfig {
        style_map: StyleMap::with_overrides(&cli.mappings),
        header_footer_pick: cli.header_pick.into(),
        image_width_in: cli.image_width,
        supplemental_tables: cli.supplemental_tables,
        ..TransferConfig::default()
    };

    let outcomes = match transfer_folder(
        &cli.input,
        &cli.template,
        &cli.output,
        &cli.staging,
        &config,
    ) {
        Ok(outcomes) => outcomes,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
    if failed > 0 {
        eprintln!("{failed} of {} document(s) failed", outcomes.len());
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_width_must_be_positive() {
        assert_eq!(parse_width("2.5"), Ok(2.5));
        assert!(parse_width("0").is_err());
        assert!(parse_width("-1").is_err());
        assert!(parse_width("NaN").is_err());
        assert!(parse_width("wide").is_err());
    }

    #[test]
    fn cli_rejects_zero_image_width() {
        assert!(Cli::try_parse_from(["doctransfer", "--image-width", "0"]).is_err());
        let cli = Cli::try_parse_from(["doctransfer", "--image-width", "4"]).unwrap();
        assert_eq!(cli.image_width, 4.0);
    }

    #[test]
    fn mappings_need_both_names() {
        assert_eq!(
            parse_mapping("Body Text=00_TEXT"),
            Ok(("Body Text".to_string(), "00_TEXT".to_string()))
        );
        assert!(parse_mapping("=00_TEXT").is_err());
        assert!(parse_mapping("Body Text").is_err());
    }
}
