use crate::prelude::{println, *};
use codegen_core::language::Language;
use codegen_core::quality::ValidationView;
use std::fs;
use std::path::PathBuf;

use crate::client::HttpService;
use crate::orchestrator::Orchestrator;
use crate::presenter::TerminalPresenter;

#[derive(Debug, clap::Args, serde::Serialize, serde::Deserialize, Clone)]
pub struct GenerateOptions {
    /// What the generated code should do (e.g., "sort a list")
    #[clap(env = "CODEGEN_QUERY")]
    pub query: String,

    /// Target language: python, cpp, java, javascript, c, ...
    #[arg(short, long, env = "CODEGEN_LANGUAGE", default_value = "python")]
    pub language: String,

    /// Reference code to validate the generated code against
    #[arg(long, conflicts_with = "reference_file")]
    pub reference: Option<String>,

    /// File containing the reference code
    #[arg(long)]
    pub reference_file: Option<PathBuf>,

    /// Save the generated code to the output directory
    #[arg(long)]
    pub save: bool,

    /// Directory downloaded files are written to
    #[arg(short, long, env = "CODEGEN_OUTPUT_DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, serde::Serialize)]
struct GenerateOutput {
    language: Language,
    code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    filename: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    validation: Option<ValidationView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    saved_to: Option<PathBuf>,
}

/// Load the reference code from whichever option was given
fn read_reference(options: &GenerateOptions) -> Result<Option<String>> {
    match (&options.reference, &options.reference_file) {
        (Some(reference), _) => Ok(Some(reference.clone())),
        (None, Some(path)) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read reference file {}", path.display()))
            .map(Some),
        (None, None) => Ok(None),
    }
}

pub async fn run(options: GenerateOptions, global: crate::Global) -> Result<()> {
    let language = Language::from(options.language.as_str());
    let reference = read_reference(&options)?;

    let service = HttpService::from_global(&global)?;
    let presenter = TerminalPresenter::new(&options.output_dir).quiet(options.json);
    let mut orchestrator =
        Orchestrator::new(service, presenter).with_start_hint(global.start_hint.clone());

    if global.verbose {
        println!("Generating {} code...", language);
    }

    orchestrator.check_health().await;

    orchestrator
        .generate(&options.query, &language)
        .await
        .context("Code generation failed")?;

    let validation = match reference {
        Some(reference) => Some(
            orchestrator
                .validate(&reference, &language)
                .await
                .context("Validation failed")?,
        ),
        None => None,
    };

    let saved_to = if options.save {
        Some(orchestrator.download(&language).context("Download failed")?)
    } else {
        None
    };

    if options.json {
        let session = orchestrator.session();
        let output = GenerateOutput {
            language,
            code: session.generated_code().to_string(),
            filename: session.current_filename().map(str::to_string),
            validation,
            saved_to,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if let Some(path) = saved_to {
        println!("Saved to {}", path.display());
    }

    Ok(())
}
