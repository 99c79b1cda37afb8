use crate::prelude::*;
use clap::Parser;
use codegen_core::notice::DEFAULT_START_HINT;

mod client;
mod error;
mod generate;
mod health;
mod orchestrator;
mod prelude;
mod presenter;
mod shell;

#[derive(Debug, clap::Parser)]
#[command(
    author,
    version,
    about,
    long_about = "Generate code with a remote service, validate it against reference code and save it locally"
)]
pub struct App {
    #[command(subcommand)]
    pub command: SubCommands,

    #[clap(flatten)]
    global: Global,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// Base URL of the generation and validation API
    #[clap(
        long,
        env = "CODEGEN_API_URL",
        global = true,
        default_value = "http://localhost:5000/api"
    )]
    api_url: String,

    /// Request timeout in seconds (the transport default applies when unset)
    #[clap(long, env = "CODEGEN_TIMEOUT", global = true)]
    timeout: Option<u64>,

    /// Command suggested to the user when the service is not reachable
    #[clap(long, env = "CODEGEN_START_HINT", global = true, default_value = DEFAULT_START_HINT)]
    start_hint: String,

    /// Whether to display additional information.
    #[clap(long, env = "CODEGEN_VERBOSE", global = true, default_value = "false")]
    verbose: bool,
}

#[derive(Debug, clap::Parser)]
pub enum SubCommands {
    /// Check whether the service is reachable
    Health(crate::health::HealthOptions),

    /// Generate code once, optionally validating and saving it
    Generate(crate::generate::GenerateOptions),

    /// Interactive session: generate, validate and download repeatedly
    Shell(crate::shell::ShellOptions),
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    color_eyre::install()?;

    let app = App::parse();

    match app.command {
        SubCommands::Health(options) => crate::health::run(options, app.global).await,
        SubCommands::Generate(options) => crate::generate::run(options, app.global).await,
        SubCommands::Shell(options) => crate::shell::run(options, app.global).await,
    }
    .map_err(|err: color_eyre::eyre::Report| eyre!(err))
}
