use crate::prelude::{eprintln, println, *};

use crate::client::{CodeService, HttpService};
use crate::orchestrator::Orchestrator;
use crate::presenter::TerminalPresenter;

#[derive(Debug, clap::Args, serde::Serialize, serde::Deserialize, Clone)]
pub struct HealthOptions {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, serde::Serialize)]
struct HealthOutput {
    api_url: String,
    healthy: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

pub async fn run(options: HealthOptions, global: crate::Global) -> Result<()> {
    let service = HttpService::from_global(&global)?;

    if global.verbose {
        eprintln!("API base: {}", service.base_url());
    }

    let healthy = if options.json {
        let result = service.health().await;
        let output = HealthOutput {
            api_url: service.base_url().to_string(),
            healthy: result.is_ok(),
            model: result.as_ref().ok().and_then(|health| health.model.clone()),
            error: result.as_ref().err().map(|e| e.to_string()),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        output.healthy
    } else {
        let orchestrator = Orchestrator::new(service, TerminalPresenter::new("."))
            .with_start_hint(global.start_hint.clone());
        orchestrator.check_health().await
    };

    if !healthy {
        return Err(eyre!("Service at {} is not healthy", global.api_url));
    }

    Ok(())
}
