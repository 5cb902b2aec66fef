use std::sync::Arc;

use anyhow::Context;

use intake_agent::agent::{AgentDeps, IntakeAgent};
use intake_agent::config::IntakeConfig;
use intake_agent::eligibility::HttpEligibilityClient;
use intake_agent::flow::EndReason;
use intake_agent::voice::{CliVoice, LocalRooms};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = IntakeConfig::from_env().context("loading configuration")?;
    if config.eligibility.api_key.is_none() {
        eprintln!("Warning: STEDI_API_KEY not set; eligibility checks will transfer to a representative");
    }

    eprintln!("📞 Intake Agent v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Eligibility: {}", config.eligibility.url);
    eprintln!("   Type replies and press Enter. Ctrl-D hangs up.\n");

    let eligibility = HttpEligibilityClient::new(config.eligibility.clone())
        .context("building eligibility client")?;
    let deps = AgentDeps {
        eligibility: Arc::new(eligibility),
        rooms: Arc::new(LocalRooms::new()),
    };
    let agent = IntakeAgent::new(config.flow.clone(), deps)?;

    let outcome = agent.run_conversation(Arc::new(CliVoice::new())).await?;

    let summary = match outcome.reason {
        EndReason::Completed => "completed",
        EndReason::Transferred => "transferred to a representative",
        EndReason::Disconnected => "caller hung up",
    };
    eprintln!(
        "\nConversation {} ended at {}: {}",
        outcome.state.session_id, outcome.last_node, summary
    );

    Ok(())
}
