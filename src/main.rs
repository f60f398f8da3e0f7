use std::process::ExitCode;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use ssm_port_forward::config::{Command, Config};
use ssm_port_forward::github::{EnvInputs, GithubReporter, GithubState};
use ssm_port_forward::session::{ForwardingScript, SsmClient, Starter, Terminator};

#[tokio::main]
async fn main() -> ExitCode {
    // Parse CLI arguments
    let cli = Config::parse_args();

    // Setup logging
    setup_logging(cli.debug);

    // Run the requested job phase
    match cli.command {
        Command::Start => {
            Starter::new(
                EnvInputs,
                GithubState,
                ForwardingScript::bundled(),
                GithubReporter,
            )
            .run()
            .await
        }
        Command::Stop => {
            Terminator::new(SsmClient::from_env(), GithubState, GithubReporter)
                .run()
                .await
        }
    }
}

fn setup_logging(debug: bool) {
    let filter = if debug {
        EnvFilter::new("ssm_port_forward=debug")
    } else {
        EnvFilter::new("ssm_port_forward=info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}
