use clap::{Parser, Subcommand};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(author, version, about = "SSM port-forwarding session helper for CI jobs")]
pub struct Config {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Job phase to run
    #[command(subcommand)]
    pub command: Command,
}

/// Job phases
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Establish the port-forwarding session (job start)
    Start,
    /// Terminate the recorded session (job end)
    Stop,
}

impl Config {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_start_phase() {
        let config = Config::try_parse_from(["ssm-port-forward", "start"]).unwrap();
        assert!(matches!(config.command, Command::Start));
        assert!(!config.debug);
    }

    #[test]
    fn test_parse_stop_with_debug() {
        let config = Config::try_parse_from(["ssm-port-forward", "stop", "--debug"]).unwrap();
        assert!(matches!(config.command, Command::Stop));
        assert!(config.debug);
    }

    #[test]
    fn test_phase_is_required() {
        assert!(Config::try_parse_from(["ssm-port-forward"]).is_err());
    }
}
