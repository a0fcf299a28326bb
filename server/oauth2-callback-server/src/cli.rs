use std::ffi::OsString;

use clap::error::ErrorKind;
use clap::Parser;

use crate::config::parse_port;
use crate::error::CallbackError;

const AFTER_HELP: &str = "\
Examples:
  oauth2-callback-server
  oauth2-callback-server --port 8090
  oauth2-callback-server -p 8090";

#[derive(Parser, Debug, Clone)]
#[clap(
    name = "oauth2-callback-server",
    about = "OAuth2 Callback Server for Bruno",
    after_help = AFTER_HELP
)]
pub struct Cli {
    /// Port number (default: 8090, or next available)
    #[clap(long, short, value_name = "NUMBER", allow_hyphen_values = true)]
    pub port: Option<String>,
}

/// Validated command line input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunArgs {
    pub port: Option<u16>,
}

#[derive(Debug)]
pub enum CliOutcome {
    Run(RunArgs),
    ShowHelp(String),
    Fail(CallbackError),
}

/// Parse arguments (program name first) without exiting the process.
pub fn parse_args<I, T>(args: I) -> CliOutcome
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) if err.kind() == ErrorKind::DisplayHelp => {
            return CliOutcome::ShowHelp(err.render().to_string())
        }
        Err(err) => return CliOutcome::Fail(CallbackError::InvalidArgument(usage_error(&err))),
    };

    match cli.port.as_deref().map(parse_port).transpose() {
        Ok(port) => CliOutcome::Run(RunArgs { port }),
        Err(err) => CliOutcome::Fail(err),
    }
}

/// clap's rendered error without its own `error: ` lead, which the caller adds.
fn usage_error(err: &clap::Error) -> String {
    let rendered = err.render().to_string();
    let rendered = rendered.trim_end();
    rendered
        .strip_prefix("error: ")
        .unwrap_or(rendered)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_port(args: &[&str]) -> Option<u16> {
        match parse_args(args.iter().copied()) {
            CliOutcome::Run(run) => run.port,
            other => panic!("expected run for {:?}, got {:?}", args, other),
        }
    }

    #[test]
    fn test_no_arguments_auto_selects() {
        assert_eq!(run_port(&["oauth2-callback-server"]), None);
    }

    #[test]
    fn test_port_flag_forms() {
        assert_eq!(run_port(&["bin", "--port", "8090"]), Some(8090));
        assert_eq!(run_port(&["bin", "--port=9000"]), Some(9000));
        assert_eq!(run_port(&["bin", "-p", "1"]), Some(1));
        assert_eq!(run_port(&["bin", "-p", "65535"]), Some(65535));
    }

    #[test]
    fn test_out_of_range_ports_fail() {
        for raw in ["0", "65536", "99999", "abc", "-5", ""] {
            let args = ["bin", "--port", raw];
            match parse_args(args) {
                CliOutcome::Fail(CallbackError::InvalidArgument(msg)) => {
                    assert!(msg.contains("between 1 and 65535"), "{raw:?}: {msg}")
                }
                other => panic!("expected invalid argument for {raw:?}, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_help_is_reported_not_exited() {
        for flag in ["--help", "-h"] {
            match parse_args(["bin", flag]) {
                CliOutcome::ShowHelp(text) => {
                    assert!(text.contains("--port"));
                    assert!(text.contains("default: 8090, or next available"));
                    assert!(text.contains("oauth2-callback-server -p 8090"));
                }
                other => panic!("expected help, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_unknown_flag_fails() {
        match parse_args(["bin", "--verbose"]) {
            CliOutcome::Fail(err @ CallbackError::InvalidArgument(_)) => {
                let message = err.to_string();
                assert!(
                    message.starts_with("unexpected argument '--verbose'"),
                    "{message}"
                );
                assert!(!message.to_lowercase().starts_with("error:"));
            }
            other => panic!("expected invalid argument, got {:?}", other),
        }
        assert!(matches!(
            parse_args(["bin", "--port"]),
            CliOutcome::Fail(CallbackError::InvalidArgument(_))
        ));
    }
}
