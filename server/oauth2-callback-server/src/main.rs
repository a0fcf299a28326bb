use std::process::ExitCode;

use oauth2_callback_server::{
    config, logging, parse_args, CallbackError, CallbackServer, CliOutcome, LoopbackProbe,
    RunArgs, ServerConfig,
};

#[tokio::main]
async fn main() -> ExitCode {
    config::load_dotenv();
    logging::init_logging(&config::log_level_from_env());

    let run = match parse_args(std::env::args_os()) {
        CliOutcome::Run(run) => run,
        CliOutcome::ShowHelp(text) => {
            println!("{}", text);
            return ExitCode::SUCCESS;
        }
        CliOutcome::Fail(err) => return report(err),
    };

    match start(run).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => report(err),
    }
}

async fn start(run: RunArgs) -> Result<(), CallbackError> {
    let requested_port = config::requested_port(run.port)?;

    let server_config = ServerConfig::resolve(requested_port, &LoopbackProbe)?;
    let bound = CallbackServer::new(server_config).bind()?;

    println!(
        "OAuth2 callback server running at {}",
        server_config.callback_url()
    );

    bound.run().await
}

fn report(err: CallbackError) -> ExitCode {
    tracing::debug!("startup failed: {:?}", err);
    eprintln!("Error: {}", err);
    ExitCode::from(1)
}
