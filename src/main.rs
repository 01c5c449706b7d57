use clap::error::ErrorKind;
use gmb::{
    cli::execute_command,
    commands::{create_cli_commands, PARAMETER_VERBOSE},
    error::CliError,
    error_utils::report_error,
};
use tracing_subscriber::EnvFilter;

/// Main entry point for the program
#[tokio::main]
async fn main() {
    // Parse the arguments before anything else, usage errors do not depend on configuration
    let matches = match create_cli_commands().try_get_matches() {
        Ok(matches) => matches,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => exit_with(CliError::UsageError(e.render().to_string().trim_end().to_string())),
    };

    // Initialize the logging subsystem
    let filter = if matches.get_flag(PARAMETER_VERBOSE) {
        EnvFilter::new("gmb=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = execute_command(&matches).await {
        exit_with(e);
    }
}

fn exit_with(error: CliError) -> ! {
    report_error(&error);
    std::process::exit(error.exit_code().code());
}
