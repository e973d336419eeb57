// Entrypoint for the CLI application.
// - Keeps `main` small: set up logging, load the configuration, build the
//   chat client and hand it to the menu loop.
// - Returns `anyhow::Result`; request failures are reported inside the menu
//   and never reach this point.

use asistente_python_cli::{
    api::ChatClient,
    config::ChatConfig,
    input::{ReaderInput, TerminalInput},
    ui::Navigator,
};
use std::io::{self, IsTerminal};

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so they never mix with the streamed reply.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp_millis()
        .init();

    let config = ChatConfig::load()?;
    log::debug!("Using {} with model {}", config.endpoint, config.model);
    let client = ChatClient::new(config)?;

    let stdout = io::stdout();
    if io::stdin().is_terminal() {
        Navigator::new(client, TerminalInput, stdout.lock()).run()?;
    } else {
        let input = ReaderInput::new(io::stdin().lock(), io::stdout());
        Navigator::new(client, input, stdout.lock()).run()?;
    }
    Ok(())
}
