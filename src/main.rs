// Entrypoint for the CLI application.
// - Keeps `main` small: parse arguments, build the API client and the
//   local state handle, then run exactly one command.
// - Any error that reaches here is fatal: it is logged and the process
//   exits with a non-zero status.

use env_logger::Env;
use log::error;
use naruken::{api::ApiClient, cli, config::Config, state::StateStore};

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let invocation = match cli::parse_args(std::env::args()) {
        Ok(invocation) => invocation,
        Err(e) => e.exit(),
    };

    if let Err(e) = run(invocation) {
        error!("{e:#}");
        std::process::exit(1);
    }
}

fn run(invocation: cli::Invocation) -> anyhow::Result<()> {
    // Configured by `NARUKEN_API_URL` and `NARUKEN_STATE_DIR`.
    let config = Config::from_env();
    let api = ApiClient::new(&config)?;
    let store = StateStore::new(&config.state_dir);

    let stdout = std::io::stdout();
    cli::execute(invocation, &api, &store, &mut stdout.lock())?;
    Ok(())
}
