mod app;
mod cli;

use clap::Parser;
use cli::Cli;

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Cli::parse();

    // Init logging — peek at config for the file-logging settings
    let peeked = chattrace_core::config::Config::load(&args.config).ok();
    let to_file = peeked.as_ref().is_some_and(|c| c.logging_to_file);
    let log_dir = peeked.as_ref().and_then(|c| c.log_dir.clone());
    let _guard = chattrace_core::lifecycle::logging::init_logging(
        &args.log_level,
        to_file,
        log_dir.as_deref(),
    );

    // Build and run on a multi-thread runtime
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        let application = app::Application::build(&args)?;
        application.serve().await
    })
}
