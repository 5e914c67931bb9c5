use std::io;

use color_eyre::Result;
use forksh::{config::Config, signals, state::State};
use tracing_subscriber::prelude::*;

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::load()?;

    let (writer, _guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(
        &config.log.directory,
        &config.log.file,
    ));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false),
        )
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_error::ErrorLayer::default())
        .init();

    color_eyre::install()?;

    signals::install()?;

    State::new(config).run(&mut io::stdin().lock(), &mut io::stdout())?;

    Ok(())
}
