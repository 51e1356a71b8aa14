use clap::Parser;

use musictube::catalog::LoadOutcome;
use musictube::cli::{self, Args, Command};
use musictube::runtime;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let command = args.command();
    let settings = runtime::load_settings();

    // The browser owns the terminal, so its logs go to a file.
    let log_file = match command {
        Command::Browse => Some(settings.log_path()),
        _ => None,
    };
    runtime::init_logging(&settings.log, log_file.as_deref());

    let (catalog, outcome) = runtime::open_catalog(&settings);
    match &outcome {
        LoadOutcome::Populated(n) => tracing::info!("catalog loaded with {n} tracks"),
        LoadOutcome::Empty => tracing::info!("catalog is empty"),
        LoadOutcome::Degraded(reason) => tracing::warn!("catalog unavailable: {reason}"),
    }

    let tokio_rt = tokio::runtime::Runtime::new()?;

    match command {
        Command::Browse => runtime::browse(&settings, catalog, &outcome, &tokio_rt)?,
        Command::List { genre } => print_lines(cli::list(&catalog, genre.as_deref())),
        Command::Genres => print_lines(cli::genres(&catalog)),
        Command::Search { query, genre } => print_lines(cli::search(
            &tokio_rt,
            &catalog,
            &settings,
            &query,
            genre.as_deref(),
        )?),
        Command::Favorite { id, genre } => {
            println!("{}", cli::favorite(&catalog, &settings, &id, genre.as_deref())?)
        }
        Command::Delete { id } => println!("{}", cli::delete(&catalog, &id)?),
    }

    Ok(())
}

fn print_lines(lines: Vec<String>) {
    for line in lines {
        println!("{line}");
    }
}
