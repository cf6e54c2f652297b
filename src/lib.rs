pub mod cli;
pub mod core;
pub mod server;
pub mod store;

use anyhow::Result;
use chrono::{Local, NaiveDate};
use std::sync::Arc;
use tracing::{debug, info};

pub enum AppCommand {
    Serve,
    Lookup {
        currency_a: String,
        currency_b: String,
        date: Option<NaiveDate>,
    },
    List,
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Cut-off service starting...");

    let config = match config_path {
        Some(path) => core::config::AppConfig::load_from_path(path)?,
        None => core::config::AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    // The table is fully built before anything can query it
    let store = store::open_store(&config.store)?;
    let table = store::build_table(store.as_ref()).await?;

    match command {
        AppCommand::Serve => {
            let resolver = Arc::new(core::Resolver::new(table));
            server::serve(&config.server, resolver, store).await
        }
        AppCommand::Lookup {
            currency_a,
            currency_b,
            date,
        } => {
            let resolver = core::Resolver::new(table);
            let today = Local::now().date_naive();
            let date = date.unwrap_or(today);
            let output = cli::lookup::run(&resolver, &currency_a, &currency_b, date, today)?;
            println!("{output}");
            Ok(())
        }
        AppCommand::List => {
            println!("{}", cli::list::display_table(&table));
            Ok(())
        }
    }
}
