//! nkhost CLI entry point.

mod cli;

use std::error::Error;
use std::path::Path;

use clap::Parser;
use cli::{Cli, Command};
use nkhost::logging::init_logging;
use nkhost::{Host, HookSlot, install_runtime, options_file, render_header, selftest};

fn main() {
    let cli = Cli::parse();
    init_logging();

    let result = match cli.command {
        Command::Header { options, output } => header(options.as_deref(), output.as_deref()),
        Command::Show { options } => show(options.as_deref()),
        Command::Check { options } => check(options.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn header(options: Option<&Path>, output: Option<&Path>) -> Result<(), Box<dyn Error>> {
    let options = options_file::resolve(options)?;
    let header = render_header(&options);
    match output {
        Some(path) => {
            std::fs::write(path, &header)?;
            tracing::info!(path = %path.display(), "wrote configuration header");
        }
        None => print!("{header}"),
    }
    Ok(())
}

fn show(options: Option<&Path>) -> Result<(), Box<dyn Error>> {
    let options = options_file::resolve(options)?;
    print!("{}", toml::to_string(&options)?);
    Ok(())
}

fn check(options: Option<&Path>) -> Result<(), Box<dyn Error>> {
    let options = options_file::resolve(options)?;
    install_runtime(options)?;
    let host = Host::installed()?;
    let report = selftest::run(&host)?;

    for slot in HookSlot::ALL {
        let binding = slot.redirect_macro().unwrap_or("(typed formatter)");
        println!("{binding:<20} {:<18} ok", slot.symbol());
    }
    println!(
        "inv_sqrt relative error {:.2e}, trig error {:.2e}",
        report.inv_sqrt_error, report.trig_error
    );
    Ok(())
}
