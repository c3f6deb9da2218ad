mod app;
mod cli;

use std::process::ExitCode;

use clap::{CommandFactory, Parser};

use fieldview_engine::device::GpuInit;
use fieldview_engine::input::KeyTable;
use fieldview_engine::logging::init_logging;
use fieldview_engine::window::{Runtime, WinitSurface};

use app::ViewerApp;
use cli::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(msg) = cli.validate() {
        Cli::command()
            .error(clap::error::ErrorKind::TooManyValues, msg)
            .exit();
    }

    init_logging(cli.logging_config());
    print_key_help();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = cli.surface_config();
    let mut runtime = Runtime::<WinitSurface>::new(config.title.clone());

    runtime.create_surface(|| WinitSurface::create(config, GpuInit::default()))?;

    let mut app = ViewerApp::new(cli.shader_paths(), cli.textures.clone());
    runtime.run(&mut app)?;
    Ok(())
}

fn print_key_help() {
    println!("controls:");
    for (name, description) in KeyTable::new().help() {
        println!("  {name}\t- {description}");
    }
    println!();
}
