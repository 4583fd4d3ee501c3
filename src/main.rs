use anyhow::Context;
use clap::{Parser, Subcommand};
use ringmenu::config;
use ringmenu::menu::RadialLayout;
use ringmenu::sys::{replay, script};
use std::io;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "ringmenu", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Extra config file layered over the user config
    #[arg(short = 'c', long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone)]
enum Commands {
    /// Manage the config file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Feed a pointer script through the menu and print its events
    Replay {
        /// Script file, stdin when omitted
        script: Option<PathBuf>,
    },
    /// Open the overlay and drive the menu with the mouse or touchscreen
    #[cfg(feature = "gui")]
    Run,
}

#[derive(Subcommand, Debug, Clone)]
enum ConfigAction {
    /// Write the default config file if none exists
    Init,
    /// Print where the config file is read from
    Path,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Config {
            action: ConfigAction::Init,
        } => {
            let path = config::write_default_config().context("Failed to write default config")?;
            println!("{}", path.display());
        }
        Commands::Config {
            action: ConfigAction::Path,
        } => println!("{}", config::get_config_path()?.display()),
        Commands::Replay { script } => run_replay(cli.config.as_deref(), script.as_deref())?,
        #[cfg(feature = "gui")]
        Commands::Run => run_gui(cli.config)?,
    }
    Ok(())
}

fn run_replay(config_path: Option<&Path>, script_path: Option<&Path>) -> anyhow::Result<()> {
    let config = config::load_config(config_path).context("Failed to load config")?;

    let input = match script_path {
        Some(path) => fs_err::read_to_string(path)?,
        None => io::read_to_string(io::stdin()).context("Failed to read script from stdin")?,
    };
    let commands = script::parse(&input)?;

    for event in replay::replay(&commands, RadialLayout::new(config.layout), config.items) {
        println!("{}", event);
    }
    Ok(())
}

#[cfg(feature = "gui")]
fn run_gui(config_path: Option<PathBuf>) -> anyhow::Result<()> {
    use relm4::RelmApp;
    use ringmenu::gui::AppModel;
    use ringmenu::sys::runtime;

    let config_path = config_path.map(fs_err::canonicalize).transpose()?;
    let config = config::load_or_default(config_path.as_deref());
    let watch_path = match &config_path {
        Some(path) => path.clone(),
        None => config::get_config_path()?,
    };

    let (tx, rx) = async_channel::bounded(32);

    // Start Background Services
    runtime::start_background_services(watch_path, tx);

    let app = RelmApp::new("org.ringmenu.overlay").with_args(Vec::new());
    app.run::<AppModel>((config, config_path, rx));
    Ok(())
}
