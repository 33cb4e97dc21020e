use anyhow::Result;
use clap::Parser;
use lazypanes::app::{self, Gui};
use lazypanes::config::{self, Config};
use lazypanes::logging;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "lazypanes",
    about = "A terminal git client built on uniform, windowed list panels",
    version
)]
struct Args {
    /// Path to the repository (defaults to current directory)
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Config file to use instead of the default location
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write debug logs to development.log in the config directory
    #[arg(short, long)]
    debug: bool,

    /// Print the default config and exit
    #[arg(long)]
    print_default_config: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.print_default_config {
        print!("{}", Config::default_toml());
        return Ok(());
    }

    if args.debug {
        let path = logging::init()?;
        eprintln!("Logging to {}", path.display());
    }

    let config = match Config::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            if config::is_missing(&e) {
                eprintln!(
                    "Hint: `lazypanes --print-default-config > {}` writes a starting point",
                    Config::config_location()
                );
            }
            return Err(e.into());
        }
    };

    let path = args.path.canonicalize()?;
    let gui = Gui::new(config, &path)?;
    app::run_tui(gui)
}
