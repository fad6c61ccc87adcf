use std::path::*;
use clap::{Parser, Subcommand};
use flat_picker::{config::*, log_utils::*};

mod cmd_candidates;
mod cmd_resolve;
mod cmd_state;

#[derive(Subcommand, Debug)]
enum SubCommands {
    /// Select flats for lights, asking for substitutes when no flat of light date exists
    Resolve(cmd_resolve::CmdOptions),

    /// Show or advance flat cutoff dates
    State(cmd_state::CmdOptions),

    /// List flat dates covering all given filters
    Candidates(cmd_candidates::CmdOptions),
}

#[derive(Parser, Debug)]
#[command(version, about)]
struct Opt {
    #[command(subcommand)]
    cmd: SubCommands,

    /// Path for saving log files
    #[arg(long, global = true)]
    log_path: Option<PathBuf>,

    /// Config file (JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Debug messages in log
    #[arg(short, long, global = true)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let opt = Opt::parse();

    let log_path = match &opt.log_path {
        Some(log_path) => log_path.clone(),
        None => {
            let mut log_dir = get_app_conf_dir(true)?;
            log_dir.push("logs");
            log_dir
        }
    };
    let _logger = start_logger(&log_path, opt.verbose)?;
    log::info!(
        "Application {} {} started. Options = {:#?}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        opt.cmd
    );

    std::panic::set_hook(Box::new(panic_handler));

    let config_file = match &opt.config {
        Some(config_file) => config_file.clone(),
        None => Config::get_file_name(false)?,
    };
    let config = Config::load(&config_file)?;

    let result = match opt.cmd {
        SubCommands::Resolve(opts) =>
            cmd_resolve::execute(opts, &config),

        SubCommands::State(opts) =>
            cmd_state::execute(opts, &config),

        SubCommands::Candidates(opts) =>
            cmd_candidates::execute(opts, &config),
    };

    if let Err(err) = &result {
        log::error!("{:?}", err);
    }

    result
}

fn panic_handler(panic_info: &std::panic::PanicHookInfo) {
    if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
        log::error!("panic occurred: {}", s);
    } else {
        log::error!("panic occurred");
    }

    if let Some(loc) = panic_info.location() {
        log::error!("at location: {}", loc);
    }
}
