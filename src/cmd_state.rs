use std::path::*;
use clap::Args;
use flat_picker::{config::*, flat_state::*, frame_info::*, fs_utils::*};

#[derive(Args, Debug)]
pub struct CmdOptions {
    /// State file with flat cutoff dates
    #[arg(long)]
    state_file: Option<PathBuf>,

    /// Blink directory to advance cutoff for
    #[arg(long, requires = "cutoff")]
    blink_dir: Option<PathBuf>,

    /// New cutoff date (YYYY-MM-DD). Earlier dates are ignored.
    #[arg(long, requires = "blink_dir")]
    cutoff: Option<String>,
}

pub fn execute(options: CmdOptions, config: &Config) -> anyhow::Result<()> {
    let state_file = match options.state_file {
        Some(state_file) => state_file,
        None => config.state_file_name()?,
    };
    let mut state = FlatState::load(&state_file)?;

    if let (Some(blink_dir), Some(cutoff)) = (&options.blink_dir, &options.cutoff) {
        if parse_iso_date(cutoff).is_none() {
            anyhow::bail!("Cutoff `{}` is not a YYYY-MM-DD date", cutoff);
        }
        let blink_dir = blink_dir_id(blink_dir)?;
        state.update_cutoff(&blink_dir, cutoff);
        state.save(&state_file)?;
    }

    println!("{}", path_to_str(&state_file));
    if state.is_empty() {
        println!("  no cutoff dates");
    }
    for (blink_dir, cutoff) in state.iter() {
        println!("  {}  {}", cutoff, blink_dir);
    }

    Ok(())
}
