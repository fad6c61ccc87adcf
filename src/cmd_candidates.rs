use std::{path::*, collections::*};
use anyhow::Context;
use clap::Args;
use flat_picker::{config::*, flat_library::*, flat_select::*, frame_info::*, fs_utils::*};

#[derive(Args, Debug)]
pub struct CmdOptions {
    /// `.frame_info` file of light frame
    #[arg(long)]
    light: PathBuf,

    /// Directory of master calibration frames (default from config)
    #[arg(long)]
    library: Option<PathBuf>,

    /// Filters which must all have flats (default is light's filter)
    #[arg(long, value_delimiter = ',')]
    filters: Vec<String>,

    /// Earliest flat date (YYYY-MM-DD)
    #[arg(long)]
    cutoff: Option<String>,
}

pub fn execute(options: CmdOptions, config: &Config) -> anyhow::Result<()> {
    let library_dir = crate::cmd_resolve::library_dir(options.library.as_deref(), config)?;
    if let Some(cutoff) = &options.cutoff {
        if parse_iso_date(cutoff).is_none() {
            anyhow::bail!("Cutoff `{}` is not a YYYY-MM-DD date", cutoff);
        }
    }

    let text = std::fs::read_to_string(&options.light)
        .with_context(|| format!("Can't read {}", path_to_str(&options.light)))?;
    let light: FrameInfo = serde_json::from_str(&text)?;

    let mut required: BTreeSet<String> = options.filters.iter()
        .map(|f| f.trim().to_string())
        .filter(|f| !f.is_empty())
        .collect();
    if required.is_empty() {
        required.extend(light.filter.clone());
    }

    let library = FrameLibrary::load(&library_dir)?;
    let candidates = find_candidate_dates_with_all_filters(
        &library,
        &light,
        &required,
        options.cutoff.as_deref()
    );

    println!("Flat dates for {}:", filter_label(&required));
    if candidates.is_empty() {
        println!("  none");
    }
    for (date, flat) in &candidates {
        println!("  {}  {}", date, flat.file_name_str());
    }

    Ok(())
}
