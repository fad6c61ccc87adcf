use std::path::*;
use clap::Args;
use anyhow::Context;
use itertools::Itertools;
use flat_picker::{
    config::*,
    flat_library::*,
    flat_plan::*,
    flat_select::*,
    flat_state::*,
    frame_info::*,
    fs_utils::*,
    picker::*,
    progress::*,
};

#[derive(Args, Debug)]
pub struct CmdOptions {
    /// Directory with `.frame_info` files of light frames
    #[arg(long)]
    lights: PathBuf,

    /// Directory of master calibration frames (default from config)
    #[arg(long)]
    library: Option<PathBuf>,

    /// Blink directory the lights are reviewed in (default is lights directory)
    #[arg(long)]
    blink_dir: Option<PathBuf>,

    /// State file with flat cutoff dates
    #[arg(long)]
    state_file: Option<PathBuf>,

    /// Don't ask for substitute flats
    #[arg(short, long)]
    quiet: bool,

    /// Max count of older and newer dates in picker
    #[arg(long)]
    picker_limit: Option<usize>,

    /// Allow darks of other exposure
    #[arg(long)]
    scale_dark: bool,

    /// Don't save state file
    #[arg(long)]
    dry_run: bool,

    /// Save resulting plan as JSON
    #[arg(long)]
    plan_file: Option<PathBuf>,
}

pub fn library_dir(library: Option<&Path>, config: &Config) -> anyhow::Result<PathBuf> {
    library
        .map(Path::to_path_buf)
        .or_else(|| config.library_dir.clone())
        .ok_or_else(|| anyhow::anyhow!("Library directory is not set (use --library or config)"))
}

pub fn execute(options: CmdOptions, config: &Config) -> anyhow::Result<()> {
    let library_dir = library_dir(options.library.as_deref(), config)?;
    let state_file = match options.state_file {
        Some(state_file) => state_file,
        None => config.state_file_name()?,
    };
    let picker_limit = options.picker_limit.unwrap_or(config.picker_limit);
    if picker_limit == 0 {
        anyhow::bail!("Picker limit must be at least 1");
    }
    let scale_dark = options.scale_dark || config.scale_dark;
    let blink_dir = blink_dir_id(options.blink_dir.as_deref().unwrap_or(&options.lights))?;

    let mut state = FlatState::load(&state_file)?;
    let library = FrameLibrary::load(&library_dir)?;
    let lights = load_frame_infos(&options.lights)?;
    let groups = group_lights(lights);
    let filters_by_date = collect_filters_by_date(&groups);
    log::info!(
        "{} light groups, {} dates, blink directory {}",
        groups.len(), filters_by_date.len(), blink_dir
    );

    let selections = pre_resolve_flat_selections(
        &library,
        &library,
        &groups,
        &filters_by_date,
        &blink_dir,
        &mut state,
        options.quiet,
        scale_dark,
        picker_limit,
        &mut ConsolePrompt,
        &mut ProgressConsole::new()
    );

    let plan = plan_flat_assignments(
        &library,
        &library,
        &groups,
        &selections,
        &blink_dir,
        &mut state,
        scale_dark
    );

    print_plan(&plan);

    if let Some(plan_file) = &options.plan_file {
        save_plan(&plan, plan_file)?;
        log::info!("Plan saved into {}", path_to_str(plan_file));
    }

    if options.dry_run {
        log::info!("Dry run, state file {} not saved", path_to_str(&state_file));
    } else {
        state.save(&state_file)?;
    }

    Ok(())
}

fn save_plan(plan: &[FlatAssignment], file_name: &Path) -> anyhow::Result<()> {
    let json_str = serde_json::to_string_pretty(plan)?;
    std::fs::write(file_name, json_str)
        .with_context(|| format!("Can't write plan file {}", path_to_str(file_name)))?;
    Ok(())
}

fn print_plan(plan: &[FlatAssignment]) {
    println!();
    let sorted = plan.iter()
        .sorted_by(|a1, a2| (&a1.light_date, &a1.filter).cmp(&(&a2.light_date, &a2.filter)));
    for (date, items) in &sorted.group_by(|a| a.light_date.clone()) {
        println!("{}", date);
        for item in items {
            let file_name = item.flat()
                .map(|flat| flat.file_name_str().to_string())
                .unwrap_or_else(|| "NO FLAT".to_string());
            let text = match &item.source {
                FlatSource::Substitute { date, .. } =>
                    format!("{} (flat of {})", file_name, date),
                _ => file_name,
            };
            println!("  {:<8} {:>4} lights: {}", item.filter, item.lights_count, text);
        }
    }

    let missing = plan.iter()
        .filter(|a| a.source == FlatSource::Missing)
        .count();
    if missing != 0 {
        println!("{} light groups without flat", missing);
    }
}
