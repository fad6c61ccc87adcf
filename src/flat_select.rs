use std::collections::*;
use itertools::Itertools;
use crate::{
    frame_info::*,
    flat_library::*,
    flat_state::*,
    picker::*,
    progress::*,
    log_utils::*,
};

/// Date -> all filters used for lights of that date
pub type FiltersByDate = BTreeMap<String, BTreeSet<String>>;

/// Date -> flat date selected by operator
pub type FlatSelections = BTreeMap<String, String>;

pub fn collect_filters_by_date(groups: &LightGroups) -> FiltersByDate {
    let mut result = FiltersByDate::new();
    for key in groups.keys() {
        let Some((filter, date)) = key.filter_and_date() else {
            log::debug!("Skipping group with incomplete key {:?}", key);
            continue;
        };
        result.entry(date.to_string())
            .or_default()
            .insert(filter.to_string());
    }
    result
}

/// Dates at or after `cutoff` having flats for every filter of `required_filters`
pub fn find_candidate_dates_with_all_filters(
    library:          &dyn FlatLookup,
    light:            &FrameInfo,
    required_filters: &BTreeSet<String>,
    cutoff:           Option<&str>,
) -> CandidateDates {
    let mut result: Option<CandidateDates> = None;
    for filter in required_filters {
        let search_info = light.with_filter(filter);
        let dates = library.find_candidate_flat_dates(&search_info, cutoff);
        log::debug!(
            "Filter {}: candidate dates [{}]",
            filter, dates.keys().join(", ")
        );
        result = Some(match result {
            None => dates,
            Some(mut common) => {
                common.retain(|date, _| dates.contains_key(date));
                common
            }
        });
        if result.as_ref().is_some_and(|r| r.is_empty()) {
            break;
        }
    }
    result.unwrap_or_default()
}

pub fn filter_label(required_filters: &BTreeSet<String>) -> String {
    if required_filters.len() == 1 {
        required_filters.iter().next().cloned().unwrap_or_default()
    } else {
        format!("ALL ({})", required_filters.iter().join(", "))
    }
}

/// Asks operator for substitute flat date for lights of `light_date`.
/// Returns selected flat date. Updates cutoff of `blink_dir` in `state`.
pub fn resolve_flat_for_date(
    library:          &dyn FlatLookup,
    light:            &FrameInfo,
    light_date:       &str,
    required_filters: &BTreeSet<String>,
    blink_dir:        &str,
    state:            &mut FlatState,
    quiet:            bool,
    picker_limit:     usize,
    prompt:           &mut dyn DatePrompt,
) -> Option<String> {
    if quiet {
        return None;
    }

    let Some(light_day) = parse_iso_date(light_date) else {
        log::debug!("Invalid light date `{}`", light_date);
        return None;
    };

    let cutoff = state.get_cutoff(blink_dir).map(str::to_string);
    let mut candidates = find_candidate_dates_with_all_filters(
        library,
        light,
        required_filters,
        cutoff.as_deref()
    );
    candidates.remove(light_date);

    if candidates.is_empty() {
        log::info!(
            "No flat candidates for {} with filters [{}]",
            light_date, required_filters.iter().join(", ")
        );
        return None;
    }

    let (older, newer): (Vec<_>, Vec<_>) = candidates.keys()
        .filter_map(|date| parse_iso_date(date))
        .partition(|date| *date < light_day);

    for (date, flat) in &candidates {
        log::debug!("Candidate {}: {}", date, flat.file_name_str());
    }

    let label = filter_label(required_filters);
    match pick_flat_date(light_date, &label, &older, &newer, picker_limit, prompt) {
        PickResult::Selected(date) => {
            let date = format_iso_date(date);
            state.update_cutoff(blink_dir, &date);
            Some(date)
        }
        PickResult::RigChanged => {
            state.update_cutoff(blink_dir, light_date);
            None
        }
        PickResult::Cancelled | PickResult::Nothing => None,
    }
}

fn representative_light<'a>(groups: &'a LightGroups, date: &str) -> Option<&'a FrameInfo> {
    groups.iter()
        .filter(|(key, _)| key.filter_and_date().map(|(_, d)| d) == Some(date))
        .find_map(|(_, lights)| lights.first())
}

/// Checks all dates for exact flats first, then asks operator
/// once per date which still has no flat.
pub fn pre_resolve_flat_selections(
    library:         &dyn FlatLookup,
    requirements:    &dyn MasterRequirements,
    groups:          &LightGroups,
    filters_by_date: &FiltersByDate,
    blink_dir:       &str,
    state:           &mut FlatState,
    quiet:           bool,
    scale_dark:      bool,
    picker_limit:    usize,
    prompt:          &mut dyn DatePrompt,
    progress:        &mut dyn Progress,
) -> FlatSelections {
    let check_log = TimeLogger::start();
    let mut unresolved = Vec::new();
    let dates = ProgressIter::new(
        filters_by_date.keys(),
        progress,
        "Checking flats",
        "date",
        !quiet
    );
    for date in dates {
        let Some(light) = representative_light(groups, date) else {
            continue;
        };
        let masters = requirements.determine_required_masters(light, scale_dark);
        let has_flat = matches!(masters.get(&MasterKind::Flat), Some(Some(_)));
        if !has_flat {
            unresolved.push((date, light));
        }
    }
    check_log.log("checking flats");

    let prompt_log = TimeLogger::start();
    let mut result = FlatSelections::new();
    for (date, light) in unresolved {
        let selected = resolve_flat_for_date(
            library,
            light,
            date,
            &filters_by_date[date],
            blink_dir,
            state,
            quiet,
            picker_limit,
            prompt
        );
        if let Some(selected) = selected {
            result.insert(date.clone(), selected);
        }
    }
    prompt_log.log("selecting flats");

    result
}
