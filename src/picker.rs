use chrono::prelude::*;
use dialoguer::{Select, theme::ColorfulTheme};
use crate::frame_info::*;

pub const NONE_LABEL: &str = "None of these (rig changed)";

/// Single choice from list of labels. `None` if operator cancelled the prompt.
pub trait DatePrompt {
    fn select(&mut self, message: &str, choices: &[String], default: usize) -> Option<String>;
}

pub struct ConsolePrompt;

impl DatePrompt for ConsolePrompt {
    fn select(&mut self, message: &str, choices: &[String], default: usize) -> Option<String> {
        let result = Select::with_theme(&ColorfulTheme::default())
            .with_prompt(message)
            .items(choices)
            .default(default)
            .interact_opt();
        match result {
            Ok(index) => index.and_then(|i| choices.get(i).cloned()),
            Err(err) => {
                log::warn!("Prompt failed: {}", err);
                None
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickResult {
    Selected(NaiveDate),
    RigChanged,
    Cancelled,
    /// No dates to choose from
    Nothing,
}

#[derive(Debug)]
pub struct PickerItems {
    pub labels:          Vec<String>,
    pub values:          Vec<Option<NaiveDate>>,
    pub none_index:      usize,
    pub older_overflow:  Option<String>,
    pub newer_overflow:  Option<String>,
}

pub fn day_diff_label(date: NaiveDate, light_date: NaiveDate) -> String {
    let diff = (date - light_date).num_days();
    let days = diff.unsigned_abs();
    let plural = if days == 1 { "" } else { "s" };
    if diff == 0 {
        "(same day)".to_string()
    } else if diff < 0 {
        format!("({} day{} older)", days, plural)
    } else {
        format!("({} day{} newer)", days, plural)
    }
}

fn date_label(date: NaiveDate, light_date: NaiveDate) -> String {
    format!("{}  {}", format_iso_date(date), day_diff_label(date, light_date))
}

/// `older` and `newer` are sorted ascending. Only `picker_limit` dates
/// closest to the light date are shown from each list.
pub fn build_picker_items(
    light_date:   NaiveDate,
    older:        &[NaiveDate],
    newer:        &[NaiveDate],
    picker_limit: usize,
) -> PickerItems {
    let (visible_older, older_overflow) = if older.len() > picker_limit {
        let hidden = older.len() - picker_limit;
        (
            &older[hidden..],
            Some(format!("{} older flat date(s) not shown", hidden))
        )
    } else {
        (older, None)
    };

    let (visible_newer, newer_overflow) = if newer.len() > picker_limit {
        let hidden = newer.len() - picker_limit;
        (
            &newer[..picker_limit],
            Some(format!("{} newer flat date(s) not shown", hidden))
        )
    } else {
        (newer, None)
    };

    let mut labels = Vec::with_capacity(visible_older.len() + 1 + visible_newer.len());
    let mut values = Vec::with_capacity(labels.capacity());

    for &date in visible_older {
        labels.push(date_label(date, light_date));
        values.push(Some(date));
    }

    let none_index = labels.len();
    labels.push(NONE_LABEL.to_string());
    values.push(None);

    for &date in visible_newer {
        labels.push(date_label(date, light_date));
        values.push(Some(date));
    }

    PickerItems { labels, values, none_index, older_overflow, newer_overflow }
}

pub fn pick_flat_date(
    light_date_str: &str,
    filter_label:   &str,
    older:          &[NaiveDate],
    newer:          &[NaiveDate],
    picker_limit:   usize,
    prompt:         &mut dyn DatePrompt,
) -> PickResult {
    if older.is_empty() && newer.is_empty() {
        return PickResult::Nothing;
    }

    let Some(light_date) = parse_iso_date(light_date_str) else {
        log::warn!("Can't pick flat: light date `{}` is not valid", light_date_str);
        return PickResult::Nothing;
    };

    let items = build_picker_items(light_date, older, newer, picker_limit);

    println!();
    println!("No {} flat found for lights of {}", filter_label, light_date_str);
    for msg in [&items.older_overflow, &items.newer_overflow].into_iter().flatten() {
        println!("  ({})", msg);
    }

    let message = format!("Select flat date for {} ({})", light_date_str, filter_label);
    let Some(answer) = prompt.select(&message, &items.labels, items.none_index) else {
        log::info!("Flat selection for {} cancelled", light_date_str);
        return PickResult::Cancelled;
    };

    let Some(index) = items.labels.iter().position(|label| *label == answer) else {
        log::warn!("Unknown answer `{}`", answer);
        return PickResult::Cancelled;
    };

    match items.values[index] {
        Some(date) => {
            log::info!("Selected flat date {} for lights of {}", date, light_date_str);
            PickResult::Selected(date)
        }
        None => {
            log::info!("Rig changed for lights of {}", light_date_str);
            PickResult::RigChanged
        }
    }
}
