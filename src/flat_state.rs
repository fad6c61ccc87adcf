use std::{path::*, collections::*};
use anyhow::Context;
use serde_yaml::Value;
use chrono::NaiveDate;
use crate::frame_info::*;

/// Cutoff dates of flat candidates per blink directory.
///
/// Stored as a flat YAML mapping:
///
/// ```yaml
/// "/data/RedCat51@f4.9+ASI2600MM/10_Blink": "2025-09-01"
/// ```
///
/// Flats from the cutoff date or later are valid candidates. The cutoff
/// never moves backward.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct FlatState {
    cutoffs: BTreeMap<String, String>,
}

impl FlatState {
    pub fn new() -> FlatState {
        FlatState::default()
    }

    pub fn load(file_name: &Path) -> anyhow::Result<FlatState> {
        if !file_name.exists() {
            log::debug!("State file does not exist: {}", file_name.display());
            return Ok(FlatState::new());
        }

        let text = std::fs::read_to_string(file_name)
            .with_context(|| format!("Can't read state file {}", file_name.display()))?;

        let data: Value = match serde_yaml::from_str(&text) {
            Ok(data) => data,
            Err(err) => {
                log::warn!("State file {} can't be parsed: {}", file_name.display(), err);
                return Ok(FlatState::new());
            }
        };

        let mapping = match data {
            Value::Null => return Ok(FlatState::new()),
            Value::Mapping(mapping) => mapping,
            _ => {
                log::warn!("State file has unexpected format: {}", file_name.display());
                return Ok(FlatState::new());
            }
        };

        let mut cutoffs = BTreeMap::new();
        for (key, value) in mapping {
            let blink_dir = yaml_to_string(key);
            let value = yaml_to_string(value);
            match parse_stored_date(&value) {
                Some(date) => {
                    cutoffs.insert(blink_dir, format_iso_date(date));
                }
                None => log::warn!(
                    "Dropping cutoff `{}` for {}: not a YYYY-MM-DD date",
                    value, blink_dir
                ),
            }
        }

        log::debug!("Loaded state file with {} entries", cutoffs.len());
        Ok(FlatState { cutoffs })
    }

    pub fn save(&self, file_name: &Path) -> anyhow::Result<()> {
        if let Some(dir) = file_name.parent() {
            if !dir.as_os_str().is_empty() {
                std::fs::create_dir_all(dir)
                    .with_context(|| format!("Can't create directory {}", dir.display()))?;
            }
        }
        let text = serde_yaml::to_string(&self.cutoffs)?;
        std::fs::write(file_name, text)
            .with_context(|| format!("Can't write state file {}", file_name.display()))?;
        log::debug!("Saved state file with {} entries", self.cutoffs.len());
        Ok(())
    }

    pub fn get_cutoff(&self, blink_dir: &str) -> Option<&str> {
        self.cutoffs.get(blink_dir).map(String::as_str)
    }

    /// Advances cutoff for `blink_dir`. Dates before the current cutoff are ignored.
    pub fn update_cutoff(&mut self, blink_dir: &str, date: &str) {
        if parse_iso_date(date).is_none() {
            log::warn!("Cutoff for {} not changed: `{}` is not a YYYY-MM-DD date", blink_dir, date);
            return;
        }
        let current = self.cutoffs.get(blink_dir).cloned();
        match &current {
            Some(current) if date < current.as_str() => {
                log::debug!(
                    "Cutoff not advanced for {}: {} < current {}",
                    blink_dir, date, current
                );
            }
            _ => {
                log::debug!("Updated cutoff for {}: {:?} -> {}", blink_dir, current, date);
                self.cutoffs.insert(blink_dir.to_string(), date.to_string());
            }
        }
    }

    pub fn len(&self) -> usize {
        self.cutoffs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cutoffs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.cutoffs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Hand edited dates may lack zero padding (`2025-9-1`)
fn parse_stored_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if let Some(date) = normalize_date(text).as_deref().and_then(parse_iso_date) {
        return Some(date);
    }
    let parts: Vec<_> = text.split('-').collect();
    let [year, month, day] = parts.as_slice() else {
        return None;
    };
    if year.len() != 4 {
        return None;
    }
    NaiveDate::from_ymd_opt(
        year.parse().ok()?,
        month.parse().ok()?,
        day.parse().ok()?
    )
}

fn yaml_to_string(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        other => serde_yaml::to_string(&other)
            .map(|s| s.trim().to_string())
            .unwrap_or_default(),
    }
}
