use std::{path::*, collections::*};
use serde::*;
use chrono::prelude::*;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum FrameType {
    #[default]
    Light,
    Flat,
    Dark,
    Bias,
}

/// Normalized metadata of one frame (light or master)
#[derive(Default, Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct FrameInfo {
    /// Full file name
    pub file_name: PathBuf,

    pub frame_type: FrameType,

    /// Camera name
    pub camera: Option<String>,

    /// Gain or ISO
    pub gain: Option<String>,

    pub offset: Option<String>,

    /// Sensor temperature set point
    pub set_temp: Option<String>,

    pub readout_mode: Option<String>,

    /// Exposure time in seconds
    pub exposure: Option<String>,

    pub filter: Option<String>,

    /// Acquisition date (YYYY-MM-DD)
    pub date: Option<String>,

    /// Lens or telescope
    pub optic: Option<String>,

    /// Focal len in millimeters
    pub focal_len: Option<String>,
}

impl FrameInfo {
    pub fn with_filter(&self, filter: &str) -> FrameInfo {
        FrameInfo {
            filter: Some(filter.to_string()),
            ..self.clone()
        }
    }

    pub fn date_str(&self) -> Option<String> {
        self.date.as_deref().and_then(normalize_date)
    }

    pub fn file_name_str(&self) -> &str {
        self.file_name.to_str().unwrap_or("")
    }
}

/* ISO dates */

const ISO_DATE_FMT: &str = "%Y-%m-%d";

/// Parses strictly zero-padded `YYYY-MM-DD`
pub fn parse_iso_date(text: &str) -> Option<NaiveDate> {
    if text.len() != 10 {
        return None;
    }
    NaiveDate::parse_from_str(text, ISO_DATE_FMT).ok()
}

pub fn format_iso_date(date: NaiveDate) -> String {
    date.format(ISO_DATE_FMT).to_string()
}

/// `2024-01-15T22:10:05` -> `2024-01-15`
pub fn normalize_date(text: &str) -> Option<String> {
    let text = text.trim();
    let date_part = match text.find(|c: char| c == 'T' || c == ' ') {
        Some(pos) => &text[..pos],
        None => text,
    };
    parse_iso_date(date_part).map(format_iso_date)
}

/* Grouping of light frames */

pub const CONFIG_KEY_LEN: usize = 8;

/// Equipment configuration key: camera, gain, offset, set temp,
/// readout mode, exposure, filter, date
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConfigKey(pub Vec<Option<String>>);

impl ConfigKey {
    pub fn for_light(light: &FrameInfo) -> ConfigKey {
        ConfigKey(vec![
            light.camera.clone(),
            light.gain.clone(),
            light.offset.clone(),
            light.set_temp.clone(),
            light.readout_mode.clone(),
            light.exposure.clone(),
            light.filter.clone(),
            light.date_str(),
        ])
    }

    /// None for keys that are too short or have no filter or date
    pub fn filter_and_date(&self) -> Option<(&str, &str)> {
        if self.0.len() < CONFIG_KEY_LEN {
            return None;
        }
        let len = self.0.len();
        let filter = self.0[len-2].as_deref()?;
        let date = self.0[len-1].as_deref()?;
        Some((filter, date))
    }
}

pub type LightGroups = BTreeMap<ConfigKey, Vec<FrameInfo>>;

pub fn group_lights(frames: impl IntoIterator<Item = FrameInfo>) -> LightGroups {
    let mut result = LightGroups::new();
    for frame in frames {
        if frame.frame_type != FrameType::Light {
            continue;
        }
        result.entry(ConfigKey::for_light(&frame))
            .or_default()
            .push(frame);
    }
    result
}
