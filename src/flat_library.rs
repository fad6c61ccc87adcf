use std::{path::*, collections::*};
use anyhow::Context;
use serde::*;
use crate::{frame_info::*, fs_utils::*};

pub const FRAME_INFO_MASK: &str = "*.frame_info";

/// Flat date -> flat used for that date
pub type CandidateDates = BTreeMap<String, FrameInfo>;

/// Lookup of master flats in a calibration library.
/// `None` cutoff means no lower bound.
pub trait FlatLookup {
    fn find_candidate_flat_dates(
        &self,
        light:  &FrameInfo,
        cutoff: Option<&str>,
    ) -> CandidateDates;

    fn find_flat_for_date(&self, light: &FrameInfo, date: &str) -> Option<FrameInfo>;
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MasterKind {
    Bias,
    Dark,
    Flat,
}

pub type RequiredMasters = BTreeMap<MasterKind, Option<FrameInfo>>;

pub trait MasterRequirements {
    fn determine_required_masters(&self, light: &FrameInfo, scale_dark: bool) -> RequiredMasters;
}

/// Master frames described by `*.frame_info` JSON sidecars
pub struct FrameLibrary {
    frames: Vec<FrameInfo>,
}

impl FrameLibrary {
    pub fn new(frames: Vec<FrameInfo>) -> FrameLibrary {
        FrameLibrary { frames }
    }

    pub fn load(path: &Path) -> anyhow::Result<FrameLibrary> {
        let frames = load_frame_infos(path)?;
        log::info!("Loaded {} frames from library {}", frames.len(), path_to_str(path));
        Ok(FrameLibrary { frames })
    }

    fn masters_of_type(&self, frame_type: FrameType) -> impl Iterator<Item = &FrameInfo> {
        self.frames.iter().filter(move |f| f.frame_type == frame_type)
    }

    fn matching_flats<'a>(&'a self, light: &'a FrameInfo) -> impl Iterator<Item = (String, &'a FrameInfo)> + 'a {
        self.masters_of_type(FrameType::Flat)
            .filter(move |flat| is_same_flat_config(flat, light))
            .filter_map(|flat| flat.date_str().map(|date| (date, flat)))
    }
}

pub fn load_frame_infos(path: &Path) -> anyhow::Result<Vec<FrameInfo>> {
    let files = get_files_list_recursive(path, FRAME_INFO_MASK)?;
    let mut result = Vec::new();
    for file in files {
        let text = std::fs::read_to_string(&file)
            .with_context(|| format!("Can't read {}", path_to_str(&file)))?;
        match serde_json::from_str::<FrameInfo>(&text) {
            Ok(info) => result.push(info),
            Err(err) => log::warn!("Skipping malformed {}: {}", path_to_str(&file), err),
        }
    }
    Ok(result)
}

fn is_same_sensor_config(master: &FrameInfo, light: &FrameInfo) -> bool {
    master.camera == light.camera
    && master.gain == light.gain
    && master.offset == light.offset
    && master.set_temp == light.set_temp
    && master.readout_mode == light.readout_mode
}

fn is_same_flat_config(flat: &FrameInfo, light: &FrameInfo) -> bool {
    is_same_sensor_config(flat, light)
    && flat.filter == light.filter
    && flat.optic == light.optic
    && flat.focal_len == light.focal_len
}

fn exposure_value(frame: &FrameInfo) -> f64 {
    frame.exposure.as_deref()
        .and_then(|e| e.trim().parse::<f64>().ok())
        .unwrap_or(0.0)
}

impl FlatLookup for FrameLibrary {
    fn find_candidate_flat_dates(
        &self,
        light:  &FrameInfo,
        cutoff: Option<&str>,
    ) -> CandidateDates {
        let mut result = CandidateDates::new();
        for (date, flat) in self.matching_flats(light) {
            if let Some(cutoff) = cutoff {
                if date.as_str() < cutoff { continue; }
            }
            result.entry(date).or_insert_with(|| flat.clone());
        }
        log::debug!(
            "{} candidate flat dates for filter {:?} (cutoff {:?})",
            result.len(), light.filter, cutoff
        );
        result
    }

    fn find_flat_for_date(&self, light: &FrameInfo, date: &str) -> Option<FrameInfo> {
        self.matching_flats(light)
            .find(|(flat_date, _)| flat_date == date)
            .map(|(_, flat)| flat.clone())
    }
}

impl MasterRequirements for FrameLibrary {
    fn determine_required_masters(&self, light: &FrameInfo, scale_dark: bool) -> RequiredMasters {
        let mut result = RequiredMasters::new();

        let flat = light.date_str()
            .and_then(|date| self.find_flat_for_date(light, &date));
        result.insert(MasterKind::Flat, flat);

        let darks: Vec<_> = self.masters_of_type(FrameType::Dark)
            .filter(|dark| is_same_sensor_config(dark, light))
            .collect();
        let mut dark = darks.iter()
            .find(|dark| dark.exposure == light.exposure)
            .map(|dark| (*dark).clone());
        if dark.is_none() && scale_dark {
            dark = darks.iter()
                .max_by(|d1, d2| exposure_value(d1).total_cmp(&exposure_value(d2)))
                .map(|dark| (*dark).clone());
        }
        result.insert(MasterKind::Dark, dark);

        if scale_dark {
            let bias = self.masters_of_type(FrameType::Bias)
                .find(|bias| is_same_sensor_config(bias, light))
                .cloned();
            result.insert(MasterKind::Bias, bias);
        }

        result
    }
}
