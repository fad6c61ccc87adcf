use serde::*;
use crate::{frame_info::*, flat_library::*, flat_state::*, flat_select::*};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum FlatSource {
    Exact(FrameInfo),
    Substitute { date: String, flat: FrameInfo },
    Missing,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FlatAssignment {
    pub light_date:   String,
    pub filter:       String,
    pub lights_count: usize,
    pub source:       FlatSource,
}

impl FlatAssignment {
    pub fn flat(&self) -> Option<&FrameInfo> {
        match &self.source {
            FlatSource::Exact(flat) => Some(flat),
            FlatSource::Substitute { flat, .. } => Some(flat),
            FlatSource::Missing => None,
        }
    }
}

/// Flat for every group of lights. Exact matches advance cutoff of `blink_dir`.
pub fn plan_flat_assignments(
    library:      &dyn FlatLookup,
    requirements: &dyn MasterRequirements,
    groups:       &LightGroups,
    selections:   &FlatSelections,
    blink_dir:    &str,
    state:        &mut FlatState,
    scale_dark:   bool,
) -> Vec<FlatAssignment> {
    let mut result = Vec::new();
    for (key, lights) in groups {
        let Some((filter, date)) = key.filter_and_date() else {
            continue;
        };
        let Some(light) = lights.first() else {
            continue;
        };

        let masters = requirements.determine_required_masters(light, scale_dark);
        let exact = masters.get(&MasterKind::Flat).cloned().flatten();

        let source = if let Some(flat) = exact {
            state.update_cutoff(blink_dir, date);
            FlatSource::Exact(flat)
        } else if let Some(selected) = selections.get(date) {
            match library.find_flat_for_date(light, selected) {
                Some(flat) => FlatSource::Substitute { date: selected.clone(), flat },
                None => {
                    log::info!("No {} flat for selected date {}", filter, selected);
                    FlatSource::Missing
                }
            }
        } else {
            FlatSource::Missing
        };

        result.push(FlatAssignment {
            light_date: date.to_string(),
            filter: filter.to_string(),
            lights_count: lights.len(),
            source,
        });
    }
    result
}
