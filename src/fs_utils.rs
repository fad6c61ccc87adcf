use std::path::*;
use itertools::Itertools;
use path_absolutize::Absolutize;
use walkdir::WalkDir;

pub fn file_mask_to_regex_str(text: &str) -> String {
    let mut result = String::new();
    for sym in text.chars() {
        match sym {
            '.' | '\\' | '[' | ']' | '(' | ')' |
            '{' | '}' | '^' | '$' | '|' | '+' => {
                    result.push('\\');
                    result.push(sym)
                },

            '?' =>
                result.push('.'),

            '*' =>
                result.push_str(".+"),

            _ =>
                result.push(sym)
        }
    }
    result
}

pub fn create_regex_for_masks(masks: &str) -> anyhow::Result<regex::Regex> {
    let masks = masks.trim();
    if masks.is_empty() {
        return Ok(regex::Regex::new(".*")?);
    }
    let regex_str = masks
        .split(';')
        .map(|s| file_mask_to_regex_str(s.trim()))
        .map(|s| format!("(?:{}$)", s))
        .join("|");

    let regex_str = format!("(?i){}", regex_str); // (?i) - case insensitive flag
    let res = regex::Regex::new(&regex_str)?;
    Ok(res)
}

/// Files matching `masks` in `path` and all its subdirectories, sorted by name
pub fn get_files_list_recursive(path: &Path, masks: &str) -> anyhow::Result<Vec<PathBuf>> {
    if !path.is_dir() {
        anyhow::bail!("Directory '{}' does not exist", path_to_str(path));
    }
    let r = create_regex_for_masks(masks)?;
    let mut result = Vec::new();
    for entry in WalkDir::new(path).follow_links(true) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                log::warn!("Skipping unreadable entry: {}", err);
                continue;
            }
        };
        if entry.file_type().is_file() && r.is_match(extract_file_name(entry.path())) {
            result.push(entry.into_path());
        }
    }
    result.sort();
    Ok(result)
}

pub fn extract_file_name(path: &Path) -> &str {
    path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("")
}

pub fn path_to_str(path: &Path) -> &str {
    path
        .to_str()
        .unwrap_or("")
}

/// Identity of blink directory in the state file
pub fn blink_dir_id(path: &Path) -> anyhow::Result<String> {
    let abs = path.absolutize()?;
    Ok(abs.to_string_lossy().into_owned())
}
