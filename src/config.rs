use std::path::*;
use serde::*;
use anyhow::Context;

pub const DEF_PICKER_LIMIT: usize = 5;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Directory of master calibration frames
    pub library_dir: Option<PathBuf>,

    /// File of flat cutoff dates
    pub state_file: Option<PathBuf>,

    /// Max count of older and newer dates shown in picker
    pub picker_limit: usize,

    /// Allow darks of other exposure (scaled with bias)
    pub scale_dark: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            library_dir: None,
            state_file: None,
            picker_limit: DEF_PICKER_LIMIT,
            scale_dark: false,
        }
    }
}

impl Config {
    pub fn load(file_name: &Path) -> anyhow::Result<Config> {
        if !file_name.is_file() {
            log::debug!("No config file {}, using defaults", file_name.display());
            return Ok(Config::default());
        }
        let conf_str = std::fs::read_to_string(file_name)
            .with_context(|| format!("Can't read config file {}", file_name.display()))?;
        let config = serde_json::from_str(&conf_str)
            .with_context(|| format!("Can't parse config file {}", file_name.display()))?;
        Ok(config)
    }

    pub fn get_file_name(create_dir: bool) -> anyhow::Result<PathBuf> {
        let mut conf_dir = get_app_conf_dir(create_dir)?;
        conf_dir.push("config.json");
        Ok(conf_dir)
    }

    pub fn state_file_name(&self) -> anyhow::Result<PathBuf> {
        if let Some(state_file) = &self.state_file {
            return Ok(state_file.clone());
        }
        let mut file_name = get_app_conf_dir(false)?;
        file_name.push("flat_state.yaml");
        Ok(file_name)
    }
}

pub fn get_app_conf_dir(create_dir: bool) -> anyhow::Result<PathBuf> {
    let mut conf_dir = dirs::data_local_dir()
        .ok_or_else(|| anyhow::anyhow!("Can't get local data directory"))?;
    conf_dir.push(".flat-picker");
    if create_dir && !conf_dir.exists() {
        std::fs::create_dir_all(&conf_dir)?;
    }
    Ok(conf_dir)
}
