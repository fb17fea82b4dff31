use std::path::Path;

use anyhow::Result;
use serde::Deserialize;

/// Root configuration structure, deserialized from `.artifact-checkr/config.toml`.
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Platform-name mapping.
    #[serde(default)]
    pub platform: PlatformConfig,
    /// Remote (UNC) path probing.
    #[serde(default)]
    pub remote: RemoteConfig,
    /// Path classification behaviour.
    #[serde(default)]
    pub scan: ScanConfig,
    /// Column names for the two input tables.
    #[serde(default)]
    pub columns: ColumnsConfig,
}

/// Maps the inventory's free-text platform names onto Windows.
#[derive(Debug, Deserialize)]
pub struct PlatformConfig {
    /// Platform-name strings treated as Windows (matched case-insensitively).
    #[serde(default = "default_windows_names")]
    pub windows: Vec<String>,
}

fn default_windows_names() -> Vec<String> {
    vec![
        "Windows Server 2016".to_string(),
        "Windows Server 2019".to_string(),
        "Windows Server 2022".to_string(),
    ]
}

impl Default for PlatformConfig {
    fn default() -> Self {
        PlatformConfig {
            windows: default_windows_names(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RemoteConfig {
    /// Allow probing UNC-style `\\server\share` paths.
    #[serde(default)]
    pub unc_enabled: bool,
    /// Per-row probe timeout in seconds.
    #[serde(default = "default_unc_timeout")]
    pub unc_timeout: u64,
}

fn default_unc_timeout() -> u64 {
    6
}

impl Default for RemoteConfig {
    fn default() -> Self {
        RemoteConfig {
            unc_enabled: false,
            unc_timeout: default_unc_timeout(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ScanConfig {
    /// Enable heuristic repair of paths with trailing garbage.
    #[serde(default = "default_true")]
    pub invalid_path_detection: bool,
    /// Accepted for compatibility; duplicate search is handled outside the
    /// classification core.
    #[serde(default)]
    pub duplicate_search_enabled: bool,
}

fn default_true() -> bool {
    true
}

impl Default for ScanConfig {
    fn default() -> Self {
        ScanConfig {
            invalid_path_detection: true,
            duplicate_search_enabled: false,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ColumnsConfig {
    #[serde(default)]
    pub inventory: InventoryColumns,
    #[serde(default)]
    pub cve: CveColumns,
}

/// Input column names for the inventory table.
#[derive(Debug, Deserialize)]
pub struct InventoryColumns {
    #[serde(default = "default_col_platform")]
    pub platform: String,
    #[serde(default = "default_col_file_path")]
    pub file_path: String,
    #[serde(default = "default_col_hostname")]
    pub hostname: String,
    #[serde(default = "default_col_cve")]
    pub cve: String,
}

fn default_col_platform() -> String {
    "AFFECTED_PLATFORMS".to_string()
}

fn default_col_file_path() -> String {
    "XTRACT_PATH".to_string()
}

fn default_col_hostname() -> String {
    "HOSTNAME".to_string()
}

fn default_col_cve() -> String {
    "CVE".to_string()
}

impl Default for InventoryColumns {
    fn default() -> Self {
        InventoryColumns {
            platform: default_col_platform(),
            file_path: default_col_file_path(),
            hostname: default_col_hostname(),
            cve: default_col_cve(),
        }
    }
}

/// Input column names for the CVE table.
#[derive(Debug, Deserialize)]
pub struct CveColumns {
    #[serde(default = "default_col_cve_id")]
    pub id: String,
    #[serde(default = "default_col_description")]
    pub description: String,
    #[serde(default = "default_col_references")]
    pub references: String,
    #[serde(default = "default_col_affected")]
    pub affected_software: String,
}

fn default_col_cve_id() -> String {
    "CveId".to_string()
}

fn default_col_description() -> String {
    "Description".to_string()
}

fn default_col_references() -> String {
    "References".to_string()
}

fn default_col_affected() -> String {
    "AffectedSoftware".to_string()
}

impl Default for CveColumns {
    fn default() -> Self {
        CveColumns {
            id: default_col_cve_id(),
            description: default_col_description(),
            references: default_col_references(),
            affected_software: default_col_affected(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            platform: PlatformConfig::default(),
            remote: RemoteConfig::default(),
            scan: ScanConfig::default(),
            columns: ColumnsConfig::default(),
        }
    }
}

/// Load the configuration, searching in order:
///
/// 1. `config_override` — path passed via `--config`
/// 2. `<input_dir>/.artifact-checkr/config.toml`
/// 3. `~/.config/artifact-checkr/config.toml`
/// 4. Built-in [`Config::default`]
pub fn load_config(input_dir: &Path, config_override: Option<&Path>) -> Result<Config> {
    if let Some(path) = config_override {
        let content = std::fs::read_to_string(path)?;
        return Ok(toml::from_str(&content)?);
    }

    let local_config = input_dir.join(".artifact-checkr").join("config.toml");
    if local_config.exists() {
        let content = std::fs::read_to_string(&local_config)?;
        return Ok(toml::from_str(&content)?);
    }

    if let Some(home) = dirs::home_dir() {
        let home_config = home
            .join(".config")
            .join("artifact-checkr")
            .join("config.toml");
        if home_config.exists() {
            let content = std::fs::read_to_string(&home_config)?;
            return Ok(toml::from_str(&content)?);
        }
    }

    Ok(Config::default())
}
