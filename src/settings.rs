use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Connection values supplied on the command line; each one replaces the
/// corresponding setting when present.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub user: Option<String>,
    pub token_name: Option<String>,
    pub token_value: Option<String>,
    pub no_verify_ssl: bool,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ProxmoxSettings {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub token_name: String,
    pub token_value: String,
    pub verify_ssl: bool,
    pub unique_name: String,
    pub matching_hotwords: Vec<String>,
}

impl Default for ProxmoxSettings {
    fn default() -> Self {
        Self {
            host: "your-proxmox-host.example.com".to_string(),
            port: 8006,
            user: "root@pam".to_string(),
            token_name: "your_token_id".to_string(),
            token_value: "your_token_secret".to_string(),
            verify_ssl: true,
            unique_name: "proxmox_ability".to_string(),
            matching_hotwords: hotwords(&[
                "proxmox",
                "virtual machine",
                "vm",
                "container",
                "node",
                "cluster",
                "hypervisor",
                "lxc",
                "qemu",
            ]),
        }
    }
}

impl ProxmoxSettings {
    pub fn authorization(&self) -> String {
        format!(
            "PVEAPIToken={}!{}={}",
            self.user, self.token_name, self.token_value
        )
    }

    pub fn apply(&mut self, o: &Overrides) {
        apply_common(&mut self.host, &mut self.port, &mut self.user, &mut self.verify_ssl, o);
        if let Some(name) = &o.token_name {
            self.token_name = name.clone();
        }
        if let Some(value) = &o.token_value {
            self.token_value = value.clone();
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        require("Proxmox host", &self.host)?;
        require("Proxmox user", &self.user)?;
        require("Proxmox token name", &self.token_name)?;
        require("Proxmox token value", &self.token_value)
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct BackupSettings {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub token_name: String,
    pub token_value: String,
    pub verify_ssl: bool,
    pub unique_name: String,
    pub matching_hotwords: Vec<String>,
}

impl Default for BackupSettings {
    fn default() -> Self {
        Self {
            host: "your-pbs-host.example.com".to_string(),
            port: 8007,
            user: "root@pam".to_string(),
            token_name: "your_token_id".to_string(),
            token_value: "your_token_secret".to_string(),
            verify_ssl: true,
            unique_name: "proxmox_backup_ability".to_string(),
            matching_hotwords: hotwords(&[
                "proxmox backup",
                "backup server",
                "pbs",
                "datastore",
                "backup",
                "restore",
                "snapshot",
                "backup job",
            ]),
        }
    }
}

impl BackupSettings {
    pub fn authorization(&self) -> String {
        format!(
            "PBSAPIToken={}!{}:{}",
            self.user, self.token_name, self.token_value
        )
    }

    pub fn apply(&mut self, o: &Overrides) {
        apply_common(&mut self.host, &mut self.port, &mut self.user, &mut self.verify_ssl, o);
        if let Some(name) = &o.token_name {
            self.token_name = name.clone();
        }
        if let Some(value) = &o.token_value {
            self.token_value = value.clone();
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        require("PBS host", &self.host)?;
        require("PBS user", &self.user)?;
        require("PBS token name", &self.token_name)?;
        require("PBS token value", &self.token_value)
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct WhmSettings {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub api_token: String,
    pub verify_ssl: bool,
    pub unique_name: String,
    pub matching_hotwords: Vec<String>,
}

impl Default for WhmSettings {
    fn default() -> Self {
        Self {
            host: "your-server.example.com".to_string(),
            port: 2087,
            user: "root".to_string(),
            api_token: "YOUR_API_TOKEN_HERE".to_string(),
            verify_ssl: true,
            unique_name: "whm_ability".to_string(),
            matching_hotwords: hotwords(&[
                "whm",
                "hosting",
                "cpanel",
                "server",
                "accounts",
                "domains",
                "bandwidth",
                "ssl",
                "disk",
                "suspend",
            ]),
        }
    }
}

impl WhmSettings {
    pub fn authorization(&self) -> String {
        format!("whm {}:{}", self.user, self.api_token)
    }

    /// WHM tokens have no name part; only `token_value` applies.
    pub fn apply(&mut self, o: &Overrides) {
        apply_common(&mut self.host, &mut self.port, &mut self.user, &mut self.verify_ssl, o);
        if let Some(value) = &o.token_value {
            self.api_token = value.clone();
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        require("WHM host", &self.host)?;
        require("WHM user", &self.user)?;
        require("WHM API token", &self.api_token)
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Settings {
    pub proxmox: ProxmoxSettings,
    pub pbs: BackupSettings,
    pub whm: WhmSettings,
}

impl Settings {
    pub fn new(config_path: Option<&str>) -> Result<Self, ConfigError> {
        let mut s = Config::builder();

        // An explicit path must exist; the implicit "config" file is optional.
        if let Some(path) = config_path {
            s = s.add_source(File::from(Path::new(path)).required(true));
        } else {
            s = s.add_source(File::with_name("config").required(false));
        }

        // INFRA_PROXMOX__HOST -> proxmox.host, INFRA_WHM__API_TOKEN -> whm.api_token
        s = s.add_source(
            Environment::with_prefix("INFRA")
                .prefix_separator("_")
                .separator("__"),
        );

        s.build()?.try_deserialize()
    }
}

fn hotwords(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

fn require(what: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{} is required", what));
    }
    Ok(())
}

fn apply_common(
    host: &mut String,
    port: &mut u16,
    user: &mut String,
    verify_ssl: &mut bool,
    o: &Overrides,
) {
    if let Some(h) = &o.host {
        *host = h.clone();
    }
    if let Some(p) = o.port {
        *port = p;
    }
    if let Some(u) = &o.user {
        *user = u.clone();
    }
    // The flag can only switch verification off.
    if o.no_verify_ssl {
        *verify_ssl = false;
    }
}
