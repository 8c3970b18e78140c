use super::WhmClient;
use crate::error::{Error, Result};
use crate::fields;
use log::info;
use serde::Serialize;
use serde_json::{json, Value};
use std::fmt;
use std::str::FromStr;

/// A 1-minute load at or above this reads as `high`.
const LOAD_HIGH: f64 = 4.0;

#[derive(Debug, Clone, Serialize)]
pub struct CpuLoad {
    pub load_1min: f64,
    pub load_5min: f64,
    pub load_15min: f64,
    pub status: &'static str,
}

impl CpuLoad {
    fn from_avg(avg: &Value) -> Self {
        let at = |i: usize| avg.get(i).map(fields::as_float).unwrap_or(0.0);
        let load_1min = at(0);
        Self {
            load_1min,
            load_5min: at(1),
            load_15min: at(2),
            status: if load_1min < LOAD_HIGH { "ok" } else { "high" },
        }
    }
}

/// Passed through as reported; WHM formats these as display strings.
#[derive(Debug, Clone, Serialize)]
pub struct RootPartition {
    pub total: Value,
    pub used: Value,
    pub available: Value,
    pub percent_used: Value,
}

#[derive(Debug, Clone, Serialize)]
pub struct ServerResources {
    pub cpu: CpuLoad,
    pub disk: RootPartition,
}

#[derive(Debug, Clone, Serialize)]
pub struct Hostname {
    pub hostname: String,
}

/// Services that may be restarted remotely. Anything else is refused before
/// a request is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WhmService {
    Httpd,
    Exim,
    Mysql,
    Named,
    Ftpd,
    Sshd,
    Cpsrvd,
}

impl WhmService {
    pub const ALL: [WhmService; 7] = [
        WhmService::Cpsrvd,
        WhmService::Exim,
        WhmService::Ftpd,
        WhmService::Httpd,
        WhmService::Mysql,
        WhmService::Named,
        WhmService::Sshd,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            WhmService::Httpd => "httpd",
            WhmService::Exim => "exim",
            WhmService::Mysql => "mysql",
            WhmService::Named => "named",
            WhmService::Ftpd => "ftpd",
            WhmService::Sshd => "sshd",
            WhmService::Cpsrvd => "cpsrvd",
        }
    }
}

impl fmt::Display for WhmService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WhmService {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|svc| svc.as_str() == s)
            .ok_or_else(|| Error::ServiceNotAllowed {
                service: s.to_string(),
                allowed: Self::ALL.iter().map(|svc| svc.as_str()).collect(),
            })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ServiceRestart {
    pub service: &'static str,
    pub action: &'static str,
    pub result: Value,
}

impl WhmClient {
    pub async fn get_server_resources(&self) -> Result<ServerResources> {
        let load = self.api.get("loadavg", &[]).await?;
        let disk = self.api.get("getdiskinfo", &[]).await?;

        let avg = fields::raw(&load, "avg", json!([0, 0, 0]));
        let root = disk
            .get("partition")
            .map(fields::records)
            .and_then(|mut parts| {
                parts.find(|p| p.get("mount").and_then(Value::as_str) == Some("/"))
            })
            .unwrap_or(&fields::NULL);

        let na = || json!("N/A");
        Ok(ServerResources {
            cpu: CpuLoad::from_avg(&avg),
            disk: RootPartition {
                total: fields::raw(root, "total", na()),
                used: fields::raw(root, "used", na()),
                available: fields::raw(root, "available", na()),
                percent_used: fields::raw(root, "percentage", na()),
            },
        })
    }

    pub async fn get_hostname(&self) -> Result<Hostname> {
        let data = self.api.get("gethostname", &[]).await?;
        Ok(Hostname {
            hostname: fields::text_or(&data, "hostname", "unknown"),
        })
    }

    pub async fn restart_service(&self, service: WhmService) -> Result<ServiceRestart> {
        let result = self
            .api
            .get("restartservice", &[("service", service.to_string())])
            .await?;
        info!("Service {} restart requested", service);

        Ok(ServiceRestart {
            service: service.as_str(),
            action: "restart",
            result,
        })
    }
}
