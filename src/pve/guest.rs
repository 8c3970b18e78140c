use super::PveClient;
use crate::error::Result;
use crate::fields;
use log::info;
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuestKind {
    Qemu,
    Lxc,
}

impl GuestKind {
    fn path(self) -> &'static str {
        match self {
            GuestKind::Qemu => "qemu",
            GuestKind::Lxc => "lxc",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Power {
    Start,
    Stop,
    Reboot,
    /// ACPI shutdown; the guest OS decides when to power off.
    Shutdown,
}

impl Power {
    pub fn as_str(self) -> &'static str {
        match self {
            Power::Start => "start",
            Power::Stop => "stop",
            Power::Reboot => "reboot",
            Power::Shutdown => "shutdown",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GuestSummary {
    pub vmid: i64,
    pub name: String,
    pub status: String,
    pub cpu_usage: f64,
    pub memory_used: u64,
    pub memory_total: u64,
    pub disk_used: u64,
    pub disk_total: u64,
    pub uptime_seconds: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct VmList {
    pub node: String,
    pub vms: Vec<GuestSummary>,
    pub total: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ContainerList {
    pub node: String,
    pub containers: Vec<GuestSummary>,
    pub total: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct GuestStatus {
    pub node: String,
    pub vmid: i64,
    pub name: String,
    pub status: String,
    pub cpu_usage: f64,
    pub cpus: u64,
    pub memory_used: u64,
    pub memory_total: u64,
    pub disk_used: u64,
    pub disk_total: u64,
    pub uptime_seconds: u64,
    pub pid: Option<i64>,
    pub qmp_status: String,
}

/// Returned as soon as the backend accepts the request; `task_id` is the
/// UPID of the asynchronous task, which is not polled.
#[derive(Debug, Clone, Serialize)]
pub struct PowerReceipt {
    pub node: String,
    pub vmid: i64,
    pub action: &'static str,
    pub task_id: Value,
}

impl PveClient {
    async fn list_guests(&self, node: &str, kind: GuestKind) -> Result<Vec<GuestSummary>> {
        let data = self
            .api
            .get(&format!("nodes/{}/{}", node, kind.path()), &[])
            .await?;

        Ok(fields::records(&data)
            .map(|g| GuestSummary {
                vmid: fields::int(g, "vmid"),
                name: fields::text(g, "name"),
                status: fields::text_or(g, "status", "unknown"),
                cpu_usage: fields::ratio_percent(fields::float(g, "cpu")),
                memory_used: fields::uint(g, "mem"),
                memory_total: fields::uint(g, "maxmem"),
                disk_used: fields::uint(g, "disk"),
                disk_total: fields::uint(g, "maxdisk"),
                uptime_seconds: fields::uint(g, "uptime"),
            })
            .collect())
    }

    pub async fn list_vms(&self, node: &str) -> Result<VmList> {
        let vms = self.list_guests(node, GuestKind::Qemu).await?;
        Ok(VmList {
            node: node.to_string(),
            total: vms.len(),
            vms,
        })
    }

    pub async fn list_containers(&self, node: &str) -> Result<ContainerList> {
        let containers = self.list_guests(node, GuestKind::Lxc).await?;
        Ok(ContainerList {
            node: node.to_string(),
            total: containers.len(),
            containers,
        })
    }

    pub async fn get_guest_status(
        &self,
        node: &str,
        vmid: i64,
        kind: GuestKind,
    ) -> Result<GuestStatus> {
        let path = format!("nodes/{}/{}/{}/status/current", node, kind.path(), vmid);
        let data = self.api.get(&path, &[]).await?;

        Ok(GuestStatus {
            node: node.to_string(),
            vmid,
            name: fields::text(&data, "name"),
            status: fields::text_or(&data, "status", "unknown"),
            cpu_usage: fields::ratio_percent(fields::float(&data, "cpu")),
            cpus: fields::uint(&data, "cpus"),
            memory_used: fields::uint(&data, "mem"),
            memory_total: fields::uint(&data, "maxmem"),
            disk_used: fields::uint(&data, "disk"),
            disk_total: fields::uint(&data, "maxdisk"),
            uptime_seconds: fields::uint(&data, "uptime"),
            pid: fields::opt_int(&data, "pid"),
            qmp_status: fields::text(&data, "qmpstatus"),
        })
    }

    pub async fn get_vm_status(&self, node: &str, vmid: i64) -> Result<GuestStatus> {
        self.get_guest_status(node, vmid, GuestKind::Qemu).await
    }

    pub async fn get_container_status(&self, node: &str, vmid: i64) -> Result<GuestStatus> {
        self.get_guest_status(node, vmid, GuestKind::Lxc).await
    }

    pub async fn power(
        &self,
        node: &str,
        vmid: i64,
        kind: GuestKind,
        action: Power,
    ) -> Result<PowerReceipt> {
        let path = format!(
            "nodes/{}/{}/{}/status/{}",
            node,
            kind.path(),
            vmid,
            action.as_str()
        );
        let task_id = self.api.post(&path, None).await?;
        info!("{} {} {} on {} accepted", action.as_str(), kind.path(), vmid, node);

        Ok(PowerReceipt {
            node: node.to_string(),
            vmid,
            action: action.as_str(),
            task_id,
        })
    }

    pub async fn start_vm(&self, node: &str, vmid: i64) -> Result<PowerReceipt> {
        self.power(node, vmid, GuestKind::Qemu, Power::Start).await
    }

    pub async fn stop_vm(&self, node: &str, vmid: i64) -> Result<PowerReceipt> {
        self.power(node, vmid, GuestKind::Qemu, Power::Stop).await
    }

    pub async fn reboot_vm(&self, node: &str, vmid: i64) -> Result<PowerReceipt> {
        self.power(node, vmid, GuestKind::Qemu, Power::Reboot).await
    }

    pub async fn shutdown_vm(&self, node: &str, vmid: i64) -> Result<PowerReceipt> {
        self.power(node, vmid, GuestKind::Qemu, Power::Shutdown).await
    }

    pub async fn start_container(&self, node: &str, vmid: i64) -> Result<PowerReceipt> {
        self.power(node, vmid, GuestKind::Lxc, Power::Start).await
    }

    pub async fn stop_container(&self, node: &str, vmid: i64) -> Result<PowerReceipt> {
        self.power(node, vmid, GuestKind::Lxc, Power::Stop).await
    }

    pub async fn reboot_container(&self, node: &str, vmid: i64) -> Result<PowerReceipt> {
        self.power(node, vmid, GuestKind::Lxc, Power::Reboot).await
    }

    pub async fn shutdown_container(&self, node: &str, vmid: i64) -> Result<PowerReceipt> {
        self.power(node, vmid, GuestKind::Lxc, Power::Shutdown).await
    }
}
