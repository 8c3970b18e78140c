use super::{GuestKind, Power, PveClient};
use crate::command::{self, Args, CommandSpec, Param};
use crate::error::Result;
use serde_json::Value;

const NODE: &[Param] = &[Param::Required("node")];
const GUEST: &[Param] = &[Param::Required("node"), Param::Required("vmid")];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PveOp {
    ListNodes,
    NodeStatus,
    ListVms,
    VmStatus,
    VmPower(Power),
    ListContainers,
    ContainerStatus,
    ContainerPower(Power),
    ListStorage,
    ClusterStatus,
    ClusterResources,
    ListTasks,
    TaskStatus,
}

pub const COMMANDS: &[CommandSpec<PveOp>] = &[
    CommandSpec {
        names: &["list_nodes", "nodes"],
        op: PveOp::ListNodes,
        params: &[],
    },
    CommandSpec {
        names: &["get_node_status", "node_status"],
        op: PveOp::NodeStatus,
        params: NODE,
    },
    CommandSpec {
        names: &["list_vms", "vms"],
        op: PveOp::ListVms,
        params: NODE,
    },
    CommandSpec {
        names: &["get_vm_status", "vm_status"],
        op: PveOp::VmStatus,
        params: GUEST,
    },
    CommandSpec {
        names: &["start_vm"],
        op: PveOp::VmPower(Power::Start),
        params: GUEST,
    },
    CommandSpec {
        names: &["stop_vm"],
        op: PveOp::VmPower(Power::Stop),
        params: GUEST,
    },
    CommandSpec {
        names: &["reboot_vm"],
        op: PveOp::VmPower(Power::Reboot),
        params: GUEST,
    },
    CommandSpec {
        names: &["shutdown_vm"],
        op: PveOp::VmPower(Power::Shutdown),
        params: GUEST,
    },
    CommandSpec {
        names: &["list_containers", "containers"],
        op: PveOp::ListContainers,
        params: NODE,
    },
    CommandSpec {
        names: &["get_container_status", "container_status"],
        op: PveOp::ContainerStatus,
        params: GUEST,
    },
    CommandSpec {
        names: &["start_container"],
        op: PveOp::ContainerPower(Power::Start),
        params: GUEST,
    },
    CommandSpec {
        names: &["stop_container"],
        op: PveOp::ContainerPower(Power::Stop),
        params: GUEST,
    },
    CommandSpec {
        names: &["reboot_container"],
        op: PveOp::ContainerPower(Power::Reboot),
        params: GUEST,
    },
    CommandSpec {
        names: &["shutdown_container"],
        op: PveOp::ContainerPower(Power::Shutdown),
        params: GUEST,
    },
    CommandSpec {
        names: &["list_storage", "storage"],
        op: PveOp::ListStorage,
        params: NODE,
    },
    CommandSpec {
        names: &["get_cluster_status", "cluster"],
        op: PveOp::ClusterStatus,
        params: &[],
    },
    CommandSpec {
        names: &["list_cluster_resources", "cluster_resources"],
        op: PveOp::ClusterResources,
        params: &[Param::Optional("type", "")],
    },
    CommandSpec {
        names: &["list_tasks", "tasks"],
        op: PveOp::ListTasks,
        params: &[Param::Required("node"), Param::Optional("limit", "20")],
    },
    CommandSpec {
        names: &["get_task_status", "task_status"],
        op: PveOp::TaskStatus,
        params: &[Param::Required("node"), Param::Required("upid")],
    },
];

impl PveClient {
    /// Routes a command name (or alias, case-insensitive) to one operation.
    /// Arguments are validated and coerced before any request is sent.
    pub async fn execute_command(&self, command: &str, args: &Value) -> Result<Value> {
        let (name, spec) = command::resolve(COMMANDS, command)?;
        let args = Args::new(&name, args);
        args.check(spec.params)?;

        match spec.op {
            PveOp::ListNodes => command::to_json(self.list_nodes().await?),
            PveOp::NodeStatus => {
                let node = args.text("node")?;
                command::to_json(self.get_node_status(&node).await?)
            }
            PveOp::ListVms => {
                let node = args.text("node")?;
                command::to_json(self.list_vms(&node).await?)
            }
            PveOp::VmStatus => {
                let (node, vmid) = (args.text("node")?, args.integer("vmid")?);
                command::to_json(self.get_vm_status(&node, vmid).await?)
            }
            PveOp::VmPower(action) => {
                let (node, vmid) = (args.text("node")?, args.integer("vmid")?);
                command::to_json(self.power(&node, vmid, GuestKind::Qemu, action).await?)
            }
            PveOp::ListContainers => {
                let node = args.text("node")?;
                command::to_json(self.list_containers(&node).await?)
            }
            PveOp::ContainerStatus => {
                let (node, vmid) = (args.text("node")?, args.integer("vmid")?);
                command::to_json(self.get_container_status(&node, vmid).await?)
            }
            PveOp::ContainerPower(action) => {
                let (node, vmid) = (args.text("node")?, args.integer("vmid")?);
                command::to_json(self.power(&node, vmid, GuestKind::Lxc, action).await?)
            }
            PveOp::ListStorage => {
                let node = args.text("node")?;
                command::to_json(self.list_storage(&node).await?)
            }
            PveOp::ClusterStatus => command::to_json(self.get_cluster_status().await?),
            PveOp::ClusterResources => {
                let resource_type = args.text_or("type", "")?;
                command::to_json(self.list_cluster_resources(&resource_type).await?)
            }
            PveOp::ListTasks => {
                let (node, limit) = (args.text("node")?, args.integer_or("limit", 20)?);
                command::to_json(self.list_tasks(&node, limit).await?)
            }
            PveOp::TaskStatus => {
                let (node, upid) = (args.text("node")?, args.text("upid")?);
                command::to_json(self.get_task_status(&node, &upid).await?)
            }
        }
    }
}
