pub mod cli;
pub mod client;
pub mod command;
pub mod error;
pub mod fields;
pub mod logging;
pub mod pbs;
pub mod pve;
pub mod report;
pub mod settings;
pub mod whm;

#[cfg(test)]
mod tests;
