use clap::CommandFactory;
use clap_complete::{generate_to, Shell};
use clap_mangen::Man;
use infra_abilities::cli::Args;
use std::fs;

const BIN: &str = "infra-abilities";

fn main() -> std::io::Result<()> {
    let out_dir = "assets";
    let man_dir = format!("{}/man", out_dir);
    let comp_dir = format!("{}/completions", out_dir);

    fs::create_dir_all(&man_dir)?;
    fs::create_dir_all(&comp_dir)?;

    let mut cmd = Args::command();
    cmd.build();

    // One page for the binary, one per backend subcommand
    render(&cmd, &format!("{}/{}.1", man_dir, BIN))?;
    for sub in cmd.get_subcommands().filter(|s| s.get_name() != "completions") {
        render(sub, &format!("{}/{}-{}.1", man_dir, BIN, sub.get_name()))?;
    }
    println!("Man pages generated in {}", man_dir);

    for shell in [Shell::Bash, Shell::Zsh, Shell::Fish] {
        generate_to(shell, &mut cmd, BIN, &comp_dir)?;
    }
    println!("Completions generated in {}", comp_dir);

    Ok(())
}

fn render(cmd: &clap::Command, path: &str) -> std::io::Result<()> {
    let mut buffer: Vec<u8> = Default::default();
    Man::new(cmd.clone()).render(&mut buffer)?;
    fs::write(path, buffer)
}
