// File: ./src/cli.rs
//! Shared command-line interface logic, like printing help.
use anyhow::{Result, bail};
use std::path::PathBuf;

/// Options that precede the command word.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Invocation {
    pub verbose: bool,
    pub help: bool,
    pub root: Option<PathBuf>,
    pub command: Option<String>,
    pub args: Vec<String>,
}

/// Splits global options from the command. Everything after the command word
/// is passed through untouched, so titles may contain `-v` or `help`.
pub fn parse_args(args: Vec<String>) -> Result<Invocation> {
    let mut inv = Invocation::default();
    let mut iter = args.into_iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-v" | "--verbose" => inv.verbose = true,
            "-h" | "--help" | "help" => inv.help = true,
            "-r" | "--root" => match iter.next() {
                Some(path) => inv.root = Some(PathBuf::from(path)),
                None => bail!("{} requires a path", arg),
            },
            _ => {
                inv.command = Some(arg);
                break;
            }
        }
    }
    inv.args = iter.collect();
    Ok(inv)
}

pub fn print_help(binary_name: &str) {
    println!(
        "Task tools v{} - task title annotations and duration labels",
        env!("CARGO_PKG_VERSION")
    );
    println!();
    println!("USAGE:");
    println!("    {} [--root <path>] [-v] <command>", binary_name);
    println!();
    println!("COMMANDS:");
    println!("    parse <title>          Print the parsed title as JSON");
    println!("    render <title>         Parse a title and write its links back as Markdown");
    println!("    duration <label>...    Minutes resolved from the configured duration labels");
    println!("    label-for <minutes>    Duration label configured for exactly <minutes>");
    println!("    ingest <tasks.json>    Parse and resolve every task of an exported task list");
    println!("    init                   Write a default config file if none exists");
    println!();
    println!("OPTIONS:");
    println!("    -r, --root <path>     Use a different directory for config.");
    println!("    -v, --verbose         Log debug output to stderr.");
    println!("    -h, --help            Show this help message.");
    println!();
    println!("TITLE SYNTAX:");
    println!("    (15) or (30+)         Leading short-duration token");
    println!("    09:00-10:00           Time period (first occurrence)");
    println!("    [text](https://...)   Link, shown as its text");
    println!();
    println!("EXAMPLES:");
    println!(
        "    {} parse \"(15) Write report 09:00-10:00 see [spec](https://example.com/s)\"",
        binary_name
    );
    println!("    {} duration 15min 30min", binary_name);
    println!("    {} label-for 5", binary_name);
}
