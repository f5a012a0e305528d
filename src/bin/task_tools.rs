use anyhow::{Context, Result, bail};
use simplelog::{ColorChoice, LevelFilter, TermLogger, TerminalMode};
use std::env;
use std::fs;
use task_tools::config::Config;
use task_tools::context::{AppContext, StandardContext};
use task_tools::model::{self, DurationTable};
use task_tools::source::{self, MemorySource};

const BIN: &str = "task-tools";

fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    // A logger may already be installed when embedded; that is not fatal.
    let _ = TermLogger::init(
        level,
        simplelog::Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    );
}

/// Missing config is fine: parsing needs none and duration lookups resolve to 0.
fn load_config(ctx: &dyn AppContext) -> Result<Config> {
    match Config::load(ctx) {
        Ok(config) => Ok(config),
        Err(e) if Config::is_missing_config_error(&e) => {
            log::info!("No config file, using defaults");
            Ok(Config::default())
        }
        Err(e) => Err(e),
    }
}

fn print_durations(labels: &[String], table: &DurationTable) {
    println!("{}", table.resolve(labels));
}

fn main() -> Result<()> {
    let inv = task_tools::cli::parse_args(env::args().skip(1).collect())?;

    let Some(command) = inv.command.filter(|_| !inv.help) else {
        task_tools::cli::print_help(BIN);
        return Ok(());
    };
    init_logging(inv.verbose);

    let ctx = StandardContext::new(inv.root);
    let rest = inv.args.as_slice();

    match command.as_str() {
        "parse" => {
            let title = rest.join(" ");
            let parsed = model::parse(&title)?;
            println!("{}", serde_json::to_string_pretty(&parsed)?);
        }
        "render" => {
            let title = rest.join(" ");
            let parsed = model::parse(&title)?;
            println!("{}", parsed.rendered());
        }
        "duration" => {
            let config = load_config(&ctx)?;
            print_durations(rest, config.duration_labels());
        }
        "label-for" => {
            let Some(raw) = rest.first() else {
                bail!("label-for requires a number of minutes");
            };
            let minutes: u32 = raw
                .parse()
                .with_context(|| format!("'{}' is not a number of minutes", raw))?;
            let config = load_config(&ctx)?;
            if let Some(label) = config.duration_labels().label_for_duration(minutes) {
                println!("{}", label);
            }
        }
        "ingest" => {
            let Some(path) = rest.first() else {
                bail!("ingest requires a path to a JSON task list");
            };
            let config = load_config(&ctx)?;
            let json = fs::read_to_string(path)
                .with_context(|| format!("Failed to read task list '{}'", path))?;
            let tasks = MemorySource::from_json(path.as_str(), &json)?;
            let report = source::ingest(&tasks, &config)?;

            for task in &report.tasks {
                let marker = task.short_duration().unwrap_or("");
                println!("[{:>4}m] {:<6} {}", task.duration, marker, task.summary());
            }
            println!(
                "{} tasks, {} minutes estimated",
                report.tasks.len(),
                report.total_minutes()
            );
            for failure in &report.failures {
                eprintln!("Task {} failed: {}", failure.task_id, failure.error);
            }
        }
        "init" => {
            let path = ctx.get_config_file_path()?;
            if path.exists() {
                println!("Config already exists at {}", path.display());
            } else {
                Config::default().save(&ctx)?;
                println!("Wrote {}", Config::get_path_string(&ctx)?);
            }
        }
        other => {
            task_tools::cli::print_help(BIN);
            bail!("Unknown command '{}'", other);
        }
    }
    Ok(())
}
