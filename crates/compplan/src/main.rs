use std::path::PathBuf;

use clap::{Parser, Subcommand};
use compplan::scenario::parse_assignment;
use compplan::{OutputFormat, commands, init_logging};
use compplan_core::PlanType;

#[derive(Parser, Debug)]
#[command(name = "compplan")]
#[command(about = "What-if simulator for compensation plan topologies")]
struct Args {
    /// Log level (debug, info, warn, error)
    #[arg(short, long, default_value = "warn", global = true)]
    log_level: String,

    /// Also append logs to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the parameters and their legal values
    Domains {
        #[arg(short, long)]
        plan: Option<PlanType>,

        #[arg(short, long, value_enum, default_value_t)]
        format: OutputFormat,
    },

    /// Simulate a plan from its default input
    Simulate {
        #[arg(short, long)]
        plan: PlanType,

        /// Override a parameter, e.g. `--set depth=10`
        #[arg(short, long = "set", value_name = "NAME=VALUE", value_parser = parse_override)]
        overrides: Vec<(String, f64)>,

        /// YAML file with plan constant overrides
        #[arg(short, long)]
        constants: Option<PathBuf>,

        #[arg(short, long, value_enum, default_value_t)]
        format: OutputFormat,
    },

    /// Simulate a YAML scenario file
    Run {
        scenario: PathBuf,

        #[arg(short, long)]
        constants: Option<PathBuf>,

        #[arg(short, long, value_enum, default_value_t)]
        format: OutputFormat,
    },

    /// Simulate every legal input of a plan and rank by headline payout
    Sweep {
        #[arg(short, long)]
        plan: PlanType,

        /// Number of ranked points to print
        #[arg(short, long, default_value_t = 10)]
        top: usize,

        #[arg(short, long)]
        constants: Option<PathBuf>,

        #[arg(short, long, value_enum, default_value_t)]
        format: OutputFormat,
    },
}

fn parse_override(raw: &str) -> Result<(String, f64), String> {
    parse_assignment(raw).map_err(|e| e.to_string())
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    let _log_guard = init_logging(&args.log_level, args.log_file.as_deref())?;

    let output = match args.command {
        Command::Domains { plan, format } => commands::domains(plan, format)?,
        Command::Simulate {
            plan,
            overrides,
            constants,
            format,
        } => commands::simulate(plan, &overrides, constants.as_deref(), format)?,
        Command::Run {
            scenario,
            constants,
            format,
        } => commands::run(&scenario, constants.as_deref(), format)?,
        Command::Sweep {
            plan,
            top,
            constants,
            format,
        } => commands::sweep(plan, top, constants.as_deref(), format)?,
    };

    print!("{output}");
    Ok(())
}
