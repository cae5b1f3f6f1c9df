// The deriver CLI.
// You can prove a formula from premises, canonicalize a formula, or list a formula space.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use deriver::config::DeriverConfig;
use deriver::deriver::Deriver;
use deriver::kernel::canonical::canonicalize;
use deriver::kernel::enumerate::{canonical_wffs, composite_wffs, FormulaSpace};
use deriver::kernel::wff::WffTree;
use deriver::proof::fitch::render;
use deriver::report::DerivationReport;
use deriver::syntax::parse_closed_wff;
use mimalloc::MiMalloc;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Parser)]
#[clap(
    name = "deriver",
    about = "A natural-deduction prover for quantified modal logic",
    version = env!("CARGO_PKG_VERSION")
)]
struct Args {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Search for a Fitch-style derivation of a goal.
    Prove {
        #[clap(value_name = "GOAL")]
        goal: String,

        #[clap(
            long = "premise",
            short = 'p',
            help = "A premise to derive from. May be repeated.",
            value_name = "FORMULA"
        )]
        premises: Vec<String>,

        #[clap(long, help = "Print the result as JSON.")]
        json: bool,

        #[clap(long, help = "Read search settings from a JSON file.", value_name = "FILE")]
        config: Option<PathBuf>,

        #[clap(long, help = "Keep lines the final derivation does not use.")]
        no_minimize: bool,
    },

    /// Print the canonical form of a formula.
    Canonical {
        #[clap(value_name = "FORMULA")]
        formula: String,
    },

    /// List the formulas of a bounded space.
    Enumerate {
        #[clap(long, default_value_t = 1)]
        nesting: u32,

        #[clap(long, default_value_t = 2)]
        predicates: usize,

        #[clap(long, default_value_t = 1)]
        arguments: usize,

        #[clap(long, default_value_t = 1)]
        arity: usize,

        #[clap(long, help = "Only list formulas in canonical form.")]
        canonical: bool,
    },
}

fn parse_or_exit(input: &str) -> WffTree {
    match parse_closed_wff(input) {
        Ok(wff) => wff,
        Err(e) => {
            println!("{}", e);
            std::process::exit(1);
        }
    }
}

fn prove(
    goal: &str,
    premises: &[String],
    json: bool,
    config_path: Option<PathBuf>,
    no_minimize: bool,
) {
    let mut config = match config_path {
        Some(path) => match DeriverConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                println!("{}", e);
                std::process::exit(1);
            }
        },
        None => DeriverConfig::default(),
    };
    if no_minimize {
        config.minimize = false;
    }

    let goal = parse_or_exit(goal);
    let premises: Vec<WffTree> = premises.iter().map(|p| parse_or_exit(p)).collect();
    let deriver = Deriver::new(config);
    let derivation = match deriver.derive(&goal, &premises) {
        Ok(derivation) => derivation,
        Err(e) => {
            println!("{}", e);
            std::process::exit(1);
        }
    };

    if json {
        let report = DerivationReport::new(&goal, &premises, &derivation);
        match report.to_json() {
            Ok(text) => println!("{}", text),
            Err(e) => {
                println!("{}", e);
                std::process::exit(1);
            }
        }
    } else if derivation.proved {
        print!("{}", render(&derivation.fitch()));
        println!("proved in {}", derivation.strength);
    } else {
        println!("not proved, up to {}", derivation.strength);
    }
    if !derivation.proved {
        std::process::exit(1);
    }
}

fn main() {
    // Use RUST_LOG to control log levels, e.g.:
    //   RUST_LOG=deriver::deriver=debug deriver prove 'A→A'
    tracing_subscriber::registry()
        .with(fmt::layer().with_ansi(false).without_time())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();
    color_backtrace::install();

    let args = Args::parse();
    match args.command {
        Command::Prove {
            goal,
            premises,
            json,
            config,
            no_minimize,
        } => prove(&goal, &premises, json, config, no_minimize),
        Command::Canonical { formula } => {
            let wff = parse_or_exit(&formula);
            println!("{}", canonicalize(&wff));
        }
        Command::Enumerate {
            nesting,
            predicates,
            arguments,
            arity,
            canonical,
        } => {
            let space = FormulaSpace {
                nesting,
                predicates,
                arguments,
                max_arity: arity,
            };
            let wffs = if canonical {
                canonical_wffs(space)
            } else {
                composite_wffs(space)
            };
            for wff in wffs {
                println!("{}", wff);
            }
        }
    }
}
