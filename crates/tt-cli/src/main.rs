//! CLI frontend for the tabletop rules engine.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "tt",
    about = "Tabletop rules automation: unit attributes, combat rolls, and token swaps",
    version,
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List unit attributes from the built-in catalog
    Units {
        /// Show every unit at its upgraded level
        #[arg(short, long)]
        upgraded: bool,
    },

    /// List registered unit modifiers
    Modifiers {
        /// Only modifiers that affect combat rolls
        #[arg(short, long)]
        combat_only: bool,
    },

    /// Show how many dice each unit rolls at a hex
    Dice {
        /// Scenario file (JSON)
        scenario: PathBuf,

        /// Hex to resolve, as `q,r`
        #[arg(long, default_value = "0,0")]
        hex: String,

        /// Rolling player slot
        #[arg(short, long)]
        player: u32,

        /// Opponent player slot
        #[arg(short, long)]
        opponent: Option<u32>,

        /// Roll type (e.g. spaceCombat, space-cannon)
        #[arg(short, long, default_value = "spaceCombat")]
        roll_type: String,
    },

    /// Roll dice for a player at a hex and print the report
    Roll {
        /// Scenario file (JSON)
        scenario: PathBuf,

        /// Hex to resolve, as `q,r`
        #[arg(long, default_value = "0,0")]
        hex: String,

        /// Rolling player slot
        #[arg(short, long)]
        player: u32,

        /// Opponent player slot
        #[arg(short, long)]
        opponent: Option<u32>,

        /// Roll type (e.g. spaceCombat, space-cannon)
        #[arg(short, long, default_value = "spaceCombat")]
        roll_type: String,

        /// RNG seed for deterministic rolls
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// The hex is a nebula
        #[arg(long)]
        nebula: bool,

        /// The rolling player is defending
        #[arg(long)]
        defender: bool,
    },

    /// Swap tokens and units around an object
    Swap {
        /// Scenario file (JSON)
        scenario: PathBuf,

        /// Id of the object the player triggered
        #[arg(long)]
        object: String,

        /// Acting player slot
        #[arg(short, long)]
        player: u32,

        /// Write the updated table back to the scenario file
        #[arg(short, long)]
        write: bool,
    },

    /// Resolve the leadership strategy card for one player
    Leadership {
        /// Player name
        name: String,

        /// Command tokens bought with influence (0-10)
        #[arg(short, long, default_value = "0")]
        value: u32,

        /// Resolve the primary ability
        #[arg(long)]
        primary: bool,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("TT_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Units { upgraded } => commands::units::run(upgraded),
        Commands::Modifiers { combat_only } => commands::modifiers::run(combat_only),
        Commands::Dice {
            scenario,
            hex,
            player,
            opponent,
            roll_type,
        } => commands::dice::run(&scenario, &hex, player, opponent, &roll_type),
        Commands::Roll {
            scenario,
            hex,
            player,
            opponent,
            roll_type,
            seed,
            nebula,
            defender,
        } => commands::roll::run(
            &scenario,
            commands::roll::RollOptions {
                hex,
                player,
                opponent,
                roll_type,
                seed,
                nebula,
                defender,
            },
        ),
        Commands::Swap {
            scenario,
            object,
            player,
            write,
        } => commands::swap::run(&scenario, &object, player, write),
        Commands::Leadership {
            name,
            value,
            primary,
        } => commands::leadership::run(&name, value, primary),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
