use std::path::Path;
use std::rc::Rc;

use colored::Colorize;
use tt_rules::{CombatRoller, Message, MessageLog, RngDice, RollType, RollerConfig};

use super::{Resolution, load_scenario, resolve};

/// Command-line options for a roll.
pub struct RollOptions {
    pub hex: String,
    pub player: u32,
    pub opponent: Option<u32>,
    pub roll_type: String,
    pub seed: u64,
    pub nebula: bool,
    pub defender: bool,
}

pub fn run(scenario_path: &Path, options: RollOptions) -> Result<(), String> {
    let scenario = load_scenario(scenario_path)?;
    let roll_type = RollType::parse(&options.roll_type).map_err(|e| e.to_string())?;
    let aux = resolve(
        &scenario,
        &Resolution {
            hex: &options.hex,
            player: options.player,
            opponent: options.opponent,
            roll_type,
            nebula: options.nebula,
            defender: options.defender,
        },
    )?;
    let seat = scenario
        .table
        .seats
        .by_slot(options.player)
        .map_err(|e| e.to_string())?;

    let config = RollerConfig::default().with_seed(options.seed);
    let mut dice = RngDice::new(&config);
    let log = Rc::new(MessageLog::new());
    CombatRoller::new(&aux, roll_type, seat)
        .with_config(config)
        .roll(seat.position, &mut dice, log.clone())
        .map_err(|e| e.to_string())?;

    for message in log.messages() {
        match message {
            Message::All(text) => {
                for line in text.lines() {
                    println!("  {}", line.bold());
                }
            }
            Message::Chat(text) => println!("  {}", text.dimmed()),
            Message::Player { text, .. } => println!("  {text}"),
        }
    }
    Ok(())
}

