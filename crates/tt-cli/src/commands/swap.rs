use std::path::Path;

use colored::Colorize;
use tt_core::ObjectId;
use tt_rules::SwapEngine;

use super::{load_scenario, save_scenario};

pub fn run(scenario_path: &Path, object: &str, player: u32, write: bool) -> Result<(), String> {
    let mut scenario = load_scenario(scenario_path)?;
    let seat = scenario
        .table
        .seats
        .by_slot(player)
        .map_err(|e| e.to_string())?
        .clone();

    let engine = SwapEngine::builtin();
    let outcome = engine
        .on_r(&mut scenario.table, &ObjectId::from(object), &seat)
        .map_err(|e| e.to_string())?;

    let Some(outcome) = outcome else {
        println!("  Nothing to swap.");
        return Ok(());
    };

    println!("  {}", outcome.message.bold());
    for id in &outcome.consumed {
        println!("  {} {id}", "-".red());
    }
    for id in &outcome.produced {
        let nsid = scenario
            .table
            .get(id)
            .map(|o| o.nsid.clone())
            .unwrap_or_default();
        println!("  {} {id} {}", "+".green(), nsid.dimmed());
    }

    if write {
        save_scenario(scenario_path, &scenario)?;
        println!("  Wrote {}", scenario_path.display());
    }
    Ok(())
}
