use std::path::Path;

use comfy_table::{ContentArrangement, Table};
use tt_rules::{CombatRoller, RollType};

use super::{Resolution, load_scenario, resolve};

pub fn run(
    scenario_path: &Path,
    hex: &str,
    player: u32,
    opponent: Option<u32>,
    roll_type: &str,
) -> Result<(), String> {
    let scenario = load_scenario(scenario_path)?;
    let roll_type = RollType::parse(roll_type).map_err(|e| e.to_string())?;
    let aux = resolve(
        &scenario,
        &Resolution {
            hex,
            player,
            opponent,
            roll_type,
            nebula: false,
            defender: false,
        },
    )?;
    let seat = scenario
        .table
        .seats
        .by_slot(player)
        .map_err(|e| e.to_string())?;

    let roller = CombatRoller::new(&aux, roll_type, seat);
    let counts = roller.unit_to_dice_count();
    println!("  {}", roller.modifiers_report(false));
    if counts.is_empty() {
        println!("  No units roll for {roll_type}.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Unit", "Count", "Adjacent", "Hit", "Dice"]);
    for (unit, dice) in counts.iter() {
        let hit = aux
            .unit_attrs_set()
            .get(unit)
            .and_then(|u| u.roll(roll_type))
            .map(|r| r.hit.to_string())
            .unwrap_or_default();
        table.add_row(vec![
            unit.to_string(),
            aux.count(unit).to_string(),
            aux.adjacent_count(unit).to_string(),
            hit,
            dice.to_string(),
        ]);
    }
    println!("{table}");
    println!();
    println!("  {} dice", counts.total());
    Ok(())
}
