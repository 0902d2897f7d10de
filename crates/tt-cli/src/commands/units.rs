use comfy_table::{ContentArrangement, Table};
use tt_rules::{RollAttrs, RollType, UnitAttrsSet};

use super::opt;

fn roll_summary(roll: Option<&RollAttrs>) -> String {
    let Some(roll) = roll else {
        return "-".to_string();
    };
    let mut summary = roll.hit.to_string();
    if roll.dice_per_unit() > 1 {
        summary.push_str(&format!(" x{}", roll.dice_per_unit()));
    }
    if let Some(range) = roll.range.filter(|r| *r > 0) {
        summary.push_str(&format!(" r{range}"));
    }
    summary
}

pub fn run(upgraded: bool) -> Result<(), String> {
    let mut set = UnitAttrsSet::default_set();
    if upgraded {
        let upgrades = UnitAttrsSet::default_upgrade_set();
        let units: Vec<String> = upgrades.units().map(str::to_string).collect();
        for unit in units {
            set.upgrade_unit(&unit, &upgrades).map_err(|e| e.to_string())?;
        }
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    let mut header = vec!["Unit", "Name", "Lvl", "Cost", "Move", "Cap"];
    header.extend(["AFB", "Bomb", "Cannon", "Space", "Ground"]);
    table.set_header(header);

    for attrs in set.values() {
        let mut row = vec![
            attrs.unit.clone(),
            attrs.name.clone(),
            attrs.level.to_string(),
            opt(attrs.cost),
            opt(attrs.movement),
            opt(attrs.capacity),
        ];
        row.extend(RollType::ALL.iter().map(|rt| roll_summary(attrs.roll(*rt))));
        table.add_row(row);
    }

    println!("{table}");
    println!();
    println!("  {} unit types", set.len());
    Ok(())
}
