use comfy_table::{ContentArrangement, Table};
use tt_rules::{ModifierRegistry, Trigger};

fn trigger_label(trigger: &Trigger) -> String {
    match trigger {
        Trigger::Nsid(nsid) => nsid.clone(),
        Trigger::Nsids(nsids) => nsids.join(", "),
        Trigger::FactionAbility(ability) => format!("faction: {ability}"),
        Trigger::UnitAbility(ability) => format!("unit: {ability}"),
        Trigger::If(_) => "condition".to_string(),
    }
}

pub fn run(combat_only: bool) -> Result<(), String> {
    let registry = ModifierRegistry::global().map_err(|e| e.to_string())?;
    let modifiers: Vec<_> = registry
        .modifiers()
        .iter()
        .filter(|m| !combat_only || m.is_combat)
        .collect();

    if modifiers.is_empty() {
        println!("  No modifiers found.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Name", "Priority", "Owner", "Combat", "Trigger", "Description"]);
    for m in &modifiers {
        table.add_row(vec![
            m.name.clone(),
            m.priority.to_string(),
            m.owner.to_string(),
            if m.is_combat { "yes" } else { "no" }.to_string(),
            trigger_label(&m.trigger),
            m.description.clone(),
        ]);
    }

    println!("{table}");
    println!();
    println!("  {} modifiers", modifiers.len());
    Ok(())
}
