//! Printed unit attributes and their level-2 upgrades.
//!
//! Hit values are the minimum face on a d10. Production for the space dock
//! is the bonus added to the planet's resources.

use super::{ExtraHitsOn, RollAttrs, UnitAttrs};

fn ship(unit: &str, name: &str, cost: f32, movement: u32) -> UnitAttrs {
    let mut attrs = UnitAttrs::new(unit, name);
    attrs.cost = Some(cost);
    attrs.movement = Some(movement);
    attrs.ship = Some(true);
    attrs
}

fn upgrade(unit: &str, name: &str) -> UnitAttrs {
    let mut attrs = UnitAttrs::new(unit, name);
    attrs.level = 2;
    attrs
}

/// Base attributes for every unit type, in catalog order.
pub fn base_units() -> Vec<UnitAttrs> {
    let mut carrier = ship("carrier", "Carrier", 3.0, 1);
    carrier.capacity = Some(4);
    carrier.space_combat = Some(RollAttrs::new(9));

    let mut cruiser = ship("cruiser", "Cruiser", 2.0, 2);
    cruiser.space_combat = Some(RollAttrs::new(7));

    let mut destroyer = ship("destroyer", "Destroyer", 1.0, 2);
    destroyer.anti_fighter_barrage = Some(RollAttrs::new(9).with_dice(2));
    destroyer.space_combat = Some(RollAttrs::new(9));

    let mut dreadnought = ship("dreadnought", "Dreadnought", 4.0, 1);
    dreadnought.capacity = Some(1);
    dreadnought.sustain_damage = Some(true);
    dreadnought.abilities = vec!["sustain_damage".to_string()];
    dreadnought.bombardment = Some(RollAttrs::new(5));
    dreadnought.space_combat = Some(RollAttrs::new(5));

    let mut fighter = UnitAttrs::new("fighter", "Fighter");
    fighter.cost = Some(0.5);
    fighter.produce = Some(2);
    fighter.ship = Some(true);
    fighter.space_combat = Some(RollAttrs::new(9));

    let mut flagship = ship("flagship", "Flagship", 8.0, 1);
    flagship.capacity = Some(3);
    flagship.sustain_damage = Some(true);
    flagship.abilities = vec!["sustain_damage".to_string()];
    flagship.space_combat = Some(RollAttrs {
        extra_hits_on: Some(ExtraHitsOn {
            value: 10,
            count: None,
        }),
        ..RollAttrs::new(7).with_dice(2)
    });

    let mut infantry = UnitAttrs::new("infantry", "Infantry");
    infantry.cost = Some(0.5);
    infantry.produce = Some(2);
    infantry.ground = Some(true);
    infantry.ground_combat = Some(RollAttrs::new(8));

    let mut mech = UnitAttrs::new("mech", "Mech");
    mech.cost = Some(2.0);
    mech.ground = Some(true);
    mech.sustain_damage = Some(true);
    mech.abilities = vec!["sustain_damage".to_string()];
    mech.ground_combat = Some(RollAttrs::new(6));

    let mut pds = UnitAttrs::new("pds", "PDS");
    pds.structure = Some(true);
    pds.planetary_shield = Some(true);
    pds.abilities = vec!["planetary_shield".to_string()];
    pds.space_cannon = Some(RollAttrs::new(6));

    let mut space_dock = UnitAttrs::new("space_dock", "Space Dock");
    space_dock.structure = Some(true);
    space_dock.produce = Some(2);

    let mut war_sun = ship("war_sun", "War Sun", 12.0, 2);
    war_sun.capacity = Some(6);
    war_sun.sustain_damage = Some(true);
    war_sun.abilities = vec!["sustain_damage".to_string(), "war_sun".to_string()];
    war_sun.bombardment = Some(RollAttrs::new(3).with_dice(3));
    war_sun.space_combat = Some(RollAttrs::new(3).with_dice(3));

    vec![
        carrier,
        cruiser,
        destroyer,
        dreadnought,
        fighter,
        flagship,
        infantry,
        mech,
        pds,
        space_dock,
        war_sun,
    ]
}

/// Level-2 deltas, keyed by the unit they upgrade.
pub fn unit_upgrades() -> Vec<UnitAttrs> {
    let mut carrier = upgrade("carrier", "Carrier II");
    carrier.movement = Some(2);
    carrier.capacity = Some(6);

    let mut cruiser = upgrade("cruiser", "Cruiser II");
    cruiser.movement = Some(3);
    cruiser.capacity = Some(1);
    cruiser.space_combat = Some(RollAttrs::new(6));

    let mut destroyer = upgrade("destroyer", "Destroyer II");
    destroyer.anti_fighter_barrage = Some(RollAttrs::new(6).with_dice(3));
    destroyer.space_combat = Some(RollAttrs::new(8));

    let mut dreadnought = upgrade("dreadnought", "Dreadnought II");
    dreadnought.cost = Some(4.0);
    dreadnought.movement = Some(2);

    let mut fighter = upgrade("fighter", "Fighter II");
    fighter.movement = Some(2);
    fighter.space_combat = Some(RollAttrs::new(8));

    let mut infantry = upgrade("infantry", "Infantry II");
    infantry.ground_combat = Some(RollAttrs::new(7));

    let mut pds = upgrade("pds", "PDS II");
    pds.space_cannon = Some(RollAttrs::new(5).with_range(1));

    let mut space_dock = upgrade("space_dock", "Space Dock II");
    space_dock.produce = Some(4);

    vec![
        carrier,
        cruiser,
        destroyer,
        dreadnought,
        fighter,
        infantry,
        pds,
        space_dock,
    ]
}
