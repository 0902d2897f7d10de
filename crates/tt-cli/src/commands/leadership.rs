use tt_core::Seat;
use tt_rules::{Leadership, MessageLog};

pub fn run(name: &str, value: u32, primary: bool) -> Result<(), String> {
    let seat = Seat::new(0, name, "");
    let mut card = Leadership::new();
    card.on_card_played(seat.slot);
    card.set_value(seat.slot, value);
    card.set_primary(seat.slot, primary);

    let log = MessageLog::new();
    card.on_selection_done(&seat, &log);
    for text in log.texts() {
        println!("  {text}");
    }
    Ok(())
}
