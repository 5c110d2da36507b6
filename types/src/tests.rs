use super::*;

fn dice(a: u8, b: u8, c: u8) -> Dice {
    Dice::new(a, b, c).unwrap()
}

#[test]
fn test_die_range() {
    for face in 1..=6 {
        assert_eq!(Die::new(face).unwrap().value(), face);
    }
    assert!(Die::new(0).is_none());
    assert!(Die::new(7).is_none());
    assert_eq!(Die::try_from(9), Err(InvalidDie(9)));
    assert_eq!(Dice::new(1, 2, 0), Err(InvalidDie(0)));
}

#[test]
fn test_dice_total_and_triple() {
    assert_eq!(dice(2, 1, 1).total(), 4);
    assert_eq!(dice(6, 6, 6).total(), 18);
    assert!(dice(3, 3, 3).is_triple());
    assert!(!dice(3, 3, 4).is_triple());
    assert_eq!(dice(1, 5, 6).to_string(), "1-5-6");
}

#[test]
fn test_side_parsing() {
    assert_eq!("tai".parse::<Side>(), Ok(Side::High));
    assert_eq!("HIGH".parse::<Side>(), Ok(Side::High));
    assert_eq!("xỉu".parse::<Side>(), Ok(Side::Low));
    assert_eq!(" low ".parse::<Side>(), Ok(Side::Low));
    assert!("triple".parse::<Side>().is_err());
}

#[test]
fn test_side_for_total() {
    assert_eq!(Side::for_total(3), Side::Low);
    assert_eq!(Side::for_total(10), Side::Low);
    assert_eq!(Side::for_total(11), Side::High);
    assert_eq!(Side::for_total(18), Side::High);
}

#[test]
fn test_history_newest_first_and_bounded() {
    let mut history = History::default();
    for i in 0..25u8 {
        history.record(4 + (i % 10), Outcome::Low);
    }

    assert_eq!(history.len(), HISTORY_LIMIT);
    // Newest at the front
    assert_eq!(history.latest().unwrap().id, 25);
    assert_eq!(history.entries()[HISTORY_LIMIT - 1].id, 6);

    // Ids strictly decrease from front to back
    for pair in history.entries().windows(2) {
        assert!(pair[0].id > pair[1].id);
    }
}

#[test]
fn test_history_wire_format() {
    let mut history = History::default();
    history.record(4, Outcome::Low);
    history.record(18, Outcome::Triple);

    let json = serde_json::to_string(&history).unwrap();
    assert_eq!(
        json,
        r#"[{"id":2,"total":18,"result":"triple"},{"id":1,"total":4,"result":"xiu"}]"#
    );
}

#[test]
fn test_history_decode_truncates() {
    let entries: Vec<String> = (0..30)
        .map(|i| format!(r#"{{"id":{},"total":12,"result":"tai"}}"#, 30 - i))
        .collect();
    let json = format!("[{}]", entries.join(","));

    let history: History = serde_json::from_str(&json).unwrap();
    assert_eq!(history.len(), HISTORY_LIMIT);
    assert_eq!(history.latest().unwrap().id, 30);
    assert_eq!(history.next_id(), 31);
}

#[test]
fn test_history_strip() {
    let mut history = History::default();
    history.record(12, Outcome::High);
    history.record(5, Outcome::Low);
    history.record(9, Outcome::Triple);
    assert_eq!(history.strip(), "B X T");
}

#[test]
fn test_die_decode_rejects_out_of_range() {
    assert!(serde_json::from_str::<Die>("7").is_err());
    assert_eq!(serde_json::from_str::<Die>("6").unwrap().value(), 6);
}
