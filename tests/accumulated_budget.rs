mod common;

use std::collections::BTreeMap;

use bilancio_core::forecast::accumulate;
use common::{month, transfer_to};
use uuid::Uuid;

#[test]
fn overspent_first_month_surfaces_negative_carryover() {
    let recipient = Uuid::new_v4();
    let transfers = vec![transfer_to(recipient, 1000.0, month(2024, 1))];
    let mut spent = BTreeMap::new();
    spent.insert(month(2024, 1), 1200.0);

    let result = accumulate(&transfers, &spent, month(2024, 2), recipient);
    assert_eq!(result.carryover, -200.0);
    assert!(result.has_negative_history);
}

#[test]
fn signed_carryover_contrasts_with_forecast_flooring() {
    // The monthly engine floors carryover at zero; this walk must not.
    let recipient = Uuid::new_v4();
    let transfers = vec![
        transfer_to(recipient, 400.0, month(2024, 1)),
        transfer_to(recipient, 400.0, month(2024, 2)),
    ];
    let mut spent = BTreeMap::new();
    spent.insert(month(2024, 1), 700.0);
    spent.insert(month(2024, 2), 50.0);

    let result = accumulate(&transfers, &spent, month(2024, 3), recipient);
    // Month 1 closes at -300, month 2 recovers to +50.
    assert_eq!(result.carryover, 50.0);
    assert_eq!(result.remaining, 50.0);
    assert!(result.has_negative_history);
}

#[test]
fn months_after_the_target_are_ignored() {
    let recipient = Uuid::new_v4();
    let transfers = vec![
        transfer_to(recipient, 300.0, month(2024, 1)),
        transfer_to(recipient, 9999.0, month(2024, 5)),
    ];
    let spent = BTreeMap::new();
    let result = accumulate(&transfers, &spent, month(2024, 2), recipient);
    assert_eq!(result.remaining, 300.0);
    assert_eq!(result.carryover, 300.0);
}
