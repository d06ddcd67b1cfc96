use super::*;

#[test]
fn default_quantity_is_one() {
    assert_eq!(ScanState::default().quantity, 1);
}

#[test]
fn default_state_is_idle_and_empty() {
    let state = ScanState::default();
    assert!(!state.scanning);
    assert!(state.upc.is_empty());
    assert!(state.batch_results.is_empty());
}
