//! Rollback FSM unit tests

use deployguard::rollback::{RollbackEvent, RollbackFsm, RollbackState};

#[test]
fn test_fsm_initial_state() {
    let fsm = RollbackFsm::new(3);
    assert_eq!(fsm.state(), RollbackState::Idle);
    assert!(fsm.last_error().is_none());
    assert_eq!(fsm.attempt(), 0);
    assert!(!fsm.is_terminal());
}

#[test]
fn test_fsm_retry_then_success() {
    let mut fsm = RollbackFsm::new(3);

    fsm.process(RollbackEvent::Begin).unwrap();
    assert_eq!(fsm.state(), RollbackState::Attempting(1));

    fsm.process(RollbackEvent::AttemptFailed("reset failed".to_string()))
        .unwrap();
    assert_eq!(fsm.state(), RollbackState::Attempting(2));
    assert_eq!(fsm.last_error(), Some("reset failed"));

    fsm.process(RollbackEvent::AttemptSucceeded).unwrap();
    assert_eq!(fsm.state(), RollbackState::Succeeded);
    assert_eq!(fsm.attempt(), 2);
}

#[test]
fn test_fsm_exhausts_at_max() {
    let mut fsm = RollbackFsm::new(3);
    fsm.process(RollbackEvent::Begin).unwrap();

    for n in 1..=3 {
        assert_eq!(fsm.state(), RollbackState::Attempting(n));
        fsm.process(RollbackEvent::AttemptFailed(format!("error {n}")))
            .unwrap();
    }

    assert_eq!(fsm.state(), RollbackState::Failed);
    assert_eq!(fsm.attempt(), 3);
    assert_eq!(fsm.last_error(), Some("error 3"));
    assert!(fsm.is_terminal());
}

#[test]
fn test_fsm_invalid_transitions() {
    let mut fsm = RollbackFsm::new(3);

    // Nothing to succeed before the first attempt
    assert!(fsm.process(RollbackEvent::AttemptSucceeded).is_err());

    fsm.process(RollbackEvent::Begin).unwrap();
    assert!(fsm.process(RollbackEvent::Begin).is_err());

    fsm.process(RollbackEvent::AttemptSucceeded).unwrap();
    assert!(fsm
        .process(RollbackEvent::AttemptFailed("late".to_string()))
        .is_err());
    assert_eq!(fsm.state(), RollbackState::Succeeded);
}
