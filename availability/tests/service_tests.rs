//! Integration tests for `AvailabilityService`
//!
//! Every operation is driven through the service against the in-memory
//! repository, with writes and publishes observed through test doubles.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic

mod common;

use asset_availability::domain::{INDEFINITE_LOCK_DAYS, Lock};
use asset_availability::events::{
    AssetLockExpired, AssetLocked, AssetUnlocked, AvailabilityEvent, RejectionReason,
};
use asset_availability::types::AssetId;
use asset_availability_testing::test_instant;
use chrono::Duration;
use common::{Harness, owner};

// ============================================================================
// register
// ============================================================================

#[test]
fn register_stores_maintenance_locked_asset_and_publishes() {
    let harness = Harness::new();
    let a1 = AssetId::new("A1");

    let event = harness.service.register_asset_with(a1.clone()).unwrap();

    assert_eq!(event.asset_id, a1);
    assert_eq!(harness.stored(&a1).current_lock(), &Lock::Maintenance);
    assert_eq!(harness.side_effects(), (1, 1));
    assert_eq!(harness.publisher.last(), Some(AvailabilityEvent::Registered(event)));
}

#[test]
fn register_twice_is_rejected_without_side_effects() {
    let harness = Harness::new();
    let a1 = harness.free_asset("A1");
    let before = harness.side_effects();

    let rejection = harness.service.register_asset_with(a1.clone()).unwrap_err();

    assert_eq!(rejection.reason, RejectionReason::AssetAlreadyExists);
    assert_eq!(rejection.asset_id, a1);
    assert_eq!(harness.side_effects(), before);
    // The activated asset was not reset to maintenance
    assert_eq!(harness.stored(&a1).current_lock(), &Lock::None);
}

// ============================================================================
// missing assets
// ============================================================================

#[test]
fn every_operation_on_a_missing_asset_is_rejected() {
    let harness = Harness::new();
    let ghost = AssetId::new("ghost");

    let activation = harness.service.activate(&ghost).unwrap_err();
    let withdrawal = harness.service.withdraw(&ghost).unwrap_err();
    let lock = harness
        .service
        .lock(&ghost, owner("bob"), Duration::minutes(5))
        .unwrap_err();
    let extension = harness
        .service
        .lock_indefinitely(&ghost, owner("bob"))
        .unwrap_err();
    let unlock = harness
        .service
        .unlock(&ghost, owner("bob"), test_instant())
        .unwrap_err();

    for reason in [
        activation.reason,
        withdrawal.reason,
        lock.reason,
        extension.reason,
        unlock.reason,
    ] {
        assert_eq!(reason, RejectionReason::AssetIsMissing);
    }
    assert_eq!(lock.owner_id, owner("bob"));
    assert_eq!(unlock.owner_id, owner("bob"));
    assert_eq!(harness.side_effects(), (0, 0));
}

// ============================================================================
// activate / withdraw
// ============================================================================

#[test]
fn activate_succeeds_once() {
    let harness = Harness::new();
    let a1 = AssetId::new("A1");
    harness.service.register_asset_with(a1.clone()).unwrap();

    assert!(harness.service.activate(&a1).is_ok());
    let before = harness.side_effects();
    let second = harness.service.activate(&a1).unwrap_err();

    assert_eq!(second.reason, RejectionReason::AssetAlreadyActivated);
    assert_eq!(harness.side_effects(), before);
}

#[test]
fn withdraw_refuses_owner_locked_asset() {
    let harness = Harness::new();
    let a1 = harness.free_asset("A1");
    harness
        .service
        .lock(&a1, owner("bob"), Duration::minutes(10))
        .unwrap();
    let before = harness.side_effects();

    let rejection = harness.service.withdraw(&a1).unwrap_err();

    assert_eq!(rejection.reason, RejectionReason::AssetCurrentlyLocked);
    assert_eq!(harness.side_effects(), before);
    assert!(matches!(
        harness.stored(&a1).current_lock(),
        Lock::Owner { .. }
    ));
}

#[test]
fn withdraw_free_asset() {
    let harness = Harness::new();
    let a1 = harness.free_asset("A1");

    harness.service.withdraw(&a1).unwrap();

    assert_eq!(harness.stored(&a1).current_lock(), &Lock::Withdrawal);
    assert!(harness
        .publisher
        .contains(|event| matches!(event, AvailabilityEvent::Withdrawn(_))));
}

// ============================================================================
// lock / lock_indefinitely / unlock
// ============================================================================

#[test]
fn lock_before_activation_fails() {
    let harness = Harness::new();
    let a1 = AssetId::new("A1");
    harness.service.register_asset_with(a1.clone()).unwrap();

    let rejection = harness
        .service
        .lock(&a1, owner("bob"), Duration::minutes(5))
        .unwrap_err();

    assert_eq!(rejection.reason, RejectionReason::AssetLocked);
    assert_eq!(harness.side_effects(), (1, 1));
}

#[test]
fn lock_indefinitely_extends_own_lock_only() {
    let harness = Harness::new();
    let a1 = harness.free_asset("A1");

    let fresh = harness
        .service
        .lock_indefinitely(&a1, owner("bob"))
        .unwrap_err();
    assert_eq!(fresh.reason, RejectionReason::NoLockDefinedForOwner);

    harness
        .service
        .lock(&a1, owner("bob"), Duration::minutes(10))
        .unwrap();
    let stolen = harness
        .service
        .lock_indefinitely(&a1, owner("eve"))
        .unwrap_err();
    assert_eq!(stolen.reason, RejectionReason::NoLockDefinedForOwner);

    harness.clock.advance(Duration::minutes(3));
    let extended = harness.service.lock_indefinitely(&a1, owner("bob")).unwrap();
    assert_eq!(
        extended,
        AssetLocked {
            asset_id: a1.clone(),
            owner_id: owner("bob"),
            valid_until: test_instant()
                + Duration::minutes(3)
                + Duration::days(INDEFINITE_LOCK_DAYS),
        }
    );
}

#[test]
fn unlock_records_caller_time() {
    let harness = Harness::new();
    let a1 = harness.free_asset("A1");
    harness
        .service
        .lock(&a1, owner("bob"), Duration::minutes(10))
        .unwrap();
    let at = test_instant() - Duration::hours(6);

    let event = harness.service.unlock(&a1, owner("bob"), at).unwrap();

    assert_eq!(
        event,
        AssetUnlocked {
            asset_id: a1.clone(),
            owner_id: owner("bob"),
            unlocked_at: at,
        }
    );
    assert_eq!(harness.stored(&a1).current_lock(), &Lock::None);
}

#[test]
fn sentinel_locks_cannot_be_unlocked_by_callers() {
    let harness = Harness::new();
    let a1 = AssetId::new("A1");
    harness.service.register_asset_with(a1.clone()).unwrap();

    let rejection = harness
        .service
        .unlock(&a1, owner("bob"), test_instant())
        .unwrap_err();

    assert_eq!(rejection.reason, RejectionReason::NoLockOnTheAsset);
    assert_eq!(harness.stored(&a1).current_lock(), &Lock::Maintenance);
}

// ============================================================================
// unlock_if_overdue
// ============================================================================

#[test]
fn unlock_if_overdue_on_free_asset_is_a_no_op() {
    let harness = Harness::new();
    let a1 = harness.free_asset("A1");
    let before = harness.side_effects();

    assert!(!harness.service.unlock_if_overdue(harness.stored(&a1)));
    assert_eq!(harness.side_effects(), before);
}

#[test]
fn unlock_if_overdue_clears_any_lock_once() {
    let harness = Harness::new();
    let a1 = harness.free_asset("A1");
    harness
        .service
        .lock(&a1, owner("bob"), Duration::minutes(10))
        .unwrap();
    harness.publisher.clear();
    let saves = harness.repository.saves();

    assert!(harness.service.unlock_if_overdue(harness.stored(&a1)));

    assert_eq!(harness.repository.saves(), saves + 1);
    assert_eq!(
        harness.publisher.events(),
        vec![AvailabilityEvent::LockExpired(AssetLockExpired {
            asset_id: a1.clone(),
        })]
    );
    assert_eq!(harness.stored(&a1).current_lock(), &Lock::None);
}

// ============================================================================
// End-to-end scenarios
// ============================================================================

#[test]
fn scenario_bob_holds_the_lock_eve_is_turned_away() {
    let harness = Harness::new();
    let a1 = AssetId::new("A1");
    harness.service.register_asset_with(a1.clone()).unwrap();
    harness.service.activate(&a1).unwrap();

    let locked = harness
        .service
        .lock(&a1, owner("bob"), Duration::minutes(35))
        .unwrap();
    assert_eq!(locked.valid_until, test_instant() + Duration::minutes(35));

    let eve_lock = harness
        .service
        .lock(&a1, owner("eve"), Duration::minutes(5))
        .unwrap_err();
    assert_eq!(eve_lock.reason, RejectionReason::AssetLocked);

    let eve_unlock = harness
        .service
        .unlock(&a1, owner("eve"), test_instant())
        .unwrap_err();
    assert_eq!(eve_unlock.reason, RejectionReason::NoLockOnTheAsset);
    assert_eq!(eve_unlock.owner_id, owner("eve"));

    harness
        .service
        .unlock(&a1, owner("bob"), test_instant())
        .unwrap();
    assert_eq!(harness.stored(&a1).current_lock(), &Lock::None);

    let published: Vec<&str> = harness
        .publisher
        .events()
        .iter()
        .map(asset_availability_core::event::Event::event_type)
        .collect();
    assert_eq!(
        published,
        vec![
            "ASSET_REGISTERED",
            "ASSET_ACTIVATED",
            "ASSET_LOCKED",
            "ASSET_UNLOCKED"
        ]
    );
}

#[test]
fn scenario_withdrawn_before_activation_stays_withdrawn() {
    let harness = Harness::new();
    let a2 = AssetId::new("A2");
    harness.service.register_asset_with(a2.clone()).unwrap();

    harness.service.withdraw(&a2).unwrap();
    let activation = harness.service.activate(&a2).unwrap_err();

    assert_eq!(activation.reason, RejectionReason::AssetAlreadyActivated);
    assert_eq!(harness.stored(&a2).current_lock(), &Lock::Withdrawal);
}
