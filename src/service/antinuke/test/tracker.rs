use super::*;

/// Tests that only timestamps strictly inside the window are counted.
///
/// Expected: records at 0, 1000 and 5000 queried at 6000 with a 4000ms window
/// count once, and the stored sequence shrinks to the surviving entry
#[test]
fn counts_only_timestamps_inside_window() {
    let tracker = ActionTracker::new();
    for t in [0, 1_000, 5_000] {
        tracker.record(nuker(), ProtectionKind::MaxBans, t);
    }

    let count = tracker.count_within(nuker(), ProtectionKind::MaxBans, 4_000, 6_000);

    assert_eq!(count, 1);
    assert_eq!(
        tracker.timestamps(nuker(), ProtectionKind::MaxBans),
        vec![5_000]
    );
}

/// Tests that a timestamp exactly one window old is outside the window.
///
/// Expected: count is zero
#[test]
fn window_end_is_exclusive() {
    let tracker = ActionTracker::new();
    tracker.record(nuker(), ProtectionKind::MaxKicks, 0);

    assert_eq!(
        tracker.count_within(nuker(), ProtectionKind::MaxKicks, 10_000, 9_999),
        1
    );
    assert_eq!(
        tracker.count_within(nuker(), ProtectionKind::MaxKicks, 10_000, 10_000),
        0
    );
}

/// Tests counting for an actor that was never recorded.
///
/// Expected: zero, and no state is created for the actor
#[test]
fn unknown_actor_counts_zero_without_state() {
    let tracker = ActionTracker::new();

    assert_eq!(
        tracker.count_within(nuker(), ProtectionKind::MaxBans, 10_000, 0),
        0
    );
    assert_eq!(tracker.tracked_actors(), 0);
}

/// Tests that kinds are counted independently for the same actor.
///
/// Expected: kicks do not count toward bans
#[test]
fn kinds_are_counted_separately() {
    let tracker = ActionTracker::new();
    tracker.record(nuker(), ProtectionKind::MaxKicks, 100);
    tracker.record(nuker(), ProtectionKind::MaxKicks, 200);
    tracker.record(nuker(), ProtectionKind::MaxBans, 300);

    assert_eq!(
        tracker.count_within(nuker(), ProtectionKind::MaxKicks, 10_000, 300),
        2
    );
    assert_eq!(
        tracker.count_within(nuker(), ProtectionKind::MaxBans, 10_000, 300),
        1
    );
}

/// Tests that clones of a tracker observe the same records.
///
/// Expected: a record made through one clone is counted through another
#[test]
fn clones_share_records() {
    let tracker = ActionTracker::new();
    let shared = tracker.clone();

    shared.record(nuker(), ProtectionKind::MaxRoleDeletes, 10);

    assert_eq!(
        tracker.count_within(nuker(), ProtectionKind::MaxRoleDeletes, 10_000, 20),
        1
    );
}

/// Tests that the sweep drops expired timestamps and forgets empty actors.
///
/// Expected: the actor with only old timestamps is evicted, the other keeps its
/// recent timestamp only
#[test]
fn sweep_evicts_expired_actors() {
    let tracker = ActionTracker::new();
    let idle = UserId::new(7);
    let now = SWEEP_RETENTION_MS + 50_000;

    tracker.record(idle, ProtectionKind::MaxBans, 0);
    tracker.record(nuker(), ProtectionKind::MaxBans, 10);
    tracker.record(nuker(), ProtectionKind::MaxChannelDeletes, now - 1_000);

    let evicted = tracker.sweep(now);

    assert_eq!(evicted, 1);
    assert_eq!(tracker.tracked_actors(), 1);
    assert!(tracker.timestamps(nuker(), ProtectionKind::MaxBans).is_empty());
    assert_eq!(
        tracker.timestamps(nuker(), ProtectionKind::MaxChannelDeletes),
        vec![now - 1_000]
    );
}

/// Tests that sweeping twice without new records changes nothing the second time.
///
/// Expected: identical state after both runs and no evictions on the second
#[test]
fn sweep_is_idempotent() {
    let tracker = ActionTracker::new();
    let now = SWEEP_RETENTION_MS * 2;
    tracker.record(UserId::new(7), ProtectionKind::MaxBans, 0);
    tracker.record(nuker(), ProtectionKind::MaxKicks, now - SWEEP_RETENTION_MS);
    tracker.record(nuker(), ProtectionKind::MaxKicks, now - 5);

    tracker.sweep(now);
    let actors_after_first = tracker.tracked_actors();
    let kicks_after_first = tracker.timestamps(nuker(), ProtectionKind::MaxKicks);

    let evicted = tracker.sweep(now);

    assert_eq!(evicted, 0);
    assert_eq!(tracker.tracked_actors(), actors_after_first);
    assert_eq!(
        tracker.timestamps(nuker(), ProtectionKind::MaxKicks),
        kicks_after_first
    );
    assert_eq!(kicks_after_first, vec![now - 5]);
}
