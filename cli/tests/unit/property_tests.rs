//! Property-based tests for instance classification and config validation.
//!
//! Uses `proptest` to verify invariants across many random inputs.

#![allow(clippy::expect_used)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;

use cf_recycle::domain::config::VALID_CONFIG_KEYS;
use cf_recycle::domain::rollout::decide;
use cf_recycle::domain::{
    Instance, InstanceDecision, InstanceObservation, InstanceState, SkipReason,
    validate_config_key, validate_config_value,
};

fn any_state() -> impl Strategy<Value = InstanceState> {
    prop_oneof![
        Just(InstanceState::Running),
        Just(InstanceState::Starting),
        Just(InstanceState::Stopping),
        Just(InstanceState::Crashed),
        Just(InstanceState::Down),
        Just(InstanceState::Flapping),
        Just(InstanceState::Unknown),
    ]
}

fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0)
        .single()
        .expect("valid date")
}

// ============================================================================
// decide() / observe() property tests
// ============================================================================

proptest! {
    /// Only RUNNING instances are ever restarted.
    #[test]
    fn prop_only_running_instances_restart(
        state in any_state(),
        offset in -100_000i64..100_000,
    ) {
        let instance = Instance {
            index: 0,
            state,
            since: Some(start_time() + Duration::seconds(offset)),
        };
        let decision = decide(&instance, start_time());
        if state == InstanceState::Running {
            prop_assert_ne!(decision, InstanceDecision::Skip(SkipReason::NotRunning));
        } else {
            prop_assert_eq!(decision, InstanceDecision::Skip(SkipReason::NotRunning));
        }
    }

    /// A RUNNING instance is restarted exactly when it predates the rollout.
    #[test]
    fn prop_running_restarts_iff_stale(offset in -100_000i64..100_000) {
        let instance = Instance {
            index: 3,
            state: InstanceState::Running,
            since: Some(start_time() + Duration::seconds(offset)),
        };
        let expected = if offset < 0 {
            InstanceDecision::Restart
        } else {
            InstanceDecision::Skip(SkipReason::AlreadyFresh)
        };
        prop_assert_eq!(decide(&instance, start_time()), expected);
    }

    /// The wait ends on exactly the instances `decide` would skip as fresh.
    #[test]
    fn prop_terminal_iff_fresh(
        state in any_state(),
        offset in proptest::option::of(-100_000i64..100_000),
    ) {
        let instance = Instance {
            index: 0,
            state,
            since: offset.map(|o| start_time() + Duration::seconds(o)),
        };
        let observed = InstanceObservation::observe(Some(&instance), start_time());
        prop_assert_eq!(observed.is_terminal(), instance.is_fresh(start_time()));
    }
}

#[test]
fn test_missing_instance_is_not_terminal() {
    let observed = InstanceObservation::observe(None, start_time());
    assert_eq!(observed, InstanceObservation::Unknown);
    assert!(!observed.is_terminal());
}

// ============================================================================
// validate_config_key() and validate_config_value() property tests
// ============================================================================

proptest! {
    /// Arbitrary keys (not in whitelist) are rejected.
    #[test]
    fn prop_arbitrary_keys_rejected(key in "[a-z]{1,20}\\.[a-z_]{1,20}") {
        if !VALID_CONFIG_KEYS.contains(&key.as_str()) {
            prop_assert!(validate_config_key(&key).is_err(), "accepted invalid key: {key}");
        }
    }

    /// Any positive integer is a valid poll interval.
    #[test]
    fn prop_positive_interval_accepted(secs in 1u64..1_000_000) {
        prop_assert!(validate_config_value("poll.interval", &secs.to_string()).is_ok());
    }

    /// Non-numeric values are rejected for every numeric key.
    #[test]
    fn prop_non_numeric_rejected(value in "[a-z]{1,10}") {
        for key in ["poll.interval", "poll.timeout", "cf.command_timeout"] {
            prop_assert!(validate_config_value(key, &value).is_err(), "{key}={value}");
        }
    }
}
