//! End-to-end seed scenarios and the round-trip/idempotence properties
//! checked after every mutation.

use oid_registry::error::RegisterError;
use oid_registry::index::{AllocateFlags, IndexValue};
use oid_registry::registry::{SubtreeRegistry, VarRow};
use oid_registry::session::{Session, SessionId};
use oid_registry::{Registry, RegistryConfig};

fn oid(s: &str) -> oid_registry::oid::Oid {
    s.parse().unwrap()
}

// Run with RUST_LOG=trace to see every split/merge/unload the scenarios
// below trigger.
#[test]
fn init() {
    env_logger::init();
}

// S1
#[test]
fn s1_bootstrap_leaves_no_live_mib() {
    let registry: Registry<()> = Registry::new(RegistryConfig::default());

    let root = registry.find_subtree(&oid("1.3.6.1")).unwrap();
    assert_eq!(root.start.to_string(), "1");
    assert!(root.is_cover_only());

    assert!(registry.find_subtree_next(&oid("1.3.6.1")).is_none());
    assert!(registry.get_session_for_oid(&oid("1.3")).is_none());
}

// S2
#[test]
fn s2_overlapping_registration_splits_and_layers() {
    let mut registry: Registry<&str> = Registry::new(RegistryConfig::default());

    registry
        .register_mib_priority(
            "A",
            vec![
                VarRow { suffix: vec![1], handler: "a1" },
                VarRow { suffix: vec![2], handler: "a2" },
            ],
            oid("1.3.6.1.2.1.1"),
            10,
        )
        .unwrap();
    registry
        .register_mib_priority("B", vec![], oid("1.3.6.1.2.1.1.3"), 10)
        .unwrap();

    let slot = registry.find_subtree(&oid("1.3.6.1.2.1.1.3.0")).unwrap();
    assert_eq!(slot.label, "B");
    assert_eq!(slot.start.to_string(), "1.3.6.1.2.1.1.3");
    assert_eq!(slot.end.to_string(), "1.3.6.1.2.1.1.4");

    let covered_by_a = registry.find_subtree(&oid("1.3.6.1.2.1.1.1")).unwrap();
    assert_eq!(covered_by_a.label, "A");
    assert_eq!(covered_by_a.start.to_string(), "1.3.6.1.2.1.1");
    assert_eq!(covered_by_a.end.to_string(), "1.3.6.1.2.1.1.3");
}

// S3
#[test]
fn s3_duplicate_registration_leaves_first_intact() {
    let mut registry: Registry<()> = Registry::new(RegistryConfig::default());

    registry
        .register_mib_priority("X", vec![], oid("1.3.6.1.99"), 5)
        .unwrap();
    let err = registry
        .register_mib_priority("X", vec![], oid("1.3.6.1.99"), 5)
        .unwrap_err();
    assert!(matches!(err, RegisterError::DuplicateRegistration { .. }));

    let still_there = registry.find_subtree(&oid("1.3.6.1.99.0")).unwrap();
    assert_eq!(still_there.label, "X");
}

// S4
#[test]
fn s4_octet_string_allocation_and_release() {
    let mut registry: Registry<()> = Registry::new(RegistryConfig::default());
    let session = Session::Main(SessionId(1));
    let target = oid("1.2.3.4.20");

    registry
        .register_string_index(&target, b"aaaa".to_vec(), session)
        .unwrap();

    let mut got = Vec::new();
    for _ in 0..3 {
        let v = registry
            .register_index(
                &target,
                IndexValue::OctetString(vec![]),
                AllocateFlags::AnyIndex,
                session,
            )
            .unwrap();
        got.push(v);
    }
    assert_eq!(
        got,
        vec![
            IndexValue::OctetString(b"aaab".to_vec()),
            IndexValue::OctetString(b"aaac".to_vec()),
            IndexValue::OctetString(b"aaad".to_vec()),
        ]
    );

    registry
        .release_index(&target, &IndexValue::OctetString(b"aaac".to_vec()), session)
        .unwrap();

    let new_index = registry
        .register_index(
            &target,
            IndexValue::OctetString(vec![]),
            AllocateFlags::NewIndex,
            session,
        )
        .unwrap();
    assert_eq!(new_index, IndexValue::OctetString(b"aaae".to_vec()));

    // ALLOCATE_ANY_INDEX also skips the released value in this allocator.
    let any_index = registry
        .register_index(
            &target,
            IndexValue::OctetString(vec![]),
            AllocateFlags::AnyIndex,
            session,
        )
        .unwrap();
    assert_eq!(any_index, IndexValue::OctetString(b"aaaf".to_vec()));
}

// S5
#[test]
fn s5_integer_index_duplicate_and_any() {
    let mut registry: Registry<()> = Registry::new(RegistryConfig::default());
    let session = Session::Main(SessionId(1));
    let target = oid("1.3.6.1.4.1.2021.2");

    registry.register_int_index(&target, Some(5), session).unwrap();
    let err = registry
        .register_int_index(&target, Some(5), session)
        .unwrap_err();
    assert!(matches!(err, oid_registry::error::IndexError::Duplicate { .. }));

    let any = registry.register_int_index(&target, None, session).unwrap();
    assert_eq!(any, IndexValue::Integer(6));
}

#[test]
fn s5_integer_index_any_with_no_prior_entry_is_one() {
    let mut registry: Registry<()> = Registry::new(RegistryConfig::default());
    let session = Session::Main(SessionId(1));
    let target = oid("1.3.6.1.4.1.2021.3");

    let any = registry.register_int_index(&target, None, session).unwrap();
    assert_eq!(any, IndexValue::Integer(1));
}

// S6
#[test]
fn s6_object_id_index_rollover() {
    let mut registry: Registry<()> = Registry::new(RegistryConfig::default());
    let session = Session::Main(SessionId(1));
    let target = oid("1.3.6.1.4.1");

    let first = registry.register_oid_index(&target, None, session).unwrap();
    assert_eq!(first, IndexValue::ObjectId(vec![1, 3, 6, 1, 4, 1, 1]));

    registry.remove_index(&target, &first, session).unwrap();
    registry
        .register_oid_index(&target, Some(vec![1, 3, 6, 1, 4, 1, 254]), session)
        .unwrap();
    let incremented = registry.register_oid_index(&target, None, session).unwrap();
    assert_eq!(incremented, IndexValue::ObjectId(vec![1, 3, 6, 1, 4, 1, 255]));

    registry.remove_index(&target, &incremented, session).unwrap();

    // Drive a carry all the way to the leftmost position while it holds 2:
    // the rule is "leftmost resets to 1 and length grows by a trailing 0",
    // not a plain wrap to 3.
    registry
        .register_oid_index(&target, Some(vec![2, 255, 255, 255]), session)
        .unwrap();
    let wrapped = registry.register_oid_index(&target, None, session).unwrap();
    assert_eq!(wrapped, IndexValue::ObjectId(vec![1, 1, 1, 1, 0]));
}

// P1-P3: spine invariants, checked via the lower-level SubtreeRegistry so the
// bootstrap state can be inspected directly.
#[test]
fn p1_p3_spine_starts_at_zero_and_new_registration_is_findable_both_sides() {
    let mut reg: SubtreeRegistry<()> = SubtreeRegistry::new();
    for root in ["0", "1", "2"] {
        reg.register_range("", vec![], oid(root), 127, None, None)
            .unwrap();
    }
    reg.register_range("M", vec![], oid("1.3.6.1.4.1.1"), 1, None, None)
        .unwrap();

    let first = reg.find_subtree(&oid("0")).unwrap();
    assert_eq!(first.start.to_string(), "0");

    // The split introduced by registering "M" leaves the surrounding
    // territory covered and ordered: the node just before it is still the
    // {1} cover-only root's left remainder, and "M" itself is found by its
    // own range.
    let m = reg.find_subtree(&oid("1.3.6.1.4.1.1.0")).unwrap();
    assert_eq!(m.label, "M");
    assert!(*m.start <= oid("1.3.6.1.4.1.1"));
    assert!(*m.end > oid("1.3.6.1.4.1.1"));

    let before_m = reg.find_subtree_previous(&oid("1.3.6.1.4.1.1")).unwrap();
    assert!(before_m.start.to_string() <= "1.3.6.1.4.1.1".to_string());
}

// P4
#[test]
fn p4_cover_only_nodes_never_surface_from_find_next() {
    let mut reg: SubtreeRegistry<()> = SubtreeRegistry::new();
    for root in ["0", "1", "2"] {
        reg.register_range("", vec![], oid(root), 127, None, None)
            .unwrap();
    }
    assert!(reg.find_subtree_next(&oid("0")).is_none());
}

// round-trip idempotence
#[test]
fn register_unregister_round_trip_is_a_no_op() {
    let mut registry: Registry<()> = Registry::new(RegistryConfig::default());
    let before = registry.dump_registry();

    registry
        .register_mib_priority("TMP", vec![], oid("1.3.6.1.4.1.9999"), 1)
        .unwrap();
    registry
        .unregister_mib_priority(&oid("1.3.6.1.4.1.9999"), 1)
        .unwrap();

    assert_eq!(before, registry.dump_registry());
}

// P5 + repeated-allocate monotonicity
#[test]
fn repeated_any_index_allocation_is_strictly_increasing() {
    let mut registry: Registry<()> = Registry::new(RegistryConfig::default());
    let session = Session::Main(SessionId(1));
    let target = oid("1.3.6.1.4.1.2021.4");

    let mut values = Vec::new();
    for _ in 0..5 {
        values.push(
            registry
                .register_int_index(&target, None, session)
                .unwrap(),
        );
    }
    for pair in values.windows(2) {
        assert!(pair[1] > pair[0]);
    }
}
