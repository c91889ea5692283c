mod common;

use common::{int, observed, record};
use nested_attrs::PathMap;
use nested_model::{ApplyError, AttrValue, Attrs, ChangeEvent, EntityRef, Model, SetOptions};
use serde_json::json;

#[test]
fn nested_update_fires_leaf_wildcard_and_change() {
    let (mut model, _bus, events) = observed(Model::builder());

    model
        .apply(json!({"net": {"vlan": 10, "tag": "x"}}), SetOptions::new())
        .unwrap();

    assert_eq!(model.read("net.vlan"), Some(&int(10)));
    assert!(model.changed_since(Some("net.vlan")));
    assert_eq!(
        events.names(),
        vec!["change:net.vlan", "change:net.*", "change:net.tag", "change"]
    );
    assert_eq!(events.value_of("change:net.tag"), Some(Some(AttrValue::from("x"))));
    assert_eq!(
        events.value_of("change:net.*"),
        Some(Some(AttrValue::from(json!({"vlan": 10, "tag": "x"}))))
    );
}

#[test]
fn wildcards_cover_every_ancestor() {
    let (mut model, _bus, events) =
        observed(Model::builder().attributes(record(json!({"x": {"y": {"z": 1}}}))));

    model.set("x.y.z", 2, SetOptions::new()).unwrap();

    assert_eq!(
        events.names(),
        vec!["change:x.y.z", "change:x.y.*", "change:x.*", "change"]
    );
    assert_eq!(events.value_of("change:x.y.*"), Some(Some(AttrValue::from(json!({"z": 2})))));
}

#[test]
fn equal_write_is_quiet_in_a_later_burst() {
    let (mut model, _bus, events) = observed(Model::builder());

    model.apply(json!({"a": 1}), SetOptions::new()).unwrap();
    assert_eq!(events.count("change:a"), 1);
    assert!(model.changed_since(Some("a")));

    events.reset();
    model.apply(json!({"a": 1}), SetOptions::new()).unwrap();
    assert!(events.names().is_empty());
    assert!(!model.changed_since(Some("a")));
    assert!(!model.changed_since(None));
}

#[test]
fn unchanged_leaves_are_not_announced() {
    let (mut model, _bus, events) =
        observed(Model::builder().attributes(record(json!({"net": {"vlan": 10, "mtu": 1500}}))));

    model
        .apply(json!({"net": {"vlan": 10, "mtu": 9000}}), SetOptions::new())
        .unwrap();

    assert_eq!(events.names(), vec!["change:net.mtu", "change:net.*", "change"]);
    assert_eq!(model.changed().len(), 1);
}

#[test]
fn silent_update_mutates_without_events() {
    let (mut model, _bus, events) = observed(Model::builder());

    model
        .apply(json!({"a": {"b": 1}}), SetOptions::new().with_silent())
        .unwrap();

    assert!(events.names().is_empty());
    assert_eq!(model.read("a.b"), Some(&int(1)));
    assert!(model.changed_since(Some("a.b")));
}

#[test]
fn unset_announces_removed_value() {
    let (mut model, _bus, events) =
        observed(Model::builder().attributes(record(json!({"a": {"b": 1, "c": 2}}))));

    model.unset("a.b", SetOptions::new()).unwrap();

    assert_eq!(events.names(), vec!["change:a.b", "change:a.*", "change"]);
    assert_eq!(events.value_of("change:a.b"), Some(None));
    assert_eq!(model.read("a.b"), None);
    assert_eq!(model.changed().get("a.b"), Some(&None));
}

#[test]
fn unset_of_missing_path_is_quiet() {
    let (mut model, _bus, events) = observed(Model::builder());

    model.unset("nope.deep", SetOptions::new()).unwrap();

    assert!(events.names().is_empty());
    assert!(model.attributes().is_empty());
}

#[test]
fn flat_input_sets_record_leaf() {
    let (mut model, _bus, events) = observed(Model::builder());

    model
        .apply(Attrs::single("net", json!({"vlan": 3})), SetOptions::new())
        .unwrap();

    assert_eq!(events.names(), vec!["change:net", "change"]);
    assert_eq!(model.read("net.vlan"), Some(&int(3)));
}

#[test]
fn array_values_compare_structurally() {
    let (mut model, _bus, events) =
        observed(Model::builder().attributes(record(json!({"ports": [1, 2]}))));

    model.apply(json!({"ports": [1, 2]}), SetOptions::new()).unwrap();
    assert!(events.names().is_empty());

    model.apply(json!({"ports": [1, 2, 3]}), SetOptions::new()).unwrap();
    assert_eq!(events.names(), vec!["change:ports", "change"]);
}

#[test]
fn entity_reference_is_an_atomic_leaf() {
    let (mut model, _bus, events) = observed(Model::builder());
    let owner = EntityRef::new("c42");

    model
        .set("meta.owner", owner.clone(), SetOptions::new())
        .unwrap();
    assert_eq!(events.names(), vec!["change:meta.owner", "change:meta.*", "change"]);
    let stored = model.read("meta.owner").and_then(AttrValue::as_entity).unwrap();
    assert!(stored.same_handle(&owner));

    events.reset();
    model
        .set("meta.owner", EntityRef::new("c42"), SetOptions::new())
        .unwrap();
    assert!(events.names().is_empty());
}

#[test]
fn event_options_are_forwarded() {
    let (mut model, _bus, events) = observed(Model::builder());

    model.set("a", 1, SetOptions::new().with_validate()).unwrap();

    for event in events.events() {
        assert!(event.options().validate, "{}", event.name());
    }
    assert!(matches!(events.events().last(), Some(ChangeEvent::Change { .. })));
}

#[test]
fn equal_valued_float_write_is_quiet() {
    let (mut model, _bus, events) =
        observed(Model::builder().attributes(record(json!({"net": {"mtu": 1500}}))));

    model
        .apply(json!({"net": {"mtu": 1500.0}}), SetOptions::new())
        .unwrap();
    assert!(events.names().is_empty());
    assert!(!model.changed_since(None));

    model
        .apply(json!({"net": {"mtu": 1500.5}}), SetOptions::new())
        .unwrap();
    assert_eq!(events.names(), vec!["change:net.mtu", "change:net.*", "change"]);
}

#[test]
fn null_placeholder_in_defaults_becomes_a_record() {
    let (mut model, _bus, events) =
        observed(Model::builder().defaults(record(json!({"net": null}))));

    model
        .apply(json!({"net": {"vlan": 10}}), SetOptions::new())
        .unwrap();

    assert_eq!(model.read("net.vlan"), Some(&int(10)));
    assert_eq!(events.names(), vec!["change:net.vlan", "change:net.*", "change"]);
}

#[test]
fn scalar_intermediate_still_rejects_the_update() {
    let (mut model, _bus, events) =
        observed(Model::builder().attributes(record(json!({"net": "down"}))));

    let err = model
        .apply(json!({"net": {"vlan": 10}}), SetOptions::new())
        .unwrap_err();

    assert!(matches!(err, ApplyError::Path(_)));
    assert_eq!(model.read("net"), Some(&AttrValue::from("down")));
    assert!(events.names().is_empty());
}

#[test]
fn overlapping_flat_paths_follow_the_resulting_tree() {
    let (mut model, _bus, events) = observed(Model::builder());
    let mut paths = PathMap::new();
    paths.insert("a.b".to_string(), int(1));
    paths.insert("a".to_string(), AttrValue::from(json!({"c": 2})));

    model.apply(Attrs::Flat(paths), SetOptions::new()).unwrap();

    assert_eq!(model.read("a.b"), None);
    assert_eq!(events.names(), vec!["change:a", "change"]);
    let changed: Vec<&str> = model.changed().keys().map(String::as_str).collect();
    assert_eq!(changed, vec!["a"]);
}
