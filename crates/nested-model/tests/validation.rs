mod common;

use std::rc::Rc;

use common::{int, observed, record};
use nested_model::{
    ApplyError, AttrValue, ChangeEvent, Model, Record, SetOptions, ValidationError, Validator,
};
use nested_attrs::get;
use serde_json::json;

fn vlan_in_range(attrs: &Record, _: &SetOptions) -> Result<(), ValidationError> {
    match get(attrs, "net.vlan").and_then(AttrValue::as_i64) {
        Some(vlan) if !(1..=4094).contains(&vlan) => {
            Err(ValidationError::at("net.vlan", "must be within 1..=4094"))
        }
        _ => Ok(()),
    }
}

#[test]
fn rejecting_validator_short_circuits() {
    let (mut model, _bus, events) = observed(
        Model::builder()
            .attributes(record(json!({"a": 0})))
            .validator(|_, _| Err(ValidationError::new("never"))),
    );

    let result = model.apply(json!({"a": 1}), SetOptions::new().with_validate());

    assert_eq!(result, Err(ApplyError::Invalid(ValidationError::new("never"))));
    assert_eq!(model.read("a"), Some(&int(0)));
    assert_eq!(events.names(), vec!["invalid"]);
    assert!(model.previous_attributes().is_none());
    assert!(!model.changed_since(None));
}

#[test]
fn invalid_event_carries_error_and_options() {
    let (mut model, _bus, events) = observed(Model::builder().validator(vlan_in_range));

    let options = SetOptions::new().with_validate().with_silent();
    let _ = model.apply(json!({"net": {"vlan": 5000}}), options);

    match events.events().as_slice() {
        [ChangeEvent::Invalid { error, options: seen }] => {
            assert_eq!(error.path.as_deref(), Some("net.vlan"));
            assert_eq!(*seen, options);
        }
        other => panic!("unexpected events: {other:?}"),
    }
    assert_eq!(
        model.validation_error().map(ToString::to_string),
        Some("net.vlan: must be within 1..=4094".to_string())
    );
}

#[test]
fn validator_sees_prospective_tree() {
    let (mut model, _bus, _events) = observed(
        Model::builder()
            .attributes(record(json!({"net": {"vlan": 10, "mtu": 1500}})))
            .validator(|attrs, _| {
                assert_eq!(get(attrs, "net.mtu"), Some(&AttrValue::from(1500)));
                assert_eq!(get(attrs, "net.vlan"), Some(&AttrValue::from(20)));
                Ok(())
            }),
    );

    model
        .set("net.vlan", 20, SetOptions::new().with_validate())
        .unwrap();
    assert_eq!(model.read("net.vlan"), Some(&int(20)));
}

#[test]
fn validation_only_runs_when_requested() {
    let (mut model, _bus, events) = observed(Model::builder().validator(vlan_in_range));

    model.set("net.vlan", 9999, SetOptions::new()).unwrap();

    assert_eq!(model.read("net.vlan"), Some(&int(9999)));
    assert!(!events.names().contains(&"invalid".to_string()));
    assert!(model.validation_error().is_none());
}

#[test]
fn success_clears_cached_error() {
    let (mut model, _bus, _events) = observed(Model::builder().validator(vlan_in_range));

    assert!(model
        .set("net.vlan", 0, SetOptions::new().with_validate())
        .is_err());
    assert!(model.validation_error().is_some());

    model
        .set("net.vlan", 100, SetOptions::new().with_validate())
        .unwrap();
    assert!(model.validation_error().is_none());
}

#[test]
fn is_valid_checks_current_state() {
    let (mut model, _bus, events) = observed(
        Model::builder()
            .attributes(record(json!({"net": {"vlan": 0}})))
            .validator(vlan_in_range),
    );

    assert!(!model.is_valid());
    assert_eq!(events.names(), vec!["invalid"]);

    model.set("net.vlan", 7, SetOptions::new()).unwrap();
    assert!(model.is_valid());
}

#[test]
fn without_validator_gate_passes() {
    let mut model = Model::new();
    model
        .set("anything", "goes", SetOptions::new().with_validate())
        .unwrap();
    assert!(model.is_valid());
}

struct RequiredName;

impl Validator for RequiredName {
    fn validate(&self, attrs: &Record, _: &SetOptions) -> Result<(), ValidationError> {
        if attrs.contains_key("name") {
            Ok(())
        } else {
            Err(ValidationError::at("name", "is required"))
        }
    }
}

#[test]
fn validator_object() {
    let (mut model, _bus, _events) =
        observed(Model::builder().validator_object(Rc::new(RequiredName)));

    let err = model
        .set("other", 1, SetOptions::new().with_validate())
        .unwrap_err();
    assert_eq!(err.to_string(), "validation failed: name: is required");

    model
        .apply(json!({"name": "edge"}), SetOptions::new().with_validate())
        .unwrap();
}
