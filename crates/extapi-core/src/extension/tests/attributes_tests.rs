use serde_json::json;

use crate::extension::attributes::AttributeMap;

fn map(value: serde_json::Value) -> AttributeMap {
    AttributeMap::from_json(value).unwrap()
}

#[test]
fn test_merge_overwrites_whole_attributes() {
    let mut base = map(json!({
        "vnfs": {
            "name": {"allow_post": true, "is_visible": true},
            "status": {"allow_post": false}
        }
    }));
    base.merge(map(json!({
        "vnfs": {"name": {"allow_post": false}, "monitoring_policy": {"default": null}},
        "events": {"id": {"is_visible": true}}
    })));

    // The incoming properties replace the old ones entirely
    let name = base.attribute("vnfs", "name").unwrap();
    assert_eq!(name.get("allow_post"), Some(&json!(false)));
    assert!(name.get("is_visible").is_none());

    assert!(base.attribute("vnfs", "status").is_some());
    assert!(base.attribute("vnfs", "monitoring_policy").is_some());
    assert!(base.contains_resource("events"));
    assert_eq!(base.resource_names().collect::<Vec<_>>(), ["events", "vnfs"]);
}

#[test]
fn test_merge_replaces_empty_resource() {
    let mut base = map(json!({"vims": {}}));
    base.merge(map(json!({"vims": {"auth_url": {}}})));
    assert!(base.attribute("vims", "auth_url").is_some());
}

#[test]
fn test_absorb_extended_touches_only_owned_resources() {
    let mut own = map(json!({"vnfs": {"name": {}}}));
    let extended = map(json!({
        "vnfs": {"name": {"allow_put": true}, "heal_policy": {}},
        "vims": {"auth_url": {}}
    }));

    own.absorb_extended(&extended);

    assert_eq!(own.attribute("vnfs", "name").unwrap()["allow_put"], true);
    assert!(own.attribute("vnfs", "heal_policy").is_some());
    assert!(!own.contains_resource("vims"));
}

#[test]
fn test_serializes_as_plain_nested_object() {
    let mut attrs = AttributeMap::new();
    let mut props = serde_json::Map::new();
    props.insert("allow_post".to_string(), json!(true));
    attrs.set_attribute("vnfds", "name", props);

    assert_eq!(attrs.to_json(), json!({"vnfds": {"name": {"allow_post": true}}}));
    assert_eq!(attrs.len(), 1);
}
