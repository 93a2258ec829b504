use super::*;
use crate::test_utils::shoot;
use crate::test_utils::shoot_list;

const GARDENER_JSON: &str = r#"
{
  "apiVersion": "v1",
  "kind": "List",
  "items": [
    {
      "metadata": {
        "name": "alpha",
        "namespace": "garden-dev",
        "creationTimestamp": "2024-03-01T10:00:00Z",
        "annotations": { "gardener.cloud/created-by": "alice@example.com" }
      },
      "spec": { "region": "eu-west-1", "hibernation": { "enabled": true } },
      "status": { "conditions": [ { "type": "APIServerAvailable", "status": "True" } ] }
    },
    {
      "metadata": {
        "name": "beta",
        "namespace": "garden-dev",
        "creationTimestamp": "2024-03-02T10:00:00Z"
      },
      "spec": { "region": "us-east-1" },
      "status": {
        "conditions": [
          { "type": "APIServerAvailable", "status": "True" },
          { "type": "EveryNodeReady", "status": "False" }
        ]
      }
    },
    {
      "metadata": {
        "name": "gamma",
        "creationTimestamp": "2024-03-03T10:00:00Z",
        "annotations": { "gardener.cloud/created-by": "bob@example.com" }
      }
    }
  ]
}
"#;

#[test]
fn gardener_list_converts_to_shoots() {
    let raw: GardenerShootList = serde_json::from_str(GARDENER_JSON).unwrap();
    let list = ShootList::from(raw);

    assert_eq!(list.len(), 3);

    let alpha = &list.items[0];
    assert_eq!(alpha.name, "alpha");
    assert_eq!(alpha.namespace, "garden-dev");
    assert_eq!(alpha.created_by, "alice@example.com");
    assert_eq!(alpha.region, "eu-west-1");
    assert!(alpha.hibernated);
    assert_eq!(alpha.condition, ShootCondition::Healthy);

    let beta = &list.items[1];
    assert_eq!(beta.created_by, "");
    assert!(!beta.hibernated);
    assert_eq!(beta.condition, ShootCondition::Unhealthy);

    let gamma = &list.items[2];
    assert_eq!(gamma.namespace, "");
    assert_eq!(gamma.condition, ShootCondition::Unknown);
}

#[test]
fn classify_requires_all_conditions_true() {
    let condition = |status: &str| Condition {
        kind: "APIServerAvailable".to_string(),
        status: status.to_string(),
    };

    assert_eq!(classify(&[]), ShootCondition::Unknown);
    assert_eq!(classify(&[condition("True")]), ShootCondition::Healthy);
    assert_eq!(
        classify(&[condition("True"), condition("Unknown")]),
        ShootCondition::Unknown
    );
    assert_eq!(
        classify(&[condition("Unknown"), condition("False")]),
        ShootCondition::Unhealthy
    );
}

#[test]
fn counters_split_by_state() {
    let mut hibernated = shoot("h", "a");
    hibernated.hibernated = true;
    let mut healthy = shoot("ok", "a");
    healthy.condition = ShootCondition::Healthy;
    let mut broken = shoot("broken", "b");
    broken.condition = ShootCondition::Unhealthy;
    let unknown = shoot("unknown", "b");

    let list = ShootList::new(vec![hibernated, healthy, broken, unknown]);

    assert_eq!(list.healthy(), 1);
    assert_eq!(list.hibernated(), 1);
    assert_eq!(list.unknown(), 2);
    assert_eq!(list.len(), 4);
}

#[test]
fn created_by_filter_keeps_matching_entries_in_order() {
    let list = shoot_list(&[("s1", "a"), ("s2", "b"), ("s3", "a"), ("s4", "c"), ("s5", "a")]);

    let filtered = ShootFilter::created_by("a").apply(&list);

    let names: Vec<&str> = filtered.items.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["s1", "s3", "s5"]);
}

#[test]
fn empty_filter_keeps_everything() {
    let list = shoot_list(&[("s1", "a"), ("s2", "b")]);

    let filtered = ShootFilter::default().apply(&list);

    assert_eq!(filtered, list);
}

#[test]
fn filter_without_matches_yields_empty_list() {
    let list = shoot_list(&[("s1", "a"), ("s2", "b")]);

    let filtered = ShootFilter::created_by("c").apply(&list);

    assert!(filtered.is_empty());
}

#[test]
fn status_prefers_hibernation() {
    let mut s = shoot("s", "a");
    s.condition = ShootCondition::Healthy;
    assert_eq!(s.status(), "healthy");

    s.hibernated = true;
    assert_eq!(s.status(), "hibernated");
}
