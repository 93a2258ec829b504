//! Subset of Gardener's `ShootList` JSON that the agent understands.
//!
//! Unknown fields are ignored, so the output of
//! `kubectl get shoots -o json` decodes as is.

use std::collections::BTreeMap;

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;

use super::Shoot;
use super::ShootCondition;
use super::ShootList;
use crate::constants::CREATED_BY_ANNOTATION;

#[derive(Debug, Clone, Deserialize)]
pub struct GardenerShootList {
    #[serde(default)]
    pub items: Vec<GardenerShoot>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GardenerShoot {
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: ShootSpec,
    #[serde(default)]
    pub status: ShootStatus,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMeta {
    pub name: String,
    #[serde(default)]
    pub namespace: String,
    pub creation_timestamp: DateTime<Utc>,
    #[serde(default)]
    pub annotations: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShootSpec {
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub hibernation: Option<Hibernation>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Hibernation {
    #[serde(default)]
    pub enabled: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShootStatus {
    #[serde(default)]
    pub conditions: Vec<Condition>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Condition {
    #[serde(rename = "type")]
    pub kind: String,
    pub status: String,
}

/// Healthy only when there is at least one condition and all are "True".
pub fn classify(conditions: &[Condition]) -> ShootCondition {
    if conditions.iter().any(|c| c.status == "False") {
        return ShootCondition::Unhealthy;
    }
    if !conditions.is_empty() && conditions.iter().all(|c| c.status == "True") {
        return ShootCondition::Healthy;
    }
    ShootCondition::Unknown
}

impl From<GardenerShoot> for Shoot {
    fn from(shoot: GardenerShoot) -> Self {
        let GardenerShoot {
            mut metadata,
            spec,
            status,
        } = shoot;

        Shoot {
            created_by: metadata.annotations.remove(CREATED_BY_ANNOTATION).unwrap_or_default(),
            name: metadata.name,
            namespace: metadata.namespace,
            creation_timestamp: metadata.creation_timestamp,
            region: spec.region,
            hibernated: spec.hibernation.and_then(|h| h.enabled).unwrap_or(false),
            condition: classify(&status.conditions),
        }
    }
}

impl From<GardenerShootList> for ShootList {
    fn from(list: GardenerShootList) -> Self {
        ShootList::new(list.items.into_iter().map(Shoot::from).collect())
    }
}
