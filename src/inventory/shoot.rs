use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Coarse health of a shoot derived from its reported conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShootCondition {
    Healthy,
    Unhealthy,
    #[default]
    Unknown,
}

impl ShootCondition {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShootCondition::Healthy => "healthy",
            ShootCondition::Unhealthy => "unhealthy",
            ShootCondition::Unknown => "unknown",
        }
    }
}

/// One managed cluster descriptor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shoot {
    pub name: String,
    pub namespace: String,
    /// Identity that created the shoot, empty when not annotated
    pub created_by: String,
    pub creation_timestamp: DateTime<Utc>,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub hibernated: bool,
    #[serde(default)]
    pub condition: ShootCondition,
}

impl Shoot {
    /// Status label used by the table output; hibernation wins over health
    pub fn status(&self) -> &'static str {
        if self.hibernated {
            "hibernated"
        } else {
            self.condition.as_str()
        }
    }
}

/// Snapshot of all shoots observed for one source
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ShootList {
    pub items: Vec<Shoot>,
}

impl ShootList {
    pub fn new(items: Vec<Shoot>) -> Self {
        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Running shoots reporting only healthy conditions
    pub fn healthy(&self) -> usize {
        self.items
            .iter()
            .filter(|s| !s.hibernated && s.condition == ShootCondition::Healthy)
            .count()
    }

    pub fn hibernated(&self) -> usize {
        self.items.iter().filter(|s| s.hibernated).count()
    }

    /// Running shoots that are unhealthy or whose health is not known
    pub fn unknown(&self) -> usize {
        self.items
            .iter()
            .filter(|s| !s.hibernated && s.condition != ShootCondition::Healthy)
            .count()
    }
}
