//! Wire messages of the `cloud_agent.Agent` service.
//!
//! The messages are declared with `prost` derives; the service stubs are
//! generated by `build.rs`.

use chrono::DateTime;

use crate::QueryError;
use crate::Shoot;
use crate::ShootCondition;
use crate::ShootList;

include!(concat!(env!("OUT_DIR"), "/cloud_agent.Agent.rs"));

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ShootsRequest {
    /// Source to read
    #[prost(string, tag = "1")]
    pub source: String,
    /// Only shoots created by this identity
    #[prost(string, optional, tag = "2")]
    pub created_by: Option<String>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ShootsResponse {
    #[prost(enumeration = "CacheStatus", tag = "1")]
    pub status: i32,
    #[prost(message, repeated, tag = "2")]
    pub shoots: Vec<ShootEntry>,
    /// Human readable reason when `status` is not `POPULATED`
    #[prost(string, tag = "3")]
    pub message: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ShootEntry {
    #[prost(string, tag = "1")]
    pub name: String,
    #[prost(string, tag = "2")]
    pub namespace: String,
    #[prost(string, tag = "3")]
    pub created_by: String,
    #[prost(string, tag = "4")]
    pub region: String,
    /// Unix seconds
    #[prost(int64, tag = "5")]
    pub creation_timestamp: i64,
    #[prost(bool, tag = "6")]
    pub hibernated: bool,
    #[prost(enumeration = "Health", tag = "7")]
    pub condition: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum CacheStatus {
    Populated = 0,
    NotYetPopulated = 1,
    UnknownSource = 2,
}

impl CacheStatus {
    pub fn as_str_name(&self) -> &'static str {
        match self {
            CacheStatus::Populated => "POPULATED",
            CacheStatus::NotYetPopulated => "NOT_YET_POPULATED",
            CacheStatus::UnknownSource => "UNKNOWN_SOURCE",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum Health {
    Unknown = 0,
    Healthy = 1,
    Unhealthy = 2,
}

impl From<ShootCondition> for Health {
    fn from(condition: ShootCondition) -> Self {
        match condition {
            ShootCondition::Healthy => Health::Healthy,
            ShootCondition::Unhealthy => Health::Unhealthy,
            ShootCondition::Unknown => Health::Unknown,
        }
    }
}

impl From<Health> for ShootCondition {
    fn from(health: Health) -> Self {
        match health {
            Health::Healthy => ShootCondition::Healthy,
            Health::Unhealthy => ShootCondition::Unhealthy,
            Health::Unknown => ShootCondition::Unknown,
        }
    }
}

impl From<&Shoot> for ShootEntry {
    fn from(shoot: &Shoot) -> Self {
        ShootEntry {
            name: shoot.name.clone(),
            namespace: shoot.namespace.clone(),
            created_by: shoot.created_by.clone(),
            region: shoot.region.clone(),
            creation_timestamp: shoot.creation_timestamp.timestamp(),
            hibernated: shoot.hibernated,
            condition: Health::from(shoot.condition) as i32,
        }
    }
}

impl From<ShootEntry> for Shoot {
    fn from(entry: ShootEntry) -> Self {
        let condition = ShootCondition::from(entry.condition());
        Shoot {
            name: entry.name,
            namespace: entry.namespace,
            created_by: entry.created_by,
            creation_timestamp: DateTime::from_timestamp(entry.creation_timestamp, 0).unwrap_or_default(),
            region: entry.region,
            hibernated: entry.hibernated,
            condition,
        }
    }
}

impl ShootsResponse {
    pub fn populated(list: &ShootList) -> Self {
        ShootsResponse {
            status: CacheStatus::Populated as i32,
            shoots: list.items.iter().map(ShootEntry::from).collect(),
            message: String::new(),
        }
    }

    /// Converts back into the query outcome seen by the server
    pub fn into_result(
        self,
        source: &str,
    ) -> std::result::Result<ShootList, QueryError> {
        match self.status() {
            CacheStatus::Populated => Ok(ShootList::new(self.shoots.into_iter().map(Shoot::from).collect())),
            CacheStatus::NotYetPopulated => Err(QueryError::NotYetPopulated(source.to_string())),
            CacheStatus::UnknownSource => Err(QueryError::UnknownSource(source.to_string())),
        }
    }
}

impl From<QueryError> for ShootsResponse {
    fn from(e: QueryError) -> Self {
        let status = match e {
            QueryError::UnknownSource(_) => CacheStatus::UnknownSource,
            QueryError::NotYetPopulated(_) => CacheStatus::NotYetPopulated,
        };
        ShootsResponse {
            status: status as i32,
            shoots: Vec::new(),
            message: e.to_string(),
        }
    }
}
