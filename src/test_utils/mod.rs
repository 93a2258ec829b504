//! Test components shared between the unit tests of the crate
mod upstream;

pub use upstream::*;

use std::future::Future;
use std::path::Path;
use std::time::Duration;

use chrono::TimeZone;
use chrono::Utc;

use crate::Shoot;
use crate::ShootCondition;
use crate::ShootList;

static LOGGER_INIT: once_cell::sync::Lazy<()> = once_cell::sync::Lazy::new(|| {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
});

pub fn enable_logger() {
    once_cell::sync::Lazy::force(&LOGGER_INIT);
}

pub fn shoot(
    name: &str,
    created_by: &str,
) -> Shoot {
    Shoot {
        name: name.to_string(),
        namespace: "garden-test".to_string(),
        created_by: created_by.to_string(),
        creation_timestamp: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        region: "eu-west-1".to_string(),
        hibernated: false,
        condition: ShootCondition::Unknown,
    }
}

/// Builds a list from `(name, created_by)` pairs
pub fn shoot_list(entries: &[(&str, &str)]) -> ShootList {
    ShootList::new(entries.iter().map(|(name, owner)| shoot(name, owner)).collect())
}

/// Writes a Gardener `ShootList` JSON document with one healthy shoot per
/// `(name, created_by)` pair
pub fn write_gardener_inventory(
    path: &Path,
    entries: &[(&str, &str)],
) {
    let items: Vec<serde_json::Value> = entries
        .iter()
        .map(|(name, owner)| {
            serde_json::json!({
                "metadata": {
                    "name": name,
                    "namespace": "garden-test",
                    "creationTimestamp": "2024-01-01T00:00:00Z",
                    "annotations": { "gardener.cloud/created-by": owner }
                },
                "spec": { "region": "eu-west-1" },
                "status": { "conditions": [ { "type": "APIServerAvailable", "status": "True" } ] }
            })
        })
        .collect();
    let document = serde_json::json!({ "kind": "List", "items": items });
    std::fs::write(path, serde_json::to_vec(&document).unwrap()).unwrap();
}

/// Polls `condition` until it holds, panicking after `timeout`
pub async fn wait_until<F>(
    timeout: Duration,
    mut condition: F,
) where
    F: FnMut() -> bool,
{
    let deadline = tokio::time::Instant::now() + timeout;
    while !condition() {
        if tokio::time::Instant::now() >= deadline {
            panic!("condition not met within {:?}", timeout);
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}

/// Awaits `future`, panicking after `timeout`
pub async fn within<F: Future>(
    timeout: Duration,
    future: F,
) -> F::Output {
    tokio::time::timeout(timeout, future)
        .await
        .unwrap_or_else(|_| panic!("future did not complete within {:?}", timeout))
}
