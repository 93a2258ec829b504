use std::sync::Arc;

use cloud_agent::Error;
use cloud_agent::FileConfigSource;
use cloud_agent::QueryError;
use cloud_agent::SourceConfig;
use cloud_agent::WatchState;

use crate::common::eventually;
use crate::common::write_inventory;
use crate::common::Agent;
use crate::common::WAIT;

#[tokio::test]
async fn test_queries_follow_the_upstream() {
    let dir = tempfile::tempdir().unwrap();
    let prod = dir.path().join("prod.json");
    let dev = dir.path().join("dev.json");
    write_inventory(&prod, &[("s1", "a"), ("s2", "a"), ("s3", "b")]);

    let agent = Agent::start(
        vec![SourceConfig::new("prod", &prod), SourceConfig::new("dev", &dev)],
        Arc::new(FileConfigSource::new(None)),
    )
    .await;
    let mut client = agent.client().await;

    // 1. Owner filter on the first snapshot
    let owned = eventually(|| {
        let mut client = client.clone();
        async move { client.gardener_shoots("prod", Some("a"), WAIT).await.ok() }
    })
    .await;
    let names: Vec<&str> = owned.items.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["s1", "s2"]);

    // 2. Unknown and not yet populated sources
    match client.gardener_shoots("staging", None, WAIT).await {
        Err(Error::Query(QueryError::UnknownSource(source))) => assert_eq!(source, "staging"),
        other => panic!("unexpected result: {:?}", other),
    }
    match client.gardener_shoots("dev", None, WAIT).await {
        Err(Error::Query(QueryError::NotYetPopulated(source))) => assert_eq!(source, "dev"),
        other => panic!("unexpected result: {:?}", other),
    }
    let supervisor = agent.supervisor.clone();
    eventually(|| {
        let restarted = supervisor.status("dev").map(|r| r.restarts > 0).unwrap_or(false);
        async move { restarted.then_some(()) }
    })
    .await;

    // 3. Owner without shoots is an empty, successful answer
    let none = client.gardener_shoots("prod", Some("c"), WAIT).await.unwrap();
    assert!(none.is_empty());

    // 4. Upstream changes reach the clients
    write_inventory(&prod, &[("s1", "a"), ("s2", "a"), ("s3", "b"), ("s4", "a")]);
    eventually(|| {
        let mut client = client.clone();
        async move {
            let owned = client.gardener_shoots("prod", Some("a"), WAIT).await.ok()?;
            (owned.len() == 3).then_some(())
        }
    })
    .await;

    // 5. A failing source recovers once its upstream shows up
    write_inventory(&dev, &[("d1", "b")]);
    let dev_shoots = eventually(|| {
        let mut client = client.clone();
        async move { client.gardener_shoots("dev", None, WAIT).await.ok() }
    })
    .await;
    assert_eq!(dev_shoots.len(), 1);
    assert_eq!(agent.supervisor.status("dev").unwrap().state, WatchState::Watching);

    drop(client);
    agent.stop().await;
}

#[tokio::test]
async fn test_last_snapshot_survives_upstream_outage() {
    let dir = tempfile::tempdir().unwrap();
    let prod = dir.path().join("prod.json");
    write_inventory(&prod, &[("s1", "a")]);

    let agent = Agent::start(vec![SourceConfig::new("prod", &prod)], Arc::new(FileConfigSource::new(None))).await;

    let cache = agent.cache.clone();
    eventually(|| {
        let populated = cache.get("prod").map(|r| r.is_populated()).unwrap_or(false);
        async move { populated.then_some(()) }
    })
    .await;

    std::fs::remove_file(&prod).unwrap();
    let supervisor = agent.supervisor.clone();
    eventually(|| {
        let restarted = supervisor.status("prod").map(|r| r.restarts > 0).unwrap_or(false);
        async move { restarted.then_some(()) }
    })
    .await;

    let mut client = agent.client().await;
    let shoots = client.gardener_shoots("prod", None, WAIT).await.unwrap();
    assert_eq!(shoots.len(), 1);

    drop(client);
    agent.stop().await;
}
