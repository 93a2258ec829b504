use std::path::Path;
use std::sync::Arc;

use cloud_agent::AgentConfig;
use cloud_agent::Error;
use cloud_agent::FileConfigSource;
use cloud_agent::QueryError;

use crate::common::eventually;
use crate::common::write_inventory;
use crate::common::Agent;
use crate::common::WAIT;

fn write_config(
    path: &Path,
    sources: &[(&str, &Path)],
) {
    let mut content = String::new();
    for (name, inventory) in sources {
        content.push_str(&format!(
            "[[sources]]\nname = \"{}\"\npath = \"{}\"\n\n",
            name,
            inventory.display()
        ));
    }
    std::fs::write(path, content).unwrap();
}

#[tokio::test]
async fn test_reload_swaps_sources() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("agent.toml");
    let prod = dir.path().join("prod.json");
    let dev = dir.path().join("dev.json");
    write_inventory(&prod, &[("s1", "a")]);
    write_inventory(&dev, &[("d1", "a"), ("d2", "b")]);
    write_config(&config, &[("prod", &prod)]);

    let config_path = config.to_string_lossy().into_owned();
    let initial = AgentConfig::load(Some(&config_path)).unwrap().sources;
    let agent = Agent::start(initial, Arc::new(FileConfigSource::new(Some(config_path)))).await;
    let mut client = agent.client().await;

    eventually(|| {
        let mut client = client.clone();
        async move { client.gardener_shoots("prod", None, WAIT).await.ok() }
    })
    .await;

    write_config(&config, &[("dev", &dev)]);
    agent.config_events.send(()).await.unwrap();

    let dev_shoots = eventually(|| {
        let mut client = client.clone();
        async move { client.gardener_shoots("dev", None, WAIT).await.ok() }
    })
    .await;
    assert_eq!(dev_shoots.len(), 2);
    assert_eq!(agent.supervisor.resets(), 1);

    match client.gardener_shoots("prod", None, WAIT).await {
        Err(Error::Query(QueryError::UnknownSource(source))) => assert_eq!(source, "prod"),
        other => panic!("unexpected result: {:?}", other),
    }

    drop(client);
    agent.stop().await;
}

#[tokio::test]
async fn test_broken_reload_keeps_serving() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("agent.toml");
    let prod = dir.path().join("prod.json");
    write_inventory(&prod, &[("s1", "a")]);
    write_config(&config, &[("prod", &prod)]);

    let config_path = config.to_string_lossy().into_owned();
    let initial = AgentConfig::load(Some(&config_path)).unwrap().sources;
    let agent = Agent::start(initial, Arc::new(FileConfigSource::new(Some(config_path)))).await;
    let mut client = agent.client().await;

    eventually(|| {
        let mut client = client.clone();
        async move { client.gardener_shoots("prod", None, WAIT).await.ok() }
    })
    .await;

    // Duplicate names fail validation
    write_config(&config, &[("prod", &prod), ("prod", &prod)]);
    agent.config_events.send(()).await.unwrap();
    // A second signal can only be queued once the first one was consumed
    agent.config_events.send(()).await.unwrap();

    let shoots = client.gardener_shoots("prod", None, WAIT).await.unwrap();
    assert_eq!(shoots.len(), 1);
    assert_eq!(agent.supervisor.resets(), 0);

    drop(client);
    agent.stop().await;
}
