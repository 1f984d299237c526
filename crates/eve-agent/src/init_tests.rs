// SPDX-License-Identifier: BUSL-1.1

use eve_pubsub::{Publication, TopicIdentity};
use eve_types::GlobalConfig;

use super::*;

#[tokio::test]
async fn wait_for_global_config_returns_default_when_unpublished() {
    let pubn: Publication<GlobalConfig> = Publication::new(TopicIdentity::new("zedagent", "GlobalConfig"));
    let sub = Subscription::activate(&pubn).await.unwrap();
    let cfg = wait_for_global_config(&sub).await;
    assert_eq!(cfg, GlobalConfig::default());
}

#[tokio::test]
async fn wait_for_global_config_returns_published_value() {
    let pubn: Publication<GlobalConfig> = Publication::new(TopicIdentity::new("zedagent", "GlobalConfig"));
    let custom = GlobalConfig { timer_config_interval_s: 42, ..GlobalConfig::default() };
    pubn.publish(custom.clone()).await.unwrap();
    let sub = Subscription::activate(&pubn).await.unwrap();
    let cfg = wait_for_global_config(&sub).await;
    assert_eq!(cfg, custom);
}

#[tokio::test]
async fn wait_until_present_resolves_once_published() {
    let pubn: Publication<GlobalConfig> = Publication::new(TopicIdentity::new("nodeagent", "GlobalConfig"));
    let sub = Subscription::activate(&pubn).await.unwrap();

    let pubn2 = pubn.clone();
    let waiter = tokio::spawn(async move {
        let sub = sub;
        wait_until_present(&sub, "global").await
    });

    tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    pubn2.publish(GlobalConfig::default()).await.unwrap();

    let got = waiter.await.unwrap();
    assert_eq!(got, GlobalConfig::default());
}
