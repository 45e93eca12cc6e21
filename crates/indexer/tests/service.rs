//! Tests for the TabService query and activation path

mod common;

use common::{tab, FakeFetcher, RecordingSink};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::time::Duration;
use tabs_indexer::{IndexCoordinator, QueryGate, SourcesConfig, TabService};

fn service(fetcher: &Arc<FakeFetcher>, sink: &Arc<RecordingSink>, enabled: &[&str]) -> TabService {
    let mut config = SourcesConfig::default();
    for source in enabled {
        config.set_config_option(source, true).unwrap();
    }
    TabService::new(
        IndexCoordinator::new(fetcher.clone()).unwrap(),
        QueryGate::new(Duration::from_secs(60)),
        config,
        sink.clone(),
    )
}

#[tokio::test]
async fn valid_query_refreshes_enabled_sources_only() {
    let fetcher = Arc::new(FakeFetcher::new());
    fetcher.answer("Safari", vec![tab("Safari", "A", "https://a.com", 1, 0)]);
    let sink = Arc::new(RecordingSink::default());
    let service = service(&fetcher, &sink, &["Safari"]);

    service.handle_query("a", true);
    service.coordinator().join_workers().await;

    assert_eq!(fetcher.calls("Safari"), 1);
    assert_eq!(fetcher.calls("Chrome"), 0);
    assert_eq!(service.handle_query("ab", true).len(), 1);
    assert_eq!(fetcher.total_calls(), 1);
}

#[tokio::test]
async fn invalid_query_never_refreshes() {
    let fetcher = Arc::new(FakeFetcher::new());
    let sink = Arc::new(RecordingSink::default());
    let service = service(&fetcher, &sink, &["Safari"]);

    let index = service.handle_query("a", false);
    service.coordinator().join_workers().await;

    assert!(index.is_empty());
    assert_eq!(fetcher.total_calls(), 0);
}

#[tokio::test]
async fn activation_uses_record_location_and_rearms_the_gate() {
    let fetcher = Arc::new(FakeFetcher::new());
    fetcher.answer("Orion", vec![tab("Orion", "Mail", "https://mail.example.com", 77, 4)]);
    let sink = Arc::new(RecordingSink::default());
    let service = service(&fetcher, &sink, &["Orion"]);

    service.handle_query("m", true);
    service.coordinator().join_workers().await;

    let index = service.handle_query("ma", true);
    let target = index.items()[0].activation.clone().unwrap();
    service.activate(&target).await.unwrap();

    let activated = sink.activated.lock().unwrap().clone();
    assert_eq!(activated.len(), 1);
    assert_eq!(
        (activated[0].source.as_str(), activated[0].window_id, activated[0].tab_index),
        ("Orion", 77, 4)
    );

    // Same first character, inside the window, but the gate was reset.
    service.handle_query("ma", true);
    service.coordinator().join_workers().await;
    assert_eq!(fetcher.calls("Orion"), 2);
}

#[tokio::test]
async fn activation_failure_is_surfaced() {
    let fetcher = Arc::new(FakeFetcher::new());
    let sink = Arc::new(RecordingSink {
        fail: true,
        ..RecordingSink::default()
    });
    let service = service(&fetcher, &sink, &[]);
    let target = tabs_protocol::ActivationRef {
        source: "Safari".to_string(),
        window_id: 1,
        tab_index: 0,
    };
    assert!(service.activate(&target).await.is_err());
    assert_eq!(sink.activated.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn config_changes_apply_to_the_next_refresh() {
    let fetcher = Arc::new(FakeFetcher::new());
    let sink = Arc::new(RecordingSink::default());
    let service = service(&fetcher, &sink, &[]);

    service.handle_query("a", true);
    service.coordinator().join_workers().await;
    assert_eq!(fetcher.total_calls(), 0);

    service.set_config_option("Edge", true).unwrap();
    assert!(service.set_config_option("Netscape", true).is_err());
    service.handle_query("b", true);
    service.coordinator().join_workers().await;
    assert_eq!(fetcher.calls("Edge"), 1);
    assert!(service.config().is_enabled("Edge"));
}
