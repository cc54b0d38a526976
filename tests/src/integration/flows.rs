//! # Integration Test Flows
//!
//! Tests that the Markov and URLScan services work together over the
//! shared bus.
//!
//! ## Flows Tested:
//!
//! 1. **name-resolved → Markov → new-name**: resolved names train the model
//!    and bursts publish guesses
//! 2. **URLScan → new-name**: third-party discoveries reach the same output
//! 3. **log**: advisories from any service reach log subscribers
//! 4. **Runtime**: stdin-style input through the whole wiring to stdout-style
//!    output

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::mpsc;
    use tokio::time::timeout;

    use shared_bus::{
        DiscoveryEvent, EventPublisher, EventTopic, HandlerError, InMemoryEventBus, Priority,
    };
    use shared_types::{DomainScope, RecordType, Request, Service, Tag};

    use sd_01_markov_names::{MarkovConfig, MarkovService};
    use sd_02_urlscan::{MockWebClient, UrlScanConfig, UrlScanService};

    use scout_runtime::wiring::write_names;
    use scout_runtime::{RuntimeConfig, ScoutRuntime};

    const BASE: &str = "http://urlscan.test/api/v1";

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    fn scope() -> Arc<DomainScope> {
        Arc::new(DomainScope::from_domains(["example.com"]).unwrap())
    }

    /// Small model that bursts after every second trained label.
    fn eager_markov() -> MarkovConfig {
        MarkovConfig::default()
            .with_ngram_size(1)
            .with_recompute_every(2)
            .with_num_names(50)
    }

    fn resolved(name: &str) -> DiscoveryEvent {
        DiscoveryEvent::NameResolved(
            Request::new(name, "example.com")
                .with_tag(Tag::Resolved)
                .with_source("Resolver")
                .with_records(vec![RecordType::A]),
        )
    }

    /// Collect every event published on `topic`.
    fn collect(
        bus: &InMemoryEventBus,
        topic: EventTopic,
    ) -> mpsc::UnboundedReceiver<DiscoveryEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        bus.subscribe(topic, move |e: DiscoveryEvent| -> Result<(), HandlerError> {
            tx.send(e).ok();
            Ok(())
        })
        .unwrap();
        rx
    }

    async fn next_name(rx: &mut mpsc::UnboundedReceiver<DiscoveryEvent>) -> Request {
        match timeout(Duration::from_secs(10), rx.recv())
            .await
            .expect("timeout waiting for new-name")
            .expect("bus closed")
        {
            DiscoveryEvent::NewName(req) => req,
            other => panic!("unexpected event {other:?}"),
        }
    }

    fn script_urlscan(client: &MockWebClient, link_domains: &[&str]) {
        client
            .on_get(
                format!("{BASE}/search/?q=domain:example.com"),
                Ok(r#"{"results":[{"_id":"scan-1"}],"total":1}"#.to_string()),
            )
            .on_get(
                format!("{BASE}/result/scan-1/"),
                Ok(serde_json::json!({ "lists": { "ips": [], "linkDomains": link_domains } })
                    .to_string()),
            );
    }

    // =============================================================================
    // MARKOV: name-resolved → new-name
    // =============================================================================

    #[tokio::test]
    async fn test_resolved_names_train_markov_and_publish_guesses() {
        let bus = InMemoryEventBus::shared();
        let mut names = collect(&bus, EventTopic::NewName);

        let markov = MarkovService::new(eager_markov(), scope(), bus.clone());
        markov.start().unwrap();

        bus.publish(Priority::Normal, resolved("www.example.com"));
        bus.publish(Priority::Normal, resolved("mail.example.com"));

        let guess = next_name(&mut names).await;
        assert_eq!(guess.tag, Tag::Altered);
        assert_eq!(guess.source, "Markov Model");
        assert_eq!(guess.domain, "example.com");
        assert!(guess.name.ends_with(".example.com"), "{}", guess.name);
        assert!(!["www.example.com", "mail.example.com"].contains(&guess.name.as_str()));

        markov.stop();
    }

    #[tokio::test]
    async fn test_markov_never_republishes_a_guess() {
        let bus = InMemoryEventBus::shared();
        let mut names = collect(&bus, EventTopic::NewName);

        let markov = MarkovService::new(eager_markov(), scope(), bus.clone());
        markov.start().unwrap();

        // Two full training periods: two bursts from overlapping models.
        for name in ["www.example.com", "mail.example.com", "web.example.com", "mx.example.com"] {
            bus.publish(Priority::Normal, resolved(name));
        }

        let engine = markov.engine().clone();
        timeout(Duration::from_secs(10), async {
            while engine.total_labels() < 4 {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .expect("training did not finish");
        tokio::time::sleep(Duration::from_millis(500)).await;

        let mut seen = HashSet::new();
        while let Ok(DiscoveryEvent::NewName(req)) = names.try_recv() {
            assert!(seen.insert(req.name.clone()), "{} published twice", req.name);
        }
        assert!(!seen.is_empty());

        markov.stop();
    }

    // =============================================================================
    // URLSCAN: lookup → new-name (alongside Markov)
    // =============================================================================

    #[tokio::test(start_paused = true)]
    async fn test_urlscan_discoveries_share_the_bus_with_markov() {
        let bus = InMemoryEventBus::shared();
        let mut names = collect(&bus, EventTopic::NewName);

        let client = Arc::new(MockWebClient::new());
        script_urlscan(&client, &["api.example.com", "cdn.elsewhere.net"]);

        let markov = MarkovService::new(eager_markov(), scope(), bus.clone());
        let urlscan = UrlScanService::new(
            UrlScanConfig::default().with_base_url(BASE),
            scope(),
            bus.clone(),
            client,
        );
        markov.start().unwrap();
        urlscan.start().unwrap();

        urlscan.send_request(Request::new("example.com", "example.com"));

        let found = next_name(&mut names).await;
        assert_eq!(found.name, "api.example.com");
        assert_eq!(found.tag, Tag::Api);
        assert_eq!(found.source, "URLScan");

        // Markov only learns from resolved names, never from discoveries.
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(markov.engine().total_labels(), 0);

        urlscan.stop();
        markov.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_api_key_is_reported_on_log() {
        let bus = InMemoryEventBus::shared();
        let mut logs = collect(&bus, EventTopic::Log);

        let urlscan = UrlScanService::new(
            UrlScanConfig::default().with_base_url(BASE),
            scope(),
            bus.clone(),
            Arc::new(MockWebClient::new()),
        );
        urlscan.start().unwrap();

        let event = timeout(Duration::from_secs(5), logs.recv())
            .await
            .expect("timeout")
            .expect("bus closed");
        match event {
            DiscoveryEvent::Log { source, message } => {
                assert_eq!(source, "URLScan");
                assert!(message.contains("API key"), "{message}");
            }
            other => panic!("unexpected event {other:?}"),
        }

        urlscan.stop();
    }

    // =============================================================================
    // RUNTIME: input lines → output lines
    // =============================================================================

    #[tokio::test(start_paused = true)]
    async fn test_runtime_prints_each_discovery_once() {
        let client = Arc::new(MockWebClient::new());
        script_urlscan(&client, &["api.example.com", "api.example.com", "cdn.example.com"]);

        let config = RuntimeConfig::default()
            .with_domains(["example.com"])
            .with_urlscan(UrlScanConfig::default().with_base_url(BASE))
            .with_markov(MarkovConfig::default().with_alterations(false));
        let runtime = ScoutRuntime::with_web_client(config, client).unwrap();

        let names = runtime.start().unwrap();
        let mut out = Vec::new();
        let printer = write_names(names, runtime.shutdown_signal(), &mut out);

        let drive = async {
            tokio::time::sleep(Duration::from_secs(20)).await;
            runtime.shutdown();
        };
        let (written, ()) = tokio::join!(printer, drive);

        assert_eq!(written.unwrap(), 2);
        let text = String::from_utf8(out).unwrap();
        let mut lines: Vec<&str> = text.lines().collect();
        lines.sort_unstable();
        assert_eq!(lines, vec!["api.example.com", "cdn.example.com"]);
    }
}
