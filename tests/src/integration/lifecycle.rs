//! # Lifecycle Integration Tests
//!
//! Every service follows the same state machine whatever it does; these
//! tests drive real services through it over a live bus.

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::mpsc;
    use tokio::time::timeout;

    use shared_bus::{
        DiscoveryEvent, EventPublisher, EventTopic, HandlerError, InMemoryEventBus, Priority,
    };
    use shared_types::{
        DomainScope, DynService, RecordType, Request, Service, ServiceError, ServiceState, Tag,
    };

    use sd_01_markov_names::{MarkovConfig, MarkovService};
    use sd_02_urlscan::{MockWebClient, UrlScanConfig, UrlScanService};

    fn scope() -> Arc<DomainScope> {
        Arc::new(DomainScope::from_domains(["example.com"]).unwrap())
    }

    fn resolved(name: &str) -> DiscoveryEvent {
        DiscoveryEvent::NameResolved(
            Request::new(name, "example.com")
                .with_tag(Tag::Resolved)
                .with_records(vec![RecordType::CNAME]),
        )
    }

    fn services(bus: &Arc<InMemoryEventBus>) -> (Arc<MarkovService>, Vec<DynService>) {
        let markov = Arc::new(MarkovService::new(
            MarkovConfig::default(),
            scope(),
            bus.clone(),
        ));
        let urlscan = Arc::new(UrlScanService::new(
            UrlScanConfig::default(),
            scope(),
            bus.clone(),
            Arc::new(MockWebClient::new()),
        ));
        let all: Vec<DynService> = vec![markov.clone(), urlscan];
        (markov, all)
    }

    async fn wait_for_labels(markov: &MarkovService, n: u64) {
        timeout(Duration::from_secs(5), async {
            while markov.engine().total_labels() < n {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .expect("training did not reach expected count");
    }

    #[tokio::test]
    async fn test_paused_service_holds_bus_deliveries_until_resume() {
        let bus = InMemoryEventBus::shared();
        let (markov, _) = services(&bus);
        markov.start().unwrap();
        markov.pause();

        for name in ["www.example.com", "vpn.example.com", "git.example.com"] {
            bus.publish(Priority::Normal, resolved(name));
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(markov.engine().total_labels(), 0, "paused service must not train");

        markov.resume();
        wait_for_labels(&markov, 3).await;
        assert_eq!(markov.state(), ServiceState::Running);

        markov.stop();
    }

    #[tokio::test]
    async fn test_stopping_every_service_is_terminal() {
        let bus = InMemoryEventBus::shared();
        let (_, all) = services(&bus);

        for service in &all {
            service.start().unwrap();
            assert_eq!(service.state(), ServiceState::Running);
        }
        for service in &all {
            service.stop();
        }

        for service in &all {
            assert_eq!(service.state(), ServiceState::Stopped);
            service.resume();
            assert_eq!(service.state(), ServiceState::Stopped);
            assert_eq!(
                service.start().unwrap_err(),
                ServiceError::Stopped {
                    service: service.name().to_string()
                }
            );
        }
    }

    #[tokio::test]
    async fn test_stopped_service_ignores_later_names() {
        let bus = InMemoryEventBus::shared();
        let (markov, _) = services(&bus);
        markov.start().unwrap();

        bus.publish(Priority::Normal, resolved("www.example.com"));
        wait_for_labels(&markov, 1).await;

        markov.stop();
        bus.publish(Priority::Normal, resolved("late.example.com"));
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(markov.engine().total_labels(), 1);
    }

    #[tokio::test]
    async fn test_failing_subscriber_does_not_starve_services() {
        let bus = InMemoryEventBus::shared();

        bus.subscribe(
            EventTopic::NameResolved,
            |_e: DiscoveryEvent| -> Result<(), HandlerError> { panic!("subscriber bug") },
        )
        .unwrap();
        let rejected = Arc::new(AtomicUsize::new(0));
        let counter = rejected.clone();
        bus.subscribe(
            EventTopic::NameResolved,
            move |_e: DiscoveryEvent| -> Result<(), HandlerError> {
                counter.fetch_add(1, Ordering::SeqCst);
                Err(HandlerError::Rejected("not interested".to_string()))
            },
        )
        .unwrap();

        let (markov, _) = services(&bus);
        markov.start().unwrap();

        for name in ["a.example.com", "b.example.com"] {
            bus.publish(Priority::Normal, resolved(name));
        }

        wait_for_labels(&markov, 2).await;
        timeout(Duration::from_secs(5), async {
            while rejected.load(Ordering::SeqCst) < 2 {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .expect("rejecting subscriber saw every event");

        markov.stop();
    }

    #[tokio::test]
    async fn test_heartbeats_reach_set_active_subscribers() {
        let bus = InMemoryEventBus::shared();
        let (tx, mut rx) = mpsc::unbounded_channel();
        bus.subscribe(
            EventTopic::SetActive,
            move |e: DiscoveryEvent| -> Result<(), HandlerError> {
                tx.send(e.source().to_string()).ok();
                Ok(())
            },
        )
        .unwrap();

        bus.publish(Priority::Critical, DiscoveryEvent::set_active("Markov Model"));
        let source = timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("timeout")
            .expect("bus closed");
        assert_eq!(source, "Markov Model");
    }
}
