use std::sync::Arc;
use std::thread;
use std::time::Duration;

use ntest::timeout;
use registry::{InstanceId, ManualClock, Registry, ServiceName};

const THREADS: usize = 16;
const PER_THREAD: usize = 64;

fn shared_registry() -> (Arc<ManualClock>, Arc<Registry>) {
    let clock = Arc::new(ManualClock::at_epoch());
    let registry = Registry::with_clock(clock.clone(), Duration::from_secs(5)).unwrap();
    (clock, Arc::new(registry))
}

#[test]
#[timeout(10000)]
fn concurrent_registrations_are_not_lost() {
    let (_clock, shared) = shared_registry();
    let registry: &Registry = &shared;
    let movies = ServiceName::new("movies").unwrap();

    thread::scope(|s| {
        for t in 0..THREADS {
            let movies = &movies;
            s.spawn(move || {
                for i in 0..PER_THREAD {
                    let id = InstanceId::new(format!("t{t}-i{i}")).unwrap();
                    registry.register(movies, &id, format!("10.{t}.0.{i}:8080"));
                }
            });
        }
    });

    assert_eq!(registry.len(), THREADS * PER_THREAD);
    assert_eq!(
        registry.resolve(&movies).unwrap().len(),
        THREADS * PER_THREAD
    );
}

#[test]
#[timeout(10000)]
fn readers_and_writers_interleave_safely() {
    let (_clock, shared) = shared_registry();
    let registry: &Registry = &shared;
    let movies = ServiceName::new("movies").unwrap();
    let anchor = InstanceId::new("anchor").unwrap();
    registry.register(&movies, &anchor, "10.0.0.1:8080");
    assert_eq!(registry.len(), 1);

    thread::scope(|s| {
        // Writers churn their own instances while the anchor stays registered
        for t in 0..4 {
            let movies = &movies;
            s.spawn(move || {
                let id = InstanceId::new(format!("churn-{t}")).unwrap();
                for _ in 0..500 {
                    registry.register(movies, &id, "10.0.9.9:8080");
                    registry.heartbeat(movies, &id).unwrap();
                    registry.deregister(movies, &id);
                }
            });
        }
        for _ in 0..4 {
            let movies = &movies;
            s.spawn(move || {
                for _ in 0..500 {
                    let addresses = registry.resolve(movies).unwrap();
                    assert!(addresses.contains(&"10.0.0.1:8080".to_string()));
                }
            });
        }
        s.spawn(|| {
            for _ in 0..500 {
                registry.heartbeat(&movies, &anchor).unwrap();
            }
        });
    });

    assert_eq!(registry.len(), 1);
    assert_eq!(
        registry.resolve(&movies).unwrap(),
        vec!["10.0.0.1:8080".to_string()]
    );
}

#[test]
#[timeout(10000)]
fn last_concurrent_reregistration_wins() {
    let (_clock, shared) = shared_registry();
    let registry: &Registry = &shared;
    let movies = ServiceName::new("movies").unwrap();
    let i1 = InstanceId::new("i1").unwrap();

    thread::scope(|s| {
        for t in 0..THREADS {
            let (movies, i1) = (&movies, &i1);
            s.spawn(move || registry.register(movies, i1, format!("10.0.0.{t}:8080")));
        }
    });

    let addresses = registry.resolve(&movies).unwrap();
    assert_eq!(addresses.len(), 1);
    let snapshot = registry.instances(&movies);
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot[0].address, addresses[0]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[timeout(10000)]
async fn concurrent_registrations_through_discovery_trait() {
    use registry::Discovery;

    let (_clock, shared) = shared_registry();
    let discovery: Arc<dyn Discovery> = shared.clone();
    let movies = ServiceName::new("movies").unwrap();

    let mut handles = Vec::new();
    for i in 0..256 {
        let discovery = discovery.clone();
        let movies = movies.clone();
        handles.push(tokio::spawn(async move {
            let id = InstanceId::new(format!("i{i}")).unwrap();
            let address = format!("10.0.{}.{}:8080", i / 256, i % 256);
            discovery.register(&movies, &id, &address).await.unwrap();
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(discovery.resolve(&movies).await.unwrap().len(), 256);
    assert_eq!(shared.len(), 256);
}
