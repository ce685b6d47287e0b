use airgate_application::ports::{
    BlocklistRepository, Clock, DeviceNameRepository, DeviceStatsRepository, SettingsRepository,
};
use airgate_application::use_cases::blocklist::AddBlockedDomainUseCase;
use airgate_application::use_cases::settings::{RestoreRouterStateUseCase, SetUpstreamUseCase};
use airgate_application::TrafficAccountant;
use airgate_domain::{DeviceCounters, Direction, MacAddress, TrafficEvent};
use airgate_infrastructure::persistence::JsonFileStore;
use std::sync::Arc;

mod helpers;
use helpers::router_state;

struct ZeroClock;

impl Clock for ZeroClock {
    fn now_millis(&self) -> u64 {
        0
    }
}

const STATION: MacAddress = MacAddress::new([0x02, 0x11, 0x22, 0x33, 0x44, 0x55]);
const AP: MacAddress = MacAddress::new([0x02, 0xAA, 0, 0, 0, 1]);

#[tokio::test]
async fn test_router_state_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("airgate-state.json");

    {
        let store = Arc::new(JsonFileStore::open(&path).await.unwrap());
        let state = router_state(&[], "1.1.1.1:53".parse().unwrap());
        let accountant =
            TrafficAccountant::new(state.clone(), store.clone(), Arc::new(ZeroClock));

        accountant
            .record_event(TrafficEvent {
                source: STATION,
                destination: AP,
                length: 1234,
                direction: Direction::Upload,
            })
            .await;
        assert_eq!(accountant.save().await, 1);

        AddBlockedDomainUseCase::new(state.clone(), store.clone())
            .execute("Tracker.Example.net")
            .await
            .unwrap();
        SetUpstreamUseCase::new(state.clone(), store.clone())
            .execute("9.9.9.9")
            .await
            .unwrap();
        store.save_name(&STATION, "Laptop").await.unwrap();
    }

    let store = Arc::new(JsonFileStore::open(&path).await.unwrap());
    let state = router_state(&[], "1.1.1.1:53".parse().unwrap());
    RestoreRouterStateUseCase::new(state.clone(), store.clone(), store.clone())
        .execute(&["seed.example.com".to_string()])
        .await;

    assert!(state.is_blocked("a.tracker.example.net"));
    assert!(!state.is_blocked("seed.example.com"));
    assert_eq!(state.upstream(), "9.9.9.9:53".parse().unwrap());
    assert_eq!(store.load_name(&STATION).await.unwrap().as_deref(), Some("Laptop"));

    let accountant = TrafficAccountant::new(state, store, Arc::new(ZeroClock));
    accountant
        .record_event(TrafficEvent {
            source: AP,
            destination: STATION,
            length: 10,
            direction: Direction::Download,
        })
        .await;
    let device = accountant.device(&STATION).unwrap();
    assert_eq!(device.upload_bytes(), 1234);
    assert_eq!(device.download_bytes(), 10);
}

#[tokio::test]
async fn test_reset_all_clears_persisted_counters() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");
    let store = Arc::new(JsonFileStore::open(&path).await.unwrap());
    let accountant = TrafficAccountant::new(
        router_state(&[], "1.1.1.1:53".parse().unwrap()),
        store.clone(),
        Arc::new(ZeroClock),
    );

    accountant
        .record_event(TrafficEvent {
            source: STATION,
            destination: AP,
            length: 500,
            direction: Direction::Upload,
        })
        .await;
    accountant.save().await;
    accountant.reset_all().await;

    let reopened = JsonFileStore::open(&path).await.unwrap();
    let raw = std::fs::read_to_string(reopened.path()).unwrap();
    let doc: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert!(doc["devices"].as_object().unwrap().is_empty());
}

#[tokio::test]
async fn test_admin_change_survives_daemon_counter_save() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("airgate-state.json");
    let daemon = JsonFileStore::open(&path).await.unwrap();
    let admin = JsonFileStore::open(&path).await.unwrap();

    admin
        .save_domains(&["ads.example.com".to_string()])
        .await
        .unwrap();
    admin.save_upstream("9.9.9.9:53".parse().unwrap()).await.unwrap();
    daemon
        .save_all_counters(&[(
            STATION,
            DeviceCounters {
                upload_bytes: 5,
                download_bytes: 7,
            },
        )])
        .await
        .unwrap();

    let reopened = JsonFileStore::open(&path).await.unwrap();
    assert_eq!(reopened.load_domains().await.unwrap(), vec!["ads.example.com"]);
    assert_eq!(
        reopened.load_upstream().await.unwrap(),
        Some("9.9.9.9:53".parse().unwrap())
    );
    assert_eq!(reopened.load_counters(&STATION).await.unwrap().download_bytes, 7);
}

#[tokio::test]
async fn test_loads_see_writes_from_another_instance() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("airgate-state.json");
    let daemon = JsonFileStore::open(&path).await.unwrap();
    let admin = JsonFileStore::open(&path).await.unwrap();

    admin.save_name(&STATION, "Laptop").await.unwrap();

    assert_eq!(
        daemon.load_name(&STATION).await.unwrap().as_deref(),
        Some("Laptop")
    );
}
