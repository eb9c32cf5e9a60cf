//! Shared fixtures for lifecycle tests: a seeded in-memory store, a
//! recording notification sink, and a frozen clock.

use async_trait::async_trait;
use atria_contracts::{ContractService, NewContractRequest, RepaymentService};
use atria_core::{Clock, ContractStore, CoreError, Notification, NotificationSink};
use atria_model::{
    Actor, Money, Property, PropertyId, PropertyOrigin, Role, UserId, PLATFORM_IDENTITY,
};
use atria_store::MemoryStore;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

pub struct RecordingSink {
    pub fail: AtomicBool,
    sent: Mutex<Vec<Notification>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self {
            fail: AtomicBool::new(false),
            sent: Mutex::new(Vec::new()),
        }
    }

    pub async fn sent(&self) -> Vec<Notification> {
        self.sent.lock().await.clone()
    }
}

#[async_trait]
impl NotificationSink for RecordingSink {
    async fn enqueue(&self, notification: &Notification) -> Result<(), CoreError> {
        if self.fail.load(Ordering::Relaxed) {
            return Err(CoreError::dependency("notification sink unavailable"));
        }
        self.sent.lock().await.push(notification.clone());
        Ok(())
    }
}

pub struct FixedClock(DateTime<Utc>);

impl FixedClock {
    pub fn new() -> Self {
        Self(
            DateTime::parse_from_rfc3339("2024-05-01T12:00:00Z")
                .expect("timestamp")
                .with_timezone(&Utc),
        )
    }

    pub fn now_fixed(&self) -> DateTime<Utc> {
        self.0
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

pub struct World {
    pub contracts: ContractService,
    pub repayments: RepaymentService,
    pub store: Arc<MemoryStore>,
    pub notifier: Arc<RecordingSink>,
    pub clock: Arc<FixedClock>,
}

pub fn actor(id: &str, role: Role) -> Actor {
    Actor::new(UserId::parse(id).expect("user id"), role)
}

pub fn new_request(property_id: &str) -> NewContractRequest {
    NewContractRequest {
        property_id: PropertyId::parse(property_id).expect("property id"),
        message: "interested in representing this listing".to_string(),
        experience: Some("5 years in residential sales".to_string()),
        references: None,
    }
}

/// Seeds one externally-captured property (`p-ext`, owner `captador-1`,
/// price 300000.00) and one platform property (`p-plat`, price 500000.00).
pub async fn world() -> World {
    let store = Arc::new(MemoryStore::new());
    let notifier = Arc::new(RecordingSink::new());
    let clock = Arc::new(FixedClock::new());

    let external = Property {
        id: PropertyId::parse("p-ext").expect("id"),
        owner_id: UserId::parse("captador-1").expect("owner"),
        origin: PropertyOrigin::Captured,
        price: Money::from_cents(30_000_000),
        created_at: clock.now_fixed(),
    };
    let platform = Property {
        id: PropertyId::parse("p-plat").expect("id"),
        owner_id: UserId::parse(PLATFORM_IDENTITY).expect("owner"),
        origin: PropertyOrigin::Platform,
        price: Money::from_cents(50_000_000),
        created_at: clock.now_fixed(),
    };
    store.insert_property(&external).await.expect("seed external");
    store.insert_property(&platform).await.expect("seed platform");

    World {
        contracts: ContractService::new(
            store.clone() as Arc<dyn ContractStore>,
            notifier.clone(),
            clock.clone(),
        ),
        repayments: RepaymentService::new(store.clone() as Arc<dyn ContractStore>, clock.clone()),
        store,
        notifier,
        clock,
    }
}
