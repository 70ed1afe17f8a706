#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;
use tokio::time::{Duration, sleep};
use tint_core::{
    ApplyCoordinator, CommitPolicy, CoordinatorConfig, HexColor,
    KeyValueStore, MemoryStore, Origin, OriginColorStore, PaletteChannel,
    PaletteDelivery, PaletteInjector, PaletteRequest, StyleOverrides,
    TintError, apply::default_base_color,
};

pub fn hex(raw: &str) -> HexColor {
    HexColor::parse(raw).expect("valid test color")
}

pub fn origin(raw: &str) -> Origin {
    Origin::parse(raw).expect("valid test origin")
}

/// Live channel that records requests, optionally failing every delivery
/// or stalling before it records one particular color.
#[derive(Debug, Default)]
pub struct RecordingChannel {
    pub fail: bool,
    pub stall: Option<(HexColor, Duration)>,
    pub seen: Mutex<Vec<PaletteRequest>>,
}

impl RecordingChannel {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn stalling_on(color: HexColor, delay: Duration) -> Self {
        Self {
            stall: Some((color, delay)),
            ..Self::default()
        }
    }

    pub fn seen(&self) -> Vec<PaletteRequest> {
        self.seen.lock().unwrap().clone()
    }

    pub fn last_painted(&self) -> Option<HexColor> {
        self.seen().last().map(|request| request.base_color.clone())
    }
}

#[async_trait]
impl PaletteChannel for RecordingChannel {
    async fn deliver(&self, request: &PaletteRequest) -> tint_core::Result<()> {
        if self.fail {
            return Err(TintError::Delivery(
                "no content context loaded".into(),
            ));
        }
        if let Some((color, delay)) = &self.stall
            && *color == request.base_color
        {
            sleep(*delay).await;
        }
        self.seen.lock().unwrap().push(request.clone());
        Ok(())
    }
}

/// Fallback injector that records overrides, optionally failing.
#[derive(Debug, Default)]
pub struct RecordingInjector {
    pub fail: bool,
    pub seen: Mutex<Vec<StyleOverrides>>,
}

impl RecordingInjector {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn seen(&self) -> Vec<StyleOverrides> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl PaletteInjector for RecordingInjector {
    async fn inject(&self, overrides: &StyleOverrides) -> tint_core::Result<()> {
        if self.fail {
            return Err(TintError::Delivery("tab closed".into()));
        }
        self.seen.lock().unwrap().push(overrides.clone());
        Ok(())
    }
}

/// Backend whose every call fails.
#[derive(Debug, Default)]
pub struct UnavailableStore;

#[async_trait]
impl KeyValueStore for UnavailableStore {
    async fn get(&self, _key: &str) -> tint_core::Result<Option<Value>> {
        Err(TintError::StoreUnavailable("sync storage offline".into()))
    }

    async fn set(&self, _key: &str, _value: Value) -> tint_core::Result<()> {
        Err(TintError::StoreUnavailable("sync storage offline".into()))
    }
}

pub struct Harness {
    pub coordinator: ApplyCoordinator<MemoryStore>,
    pub channel: Arc<RecordingChannel>,
    pub injector: Arc<RecordingInjector>,
}

impl Harness {
    pub fn new(policy: CommitPolicy) -> Self {
        Self::with_delivery(
            policy,
            RecordingChannel::default(),
            RecordingInjector::default(),
        )
    }

    pub fn with_delivery(
        policy: CommitPolicy,
        channel: RecordingChannel,
        injector: RecordingInjector,
    ) -> Self {
        let channel = Arc::new(channel);
        let injector = Arc::new(injector);
        let delivery = PaletteDelivery::default()
            .with_live(channel.clone())
            .with_fallback(injector.clone());
        let coordinator = ApplyCoordinator::new(
            OriginColorStore::new(Arc::new(MemoryStore::new())),
            delivery,
            CoordinatorConfig {
                commit_policy: policy,
                default_color: default_base_color(),
            },
        );
        Self {
            coordinator,
            channel,
            injector,
        }
    }

    pub fn store(&self) -> &OriginColorStore<MemoryStore> {
        self.coordinator.store()
    }

    pub async fn recents(&self) -> Vec<String> {
        self.store()
            .get_recent_colors()
            .await
            .expect("read recents")
            .into_iter()
            .map(String::from)
            .collect()
    }
}
