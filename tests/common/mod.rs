//! Shared end-action doubles for scheduler integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use gavel_scheduler::scheduler::{AuctionId, EndAction};
use tokio::time::Instant;

/// End action that records every invocation with the instant it ran.
#[derive(Default)]
pub struct RecordingAction {
    closed: Mutex<Vec<(AuctionId, Instant)>>,
}

impl RecordingAction {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn closed(&self) -> Vec<(AuctionId, Instant)> {
        self.closed.lock().unwrap().clone()
    }

    pub fn count_for(&self, auction_id: AuctionId) -> usize {
        self.closed
            .lock()
            .unwrap()
            .iter()
            .filter(|(id, _)| *id == auction_id)
            .count()
    }
}

#[async_trait]
impl EndAction for RecordingAction {
    async fn end_auction(&self, auction_id: AuctionId) -> Result<()> {
        self.closed
            .lock()
            .unwrap()
            .push((auction_id, Instant::now()));
        Ok(())
    }
}

/// End action that always fails, standing in for a broken persistence layer.
pub struct FailingAction;

#[async_trait]
impl EndAction for FailingAction {
    async fn end_auction(&self, auction_id: AuctionId) -> Result<()> {
        Err(anyhow!(
            "persistence unavailable while closing auction {}",
            auction_id
        ))
    }
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .try_init();
}
