use std::future::Future;
use std::sync::{Arc, OnceLock};

use anyhow::Result;
use async_trait::async_trait;

use super::error::SchedulerError;
use super::models::AuctionId;

/// Domain close action invoked when an auction's countdown expires.
///
/// Implementations determine the winning bid, persist the final auction state
/// and notify participants. They must be idempotent: a countdown fire may race
/// a manual close path, so verify the auction is still open before mutating.
/// Any timeout or retry policy for the action's own I/O belongs to the
/// implementation; the scheduler applies none.
#[async_trait]
pub trait EndAction: Send + Sync {
    async fn end_auction(&self, auction_id: AuctionId) -> Result<()>;
}

/// Adapter implementing [`EndAction`] for async closures.
pub struct FnEndAction<F>(F);

impl<F, Fut> FnEndAction<F>
where
    F: Fn(AuctionId) -> Fut + Send + Sync,
    Fut: Future<Output = Result<()>> + Send,
{
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

#[async_trait]
impl<F, Fut> EndAction for FnEndAction<F>
where
    F: Fn(AuctionId) -> Fut + Send + Sync,
    Fut: Future<Output = Result<()>> + Send,
{
    async fn end_auction(&self, auction_id: AuctionId) -> Result<()> {
        (self.0)(auction_id).await
    }
}

/// One-shot slot holding the process-wide close action.
///
/// The scheduler depends only on the [`EndAction`] seam; the concrete domain
/// implementation is supplied once at startup, either at construction or via a
/// single `bind` call before request handling starts.
pub(crate) struct ActionBinding {
    slot: OnceLock<Arc<dyn EndAction>>,
}

impl ActionBinding {
    pub(crate) fn empty() -> Self {
        Self {
            slot: OnceLock::new(),
        }
    }

    pub(crate) fn bound(action: Arc<dyn EndAction>) -> Self {
        Self {
            slot: OnceLock::from(action),
        }
    }

    pub(crate) fn bind(&self, action: Arc<dyn EndAction>) -> Result<(), SchedulerError> {
        self.slot
            .set(action)
            .map_err(|_| SchedulerError::AlreadyBound)
    }

    pub(crate) fn get(&self) -> Option<Arc<dyn EndAction>> {
        self.slot.get().cloned()
    }

    pub(crate) fn is_bound(&self) -> bool {
        self.slot.get().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    struct NoopAction;

    #[async_trait]
    impl EndAction for NoopAction {
        async fn end_auction(&self, _auction_id: AuctionId) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_binding_is_one_shot() {
        let binding = ActionBinding::empty();
        assert!(!binding.is_bound());

        binding.bind(Arc::new(NoopAction)).unwrap();
        assert!(binding.is_bound());

        let err = binding.bind(Arc::new(NoopAction)).unwrap_err();
        assert_eq!(err, SchedulerError::AlreadyBound);
    }

    #[test]
    fn test_bound_at_construction_rejects_rebind() {
        let binding = ActionBinding::bound(Arc::new(NoopAction));
        assert!(binding.is_bound());
        assert_eq!(
            binding.bind(Arc::new(NoopAction)).unwrap_err(),
            SchedulerError::AlreadyBound
        );
    }

    #[tokio::test]
    async fn test_fn_end_action_forwards_to_closure() {
        let action = FnEndAction::new(|auction_id: AuctionId| async move {
            if auction_id.0 < 0 {
                Err(anyhow!("negative auction id {}", auction_id))
            } else {
                Ok(())
            }
        });

        assert!(action.end_auction(AuctionId(1)).await.is_ok());
        assert!(action.end_auction(AuctionId(-1)).await.is_err());
    }
}
