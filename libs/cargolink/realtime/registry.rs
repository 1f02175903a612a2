//! Identity-keyed connection registry
//!
//! Holds at most one live [`RealtimeService`]. Acquiring for the identity
//! already held returns the same instance; acquiring for a different
//! identity destroys the prior instance first. The registry is an explicit
//! value owned by the caller, not module-level state, so "one connection per
//! identity" survives without a global singleton.

use crate::config::RealtimeConfig;
use crate::identity::Identity;
use crate::realtime::dispatcher::SoundHook;
use crate::realtime::invalidation::QueryInvalidator;
use crate::realtime::service::RealtimeService;
use crate::realtime::Result;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

pub struct ConnectionRegistry {
    ws_base_url: String,
    realtime: RealtimeConfig,
    invalidator: Arc<dyn QueryInvalidator>,
    sound_hook: Option<SoundHook>,
    slot: Mutex<Option<(Identity, Arc<RealtimeService>)>>,
}

impl ConnectionRegistry {
    pub fn new(
        ws_base_url: impl Into<String>,
        realtime: RealtimeConfig,
        invalidator: Arc<dyn QueryInvalidator>,
        sound_hook: Option<SoundHook>,
    ) -> Self {
        Self {
            ws_base_url: ws_base_url.into(),
            realtime,
            invalidator,
            sound_hook,
            slot: Mutex::new(None),
        }
    }

    /// Get the connection for an identity, creating it if needed
    ///
    /// Same identity: the held instance is returned as-is. Different
    /// identity: the held instance is destroyed (socket closed, listeners
    /// cleared) before the new one is built and connected.
    pub async fn acquire(&self, identity: Identity) -> Result<Arc<RealtimeService>> {
        let mut slot = self.slot.lock().await;

        if let Some((held, service)) = slot.as_ref() {
            if *held == identity {
                debug!(%identity, "reusing realtime connection");
                return Ok(Arc::clone(service));
            }
        }

        if let Some((previous, service)) = slot.take() {
            info!(%previous, next = %identity, "switching realtime identity");
            service.destroy().await?;
        }

        let service = Arc::new(RealtimeService::new(
            identity.clone(),
            &self.ws_base_url,
            &self.realtime,
            Arc::clone(&self.invalidator),
            self.sound_hook.clone(),
        ));
        service.connect().await?;

        *slot = Some((identity, Arc::clone(&service)));
        Ok(service)
    }

    /// Destroy the held connection, if any, and empty the slot
    ///
    /// The next `acquire` builds a genuinely new instance.
    pub async fn release(&self) -> Result<()> {
        if let Some((identity, service)) = self.slot.lock().await.take() {
            info!(%identity, "releasing realtime connection");
            service.destroy().await?;
        }
        Ok(())
    }

    /// The held connection, if any
    pub async fn current(&self) -> Option<Arc<RealtimeService>> {
        self.slot
            .lock()
            .await
            .as_ref()
            .map(|(_, service)| Arc::clone(service))
    }

    /// The identity of the held connection, if any
    pub async fn current_identity(&self) -> Option<Identity> {
        self.slot
            .lock()
            .await
            .as_ref()
            .map(|(identity, _)| identity.clone())
    }
}
