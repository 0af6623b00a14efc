//! Shared application state handed to every route.

use std::sync::Arc;

use skillpassport_chain::{ChainAnchorer, NftMinter, PlaceholderAnchorer, PlaceholderMinter};

use crate::auth::{CapabilityChecker, SesskeyIssuer};
use crate::config::PassportSettings;
use crate::directory::Directory;
use crate::store::PassportStore;

/// Everything a request handler needs, cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn PassportStore>,
    pub directory: Arc<dyn Directory>,
    pub capabilities: Arc<dyn CapabilityChecker>,
    pub anchorer: Arc<dyn ChainAnchorer>,
    pub minter: Arc<dyn NftMinter>,
    pub sesskeys: SesskeyIssuer,
    pub settings: Arc<PassportSettings>,
}

impl AppState {
    /// State wired with the placeholder anchorer and minter.
    pub fn new(
        store: Arc<dyn PassportStore>,
        directory: Arc<dyn Directory>,
        capabilities: Arc<dyn CapabilityChecker>,
        sesskeys: SesskeyIssuer,
        settings: PassportSettings,
    ) -> Self {
        Self {
            store,
            directory,
            capabilities,
            anchorer: Arc::new(PlaceholderAnchorer),
            minter: Arc::new(PlaceholderMinter),
            sesskeys,
            settings: Arc::new(settings),
        }
    }

    pub fn with_anchorer(mut self, anchorer: Arc<dyn ChainAnchorer>) -> Self {
        self.anchorer = anchorer;
        self
    }

    pub fn with_minter(mut self, minter: Arc<dyn NftMinter>) -> Self {
        self.minter = minter;
        self
    }
}
