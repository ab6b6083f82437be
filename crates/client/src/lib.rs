//! GatherLove client library.
//!
//! Typed access to the GatherLove crowdfunding platform: the session
//! lifecycle against the identity backend, bearer-token transport shared by
//! every endpoint wrapper, a pure access-guard state machine for role-gated
//! areas, and the wallet/donation/campaign/admin/announcement APIs of the
//! core application backend.
//!
//! # Architecture
//!
//! Two distinct backends are consumed: the identity service (login, register,
//! identity resolution, role upgrade) and the core application service
//! (everything under `/api`). Both are reached through [`transport::Http`]
//! clients that read the current bearer token lazily at request-send time
//! from a shared slot, so a login or logout takes effect on the very next
//! request with no wiring at call sites.
//!
//! The [`Client`] is the dependency-injected root: construct it from a
//! [`config::ClientConfig`], call [`session::SessionManager::initialize`]
//! once, and hand references to whatever needs them. There is no ambient
//! global state.
//!
//! ```no_run
//! use gatherlove_client::{Client, config::ClientConfig};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::new(ClientConfig::from_env()?)?;
//! client.session().initialize().await?;
//! # Ok(())
//! # }
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod error;
pub mod guard;
pub mod models;
pub mod session;
pub mod token;
pub mod transport;

use crate::api::admin::AdminApi;
use crate::api::announcements::AnnouncementsApi;
use crate::api::campaigns::CampaignsApi;
use crate::api::donations::DonationsApi;
use crate::api::wallet::WalletApi;
use crate::config::ClientConfig;
use crate::error::ConfigError;
use crate::session::SessionManager;
use crate::token::{TokenSlot, TokenStore};
use crate::transport::Http;

/// Root handle over both backends.
///
/// Owns the session manager and one wrapper per endpoint area. Cloning is
/// cheap; all clones share the same session and token slot.
#[derive(Debug, Clone)]
pub struct Client {
    session: SessionManager,
    wallet: WalletApi,
    donations: DonationsApi,
    campaigns: CampaignsApi,
    admin: AdminApi,
    announcements: AnnouncementsApi,
}

impl Client {
    /// Create a client from configuration.
    ///
    /// This performs no I/O; call [`SessionManager::initialize`] to rehydrate
    /// a persisted session before making access-control decisions.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the state directory cannot be prepared.
    pub fn new(config: ClientConfig) -> Result<Self, ConfigError> {
        let slot = TokenSlot::default();
        let store = TokenStore::new(config.state_dir.clone())?;

        let auth = Http::new(config.auth_url.clone(), slot.clone());
        let api = Http::new(config.api_url.clone(), slot.clone());

        let session = SessionManager::new(auth, store.clone(), slot);

        Ok(Self {
            wallet: WalletApi::new(api.clone()),
            donations: DonationsApi::new(api.clone()),
            campaigns: CampaignsApi::new(api.clone()),
            admin: AdminApi::new(api.clone(), store.clone()),
            announcements: AnnouncementsApi::new(api, store),
            session,
        })
    }

    /// The session manager (login, logout, register, profile).
    #[must_use]
    pub const fn session(&self) -> &SessionManager {
        &self.session
    }

    /// Wallet operations (balance, transactions, top-ups).
    #[must_use]
    pub const fn wallet(&self) -> &WalletApi {
        &self.wallet
    }

    /// Donation operations.
    #[must_use]
    pub const fn donations(&self) -> &DonationsApi {
        &self.donations
    }

    /// Campaign browsing and fundraiser CRUD.
    #[must_use]
    pub const fn campaigns(&self) -> &CampaignsApi {
        &self.campaigns
    }

    /// Admin moderation console operations.
    #[must_use]
    pub const fn admin(&self) -> &AdminApi {
        &self.admin
    }

    /// Announcement operations (public list, admin create/delete).
    #[must_use]
    pub const fn announcements(&self) -> &AnnouncementsApi {
        &self.announcements
    }
}
