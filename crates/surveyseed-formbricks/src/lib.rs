//! Formbricks integration for surveyseed.
//!
//! Maps generated surveys and answer sets into the payloads of the Formbricks
//! management API and uploads them. The mappers ([`blocks`], [`response`])
//! are pure; [`client`] and [`upload`] do the network work; [`seed`] strings
//! the two upload phases together over any
//! [`BlobStore`](surveyseed_core::store::BlobStore).
//!
//! ```rust,ignore
//! let creds = precondition::can_proceed(env_id, api_key, &store).await?;
//! let client = FormbricksClient::new(api_config)?;
//! let report = Seeder::new(&store, &client, creds.environment_id).seed().await?;
//! ```

// Native `async fn` in traits; `ManagementApi` spells out its `Send` bounds.
#![allow(async_fn_in_trait)]

pub mod blocks;
pub mod client;
pub mod error;
pub mod payload;
pub mod precondition;
pub mod response;
pub mod seed;
pub mod upload;

pub use client::{ApiConfig, FormbricksClient, ManagementApi};
pub use error::{Error, MapError, Result};
pub use precondition::{Credentials, NotReady};
pub use seed::{SeedReport, Seeder};
