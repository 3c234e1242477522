//! Mini Feed Client - backend access and the posting flow
//!
//! Builds on `minifeed-core` with everything that needs the network or a
//! session: the HTTP client, credential storage, post submission and the
//! in-memory feed.
//!
//! # Module Structure
//!
//! - `api` - `ApiClient` and the `PostsApi`/`AuthApi` seams
//! - `auth` - Register, OTP login and logout
//! - `config` - Backend URL and timeout
//! - `credentials` - Token and user kept in a `KeyValueStore`
//! - `feed` - The post collection with its in-flight guards
//! - `store` - Memory and JSON file key-value stores
//! - `submit` - Validate, compress, size-check and upload a post

pub mod api;
pub mod auth;
pub mod config;
pub mod credentials;
pub mod feed;
pub mod store;
pub mod submit;

pub use api::{ApiClient, ApiError, AuthApi, PostsApi};
pub use auth::{AuthError, AuthService};
pub use config::ClientConfig;
pub use credentials::{Credentials, StoredAuth};
pub use feed::{Feed, FeedState, FetchOutcome};
pub use store::{FileStore, KeyValueStore, MemoryStore, StoreError};
pub use submit::{submit_compressed, submit_post, SubmitError};
