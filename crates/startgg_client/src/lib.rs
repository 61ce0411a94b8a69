//! start.gg GraphQL client for bracket data
//!
//! - `Fetcher` runs one logical query page by page until the server runs out of pages
//! - every page request goes through a fixed retry policy (`RetryPolicy`, `RetryState`)
//! - wire payloads are decoded into `schema` types with every field optional and
//!   converted once into the `model` types the analyzers consume
//!
//! Endpoint: https://api.start.gg/gql/alpha (POST, bearer PAT)

pub mod config;
pub mod fetcher;
pub mod model;
pub mod queries;
pub mod retry;
pub mod schema;
pub mod transport;

pub use config::ClientConfig;
pub use fetcher::{Fetcher, PageOutcome};
pub use model::{
    filter_sets_by_entrant, Entrant, EntrantId, EventInfo, EventStatus, MatchSet, PhaseGroup,
    PhaseRound, SetState, Slot, Standing, StandingStats,
};
pub use retry::{RetryPolicy, RetryState};
pub use transport::{GraphqlRequest, ReqwestTransport, Transport, TransportError};
