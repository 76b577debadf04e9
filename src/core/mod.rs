//! Core registry, normalization, and pipeline infrastructure.

pub mod auth_method;
pub mod logging;
pub mod models;
pub mod normalizer;
pub mod pipeline;
pub mod provider;
pub mod site_directory;
pub mod token;

pub use auth_method::AuthMethod;
pub use models::{
    AuthMethodPayload, CombinationPayload, ErrorReport, FixSuggestionReport, ProviderPayload,
    RobotOutput, TokenListPayload,
};
pub use normalizer::{
    NormalizationResult, NormalizeError, NormalizedTokens, Pagination, ResponseShape, normalize,
    normalize_response,
};
pub use pipeline::{FetchContext, TokenFetchOutcome, TokenRequest, collect_many, collect_tokens};
pub use provider::{ProviderRegistry, ProviderSpec, ProviderType};
pub use site_directory::{SiteDirectory, SiteRecord, SiteRecordConfig};
pub use token::{Expiry, Token, TokenStatus};
