pub mod client;
pub mod error;
pub mod resolver;
pub mod retry;
pub mod strategies;
pub mod user_agent;

pub use client::{HttpClient, HttpResponse};
pub use error::ScraperError;
pub use resolver::{ProfileResolver, ResolverEndpoints};
pub use retry::RetryPolicy;
pub use strategies::{default_strategies, PayloadKind, ProfileStrategy, StrategyInput, StrategyMiss};
