pub mod exchange_rate;
pub mod http;

pub use exchange_rate::RateResolver;
pub use http::{create_client, header_map, require_status_ok, FetchedResponse, ResilientFetcher, Target};
