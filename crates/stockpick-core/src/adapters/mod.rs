pub mod fixture;
pub mod http;

pub use fixture::FixtureSearchSource;
pub use http::HttpSearchSource;
