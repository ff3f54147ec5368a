pub mod error;
pub mod jurisdiction;
pub mod progress;
pub mod query;
pub mod record;
pub mod token;

pub use error::PreconditionViolation;
pub use jurisdiction::Jurisdiction;
pub use progress::Progress;
pub use query::SearchQuery;
pub use record::SearchRecord;
pub use token::SessionToken;
