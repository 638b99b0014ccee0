pub mod errors;
pub mod id;

pub use errors::{ConfigError, OramaError};
pub use id::{new_id, new_visitor_id, SessionId};

pub type Result<T> = std::result::Result<T, OramaError>;
