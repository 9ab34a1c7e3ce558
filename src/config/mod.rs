pub mod credentials;
pub mod schema;
pub mod storage;
pub mod validation;

pub use credentials::*;
pub use schema::*;
pub use storage::*;
pub use validation::*;
