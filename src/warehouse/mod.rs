mod models;
mod schema;
mod statements;
mod store;

pub use models::*;
pub use schema::WAREHOUSE_SCHEMA;
pub use statements::{SqliteStatements, Statements};
pub use store::{Loader, SongLookup, SongMatch, Warehouse};
