pub mod db;
mod sqlite_impl;
mod unit_of_work;

pub use sqlite_impl::SqliteDatabase;
pub use unit_of_work::SqliteUnitOfWork;
