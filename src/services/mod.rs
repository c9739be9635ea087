pub mod mongodump;
pub mod mongorestore;
pub mod process;
