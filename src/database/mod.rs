pub mod db;
pub mod db_structs;
pub mod json_store;
