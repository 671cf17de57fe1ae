pub mod api;
pub mod common;
pub mod db;
pub mod storage;
