pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod repositories;
pub mod search;
pub mod services;
