pub mod database;
pub mod error;
pub mod live;
pub mod models;
pub mod services;
pub mod state;
pub mod web;
