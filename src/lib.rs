pub mod backend;
pub mod config;
pub mod dto;
pub mod error;
pub mod models;
pub mod money;
pub mod polling;
pub mod pricing;
pub mod response;
pub mod routes;
pub mod services;
pub mod spin;
pub mod state;
pub mod ui;
pub mod view;
