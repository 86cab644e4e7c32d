// fastcart/app/src/lib.rs

//! HTTP service around the `fastcart` order core: configuration, Postgres
//! storage, request models and actix-web routes.

pub mod config;
pub mod db;
pub mod errors;
pub mod models;
pub mod services;
pub mod state;
pub mod web;
