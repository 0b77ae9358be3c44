//! TradeSim core: an in-memory world of products, suppliers and
//! companies, mutated tick by tick by a handful of stochastic events,
//! with JSON snapshots of the whole world.

pub mod availability_routine;
pub mod budget_recharge_routine;
pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod inflation_routine;
pub mod journal;
pub mod model;
pub mod name_generator;
pub mod pricing;
pub mod repository;
pub mod restock_routine;
pub mod rng;
pub mod routine;
pub mod scheduler;
pub mod snapshot;
pub mod store;
pub mod supplier_recharge_routine;
pub mod types;
pub mod world;
