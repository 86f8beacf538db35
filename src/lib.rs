//! # Retail Intake
//!
//! A batch import pipeline for retailer records with photo-source
//! resolution.
//!
//! Retail Intake ingests batches of semi-structured retailer records
//! (spreadsheet exports) together with their uploaded photo binaries,
//! resolves each record's photo reference to a stored or referenced
//! image, and persists the records to SQLite — one row at a time, so a
//! bad row never takes the batch down with it.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────────────────────┐   ┌──────────┐
//! │ Batch payload│──▶│  Pipeline                     │──▶│  SQLite  │
//! │ + uploads    │   │ validate → resolve → write    │   │ retailers│
//! └──────────────┘   └──────────────┬───────────────┘   └────┬─────┘
//!                                   │                        │
//!                     local upload ─┼─ drive fetch           │
//!                      passthrough ─┘    (fallback)          │
//!                                                            │
//!                       ┌──────────┐       ┌──────────┐      │
//!                       │   CLI    │       │   HTTP   │◀─────┘
//!                       │(rintake) │       │  (axum)  │
//!                       └──────────┘       └──────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! rintake init                                  # create database
//! rintake import --data batch.json --photos ./photos
//! rintake stats
//! rintake serve                                 # start HTTP intake
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Core data types |
//! | [`payload`] | Inbound batch normalization |
//! | [`resolve`] | Photo reference decision and execution |
//! | [`drive`] | Drive link id extraction and download |
//! | [`storage`] | Local photo storage area |
//! | [`writer`] | Per-row persistence |
//! | [`import`] | Batch orchestration |
//! | [`server`] | HTTP intake server |
//! | [`stats`] | Store statistics |
//! | [`db`] | Database connection |
//! | [`migrate`] | Schema migrations |

pub mod config;
pub mod db;
pub mod drive;
pub mod import;
pub mod migrate;
pub mod models;
pub mod payload;
pub mod resolve;
pub mod server;
pub mod stats;
pub mod storage;
pub mod writer;
