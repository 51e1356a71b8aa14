//! musictube: a music catalog fed by a JSON library file, the local
//! filesystem and search results, with a terminal browser on top.
//!
//! The [`catalog::Catalog`] is the shared index every producer writes into;
//! the remaining modules are producers ([`library`], [`search`]) or front
//! ends ([`app`], [`ui`], [`runtime`], [`cli`]).

pub mod app;
pub mod audio;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod library;
pub mod runtime;
pub mod search;
pub mod ui;
