//! Dialogue Engine - Graph-Driven Customer Support Bot
//!
//! This crate implements a finite-state dialogue engine for customer support
//! conversations, combining LLM slot classification with deterministic
//! graph-based turn resolution.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
