//! Styleforge - Adaptive Prompt Generation Engine
//!
//! This crate decides what to ask an image-generation provider for: it
//! scores how specific a user's command is, draws fashion attributes from a
//! per-user Thompson Sampling bandit at a matching temperature, renders a
//! weighted prompt under a token budget, caches the result behind a
//! single-flight LRU cache, and learns from feedback to make the next draw
//! better.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
