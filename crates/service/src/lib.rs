//! Domain layer for the recommender backend.
//!
//! Everything here is web-framework agnostic: the snapshot store owns the
//! durable state, and the account/newsletter/chat services implement the
//! business rules on top of it.

pub mod accounts;
pub mod chat;
pub mod errors;
pub mod newsletter;
pub mod runtime;
pub mod storage;
