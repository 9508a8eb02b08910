//! Dining Concierge - conversational restaurant search and reservations
//!
//! This crate turns free-form Japanese dining requests into restaurant
//! suggestions and walks the user through a reservation dialogue.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
