//! # bikeshop-entity
//!
//! Domain entity models for the bike shop. Every struct in this crate
//! represents a database table row or a domain value object. Row types
//! additionally derive `sqlx::FromRow`.

pub mod ad;
pub mod booking;
pub mod catalog;
pub mod quote;
pub mod setting;
pub mod survey;
pub mod ticket;
pub mod user;
