//! Centipede - a tiny terminal shooter.
//!
//! - `geometry`: shapes and intersection predicates
//! - `entities`: pure game data
//! - `config`: tunables and command-line surface
//! - `compute`: the simulation step
//! - `gateway`: presentation/input contract and the driver loop
//! - `display`: crossterm implementation of the gateway

pub mod compute;
pub mod config;
pub mod display;
pub mod entities;
pub mod gateway;
pub mod geometry;
