//! # Base types for chessrules
//!
//! This is an auxiliary crate for `chessrules`, which contains plain value types. It is split from
//! the main crate, so everything declared here can be used in the build script for `chessrules`.
//!
//! Normally you don't want to use this crate directly. Use `chessrules` instead.

pub mod bitboard;
pub mod bitboard_consts;
pub mod geometry;
pub mod types;
