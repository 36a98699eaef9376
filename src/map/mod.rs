//! This module defines level data: the character catalog, the level text parser and the
//! static geometry built from them.

pub mod biome;
pub mod catalog;
pub mod geometry;
pub mod parser;
