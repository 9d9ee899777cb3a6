//! Main module for pdf-asdl library functionality

pub mod ast;
pub mod config;
pub mod corpus;
pub mod expr;
pub mod formats;
pub mod grammar;
pub mod testing;
pub mod transition;
