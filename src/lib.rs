// src/lib.rs

pub mod catalog;
pub mod classify;
pub mod db;
pub mod error;
pub mod keywords;
pub mod miner;
pub mod model;
pub mod scanner;
pub mod stream;
