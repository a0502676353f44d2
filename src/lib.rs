pub mod config;
pub mod episode;
pub mod error;
pub mod library;
pub mod matcher;
pub mod navigator;
pub mod pattern;
pub mod pointer;
pub mod probe;
pub mod selector;
pub mod tags;
