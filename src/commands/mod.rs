//! Módulo de comandos do Bellows

pub mod local;
pub mod parse;
pub mod probe;
pub mod report;
