// Service module exports

pub mod countdown;
pub mod database;
pub mod settings;
