// Module exports for models

pub mod colour;
pub mod countdown;
pub mod settings;
