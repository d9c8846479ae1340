pub mod commands;
pub mod copy;
pub mod media;
pub mod responses;
