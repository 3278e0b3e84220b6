#[path = "helpers/mod.rs"]
mod helpers;

#[path = "pipeline/mod.rs"]
mod pipeline;

#[path = "aspects/mod.rs"]
mod aspects;
