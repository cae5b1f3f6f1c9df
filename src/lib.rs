pub mod config;
pub mod deriver;
pub mod kernel;
pub mod proof;
pub mod report;
pub mod rules;
pub mod strength;
pub mod syntax;

#[cfg(test)]
mod tests;
