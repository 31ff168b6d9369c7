pub mod catalog;
pub mod directory;
pub mod health;
pub mod resources;
pub mod tenancy;
pub mod workspace;

#[cfg(test)]
mod tests;
