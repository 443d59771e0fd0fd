pub mod factory;
pub mod locks;
pub mod repositories;
