pub mod composite;
pub mod placement;
