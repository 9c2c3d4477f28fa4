pub mod periods;
pub mod sites;
