pub mod feedback;
pub mod snapshot;
