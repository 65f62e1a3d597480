pub mod feedback;
pub mod generation;
pub mod submissions;
pub mod templates;
