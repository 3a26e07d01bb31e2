pub mod components;
pub mod pipeline;
pub mod registration;
pub mod systems;
