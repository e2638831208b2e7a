pub mod event;
pub mod level;
pub mod resources;
pub mod session;
pub mod step;
pub mod world;
