//! Built-in systems
//!
//! Default priorities (lower updates first):
//!
//! | System            | Priority |
//! |-------------------|----------|
//! | [`InputSystem`]     | 0        |
//! | [`OrbitSystem`]     | 5        |
//! | [`PhysicsSystem`]   | 10       |
//! | [`RenderingSystem`] | 100      |
//! | [`StatsSystem`]     | 200      |
//!
//! Input runs before physics so velocities set from the keyboard are
//! integrated in the same frame; rendering sees the final transforms.

pub mod input_system;
pub mod orbit_system;
pub mod physics_system;
pub mod rendering_system;
pub mod stats_system;

pub use input_system::InputSystem;
pub use orbit_system::OrbitSystem;
pub use physics_system::PhysicsSystem;
pub use rendering_system::RenderingSystem;
pub use stats_system::StatsSystem;
