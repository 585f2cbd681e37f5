//! SweetBite Core - Foundational types for the topping visualizer
//!
//! This crate provides the types the simulation and its hosts share:
//! - `Camera` - Perspective camera with view/projection and unprojection
//! - `Ray` - World-space ray built from normalized device coordinates
//! - `Viewport` - Pixel rectangle to NDC conversion for pointer input
//! - Error types and Result alias

mod camera;
mod error;
mod ray;

pub use camera::{Camera, Viewport};
pub use error::{Result, ToppingError};
pub use ray::Ray;
