// ~/ignite/src/lib.rs
//! Ignite: theme state for the modern shell surfaces.
//!
//! Services are plain values owned by the host application:
//! [`animation::AnimationRegistry`] tracks per-window animations on one shared
//! timer, [`attributes::WindowAttributeStore`] keeps acrylic/corner/shadow/blur
//! flags, and [`render::RenderContext`] owns the graphics devices and the live
//! [`config::ThemeConfig`]. Everything talks to the windowing system through
//! [`platform::WindowHost`].

pub mod logging;
pub mod paths;
pub mod error;
pub mod config;
pub mod easing;
pub mod platform;
pub mod animation;
pub mod attributes;
pub mod render;
pub mod visual;
pub mod boot;
pub mod snap;
pub mod sequencer;
pub mod status;

pub use animation::{AnimationEntry, AnimationKind, AnimationRegistry, RegistryOptions, TickReport};
pub use attributes::{WindowAttributeStore, WindowAttributes};
pub use config::ThemeConfig;
pub use error::{Result, ThemeError};
pub use platform::{Clock, WindowHost, WindowId};
pub use render::RenderContext;
