//! # Reelsmith Core
//!
//! Domain types, traits, and error definitions for the Reelsmith script
//! assistant. This crate has **no transport dependencies**: it defines the
//! movie script model, the tool vocabulary shared with the AI backend, and
//! the `Provider` trait that backends implement.
//!
//! ## Design Philosophy
//!
//! Every seam is a trait or a plain value type here. Implementations live in
//! their respective crates:
//! - `reelsmith-providers` talks to the generative backend
//! - `reelsmith-assistant` orchestrates turns and dispatches intents
//! - `reelsmith` (the CLI) owns script state and applies effects

pub mod error;
pub mod languages;
pub mod message;
pub mod provider;
pub mod scene;
pub mod tool;

// Re-export key types at crate root for ergonomics
pub use error::{Error, ProviderError, Result};
pub use languages::{Language, TRANSLATION_LANGUAGES};
pub use message::{Message, Part, Role};
pub use provider::{Provider, ProviderRequest, ProviderResponse, ToolMode};
pub use scene::{MovieScript, Scene};
pub use tool::{ToolDeclaration, ToolInvocation, ToolRegistry};
