//! Assistant turn orchestration — the heart of Reelsmith.
//!
//! One user turn flows through:
//!
//! 1. **Context** — the current script is rendered into a grounding block
//! 2. **Encode** — anchor images become inline media parts
//! 3. **Send** — one complete (non-streamed) request on the chat session
//! 4. **Classify** — tool invocations, embedded script JSON, or plain text
//! 5. **Dispatch** — recognized intents go to the caller's effect callbacks
//!
//! The caller gets back a single confirmation or reply text per turn.

pub mod context;
pub mod dispatcher;
pub mod effects;
pub mod encoder;
pub mod fallback;
pub mod intent;
pub mod oneshot;
pub mod session;
pub mod tools;

pub use dispatcher::{AssistantReply, DispatchOutcome, dispatch};
pub use effects::Effects;
pub use encoder::{AnchorImages, EncodedMedia, Media};
pub use intent::{Intent, IntentKind, ThumbnailRequest, TranslationPayload};
pub use oneshot::OneShotClient;
pub use session::{ChatSession, SessionFactory, SessionSettings};
