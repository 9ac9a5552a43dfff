//! # Request and Response Pipelines
//!
//! Cancelable chains a task runs around the fetch:
//!
//! ```text
//! ModifierPipeline -> fetch -> ValidatorChain -> Decoder
//!                        \-> RecoveryPipeline (on failure)
//! ```
//!
//! Modifier and recovery runs are last-writer-wins through [`InvocationSlot`].

pub mod decoder;
pub mod invocation;
pub mod modifier;
pub mod recovery;
pub mod validator;

pub use decoder::{BytesDecoder, Decoder, ErrorBodyDecoder, JsonDecoder, JsonErrorBodyDecoder, Utf8Decoder};
pub use invocation::InvocationSlot;
pub use modifier::{FnModifier, HeaderModifier, ModifierPipeline, RequestModifier};
pub use recovery::{
    RecoveryAction, RecoveryContext, RecoveryOption, RecoveryOutcome, RecoveryPipeline,
    RecoveryStrategy, RetryOn, RetryPromptStrategy, RetryStrategy,
};
pub use validator::{
    ContentTypeValidator, NonEmptyBodyValidator, ResponseValidator, StatusCodeValidator,
    ValidatorChain,
};
