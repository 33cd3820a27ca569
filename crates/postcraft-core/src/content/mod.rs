//! Generated content: records, form inputs, requests, decoding and the state machine.

pub mod action;
pub mod decode;
pub mod machine;
pub mod model;
pub mod request;
pub mod sanitize;
pub mod state;

pub use action::{ContentAction, LengthMode, LlmModel, RegenerateOptions, WritingStyle};
pub use decode::{DecodeMode, ResponseShape, decode_content_response, unwrap_response_object};
pub use machine::{ContentMachine, RequestTicket, Routed};
pub use model::{ContentRecord, FormField, FormInputs};
pub use request::GenerateRequest;
pub use sanitize::{sanitize_result_text, strip_markdown_for_copy};
pub use state::{ContentState, InFlight};
