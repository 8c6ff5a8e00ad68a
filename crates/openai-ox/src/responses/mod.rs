//! OpenAI Responses API
//!
//! Input and output are heterogeneous item lists. Output items are kept as raw
//! JSON on [`ResponsesResponse`] and decoded one at a time by
//! [`ResponsesResponse::items`], so one malformed item does not hide the rest.

pub mod request;
pub mod response;

pub use request::{
    InputContent, InputItem, InputRole, ReasoningConfig, ReasoningEffort, ResponsesRequest,
    ResponsesTool, SummaryPart, TextConfig, TextFormat,
};
pub use response::{
    MalformedItem, OutputContent, OutputItem, ResponsesResponse, ResponsesUsage,
};
