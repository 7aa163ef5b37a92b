pub mod types;
pub mod wire;

pub use types::{
    display_scalar, numeric_scalar, Analytics, ChartType, Message, MessageKind, Reply, Role, Row,
    Visualization,
};
pub use wire::{canonicalize_legacy, parse_reply, reply_from_value, ChatRequest};
