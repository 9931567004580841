//! Data types shared by the reducer, the outline parser and the client.

mod outline;
mod request;

pub use outline::{OutlineIter, OutlineNode, ROOT_ID, ROOT_LABEL};
pub use request::{DocType, DocumentRequest, MindmapResponse, TextRequest, DEFAULT_MAX_DEPTH};
