use anyhow::Result;

use crate::message::Message;

use super::{connection::ClusterConnection, provider::ScopeList};

#[derive(Debug)]
pub enum ScopeMessage {
    Request(ScopeRequest),
    Response(ScopeResponse),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeRequest {
    /// Fetch the selectable scopes. Responses carry the same generation.
    List { generation: u64 },
    /// The committed scope changed.
    Set(String),
}

#[derive(Debug)]
pub enum ScopeResponse {
    List {
        generation: u64,
        result: Result<ScopeList>,
    },
    Connection {
        cluster: String,
        result: Result<ClusterConnection>,
    },
}

impl From<ScopeMessage> for Message {
    fn from(m: ScopeMessage) -> Self {
        Message::Scope(m)
    }
}

impl From<ScopeRequest> for Message {
    fn from(req: ScopeRequest) -> Self {
        Message::Scope(ScopeMessage::Request(req))
    }
}

impl From<ScopeResponse> for Message {
    fn from(res: ScopeResponse) -> Self {
        Message::Scope(ScopeMessage::Response(res))
    }
}
