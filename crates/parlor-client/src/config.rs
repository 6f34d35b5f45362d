//! Server endpoint configuration.

/// Endpoints for one chat server deployment.
///
/// The HTTP base serves history and directory calls; the WebSocket base
/// serves the per-room event stream. Both are stored without a trailing
/// slash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    http_base: String,
    ws_base: String,
}

impl ServerConfig {
    /// Create a config from explicit HTTP and WebSocket base URLs.
    pub fn new(http_base: impl Into<String>, ws_base: impl Into<String>) -> Self {
        Self {
            http_base: trim_base(http_base.into()),
            ws_base: trim_base(ws_base.into()),
        }
    }

    /// Derive the WebSocket base from the HTTP base (`http` becomes `ws`,
    /// `https` becomes `wss`).
    pub fn from_http_base(http_base: impl Into<String>) -> Self {
        let http_base = trim_base(http_base.into());
        let ws_base = if let Some(rest) = http_base.strip_prefix("https://") {
            format!("wss://{rest}")
        } else if let Some(rest) = http_base.strip_prefix("http://") {
            format!("ws://{rest}")
        } else {
            http_base.clone()
        };
        Self { http_base, ws_base }
    }

    /// History endpoint for a room.
    #[must_use]
    pub fn history_url(&self, room_id: &str) -> String {
        format!("{}/chat/rooms/{room_id}/messages", self.http_base)
    }

    /// Room directory endpoint (list and create).
    #[must_use]
    pub fn rooms_url(&self) -> String {
        format!("{}/chat/rooms", self.http_base)
    }

    /// Username registration endpoint.
    #[must_use]
    pub fn username_url(&self) -> String {
        format!("{}/chat/username", self.http_base)
    }

    /// Event stream endpoint for a room and user.
    #[must_use]
    pub fn stream_url(&self, room_id: &str, username: &str) -> String {
        format!("{}/ws/{room_id}/{username}", self.ws_base)
    }
}

fn trim_base(mut base: String) -> String {
    while base.ends_with('/') {
        base.pop();
    }
    base
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_endpoint_urls() {
        let config = ServerConfig::new("https://chat.example.org/", "wss://chat.example.org");

        assert_eq!(config.history_url("r1"), "https://chat.example.org/chat/rooms/r1/messages");
        assert_eq!(config.rooms_url(), "https://chat.example.org/chat/rooms");
        assert_eq!(config.username_url(), "https://chat.example.org/chat/username");
        assert_eq!(config.stream_url("r1", "alice"), "wss://chat.example.org/ws/r1/alice");
    }

    #[test]
    fn derives_ws_scheme_from_http() {
        let secure = ServerConfig::from_http_base("https://chat.example.org");
        assert_eq!(secure.stream_url("r", "u"), "wss://chat.example.org/ws/r/u");

        let plain = ServerConfig::from_http_base("http://localhost:8000");
        assert_eq!(plain.stream_url("r", "u"), "ws://localhost:8000/ws/r/u");
    }
}
