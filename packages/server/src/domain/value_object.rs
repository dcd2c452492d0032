//! Value objects of the matchmaking domain.

use std::fmt;

use uuid::Uuid;

use super::error::ValueObjectError;

/// Default bound on relayed chat text, in Unicode scalar values.
pub const DEFAULT_MAX_MESSAGE_CHARS: usize = 500;

/// Opaque identifier of one live transport connection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(String);

impl ConnectionId {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.is_empty() {
            return Err(ValueObjectError::EmptyConnectionId);
        }
        Ok(Self(value))
    }

    /// Generate a fresh random connection id
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for ConnectionId {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of one live pair, generated at match time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.is_empty() {
            return Err(ValueObjectError::EmptySessionId);
        }
        Ok(Self(value))
    }

    /// Generate a fresh random session id
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for SessionId {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Kind of chat a client asks to be paired for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChatKind {
    Text,
    Video,
}

impl ChatKind {
    pub const ALL: [ChatKind; 2] = [ChatKind::Text, ChatKind::Video];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChatKind::Text => "text",
            ChatKind::Video => "video",
        }
    }
}

impl TryFrom<&str> for ChatKind {
    type Error = ValueObjectError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "text" => Ok(ChatKind::Text),
            "video" => Ok(ChatKind::Video),
            other => Err(ValueObjectError::UnsupportedChatKind(other.to_string())),
        }
    }
}

impl fmt::Display for ChatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Chat text that is safe to relay: bounded in length and HTML-escaped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageText(String);

impl MessageText {
    /// Truncate `raw` to `max_chars` code points, then escape markup.
    ///
    /// Truncation happens first so an escape sequence is never cut in half.
    pub fn sanitize(raw: &str, max_chars: usize) -> Result<Self, ValueObjectError> {
        if raw.is_empty() {
            return Err(ValueObjectError::EmptyMessage);
        }
        let truncated: String = raw.chars().take(max_chars).collect();
        if truncated.is_empty() {
            return Err(ValueObjectError::EmptyMessage);
        }
        Ok(Self(escape_markup(&truncated)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

fn escape_markup(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Opaque WebRTC signaling payload. Never inspected, only relayed.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalPayload(serde_json::Value);

impl SignalPayload {
    pub fn new(value: serde_json::Value) -> Result<Self, ValueObjectError> {
        if value.is_null() {
            return Err(ValueObjectError::EmptySignal);
        }
        Ok(Self(value))
    }

    pub fn as_value(&self) -> &serde_json::Value {
        &self.0
    }

    pub fn into_value(self) -> serde_json::Value {
        self.0
    }
}

/// Unix timestamp in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }

    /// Milliseconds elapsed from `self` until `later`, floored at zero
    pub fn millis_until(&self, later: Timestamp) -> i64 {
        (later.0 - self.0).max(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_id_rejects_empty() {
        // テスト項目: 空文字列の ConnectionId は作成できない
        // given (前提条件):
        let empty = String::new();

        // when (操作):
        let result = ConnectionId::new(empty);

        // then (期待する結果):
        assert_eq!(result, Err(ValueObjectError::EmptyConnectionId));
    }

    #[test]
    fn test_generated_ids_are_unique() {
        // テスト項目: 生成された ID は互いに異なる
        // given (前提条件):

        // when (操作):
        let conn1 = ConnectionId::generate();
        let conn2 = ConnectionId::generate();
        let session1 = SessionId::generate();
        let session2 = SessionId::generate();

        // then (期待する結果):
        assert_ne!(conn1, conn2);
        assert_ne!(session1, session2);
        assert!(!session1.as_str().is_empty());
    }

    #[test]
    fn test_chat_kind_parses_supported_values() {
        // テスト項目: "text" と "video" だけが ChatKind として受け付けられる
        // given (前提条件):

        // when (操作):
        let text = ChatKind::try_from("text");
        let video = ChatKind::try_from("video");
        let audio = ChatKind::try_from("audio");
        let upper = ChatKind::try_from("TEXT");

        // then (期待する結果):
        assert_eq!(text, Ok(ChatKind::Text));
        assert_eq!(video, Ok(ChatKind::Video));
        assert_eq!(
            audio,
            Err(ValueObjectError::UnsupportedChatKind("audio".to_string()))
        );
        assert!(upper.is_err());
    }

    #[test]
    fn test_message_text_truncates_and_escapes() {
        // テスト項目: 1000 文字の <script> を含むメッセージが 500 文字に切り詰められ、エスケープされる
        // given (前提条件):
        let raw = format!("<script>{}", "a".repeat(992));
        assert_eq!(raw.chars().count(), 1000);

        // when (操作):
        let text = MessageText::sanitize(&raw, DEFAULT_MAX_MESSAGE_CHARS).unwrap();

        // then (期待する結果):
        let expected = format!("&lt;script&gt;{}", "a".repeat(492));
        assert_eq!(text.as_str(), expected);
        assert!(!text.as_str().contains('<'));
    }

    #[test]
    fn test_message_text_counts_code_points() {
        // テスト項目: 切り詰めはバイトではなくコードポイント単位で行われる
        // given (前提条件):
        let raw = "こんにちは世界";

        // when (操作):
        let text = MessageText::sanitize(raw, 5).unwrap();

        // then (期待する結果):
        assert_eq!(text.as_str(), "こんにちは");
    }

    #[test]
    fn test_message_text_escapes_quotes_and_ampersand() {
        // テスト項目: 属性値を壊しうる文字もエスケープされる
        // given (前提条件):
        let raw = r#"Tom & "Jerry" 'x'"#;

        // when (操作):
        let text = MessageText::sanitize(raw, DEFAULT_MAX_MESSAGE_CHARS).unwrap();

        // then (期待する結果):
        assert_eq!(
            text.as_str(),
            "Tom &amp; &quot;Jerry&quot; &#x27;x&#x27;"
        );
    }

    #[test]
    fn test_message_text_rejects_empty() {
        // テスト項目: 空メッセージ、または上限 0 で空になるメッセージは拒否される
        // given (前提条件):

        // when (操作):
        let empty = MessageText::sanitize("", DEFAULT_MAX_MESSAGE_CHARS);
        let zero_bound = MessageText::sanitize("hello", 0);

        // then (期待する結果):
        assert_eq!(empty, Err(ValueObjectError::EmptyMessage));
        assert_eq!(zero_bound, Err(ValueObjectError::EmptyMessage));
    }

    #[test]
    fn test_signal_payload_rejects_null() {
        // テスト項目: null のシグナルは拒否され、それ以外はそのまま保持される
        // given (前提条件):
        let offer = serde_json::json!({"sdp": "v=0", "type": "offer"});

        // when (操作):
        let null = SignalPayload::new(serde_json::Value::Null);
        let payload = SignalPayload::new(offer.clone());

        // then (期待する結果):
        assert_eq!(null, Err(ValueObjectError::EmptySignal));
        assert_eq!(payload.unwrap().into_value(), offer);
    }

    #[test]
    fn test_timestamp_millis_until_never_negative() {
        // テスト項目: 経過時間は負にならない
        // given (前提条件):
        let earlier = Timestamp::new(1_000);
        let later = Timestamp::new(4_500);

        // when (操作):

        // then (期待する結果):
        assert_eq!(earlier.millis_until(later), 3_500);
        assert_eq!(later.millis_until(earlier), 0);
    }
}
