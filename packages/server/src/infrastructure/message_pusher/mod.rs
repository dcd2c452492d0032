//! メッセージ送信（通知）の実装
//!
//! - `websocket`: 接続ごとの送信キューを使った実装

pub mod websocket;

pub use websocket::WebSocketMessagePusher;
