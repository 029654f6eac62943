//! User-facing texts shown by the chat screen.

/// First assistant message of a new conversation.
pub const WELCOME: &str =
    "Xin chào! Mình là Banana của bạn. Bạn có thể chia sẻ bất cứ điều gì với Banana nhé 💙";

/// Shown after an encryption or transport failure; the user may retry.
pub const SEND_FAILED: &str = "Không thể gửi tin nhắn. Vui lòng thử lại.";

/// Replaces stored content that cannot be decrypted for display.
pub const CONTENT_UNAVAILABLE: &str = "[Nội dung không khả dụng]";

/// Assistant text used when the server reply is empty.
pub const REPLY_FALLBACK: &str = "Xin lỗi, tôi không thể trả lời lúc này.";
