//! Domain logic for server-side operations.
//!
//! This module contains pure functions that implement business logic
//! without side effects, making them easy to test.

use crate::server::palette::RESET_COLOR;

/// Render a chat line: `<color><name><reset>: <body>`.
///
/// # Arguments
///
/// * `name` - The sender's display name
/// * `color` - The ANSI color assigned to the sender
/// * `body` - The raw chat text as received from the sender
pub fn format_chat_line(name: &str, color: &str, body: &str) -> String {
    format!("{}{}{}: {}", color, name, RESET_COLOR, body)
}

/// Render a join notice: `<color><name><reset> has joined the chat!`.
pub fn format_join_notice(name: &str, color: &str) -> String {
    format!("{}{}{} has joined the chat!", color, name, RESET_COLOR)
}

/// Render a departure notice: `<color><name><reset> has left the chat.`.
pub fn format_leave_notice(name: &str, color: &str) -> String {
    format!("{}{}{} has left the chat.", color, name, RESET_COLOR)
}

/// Normalize one inbound payload: strip the line terminator and decide
/// whether it is worth relaying.
///
/// # Returns
///
/// The trimmed line, or `None` if the payload is empty after trimming
/// (blank lines are dropped, not relayed).
pub fn normalize_inbound_line(raw: &str) -> Option<&str> {
    let line = raw.trim_end_matches(['\r', '\n']);
    if line.is_empty() { None } else { Some(line) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::palette::PALETTE;

    #[test]
    fn test_format_chat_line_wraps_name_in_color_codes() {
        // テスト項目: チャット行が <color><name><reset>: <body> 形式になる
        // given (前提条件):
        let color = PALETTE[0];

        // when (操作):
        let line = format_chat_line("alice", color, "hello world");

        // then (期待する結果):
        assert_eq!(line, format!("{}alice{}: hello world", color, RESET_COLOR));
    }

    #[test]
    fn test_format_join_notice_uses_fixed_suffix() {
        // テスト項目: join 通知が固定の接尾辞を持つ
        // given (前提条件):
        let color = PALETTE[1];

        // when (操作):
        let line = format_join_notice("bob", color);

        // then (期待する結果):
        assert_eq!(
            line,
            format!("{}bob{} has joined the chat!", color, RESET_COLOR)
        );
    }

    #[test]
    fn test_format_leave_notice_uses_fixed_suffix() {
        // テスト項目: leave 通知が固定の接尾辞を持つ
        // given (前提条件):
        let color = PALETTE[2];

        // when (操作):
        let line = format_leave_notice("carol", color);

        // then (期待する結果):
        assert_eq!(
            line,
            format!("{}carol{} has left the chat.", color, RESET_COLOR)
        );
    }

    #[test]
    fn test_normalize_inbound_line_strips_terminators() {
        // テスト項目: 行末の改行・復帰文字が取り除かれる
        // given (前提条件):
        let raw = "hello\r\n";

        // when (操作):
        let result = normalize_inbound_line(raw);

        // then (期待する結果):
        assert_eq!(result, Some("hello"));
    }

    #[test]
    fn test_normalize_inbound_line_drops_empty_payload() {
        // テスト項目: 空のペイロードは None になる
        // given (前提条件):
        let raw = "";

        // when (操作):
        let result = normalize_inbound_line(raw);

        // then (期待する結果):
        assert_eq!(result, None);
    }

    #[test]
    fn test_normalize_inbound_line_drops_bare_newline() {
        // テスト項目: 改行のみのペイロードは None になる
        // given (前提条件):
        let raw = "\r\n";

        // when (操作):
        let result = normalize_inbound_line(raw);

        // then (期待する結果):
        assert_eq!(result, None);
    }

    #[test]
    fn test_normalize_inbound_line_keeps_interior_whitespace() {
        // テスト項目: 行内の空白は保持される
        // given (前提条件):
        let raw = "  spaced  out  \n";

        // when (操作):
        let result = normalize_inbound_line(raw);

        // then (期待する結果):
        assert_eq!(result, Some("  spaced  out  "));
    }
}
