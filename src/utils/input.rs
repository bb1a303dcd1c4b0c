//! Cleanup for lines typed at the prompt.

/// Normalize one line of user input before it becomes a chat turn.
///
/// Tabs become four spaces, any other control character (including stray
/// carriage returns or escape sequences from arrow keys) is dropped, and the
/// result is trimmed.
pub fn sanitize_line(text: &str) -> String {
    let mut sanitized = String::with_capacity(text.len());

    for c in text.chars() {
        match c {
            '\t' => sanitized.push_str("    "),
            _ if !c.is_control() => sanitized.push(c),
            _ => {}
        }
    }

    sanitized.trim().to_string()
}
