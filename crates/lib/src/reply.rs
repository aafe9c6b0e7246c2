//! Automatic reply text.

const REPLY_PREFIX: &str = "Olá! você disse: ";

/// Reply sent back for an incoming message. Absent text leaves the placeholder empty.
pub fn format_reply(text: Option<&str>) -> String {
    format!("{}{}", REPLY_PREFIX, text.unwrap_or(""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn echoes_incoming_text() {
        assert_eq!(format_reply(Some("oi")), "Olá! você disse: oi");
    }

    #[test]
    fn absent_text_embeds_empty_placeholder() {
        assert_eq!(format_reply(None), "Olá! você disse: ");
    }
}
