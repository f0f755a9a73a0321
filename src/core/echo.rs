use crate::adapters::telegram::Message;

pub const HELP_TEXT: &str = "Just send me any text, and I'll echo it back!";

/// 回覆內容；指令以外的文字原樣送回
pub fn reply_for(message: &Message) -> Option<String> {
    let text = message.text.as_deref()?;

    if let Some(command) = text.strip_prefix('/') {
        // "/start@MyBot arg" -> "start"
        let name = command
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .split('@')
            .next()
            .unwrap_or_default();
        return match name {
            "start" => {
                let who = message
                    .from
                    .as_ref()
                    .map(|u| u.first_name.as_str())
                    .unwrap_or("there");
                Some(format!("Hi {}! I'm an echo bot. Send me anything!", who))
            }
            "help" => Some(HELP_TEXT.to_string()),
            _ => None,
        };
    }

    (!text.is_empty()).then(|| text.to_string())
}
