use glimpse_config::notification::NotificationConfig;

/// How a finished answer is shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presentation {
    Toast,
    Popup,
}

/// Toast for short answers, popup once the text would be cut off.
///
/// A toast fits `max_toast_lines` lines; any line longer than
/// `max_line_length` is assumed to wrap onto extra lines.
pub fn choose_presentation(text: &str, config: &NotificationConfig) -> Presentation {
    if text.chars().count() > config.max_toast_chars {
        return Presentation::Popup;
    }

    let lines: Vec<&str> = text.split('\n').collect();
    if lines.len() > config.max_toast_lines {
        return Presentation::Popup;
    }

    let per_line = config.max_line_length.max(1);
    let display_lines: usize = lines
        .iter()
        .map(|line| line.chars().count().div_ceil(per_line).max(1))
        .sum();

    if display_lines > config.max_toast_lines {
        Presentation::Popup
    } else {
        Presentation::Toast
    }
}
