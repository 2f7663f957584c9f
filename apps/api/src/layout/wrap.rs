//! Greedy word wrap measured in characters.

/// Packs whitespace-delimited tokens into lines of at most `width` characters.
///
/// A token is appended to the current line when the line plus one space plus
/// the token still fits; otherwise it starts a new line. A token longer than
/// `width` sits alone on its own line and is never split. Empty or all-blank
/// text yields no lines.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();

        if current_len > 0 && current_len + 1 + word_len > width {
            // Current line is full; push it and start a new one.
            lines.push(std::mem::take(&mut current));
            current_len = 0;
        }

        if current_len > 0 {
            current.push(' ');
            current_len += 1;
        }
        current.push_str(word);
        current_len += word_len;
    }

    if current_len > 0 {
        lines.push(current);
    }
    lines
}
