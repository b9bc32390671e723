//! Shared utility functions.

/// Uppercase the first character of a string, leaving the rest untouched.
///
/// "alice" -> "Alice"
/// "iPhone case" -> "IPhone case"
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
    }
}

/// Capitalize every whitespace-separated word, keeping the whitespace as is.
///
/// "first project" -> "First Project"
/// "getting\tstarted" -> "Getting\tStarted"
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for c in s.chars() {
        if c.is_whitespace() {
            at_word_start = true;
            out.push(c);
        } else if at_word_start {
            at_word_start = false;
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
    }
    out
}
