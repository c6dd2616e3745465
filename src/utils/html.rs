// src/utils/html.rs

/// Strips markup from user-supplied quiz and question text.
///
/// Uses ammonia's whitelist cleaner, so harmless inline tags survive while
/// scripts and event handlers are removed. Surrounding whitespace is trimmed.
///
/// The output is HTML, not plain text: characters such as `&` and `<` that
/// survive cleaning come back entity-escaped, so "A & B" is stored as
/// "A &amp; B". Clients rendering the text as plain strings must unescape it.
pub fn clean_text(input: &str) -> String {
    ammonia::clean(input.trim())
}
