//! Cleanup applied to model output before display.

const STRAY_CLOSING_TAG: &str = "</div>";

/// Trims the text and drops a `</div>` left dangling at its very end. The
/// model sometimes echoes the closing tag of the display container back into
/// its answer. Matching is ASCII case-insensitive and only the end of the
/// string is considered, so tags elsewhere are kept.
pub fn sanitize(raw: &str) -> String {
    let mut text = raw.trim();
    while let Some(stripped) = strip_trailing_tag(text) {
        text = stripped.trim_end();
    }
    text.to_string()
}

fn strip_trailing_tag(text: &str) -> Option<&str> {
    let split = text.len().checked_sub(STRAY_CLOSING_TAG.len())?;
    if !text.is_char_boundary(split) {
        return None;
    }
    let (head, tail) = text.split_at(split);
    tail.eq_ignore_ascii_case(STRAY_CLOSING_TAG).then_some(head)
}
