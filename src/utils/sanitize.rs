use ammonia::Builder;

/// Strip all HTML from user-submitted forum text.
///
/// Subjects, comments and replies are plain text; any markup a client smuggles
/// in is removed entirely rather than escaped selectively.
pub fn sanitize_text(raw: &str) -> String {
    Builder::empty().clean(raw).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_passes_through() {
        assert_eq!(sanitize_text("hello world"), "hello world");
    }

    #[test]
    fn script_tag_and_payload_removed() {
        let cleaned = sanitize_text("before<script>alert('xss')</script>after");
        assert!(!cleaned.contains("<script>"));
        assert!(!cleaned.contains("alert"));
        assert!(cleaned.contains("before"));
        assert!(cleaned.contains("after"));
    }

    #[test]
    fn tags_are_stripped_but_their_text_kept() {
        assert_eq!(sanitize_text("<b>bold</b> move"), "bold move");
    }

    #[test]
    fn event_handlers_removed() {
        let cleaned = sanitize_text("<img src=x onerror=alert(1)>ok");
        assert!(!cleaned.contains("onerror"));
        assert!(cleaned.contains("ok"));
    }

    #[test]
    fn empty_input_stays_empty() {
        assert_eq!(sanitize_text(""), "");
    }
}
