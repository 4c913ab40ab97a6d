//! Ordered fallback lookups.

/// Try each extractor in order and return the first present value
///
/// Descriptor fields often have a primary source and one or more fallbacks
/// (a PID falling back to a factory PID, a name falling back to a class
/// name). The extractors are tried in slice order.
pub fn first_present<'s, S: ?Sized, T: ?Sized>(
    subject: &'s S,
    extractors: &[fn(&S) -> Option<&T>],
) -> Option<&'s T> {
    extractors.iter().find_map(|extract| extract(subject))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Named {
        primary: Option<String>,
        secondary: Option<String>,
    }

    fn primary(n: &Named) -> Option<&str> {
        n.primary.as_deref()
    }

    fn secondary(n: &Named) -> Option<&str> {
        n.secondary.as_deref()
    }

    #[test]
    fn test_first_extractor_wins() {
        let n = Named {
            primary: Some("a".to_string()),
            secondary: Some("b".to_string()),
        };
        assert_eq!(first_present(&n, &[primary, secondary]), Some("a"));
    }

    #[test]
    fn test_falls_back_in_order() {
        let n = Named {
            primary: None,
            secondary: Some("b".to_string()),
        };
        assert_eq!(first_present(&n, &[primary, secondary]), Some("b"));
        let empty = Named {
            primary: None,
            secondary: None,
        };
        assert_eq!(first_present(&empty, &[primary, secondary]), None);
    }

    #[test]
    fn test_result_borrows_from_subject_not_extractors() {
        let n = Named {
            primary: Some("a".to_string()),
            secondary: None,
        };
        let found = {
            let extractors: Vec<fn(&Named) -> Option<&str>> = vec![secondary, primary];
            first_present(&n, &extractors)
        };
        assert_eq!(found, Some("a"));
    }
}
