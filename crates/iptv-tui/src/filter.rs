//! Channel search: name substring matching over the channel list.

use iptv_proto::channel::Channel;

/// Trim and case-fold a raw search term.
pub fn normalize_term(term: &str) -> String {
    term.trim().to_lowercase()
}

/// True if `channel`'s name contains the already-normalized `term`.
/// A channel without a name never matches a non-empty term.
pub fn channel_matches(channel: &Channel, term: &str) -> bool {
    if term.is_empty() {
        return true;
    }
    match channel.name() {
        Some(name) if !name.is_empty() => name.to_lowercase().contains(term),
        _ => false,
    }
}

/// Project `channels` under `term`, keeping the original order.
///
/// A blank term yields a copy of the whole list, so later changes to the
/// source list never leak into the view.
pub fn apply_filter(channels: &[Channel], term: &str) -> Vec<Channel> {
    let term = normalize_term(term);
    if term.is_empty() {
        return channels.to_vec();
    }
    channels
        .iter()
        .filter(|c| channel_matches(c, &term))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(id: &str, name: Option<&str>) -> Channel {
        Channel {
            id: Some(id.into()),
            name: name.map(str::to_string),
            url: Some(format!("http://{id}")),
            ..Default::default()
        }
    }

    fn ids(list: &[Channel]) -> Vec<&str> {
        list.iter().filter_map(|c| c.id()).collect()
    }

    #[test]
    fn test_news_example() {
        let list = vec![named("1", Some("News 24")), named("2", Some("Sports"))];
        assert_eq!(ids(&apply_filter(&list, "news")), vec!["1"]);
        assert_eq!(ids(&apply_filter(&list, "")), vec!["1", "2"]);
    }

    #[test]
    fn test_term_is_trimmed_and_case_folded() {
        let list = vec![named("1", Some("BBC One")), named("2", Some("bbc two"))];
        assert_eq!(ids(&apply_filter(&list, "  BbC ")), vec!["1", "2"]);
        assert_eq!(ids(&apply_filter(&list, "ONE")), vec!["1"]);
    }

    #[test]
    fn test_blank_term_returns_everything_in_order() {
        let list = vec![
            named("3", Some("C")),
            named("1", None),
            named("2", Some("")),
        ];
        assert_eq!(ids(&apply_filter(&list, "   ")), vec!["3", "1", "2"]);
    }

    #[test]
    fn test_nameless_channels_never_match() {
        let list = vec![named("1", None), named("2", Some("")), named("3", Some("x"))];
        assert_eq!(ids(&apply_filter(&list, "x")), vec!["3"]);
    }

    #[test]
    fn test_substring_not_word_match() {
        let list = vec![named("1", Some("Eurosport 2"))];
        assert_eq!(ids(&apply_filter(&list, "rosp")), vec!["1"]);
        assert!(apply_filter(&list, "sport 3").is_empty());
    }

    #[test]
    fn test_filter_is_idempotent() {
        let list = vec![
            named("1", Some("Alpha")),
            named("2", Some("Beta")),
            named("3", Some("alphabet")),
        ];
        let once = apply_filter(&list, "alpha");
        let twice = apply_filter(&list, "alpha");
        assert_eq!(once, twice);
        assert_eq!(ids(&once), vec!["1", "3"]);
    }

    #[test]
    fn test_result_is_a_copy() {
        let mut list = vec![named("1", Some("A"))];
        let view = apply_filter(&list, "");
        list[0].name = Some("changed".into());
        assert_eq!(view[0].name(), Some("A"));
    }
}
