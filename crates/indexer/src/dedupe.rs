use std::collections::HashSet;
use tabs_protocol::SourceRecord;

/// Keeps the first record of every distinct `(title, url)` pair, in order.
///
/// Tabs that share a url but differ in title (two views of one web app) are
/// both kept.
#[must_use]
pub fn dedupe_records(records: Vec<SourceRecord>) -> Vec<SourceRecord> {
    let mut seen: HashSet<(String, String)> = HashSet::with_capacity(records.len());
    records
        .into_iter()
        .filter(|record| seen.insert((record.title.clone(), record.url.clone())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn tab(title: &str, url: &str, tab_index: u32) -> SourceRecord {
        SourceRecord::new("Safari", title, url, 1, tab_index)
    }

    #[test]
    fn drops_repeated_pairs_and_preserves_order() {
        let out = dedupe_records(vec![
            tab("A", "https://a.com", 0),
            tab("B", "https://b.com", 1),
            tab("A", "https://a.com", 2),
            tab("C", "https://c.com", 3),
            tab("B", "https://b.com", 4),
        ]);
        let indices: Vec<u32> = out.iter().map(|r| r.tab_index).collect();
        assert_eq!(indices, vec![0, 1, 3]);
    }

    #[test]
    fn same_url_with_different_titles_is_kept() {
        let out = dedupe_records(vec![
            tab("Docs", "https://docs.example.com/guide", 0),
            tab("Docs v2", "https://docs.example.com/guide", 0),
        ]);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn comparison_is_case_sensitive() {
        let out = dedupe_records(vec![
            tab("Docs", "https://a.com", 0),
            tab("docs", "https://a.com", 1),
        ]);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn concatenation_collisions_are_not_duplicates() {
        let out = dedupe_records(vec![tab("ab", "c", 0), tab("a", "bc", 1)]);
        assert_eq!(out.len(), 2);
    }
}
