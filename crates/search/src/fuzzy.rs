use nucleo_matcher::pattern::{CaseMatching, Normalization, Pattern};
use nucleo_matcher::{Matcher, Utf32String};
use tabs_protocol::IndexedItem;

/// Fuzzy search over indexed tabs using nucleo-matcher
pub struct FuzzySearch {
    matcher: Matcher,
}

impl FuzzySearch {
    #[must_use]
    pub fn new() -> Self {
        Self {
            matcher: Matcher::new(nucleo_matcher::Config::DEFAULT),
        }
    }

    /// Scores items by their search string and display text.
    /// Returns (`item_index`, score) sorted by score descending; ties keep
    /// index order. While the index holds the indexing placeholder, it is the
    /// only result for every query.
    #[allow(clippy::cast_precision_loss)]
    pub fn search(&mut self, query: &str, items: &[IndexedItem], limit: usize) -> Vec<(usize, f32)> {
        if let Some(idx) = items.iter().position(IndexedItem::is_placeholder) {
            return std::iter::once((idx, 1.0)).take(limit).collect();
        }

        let pattern = Pattern::parse(query, CaseMatching::Smart, Normalization::Smart);
        let query = query.trim();

        let mut scored: Vec<(usize, u32, bool)> = items
            .iter()
            .enumerate()
            .filter_map(|(idx, item)| {
                let exact_title = !query.is_empty() && item.display_text.eq_ignore_ascii_case(query);

                let search_haystack = Utf32String::from(item.search_string.as_str());
                let search_score = pattern.score(search_haystack.slice(..), &mut self.matcher);

                let title_haystack = Utf32String::from(item.display_text.as_str());
                let title_score = pattern.score(title_haystack.slice(..), &mut self.matcher);

                let best_score = [search_score, title_score].into_iter().flatten().max()?;
                Some((idx, best_score, exact_title))
            })
            .collect();

        let max_score = scored
            .iter()
            .map(|(_, score, _)| *score as f32)
            .fold(0.0f32, f32::max);

        // Exact title first, then score descending
        scored.sort_by(|a, b| b.2.cmp(&a.2).then_with(|| b.1.cmp(&a.1)));
        scored.truncate(limit);

        scored
            .into_iter()
            .map(|(idx, score, exact_title)| {
                let normalized = if exact_title {
                    1.0
                } else if max_score > 0.0 {
                    score as f32 / max_score
                } else {
                    0.0
                };
                (idx, normalized)
            })
            .collect()
    }
}

impl Default for FuzzySearch {
    fn default() -> Self {
        Self::new()
    }
}
