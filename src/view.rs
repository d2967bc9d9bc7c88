//! Butterfly view: negative and positive topic rankings shown side by side.
//!
//! The two sides are ranked independently, so row `i` may pair the
//! `i`-th most negative topic with a different `i`-th most positive topic.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::models::TopicData;
use crate::taxonomy;

pub const TOP_TOPICS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    #[cfg(test)]
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

impl FromStr for SortDirection {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            other => anyhow::bail!("unknown sort direction {other:?}, expected asc or desc"),
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Asc => f.write_str("asc"),
            SortDirection::Desc => f.write_str("desc"),
        }
    }
}

/// Filter and sort settings of the topic view, owned by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewState {
    pub selected_main_topics: Vec<String>,
    pub left_sort: SortDirection,
    pub right_sort: SortDirection,
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState {
            selected_main_topics: taxonomy::main_topics().map(str::to_string).collect(),
            left_sort: SortDirection::Desc,
            right_sort: SortDirection::Desc,
        }
    }
}

impl ViewState {
    pub fn toggle_main_topic(&mut self, topic: &str) {
        if let Some(position) = self.selected_main_topics.iter().position(|t| t == topic) {
            self.selected_main_topics.remove(position);
        } else {
            self.selected_main_topics.push(topic.to_string());
        }
    }

    /// Replaces the selection, keeping the first occurrence of a repeated topic.
    pub fn select_main_topics(&mut self, topics: impl IntoIterator<Item = String>) {
        self.selected_main_topics.clear();
        for topic in topics {
            if !self.is_selected(&topic) {
                self.selected_main_topics.push(topic);
            }
        }
    }

    pub fn all_selected(&self) -> bool {
        taxonomy::main_topics().all(|topic| self.is_selected(topic))
    }

    /// Clears the selection when every taxonomy topic is selected, selects them all otherwise.
    pub fn toggle_select_all(&mut self) {
        if self.all_selected() {
            self.selected_main_topics.clear();
        } else {
            self.selected_main_topics = taxonomy::main_topics().map(str::to_string).collect();
        }
    }

    pub fn is_selected(&self, topic: &str) -> bool {
        self.selected_main_topics.iter().any(|t| t == topic)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButterflyRow {
    pub topic: String,
    /// Negated negative count, drawn to the left of the axis.
    pub negative: i64,
    pub positive: i64,
    pub left_topic: String,
    pub right_topic: String,
}

/// Topics whose main category is selected. An empty selection keeps everything.
pub fn filtered_topics<'a>(topics: &'a [TopicData], state: &ViewState) -> Vec<&'a TopicData> {
    if state.selected_main_topics.is_empty() {
        return topics.iter().collect();
    }
    topics
        .iter()
        .filter(|t| state.is_selected(&t.main))
        .collect()
}

/// Topics charted before the per-side sort: every sub-topic of a single
/// selected main topic, otherwise the busiest [`TOP_TOPICS`].
pub fn base_selection<'a>(topics: &'a [TopicData], state: &ViewState) -> Vec<&'a TopicData> {
    let mut filtered = filtered_topics(topics, state);
    if state.selected_main_topics.len() == 1 {
        return filtered;
    }

    filtered.sort_by(|a, b| b.total().cmp(&a.total()));
    filtered.truncate(TOP_TOPICS);
    filtered
}

pub fn build_butterfly(topics: &[TopicData], state: &ViewState) -> Vec<ButterflyRow> {
    let base = base_selection(topics, state);

    let (left_sort, right_sort) = (state.left_sort, state.right_sort);

    let mut left = base.clone();
    left.sort_by(|a, b| left_sort.apply(a.negative_count.cmp(&b.negative_count)));

    let mut right = base;
    right.sort_by(|a, b| right_sort.apply(a.positive_count.cmp(&b.positive_count)));

    let rows = left.len().max(right.len());
    (0..rows)
        .map(|i| {
            let left_item = left.get(i);
            let right_item = right.get(i);
            let left_topic = left_item.map(|t| t.sub.clone()).unwrap_or_default();
            let right_topic = right_item.map(|t| t.sub.clone()).unwrap_or_default();

            ButterflyRow {
                topic: if left_topic.is_empty() {
                    right_topic.clone()
                } else {
                    left_topic.clone()
                },
                negative: left_item.map_or(0, |t| -(t.negative_count as i64)),
                positive: right_item.map_or(0, |t| t.positive_count as i64),
                left_topic,
                right_topic,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn topic(main: &str, sub: &str, positive: u64, negative: u64) -> TopicData {
        TopicData {
            main: main.to_string(),
            sub: sub.to_string(),
            negative_count: negative,
            positive_count: positive,
        }
    }

    fn state(selected: &[&str], left: SortDirection, right: SortDirection) -> ViewState {
        ViewState {
            selected_main_topics: selected.iter().map(|s| s.to_string()).collect(),
            left_sort: left,
            right_sort: right,
        }
    }

    fn desc(selected: &[&str]) -> ViewState {
        state(selected, SortDirection::Desc, SortDirection::Desc)
    }

    #[test]
    fn empty_topics_build_no_rows() {
        let mixed = state(&[], SortDirection::Asc, SortDirection::Desc);
        let single = state(&["A"], SortDirection::Desc, SortDirection::Asc);
        assert!(build_butterfly(&[], &ViewState::default()).is_empty());
        assert!(build_butterfly(&[], &mixed).is_empty());
        assert!(build_butterfly(&[], &single).is_empty());
    }

    #[test]
    fn sides_rank_independently() {
        let topics = vec![topic("A", "x", 5, 1), topic("A", "y", 1, 5)];
        let rows = build_butterfly(&topics, &desc(&["A", "B"]));

        assert_eq!(rows.len(), 2);
        let (first, second) = (&rows[0], &rows[1]);
        assert_eq!(first.topic, "y");
        assert_eq!((first.negative, first.positive), (-5, 5));
        assert_eq!(first.left_topic, "y");
        assert_eq!(first.right_topic, "x");
        assert_eq!(second.topic, "x");
        assert_eq!((second.negative, second.positive), (-1, 1));
    }

    #[test]
    fn empty_selection_shows_everything() {
        let topics = vec![topic("A", "x", 1, 0), topic("Unlisted", "y", 0, 1)];
        assert_eq!(filtered_topics(&topics, &desc(&[])).len(), 2);

        let filtered = filtered_topics(&topics, &desc(&["A"]));
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].sub, "x");
    }

    #[test]
    fn single_main_topic_is_not_truncated() {
        let topics: Vec<_> = (0..15)
            .map(|i| topic("A", &format!("sub-{i}"), i, 1))
            .chain(std::iter::once(topic("B", "other", 100, 100)))
            .collect();

        let base = base_selection(&topics, &desc(&["A"]));
        assert_eq!(base.len(), 15);
        assert_eq!(base[0].sub, "sub-0");
        assert_eq!(build_butterfly(&topics, &desc(&["A"])).len(), 15);
    }

    #[test]
    fn several_main_topics_keep_top_ten_stably() {
        let mut topics: Vec<_> = (0..8).map(|i| topic("A", &format!("a-{i}"), 2, 0)).collect();
        topics.extend((0..8).map(|i| topic("B", &format!("b-{i}"), 1, 1)));
        topics.push(topic("B", "busy", 3, 4));

        let base = base_selection(&topics, &desc(&["A", "B"]));
        let subs: Vec<_> = base.iter().map(|t| t.sub.as_str()).collect();

        let mut expected = vec!["busy".to_string()];
        expected.extend((0..8).map(|i| format!("a-{i}")));
        expected.push("b-0".to_string());
        assert_eq!(subs, expected);
    }

    #[test]
    fn no_selection_also_truncates_to_top_ten() {
        let topics: Vec<_> = (0..12).map(|i| topic("A", &format!("s-{i}"), i, 0)).collect();
        let base = base_selection(&topics, &desc(&[]));
        assert_eq!(base.len(), TOP_TOPICS);
        assert_eq!(base[0].sub, "s-11");
    }

    #[test]
    fn toggling_left_direction_only_reorders_left_side() {
        let topics = vec![
            topic("A", "x", 5, 1),
            topic("A", "y", 1, 5),
            topic("A", "z", 3, 3),
        ];
        let mut view = desc(&["A", "B"]);
        let before = build_butterfly(&topics, &view);

        view.left_sort = view.left_sort.toggled();
        let after = build_butterfly(&topics, &view);

        let left_side = |r: &ButterflyRow| r.left_topic.clone();
        let right_side = |r: &ButterflyRow| (r.right_topic.clone(), r.positive);
        let lefts_before: Vec<_> = before.iter().map(left_side).collect();
        let lefts_after: Vec<_> = after.iter().map(left_side).collect();
        let rights_before: Vec<_> = before.iter().map(right_side).collect();
        let rights_after: Vec<_> = after.iter().map(right_side).collect();
        let negatives: Vec<_> = after.iter().map(|r| r.negative).collect();

        assert_eq!(lefts_before, vec!["y", "z", "x"]);
        assert_eq!(lefts_after, vec!["x", "z", "y"]);
        assert_eq!(rights_before, rights_after);
        assert_eq!(negatives, vec![-1, -3, -5]);
    }

    #[test]
    fn toggles_main_topics_and_select_all() {
        let mut view = ViewState::default();
        assert!(view.all_selected());

        view.toggle_main_topic("Market Conduct");
        assert!(!view.is_selected("Market Conduct"));
        assert!(!view.all_selected());

        view.toggle_select_all();
        assert!(view.all_selected());

        view.toggle_select_all();
        assert!(view.selected_main_topics.is_empty());

        view.toggle_main_topic("Market Conduct");
        assert_eq!(view.selected_main_topics, ["Market Conduct"]);
    }

    #[test]
    fn repeated_main_topic_is_selected_once() {
        let mut view = ViewState::default();
        view.select_main_topics(["B", "A", "B"].map(String::from));
        assert_eq!(view.selected_main_topics, ["B", "A"]);

        let topics: Vec<_> = (0..12).map(|i| topic("B", &format!("b-{i}"), i, 0)).collect();
        view.select_main_topics(["B", "B"].map(String::from));
        assert_eq!(base_selection(&topics, &view).len(), 12);
    }

    #[test]
    fn sort_direction_parses_and_round_trips_through_json() {
        assert_eq!("ASC".parse::<SortDirection>().unwrap(), SortDirection::Asc);
        assert!("sideways".parse::<SortDirection>().is_err());

        let view = state(&["A"], SortDirection::Asc, SortDirection::Desc);
        let json = serde_json::to_string(&view).unwrap();
        assert!(json.contains("\"left_sort\":\"asc\""));
        assert_eq!(serde_json::from_str::<ViewState>(&json).unwrap(), view);
    }
}
