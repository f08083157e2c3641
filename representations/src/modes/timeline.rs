//! Chronological event timelines.
//!
//! Each sentence contributes at most one event, dated by the first matching
//! family of the date cascade. Near-duplicate events are merged and the rest
//! are ordered on the shared `sort_key` axis.

use std::sync::Arc;

use regex_lite::Regex;
use serde::Serialize;
use serde_json::{Map, Value, json};
use tracing::debug;

use prism_extraction::{ParsedDate, Precision, Toolkit, lexicon, segment, similarity};

use crate::error::{RepresentationError, Result};
use crate::mode::{ModeCategory, ModeId, ModeInfo, Representation};
use crate::preferences::Preferences;
use crate::result::{Complexity, RepresentationResult};

const MIN_SENTENCE_LEN: usize = 10;
const MAX_TITLE_LEN: usize = 60;
const MAX_TITLE_WORDS: usize = 6;
const MAX_IMPORTANCE: u32 = 10;
const TITLE_OVERLAP_THRESHOLD: f64 = 0.6;
const PERIOD_THRESHOLD: f64 = 0.1;
const YEAR_MS: u64 = 1000 * 60 * 60 * 24 * 365;

const TITLE_STOP_WORDS: &[&str] = &[
    "this", "that", "these", "those", "with", "from", "they", "were", "have", "been",
];

const IMPORTANCE_KEYWORDS: &[&str] = &[
    "first", "invented", "discovered", "revolutionary", "breakthrough", "significant", "major",
    "important", "critical", "landmark", "historic", "unprecedented", "groundbreaking",
    "pioneering",
];

const NUMERIC_PATTERN: &str = r"\d+(?:\.\d+)?%|\$\d+|\d+(?:,\d{3})*";
const YEAR_PATTERN: &str = r"\b\d{4}\b";
const MONTH_YEAR_PATTERN: &str = r"(?i)\b(?:january|february|march|april|may|june|july|august|september|october|november|december)\s+\d{4}\b";

/// Kind of timeline event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Innovation,
    Discovery,
    Business,
    Historical,
    Scientific,
    Personal,
    General,
}

/// Keyword lists, checked in order.
const EVENT_KEYWORDS: &[(EventType, &[&str])] = &[
    (
        EventType::Innovation,
        &["invented", "developed", "created", "launched", "released", "introduced"],
    ),
    (
        EventType::Discovery,
        &["discovered", "found", "identified", "observed", "detected"],
    ),
    (
        EventType::Business,
        &["founded", "established", "company", "business", "corporation", "startup"],
    ),
    (
        EventType::Historical,
        &["war", "battle", "revolution", "independence", "treaty", "peace"],
    ),
    (
        EventType::Scientific,
        &["research", "study", "experiment", "theory", "hypothesis", "published"],
    ),
    (
        EventType::Personal,
        &["born", "died", "married", "graduated", "appointed", "elected"],
    ),
];

impl EventType {
    pub fn classify(sentence: &str) -> Self {
        EVENT_KEYWORDS
            .iter()
            .find(|(_, keywords)| lexicon::contains_any_word(sentence, keywords))
            .map_or(Self::General, |(event_type, _)| *event_type)
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Self::Innovation => "💡",
            Self::Discovery => "🔍",
            Self::Business => "🏢",
            Self::Historical => "🏛️",
            Self::Scientific => "🔬",
            Self::Personal => "👤",
            Self::General => "📅",
        }
    }
}

/// A dated event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineEvent {
    pub id: String,
    pub title: String,
    pub description: String,
    pub date_raw: String,
    pub date_parsed: ParsedDate,
    pub period: f64,
    pub precision: Precision,
    /// Position on the shared ordering axis.
    pub sort_key: i64,
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub importance: u32,
    pub icon: String,
}

impl TimelineEvent {
    fn conflicts_with(&self, other: &TimelineEvent) -> bool {
        similarity::overlap_ratio(&self.title, &other.title) > TITLE_OVERLAP_THRESHOLD
            || (self.period - other.period).abs() < PERIOD_THRESHOLD
    }
}

#[derive(Serialize)]
struct TimelineMargin {
    item: u32,
    axis: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TooltipConfig {
    follow_mouse: bool,
    overflow_method: &'static str,
}

/// Client configuration for the timeline widget.
#[derive(Serialize)]
struct TimelineConfig {
    orientation: &'static str,
    show_current_time: bool,
    zoom_min: u64,
    zoom_max: u64,
    stack: bool,
    margin: TimelineMargin,
    editable: bool,
    selectable: bool,
    multiselect: bool,
    tooltip: TooltipConfig,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            orientation: "horizontal",
            show_current_time: false,
            zoom_min: YEAR_MS,
            zoom_max: YEAR_MS * 100,
            stack: true,
            margin: TimelineMargin { item: 10, axis: 20 },
            editable: false,
            selectable: true,
            multiselect: false,
            tooltip: TooltipConfig {
                follow_mouse: true,
                overflow_method: "cap",
            },
        }
    }
}

#[derive(Serialize)]
struct TimelineStats {
    event_count: usize,
    timeline_span: String,
    start_period: f64,
    end_period: f64,
}

#[derive(Serialize)]
struct TimelineContent {
    events: Vec<TimelineEvent>,
    timeline_config: TimelineConfig,
    stats: TimelineStats,
}

#[derive(Serialize)]
struct TimelineMetadata {
    event_count: usize,
    timeline_span: String,
    complexity: Complexity,
}

/// Chronological evolution view.
pub struct Timeline {
    info: ModeInfo,
    toolkit: Arc<Toolkit>,
    numeric: Regex,
    year: Regex,
    month_year: Regex,
}

impl Timeline {
    pub fn new(toolkit: Arc<Toolkit>) -> Result<Self> {
        Ok(Self {
            info: ModeInfo::new(
                ModeId::Timeline,
                "Timeline",
                "Chronological evolution view with interactive timeline",
                "⏳",
                ModeCategory::Temporal,
            ),
            toolkit,
            numeric: Regex::new(NUMERIC_PATTERN)?,
            year: Regex::new(YEAR_PATTERN)?,
            month_year: Regex::new(MONTH_YEAR_PATTERN)?,
        })
    }

    /// Extract and deduplicate events, in discovery order.
    pub fn extract_events(&self, content: &str, reference_year: i32) -> Vec<TimelineEvent> {
        let mut events: Vec<TimelineEvent> = Vec::new();

        for sentence in segment::sentences(content) {
            if sentence.chars().count() < MIN_SENTENCE_LEN {
                continue;
            }
            let Some(found) = self.toolkit.dates.find(&sentence, reference_year) else {
                continue;
            };

            let mut undated = String::with_capacity(sentence.len());
            undated.push_str(&sentence[..found.start]);
            undated.push(' ');
            undated.push_str(&sentence[found.end..]);

            let event_type = EventType::classify(&sentence);
            events.push(TimelineEvent {
                id: format!("event_{}", events.len()),
                title: self.title(&undated, &sentence),
                date_raw: found.raw,
                period: found.date.period,
                precision: found.date.precision,
                sort_key: found.date.sort_key,
                date_parsed: found.date,
                event_type,
                importance: self.importance(&sentence),
                icon: event_type.icon().to_string(),
                description: sentence,
            });
        }

        let extracted = events.len();
        let events = deduplicate(events);
        debug!("Extracted {extracted} timeline events, kept {}", events.len());
        events
    }

    fn title(&self, undated: &str, sentence: &str) -> String {
        let cleaned = self.month_year.replace_all(undated, "");
        let cleaned = self.year.replace_all(&cleaned, "");

        let words: Vec<String> = cleaned
            .split_whitespace()
            .map(|w| w.chars().filter(|c| c.is_alphanumeric() || *c == '_').collect::<String>())
            .filter(|w| {
                w.chars().count() > 3 && !TITLE_STOP_WORDS.contains(&w.to_lowercase().as_str())
            })
            .take(MAX_TITLE_WORDS)
            .collect();

        if words.is_empty() {
            truncate(sentence)
        } else {
            truncate(&words.join(" "))
        }
    }

    /// Score in `[1, 10]`.
    pub fn importance(&self, sentence: &str) -> u32 {
        let length_bonus = (sentence.chars().count() / 50).min(3) as u32;
        let keywords = lexicon::count_words(sentence, IMPORTANCE_KEYWORDS) as u32;
        let numeric = u32::from(self.numeric.is_match(sentence));
        (1 + length_bonus + 2 * keywords + numeric).min(MAX_IMPORTANCE)
    }
}

fn truncate(title: &str) -> String {
    if title.chars().count() > MAX_TITLE_LEN {
        let head: String = title.chars().take(MAX_TITLE_LEN - 3).collect();
        format!("{head}...")
    } else {
        title.to_string()
    }
}

/// Merge near-duplicate events.
///
/// A candidate that conflicts with retained events replaces all of them
/// only when it is strictly more important than each; otherwise it is
/// dropped.
fn deduplicate(events: Vec<TimelineEvent>) -> Vec<TimelineEvent> {
    let mut retained: Vec<TimelineEvent> = Vec::new();

    for event in events {
        let conflicts: Vec<usize> = retained
            .iter()
            .enumerate()
            .filter(|(_, existing)| event.conflicts_with(existing))
            .map(|(i, _)| i)
            .collect();

        if conflicts.is_empty() {
            retained.push(event);
        } else if conflicts
            .iter()
            .all(|&i| event.importance > retained[i].importance)
        {
            for i in conflicts.into_iter().rev() {
                retained.remove(i);
            }
            retained.push(event);
        }
    }
    retained
}

/// Describe the distance between the first and last event.
fn span(events: &[TimelineEvent]) -> String {
    let (Some(first), Some(last)) = (events.first(), events.last()) else {
        return "No timeline".to_string();
    };
    let first_year = i64::from(first.date_parsed.parts.year);
    let last_year = i64::from(last.date_parsed.parts.year);
    let years = (last_year - first_year).unsigned_abs();
    match years {
        0 => "Single year".to_string(),
        1..10 => count_label(years, "year", "years"),
        10..100 => count_label(years / 10, "decade", "decades"),
        _ => count_label(years / 100, "century", "centuries"),
    }
}

fn count_label(count: u64, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("1 {singular}")
    } else {
        format!("{count} {plural}")
    }
}

fn complexity(event_count: usize) -> Complexity {
    if event_count > 10 {
        Complexity::High
    } else if event_count > 5 {
        Complexity::Medium
    } else {
        Complexity::Low
    }
}

impl Representation for Timeline {
    fn info(&self) -> &ModeInfo {
        &self.info
    }

    fn render(&self, content: &str, preferences: &Preferences) -> Result<RepresentationResult> {
        let mut events = self.extract_events(content, preferences.reference_year());
        if events.is_empty() {
            return Err(RepresentationError::NoExtractableData(
                "No temporal events found in content".to_string(),
            ));
        }
        events.sort_by_key(|e| e.sort_key);

        let timeline_span = span(&events);
        let stats = TimelineStats {
            event_count: events.len(),
            timeline_span: timeline_span.clone(),
            start_period: events.first().map_or(0.0, |e| e.period),
            end_period: events.last().map_or(0.0, |e| e.period),
        };
        let metadata = TimelineMetadata {
            event_count: events.len(),
            timeline_span,
            complexity: complexity(events.len()),
        };
        let body = TimelineContent {
            events,
            timeline_config: TimelineConfig::default(),
            stats,
        };

        Ok(RepresentationResult::from_parts(self.id(), &body, &metadata)?
            .with_style_hints(&["timeline", "chronological", "interactive"])
            .with_ui_script("initializeTimeline")
            .with_ui_config(json!({
                "container_id": "timeline-container",
                "enable_zoom": true,
                "enable_navigation": true,
                "show_periods": true,
            })))
    }

    fn fallback_content(&self) -> Map<String, Value> {
        let mut extra = Map::new();
        extra.insert("events".to_string(), Value::Array(Vec::new()));
        extra
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn timeline() -> Timeline {
        Timeline::new(Arc::new(Toolkit::new().unwrap())).unwrap()
    }

    #[test]
    fn test_einstein_events() {
        let mode = timeline();
        let events = mode.extract_events(
            "Albert Einstein published the theory of relativity in 1905. \
             In 1915 he refined it into general relativity.",
            2024,
        );

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].title, "Albert Einstein published theory relativity");
        assert_eq!(events[0].precision, Precision::Year);
        assert_eq!(events[0].event_type, EventType::Scientific);
        assert_eq!(events[1].title, "refined into general relativity");
        assert_eq!(events[1].date_raw, "1915");
    }

    #[test]
    fn test_more_important_duplicate_wins() {
        let mode = timeline();
        let events = mode.extract_events(
            "Google was founded in 1998. \
             The historic first search patent was filed in 1998 by the founders.",
            2024,
        );

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].id, "event_1");
        assert_eq!(events[0].importance, 7);
    }

    #[test]
    fn test_less_important_duplicate_is_dropped() {
        let mode = timeline();
        let events = mode.extract_events(
            "The historic first search patent was filed in 1998 by the founders. \
             Google was founded in 1998.",
            2024,
        );

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].id, "event_0");
    }

    #[test]
    fn test_overlapping_titles_keep_the_stronger_event() {
        let mode = timeline();
        let weaker_first = mode.extract_events(
            "Researchers discovered penicillin mold samples in 1928. \
             Researchers first discovered penicillin mold samples in 1929.",
            2024,
        );
        assert_eq!(weaker_first.len(), 1);
        assert_eq!(weaker_first[0].id, "event_1");
        assert_eq!(weaker_first[0].date_raw, "1929");

        let stronger_first = mode.extract_events(
            "Researchers first discovered penicillin mold samples in 1929. \
             Researchers discovered penicillin mold samples in 1928.",
            2024,
        );
        assert_eq!(stronger_first.len(), 1);
        assert_eq!(stronger_first[0].id, "event_0");
        assert!(stronger_first[0].importance > mode.importance(
            "Researchers discovered penicillin mold samples in 1928"
        ));
    }

    #[test]
    fn test_extreme_reference_year_does_not_panic() {
        let mode = timeline();
        let result = mode.process(
            "The results came tomorrow for the whole team.",
            &Preferences::new().with_reference_year(i32::MAX),
        );
        assert!(result.is_error());
        assert_eq!(result.content["events"], json!([]));

        let result = mode.process(
            "Prehistoric tools were crude in prehistoric times. The results arrived today.",
            &Preferences::new().with_reference_year(i32::MAX),
        );
        assert!(!result.is_error());
        assert_eq!(result.metadata["event_count"], json!(2));
    }

    #[test]
    fn test_span_labels() {
        let mode = timeline();
        let events = mode.extract_events(
            "The war began in 1914. The treaty came in 1919. A study appeared in 2019.",
            2024,
        );
        assert_eq!(span(&events[..1]), "Single year");
        assert_eq!(span(&events[..2]), "5 years");
        assert_eq!(span(&events), "1 century");
    }

    #[test]
    fn test_span_units_agree_with_count() {
        let mode = timeline();
        let events = mode.extract_events(
            "The war began in 1814. The treaty came in 1815. The study appeared in 1826. \
             The archive opened in 2014.",
            2024,
        );
        assert_eq!(span(&events[..2]), "1 year");
        assert_eq!(span(&events[..3]), "1 decade");
        assert_eq!(span(&events), "2 centuries");
        assert_eq!(events[0].event_type, EventType::Historical);
    }

    #[test]
    fn test_render_sorts_by_sort_key() {
        let mode = timeline();
        let result = mode.process(
            "Smartphones spread widely in the 2010s. The web appeared in March 1991. \
             Computers shrank in the 1970s.",
            &Preferences::new().with_reference_year(2024),
        );

        assert!(!result.is_error());
        let keys: Vec<i64> = result.content["events"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["sort_key"].as_i64().unwrap())
            .collect();
        assert!(keys.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(result.content["timeline_config"]["zoom_min"], json!(YEAR_MS));
        assert_eq!(result.content["timeline_config"]["tooltip"]["followMouse"], json!(true));
    }

    #[test]
    fn test_no_dates_is_an_error_with_empty_events() {
        let mode = timeline();
        let result = mode.process("Nothing here carries any date at all.", &Preferences::new());

        assert!(result.is_error());
        assert_eq!(result.metadata["error_kind"], json!("no_extractable_data"));
        assert_eq!(result.content["events"], json!([]));
    }
}
