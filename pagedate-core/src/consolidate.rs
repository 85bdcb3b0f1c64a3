//! Reconciles candidate timestamps into one reading per role.

use chrono::{DateTime, Utc};

use crate::classify::{classify, Role};
use crate::normalize::normalize_date;
use crate::types::{Confidence, TimestampSource};

/// Winning timestamps plus the overall confidence of a candidate set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Consolidated {
    pub created_at: Option<DateTime<Utc>>,
    pub modified_at: Option<DateTime<Utc>>,
    pub published_at: Option<DateTime<Utc>>,
    pub confidence: Confidence,
}

pub fn consolidate(sources: &[TimestampSource]) -> Consolidated {
    let resolve = |role| {
        select_winner(sources, role).and_then(|winner| {
            let parsed = normalize_date(&winner.value);
            if parsed.is_none() {
                tracing::warn!(
                    field = %winner.field,
                    value = %winner.value,
                    "winning candidate no longer parses"
                );
            }
            parsed
        })
    };

    Consolidated {
        created_at: resolve(Role::Created),
        modified_at: resolve(Role::Modified),
        published_at: resolve(Role::Published),
        confidence: overall_confidence(sources),
    }
}

/// Pick the best candidate for `role`: highest confidence, then mechanism
/// priority, then earliest position in `sources`.
pub fn select_winner(sources: &[TimestampSource], role: Role) -> Option<&TimestampSource> {
    sources
        .iter()
        .filter(|s| classify(&s.field) == Some(role))
        // min_by_key returns the first of several equal minima.
        .min_by_key(|s| (std::cmp::Reverse(s.confidence), s.mechanism.priority()))
}

/// Highest confidence of any candidate, or `Low` when there are none.
pub fn overall_confidence(sources: &[TimestampSource]) -> Confidence {
    sources
        .iter()
        .map(|s| s.confidence)
        .max()
        .unwrap_or(Confidence::Low)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Mechanism;

    fn source(
        mechanism: Mechanism,
        field: &str,
        value: &str,
        confidence: Confidence,
    ) -> TimestampSource {
        TimestampSource::new(mechanism, field, value, confidence)
    }

    fn iso(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    #[test]
    fn empty_set_is_low_with_no_fields() {
        let result = consolidate(&[]);
        assert_eq!(result.confidence, Confidence::Low);
        assert!(result.created_at.is_none());
        assert!(result.modified_at.is_none());
        assert!(result.published_at.is_none());
    }

    #[test]
    fn higher_confidence_wins_over_priority() {
        let sources = vec![
            source(
                Mechanism::HttpHeader,
                "last-modified",
                "Wed, 21 Oct 2015 07:28:00 GMT",
                Confidence::Medium,
            ),
            source(Mechanism::Heuristic, "updated", "2020-01-01", Confidence::Low),
        ];
        let result = consolidate(&sources);
        assert_eq!(result.modified_at, Some(iso("2015-10-21T07:28:00Z")));
        assert_eq!(result.confidence, Confidence::Medium);
    }

    #[test]
    fn json_ld_outranks_meta_at_equal_confidence() {
        let sources = vec![
            source(
                Mechanism::MetaTag,
                "article:published_time",
                "2023-01-15T10:30:00Z",
                Confidence::High,
            ),
            source(
                Mechanism::StructuredData,
                "datePublished",
                "2023-01-16T12:00:00Z",
                Confidence::High,
            ),
        ];
        let result = consolidate(&sources);
        assert_eq!(result.published_at, Some(iso("2023-01-16T12:00:00Z")));
    }

    #[test]
    fn full_priority_order() {
        let order = [
            Mechanism::StructuredData,
            Mechanism::Microdata,
            Mechanism::MetaTag,
            Mechanism::OpenGraph,
            Mechanism::SocialCard,
            Mechanism::HttpHeader,
            Mechanism::Heuristic,
        ];
        for pair in order.windows(2) {
            assert!(
                pair[0].priority() < pair[1].priority(),
                "{:?} should outrank {:?}",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn ties_keep_earliest_source() {
        let sources = vec![
            source(Mechanism::Microdata, "datePublished", "2023-03-01", Confidence::High),
            source(Mechanism::Microdata, "datePublished", "2023-04-01", Confidence::High),
        ];
        let winner = select_winner(&sources, Role::Published).unwrap();
        assert_eq!(winner.value, "2023-03-01");

        let reversed: Vec<_> = sources.iter().rev().cloned().collect();
        let winner = select_winner(&reversed, Role::Published).unwrap();
        assert_eq!(winner.value, "2023-04-01");
    }

    #[test]
    fn unclassified_sources_only_affect_confidence() {
        let sources = vec![source(
            Mechanism::Heuristic,
            "text-pattern",
            "June 1, 2023",
            Confidence::Low,
        )];
        let result = consolidate(&sources);
        assert!(result.published_at.is_none());
        assert_eq!(result.confidence, Confidence::Low);

        let sources = vec![source(
            Mechanism::SocialCard,
            "twitter:data1",
            "Date: 2023-01-01",
            Confidence::Medium,
        )];
        assert_eq!(consolidate(&sources).confidence, Confidence::Medium);
    }

    #[test]
    fn unparseable_winner_leaves_field_absent() {
        let sources = vec![source(Mechanism::MetaTag, "date", "garbage", Confidence::High)];
        let result = consolidate(&sources);
        assert!(result.published_at.is_none());
        assert_eq!(result.confidence, Confidence::High);
    }

    #[test]
    fn adding_high_never_lowers_confidence() {
        let base = [
            vec![],
            vec![source(Mechanism::Heuristic, "time-text", "2023-01-01", Confidence::Low)],
            vec![source(Mechanism::HttpHeader, "date", "2023-01-01", Confidence::Medium)],
        ];
        for mut sources in base {
            let before = overall_confidence(&sources);
            sources.push(source(Mechanism::MetaTag, "date", "2023-01-02", Confidence::High));
            let after = overall_confidence(&sources);
            assert!(after >= before);
            assert_eq!(after, Confidence::High);
        }
    }
}
