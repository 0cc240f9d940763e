//! Roll selector
//!
//! Filter predicate plus uniform sampling without replacement. The
//! selection itself is pure; all side effects of a roll (counters,
//! streak, achievements) live in the `App` context.

use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;

use crate::config::{MAX_ROLL_RESULTS, MIN_ROLL_RESULTS};
use crate::database::{Title, TitleKind};

/// Content type filter for a roll
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KindFilter {
    Films,
    Series,
    #[default]
    Mix,
}

impl KindFilter {
    pub fn matches(&self, kind: TitleKind) -> bool {
        match self {
            KindFilter::Films => kind == TitleKind::Film,
            KindFilter::Series => kind == TitleKind::Series,
            KindFilter::Mix => true,
        }
    }

    /// Label recorded in the tried-content-types set
    pub fn label(&self) -> &'static str {
        match self {
            KindFilter::Films => "Films",
            KindFilter::Series => "Series",
            KindFilter::Mix => "Mix",
        }
    }
}

/// Full set of constraints for one roll
#[derive(Debug, Clone, Default)]
pub struct RollFilter {
    pub kind: KindFilter,
    pub exclude_watched: bool,
    /// Required genre tags; empty means no constraint
    pub genres: HashSet<String>,
}

impl RollFilter {
    pub fn matches(&self, title: &Title) -> bool {
        let kind_ok = self.kind.matches(title.kind);
        let watched_ok = !self.exclude_watched || !title.watched;
        let genre_ok =
            self.genres.is_empty() || title.genres.iter().any(|g| self.genres.contains(g));

        kind_ok && watched_ok && genre_ok
    }
}

/// Titles eligible under the filter, in collection order
pub fn candidates<'a>(titles: &'a [Title], filter: &RollFilter) -> Vec<&'a Title> {
    titles.iter().filter(|t| filter.matches(t)).collect()
}

/// Draw up to `requested` distinct titles uniformly at random.
///
/// Shuffle-and-take rather than independent draws, so one roll never
/// contains the same title twice. `requested` is clamped to the
/// supported 1..=3 range; an empty candidate set yields an empty
/// result.
pub fn draw<'a, R: Rng + ?Sized>(
    titles: &'a [Title],
    filter: &RollFilter,
    requested: usize,
    rng: &mut R,
) -> Vec<&'a Title> {
    let requested = requested.clamp(MIN_ROLL_RESULTS, MAX_ROLL_RESULTS);

    let mut pool = candidates(titles, filter);
    if pool.is_empty() {
        return Vec::new();
    }

    pool.shuffle(rng);
    pool.truncate(requested);
    pool
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sample_titles() -> Vec<Title> {
        let mut watched_film = Title::new("Parasite", TitleKind::Film)
            .with_genres(vec!["Thriller".into(), "Drama".into()]);
        watched_film.watched = true;

        vec![
            Title::new("Inception", TitleKind::Film).with_genres(vec!["Sci-Fi".into()]),
            watched_film,
            Title::new("Dark", TitleKind::Series)
                .with_genres(vec!["Sci-Fi".into(), "Mystery".into()]),
            Title::new("The Office", TitleKind::Series).with_genres(vec!["Comedy".into()]),
        ]
    }

    #[test]
    fn test_kind_filter() {
        let titles = sample_titles();

        let films = RollFilter {
            kind: KindFilter::Films,
            ..Default::default()
        };
        assert_eq!(candidates(&titles, &films).len(), 2);

        let series = RollFilter {
            kind: KindFilter::Series,
            ..Default::default()
        };
        assert_eq!(candidates(&titles, &series).len(), 2);

        let mix = RollFilter::default();
        assert_eq!(candidates(&titles, &mix).len(), 4);
    }

    #[test]
    fn test_exclude_watched() {
        let titles = sample_titles();

        let filter = RollFilter {
            exclude_watched: true,
            ..Default::default()
        };

        let picks = candidates(&titles, &filter);
        assert_eq!(picks.len(), 3);
        assert!(picks.iter().all(|t| !t.watched));
    }

    #[test]
    fn test_genre_intersection() {
        let titles = sample_titles();

        let filter = RollFilter {
            genres: HashSet::from(["Sci-Fi".to_string()]),
            ..Default::default()
        };
        assert_eq!(candidates(&titles, &filter).len(), 2);

        // Empty genre set means no constraint
        let unconstrained = RollFilter::default();
        assert_eq!(candidates(&titles, &unconstrained).len(), 4);
    }

    #[test]
    fn test_draw_no_duplicates_and_bounded() {
        let titles = sample_titles();
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..50 {
            let picked = draw(&titles, &RollFilter::default(), 3, &mut rng);
            assert_eq!(picked.len(), 3);

            let ids: HashSet<_> = picked.iter().map(|t| t.id).collect();
            assert_eq!(ids.len(), picked.len());
        }
    }

    #[test]
    fn test_draw_never_exceeds_candidates() {
        let titles = sample_titles();
        let mut rng = StdRng::seed_from_u64(7);

        let filter = RollFilter {
            kind: KindFilter::Series,
            ..Default::default()
        };

        // Only 2 series exist even though 3 were requested
        let picked = draw(&titles, &filter, 3, &mut rng);
        assert_eq!(picked.len(), 2);
    }

    #[test]
    fn test_draw_clamps_requested_count() {
        let titles = sample_titles();
        let mut rng = StdRng::seed_from_u64(7);

        assert_eq!(draw(&titles, &RollFilter::default(), 0, &mut rng).len(), 1);
        assert_eq!(draw(&titles, &RollFilter::default(), 99, &mut rng).len(), 3);
    }

    #[test]
    fn test_draw_empty_candidates() {
        let mut only_watched_film = vec![Title::new("Parasite", TitleKind::Film)];
        only_watched_film[0].watched = true;

        let filter = RollFilter {
            kind: KindFilter::Films,
            exclude_watched: true,
            ..Default::default()
        };

        let mut rng = StdRng::seed_from_u64(7);
        assert!(draw(&only_watched_film, &filter, 1, &mut rng).is_empty());
    }
}
