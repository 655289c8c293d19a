use duelrank_core::{EngineConfig, RankingEngine, Rating};
use proptest::prelude::*;

fn rating() -> impl Strategy<Value = (f64, f64)> {
    (-3000.0f64..3000.0, 1.0f64..500.0)
}

fn score() -> impl Strategy<Value = f64> {
    prop_oneof![Just(0.0), Just(0.5), Just(1.0), 0.0f64..=1.0]
}

/// Comparisons as (a, b, score) over `n` items, self-pairs filtered out.
fn session(n: usize, max_len: usize) -> impl Strategy<Value = Vec<(usize, usize, f64)>> {
    prop::collection::vec((0..n, 0..n, score()), 0..max_len)
        .prop_map(|v| v.into_iter().filter(|(a, b, _)| a != b).collect())
}

fn engine_with(n: usize, avoid_repeat: bool) -> RankingEngine {
    let mut engine = RankingEngine::new(EngineConfig { avoid_repeat, ..EngineConfig::default() });
    for _ in 0..n {
        engine.add_item();
    }
    engine
}

proptest! {
    #[test]
    fn uncertainty_never_increases(me in rating(), opp in rating(), s in score()) {
        let mut r = Rating::new(me.0, me.1).unwrap();
        r.update(s, opp.0, opp.1);
        prop_assert!(r.uncertainty <= me.1);
        prop_assert!(r.uncertainty > 0.0);
        prop_assert!(r.rating.is_finite());
        prop_assert_eq!(r.comparison_count, 1);
    }

    #[test]
    fn rating_moves_with_surprise(me in rating(), opp in rating()) {
        let mut win = Rating::new(me.0, me.1).unwrap();
        let mut loss = Rating::new(me.0, me.1).unwrap();
        win.update(1.0, opp.0, opp.1);
        loss.update(0.0, opp.0, opp.1);
        prop_assert!(win.rating >= me.0);
        prop_assert!(loss.rating <= me.0);
    }

    #[test]
    fn swapped_order_gives_same_update(
        a in rating(),
        b in rating(),
        s in score()
    ) {
        let mut forward = RankingEngine::default();
        forward.add_item_with_prior(a.0, a.1).unwrap();
        forward.add_item_with_prior(b.0, b.1).unwrap();
        forward.apply_comparison(0, 1, s, true).unwrap();

        let mut reverse = RankingEngine::default();
        reverse.add_item_with_prior(a.0, a.1).unwrap();
        reverse.add_item_with_prior(b.0, b.1).unwrap();
        reverse.apply_comparison(1, 0, 1.0 - s, true).unwrap();

        let fa = forward.rating_of(0).unwrap();
        let ra = reverse.rating_of(0).unwrap();
        prop_assert!((fa.rating - ra.rating).abs() < 1e-9);
        prop_assert!((fa.uncertainty - ra.uncertainty).abs() < 1e-9);
    }

    #[test]
    fn selection_is_deterministic(comparisons in session(6, 30)) {
        let mut engine = engine_with(6, true);
        for (a, b, s) in comparisons {
            engine.apply_comparison(a, b, s, true).unwrap();
        }
        let first = engine.next_comparison();
        prop_assert_eq!(engine.next_comparison(), first);
        prop_assert_eq!(engine.next_comparison(), first);
    }

    #[test]
    fn last_pair_is_never_suggested_next(
        n in 4usize..8,
        comparisons in session(8, 25)
    ) {
        let mut engine = engine_with(n, true);
        let mut last = None;
        for (a, b, s) in comparisons.into_iter().filter(|(a, b, _)| *a < n && *b < n) {
            engine.apply_comparison(a, b, s, true).unwrap();
            last = Some((a, b));
        }
        if let Some((a, b)) = last {
            let (x, y) = engine.next_comparison().expect("at least one eligible pair");
            prop_assert!(x != a && x != b);
            prop_assert!(y != a && y != b);
            prop_assert!(x != y);
        }
    }

    #[test]
    fn export_round_trips(comparisons in session(5, 40)) {
        let mut engine = engine_with(5, true);
        for (i, (a, b, s)) in comparisons.into_iter().enumerate() {
            engine.apply_comparison(a, b, s, i % 4 != 0).unwrap();
        }

        let mut buf = Vec::new();
        engine.export_ratings(&mut buf).unwrap();
        let restored = RankingEngine::restore(buf.as_slice(), EngineConfig::default()).unwrap();

        prop_assert_eq!(restored.ratings(), engine.ratings());
        prop_assert_eq!(restored.comparisons(), engine.comparisons());
    }
}
