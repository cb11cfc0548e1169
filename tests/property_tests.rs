#[cfg(test)]
mod property_tests {
    use proptest::prelude::*;
    use tabula::discretizer::Discretizer;
    use tabula::metrics::ReturnWindow;
    use tabula::q_table::QTable;
    use tabula::schedule::{geometric_decay, ExplorationSchedule};
    use tabula::top_k::TopKTracker;
    use tabula::types::{DimensionSpec, DiscreteState};
    use ndarray::Array1;

    // Strategy for generating valid dimension specs
    fn dimension_strategy() -> impl Strategy<Value = DimensionSpec> {
        (-100.0f32..100.0, 0.01f32..50.0, 1usize..=10)
            .prop_map(|(lower, width, bins)| DimensionSpec::new(lower, lower + width, bins))
    }

    fn grid_strategy() -> impl Strategy<Value = Vec<DimensionSpec>> {
        prop::collection::vec(dimension_strategy(), 1..=6)
    }

    // Strategy for generating a grid together with a finite observation
    fn grid_and_observation() -> impl Strategy<Value = (Vec<DimensionSpec>, Vec<f32>)> {
        grid_strategy().prop_flat_map(|dims| {
            let len = dims.len();
            (Just(dims), prop::collection::vec(-1000.0f32..1000.0, len))
        })
    }

    proptest! {
        #[test]
        fn test_discretize_stays_in_range((dims, obs) in grid_and_observation()) {
            let discretizer = Discretizer::new(dims.clone()).unwrap();
            let state = discretizer.discretize(Array1::from(obs).view()).unwrap();

            prop_assert_eq!(state.dim(), dims.len());
            for (&index, spec) in state.indices().iter().zip(dims.iter()) {
                prop_assert!(index < spec.bins);
            }
        }

        #[test]
        fn test_discretize_ignores_clipped_excess((dims, obs) in grid_and_observation()) {
            let discretizer = Discretizer::new(dims.clone()).unwrap();
            let clipped: Vec<f32> = obs
                .iter()
                .zip(dims.iter())
                .map(|(&v, d)| v.clamp(d.lower, d.upper))
                .collect();

            let raw = discretizer.discretize(Array1::from(obs).view()).unwrap();
            let pre_clipped = discretizer.discretize(Array1::from(clipped).view()).unwrap();
            prop_assert_eq!(raw, pre_clipped);
        }

        #[test]
        fn test_discretize_is_monotone(spec in dimension_strategy(), a in -200.0f32..200.0, b in -200.0f32..200.0) {
            let discretizer = Discretizer::new(vec![spec]).unwrap();
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let lo_state = discretizer.discretize(Array1::from(vec![lo]).view()).unwrap();
            let hi_state = discretizer.discretize(Array1::from(vec![hi]).view()).unwrap();
            prop_assert!(lo_state.indices()[0] <= hi_state.indices()[0]);
        }

        #[test]
        fn test_geometric_decay_non_increasing_and_floored(
            initial in 0.0f32..=1.0,
            min in 0.0f32..=1.0,
            decay in 0.0f32..1.0,
            episode in 0usize..10_000
        ) {
            let now = geometric_decay(initial, min, decay, episode);
            let next = geometric_decay(initial, min, decay, episode + 1);
            prop_assert!(next <= now);
            prop_assert!(now >= min);
        }

        #[test]
        fn test_exponential_to_floor_bounded(
            min in 0.0f32..=1.0,
            rate in 0.0f32..1.0,
            episode in 0usize..5_000
        ) {
            let schedule = ExplorationSchedule::exponential_to_floor(min, rate);
            let window = ReturnWindow::new(0);
            let now = schedule.next(episode, 0.0, &window);
            let next = schedule.next(episode + 1, 0.0, &window);
            prop_assert!(next <= now);
            prop_assert!(now >= min && now <= 1.0 + 1e-6);
        }

        #[test]
        fn test_adaptive_never_below_floor(
            min in 0.0f32..0.5,
            returns in prop::collection::vec(-100.0f32..100.0, 0..50)
        ) {
            let schedule = ExplorationSchedule::Adaptive {
                initial: 1.0,
                min,
                window: 5,
                threshold: 0.0,
                slow_decay: 0.99,
                fast_decay: 0.9,
            };
            let mut window = ReturnWindow::new(5);
            let mut epsilon = schedule.initial();
            for (episode, r) in returns.into_iter().enumerate() {
                window.push(r);
                let next = schedule.next(episode + 1, epsilon, &window);
                prop_assert!(next <= epsilon);
                prop_assert!(next >= min);
                epsilon = next;
            }
        }

        #[test]
        fn test_table_snapshot_bit_identical(
            bins in prop::collection::vec(1usize..=4, 1..=4),
            actions in 1usize..=5,
            values in prop::collection::vec(-1e6f32..1e6, 64)
        ) {
            let mut table = QTable::new(&bins, actions).unwrap();
            for (i, &v) in values.iter().enumerate() {
                let indices: Vec<usize> = bins.iter().map(|&b| i % b).collect();
                table.set(&DiscreteState::new(indices), i % actions, v);
            }

            let restored = QTable::from_bytes(&table.to_bytes().unwrap()).unwrap();
            prop_assert_eq!(restored.shape(), table.shape());
            for (a, b) in restored.values().iter().zip(table.values().iter()) {
                prop_assert_eq!(a.to_bits(), b.to_bits());
            }
        }

        #[test]
        fn test_best_action_is_maximal(values in prop::collection::vec(-10.0f32..10.0, 1..=8)) {
            let actions = values.len();
            let mut table = QTable::new(&[1], actions).unwrap();
            let state = DiscreteState::new(vec![0]);
            for (a, &v) in values.iter().enumerate() {
                table.set(&state, a, v);
            }

            let best = table.best_action(&state);
            prop_assert!(values.iter().all(|&v| v <= values[best]));
            // ties resolve to the first maximal index
            prop_assert!(values[..best].iter().all(|&v| v < values[best]));
            prop_assert_eq!(table.max_value(&state), values[best]);
        }

        #[test]
        fn test_top_k_holds_the_best(
            k in 1usize..=10,
            returns in prop::collection::vec(-1000.0f32..1000.0, 0..100)
        ) {
            let mut tracker = TopKTracker::new(k).unwrap();
            for (episode, &r) in returns.iter().enumerate() {
                tracker.offer(episode, r);
            }

            prop_assert_eq!(tracker.len(), k.min(returns.len()));
            let held = tracker.records();
            prop_assert!(held.windows(2).all(|w| w[0].total_return >= w[1].total_return));

            let mut sorted = returns.clone();
            sorted.sort_by(|a, b| b.total_cmp(a));
            for (record, expected) in held.iter().zip(sorted.iter()) {
                prop_assert_eq!(record.total_return, *expected);
                prop_assert_eq!(returns[record.episode], record.total_return);
            }
        }
    }
}
