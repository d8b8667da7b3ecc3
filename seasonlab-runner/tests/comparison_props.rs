//! Property tests for all-modes comparison over synthetic datasets.

use proptest::prelude::*;
use seasonlab_core::data::SyntheticConfig;
use seasonlab_core::FilterMode;
use seasonlab_runner::{compare_loaded, export_json, import_json, load_bars, LoadOptions};

fn loaded(seed: u64, weeks: usize, volatility: f64) -> seasonlab_runner::LoadedData {
    let opts = LoadOptions {
        synthetic_config: SyntheticConfig {
            seed,
            weeks,
            volatility,
            ..SyntheticConfig::default()
        },
        ..LoadOptions::synthetic("PROP")
    };
    load_bars(&opts).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn conditional_modes_split_the_tail(
        seed in any::<u64>(),
        weeks in 2usize..300,
        volatility in 0.0..0.05_f64,
    ) {
        let data = loaded(seed, weeks, volatility);
        let cmp = compare_loaded(&data, None);

        let all = cmp.get(FilterMode::All).unwrap();
        let up = cmp.get(FilterMode::AfterUp).unwrap();
        let down = cmp.get(FilterMode::AfterDown).unwrap();

        prop_assert_eq!(all.filtered_count, data.bars.len());
        prop_assert!(up.filtered_count + down.filtered_count <= data.bars.len() - 1);

        for r in &cmp.results {
            let total: usize = r.summary.iter().map(|s| s.count).sum();
            prop_assert_eq!(total, r.filtered_count);
            prop_assert_eq!(&r.dataset_hash, &cmp.dataset_hash);
        }
    }

    #[test]
    fn exported_results_reimport(seed in any::<u64>(), weeks in 0usize..120) {
        let data = loaded(seed, weeks, 0.03);
        for r in compare_loaded(&data, None).results {
            let restored = import_json(&export_json(&r).unwrap()).unwrap();
            prop_assert_eq!(restored.filter, r.filter);
            prop_assert_eq!(restored.status, r.status);
            prop_assert_eq!(restored.summary.len(), r.summary.len());
            for (a, b) in restored.summary.iter().zip(&r.summary) {
                prop_assert_eq!(a.has_infinite_profit_factor(), b.has_infinite_profit_factor());
            }
        }
    }
}
