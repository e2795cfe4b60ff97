//! Property-based checks of mapping and lookup.

use std::sync::Arc;

use proptest::prelude::*;
use wasil::prelude::*;

#[derive(Clone, Debug, PartialEq)]
struct Setting(u32);

proptest! {
    #[test]
    fn mapped_value_round_trips(value in any::<u32>(), text in ".{0,16}") {
        let injector = Injector::new();
        injector.map_value(Setting(value)).map_value(text.clone());

        prop_assert_eq!(injector.get::<Setting>(), Some(Setting(value)));
        prop_assert_eq!(injector.get::<String>(), Some(text));
    }

    #[test]
    fn last_mapping_wins(values in prop::collection::vec(any::<u32>(), 1..10)) {
        let injector = Injector::new();
        for value in &values {
            injector.map_value(Setting(*value));
        }

        prop_assert_eq!(injector.len(), 1);
        prop_assert_eq!(injector.get::<Setting>(), values.last().copied().map(Setting));
    }

    #[test]
    fn nearest_injector_wins(values in prop::collection::vec(proptest::option::of(any::<u32>()), 1..6)) {
        // values[0] is the root, the last element the deepest child.
        let mut chain: Vec<Arc<Injector>> = vec![Arc::new(Injector::with_label("scope-0"))];
        for depth in 1..values.len() {
            let child = chain[depth - 1].child(format!("scope-{depth}"));
            chain.push(child);
        }
        for (injector, value) in chain.iter().zip(&values) {
            if let Some(value) = value {
                injector.map_value(Setting(*value));
            }
        }

        let expected = values.iter().rev().find_map(|value| value.map(Setting));
        let deepest = chain.last().unwrap();
        prop_assert_eq!(deepest.get::<Setting>(), expected);
    }

    #[test]
    fn provider_uses_deepest_parameter(depth in 1usize..6, value in any::<u32>()) {
        let root = Arc::new(Injector::with_label("root"));
        root.map_value(Setting(0))
            .map_provider(|setting: Setting| u64::from(setting.0) + 1);

        let mut current = Arc::clone(&root);
        for level in 0..depth {
            current = current.child(format!("level-{level}"));
        }
        current.map_value(Setting(value));

        prop_assert_eq!(current.get::<u64>(), Some(u64::from(value) + 1));
        prop_assert_eq!(root.get::<u64>(), Some(1));
    }
}
