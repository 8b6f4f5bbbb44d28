use news_digest::{SummaryType, UserStore};
use proptest::prelude::*;

fn kind() -> impl Strategy<Value = SummaryType> {
    prop_oneof![Just(SummaryType::Brief), Just(SummaryType::Detailed)]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn history_order_mirrors_calls(searches in prop::collection::vec(("[a-z ]{1,12}", kind()), 0..12)) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("user_data.json");
        let mut store = UserStore::open(&path);
        for (topic, kind) in &searches {
            store.record_search(topic, *kind).unwrap();
        }

        let expected: Vec<_> = searches.iter().rev().cloned().collect();
        let listed: Vec<_> = store
            .list_history(None)
            .into_iter()
            .map(|e| (e.topic.clone(), e.summary_type))
            .collect();
        prop_assert_eq!(&listed, &expected);

        let reloaded = UserStore::open(&path);
        prop_assert_eq!(reloaded.document(), store.document());
    }

    #[test]
    fn topics_stay_unique_ignoring_case(topics in prop::collection::vec("[A-Za-z]{1,6}", 1..16)) {
        let dir = tempfile::tempdir().unwrap();
        let mut store = UserStore::open(dir.path().join("user_data.json"));
        for topic in &topics {
            store.save_topic(topic).unwrap();
            store.save_topic(topic).unwrap();
        }

        let mut lowered: Vec<_> = store.list_topics().iter().map(|t| t.to_lowercase()).collect();
        let saved = lowered.len();
        lowered.sort();
        lowered.dedup();
        prop_assert_eq!(lowered.len(), saved);

        let mut distinct: Vec<_> = topics.iter().map(|t| t.to_lowercase()).collect();
        distinct.sort();
        distinct.dedup();
        prop_assert_eq!(saved, distinct.len());
    }
}
