use super::trie::builder::build_trie;
use super::trie::encode::{encode_to_vec, Encoder};
use super::trie::reader::TrieView;
use super::trie::{CodePoint, Trie};

use proptest::prelude::*;
use std::collections::BTreeSet;

fn check_sorted_children(trie: &Trie) {
    for id in trie.ids() {
        let cps: Vec<CodePoint> = trie.node(id).children().iter().map(|(cp, _)| cp).collect();
        assert!(
            cps.windows(2).all(|w| w[0] < w[1]),
            "children not strictly increasing: {cps:?}"
        );
        for (cp, child) in trie.node(id).children().iter() {
            assert_eq!(trie.node(child).code_point(), cp, "edge label mismatch");
        }
    }
}

// Small alphabets produce shared prefixes and wide nodes; the mixed one covers
// every UTF-8 sequence length.
fn word() -> impl Strategy<Value = String> {
    prop_oneof![
        "[ab]{0,6}",
        "[a-e]{0,4}",
        "[aé€😀]{0,5}",
        "\\PC{0,8}",
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn inserted_words_are_terminal(words in prop::collection::vec(word(), 0..40)) {
        let trie = build_trie(&words).unwrap();
        for w in &words {
            prop_assert!(trie.contains(w), "missing {w:?}");
        }
    }

    #[test]
    fn entries_are_exactly_the_distinct_inputs(words in prop::collection::vec(word(), 0..40)) {
        let trie = build_trie(&words).unwrap();
        let expected: Vec<String> = words.iter().cloned().collect::<BTreeSet<_>>().into_iter().collect();
        prop_assert_eq!(trie.words(), expected);
    }

    #[test]
    fn inserting_twice_is_idempotent(words in prop::collection::vec(word(), 0..30)) {
        let once = build_trie(&words).unwrap();
        let twice = build_trie(words.iter().chain(words.iter())).unwrap();
        prop_assert_eq!(&once, &twice);
        prop_assert_eq!(encode_to_vec(&once).unwrap(), encode_to_vec(&twice).unwrap());
    }

    #[test]
    fn siblings_strictly_increase(words in prop::collection::vec(word(), 0..40)) {
        let trie = build_trie(&words).unwrap();
        check_sorted_children(&trie);
    }

    #[test]
    fn subtree_sizes_match_written_bytes(words in prop::collection::vec(word(), 0..30)) {
        let trie = build_trie(&words).unwrap();
        let encoder = Encoder::new(&trie).unwrap();
        for id in trie.ids() {
            let mut buf = Vec::new();
            encoder.write_subtree(id, &mut buf).unwrap();
            prop_assert_eq!(buf.len() as u64, encoder.sizes().bytes(id));
        }
    }

    #[test]
    fn encoded_trie_reads_back(words in prop::collection::vec(word(), 0..40), query in word()) {
        let trie = build_trie(&words).unwrap();
        let bytes = encode_to_vec(&trie).unwrap();
        let view = TrieView::new(&bytes);
        for w in &words {
            prop_assert!(view.contains(w).unwrap());
        }
        prop_assert_eq!(view.contains(&query).unwrap(), trie.contains(&query));
        prop_assert_eq!(view.complete("", usize::MAX).unwrap(), trie.words());
    }
}
