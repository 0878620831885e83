//! Integration tests for the matching engines.

use std::sync::Arc;

use falx::analysis::StandardPipeline;
use falx::error::{FalxError, Result};
use falx::matching::{
    DaatMatching, Matching, MatchingQueryTerms, StreamingTaatMatching, TaatMatching,
};
use falx::scoring::{Bm25, Dlh};
use falx::structures::{Index, MemoryIndex};

fn make_index(documents: &[&str]) -> Arc<MemoryIndex> {
    Arc::new(MemoryIndex::from_documents(documents, &StandardPipeline::default()).unwrap())
}

/// All engines, streaming variants included.
fn all_engines(index: &Arc<MemoryIndex>) -> Vec<Box<dyn Matching>> {
    let index: Arc<dyn Index> = Arc::clone(index) as Arc<dyn Index>;
    vec![
        Box::new(TaatMatching::new(Arc::clone(&index))),
        Box::new(StreamingTaatMatching::new(Arc::clone(&index))),
        Box::new(DaatMatching::new(index)),
    ]
}

/// The engines that pre-load posting lists.
fn preloading_engines(index: &Arc<MemoryIndex>) -> Vec<Box<dyn Matching>> {
    let index: Arc<dyn Index> = Arc::clone(index) as Arc<dyn Index>;
    vec![
        Box::new(TaatMatching::new(Arc::clone(&index))),
        Box::new(DaatMatching::new(index)),
    ]
}

#[test]
fn test_single_document_index_matching() -> Result<()> {
    let index = make_index(&["The quick brown fox jumps over the lazy dog"]);
    assert_eq!(index.collection_statistics().number_of_documents(), 1);

    for engine in all_engines(&index) {
        let mut terms = MatchingQueryTerms::new();
        terms.add_term("quick");
        terms.set_default_model(Arc::new(Bm25::default()));

        let results = engine.match_query("query1", &terms)?;
        assert_eq!(results.result_size(), 1);
        assert_eq!(results.docid(0)?, 0);
        assert!(results.score(0)? > 0.0);
        assert_eq!(results.exact_result_size(), 1);
    }
    Ok(())
}

#[test]
fn test_two_documents_index_matching() -> Result<()> {
    let index = make_index(&[
        "The quick brown fox jumps over the lazy dog",
        "how much is that dog in the window",
    ]);
    assert_eq!(index.collection_statistics().number_of_documents(), 2);

    for engine in all_engines(&index) {
        let mut terms = MatchingQueryTerms::new();
        terms.add_term("quick");
        terms.set_default_model(Arc::new(Bm25::default()));
        let results = engine.match_query("query1", &terms)?;
        assert_eq!(results.result_size(), 1);
        assert_eq!(results.docid(0)?, 0);
        assert!(results.score(0)? > 0.0);

        let mut terms = MatchingQueryTerms::new();
        terms.add_term("dog");
        terms.set_default_model(Arc::new(Bm25::default()));
        let results = engine.match_query("query2", &terms)?;
        assert_eq!(results.result_size(), 2);
        assert!(results.score(0)? > 0.0);
        assert!(results.score(1)? > 0.0);
    }
    Ok(())
}

#[test]
fn test_two_documents_two_terms() -> Result<()> {
    let index = make_index(&[
        "The quick brown fox jumps over the lazy dog",
        "how much is that dog in the window",
    ]);

    for engine in all_engines(&index) {
        let mut terms = MatchingQueryTerms::new();
        terms.add_term("dog");
        terms.add_term("window");
        terms.set_default_model(Arc::new(Bm25::default()));

        let results = engine.match_query("query1", &terms)?;
        assert_eq!(results.result_size(), 2);
        // Document 1 matches both terms and must rank first.
        assert_eq!(results.docid(0)?, 1);
        assert_eq!(results.docid(1)?, 0);
        assert_eq!(results.occurrence(0)?, 2);
        assert_eq!(results.occurrence(1)?, 1);
        assert!(results.score(0)? > 0.0);
        assert!(results.score(1)? > 0.0);
    }
    Ok(())
}

#[test]
fn test_three_documents_synonym_index_matching() -> Result<()> {
    let index = make_index(&[
        "The quick brown fox jumps over the lazy dog",
        "how much is that dog in the window",
        "the one with the waggily tail",
    ]);
    assert_eq!(index.collection_statistics().number_of_documents(), 3);

    for engine in preloading_engines(&index) {
        let mut terms = MatchingQueryTerms::new();
        terms.add_synonym_group(&["quick", "waggily"]);
        terms.set_default_model(Arc::new(Dlh));

        let results = engine.match_query("query1", &terms)?;
        assert_eq!(results.result_size(), 2);
        let docids: Vec<u64> = results.docids().to_vec();
        assert!(docids.contains(&0));
        assert!(docids.contains(&2));
        // The shorter matching document ranks first under a
        // length-normalizing model.
        assert_eq!(results.docid(0)?, 2);
        assert_eq!(results.docid(1)?, 0);
        assert!(results.score(0)? > 0.0);
        assert!(results.score(1)? > 0.0);
        // One slot matched per document, even if both synonyms had hit.
        assert_eq!(results.occurrence(0)?, 1);
        assert_eq!(results.occurrence(1)?, 1);
    }
    Ok(())
}

#[test]
fn test_synonyms_in_one_document_score_once() -> Result<()> {
    // Both group members occur in document 0; it must count as a single
    // occurrence of the slot, scored once with summed frequency.
    let index = make_index(&["quick waggily fox", "plain other text"]);

    for engine in preloading_engines(&index) {
        let mut terms = MatchingQueryTerms::new();
        terms.add_synonym_group(&["quick", "waggily"]);
        terms.set_default_model(Arc::new(Bm25::default()));

        let results = engine.match_query("query1", &terms)?;
        assert_eq!(results.result_size(), 1);
        assert_eq!(results.docid(0)?, 0);
        assert_eq!(results.occurrence(0)?, 1);
    }
    Ok(())
}

#[test]
fn test_matching_does_not_overwrite_statistics() -> Result<()> {
    let index = make_index(&["The quick brown fox jumps over the lazy dog"]);

    for engine in all_engines(&index) {
        let mut terms = MatchingQueryTerms::new();
        terms.set_default_model(Arc::new(Bm25::default()));

        let mut entry = index.lexicon_entry("quick").unwrap();
        entry.set_statistics(1, 40);
        terms.set_statistics("quick", entry);

        let results = engine.match_query("query1", &terms)?;
        assert_eq!(results.result_size(), 1);
        assert_eq!(results.docid(0)?, 0);

        // The injected statistics survive matching untouched.
        let stats = terms.statistics("quick").unwrap();
        assert_eq!(stats.doc_frequency(), 1);
        assert_eq!(stats.total_frequency(), 40);
    }
    Ok(())
}

#[test]
fn test_absent_terms_yield_empty_result_set() -> Result<()> {
    let index = make_index(&["The quick brown fox jumps over the lazy dog"]);

    for engine in all_engines(&index) {
        let mut terms = MatchingQueryTerms::new();
        terms.add_term("unicorn");
        terms.add_term("dragon");
        terms.set_default_model(Arc::new(Bm25::default()));

        let results = engine.match_query("query1", &terms)?;
        assert_eq!(results.result_size(), 0);
        assert_eq!(results.exact_result_size(), 0);
    }
    Ok(())
}

#[test]
fn test_empty_query_is_a_configuration_error() {
    let index = make_index(&["some document"]);

    for engine in all_engines(&index) {
        let terms = MatchingQueryTerms::new();
        assert!(matches!(
            engine.match_query("query1", &terms),
            Err(FalxError::Query(_))
        ));
    }
}

#[test]
fn test_missing_model_is_a_configuration_error() {
    let index = make_index(&["some document"]);

    for engine in all_engines(&index) {
        let mut terms = MatchingQueryTerms::new();
        terms.add_term("document");
        assert!(matches!(
            engine.match_query("query1", &terms),
            Err(FalxError::Other(_))
        ));
    }
}

#[test]
fn test_fielded_scoring_matches_unfielded() -> Result<()> {
    // Fields are indexed and exposed, but scoring ignores them: the same
    // documents split into fields score identically to their concatenation.
    let titles = ["Simple fox example 1", "Simple dog example 1"];
    let bodies = [
        "The quick brown fox jumps over the lazy dog",
        "how much is that dog in the window",
    ];

    let fielded_docs: Vec<Vec<(&str, &str)>> = titles
        .iter()
        .zip(bodies.iter())
        .map(|(&title, &body)| vec![("title", title), ("body", body)])
        .collect();
    let fielded_refs: Vec<&[(&str, &str)]> = fielded_docs.iter().map(|d| d.as_slice()).collect();
    let fielded = Arc::new(MemoryIndex::from_fielded_documents(
        &["title", "body"],
        &fielded_refs,
        &StandardPipeline::default(),
    )?);

    let joined: Vec<String> = titles
        .iter()
        .zip(bodies.iter())
        .map(|(&title, &body)| format!("{title} {body}"))
        .collect();
    let joined_refs: Vec<&str> = joined.iter().map(|s| s.as_str()).collect();
    let unfielded = make_index(&joined_refs);

    for query_term in ["fox", "dog", "example"] {
        let mut terms = MatchingQueryTerms::new();
        terms.add_term(query_term);
        terms.set_default_model(Arc::new(Bm25::default()));

        let fielded_engine = DaatMatching::new(Arc::clone(&fielded) as Arc<dyn Index>);
        let unfielded_engine = DaatMatching::new(Arc::clone(&unfielded) as Arc<dyn Index>);
        let from_fields = fielded_engine.match_query("query1", &terms)?;
        let from_plain = unfielded_engine.match_query("query1", &terms)?;

        assert_eq!(from_fields.docids(), from_plain.docids());
        assert_eq!(from_fields.scores(), from_plain.scores());
    }
    Ok(())
}

#[test]
fn test_paging_preserves_exact_result_size() -> Result<()> {
    let index = make_index(&["dog one", "dog two", "dog three", "dog four"]);

    let engine = TaatMatching::new(Arc::clone(&index) as Arc<dyn Index>);
    let mut terms = MatchingQueryTerms::new();
    terms.add_term("dog");
    terms.set_default_model(Arc::new(Bm25::default()));

    let results = engine.match_query("query1", &terms)?;
    assert_eq!(results.exact_result_size(), 4);

    let page = results.get_result_set(0, 2)?;
    assert_eq!(page.result_size(), 2);
    assert_eq!(page.exact_result_size(), 4);
    Ok(())
}

fn assert_equivalent(left: &falx::results::ResultSet, right: &falx::results::ResultSet) {
    assert_eq!(left.docids(), right.docids());
    assert_eq!(left.occurrences(), right.occurrences());
    assert_eq!(left.exact_result_size(), right.exact_result_size());
    for (a, b) in left.scores().iter().zip(right.scores().iter()) {
        let tolerance = 1e-9 * a.abs().max(b.abs()).max(1.0);
        assert!((a - b).abs() <= tolerance, "scores diverge: {a} vs {b}");
    }
}

#[test]
fn test_cross_strategy_equivalence() -> Result<()> {
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rand::seq::IndexedRandom;

    let vocabulary: Vec<String> = (0..50).map(|i| format!("term{i}")).collect();
    let mut rng = StdRng::seed_from_u64(42);

    let documents: Vec<String> = (0..200)
        .map(|i| {
            let length = 5 + (i * 7) % 26;
            (0..length)
                .map(|_| vocabulary.choose(&mut rng).unwrap().as_str())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect();
    let refs: Vec<&str> = documents.iter().map(|s| s.as_str()).collect();
    let index = make_index(&refs);

    let mut plain = MatchingQueryTerms::new();
    plain.add_term("term3");
    plain.add_term("term17");
    plain.add_term("term41");
    plain.set_default_model(Arc::new(Bm25::default()));

    let mut weighted = MatchingQueryTerms::new();
    weighted.add_weighted_term("term5", 2.5);
    weighted.add_term("term5");
    weighted.add_term("term29");
    weighted.set_default_model(Arc::new(Bm25::default()));

    let mut synonyms = MatchingQueryTerms::new();
    synonyms.add_synonym_group(&["term2", "term7", "term11"]);
    synonyms.add_term("term23");
    synonyms.set_default_model(Arc::new(Bm25::default()));

    let engines = all_engines(&index);
    for (query_index, terms) in [&plain, &weighted].into_iter().enumerate() {
        let query_id = format!("query{query_index}");
        let baseline = engines[0].match_query(&query_id, terms)?;
        assert!(baseline.result_size() > 0);
        for engine in &engines[1..] {
            let other = engine.match_query(&query_id, terms)?;
            assert_equivalent(&baseline, &other);
        }
    }

    let engines = preloading_engines(&index);
    let baseline = engines[0].match_query("query2", &synonyms)?;
    assert!(baseline.result_size() > 0);
    for engine in &engines[1..] {
        let other = engine.match_query("query2", &synonyms)?;
        assert_equivalent(&baseline, &other);
    }
    Ok(())
}

#[test]
fn test_concurrent_queries_share_one_index() -> Result<()> {
    let index = make_index(&[
        "The quick brown fox jumps over the lazy dog",
        "how much is that dog in the window",
        "the one with the waggily tail",
    ]);

    let mut baseline_terms = MatchingQueryTerms::new();
    baseline_terms.add_term("dog");
    baseline_terms.set_default_model(Arc::new(Bm25::default()));
    let baseline = TaatMatching::new(Arc::clone(&index) as Arc<dyn Index>)
        .match_query("baseline", &baseline_terms)?;

    let mut handles = Vec::new();
    for worker in 0..8 {
        let index = Arc::clone(&index);
        handles.push(std::thread::spawn(move || {
            let engine: Box<dyn Matching> = if worker % 2 == 0 {
                Box::new(TaatMatching::new(Arc::clone(&index) as Arc<dyn Index>))
            } else {
                Box::new(DaatMatching::new(Arc::clone(&index) as Arc<dyn Index>))
            };
            let mut terms = MatchingQueryTerms::new();
            terms.add_term("dog");
            terms.set_default_model(Arc::new(Bm25::default()));
            engine
                .match_query(&format!("worker{worker}"), &terms)
                .unwrap()
        }));
    }

    for handle in handles {
        let results = handle.join().unwrap();
        assert_eq!(results.docids(), baseline.docids());
        assert_eq!(results.scores(), baseline.scores());
    }
    Ok(())
}
