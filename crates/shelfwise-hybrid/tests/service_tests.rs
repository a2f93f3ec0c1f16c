mod common;

use std::collections::HashSet;
use std::sync::Arc;

use tempfile::TempDir;

use shelfwise_core::config::{Config, ServiceConfig};
use shelfwise_core::error::Error;
use shelfwise_core::types::{MatchKind, Status};
use shelfwise_hybrid::BookService;

fn config() -> ServiceConfig {
    let mut c = ServiceConfig::default();
    c.embedding.dimension = common::DIM;
    c
}

fn ready_service(tmp: &TempDir) -> BookService {
    let paths = common::write_artifacts(tmp.path());
    BookService::start_with_paths(&config(), &paths)
}

#[test]
fn full_artifact_set_makes_both_capabilities_ready() {
    let tmp = TempDir::new().unwrap();
    let service = ready_service(&tmp);
    let readiness = service.readiness();
    assert!(readiness.is_ready(), "{readiness:?}");
}

#[test]
fn recommend_space_adventure_returns_five_distinct_ranked_books() {
    let tmp = TempDir::new().unwrap();
    let service = ready_service(&tmp);
    let results = service.recommend("space adventure novel", Some(5)).expect("recommend");
    assert_eq!(results.len(), 5);
    let ids: HashSet<&str> = results.iter().map(|r| r.book.id.as_str()).collect();
    assert_eq!(ids.len(), 5);
    assert!(results.windows(2).all(|w| w[0].score >= w[1].score));
    assert!(ids.contains("b7"), "the space adventure should be among the top five");
}

#[test]
fn default_top_k_comes_from_config() {
    let tmp = TempDir::new().unwrap();
    let paths = common::write_artifacts(tmp.path());
    let mut c = config();
    c.recommend.default_top_k = 3;
    let service = BookService::start_with_paths(&c, &paths);
    assert_eq!(service.recommend("dragon", None).unwrap().len(), 3);
}

#[test]
fn invalid_top_k_is_reported_not_panicked() {
    let tmp = TempDir::new().unwrap();
    let service = ready_service(&tmp);
    assert!(matches!(service.recommend("dragon", Some(0)), Err(Error::InvalidArgument(_))));
}

#[test]
fn autocomplete_puts_prefix_match_first_and_predicts_a_term() {
    let tmp = TempDir::new().unwrap();
    let service = ready_service(&tmp);
    let response = service.autocomplete("The Ho").expect("autocomplete");
    assert_eq!(response.matches.first().map(String::as_str), Some("The Hobbit"));
    let unique: HashSet<&String> = response.matches.iter().collect();
    assert_eq!(unique.len(), response.matches.len());

    let response = service.autocomplete("drag").unwrap();
    assert_eq!(response.prediction.as_deref(), Some("dragon"));

    let suggestions = service.suggest("The Ho").unwrap();
    assert_eq!(suggestions[0].kind, MatchKind::Prefix);
}

#[test]
fn empty_autocomplete_query_is_empty_response() {
    let tmp = TempDir::new().unwrap();
    let service = ready_service(&tmp);
    let response = service.autocomplete("").unwrap();
    assert!(response.matches.is_empty());
    assert_eq!(response.prediction, None);
}

#[test]
fn missing_embeddings_disable_only_recommend() {
    let tmp = TempDir::new().unwrap();
    let paths = common::write_artifacts(tmp.path());
    std::fs::remove_file(&paths.embeddings).unwrap();
    let service = BookService::start_with_paths(&config(), &paths);

    let readiness = service.readiness();
    assert!(matches!(readiness.recommend, Status::Unavailable { ref reason } if reason.contains("not found")));
    assert_eq!(readiness.autocomplete, Status::Ready);

    match service.recommend("dragon", Some(3)) {
        Err(Error::Unavailable(reason)) => assert!(reason.contains("book_embeddings.arrow")),
        other => panic!("expected unavailable, got {other:?}"),
    }
    assert!(service.autocomplete("Dune").is_ok());
}

#[test]
fn missing_term_matrix_disables_only_autocomplete() {
    let tmp = TempDir::new().unwrap();
    let paths = common::write_artifacts(tmp.path());
    std::fs::remove_file(&paths.term_matrix).unwrap();
    let service = BookService::start_with_paths(&config(), &paths);

    let readiness = service.readiness();
    assert_eq!(readiness.recommend, Status::Ready);
    assert!(!readiness.autocomplete.is_ready());
    assert!(matches!(service.autocomplete("Dune"), Err(Error::Unavailable(_))));
    assert!(matches!(service.suggest("Dune"), Err(Error::Unavailable(_))));
    assert_eq!(service.recommend("dragon", Some(3)).unwrap().len(), 3);
}

#[test]
fn missing_metadata_disables_everything() {
    let tmp = TempDir::new().unwrap();
    let paths = common::write_artifacts(tmp.path());
    std::fs::remove_file(&paths.metadata).unwrap();
    let service = BookService::start_with_paths(&config(), &paths);

    assert!(!service.readiness().recommend.is_ready());
    assert!(!service.readiness().autocomplete.is_ready());
    assert!(matches!(service.autocomplete("Dune"), Err(Error::Unavailable(_))));
}

#[test]
fn wrong_encoder_dimension_leaves_recommend_unavailable() {
    let tmp = TempDir::new().unwrap();
    let paths = common::write_artifacts(tmp.path());
    let mut c = config();
    c.embedding.dimension = common::DIM * 2;
    let service = BookService::start_with_paths(&c, &paths);
    assert!(matches!(service.recommend("dragon", Some(1)), Err(Error::Unavailable(_))));
}

#[test]
fn from_config_resolves_artifacts_relative_to_config_dir() {
    let tmp = TempDir::new().unwrap();
    common::write_artifacts(&tmp.path().join("artifacts"));
    std::fs::write(tmp.path().join("config.toml"), format!("[embedding]\ndimension = {}\n", common::DIM)).unwrap();

    let config = Config::load_from(tmp.path()).unwrap();
    let service = BookService::from_config(&config).expect("service");
    assert!(service.readiness().is_ready());
}

#[test]
fn shared_service_answers_concurrent_requests_identically() {
    let tmp = TempDir::new().unwrap();
    let service = Arc::new(ready_service(&tmp));
    let expected = service.recommend("planet empire", Some(4)).unwrap();
    let expected_ac = service.autocomplete("the").unwrap();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let s = Arc::clone(&service);
            std::thread::spawn(move || (s.recommend("planet empire", Some(4)).unwrap(), s.autocomplete("the").unwrap()))
        })
        .collect();
    for h in handles {
        let (rec, ac) = h.join().unwrap();
        assert_eq!(rec, expected);
        assert_eq!(ac, expected_ac);
    }
}
