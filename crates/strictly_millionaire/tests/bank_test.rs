//! Tests for question bank loading and sampling.

use rand::SeedableRng;
use rand::rngs::StdRng;
use std::collections::HashSet;
use std::fs;
use tempfile::TempDir;

use strictly_millionaire::{QuestionBank, QuizErrorKind};

fn record(id: u32, correct: usize) -> String {
    format!(
        r#"
[[questions]]
id = {id}
prompt = "Question {id}?"
answers = ["one", "two", "three", "four"]
correct = {correct}
difficulty = 3
"#
    )
}

#[test]
fn test_sample_ten_of_twenty_is_distinct() {
    let bank = QuestionBank::builtin().unwrap();
    let mut rng = StdRng::seed_from_u64(42);
    let drawn = bank.sample(10, &mut rng).unwrap();
    let ids: HashSet<_> = drawn.iter().map(|q| *q.id()).collect();
    assert_eq!(drawn.len(), 10);
    assert_eq!(ids.len(), 10);
}

#[test]
fn test_sample_order_varies_between_draws() {
    let bank = QuestionBank::builtin().unwrap();
    let mut rng = StdRng::seed_from_u64(8);
    let orders: HashSet<Vec<u32>> = (0..20)
        .map(|_| {
            bank.sample(10, &mut rng)
                .unwrap()
                .iter()
                .map(|q| *q.id())
                .collect()
        })
        .collect();
    assert!(orders.len() > 1, "every draw produced the same order");
}

#[test]
fn test_sample_covers_whole_pool() {
    let bank = QuestionBank::builtin().unwrap();
    let mut rng = StdRng::seed_from_u64(77);
    let mut seen = HashSet::new();
    for _ in 0..50 {
        for q in bank.sample(10, &mut rng).unwrap() {
            seen.insert(*q.id());
        }
    }
    assert_eq!(seen.len(), 20);
}

#[test]
fn test_load_from_file() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("bank.toml");
    fs::write(&path, format!("{}{}", record(1, 0), record(2, 3))).expect("Write failed");

    let bank = QuestionBank::from_file(&path).expect("valid bank");
    assert_eq!(bank.len(), 2);
    assert_eq!(bank.questions()[1].answer_text(*bank.questions()[1].correct()), "four");
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let err = QuestionBank::from_file(dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err.kind(), QuizErrorKind::Io { .. }));
}

#[test]
fn test_duplicate_ids_rejected() {
    let source = format!("{}{}", record(4, 0), record(4, 1));
    let err = QuestionBank::from_toml_str(&source).unwrap_err();
    assert_eq!(err.kind(), &QuizErrorKind::DuplicateQuestionId(4));
}

#[test]
fn test_invalid_record_rejected() {
    let err = QuestionBank::from_toml_str(&record(9, 7)).unwrap_err();
    assert!(matches!(err.kind(), QuizErrorKind::InvalidQuestion { id: 9, .. }));
}

#[test]
fn test_malformed_toml_is_parse_error() {
    let err = QuestionBank::from_toml_str("this is not [[ toml").unwrap_err();
    assert!(matches!(err.kind(), QuizErrorKind::Parse(_)));
}
