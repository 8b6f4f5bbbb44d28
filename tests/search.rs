mod common;

use std::io::Cursor;

use common::{CannedSummarizer, FailingNews, FailingSummarizer, StaticNews};
use news_digest::{
    cli::{self, shell, Action},
    nlp::SearchOutcome,
    Error, SummaryType, UserStore,
};

#[tokio::test]
async fn successful_search_is_recorded_with_preferred_type() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = UserStore::open(common::data_path(&dir));
    store.set_summary_type("detailed").unwrap();
    let summarizer = CannedSummarizer::new("Dental care prices climbed this week.");
    let pipeline = common::pipeline(StaticNews(common::sample_articles()), summarizer.clone())
        .with_top_k(2);

    let outcome = pipeline.search(&mut store, "dental care").await.unwrap();
    let SearchOutcome::Summarized(report) = outcome else {
        panic!("expected a summary");
    };
    assert_eq!(report.summary, "Dental care prices climbed this week.");
    assert_eq!(report.summary_type, SummaryType::Detailed);
    assert_eq!(report.chunks_used, 2);
    assert_eq!(report.articles.len(), 3);

    let history = store.list_history(None);
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].topic, "dental care");
    assert_eq!(history[0].summary_type, SummaryType::Detailed);

    let prompts = summarizer.prompts.lock().unwrap();
    assert!(prompts[0].starts_with("Write a comprehensive paragraph"));
    assert!(prompts[0].contains("1. Dental care costs rise"));
}

#[tokio::test]
async fn failed_summary_leaves_history_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = UserStore::open(common::data_path(&dir));
    let pipeline = common::pipeline(StaticNews(common::sample_articles()), FailingSummarizer);

    let err = pipeline.search(&mut store, "AI").await.unwrap_err();
    assert!(matches!(err, Error::Summarization(_)));
    assert!(store.list_history(None).is_empty());
}

#[tokio::test]
async fn retrieval_failure_is_surfaced() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = UserStore::open(common::data_path(&dir));
    let pipeline = common::pipeline(FailingNews, CannedSummarizer::new("unused"));

    let err = pipeline.search(&mut store, "AI").await.unwrap_err();
    assert!(matches!(err, Error::Retrieval(_)));
    assert!(store.list_history(None).is_empty());
}

#[tokio::test]
async fn empty_results_are_not_recorded() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = UserStore::open(common::data_path(&dir));
    let pipeline = common::pipeline(StaticNews(Vec::new()), CannedSummarizer::new("unused"));

    let outcome = pipeline.search(&mut store, "AI").await.unwrap();
    assert_eq!(outcome, SearchOutcome::NoArticles);
    assert!(store.list_history(None).is_empty());
}

#[tokio::test]
async fn index_is_persisted_when_directory_configured() {
    let dir = tempfile::tempdir().unwrap();
    let index_dir = dir.path().join("vector_db");
    let mut store = UserStore::open(common::data_path(&dir));
    let pipeline = common::pipeline(
        StaticNews(common::sample_articles()),
        CannedSummarizer::new("AI news."),
    )
    .with_index_dir(&index_dir);

    pipeline.search(&mut store, "AI").await.unwrap();
    assert!(index_dir.join("AI_collection/index.json").exists());
}

#[tokio::test]
async fn search_command_prints_summary_and_sources() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = common::pipeline(
        StaticNews(common::sample_articles()),
        CannedSummarizer::new("AI labs raced ahead."),
    );
    let mut app = common::app_with(&dir, pipeline);
    let mut out = Vec::new();

    cli::execute(&mut app, Action::Search("AI".into()), &mut out)
        .await
        .unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("Searching for news on: AI"));
    assert!(text.contains("Summary type: brief"));
    assert!(text.contains("SUMMARY: AI"));
    assert!(text.contains("AI labs raced ahead."));
    assert!(text.contains("1. AI models reach new benchmark - Example Wire"));
    assert!(text.contains("   URL: https://news.example/ai-models-reach-new-benchmark"));
    assert_eq!(app.store.list_history(None).len(), 1);
}

#[tokio::test]
async fn shell_session_runs_until_exit_and_survives_errors() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = common::pipeline(FailingNews, CannedSummarizer::new("unused"));
    let mut app = common::app_with(&dir, pipeline);
    let input = Cursor::new(
        "save AI\nsave ai\nlist\nsummary weekly\nsummary detailed\nsearch AI\nremove space\nbogus\nhistory\nexit\nlist\n",
    );
    let mut out = Vec::new();

    shell::run(&mut app, input, &mut out).await.unwrap();
    let text = String::from_utf8(out).unwrap();

    assert!(text.contains("Saved 'AI' to your topics."));
    assert!(text.contains("'ai' is already in your topics."));
    assert!(text.contains("Your saved topics:\n1. AI\n"));
    assert!(text.contains("Summary type must be 'brief' or 'detailed'."));
    assert!(text.contains("Set summary type to 'detailed'."));
    assert!(text.contains("Error: failed to retrieve articles: 429 Too Many Requests"));
    assert!(text.contains("'space' is not in your saved topics."));
    assert!(text.contains("Unknown command: bogus"));
    assert!(text.contains("Your search history is empty."));
    assert!(text.trim_end().ends_with("Goodbye!"));
    assert_eq!(text.matches("Your saved topics:").count(), 1);

    let reloaded = UserStore::open(common::data_path(&dir));
    assert_eq!(reloaded.list_topics(), ["AI".to_string()]);
    assert_eq!(reloaded.summary_type(), SummaryType::Detailed);
}

#[tokio::test]
async fn shell_ends_cleanly_at_end_of_input() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = common::pipeline(StaticNews(Vec::new()), CannedSummarizer::new("unused"));
    let mut app = common::app_with(&dir, pipeline);
    let mut out = Vec::new();

    shell::run(&mut app, Cursor::new("clear\n"), &mut out)
        .await
        .unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("Search history cleared."));
    assert!(text.trim_end().ends_with("Goodbye!"));
}

#[tokio::test]
async fn shell_keeps_going_after_undecodable_input() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = common::pipeline(StaticNews(Vec::new()), CannedSummarizer::new("unused"));
    let mut app = common::app_with(&dir, pipeline);
    let mut out = Vec::new();

    shell::run(
        &mut app,
        Cursor::new(b"\xff\xfe\nsave AI\nexit\n".to_vec()),
        &mut out,
    )
    .await
    .unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("Saved 'AI' to your topics."));
    assert!(text.trim_end().ends_with("Goodbye!"));
    assert_eq!(app.store.list_topics(), ["AI".to_string()]);
}
