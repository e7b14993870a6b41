use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use availability_client::{AvailabilityClient, SearchController, SearchStatus};
use campground_catalog::CampgroundCatalog;
use chrono::{Local, NaiveDate};
use persistence::FileStore;
use result_view::ResultRenderer;
use search_form::SelectionState;

use crate::cli::{Command, DatesArgs, SearchArgs};
use crate::config::AppConfig;
use crate::display::{TerminalUi, print_checklist, print_results, print_selection};

/// Runs one sub-command against the saved form state.
///
/// Returns `false` when a search ended without results being shown; the
/// user has already been alerted in that case.
pub async fn run(command: Command, config: &AppConfig) -> anyhow::Result<bool> {
    let catalog = Arc::new(load_catalog(config)?);
    let mut state = open_state(config, &catalog, Local::now().date_naive());

    match command {
        Command::Campgrounds => print_checklist(&state),
        Command::Show => print_selection(&state),
        Command::Dates(args) => set_dates(&mut state, args)?,
        Command::Select { ids } => set_checked(&mut state, &ids, true)?,
        Command::Deselect { ids } => set_checked(&mut state, &ids, false)?,
        Command::SelectAll => {
            state.select_all();
            print_checklist(&state);
        }
        Command::ClearAll => {
            state.clear_all();
            print_checklist(&state);
        }
        Command::Search(args) => return search(config, catalog, &state, args).await,
    }

    Ok(true)
}

fn load_catalog(config: &AppConfig) -> anyhow::Result<CampgroundCatalog> {
    match &config.catalog_file {
        Some(path) => CampgroundCatalog::from_path(path)
            .with_context(|| format!("Failed to load catalog {}", path.display())),
        None => Ok(CampgroundCatalog::yosemite()),
    }
}

fn open_state(
    config: &AppConfig,
    catalog: &CampgroundCatalog,
    today: NaiveDate,
) -> SelectionState<FileStore> {
    let store = FileStore::open(&config.state_file);
    log::debug!("📁 Form state file: {}", store.path().display());
    SelectionState::initialize(store, catalog, today, config.persist_days)
}

fn set_dates(state: &mut SelectionState<FileStore>, args: DatesArgs) -> anyhow::Result<()> {
    if let Some(start) = args.start {
        state.set_start_date(start)?;
    }
    if let Some(end) = args.end {
        state.set_end_date(end)?;
    }

    print_selection(state);
    Ok(())
}

fn set_checked(
    state: &mut SelectionState<FileStore>,
    ids: &[String],
    checked: bool,
) -> anyhow::Result<()> {
    state.set_checked_many(ids, checked)?;
    print_checklist(state);
    Ok(())
}

async fn search(
    config: &AppConfig,
    catalog: Arc<CampgroundCatalog>,
    state: &SelectionState<FileStore>,
    args: SearchArgs,
) -> anyhow::Result<bool> {
    let client = AvailabilityClient::new(&config.client_config())?;
    let controller = SearchController::new(Arc::new(client));
    let ui = TerminalUi::new();

    let outcome = match controller.search(state.form(), &ui).await {
        SearchStatus::Completed(outcome) => outcome,
        SearchStatus::Rejected(_) | SearchStatus::Busy | SearchStatus::Failed(_) => {
            return Ok(false);
        }
    };

    let mut view = ResultRenderer::new(catalog).render(&outcome.results, outcome.found_any);

    let now = Instant::now();
    for panel in view.panels_mut() {
        if args.expand_all || args.expand.contains(&panel.campground_id) {
            panel.toggle(now);
        }
    }
    for id in &args.expand {
        if !view.panels().iter().any(|panel| &panel.campground_id == id) {
            log::warn!("⚠️ No result panel for campground {}", id);
        }
    }

    print_results(&view, now);
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use persistence::KeyValueStore;
    use search_form::{CAMPGROUNDS_KEY, START_DATE_KEY};

    fn config(dir: &tempfile::TempDir) -> AppConfig {
        AppConfig {
            api_url: "http://127.0.0.1:9".to_string(),
            endpoint_mode: None,
            state_file: dir.path().join("state.json"),
            catalog_file: None,
            persist_days: 30,
            http_timeout: Duration::from_secs(2),
        }
    }

    fn date(value: &str) -> NaiveDate {
        NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
    }

    #[tokio::test]
    async fn test_selection_is_saved_between_runs() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(&dir);

        let succeeded = run(
            Command::Select {
                ids: vec!["232450".to_string(), "232447".to_string()],
            },
            &config,
        )
        .await
        .unwrap();
        assert!(succeeded);

        let store = FileStore::open(&config.state_file);
        assert_eq!(
            store.load(CAMPGROUNDS_KEY),
            Some(r#"["232447","232450"]"#.to_string())
        );
    }

    #[tokio::test]
    async fn test_unknown_campground_is_an_error() {
        let dir = tempfile::tempdir().unwrap();

        let result = run(
            Command::Select {
                ids: vec!["not-a-campground".to_string()],
            },
            &config(&dir),
        )
        .await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_select_with_unknown_id_saves_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(&dir);

        let result = run(
            Command::Select {
                ids: vec!["232447".to_string(), "bogus".to_string()],
            },
            &config,
        )
        .await;

        assert!(result.is_err());
        assert_eq!(FileStore::open(&config.state_file).load(CAMPGROUNDS_KEY), None);
    }

    #[tokio::test]
    async fn test_huge_persist_days_still_saves() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config(&dir);
        config.persist_days = 100_000_000;

        run(
            Command::Select {
                ids: vec!["232447".to_string()],
            },
            &config,
        )
        .await
        .unwrap();

        assert_eq!(
            FileStore::open(&config.state_file).load(CAMPGROUNDS_KEY),
            Some(r#"["232447"]"#.to_string())
        );
    }

    #[tokio::test]
    async fn test_dates_are_saved() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(&dir);
        let start = Local::now().date_naive() + chrono::Duration::days(10);

        run(
            Command::Dates(DatesArgs {
                start: Some(start),
                end: Some(start + chrono::Duration::days(2)),
            }),
            &config,
        )
        .await
        .unwrap();

        let state = open_state(&config, &CampgroundCatalog::yosemite(), date("2000-01-01"));
        assert_eq!(
            state.store().load(START_DATE_KEY),
            Some(start.format("%Y-%m-%d").to_string())
        );
        assert_eq!(state.start().value, Some(start));
    }

    #[tokio::test]
    async fn test_search_without_selection_fails_before_any_request() {
        let dir = tempfile::tempdir().unwrap();

        let succeeded = run(
            Command::Search(SearchArgs {
                expand: Vec::new(),
                expand_all: false,
            }),
            &config(&dir),
        )
        .await
        .unwrap();

        assert!(!succeeded);
    }

    #[tokio::test]
    async fn test_custom_catalog_file() {
        let dir = tempfile::tempdir().unwrap();
        let catalog_path = dir.path().join("catalog.json");
        std::fs::write(
            &catalog_path,
            r#"[{"id": "1", "name": "Camp One", "link": "https://example.com/1"}]"#,
        )
        .unwrap();

        let mut config = config(&dir);
        config.catalog_file = Some(catalog_path);

        assert_eq!(load_catalog(&config).unwrap().len(), 1);
        assert!(
            run(
                Command::Select {
                    ids: vec!["232447".to_string()]
                },
                &config
            )
            .await
            .is_err()
        );
    }
}
