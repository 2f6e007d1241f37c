mod bootstrap;

use anyhow::{anyhow, Context, Result};
use dashboard_core::settings::Settings;
use dashboard_data::analysis::{build_snapshot, DashboardRequest};
use dashboard_data::dataset::Dataset;
use dashboard_data::filter::{FilterSelection, MonthFilter};
use dashboard_runtime::data_manager::DataManager;
use dashboard_runtime::session::DashboardSession;
use dashboard_ui::app::App;
use dashboard_ui::summary::render_summary_text;

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::load_with_last_used();

    bootstrap::ensure_directories()?;
    bootstrap::setup_logging(&settings.log_level, settings.log_file.as_ref())?;

    tracing::info!("Sales Dashboard v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!("View: {}, Theme: {}", settings.view, settings.theme);

    let data_path = bootstrap::discover_data_path(settings.data_file.as_deref()).ok_or_else(|| {
        anyhow!(
            "no sales data found; pass --data-file or place {} in the working directory",
            bootstrap::DEFAULT_DATA_FILE
        )
    })?;

    let manager = DataManager::install_global(&data_path)?;
    let dataset = manager
        .dataset()
        .with_context(|| format!("cannot start without data from {}", data_path.display()))?;
    tracing::info!(rows = dataset.len(), path = %data_path.display(), "dataset ready");

    let request = initial_request(&settings, &dataset)?;

    match settings.view.as_str() {
        "summary" => {
            let snapshot = build_snapshot(&dataset, &request);
            if settings.format == "json" {
                println!("{}", serde_json::to_string_pretty(&snapshot)?);
            } else {
                print!("{}", render_summary_text(&snapshot, settings.year));
            }
        }

        _ => {
            let app = App::new(
                DashboardSession::with_request(dataset, request),
                &settings.theme,
            );

            // The TUI exits on 'q' / Ctrl+C itself; the signal branch covers
            // a Ctrl+C delivered outside raw mode.
            tokio::select! {
                result = app.run() => result?,
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Ctrl+C received; shutting down");
                }
            }
        }
    }

    Ok(())
}

/// Build the first request from `--category`, `--weekday`, `--year` and
/// `--month`. Empty category or weekday lists mean "everything".
fn initial_request(settings: &Settings, dataset: &Dataset) -> Result<DashboardRequest> {
    let non_empty = |values: &[String]| (!values.is_empty()).then(|| values.to_vec());
    let selection = FilterSelection::from_parts(
        dataset,
        non_empty(&settings.categories),
        non_empty(&settings.weekdays),
    );

    let unknown = selection.unknown_values(dataset);
    if !unknown.is_empty() {
        tracing::warn!(?unknown, "selected values do not occur in the dataset");
    }

    let mut request = DashboardRequest::new(selection);
    if let Some(label) = &settings.month {
        let month = MonthFilter::parse(label).ok_or_else(|| anyhow!("unknown month: {label}"))?;
        let years: Vec<i32> = match settings.year {
            Some(year) => vec![year],
            None => dataset.years().to_vec(),
        };
        for year in years {
            request = request.with_month(year, month);
        }
    }
    Ok(request)
}
