use httpmock::prelude::*;
use ml_salary_dashboard::{
    render_state, source_for, Dashboard, DashboardConfig, LoadOutcome, LoadState, OutputFormat,
    RenderOptions, SortColumn, SortDirection, SourceOptions,
};
use std::io::Write;
use std::time::Duration;
use tempfile::NamedTempFile;

const SALARIES_CSV: &str = "\
Work Year,Experience-Level,Employment Type,Job Title,Salary,Salary Currency,Salary-In-USD,Employee Residence,Remote Ratio,Company Location,Company-Size
2023,SE,FT,Machine Learning Engineer,180000,USD,180000,US,0,US,M
2023,MI,FT,ML Engineer,120000,USD,120000,US,100,US,L
2022,EN,FT,ML Engineer,80000,EUR,84000,DE,50,DE,S
2024,SE,FT,ML Engineer,N/A,USD,N/A,US,0,US,M
,SE,FT,ML Engineer,100000,USD,100000,US,0,US,M
2022,SE,CT,ML Engineer,140000,USD,140000,CA,100,US,M
";

fn loaded(state: LoadState) -> ml_salary_dashboard::Aggregation {
    match state {
        LoadState::Loaded(aggregation) => aggregation,
        other => panic!("expected loaded state, got {:?}", other),
    }
}

#[tokio::test]
async fn test_end_to_end_over_http() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/data/salaries.csv");
        then.status(200)
            .header("Content-Type", "text/csv")
            .body(SALARIES_CSV);
    });

    let config = DashboardConfig {
        source: server.url("/data/salaries.csv"),
        ..DashboardConfig::default()
    };
    let source = source_for(&config.source, config.source_options());
    let dashboard = Dashboard::new(source, config.dashboard_options());

    assert_eq!(
        dashboard.reload().await,
        LoadOutcome::Committed { generation: 1 }
    );
    api_mock.assert();

    let aggregation = loaded(dashboard.state().await);
    assert_eq!(aggregation.rows.len(), 2);
    assert_eq!(aggregation.rows[0].year, "2023");
    assert_eq!(aggregation.rows[0].total_jobs, 2);
    assert_eq!(aggregation.rows[0].average_salary, 150000.0);
    assert_eq!(aggregation.rows[1].year, "2022");
    assert_eq!(aggregation.rows[1].average_salary, 112000.0);
    assert_eq!(aggregation.skipped.missing_year, 1);
    assert_eq!(aggregation.skipped.invalid_salary, 1);

    let output = render_state(&LoadState::Loaded(aggregation), &RenderOptions::default()).unwrap();
    assert!(output.contains("150000.00"));
    assert!(output.contains("112000.00"));
}

#[tokio::test]
async fn test_http_failure_yields_failed_state() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/failed.csv");
        then.status(500);
    });

    let source = source_for(&server.url("/failed.csv"), SourceOptions::default());
    let dashboard = Dashboard::new(source, Default::default());
    dashboard.reload().await;
    api_mock.assert();

    let state = dashboard.state().await;
    assert!(matches!(state, LoadState::Failed(_)));
    let output = render_state(&state, &RenderOptions::default()).unwrap();
    assert!(output.starts_with("Failed to load data"));
    assert!(output.contains("500"));
}

#[tokio::test]
async fn test_malformed_csv_is_reported_not_emptied() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/ragged.csv");
        then.status(200)
            .body("work_year,salary_in_usd\n2020,100\n2021,5,extra\n2022,7\n");
    });

    let source = source_for(&server.url("/ragged.csv"), SourceOptions::default());
    let dashboard = Dashboard::new(source, Default::default());
    dashboard.reload().await;

    match dashboard.state().await {
        LoadState::Failed(failure) => assert!(failure.message.contains("line 3")),
        other => panic!("expected failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_trailing_junk_does_not_fail_the_load() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/trailing.csv");
        then.status(200)
            .body("work_year,salary_in_usd\n2020,100\n2021,50\n   \n");
    });

    let source = source_for(&server.url("/trailing.csv"), SourceOptions::default());
    let dashboard = Dashboard::new(source, Default::default());
    dashboard.reload().await;

    let aggregation = loaded(dashboard.state().await);
    assert_eq!(aggregation.rows.len(), 2);
    assert_eq!(aggregation.skipped.total(), 0);
}

#[tokio::test]
async fn test_last_reload_wins_over_slow_request() {
    let server = MockServer::start();
    let mut slow = server.mock(|when, then| {
        when.method(GET).path("/salaries.csv");
        then.status(200)
            .body("work_year,salary_in_usd\n2019,1\n")
            .delay(Duration::from_millis(800));
    });

    let source = source_for(&server.url("/salaries.csv"), SourceOptions::default());
    let dashboard = Dashboard::new(source, Default::default());

    let first = dashboard.reload();
    let second = async {
        // wait until the first request has reached the server
        tokio::time::sleep(Duration::from_millis(200)).await;
        slow.delete();
        server.mock(|when, then| {
            when.method(GET).path("/salaries.csv");
            then.status(200).body("work_year,salary_in_usd\n2024,2\n");
        });
        dashboard.reload().await
    };
    let (first, second) = tokio::join!(first, second);

    assert_eq!(second, LoadOutcome::Committed { generation: 2 });
    assert!(matches!(first, LoadOutcome::Superseded { generation: 1, latest: 2 }));
    assert_eq!(loaded(dashboard.state().await).rows[0].year, "2024");
}

#[tokio::test]
async fn test_file_source_with_csv_output() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(SALARIES_CSV.as_bytes()).unwrap();

    let config = DashboardConfig {
        source: file.path().to_str().unwrap().to_string(),
        format: OutputFormat::Csv,
        sort: Some((SortColumn::Year, SortDirection::Ascending)),
        ..DashboardConfig::default()
    };
    let source = source_for(&config.source, config.source_options());
    let dashboard = Dashboard::new(source, config.dashboard_options());
    dashboard.reload().await;

    let output = render_state(&dashboard.state().await, &config.render_options()).unwrap();
    assert_eq!(
        output,
        "Year,Number of Jobs,Average Salary (USD)\n2022,2,112000.00\n2023,2,150000.00\n"
    );
}

#[test]
fn test_reload_from_blocking_context() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(b"work_year,salary_in_usd\n2020,100\n2020,200\n2021,50\n")
        .unwrap();

    let source = source_for(file.path().to_str().unwrap(), SourceOptions::default());
    let dashboard = Dashboard::new(source, Default::default());

    let outcome = tokio_test::block_on(dashboard.reload());
    assert_eq!(outcome, LoadOutcome::Committed { generation: 1 });

    let aggregation = loaded(tokio_test::block_on(dashboard.state()));
    assert_eq!(aggregation.rows.len(), 2);
    assert_eq!(aggregation.rows[0].total_jobs, 2);
    assert_eq!(aggregation.rows[0].average_salary, 150.0);
    assert_eq!(aggregation.rows[1].average_salary, 50.0);
}
