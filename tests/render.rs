use calgrid::calendar::{days_in_month, MonthSpec};
use calgrid::config::{Config, PartialConfig};
use scraper::{Html, Selector};
use std::fs;
use std::path::Path;

fn config(year: i32, month: u32, output: &Path) -> Config {
    PartialConfig {
        month: Some(month),
        year: Some(year),
        locale: Some("en_US".to_owned()),
        timezone: Some("UTC".to_owned()),
        output: Some(output.to_owned()),
        stylesheet: None,
    }
    .resolve()
    .unwrap()
}

fn day_cells(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("td.day-box, td.day-box-red").unwrap();

    document
        .select(&selector)
        .map(|cell| cell.text().collect::<String>())
        .collect()
}

#[test]
fn day_cells_round_trip() {
    for (year, month) in [(2022, 10), (2023, 1), (2021, 2), (2024, 2), (2023, 2)] {
        let html = calgrid::render_month(&config(year, month, Path::new("-"))).unwrap();
        let days = days_in_month(&MonthSpec::new(year, month).unwrap());

        let cells = day_cells(&html);
        assert_eq!(cells.len() % 7, 0);

        let numbers: Vec<u32> = cells
            .iter()
            .filter(|text| !text.trim().is_empty())
            .map(|text| text.trim().parse().unwrap())
            .collect();

        assert_eq!(numbers, (1..=days).collect::<Vec<_>>(), "{}-{}", year, month);
    }
}

#[test]
fn sunday_column_is_red() {
    let html = calgrid::render_month(&config(2022, 10, Path::new("-"))).unwrap();
    let document = Html::parse_document(&html);
    let red = Selector::parse("td.day-box-red").unwrap();

    let sundays: Vec<String> = document
        .select(&red)
        .map(|cell| cell.text().collect::<String>())
        .filter(|text| !text.is_empty())
        .collect();

    assert_eq!(sundays, vec!["2", "9", "16", "23", "30"]);
}

#[test]
fn writes_document_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("output.html");

    calgrid::run(&config(2024, 2, &path)).unwrap();

    let html = fs::read_to_string(&path).unwrap();
    assert!(html.starts_with("<html>"));
    assert!(html.contains("calendar.css"));
    assert!(html.contains("February"));
    assert_eq!(day_cells(&html).len(), 35);

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o644);
    }
}

#[test]
fn invalid_month_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("output.html");

    let err = calgrid::run(&config(2022, 13, &path)).unwrap_err();

    assert!(err.is_invalid_input());
    assert!(!path.exists());
}

#[test]
fn unknown_locale_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("output.html");
    let mut config = config(2022, 10, &path);
    config.locale = "xx_XX".to_owned();

    let err = calgrid::run(&config).unwrap_err();

    assert!(err.is_configuration());
    assert!(!path.exists());
}
