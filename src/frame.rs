use crate::task::Task;
use chrono::NaiveDate;
use polars::prelude::PlSmallStr;
use polars::prelude::*;

/// Column order of the tabular task view.
pub const COLUMNS: [&str; 9] = [
    "id",
    "name",
    "dependencies",
    "effort",
    "start_date",
    "end_date",
    "remaining_capacity",
    "percent_complete",
    "resource_name",
];

/// Tabular view of a task set for renderers and spreadsheet-like consumers.
pub fn tasks_to_dataframe(tasks: &[Task]) -> PolarsResult<DataFrame> {
    let ids: Vec<&str> = tasks.iter().map(|t| t.id.as_str()).collect();
    let names: Vec<&str> = tasks.iter().map(|t| t.name.as_str()).collect();
    let joined: Vec<String> = tasks.iter().map(|t| t.dependencies.join(", ")).collect();
    let dependencies: Vec<&str> = joined.iter().map(String::as_str).collect();
    let efforts: Vec<f64> = tasks.iter().map(|t| t.effort).collect();
    let remaining: Vec<f64> = tasks.iter().map(|t| t.remaining_capacity_at_end).collect();
    let percent: Vec<&str> = tasks.iter().map(|t| t.percent_complete.as_str()).collect();
    let resources: Vec<&str> = tasks.iter().map(|t| t.resource_name.as_str()).collect();

    let columns: Vec<Column> = vec![
        Series::new(PlSmallStr::from_static("id"), ids).into_column(),
        Series::new(PlSmallStr::from_static("name"), names).into_column(),
        Series::new(PlSmallStr::from_static("dependencies"), dependencies).into_column(),
        Series::new(PlSmallStr::from_static("effort"), efforts).into_column(),
        date_series("start_date", tasks.iter().map(|t| t.start_date))?.into_column(),
        date_series("end_date", tasks.iter().map(|t| t.end_date))?.into_column(),
        Series::new(PlSmallStr::from_static("remaining_capacity"), remaining).into_column(),
        Series::new(PlSmallStr::from_static("percent_complete"), percent).into_column(),
        Series::new(PlSmallStr::from_static("resource_name"), resources).into_column(),
    ];

    DataFrame::new(columns)
}

fn date_series(
    name: &str,
    dates: impl Iterator<Item = Option<NaiveDate>>,
) -> PolarsResult<Series> {
    let data: Vec<Option<i32>> = dates.map(|d| d.map(date_to_i32)).collect();
    Series::new(name.into(), data).cast(&DataType::Date)
}

fn date_to_i32(date: NaiveDate) -> i32 {
    // NaiveDate::default() is 1970-01-01, the polars Date epoch
    (date - NaiveDate::default()).num_days() as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::generate_schedule;

    #[test]
    fn frame_has_one_row_per_task() {
        let tasks = generate_schedule(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        let df = tasks_to_dataframe(&tasks).unwrap();
        assert_eq!(df.height(), 6);
        let names: Vec<String> = df
            .get_column_names()
            .into_iter()
            .map(|n| n.to_string())
            .collect();
        assert_eq!(names, COLUMNS);

        let efforts = df.column("effort").unwrap().f64().unwrap();
        assert_eq!(efforts.sum(), Some(6.0));
        assert_eq!(df.column("end_date").unwrap().null_count(), 0);
        assert_eq!(
            df.column("dependencies").unwrap().str().unwrap().get(1),
            Some("design")
        );
    }
}
