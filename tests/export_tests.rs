use chrono::NaiveDate;
use tempfile::NamedTempFile;
use wbs_scheduler::{
    ExportError, ProjectInfo, Schedule, save_tasks_to_json, save_wbs_to_csv, wbs_rows,
};

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn schedule() -> Schedule {
    Schedule::generate(ProjectInfo::new("TCK-42", "Dana", "Sam", d(2024, 1, 1))).unwrap()
}

#[test]
fn wbs_rows_group_tasks_under_phase_headings() {
    let schedule = schedule();
    let rows = wbs_rows(schedule.project(), schedule.tasks());
    let names: Vec<&str> = rows.iter().map(|r| r.task_name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "TCK-42",
            "\tI.Update logic report",
            "\t\tTask Design",
            "\t\tTask Coding",
            "\t\tTask Unit Test",
            "\t\tTask Function Test",
            "\tII.UAT & Support",
            "\t\tTask UAT & Support",
            "\tIII.Go Live",
            "\t\tTask Conduct Go-live",
        ]
    );
    assert_eq!(rows[0].effort, None);
    assert_eq!(rows[1].effort, Some(4.0));
    assert_eq!(rows[6].effort, Some(1.0));
    assert!(rows[1].emphasis && !rows[2].emphasis);
    assert_eq!(rows[2].percent_complete, "0%");
    assert_eq!(rows[9].end_date, "2024-01-08");
}

#[test]
fn csv_export_writes_sheet_with_headers() {
    let mut schedule = schedule();
    schedule.set_percent_complete("design", "50%").unwrap();
    let tmp = NamedTempFile::new().expect("temp file");
    save_wbs_to_csv(schedule.project(), schedule.tasks(), tmp.path()).expect("csv export");

    let mut reader = csv::Reader::from_path(tmp.path()).expect("open csv");
    let headers: Vec<String> = reader
        .headers()
        .unwrap()
        .iter()
        .map(str::to_string)
        .collect();
    assert_eq!(
        headers,
        vec![
            "Task Name",
            "Effort (Days)",
            "Start Date",
            "End Date",
            "% Complete",
            "Resource Name"
        ]
    );

    let records: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(records.len(), 10);
    let design = &records[2];
    assert_eq!(&design[0], "\t\tTask Design");
    assert_eq!(design[1].parse::<f64>().unwrap(), 1.0);
    assert_eq!(&design[2], "2024-01-01");
    assert_eq!(&design[3], "2024-01-01");
    assert_eq!(&design[4], "50%");
    assert_eq!(&design[5], "Sam");
    assert_eq!(&records[3][4], "0%");
}

#[test]
fn json_export_includes_project_summary_and_tasks() {
    let schedule = schedule();
    let tmp = NamedTempFile::new().expect("temp file");
    save_tasks_to_json(schedule.project(), schedule.tasks(), tmp.path()).expect("json export");

    let text = std::fs::read_to_string(tmp.path()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value["project"]["ticket_id"], "TCK-42");
    assert_eq!(value["project"]["start_date"], "2024-01-01");
    assert_eq!(value["summary"]["total"], 6.0);
    assert_eq!(value["tasks"].as_array().unwrap().len(), 6);
    assert_eq!(value["tasks"][5]["id"], "golive");
    assert_eq!(value["tasks"][5]["end_date"], "2024-01-08");
}

#[test]
fn exporting_an_empty_task_set_fails() {
    let project = ProjectInfo::new("TCK-42", "Dana", "Sam", d(2024, 1, 1));
    let tmp = NamedTempFile::new().expect("temp file");
    let err = save_wbs_to_csv(&project, &[], tmp.path()).unwrap_err();
    assert!(matches!(err, ExportError::NoTasks));
    let err = save_tasks_to_json(&project, &[], tmp.path()).unwrap_err();
    assert!(matches!(err, ExportError::NoTasks));
}
