//! End-to-end page flows through the headless binary.

use super::common::run_headless;

#[test]
fn test_home_page_on_start() {
    let (code, stdout, _) = run_headless(&["--events", "assert:contains:Navigation"]);

    assert_eq!(code, 0);
    assert!(stdout.contains("Medical Records Database"));
    assert!(stdout.contains("Connected to mock database"));
    assert!(stdout.contains("Events: 1 executed"));
}

#[test]
fn test_sidebar_navigation() {
    let (code, stdout, _) = run_headless(&[
        "--events",
        "key:down,assert:state:page=Query Page,key:down,key:down,key:down",
        "--output",
        "json",
    ]);

    assert_eq!(code, 0);
    assert!(stdout.contains(r#""page": "Visualizations""#));
    assert!(stdout.contains(r#""failed": 0"#));
}

#[test]
fn test_query_shows_rows() {
    let (code, stdout, _) = run_headless(&[
        "--page",
        "query",
        "--events",
        "key:enter,type:SELECT * FROM patient,key:tab,key:enter,assert:state:row_count=1",
        "--output",
        "json",
    ]);

    assert_eq!(code, 0, "{stdout}");
    assert!(stdout.contains(r#""notice_kind": "Success""#));
    assert!(stdout.contains("1 row returned"));
}

#[test]
fn test_update_needs_confirmation() {
    let (code, stdout, _) = run_headless(&[
        "--page",
        "query",
        "--events",
        "key:enter,type:UPDATE patient SET age = 41 WHERE patient_id = 3,key:tab,key:enter,\
         assert:state:pending_sql=UPDATE patient SET age = 41 WHERE patient_id = 3,\
         assert:contains:[y/Enter],key:y,assert:state:pending=none",
        "--output",
        "json",
    ]);

    assert_eq!(code, 0, "{stdout}");
    assert!(stdout.contains("Statement committed, 1 row affected"));
}

#[test]
fn test_cancelled_confirmation() {
    let (code, stdout, _) = run_headless(&[
        "--page",
        "query",
        "--events",
        "key:enter,type:DROP TABLE visits,key:tab,key:enter,key:esc,assert:state:notice=Cancelled.",
    ]);

    assert_eq!(code, 0, "{stdout}");
}

#[test]
fn test_insert_hospital() {
    let (code, stdout, _) = run_headless(&[
        "--page",
        "insert",
        "--events",
        "key:enter,key:down,key:down,assert:contains:Enter values for name (comma-separated),\
         key:tab,type:Mercy North,key:enter,assert:state:notice_kind=Success",
        "--output",
        "json",
    ]);

    assert_eq!(code, 0, "{stdout}");
    assert!(stdout.contains("Insert data into hospital"));
}

#[test]
fn test_insert_doctor_with_several_values() {
    let (code, stdout, _) = run_headless(&[
        "--events",
        "page:insert,key:enter,key:down,key:tab,type:Dr. Meredith Grey, 2,\
         assert:state:input_text=Dr. Meredith Grey, 2,key:enter,\
         assert:notice:1 row affected,assert:state:notice_kind=Success",
        "--output",
        "json",
    ]);

    assert_eq!(code, 0, "{stdout}");
    assert!(stdout.contains(r#""failed": 0"#));
}

#[test]
fn test_delete_previews_and_runs() {
    let (code, stdout, _) = run_headless(&[
        "--page",
        "delete",
        "--events",
        "key:enter,key:tab,type:patient_id = 1,key:enter,\
         assert:contains-exact:DELETE FROM patient WHERE patient_id = 1,\
         key:y,assert:state:notice_kind=Success",
    ]);

    assert_eq!(code, 0, "{stdout}");
}

#[test]
fn test_delete_rejects_injection() {
    let (code, stdout, _) = run_headless(&[
        "--page",
        "delete",
        "--events",
        "key:enter,key:tab,type:patient_id = 1; DROP TABLE patient,key:enter,\
         assert:state:notice_kind=Error,assert:state:pending=none",
    ]);

    assert_eq!(code, 0, "{stdout}");
}

#[test]
fn test_visualization() {
    let (code, stdout, _) = run_headless(&[
        "--page",
        "visualize",
        "--events",
        "key:enter,key:down,key:tab,key:enter,assert:state:chart_points>=1",
        "--output",
        "json",
    ]);

    assert_eq!(code, 0, "{stdout}");
    assert!(stdout.contains("Visualization generated successfully!"));
}

#[test]
fn test_assertion_failure_exit_code() {
    let (code, stdout, _) = run_headless(&[
        "--events",
        "assert:contains:no such text on screen",
        "--output",
        "json",
    ]);

    assert_eq!(code, 1);
    assert!(stdout.contains(r#""failed": 1"#));
}

#[test]
fn test_frames_output() {
    let (code, stdout, _) = run_headless(&["--events", "key:down,key:down", "--output", "frames"]);

    assert_eq!(code, 0);
    assert!(stdout.contains("=== FRAME 0 (initial) ==="));
    assert!(stdout.contains("=== FRAME 2 (key:down) ==="));
    assert!(stdout.contains("Total: 3 frames"));
}

#[test]
fn test_invalid_event_is_config_error() {
    let (code, _, stderr) = run_headless(&["--events", "tap:enter"]);

    assert_eq!(code, 1);
    assert!(stderr.contains("Configuration Error"));
}

#[test]
fn test_requires_events_or_script() {
    let (code, _, stderr) = run_headless(&[]);

    assert_eq!(code, 1);
    assert!(stderr.contains("--headless requires --events or --script"));
}

#[test]
fn test_script_file() {
    let dir = tempfile::tempdir().unwrap();
    let script = dir.path().join("flow.txt");
    std::fs::write(
        &script,
        "# open the charts\nkey:down\nkey:down\nkey:down\nkey:down\nassert:contains:Select Visualization Type\n",
    )
    .unwrap();

    let (code, stdout, _) = run_headless(&["--script", script.to_str().unwrap()]);
    assert_eq!(code, 0, "{stdout}");
}
