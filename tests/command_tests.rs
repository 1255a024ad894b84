use pretty_assertions::assert_eq;
use std::io::Write;
use tempfile::NamedTempFile;
use xhprof_analyze::commands::{execute_analyze, AnalyzeArgs};
use xhprof_analyze::report::BuiltinReport;

const LOG: &str = concat!(
    r#"{"data":{"main()":{"ct":1,"wt":500000},"db":{"ct":3,"wt":250000}},"request":"/home","totalTime":0.5}"#,
    "\n",
    r#"{"data":{"main()":{"ct":1,"wt":250000}},"request":"/api","totalTime":0.25}"#,
    "\n",
    r#"{"data":{"main()":{"ct":1,"wt":"#,
    "\n",
    r#"{"data":{"main()":{"ct":1,"wt":250000},"db":{"ct":1,"wt":0}},"request":"/home","totalTime":0.25}"#,
    "\n",
);

fn log_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn run(args: &AnalyzeArgs) -> String {
    let mut out = Vec::new();
    execute_analyze(args, &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn test_summary_only() {
    let file = log_file(LOG);
    let args = AnalyzeArgs {
        files: vec![file.path().to_path_buf()],
        ..Default::default()
    };

    assert_eq!(
        run(&args),
        concat!(
            "\n",
            "Total Execution Time: 1000000.000μs\n",
            "Total Function Calls: 7\n",
            "Total Call Paths: 2\n",
            "Total Request Calls: 3\n",
            "Total Request Paths: 2\n",
        )
    );
}

#[test]
fn test_reports_follow_fixed_then_declared_order() {
    let file = log_file(LOG);
    let args = AnalyzeArgs {
        files: vec![file.path().to_path_buf()],
        max_rows: 5,
        reports: vec![BuiltinReport::TimeRequest, BuiltinReport::CalledPath],
        lists: vec![
            "type=request;name=second custom;sort=count;columns=count,path".to_string(),
            "type=path;name=first custom;sort=time;columns=time,path".to_string(),
        ],
    };

    let output = run(&args);
    let titles: Vec<&str> = output.lines().filter(|l| l.starts_with("> ")).collect();

    assert_eq!(
        titles,
        vec![
            "> List of top 5 most frequently called paths",
            "> List of top 5 longest time requests",
            "> second custom",
            "> first custom",
        ]
    );
}

#[test]
fn test_bad_list_does_not_stop_siblings() {
    let file = log_file(LOG);
    let args = AnalyzeArgs {
        files: vec![file.path().to_path_buf()],
        lists: vec![
            "type=nope;sort=count".to_string(),
            "type=path;name=no sort;columns=path".to_string(),
            "type=path;name=ok;sort=count;columns=count,path".to_string(),
        ],
        ..Default::default()
    };

    let output = run(&args);
    let expected_block = "\n> ok\nCount   Path\n4       db\n3       main()\n";

    assert!(output.starts_with(expected_block), "{}", output);
    assert!(!output.contains("no sort"));
}

#[test]
fn test_multiple_files_are_summed() {
    let first = log_file(LOG);
    let second = log_file(LOG);
    let args = AnalyzeArgs {
        files: vec![first.path().to_path_buf(), second.path().to_path_buf()],
        ..Default::default()
    };

    let output = run(&args);
    assert!(output.contains("Total Request Calls: 6\n"));
    assert!(output.contains("Total Function Calls: 14\n"));
    assert!(output.contains("Total Request Paths: 2\n"));
}

#[test]
fn test_missing_file_fails_the_run() {
    let dir = tempfile::tempdir().unwrap();
    let args = AnalyzeArgs {
        files: vec![dir.path().join("absent.log")],
        ..Default::default()
    };

    let mut out = Vec::new();
    let err = execute_analyze(&args, &mut out).unwrap_err();

    assert!(format!("{:#}", err).contains("absent.log"));
    assert!(out.is_empty());
}
