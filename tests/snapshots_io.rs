#![forbid(unsafe_code)]
use std::fs;
use tempfile::tempdir;
use triage_rota::{
    io, DirectorySink, JsonReport, ReportRenderer, RunReport, SchedError, Scheduler, Scope,
    SnapshotSink, TextReport,
};

const STAFF: &str = "\
Organization:
SmartCare
Time:
08h30
Date:
10:12:2023
Doctors:
Ana Silva, 1, 09h00, 0, 00h00
Rui Costa, 3, 09h10, 239, 12h00
";

const SCHEDULE: &str = "\
Organization:
SmartCare
Time:
08h30
Date:
10:12:2023
Schedule:
08h40, Old Case, Ana Silva
09h40, Later Case, Rui Costa
";

const REQUESTS: &str = "\
Organization:
SmartCare
Time:
08h30
Date:
10:12:2023
Mothers:
Eva Lima, 31, green, low
Ines Reis, 28, red, high
";

#[test]
fn parses_all_three_snapshots() {
    let roster = io::parse_roster(STAFF).unwrap();
    assert_eq!(roster.header().organization, "SmartCare");
    assert_eq!(roster.header().scope, Scope::Staff);
    assert_eq!(roster.staff().len(), 2);
    assert_eq!(roster.staff()[1].to_string(), "Rui Costa, 3, 09h10, 239, 12h00");

    let queue = io::parse_queue(REQUESTS).unwrap();
    assert_eq!(queue.requesters()[1].to_string(), "Ines Reis, 28, red, high");

    let ledger = io::parse_ledger(SCHEDULE).unwrap();
    assert_eq!(ledger.len(), 2);
    assert!(!ledger.is_empty());
    assert!(ledger.events()[0].requester().as_full().is_none());
}

#[test]
fn tolerates_bom_crlf_and_blank_lines() {
    let text = format!("\u{feff}{}\n\n", STAFF.replace('\n', "\r\n"));
    let roster = io::parse_roster(&text).unwrap();
    assert_eq!(roster.staff().len(), 2);
    assert_eq!(roster.staff()[0].name, "Ana Silva");
}

#[test]
fn redirect_marker_reads_as_absent_staff() {
    let text = SCHEDULE.replace("09h40, Later Case, Rui Costa", "09h40, Later Case, redirected to other network");
    let ledger = io::parse_ledger(&text).unwrap();
    assert!(ledger.events()[1].is_redirected());
    assert!(!ledger.events()[0].is_redirected());
}

#[test]
fn scope_mismatch_is_reported() {
    let err = io::parse_roster(REQUESTS).unwrap_err();
    match err.downcast_ref::<SchedError>() {
        Some(SchedError::ScopeMismatch { expected, found, .. }) => {
            assert_eq!(*expected, Scope::Staff);
            assert_eq!(*found, Scope::Requests);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn malformed_records_fail_fast() {
    let bad_time = STAFF.replace("09h10", "9:10");
    assert!(io::parse_roster(&bad_time).is_err());

    let bad_width = REQUESTS.replace("Eva Lima, 31, green, low", "Eva Lima, 31, green");
    let err = io::parse_queue(&bad_width).unwrap_err();
    assert!(err.to_string().contains("expected 4 fields"));

    let bad_tag = REQUESTS.replace("red, high", "red, critical");
    assert!(io::parse_queue(&bad_tag).is_err());

    let bad_header = STAFF.replace("Date:", "Day:");
    assert!(io::parse_roster(&bad_header).is_err());

    let bad_date = STAFF.replace("10:12:2023", "2023-12-10");
    assert!(io::parse_roster(&bad_date).is_err());
}

#[test]
fn renders_the_next_period() {
    let roster = io::parse_roster(STAFF).unwrap();
    let ledger = io::parse_ledger(SCHEDULE).unwrap();
    let queue = io::parse_queue(REQUESTS).unwrap();

    let plan = Scheduler::default().plan_next(&ledger, &roster, &queue);
    let snapshots = io::plan_snapshots(&plan);

    assert_eq!(snapshots[0].file_name, "schedule09h00.txt");
    insta::assert_snapshot!(snapshots[0].contents, @r"
    Organization:
    SmartCare
    Time:
    09h00
    Date:
    10:12:2023
    Schedule:
    09h00, Eva Lima, Ana Silva
    09h10, Ines Reis, Rui Costa
    09h40, Later Case, Rui Costa
    ");

    assert_eq!(snapshots[1].file_name, "doctors09h00.txt");
    insta::assert_snapshot!(snapshots[1].contents, @r"
    Organization:
    SmartCare
    Time:
    09h00
    Date:
    10:12:2023
    Doctors:
    Ana Silva, 1, 09h20, 20, 00h20
    Rui Costa, 3, 10h30, 259, 12h20
    ");

    // une sortie relue redonne le même texte
    let reread = io::parse_roster(&snapshots[1].contents).unwrap();
    assert_eq!(io::render_roster(&reread), snapshots[1].contents);
}

#[test]
fn report_renderers() {
    let roster = io::parse_roster(STAFF).unwrap();
    let ledger = io::parse_ledger(SCHEDULE).unwrap();
    let queue = io::parse_queue(REQUESTS).unwrap();
    let plan = Scheduler::default().plan_next(&ledger, &roster, &queue);

    let report = RunReport::from_plan(&plan);
    assert_eq!(report.assigned, 2);
    assert_eq!(report.redirected, 0);
    assert_eq!(report.carried_over, 1);

    let text = TextReport.render(&report).unwrap();
    assert!(text.starts_with("Period starting 09h00\n"));
    assert!(!text.contains("weekly leave"));

    let json: serde_json::Value = serde_json::from_str(&JsonReport.render(&report).unwrap()).unwrap();
    assert_eq!(json["next_period_start"], "09h00");
    assert_eq!(json["assigned"], 2);
}

#[test]
fn directory_sink_writes_every_snapshot() {
    let dir = tempdir().unwrap();
    let roster = io::parse_roster(STAFF).unwrap();
    let ledger = io::parse_ledger(SCHEDULE).unwrap();
    let queue = io::parse_queue(REQUESTS).unwrap();
    let plan = Scheduler::default().plan_next(&ledger, &roster, &queue);

    let sink = DirectorySink::open(dir.path()).unwrap();
    let written = sink.publish(&io::plan_snapshots(&plan)).unwrap();

    assert_eq!(written.len(), 2);
    let roster_back = io::load_roster(dir.path().join("doctors09h00.txt")).unwrap();
    assert_eq!(roster_back.header().time.to_string(), "09h00");
    let ledger_back = io::load_ledger(dir.path().join("schedule09h00.txt")).unwrap();
    assert_eq!(ledger_back.len(), 3);
}

fn next_period_snapshots() -> Vec<io::Snapshot> {
    let roster = io::parse_roster(STAFF).unwrap();
    let ledger = io::parse_ledger(SCHEDULE).unwrap();
    let queue = io::parse_queue(REQUESTS).unwrap();
    let plan = Scheduler::default().plan_next(&ledger, &roster, &queue);
    io::plan_snapshots(&plan)
}

#[test]
fn failed_rename_publishes_nothing() {
    let dir = tempdir().unwrap();
    // une cible impossible à remplacer : répertoire non vide
    let blocker = dir.path().join("doctors09h00.txt");
    fs::create_dir(&blocker).unwrap();
    fs::write(blocker.join("keep"), "x").unwrap();

    let sink = DirectorySink::open(dir.path()).unwrap();
    assert!(sink.publish(&next_period_snapshots()).is_err());

    assert!(!dir.path().join("schedule09h00.txt").exists());
    assert!(blocker.join("keep").is_file());
    let leftovers: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(leftovers.len(), 1);
}

#[test]
fn failed_rename_restores_previous_snapshot() {
    let dir = tempdir().unwrap();
    let previous = dir.path().join("schedule09h00.txt");
    fs::write(&previous, "previous run\n").unwrap();
    let blocker = dir.path().join("doctors09h00.txt");
    fs::create_dir(&blocker).unwrap();
    fs::write(blocker.join("keep"), "x").unwrap();

    let sink = DirectorySink::open(dir.path()).unwrap();
    assert!(sink.publish(&next_period_snapshots()).is_err());

    assert_eq!(fs::read_to_string(&previous).unwrap(), "previous run\n");
    let leftovers: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(leftovers.len(), 2);
}

#[test]
fn publish_replaces_existing_snapshots() {
    let dir = tempdir().unwrap();
    let schedule = dir.path().join("schedule09h00.txt");
    fs::write(&schedule, "stale\n").unwrap();

    let sink = DirectorySink::open(dir.path()).unwrap();
    sink.publish(&next_period_snapshots()).unwrap();

    assert!(fs::read_to_string(&schedule).unwrap().contains("09h00, Eva Lima, Ana Silva"));
    let leftovers: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(leftovers.len(), 2);
}

#[test]
fn directory_sink_requires_existing_dir() {
    let dir = tempdir().unwrap();
    assert!(DirectorySink::open(dir.path().join("missing")).is_err());
}
