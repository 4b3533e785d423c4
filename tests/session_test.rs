// Integration tests for trace replay sessions

use pretty_assertions::assert_eq;
use std::io::Write;

use stepscope::config::SimulatorConfig;
use stepscope::errors::{CallTreeError, ProducerError};
use stepscope::producer::{Notifier, Recorded, TraceFile};
use stepscope::replay::predicates::StepMode;
use stepscope::session::Simulation;
use stepscope::trace::step::DataValue;
use stepscope::trace::Trace;

const SQUARE_TRACE: &str = r#"{
    "code": "int square(int n) {\n  return n * n;\n}\nint main() {\n  int x = square(3) + 1;\n  printf(\"%d\", x);\n}",
    "nodes": [
        { "id": 1, "parentId": null, "range": [1, 19, 3, 1] },
        { "id": 2, "parentId": 1, "range": [2, 3, 2, 15] },
        { "id": 3, "parentId": null, "range": [4, 12, 7, 1] },
        { "id": 4, "parentId": 3, "range": [5, 3, 5, 24] },
        { "id": 5, "parentId": 3, "range": [6, 3, 6, 18] }
    ],
    "steps": [
        { "action": "invocation", "identifier": "main" },
        { "action": "stat", "nodeId": 4 },
        { "action": "invocation", "identifier": "square" },
        { "action": "par", "identifier": "n", "dataType": "int", "dataValue": 3, "scope": [1, 19, 3, 1] },
        { "action": "stat", "nodeId": 2 },
        { "action": "eval", "location": [2, 10, 2, 14], "dataType": "int", "dataValue": 9 },
        { "action": "return", "dataType": "int", "dataValue": 9 },
        { "action": "eval", "location": [5, 11, 5, 19], "dataType": "int", "dataValue": 9 },
        { "action": "eval", "location": [5, 11, 5, 23], "dataType": "int", "dataValue": 10 },
        { "action": "decl", "nodeId": 4, "identifier": "x", "dataType": "int", "dataValue": 10 },
        { "action": "stat", "nodeId": 5 },
        { "action": "stdout", "value": "10" }
    ]
}"#;

fn simulation() -> Simulation<Recorded> {
    let trace = Trace::from_json(SQUARE_TRACE).unwrap();
    let mut sim = Simulation::with_defaults(Recorded::new(trace));
    sim.run().unwrap();
    sim
}

#[test]
fn test_trace_file_round_trip_through_session() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(SQUARE_TRACE.as_bytes()).unwrap();

    let mut sim = Simulation::with_defaults(TraceFile::new(file.path()));
    sim.run().unwrap();
    assert_eq!(sim.total_steps(), 12);
    assert_eq!(sim.current_statement_ref(), Some("l5:1"));
}

#[test]
fn test_nested_call_is_replayed_frame_by_frame() {
    let mut sim = simulation();

    // int x = square(3) + 1;
    assert_eq!(sim.cursor(), 1);

    // return n * n; inside square
    assert!(sim.step_forward());
    assert_eq!(sim.current_statement_ref(), Some("l2:1"));
    let tree = sim.current_call_tree().unwrap().unwrap();
    assert_eq!(tree.name(), "main");
    assert_eq!(tree.subcalls[0].name(), "square");
    assert!(!tree.subcalls[0].is_finished());

    let names: Vec<String> = sim.variables().into_iter().map(|v| v.identifier).collect();
    assert_eq!(names, vec!["n".to_string()]);

    assert!(sim.step_forward());
    assert!(sim.evaluated_code().unwrap().contains("  return 9;"));

    // Back in main, the finished call drops out of the statement window
    assert!(sim.step_forward());
    assert_eq!(sim.current_statement_ref(), Some("l5:1"));
    let evaluated = sim.evaluated_code().unwrap();
    assert!(evaluated.contains("  int x = 9 + 1;"), "{}", evaluated);
    assert!(evaluated.contains("  return n * n;"));
    assert!(sim.current_call_tree().unwrap().unwrap().subcalls[0].is_finished());

    assert!(sim.step_forward());
    assert!(sim.evaluated_code().unwrap().contains("  int x = 10;"));
    assert_eq!(
        sim.highlighted_code().unwrap().unwrap().lines().nth(4),
        Some("  ███████████")
    );
}

#[test]
fn test_output_and_variables_at_end() {
    let mut sim = simulation();
    sim.jump_to_end();
    assert_eq!(sim.current_statement_ref(), Some("l6:1"));

    let variables = sim.variables();
    assert_eq!(variables.len(), 1);
    assert_eq!(variables[0].identifier, "x");
    assert_eq!(variables[0].data_value, Some(DataValue::Int(10)));

    // The final stop sits on the printf output
    assert_eq!(sim.cursor(), 11);
    assert!(sim.is_at_end());
    assert_eq!(sim.output(), "> program.exe\n10");
}

#[test]
fn test_statement_mode_skips_expressions() {
    let trace = Trace::from_json(SQUARE_TRACE).unwrap();
    let config = SimulatorConfig {
        step_mode: StepMode::Statement,
        ..SimulatorConfig::default()
    };
    let mut sim = Simulation::new(Recorded::new(trace), config);
    sim.run().unwrap();

    let mut refs = vec![sim.current_statement_ref().map(str::to_string)];
    while sim.step_forward() {
        refs.push(sim.current_statement_ref().map(str::to_string));
    }
    assert_eq!(
        refs,
        vec![
            Some("l5:1".to_string()),
            Some("l2:1".to_string()),
            Some("l6:1".to_string()),
            Some("l6:1".to_string())
        ]
    );

    sim.rewind_to_start();
    assert_eq!(sim.cursor(), 1);
}

#[test]
fn test_unbalanced_feed_is_reported() {
    let json = r#"{
        "code": "x;",
        "steps": [
            { "action": "invocation" },
            { "action": "return" },
            { "action": "return" },
            { "action": "stat", "location": [1, 1, 1, 2] }
        ]
    }"#;
    let mut sim = Simulation::with_defaults(Recorded::new(Trace::from_json(json).unwrap()));
    sim.run().unwrap();
    assert_eq!(
        sim.current_call_tree(),
        Err(CallTreeError::UnmatchedReturn { index: 2 })
    );
}

#[test]
fn test_bad_trace_fails_at_load() {
    let json = r#"{ "code": "x;", "steps": [{ "action": "eval", "dataValue": 3 }] }"#;
    assert!(matches!(
        Trace::from_json(json),
        Err(ProducerError::MissingKey { key: "dataType" })
    ));

    let json = r#"{ "code": "x;", "steps": [{ "action": "teleport" }] }"#;
    assert!(matches!(Trace::from_json(json), Err(ProducerError::UnknownAction(_))));
}

#[test]
fn test_notifier_guard_fires_on_step_past_limit() {
    let mut notifier = Notifier::new(10_000);
    notifier.register_metadata(7, "a=eval;t=int;l=[1,1,1,1]").unwrap();

    for i in 0..10_000i32 {
        notifier.notify(7, &[&i.to_le_bytes()]).unwrap();
    }
    let err = notifier.notify(7, &[&0i32.to_le_bytes()]).unwrap_err();
    assert!(matches!(err, ProducerError::StepLimitExceeded { limit: 10_000 }));
    assert!(matches!(notifier.notify(7, &[&0i32.to_le_bytes()]), Err(ProducerError::Halted)));
    assert_eq!(notifier.len(), 10_000);
}

#[test]
fn test_notifier_trace_replays_in_session() {
    let mut notifier = Notifier::new(100);
    notifier.register_metadata(1, "a=stat;l=[1,1,1,10]").unwrap();
    notifier.register_metadata(2, "a=eval;t=int;l=[1,1,1,5]").unwrap();
    notifier.register_metadata(3, "a=eval;t=int;l=[1,1,1,9]").unwrap();

    notifier.notify(1, &[]).unwrap();
    notifier.notify(2, &[&35i32.to_le_bytes()]).unwrap();
    notifier.notify(3, &[&41i32.to_le_bytes()]).unwrap();
    notifier.print_stdout("41").unwrap();

    let trace = notifier.finish("5 * 7 + 6;".to_string(), Vec::new()).unwrap();
    let mut sim = Simulation::with_defaults(Recorded::new(trace));
    sim.run().unwrap();

    assert_eq!(sim.evaluated_code().unwrap(), "5 * 7 + 6;");
    assert!(sim.step_forward());
    assert_eq!(sim.evaluated_code().unwrap(), "35 + 6;");
    assert!(sim.step_forward());
    assert_eq!(sim.evaluated_code().unwrap(), "41;");
    assert_eq!(sim.output(), "> program.exe\n");

    assert!(sim.step_forward());
    assert_eq!(sim.output(), "> program.exe\n41\n");
    assert!(!sim.step_forward());
}

#[test]
fn test_config_file_is_applied() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stepscope.toml");
    std::fs::write(&path, "output_banner = \"$ ./a.out\\n\"\nscoped_variables = false\n").unwrap();

    let config = SimulatorConfig::load(&path).unwrap();
    assert_eq!(config.output_banner, "$ ./a.out\n");
    assert!(!config.scoped_variables);

    let trace = Trace::from_json(SQUARE_TRACE).unwrap();
    let mut sim = Simulation::new(Recorded::new(trace), config);
    sim.run().unwrap();
    assert!(sim.output().starts_with("$ ./a.out"));
}
