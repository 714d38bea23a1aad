use recording_architect::architecture::{Architecture, ElementRef};
use recording_architect::config::PipelineConfig;
use recording_architect::locator::StrategyType;
use recording_architect::report::format_summary;
use recording_architect::script::extract;
use recording_architect::trace::{TraceEvent, TraceLogger};
use recording_architect::{Pipeline, PipelineError, analyze_actions, run_pipeline};

mod common;
use crate::common::scripts::{ADMIN_SCRIPT, BROKEN_SCRIPT, LOGIN_SCRIPT};

fn admin_architecture() -> Architecture {
    run_pipeline(ADMIN_SCRIPT, &PipelineConfig::default()).unwrap()
}

// ============================================================================
// End-to-end
// ============================================================================

#[test]
fn admin_script_partitions_into_modules() {
    let architecture = admin_architecture();
    let modules: Vec<&str> = architecture
        .page_groupings
        .iter()
        .map(|g| g.module.as_str())
        .collect();
    assert_eq!(modules, vec!["Admin", "Login", "PIM"]);
    assert!(architecture.omissions.is_empty(), "{:?}", architecture.omissions);

    let shared = architecture.shared_navigation.as_ref().unwrap();
    assert_eq!(shared.elements.len(), 2);
}

#[test]
fn admin_script_methods() {
    let architecture = admin_architecture();

    let login = architecture.grouping("Login").unwrap();
    assert!(login.method("openLoginPage").is_some());
    assert!(login.method("login").is_some());

    let admin = architecture.grouping("Admin").unwrap();
    assert!(admin.method("navigateToAdmin").is_some());
    let select = admin.method("selectStatus").unwrap();
    assert_eq!(select.parameters.len(), 1);
    assert_eq!(select.parameters[0].name, "status");
    assert_eq!(select.parameters[0].example.as_deref(), Some("Enabled"));
    assert_eq!(select.step_text, "Select \"Enabled\" from Status dropdown");
    assert!(admin.method("searchAdmin").is_some());

    let pim = architecture.grouping("PIM").unwrap();
    let verify = pim.method("verifyToastMessage").unwrap();
    assert_eq!(verify.step_text, "Verify toast has text \"Successfully Saved\"");
}

#[test]
fn test_id_element_keeps_top_locator() {
    let architecture = admin_architecture();
    let save = architecture.grouping("PIM").unwrap().element("saveButton").unwrap();
    assert_eq!(save.locators.primary.strategy_type, StrategyType::TestId);
    assert_eq!(save.locators.stability_score, 100);
}

#[test]
fn every_step_reference_resolves() {
    let architecture = admin_architecture();
    let shared = architecture.shared_navigation.as_ref().unwrap();

    for grouping in &architecture.page_groupings {
        for step in grouping.methods.iter().flat_map(|m| &m.steps) {
            match &step.element {
                Some(ElementRef::Named(name)) => assert!(grouping.element(name).is_some()),
                Some(ElementRef::Shared(name)) => {
                    assert!(shared.elements.iter().any(|e| &e.name == name))
                }
                Some(ElementRef::Inline(selector)) => assert!(!selector.is_empty()),
                None => {}
            }
        }
    }
}

#[test]
fn login_script_matches_hand_built_sequence() {
    let config = PipelineConfig::default();
    let from_source = run_pipeline(LOGIN_SCRIPT, &config).unwrap();
    let actions = extract(LOGIN_SCRIPT).unwrap();
    assert_eq!(from_source, analyze_actions(&actions, &config));
}

// ============================================================================
// Determinism
// ============================================================================

#[test]
fn repeated_runs_share_a_fingerprint() {
    let first = admin_architecture();
    let second = admin_architecture();
    assert_eq!(first, second);
    assert_eq!(first.fingerprint(), second.fingerprint());
    assert_eq!(first.fingerprint().len(), 40);
}

#[test]
fn different_scripts_differ() {
    let login = run_pipeline(LOGIN_SCRIPT, &PipelineConfig::default()).unwrap();
    assert_ne!(login.fingerprint(), admin_architecture().fingerprint());
}

#[test]
fn architecture_survives_json() {
    let architecture = admin_architecture();
    let json = serde_json::to_string(&architecture).unwrap();
    let back: Architecture = serde_json::from_str(&json).unwrap();
    assert_eq!(back.fingerprint(), architecture.fingerprint());
}

// ============================================================================
// Failures
// ============================================================================

#[test]
fn parse_failure_yields_no_result() {
    let err = run_pipeline(BROKEN_SCRIPT, &PipelineConfig::default()).unwrap_err();
    assert!(matches!(err, PipelineError::Parse(_)));
}

#[test]
fn missing_script_file_is_read_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = Pipeline::new(PipelineConfig::default())
        .run_file(dir.path().join("missing.spec.ts"))
        .unwrap_err();
    assert!(matches!(err, PipelineError::Read { .. }));
}

#[test]
fn empty_script_is_empty_architecture() {
    let architecture = run_pipeline("", &PipelineConfig::default()).unwrap();
    assert!(architecture.shared_navigation.is_none());
    assert!(architecture.page_groupings.is_empty());
    assert!(architecture.omissions.is_empty());
}

// ============================================================================
// Trace and summary output
// ============================================================================

#[test]
fn trace_file_records_each_stage() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("trace.jsonl");

    let pipeline = Pipeline::new(PipelineConfig::default()).with_tracer(TraceLogger::new(&path));
    pipeline.run(ADMIN_SCRIPT).unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    let stages: Vec<String> = content
        .lines()
        .map(|line| {
            let value: serde_json::Value = serde_json::from_str(line).unwrap();
            value["stage"].as_str().unwrap().to_string()
        })
        .collect();
    assert_eq!(
        stages,
        vec!["extract", "patterns", "contexts", "navigation", "elements", "methods", "organize"]
    );
}

#[test]
fn trace_records_omissions() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("trace.jsonl");
    let source = r#"
test('t', async ({ page }) => {
  await page.getByRole('button', { name: 'Save' }).click();
});
"#;
    Pipeline::new(PipelineConfig::default())
        .with_tracer(TraceLogger::new(&path))
        .run(source)
        .unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    let omissions: Vec<serde_json::Value> = content
        .lines()
        .map(|line| serde_json::from_str::<serde_json::Value>(line).unwrap())
        .filter(|v| v["stage"] == "omission")
        .collect();
    assert_eq!(omissions.len(), 2);
    assert_eq!(omissions[0]["omission"], "unassigned_module");
    assert_eq!(omissions[0]["action_index"], 0);
}

#[test]
fn disabled_tracer_writes_nothing() {
    let tracer = TraceLogger::disabled();
    assert!(!tracer.is_enabled());
    tracer.log(&TraceEvent::now("extract").with_count(1));
}

#[test]
fn summary_lists_groupings_and_omissions() {
    let summary = format_summary(&admin_architecture());
    assert!(summary.contains("=== Shared Navigation (2 elements) ==="));
    assert!(summary.contains("=== Admin ("));
    assert!(summary.contains("navigateToModule(moduleName)"));
    assert!(summary.contains("selectStatus(status)"));
    assert!(summary.contains("=== Omissions: 0 ==="));
}
