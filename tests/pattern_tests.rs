use recording_architect::config::PipelineConfig;
use recording_architect::pattern::{
    ModalDecision, PatternData, PatternType, detect_dropdown_at, detect_login_at, detect_patterns,
    patterns_covering,
};
use recording_architect::script::{ActionType, extract};

mod common;
use crate::common::builders::{
    LOGIN_URL, bare_role, button, click, css, expect_text, expect_visible, fill, goto, label, link,
    login_sequence, placeholder, role, sequence, text, untargeted,
};
use crate::common::scripts::ADMIN_SCRIPT;

fn config() -> PipelineConfig {
    PipelineConfig::default()
}

// ============================================================================
// Login
// ============================================================================

#[test]
fn login_scenario_spans_credentials_and_submit() {
    let patterns = detect_patterns(&login_sequence(), &config());
    assert_eq!(patterns.len(), 1);

    let login = &patterns[0];
    assert_eq!(login.pattern_type, PatternType::Login);
    assert_eq!((login.start_index, login.end_index), (1, 3));
    assert_eq!(login.confidence, 1.0);
    match &login.data {
        PatternData::Login {
            username, password, ..
        } => {
            assert_eq!(username, "Admin");
            assert_eq!(password, "admin123");
        }
        other => panic!("expected login data, got {:?}", other),
    }
}

#[test]
fn login_needs_a_submit_click() {
    let actions = sequence(vec![
        fill(placeholder("Username"), "Admin"),
        fill(placeholder("Password"), "admin123"),
        click(button("Cancel")),
    ]);
    assert!(detect_login_at(&actions, 0, &config()).is_none());
}

#[test]
fn login_outside_window_is_not_matched() {
    let mut config = config();
    config.detection.login_window = 3;
    let actions = sequence(vec![
        fill(placeholder("Username"), "Admin"),
        untargeted(ActionType::Wait, "waitForTimeout"),
        fill(placeholder("Password"), "admin123"),
        click(button("Login")),
    ]);
    assert!(detect_login_at(&actions, 0, &config).is_none());
    assert!(detect_login_at(&actions, 0, &PipelineConfig::default()).is_some());
}

#[test]
fn login_over_filtered_recording_reports_recorded_indices() {
    let mut actions = sequence(vec![
        goto(LOGIN_URL),
        fill(placeholder("Username"), "Admin"),
        untargeted(ActionType::Wait, "waitForTimeout"),
        fill(placeholder("Password"), "admin123"),
        click(button("Login")),
    ]);
    actions.remove(2);
    let patterns = detect_patterns(&actions, &config());
    assert_eq!(patterns.len(), 1);

    let login = &patterns[0];
    assert_eq!((login.start_index, login.end_index), (1, 4));
    match &login.data {
        PatternData::Login {
            username_index,
            password_index,
            submit_index,
            ..
        } => assert_eq!((*username_index, *password_index, *submit_index), (1, 3, 4)),
        other => panic!("expected login data, got {:?}", other),
    }
    assert_eq!(login.member_indices(&actions), vec![1, 3, 4]);
    assert_eq!(login.len(&actions), 3);
    assert!(!login.is_empty(&actions));
    assert!(login.is_empty(&actions[..1]));
}

// ============================================================================
// Dropdown
// ============================================================================

#[test]
fn dropdown_scenario_infers_status_field() {
    let actions = sequence(vec![click(css(".status-dropdown")), click(text("Enabled"))]);
    let patterns = detect_patterns(&actions, &config());
    assert_eq!(patterns.len(), 1);

    let dropdown = &patterns[0];
    assert_eq!(dropdown.pattern_type, PatternType::Dropdown);
    assert_eq!(dropdown.confidence, 0.95);
    match &dropdown.data {
        PatternData::Dropdown {
            option_text,
            field_context,
            ..
        } => {
            assert_eq!(option_text, "Enabled");
            assert_eq!(field_context, "Status");
        }
        other => panic!("expected dropdown data, got {:?}", other),
    }
}

#[test]
fn combobox_role_is_a_trigger() {
    let actions = sequence(vec![
        click(bare_role("combobox")),
        click(role("option", "ESS")),
    ]);
    let pattern = detect_dropdown_at(&actions, 0, &config()).unwrap();
    match pattern.data {
        PatternData::Dropdown { field_context, .. } => assert_eq!(field_context, "Role"),
        other => panic!("expected dropdown data, got {:?}", other),
    }
}

#[test]
fn dropdown_needs_adjacent_option() {
    let actions = sequence(vec![
        click(css(".status-dropdown")),
        fill(placeholder("Name"), "x"),
        click(text("Enabled")),
    ]);
    assert!(detect_dropdown_at(&actions, 0, &config()).is_none());
}

// ============================================================================
// Modal
// ============================================================================

#[test]
fn modal_confirm_after_dialog_assertion() {
    let actions = sequence(vec![
        expect_text(css(".oxd-dialog-sheet"), "Are you Sure?"),
        click(button("Yes, Delete")),
    ]);
    let patterns = detect_patterns(&actions, &config());
    assert_eq!(patterns.len(), 1);
    assert_eq!(patterns[0].pattern_type, PatternType::Modal);
    assert_eq!(patterns[0].confidence, 0.90);
    match &patterns[0].data {
        PatternData::Modal {
            decision,
            button_name,
            ..
        } => {
            assert_eq!(*decision, ModalDecision::Confirm);
            assert_eq!(button_name, "Yes, Delete");
        }
        other => panic!("expected modal data, got {:?}", other),
    }
}

#[test]
fn modal_cancel_wins_over_confirm_keywords() {
    let actions = sequence(vec![
        expect_visible(text("Are you sure you want to delete?")),
        click(button("No, Cancel")),
    ]);
    let patterns = detect_patterns(&actions, &config());
    match &patterns[0].data {
        PatternData::Modal { decision, .. } => assert_eq!(*decision, ModalDecision::Cancel),
        other => panic!("expected modal data, got {:?}", other),
    }
}

// ============================================================================
// Search
// ============================================================================

#[test]
fn search_collects_criteria_and_verification() {
    let actions = sequence(vec![
        fill(label("Employee Name"), "Peter"),
        fill(label("Employee Id"), "0042"),
        click(button("Search")),
        expect_visible(text("Records Found")),
    ]);
    let patterns = detect_patterns(&actions, &config());
    assert_eq!(patterns.len(), 1);

    let search = &patterns[0];
    assert_eq!(search.pattern_type, PatternType::Search);
    assert_eq!((search.start_index, search.end_index), (0, 3));
    assert_eq!(search.confidence, 0.85);
    match &search.data {
        PatternData::Search {
            criteria,
            button_index,
            verification_index,
        } => {
            assert_eq!(criteria.len(), 2);
            assert_eq!(criteria[0].field, "Employee Name");
            assert_eq!(criteria[1].value.as_deref(), Some("0042"));
            assert_eq!(*button_index, 2);
            assert_eq!(*verification_index, Some(3));
        }
        other => panic!("expected search data, got {:?}", other),
    }
}

#[test]
fn search_stops_at_page_load() {
    let actions = sequence(vec![
        fill(label("Employee Name"), "Peter"),
        goto("https://hr.example.com/web/index.php/pim/viewEmployeeList"),
        click(button("Search")),
    ]);
    let patterns = detect_patterns(&actions, &config());
    assert!(patterns.iter().all(|p| p.start_index != 0));
}

// ============================================================================
// Navigation
// ============================================================================

#[test]
fn module_link_with_heading_check() {
    let actions = sequence(vec![
        click(link("Admin")),
        expect_visible(role("heading", "User Management")),
    ]);
    let patterns = detect_patterns(&actions, &config());
    assert_eq!(patterns.len(), 1);
    assert_eq!(patterns[0].pattern_type, PatternType::Navigation);
    assert_eq!(patterns[0].confidence, 0.95);
    match &patterns[0].data {
        PatternData::Navigation {
            module, heading, ..
        } => {
            assert_eq!(module, "Admin");
            assert_eq!(heading.as_deref(), Some("User Management"));
        }
        other => panic!("expected navigation data, got {:?}", other),
    }
}

#[test]
fn unknown_link_is_not_navigation() {
    let actions = sequence(vec![click(link("Help Center"))]);
    assert!(detect_patterns(&actions, &config()).is_empty());
}

// ============================================================================
// Scan invariants
// ============================================================================

#[test]
fn spans_are_ordered_and_disjoint() {
    let actions = extract(ADMIN_SCRIPT).unwrap();
    let patterns = detect_patterns(&actions, &config());
    assert!(!patterns.is_empty());

    for pair in patterns.windows(2) {
        assert!(pair[0].end_index < pair[1].start_index);
    }
    for pattern in &patterns {
        assert!(pattern.start_index <= pattern.end_index);
        assert!(pattern.end_index < actions.len());
        assert!((0.0..=1.0).contains(&pattern.confidence));
    }
}

#[test]
fn admin_script_pattern_sequence() {
    let actions = extract(ADMIN_SCRIPT).unwrap();
    let types: Vec<PatternType> = detect_patterns(&actions, &config())
        .iter()
        .map(|p| p.pattern_type)
        .collect();
    assert_eq!(
        types,
        vec![
            PatternType::Login,
            PatternType::Navigation,
            PatternType::Dropdown,
            PatternType::Search,
            PatternType::Navigation,
        ]
    );
}

#[test]
fn covering_lookup() {
    let patterns = detect_patterns(&login_sequence(), &config());
    assert!(patterns_covering(&patterns, 0).is_none());
    assert_eq!(
        patterns_covering(&patterns, 2).map(|p| p.pattern_type),
        Some(PatternType::Login)
    );
    assert!(patterns_covering(&patterns, 4).is_none());
}

#[test]
fn detection_is_deterministic() {
    let actions = extract(ADMIN_SCRIPT).unwrap();
    assert_eq!(
        detect_patterns(&actions, &config()),
        detect_patterns(&actions, &config())
    );
}
