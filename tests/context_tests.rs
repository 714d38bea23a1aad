use recording_architect::config::PipelineConfig;
use recording_architect::context::{
    ElementContext, ElementKind, UNKNOWN_MODULE, context_at, element_kind, extract_contexts,
    extract_element_context,
};
use recording_architect::pattern::detect_patterns;
use recording_architect::script::{Action, ActionType};

mod common;
use crate::common::builders::{
    LOGIN_URL, bare_role, button, click, css, expect_text, expect_visible, fill, goto, label, link,
    login_sequence, navigation_sequence, placeholder, role, sequence, test_id, text, untargeted,
};

fn contexts_for(actions: &[Action]) -> Vec<ElementContext> {
    let config = PipelineConfig::default();
    let patterns = detect_patterns(actions, &config);
    extract_contexts(actions, &patterns, &config)
}

// ============================================================================
// Element kind
// ============================================================================

#[test]
fn role_mapping_comes_first() {
    assert_eq!(element_kind(&click(button("Save"))), ElementKind::Button);
    assert_eq!(element_kind(&click(link("Admin"))), ElementKind::Link);
    assert_eq!(element_kind(&click(bare_role("combobox"))), ElementKind::Dropdown);
    assert_eq!(
        element_kind(&expect_visible(role("heading", "Dashboard"))),
        ElementKind::Heading
    );
}

#[test]
fn selector_keywords_classify_raw_selectors() {
    assert_eq!(
        element_kind(&expect_text(css(".oxd-toast"), "Saved")),
        ElementKind::Toast
    );
    assert_eq!(element_kind(&click(test_id("save-btn"))), ElementKind::Button);
    assert_eq!(element_kind(&click(css("input[type=checkbox]"))), ElementKind::Checkbox);
}

#[test]
fn locate_method_then_action_type() {
    assert_eq!(element_kind(&fill(placeholder("Name"), "x")), ElementKind::Textbox);
    assert_eq!(element_kind(&fill(label("Name"), "x")), ElementKind::Textbox);
    assert_eq!(element_kind(&click(text("Enabled"))), ElementKind::Generic);
    assert_eq!(
        element_kind(&untargeted(ActionType::Click, "click")),
        ElementKind::Generic
    );
}

// ============================================================================
// Owning module
// ============================================================================

#[test]
fn contexts_are_index_aligned() {
    let actions = navigation_sequence();
    let contexts = contexts_for(&actions);
    assert_eq!(contexts.len(), actions.len());
    for (i, ctx) in contexts.iter().enumerate() {
        assert_eq!(ctx.action_index, i);
        assert_eq!(ctx.action_type, actions[i].action_type);
    }
}

#[test]
fn contexts_keep_recorded_indices_across_gaps() {
    let mut actions = sequence(vec![
        goto(LOGIN_URL),
        fill(placeholder("Username"), "Admin"),
        untargeted(ActionType::Wait, "waitForTimeout"),
        fill(placeholder("Password"), "admin123"),
        click(button("Login")),
    ]);
    actions.remove(2);
    let contexts = contexts_for(&actions);

    let indices: Vec<usize> = contexts.iter().map(|c| c.action_index).collect();
    assert_eq!(indices, vec![0, 1, 3, 4]);
    for ctx in &contexts {
        assert_eq!(ctx.module, "Login");
    }
    assert_eq!(context_at(&contexts, 3).unwrap().purpose, "enter password");
    assert!(context_at(&contexts, 2).is_none());
}

#[test]
fn login_url_and_login_fields_belong_to_login() {
    let contexts = contexts_for(&login_sequence());
    for ctx in &contexts[..4] {
        assert_eq!(ctx.module, "Login");
    }
}

#[test]
fn navigation_url_names_only_itself() {
    let actions = sequence(vec![
        goto("https://hr.example.com/web/index.php/pim/viewEmployeeList"),
        click(button("Add")),
    ]);
    let contexts = contexts_for(&actions);
    assert_eq!(contexts[0].module, "PIM");
    assert_eq!(contexts[1].module, UNKNOWN_MODULE);
}

#[test]
fn page_load_hides_earlier_history_from_later_actions() {
    let actions = sequence(vec![
        goto("https://hr.example.com/web/index.php/pim/viewEmployeeList"),
        fill(placeholder("Username"), "Admin"),
        click(button("Save")),
    ]);
    let modules: Vec<String> = contexts_for(&actions).into_iter().map(|c| c.module).collect();
    assert_eq!(modules, vec!["PIM", "Login", UNKNOWN_MODULE]);
}

#[test]
fn link_after_page_load_still_scopes() {
    let actions = sequence(vec![
        goto("https://hr.example.com/web/index.php/dashboard/index"),
        click(link("Admin")),
        click(button("Add")),
    ]);
    let contexts = contexts_for(&actions);
    assert_eq!(contexts[1].module, "Admin");
    assert_eq!(contexts[2].module, "Admin");
}

#[test]
fn module_link_scopes_following_actions() {
    let contexts = contexts_for(&navigation_sequence());
    let modules: Vec<&str> = contexts.iter().map(|c| c.module.as_str()).collect();
    assert_eq!(modules, vec!["Admin", "Admin", "Admin", "PIM", "PIM", "PIM"]);
}

#[test]
fn page_load_closes_open_link() {
    let actions = sequence(vec![
        click(link("Admin")),
        goto("https://hr.example.com/somewhere/else"),
        click(button("Add")),
    ]);
    let contexts = contexts_for(&actions);
    assert_eq!(contexts[0].module, "Admin");
    assert_eq!(contexts[2].module, UNKNOWN_MODULE);
    assert!(!contexts[2].is_assigned());
}

#[test]
fn username_selector_falls_back_to_login() {
    let actions = sequence(vec![fill(css("input[name=username]"), "Admin")]);
    let contexts = contexts_for(&actions);
    assert_eq!(contexts[0].module, "Login");
}

#[test]
fn nothing_known_is_unknown() {
    let actions = sequence(vec![click(button("Save"))]);
    assert_eq!(contexts_for(&actions)[0].module, UNKNOWN_MODULE);
}

// ============================================================================
// Purpose and business term
// ============================================================================

#[test]
fn pattern_membership_drives_purpose() {
    let contexts = contexts_for(&login_sequence());
    assert_eq!(contexts[1].purpose, "enter username");
    assert_eq!(contexts[2].purpose, "enter password");
    assert_eq!(contexts[3].purpose, "submit login");
}

#[test]
fn heuristic_purpose_outside_patterns() {
    let actions = sequence(vec![click(button("Save")), fill(label("First Name"), "Ada")]);
    let contexts = contexts_for(&actions);
    assert_eq!(contexts[0].purpose, "click save");
    assert_eq!(contexts[1].purpose, "enter first name");
}

#[test]
fn business_term_is_normalized_label() {
    let actions = sequence(vec![click(button("  Save   Changes "))]);
    let config = PipelineConfig::default();
    let ctx = extract_element_context(&actions[0], &[], &actions, &config.vocabulary);
    assert_eq!(ctx.business_term.as_deref(), Some("Save Changes"));
    assert_eq!(ctx.element_kind, ElementKind::Button);
}

#[test]
fn extraction_is_pure() {
    let actions = navigation_sequence();
    assert_eq!(contexts_for(&actions), contexts_for(&actions));
}
