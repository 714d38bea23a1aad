use recording_architect::script::{ActionType, LocatorKind, ParseError, extract};
use serde_json::json;

mod common;
use crate::common::scripts::{ADMIN_SCRIPT, BROKEN_SCRIPT, LOGIN_SCRIPT};

// ============================================================================
// Extraction order and classification
// ============================================================================

#[test]
fn login_script_yields_awaited_calls_in_order() {
    let actions = extract(LOGIN_SCRIPT).unwrap();
    let types: Vec<ActionType> = actions.iter().map(|a| a.action_type).collect();
    assert_eq!(
        types,
        vec![
            ActionType::Navigation,
            ActionType::Fill,
            ActionType::Fill,
            ActionType::Click,
            ActionType::Assertion,
        ]
    );
    for (i, action) in actions.iter().enumerate() {
        assert_eq!(action.index, i);
        assert_eq!(action.id, format!("action-{}", i + 1));
    }
}

#[test]
fn navigation_argument_is_evaluated() {
    let actions = extract(LOGIN_SCRIPT).unwrap();
    assert_eq!(
        actions[0].url().as_deref(),
        Some("https://hr.example.com/web/index.php/auth/login")
    );
    assert_eq!(actions[0].line, 4);
}

#[test]
fn fill_target_and_value() {
    let actions = extract(LOGIN_SCRIPT).unwrap();
    let fill = &actions[1];
    assert_eq!(fill.method, "fill");
    let target = fill.target.as_ref().unwrap();
    assert_eq!(target.kind, LocatorKind::Placeholder);
    assert_eq!(target.value, "Username");
    assert_eq!(fill.args, vec![json!("Admin")]);
}

#[test]
fn role_locator_carries_accessible_name() {
    let actions = extract(LOGIN_SCRIPT).unwrap();
    let target = actions[3].target.as_ref().unwrap();
    assert_eq!(target.kind, LocatorKind::Role);
    assert_eq!(target.value, "button");
    assert_eq!(target.name.as_deref(), Some("Login"));
}

#[test]
fn verification_wrapper_recovers_inner_locator() {
    let actions = extract(LOGIN_SCRIPT).unwrap();
    let check = &actions[4];
    assert_eq!(check.action_type, ActionType::Assertion);
    assert_eq!(check.method, "toBeVisible");
    let target = check.target.as_ref().unwrap();
    assert_eq!(target.value, "heading");
    assert_eq!(target.name.as_deref(), Some("Dashboard"));
}

#[test]
fn verification_without_locator_keeps_index_contiguous() {
    let source = r#"
test('t', async ({ page }) => {
  await page.goto('/web/index.php/dashboard/index');
  await expect(page).toHaveURL(/dashboard/);
  await page.getByRole('button', { name: 'Save' }).click();
});
"#;
    let actions = extract(source).unwrap();
    assert_eq!(actions.len(), 3);
    assert_eq!(actions[1].action_type, ActionType::Assertion);
    assert!(actions[1].target.is_none());
    assert_eq!(actions[1].args, vec![json!("/dashboard/")]);
    assert_eq!(actions[2].index, 2);
}

#[test]
fn refiners_pass_through_to_the_locator() {
    let actions = extract(ADMIN_SCRIPT).unwrap();
    let select = actions.iter().find(|a| a.raw_text.contains("-- Select --")).unwrap();
    let target = select.target.as_ref().unwrap();
    assert_eq!(target.kind, LocatorKind::Text);
    assert_eq!(target.value, "-- Select --");
}

#[test]
fn scoped_locator_records_its_scope() {
    let actions = extract(ADMIN_SCRIPT).unwrap();
    let fill = actions.iter().find(|a| a.raw_text.contains("jdoe")).unwrap();
    let target = fill.target.as_ref().unwrap();
    assert_eq!(target.kind, LocatorKind::Role);
    assert_eq!(target.value, "textbox");
    assert_eq!(target.scope.as_deref(), Some("page.locator('form')"));
}

#[test]
fn test_id_and_raw_selectors() {
    let actions = extract(ADMIN_SCRIPT).unwrap();
    let save = actions.iter().find(|a| a.raw_text.contains("save-btn")).unwrap();
    assert_eq!(save.target.as_ref().unwrap().kind, LocatorKind::TestId);

    let toast = actions.last().unwrap();
    assert_eq!(toast.action_type, ActionType::Assertion);
    let target = toast.target.as_ref().unwrap();
    assert_eq!(target.kind, LocatorKind::RawSelector);
    assert_eq!(target.value, ".oxd-toast");
    assert_eq!(toast.first_arg_text().as_deref(), Some("Successfully Saved"));
}

#[test]
fn trailing_object_argument_becomes_options() {
    let source = r#"
test('t', async ({ page }) => {
  await page.getByRole('button', { name: 'Save' }).click({ force: true, timeout: 500 });
});
"#;
    let actions = extract(source).unwrap();
    assert!(actions[0].args.is_empty());
    assert_eq!(actions[0].options.get("force"), Some(&json!(true)));
    assert_eq!(actions[0].options.get("timeout"), Some(&json!(500)));
}

#[test]
fn locator_through_variable_alias() {
    let source = r#"
test('t', async ({ page }) => {
  const saveButton = page.getByRole('button', { name: 'Save' });
  await saveButton.click();
});
"#;
    let actions = extract(source).unwrap();
    assert_eq!(actions.len(), 1);
    let target = actions[0].target.as_ref().unwrap();
    assert_eq!(target.name.as_deref(), Some("Save"));
}

#[test]
fn unmapped_method_is_generic() {
    let source = r#"
test('t', async ({ page }) => {
  await page.screenshot({ path: 'shot.png' });
});
"#;
    let actions = extract(source).unwrap();
    assert_eq!(actions[0].action_type, ActionType::Generic);
    assert_eq!(actions[0].method, "screenshot");
}

#[test]
fn non_awaited_calls_are_not_actions() {
    let source = r#"
test('t', async ({ page }) => {
  console.log('start');
  await page.getByText('Next').click();
});
"#;
    let actions = extract(source).unwrap();
    assert_eq!(actions.len(), 1);
    assert_eq!(actions[0].method, "click");
}

// ============================================================================
// Parse failures
// ============================================================================

#[test]
fn parse_failure_is_fatal() {
    let err = extract(BROKEN_SCRIPT).unwrap_err();
    assert!(matches!(
        err,
        ParseError::Syntax { .. } | ParseError::Missing { .. }
    ));
    assert!(err.line().is_some());
}

#[test]
fn parse_error_display_names_position() {
    let err = extract(BROKEN_SCRIPT).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("line"), "{}", message);
    assert!(message.contains("column"), "{}", message);
}

#[test]
fn dangling_call_is_rejected() {
    let source = "test('t', async ({ page }) => {\n  await page.click(\n});\n";
    assert!(extract(source).is_err());
}

// ============================================================================
// TypeScript syntax
// ============================================================================

#[test]
fn typed_async_arrow_function() {
    let source = r#"
const f = async (p: Page): Promise<void> => {
  await p.getByText('a').click();
};
"#;
    let actions = extract(source).unwrap();
    assert_eq!(actions.len(), 1);
    let target = actions[0].target.as_ref().unwrap();
    assert_eq!(target.kind, LocatorKind::Text);
    assert_eq!(target.value, "a");
}

#[test]
fn labelled_loop_parses() {
    let source = r#"
test('t', async ({ page }) => {
  label: for (;;) {
    await page.getByRole('button', { name: 'Next' }).click();
    break label;
  }
});
"#;
    let actions = extract(source).unwrap();
    assert_eq!(actions.len(), 1);
    assert_eq!(actions[0].method, "click");
}

#[test]
fn type_wrappers_and_comments_are_transparent() {
    let source = r#"
import { test, expect, type Page } from '@playwright/test';

interface Credentials { user: string }

// recorded by hand
test('t', async ({ page }: { page: Page }) => {
  /* username first */
  await (page.getByLabel('User') as Locator).fill('Admin' satisfies string);
  await page.getByRole('button', { name: 'Go' })!.click();
});
"#;
    let actions = extract(source).unwrap();
    assert_eq!(actions.len(), 2);
    assert_eq!(actions[0].target.as_ref().unwrap().kind, LocatorKind::Label);
    assert_eq!(actions[0].args, vec![json!("Admin")]);
    assert_eq!(actions[1].target.as_ref().unwrap().name.as_deref(), Some("Go"));
    assert_eq!(actions[1].line, 10);
}

#[test]
fn string_escapes_are_resolved() {
    let source = r#"
test('t', async ({ page }) => {
  await page.getByText('It\'s A').click();
  await page.getByPlaceholder("Say \"hi\"").fill(`line ${1}`);
});
"#;
    let actions = extract(source).unwrap();
    assert_eq!(actions[0].target.as_ref().unwrap().value, "It's A");
    assert_eq!(actions[1].target.as_ref().unwrap().value, "Say \"hi\"");
    assert_eq!(actions[1].args, vec![json!("line ${1}")]);
}

#[test]
fn class_methods_contribute_actions() {
    let source = r#"
export class LoginPage {
  constructor(private readonly page: Page) {}

  async login(user: string) {
    await this.page.getByPlaceholder('Username').fill(user);
  }
}
"#;
    let actions = extract(source).unwrap();
    assert_eq!(actions.len(), 1);
    assert_eq!(actions[0].target.as_ref().unwrap().value, "Username");
    assert_eq!(actions[0].args, vec![json!("user")]);
}

// ============================================================================
// Alias scoping
// ============================================================================

#[test]
fn same_alias_in_two_tests_resolves_per_test() {
    let source = r#"
test('first', async ({ page }) => {
  const row = page.getByRole('row', { name: 'Alice' });
  await row.click();
});

test('second', async ({ page }) => {
  const row = page.getByRole('row', { name: 'Bob' });
  await row.click();
});
"#;
    let actions = extract(source).unwrap();
    let names: Vec<Option<&str>> = actions
        .iter()
        .map(|a| a.target.as_ref().and_then(|t| t.name.as_deref()))
        .collect();
    assert_eq!(names, vec![Some("Alice"), Some("Bob")]);
}

#[test]
fn inner_alias_shadows_outer_until_block_ends() {
    let source = r#"
const button = page.getByRole('button', { name: 'Outer' });

test('t', async ({ page }) => {
  await button.click();
  {
    const button = page.getByRole('button', { name: 'Inner' });
    await button.click();
  }
  await button.click();
});
"#;
    let actions = extract(source).unwrap();
    let names: Vec<Option<&str>> = actions
        .iter()
        .map(|a| a.target.as_ref().and_then(|t| t.name.as_deref()))
        .collect();
    assert_eq!(names, vec![Some("Outer"), Some("Inner"), Some("Outer")]);
}

#[test]
fn alias_declared_in_another_test_is_not_visible() {
    let source = r#"
test('first', async ({ page }) => {
  const save = page.getByRole('button', { name: 'Save' });
  await save.click();
});

test('second', async ({ page }) => {
  await save.click();
});
"#;
    let actions = extract(source).unwrap();
    assert_eq!(actions.len(), 2);
    assert!(actions[0].target.is_some());
    assert!(actions[1].target.is_none());
}
