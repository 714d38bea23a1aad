//! Recorded scripts used across the suites.

pub const LOGIN_SCRIPT: &str = r#"import { test, expect } from '@playwright/test';

test('login', async ({ page }) => {
  await page.goto('https://hr.example.com/web/index.php/auth/login');
  await page.getByPlaceholder('Username').fill('Admin');
  await page.getByPlaceholder('Password').fill('admin123');
  await page.getByRole('button', { name: 'Login' }).click();
  await expect(page.getByRole('heading', { name: 'Dashboard' })).toBeVisible();
});
"#;

pub const ADMIN_SCRIPT: &str = r#"import { test, expect } from '@playwright/test';

test('admin user search', async ({ page }) => {
  await page.goto('https://hr.example.com/web/index.php/auth/login');
  await page.getByPlaceholder('Username').fill('Admin');
  await page.getByPlaceholder('Password').fill('admin123');
  await page.getByRole('button', { name: 'Login' }).click();
  await page.getByRole('link', { name: 'Admin' }).click();
  await expect(page.getByRole('heading', { name: 'User Management' })).toBeVisible();
  await page.getByText('-- Select --').first().click();
  await page.getByRole('option', { name: 'Enabled' }).click();
  await page.locator('form').getByRole('textbox').nth(1).fill('jdoe');
  await page.getByRole('button', { name: 'Search' }).click();
  await page.getByRole('link', { name: 'PIM' }).click();
  await page.getByPlaceholder('Type for hints...').first().fill('Peter');
  await page.getByTestId('save-btn').click();
  await expect(page.locator('.oxd-toast')).toContainText('Successfully Saved');
});
"#;

pub const BROKEN_SCRIPT: &str = r#"test('broken', async ({ page }) => {
  await page.goto('https://hr.example.com/);
});
"#;
