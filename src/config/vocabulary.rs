use serde::{Deserialize, Serialize};

// ============================================================================
// Vocabulary tables
// ============================================================================

/// A logical application area and the words that identify it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleDefinition {
    pub name: String,

    /// Matched (case-insensitive, substring) against link names
    #[serde(default)]
    pub keywords: Vec<String>,

    /// Matched (case-insensitive, substring) against navigation URLs
    #[serde(default)]
    pub url_fragments: Vec<String>,
}

impl ModuleDefinition {
    pub fn new(name: &str, keywords: &[&str], url_fragments: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            keywords: to_owned(keywords),
            url_fragments: to_owned(url_fragments),
        }
    }
}

/// Injectable keyword tables used by detectors, context inference and
/// naming. Defaults target a typical HR admin application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vocabulary {
    #[serde(default = "default_modules")]
    pub modules: Vec<ModuleDefinition>,

    #[serde(default = "default_username")]
    pub username_keywords: Vec<String>,

    #[serde(default = "default_password")]
    pub password_keywords: Vec<String>,

    /// Names of buttons that submit a login form
    #[serde(default = "default_login")]
    pub login_keywords: Vec<String>,

    #[serde(default = "default_search")]
    pub search_keywords: Vec<String>,

    /// Selector/name fragments marking a dropdown trigger
    #[serde(default = "default_dropdown")]
    pub dropdown_keywords: Vec<String>,

    /// Selector fragments marking a dropdown option
    #[serde(default = "default_option")]
    pub option_keywords: Vec<String>,

    #[serde(default = "default_confirm")]
    pub confirm_keywords: Vec<String>,

    #[serde(default = "default_cancel")]
    pub cancel_keywords: Vec<String>,

    /// Confirmation-dialog wording inside assertions
    #[serde(default = "default_dialog")]
    pub dialog_keywords: Vec<String>,

    /// Module assigned to username/password fields and login patterns
    #[serde(default = "default_login_module")]
    pub login_module: String,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self {
            modules: default_modules(),
            username_keywords: default_username(),
            password_keywords: default_password(),
            login_keywords: default_login(),
            search_keywords: default_search(),
            dropdown_keywords: default_dropdown(),
            option_keywords: default_option(),
            confirm_keywords: default_confirm(),
            cancel_keywords: default_cancel(),
            dialog_keywords: default_dialog(),
            login_module: default_login_module(),
        }
    }
}

impl Vocabulary {
    /// Module whose keyword appears in `text` (a link's accessible name).
    pub fn module_for_text(&self, text: &str) -> Option<&ModuleDefinition> {
        let text = text.to_lowercase();
        if text.trim().is_empty() {
            return None;
        }
        // Exact name match wins over substring matches ("Admin" vs "My Info")
        self.modules
            .iter()
            .find(|m| m.name.to_lowercase() == text.trim())
            .or_else(|| {
                self.modules
                    .iter()
                    .find(|m| m.keywords.iter().any(|k| text.contains(&k.to_lowercase())))
            })
    }

    /// Module whose URL fragment appears in `url`.
    pub fn module_for_url(&self, url: &str) -> Option<&ModuleDefinition> {
        let url = url.to_lowercase();
        self.modules.iter().find(|m| {
            m.url_fragments
                .iter()
                .any(|f| url.contains(&f.to_lowercase()))
        })
    }

    pub fn is_username(&self, text: &str) -> bool {
        contains_any(text, &self.username_keywords)
    }

    pub fn is_password(&self, text: &str) -> bool {
        contains_any(text, &self.password_keywords)
    }

    pub fn is_login(&self, text: &str) -> bool {
        contains_any(text, &self.login_keywords)
    }

    pub fn is_search(&self, text: &str) -> bool {
        contains_any(text, &self.search_keywords)
    }

    pub fn is_dropdown(&self, text: &str) -> bool {
        contains_any(text, &self.dropdown_keywords)
    }

    pub fn is_option(&self, text: &str) -> bool {
        contains_any(text, &self.option_keywords)
    }

    pub fn is_confirm(&self, text: &str) -> bool {
        contains_any(text, &self.confirm_keywords)
    }

    pub fn is_cancel(&self, text: &str) -> bool {
        contains_any(text, &self.cancel_keywords)
    }

    pub fn is_dialog(&self, text: &str) -> bool {
        contains_any(text, &self.dialog_keywords)
    }
}

/// Case-insensitive substring test against a keyword list.
pub fn contains_any(text: &str, keywords: &[String]) -> bool {
    let text = text.to_lowercase();
    keywords
        .iter()
        .any(|k| !k.is_empty() && text.contains(&k.to_lowercase()))
}

fn to_owned(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

// Serde default helpers
fn default_modules() -> Vec<ModuleDefinition> {
    // First match wins, so narrower URL fragments come first
    vec![
        ModuleDefinition::new("Admin", &["admin"], &["/admin/"]),
        ModuleDefinition::new("MyInfo", &["my info"], &["/pim/viewpersonaldetails"]),
        ModuleDefinition::new("PIM", &["pim"], &["/pim/"]),
        ModuleDefinition::new("Leave", &["leave"], &["/leave/"]),
        ModuleDefinition::new("Time", &["time"], &["/time/"]),
        ModuleDefinition::new("Recruitment", &["recruitment"], &["/recruitment/"]),
        ModuleDefinition::new("Performance", &["performance"], &["/performance/"]),
        ModuleDefinition::new("Dashboard", &["dashboard"], &["/dashboard"]),
        ModuleDefinition::new("Directory", &["directory"], &["/directory/"]),
        ModuleDefinition::new("Maintenance", &["maintenance"], &["/maintenance/"]),
        ModuleDefinition::new("Claim", &["claim"], &["/claim/"]),
        ModuleDefinition::new("Buzz", &["buzz"], &["/buzz/"]),
    ]
}
fn default_username() -> Vec<String> { to_owned(&["username", "user name", "login id", "userid"]) }
fn default_password() -> Vec<String> { to_owned(&["password", "passwd"]) }
fn default_login() -> Vec<String> { to_owned(&["login", "log in", "sign in", "signin"]) }
fn default_search() -> Vec<String> { to_owned(&["search", "find", "filter"]) }
fn default_dropdown() -> Vec<String> { to_owned(&["select", "dropdown", "combobox", "-- select --"]) }
fn default_option() -> Vec<String> { to_owned(&["option", "listbox"]) }
fn default_confirm() -> Vec<String> { to_owned(&["yes", "confirm", "ok", "delete", "remove"]) }
fn default_cancel() -> Vec<String> { to_owned(&["cancel", "close", "dismiss"]) }
fn default_dialog() -> Vec<String> { to_owned(&["are you sure", "confirm", "delete", "permanently"]) }
fn default_login_module() -> String { "Login".to_string() }
