pub mod detector;
pub mod pattern_model;

pub use detector::{
    detect_dropdown_at, detect_login_at, detect_modal_at, detect_navigation_at, detect_patterns,
    detect_search_at,
};
pub use pattern_model::{
    ModalDecision, Pattern, PatternData, PatternType, SearchCriterion, patterns_covering,
};
