pub mod architecture_model;
pub mod builder;
pub mod organizer;

pub use architecture_model::{
    Architecture, ElementDefinition, ElementRef, MethodDefinition, MethodParameter, MethodStep,
    Omission, OmissionKind, PageGrouping, SHARED_NAVIGATION_MODULE, SharedNavigation,
};
pub use builder::{ElementSet, build_elements, build_methods};
pub use organizer::{
    NAVIGATE_METHOD, NAVIGATE_PARAMETER, NavigationExtraction, assign_module, extract_navigation,
    organize,
};
