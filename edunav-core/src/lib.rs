pub mod error;

pub mod config;

pub mod logging;
pub use logging::Logger;

pub mod model {
    pub mod records;
    pub use records::{Branch, Course, RecordId, Resource, Semester, Subject, University};

    pub mod catalog;
    pub use catalog::Catalog;

    pub mod navigation;
    pub use navigation::{Navigator, Selection, ViewLevel};

    pub mod filters;
    pub use filters::{FilterValue, ResourceFilters};

    pub mod library;
    pub use library::Library;

    pub mod preferences;
    pub use preferences::{Preferences, Theme};

    pub mod app_state;
    pub use app_state::{AppState, LoadStatus};

    pub mod ui_state;
    pub use ui_state::{
        LoadingState, Notification, NotificationLevel, RedrawFlag, UIOverlay, UIState,
    };
}

pub mod provider {
    pub mod data_provider;
    pub use data_provider::{Collection, DataProvider, LoadProgress, load_catalog};

    pub mod sheets;
    pub use sheets::SheetsProvider;
}

pub mod controller {
    pub mod actions;
    pub use actions::Action;

    pub mod action_dispatcher;
    pub use action_dispatcher::{ActionDispatcher, DispatchResult};

    pub mod event_loop;
    pub use event_loop::{EventLoop, TaskResult};

    pub mod voice;
}

pub mod view {
    pub mod icons;

    pub mod theme;

    pub mod snapshots;
    pub use snapshots::{Body, Card, Crumb, PageMeta, UiSnapshot, ViewSnapshot};

    pub mod ui;
    pub use ui::UIRenderer;

    pub mod components {
        pub mod breadcrumb_bar;
        pub mod card_table;
        pub mod error_overlay;
        pub mod filter_bar;
        pub mod help_overlay;
        pub mod input_prompt_overlay;
        pub mod loading_overlay;
        pub mod notification_overlay;
        pub mod status_bar;
    }
}

pub use error::AppError;

pub use model::{app_state::AppState, ui_state::UIState};
