// Central place for UI strings and other non-localized constants.
// Keep these out of gui.rs to reduce duplication and make tweaks safer.

// English UI strings (EN_ prefix to make future localization easier)
pub const EN_APP_TITLE: &str = "SuzEd: Suzerain Save Editor";

pub const EN_BTN_OPEN: &str = "Open...";
pub const EN_BTN_SAVE: &str = "Save";
pub const EN_BTN_SAVE_AS: &str = "Save As...";
pub const EN_BTN_ABOUT: &str = "About";
pub const EN_BTN_TOGGLE_THEME: &str = "Theme";
pub const EN_BTN_CLEAR: &str = "Clear";

pub const EN_WINDOW_ABOUT: &str = "About";

pub const EN_ABOUT_HEADING: &str = "SuzEd: Suzerain Save Editor";
pub const EN_ABOUT_VERSION: &str = "Version:";
pub const EN_ABOUT_BACKUPS: &str = "Saving over an existing file first copies it to <name>.bak.";

pub const EN_HOME_HEADING: &str = "SuzEd: Suzerain Save Editor";
pub const EN_HOME_INSTRUCTIONS: &str = "Open a Suzerain save (.json) to begin.";

pub const EN_LABEL_SEARCH: &str = "Search:";
pub const EN_HINT_SEARCH: &str = "variable name";
pub const EN_SEARCH_NO_MATCHES: &str = "No matches.";
pub const EN_LABEL_VARIABLES_COUNT: &str = "variables:";

pub const EN_COL_KEY: &str = "Key";
pub const EN_COL_TYPE: &str = "Type";
pub const EN_COL_VALUE: &str = "Value";

pub const EN_BADGE_MODIFIED: &str = "Modified";

pub const EN_FILTER_SAVE: &str = "Suzerain Save";

pub const EN_ERR_QUOTE_IN_TEXT: &str =
    "String values cannot contain double quotes (the save format has no escape for them).";

pub const EN_EMPTY: &str = "";

// Suzerain save structure keys (SZ_ prefix)

// The one field the editor touches; everything else passes through unchanged.
pub const SZ_FIELD_VARIABLES: &str = "variables";

// Wrapper literals around the variables item list.
pub const SZ_VARS_PREFIX: &str = "Variable={";
pub const SZ_VARS_SUFFIX: &str = "};";

// Where the game keeps its saves under the user profile (Unity persistentDataPath).
pub const SZ_SAVE_DIR_PUBLISHER: &str = "Torpor Games";
pub const SZ_SAVE_DIR_GAME: &str = "Suzerain";
