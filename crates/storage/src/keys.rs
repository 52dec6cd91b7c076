//! Fixed keys of the local store. Values are JSON strings.

pub const RESPONSES: &str = "mindclone-responses";
pub const CURRENT_SECTION: &str = "mindclone-current-section";
pub const USER_EMAIL: &str = "mindclone-email";
pub const AUTOSAVE: &str = "mindclone-autosave";

pub const ALL: [&str; 4] = [RESPONSES, CURRENT_SECTION, USER_EMAIL, AUTOSAVE];
