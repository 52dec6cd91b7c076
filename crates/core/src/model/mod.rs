mod form;
mod ids;
mod responses;
mod schema;
mod settings;

pub use ids::{QuestionId, SectionId};

pub use form::{FormError, FormState};
pub use responses::{Responses, WordCountBand, word_count};
pub use schema::{FormSettings, Question, Schema, SchemaError, SchemaMeta, Section};
pub use settings::{ExportFormat, IntakeSettings, IntakeSettingsDraft, SettingsError};
