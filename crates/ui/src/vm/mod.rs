mod export_vm;
mod intake_vm;
mod time_fmt;

pub use export_vm::{ExportDialogVm, map_export_dialog};
pub use intake_vm::{
    ProgressBarVm, QuestionVm, SectionTileVm, map_progress_bar, map_questions, map_section_tiles,
    question_count_label, total_progress_label,
};
pub use time_fmt::{autosave_label, format_time_of_day, local_autosave_label};
