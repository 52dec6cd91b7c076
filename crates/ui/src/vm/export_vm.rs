use intake_core::export::ExportReceipt;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportDialogVm {
    pub response_count: usize,
    pub percentage_label: String,
    pub linked_email: Option<String>,
    pub file_name: String,
}

#[must_use]
pub fn map_export_dialog(
    receipt: ExportReceipt,
    user_email: Option<&str>,
    file_name: String,
) -> ExportDialogVm {
    ExportDialogVm {
        response_count: receipt.response_count,
        percentage_label: format!("{}%", receipt.completion_percentage),
        linked_email: user_email.map(str::to_string),
        file_name,
    }
}
