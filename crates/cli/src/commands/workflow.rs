//! Workflow inspection.

use zenzebra_core::{InquiryStatus, PartnerRequestStatus, StatusWorkflow};

fn print_table<S: StatusWorkflow>(title: &str, statuses: &[S]) {
    tracing::info!("{title} (starts at {})", S::INITIAL);
    for status in statuses {
        if status.is_terminal() {
            tracing::info!("  {status} (terminal)");
        } else {
            let next: Vec<String> = status.successors().iter().map(ToString::to_string).collect();
            tracing::info!("  {status} -> {}", next.join(", "));
        }
    }
}

/// Print both transition tables.
pub fn show() {
    print_table("Inquiry", &InquiryStatus::ALL);
    print_table("Partner request", &PartnerRequestStatus::ALL);
}
