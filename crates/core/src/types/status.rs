//! Status enums for inquiries and partner requests.
//!
//! The serialized names are the exact strings stored in the document backend,
//! which is why the two enums use different casing conventions.

use serde::{Deserialize, Serialize};

/// Error returned when a status string is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown status: {0}")]
pub struct UnknownStatus(pub String);

/// Lifecycle of a customer inquiry from the contact form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum InquiryStatus {
    /// Submitted, nobody has looked at it yet.
    #[default]
    Queued,
    /// Someone on the team is handling it.
    #[serde(rename = "In_process")]
    InProcess,
    /// Resolved. Terminal.
    Completed,
    /// Dropped without resolution. Terminal.
    Discarded,
}

impl InquiryStatus {
    /// Every status, in workflow order.
    pub const ALL: [Self; 4] = [Self::Queued, Self::InProcess, Self::Completed, Self::Discarded];

    /// Wire name as stored in the backend.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Queued => "Queued",
            Self::InProcess => "In_process",
            Self::Completed => "Completed",
            Self::Discarded => "Discarded",
        }
    }

    /// Human-readable label used in notification emails.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Queued => "Queued",
            Self::InProcess => "In process",
            Self::Completed => "Completed",
            Self::Discarded => "Discarded",
        }
    }
}

impl std::fmt::Display for InquiryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for InquiryStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

/// Lifecycle of a partnership request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PartnerRequestStatus {
    /// Submitted, awaiting first contact.
    #[default]
    Queued,
    /// The partnerships team reached out.
    #[serde(rename = "contacted")]
    Contacted,
    /// Terms are being worked out.
    #[serde(rename = "in_progress")]
    InProgress,
    /// The partner is live. Terminal.
    #[serde(rename = "onboarded")]
    Onboarded,
    /// Not pursued. Terminal.
    #[serde(rename = "discarded")]
    Discarded,
    /// Junk submission. Terminal.
    #[serde(rename = "spam")]
    Spam,
}

impl PartnerRequestStatus {
    /// Every status, in workflow order.
    pub const ALL: [Self; 6] = [
        Self::Queued,
        Self::Contacted,
        Self::InProgress,
        Self::Onboarded,
        Self::Discarded,
        Self::Spam,
    ];

    /// Wire name as stored in the backend.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Queued => "Queued",
            Self::Contacted => "contacted",
            Self::InProgress => "in_progress",
            Self::Onboarded => "onboarded",
            Self::Discarded => "discarded",
            Self::Spam => "spam",
        }
    }
}

impl std::fmt::Display for PartnerRequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PartnerRequestStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_inquiry_wire_names() {
        assert_eq!(
            serde_json::to_string(&InquiryStatus::InProcess).unwrap(),
            "\"In_process\""
        );
        let parsed: InquiryStatus = serde_json::from_str("\"Completed\"").unwrap();
        assert_eq!(parsed, InquiryStatus::Completed);
    }

    #[test]
    fn test_inquiry_from_str_matches_wire_names() {
        for status in InquiryStatus::ALL {
            assert_eq!(status.as_str().parse::<InquiryStatus>().unwrap(), status);
        }
        assert_eq!(
            "in_process".parse::<InquiryStatus>().unwrap(),
            InquiryStatus::InProcess
        );
        assert!("Archived".parse::<InquiryStatus>().is_err());
    }

    #[test]
    fn test_partner_wire_names() {
        assert_eq!(
            serde_json::to_string(&PartnerRequestStatus::Queued).unwrap(),
            "\"Queued\""
        );
        assert_eq!(
            serde_json::to_string(&PartnerRequestStatus::InProgress).unwrap(),
            "\"in_progress\""
        );
        for status in PartnerRequestStatus::ALL {
            assert_eq!(
                status.as_str().parse::<PartnerRequestStatus>().unwrap(),
                status
            );
        }
    }

    #[test]
    fn test_status_label() {
        assert_eq!(InquiryStatus::InProcess.label(), "In process");
    }
}
