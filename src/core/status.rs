//! eVatR status codes.
//!
//! Every response of the service carries a status string such as
//! `evatr-0000`. The codes are grouped by the HTTP status under which the
//! service reports them. The registry's own list (see
//! `Client::status_messages`) is authoritative and may contain codes this
//! table does not know yet, so lookups return `Option`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Coarse grouping of a status code by the HTTP status it arrives with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusCategory {
    /// 200: the request was processed; the code describes validity.
    Success,
    /// 400: the request was malformed.
    BadRequest,
    /// 403: the requesting party may not perform this request.
    Forbidden,
    /// 404: a VAT ID is unknown or invalid at request time.
    NotFound,
    /// 500: processing temporarily impossible.
    ProcessingError,
    /// 503: service temporarily unavailable.
    ServiceUnavailable,
}

impl StatusCategory {
    /// HTTP status code the service uses for this category.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::Success => 200,
            Self::BadRequest => 400,
            Self::Forbidden => 403,
            Self::NotFound => 404,
            Self::ProcessingError => 500,
            Self::ServiceUnavailable => 503,
        }
    }
}

/// Known eVatR status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum EvatrStatus {
    /// evatr-0000: the requested VAT ID is valid at request time.
    Valid,
    /// evatr-2002: the requested VAT ID is not valid yet, see `gueltigAb`.
    NotYetValid,
    /// evatr-2006: the requested VAT ID is no longer valid, see `gueltigAb`/`gueltigBis`.
    NoLongerValid,
    /// evatr-2008: valid, but a special case applies; contact the BZSt.
    ValidWithSpecialCase,

    /// evatr-0002: at least one required field is missing.
    MissingRequiredField,
    /// evatr-0004: the requesting DE VAT ID is syntactically incorrect.
    InvalidRequestingVatId,
    /// evatr-0005: the requested VAT ID is syntactically incorrect.
    InvalidRequestedVatId,
    /// evatr-0008: maximum number of qualified requests for this session reached.
    MaxQualifiedRequestsReached,
    /// evatr-0012: the requested VAT ID does not match its country's format.
    InvalidVatIdFormat,
    /// evatr-2003: the country code is not valid.
    InvalidCountryCode,

    /// evatr-0006: the requesting DE VAT ID may not query DE VAT IDs.
    NotAuthorizedDe,
    /// evatr-0007: invalid call.
    InvalidCall,

    /// evatr-2001: the requested VAT ID is not assigned at request time.
    VatIdNotAssigned,
    /// evatr-2005: the requesting DE VAT ID is not valid at request time.
    RequestingVatIdNotValid,

    /// evatr-2004: processing temporarily not possible.
    ProcessingError1,
    /// evatr-2011: processing temporarily not possible.
    ProcessingError2,
    /// evatr-3011: processing temporarily not possible.
    ProcessingError3,

    /// evatr-0011: service temporarily unavailable.
    ServiceUnavailable1,
    /// evatr-1001: service temporarily unavailable.
    ServiceUnavailable2,
    /// evatr-1002: service temporarily unavailable.
    ServiceUnavailable3,
    /// evatr-1003: service temporarily unavailable.
    ServiceUnavailable4,
    /// evatr-1004: service temporarily unavailable.
    ServiceUnavailable5,
}

impl EvatrStatus {
    /// Every known status, grouped by category.
    pub const ALL: [Self; 22] = [
        Self::Valid,
        Self::NotYetValid,
        Self::NoLongerValid,
        Self::ValidWithSpecialCase,
        Self::MissingRequiredField,
        Self::InvalidRequestingVatId,
        Self::InvalidRequestedVatId,
        Self::MaxQualifiedRequestsReached,
        Self::InvalidVatIdFormat,
        Self::InvalidCountryCode,
        Self::NotAuthorizedDe,
        Self::InvalidCall,
        Self::VatIdNotAssigned,
        Self::RequestingVatIdNotValid,
        Self::ProcessingError1,
        Self::ProcessingError2,
        Self::ProcessingError3,
        Self::ServiceUnavailable1,
        Self::ServiceUnavailable2,
        Self::ServiceUnavailable3,
        Self::ServiceUnavailable4,
        Self::ServiceUnavailable5,
    ];

    /// Wire code, e.g. `"evatr-0000"`.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Valid => "evatr-0000",
            Self::NotYetValid => "evatr-2002",
            Self::NoLongerValid => "evatr-2006",
            Self::ValidWithSpecialCase => "evatr-2008",
            Self::MissingRequiredField => "evatr-0002",
            Self::InvalidRequestingVatId => "evatr-0004",
            Self::InvalidRequestedVatId => "evatr-0005",
            Self::MaxQualifiedRequestsReached => "evatr-0008",
            Self::InvalidVatIdFormat => "evatr-0012",
            Self::InvalidCountryCode => "evatr-2003",
            Self::NotAuthorizedDe => "evatr-0006",
            Self::InvalidCall => "evatr-0007",
            Self::VatIdNotAssigned => "evatr-2001",
            Self::RequestingVatIdNotValid => "evatr-2005",
            Self::ProcessingError1 => "evatr-2004",
            Self::ProcessingError2 => "evatr-2011",
            Self::ProcessingError3 => "evatr-3011",
            Self::ServiceUnavailable1 => "evatr-0011",
            Self::ServiceUnavailable2 => "evatr-1001",
            Self::ServiceUnavailable3 => "evatr-1002",
            Self::ServiceUnavailable4 => "evatr-1003",
            Self::ServiceUnavailable5 => "evatr-1004",
        }
    }

    /// Parse from the wire code. Returns `None` for codes not in the table.
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.code() == code)
    }

    /// Grouping by the HTTP status the code arrives with.
    pub fn category(&self) -> StatusCategory {
        match self {
            Self::Valid | Self::NotYetValid | Self::NoLongerValid | Self::ValidWithSpecialCase => {
                StatusCategory::Success
            }
            Self::MissingRequiredField
            | Self::InvalidRequestingVatId
            | Self::InvalidRequestedVatId
            | Self::MaxQualifiedRequestsReached
            | Self::InvalidVatIdFormat
            | Self::InvalidCountryCode => StatusCategory::BadRequest,
            Self::NotAuthorizedDe | Self::InvalidCall => StatusCategory::Forbidden,
            Self::VatIdNotAssigned | Self::RequestingVatIdNotValid => StatusCategory::NotFound,
            Self::ProcessingError1 | Self::ProcessingError2 | Self::ProcessingError3 => {
                StatusCategory::ProcessingError
            }
            Self::ServiceUnavailable1
            | Self::ServiceUnavailable2
            | Self::ServiceUnavailable3
            | Self::ServiceUnavailable4
            | Self::ServiceUnavailable5 => StatusCategory::ServiceUnavailable,
        }
    }

    /// HTTP status code the service reports this status with.
    pub fn http_status(&self) -> u16 {
        self.category().http_status()
    }

    /// Whether this status means the requested VAT ID is valid right now.
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid | Self::ValidWithSpecialCase)
    }

    /// Default English description.
    pub fn message(&self) -> &'static str {
        match self {
            Self::Valid => "The requested VAT ID is valid at the time of the request",
            Self::NotYetValid => "The requested VAT ID is not yet valid, see valid-from date",
            Self::NoLongerValid => {
                "The requested VAT ID is no longer valid, see valid-from and valid-until dates"
            }
            Self::ValidWithSpecialCase => {
                "The requested VAT ID is valid, but a special case applies; contact the BZSt"
            }
            Self::MissingRequiredField => "At least one required field is missing",
            Self::InvalidRequestingVatId => "The requesting DE VAT ID is syntactically incorrect",
            Self::InvalidRequestedVatId => "The requested VAT ID is syntactically incorrect",
            Self::MaxQualifiedRequestsReached => {
                "The maximum number of qualified requests for this session has been reached"
            }
            Self::InvalidVatIdFormat => {
                "The requested VAT ID does not match the format of its member state"
            }
            Self::InvalidCountryCode => "The country code is not valid",
            Self::NotAuthorizedDe => {
                "The requesting DE VAT ID is not authorized to query DE VAT IDs"
            }
            Self::InvalidCall => "Invalid call",
            Self::VatIdNotAssigned => {
                "The requested VAT ID is not assigned at the time of the request"
            }
            Self::RequestingVatIdNotValid => {
                "The requesting DE VAT ID is not valid at the time of the request"
            }
            Self::ProcessingError1 | Self::ProcessingError2 | Self::ProcessingError3 => {
                "Processing is temporarily not possible"
            }
            Self::ServiceUnavailable1
            | Self::ServiceUnavailable2
            | Self::ServiceUnavailable3
            | Self::ServiceUnavailable4
            | Self::ServiceUnavailable5 => "The service is temporarily unavailable",
        }
    }
}

impl fmt::Display for EvatrStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Error returned when parsing an unknown status code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown eVatR status code '{0}'")]
pub struct UnknownStatus(pub String);

impl FromStr for EvatrStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s).ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

impl Serialize for EvatrStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

impl<'de> Deserialize<'de> for EvatrStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;
        code.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn codes_are_unique() {
        let codes: HashSet<_> = EvatrStatus::ALL.iter().map(|s| s.code()).collect();
        assert_eq!(codes.len(), EvatrStatus::ALL.len());
    }

    #[test]
    fn from_code_roundtrips_every_status() {
        for status in EvatrStatus::ALL {
            assert_eq!(EvatrStatus::from_code(status.code()), Some(status));
        }
    }

    #[test]
    fn unknown_codes() {
        assert_eq!(EvatrStatus::from_code("evatr-9999"), None);
        assert_eq!(EvatrStatus::from_code(""), None);
        assert_eq!(EvatrStatus::from_code("EVATR-0000"), None);
        assert!("evatr-9999".parse::<EvatrStatus>().is_err());
    }

    #[test]
    fn category_counts() {
        let count = |cat: StatusCategory| {
            EvatrStatus::ALL
                .iter()
                .filter(|s| s.category() == cat)
                .count()
        };
        assert_eq!(count(StatusCategory::Success), 4);
        assert_eq!(count(StatusCategory::BadRequest), 6);
        assert_eq!(count(StatusCategory::Forbidden), 2);
        assert_eq!(count(StatusCategory::NotFound), 2);
        assert_eq!(count(StatusCategory::ProcessingError), 3);
        assert_eq!(count(StatusCategory::ServiceUnavailable), 5);
    }

    #[test]
    fn http_status_by_code() {
        assert_eq!(EvatrStatus::MissingRequiredField.http_status(), 400);
        assert_eq!(EvatrStatus::InvalidCountryCode.http_status(), 400);
        assert_eq!(EvatrStatus::InvalidCall.http_status(), 403);
        assert_eq!(EvatrStatus::VatIdNotAssigned.http_status(), 404);
        assert_eq!(EvatrStatus::NoLongerValid.http_status(), 200);
        assert_eq!(EvatrStatus::ProcessingError3.http_status(), 500);
        assert_eq!(EvatrStatus::ServiceUnavailable5.http_status(), 503);
    }

    #[test]
    fn only_valid_and_special_case_are_valid() {
        let valid: Vec<_> = EvatrStatus::ALL.into_iter().filter(|s| s.is_valid()).collect();
        assert_eq!(
            valid,
            vec![EvatrStatus::Valid, EvatrStatus::ValidWithSpecialCase]
        );
    }

    #[test]
    fn equivalent_variants_share_message() {
        assert_eq!(
            EvatrStatus::ProcessingError1.message(),
            EvatrStatus::ProcessingError3.message()
        );
        assert_eq!(
            EvatrStatus::ServiceUnavailable1.message(),
            EvatrStatus::ServiceUnavailable5.message()
        );
    }

    #[test]
    fn serde_uses_wire_code() {
        let json = serde_json::to_string(&EvatrStatus::VatIdNotAssigned).unwrap();
        assert_eq!(json, "\"evatr-2001\"");
        let back: EvatrStatus = serde_json::from_str("\"evatr-2008\"").unwrap();
        assert_eq!(back, EvatrStatus::ValidWithSpecialCase);
    }
}
