use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::error::Error;
use super::status::EvatrStatus;

/// Body of `POST /v1/abfrage`.
///
/// The company fields are only sent for a qualified confirmation request.
/// A company field that is `None` or an empty string is left out of the body,
/// whether it was set through the builder methods or directly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationRequest {
    /// Requesting German VAT ID (e.g. "DE123456789").
    #[serde(rename = "anfragendeUstid")]
    pub requesting_vat_id: String,
    /// VAT ID to confirm.
    #[serde(rename = "angefragteUstid")]
    pub requested_vat_id: String,
    /// Company name (required for qualified requests).
    #[serde(rename = "firmenname", default, skip_serializing_if = "is_blank")]
    pub company_name: Option<String>,
    /// Street and house number.
    #[serde(rename = "strasse", default, skip_serializing_if = "is_blank")]
    pub street: Option<String>,
    /// Postal code.
    #[serde(rename = "plz", default, skip_serializing_if = "is_blank")]
    pub postal_code: Option<String>,
    /// City (required for qualified requests).
    #[serde(rename = "ort", default, skip_serializing_if = "is_blank")]
    pub city: Option<String>,
}

impl ValidationRequest {
    /// A simple confirmation request without company data.
    pub fn new(
        requesting_vat_id: impl Into<String>,
        requested_vat_id: impl Into<String>,
    ) -> Self {
        Self {
            requesting_vat_id: requesting_vat_id.into(),
            requested_vat_id: requested_vat_id.into(),
            ..Self::default()
        }
    }

    /// Set the company name; an empty value clears it.
    pub fn company_name(mut self, company_name: impl Into<String>) -> Self {
        self.company_name = non_empty(company_name.into());
        self
    }

    /// Set street and house number; an empty value clears it.
    pub fn street(mut self, street: impl Into<String>) -> Self {
        self.street = non_empty(street.into());
        self
    }

    /// Set the postal code; an empty value clears it.
    pub fn postal_code(mut self, postal_code: impl Into<String>) -> Self {
        self.postal_code = non_empty(postal_code.into());
        self
    }

    /// Set the city; an empty value clears it.
    pub fn city(mut self, city: impl Into<String>) -> Self {
        self.city = non_empty(city.into());
        self
    }

    /// Whether any company field is set, making this a qualified request.
    pub fn is_qualified(&self) -> bool {
        [&self.company_name, &self.street, &self.postal_code, &self.city]
            .into_iter()
            .any(|field| !is_blank(field))
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() { None } else { Some(value) }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(str::is_empty)
}

/// Response of `POST /v1/abfrage`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResponse {
    /// Technical ID of the request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Time of the request (RFC 3339).
    #[serde(rename = "anfrageZeitpunkt")]
    pub request_timestamp: String,
    /// Start of validity; only present for not-yet / no-longer valid IDs.
    #[serde(
        rename = "gueltigAb",
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub valid_from: Option<String>,
    /// End of validity; only present for no-longer valid IDs.
    #[serde(
        rename = "gueltigBis",
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub valid_until: Option<String>,
    /// eVatR status code (e.g. "evatr-0000").
    pub status: String,
    #[serde(
        rename = "ergFirmenname",
        default,
        deserialize_with = "verification_result",
        skip_serializing_if = "Option::is_none"
    )]
    pub company_name_result: Option<VerificationResult>,
    #[serde(
        rename = "ergStrasse",
        default,
        deserialize_with = "verification_result",
        skip_serializing_if = "Option::is_none"
    )]
    pub street_result: Option<VerificationResult>,
    #[serde(
        rename = "ergPlz",
        default,
        deserialize_with = "verification_result",
        skip_serializing_if = "Option::is_none"
    )]
    pub postal_code_result: Option<VerificationResult>,
    #[serde(
        rename = "ergOrt",
        default,
        deserialize_with = "verification_result",
        skip_serializing_if = "Option::is_none"
    )]
    pub city_result: Option<VerificationResult>,
}

impl ValidationResponse {
    /// Whether the requested VAT ID is valid at request time.
    ///
    /// Only `evatr-0000` and `evatr-2008` count as valid. Not-yet-valid and
    /// no-longer-valid IDs are reported with a success status but are not
    /// valid now.
    pub fn is_valid(&self) -> bool {
        self.known_status().is_some_and(|s| s.is_valid())
    }

    /// The status as a known code, if the table has it.
    pub fn known_status(&self) -> Option<EvatrStatus> {
        EvatrStatus::from_code(&self.status)
    }

    /// Parsed `anfrageZeitpunkt`.
    pub fn request_timestamp(&self) -> Result<DateTime<FixedOffset>, Error> {
        parse_timestamp(&self.request_timestamp)
    }

    /// Parsed `gueltigAb`; `Ok(None)` when the service did not send one.
    pub fn valid_from(&self) -> Result<Option<DateTime<FixedOffset>>, Error> {
        self.valid_from.as_deref().map(parse_timestamp).transpose()
    }

    /// Parsed `gueltigBis`; `Ok(None)` when the service did not send one.
    pub fn valid_until(&self) -> Result<Option<DateTime<FixedOffset>>, Error> {
        self.valid_until.as_deref().map(parse_timestamp).transpose()
    }

    /// The qualified comparison outcomes the service returned, in request
    /// field order.
    pub fn verification_results(
        &self,
    ) -> impl Iterator<Item = (CompanyField, VerificationResult)> + '_ {
        [
            (CompanyField::CompanyName, &self.company_name_result),
            (CompanyField::Street, &self.street_result),
            (CompanyField::PostalCode, &self.postal_code_result),
            (CompanyField::City, &self.city_result),
        ]
        .into_iter()
        .filter_map(|(field, result)| result.clone().map(|r| (field, r)))
    }
}

fn parse_timestamp(value: &str) -> Result<DateTime<FixedOffset>, Error> {
    DateTime::parse_from_rfc3339(value).map_err(|source| Error::Timestamp {
        value: value.to_string(),
        source,
    })
}

/// Company field compared during a qualified request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompanyField {
    CompanyName,
    Street,
    PostalCode,
    City,
}

/// Outcome of comparing one company field against the registry.
///
/// Letters outside A-D are kept as [`VerificationResult::Other`] so that a
/// new code from the service does not fail the whole confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum VerificationResult {
    /// A: matches the registered data.
    Match,
    /// B: does not match.
    Mismatch,
    /// C: not requested.
    NotRequested,
    /// D: not provided by the member state.
    NotProvided,
    /// A code this crate does not know, as sent.
    Other(String),
}

impl VerificationResult {
    /// Wire code, a single letter for the known outcomes.
    pub fn code(&self) -> &str {
        match self {
            Self::Match => "A",
            Self::Mismatch => "B",
            Self::NotRequested => "C",
            Self::NotProvided => "D",
            Self::Other(code) => code.as_str(),
        }
    }

    /// Parse a known letter. Returns `None` for anything outside A-D.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "A" => Some(Self::Match),
            "B" => Some(Self::Mismatch),
            "C" => Some(Self::NotRequested),
            "D" => Some(Self::NotProvided),
            _ => None,
        }
    }
}

impl Serialize for VerificationResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

impl From<String> for VerificationResult {
    fn from(code: String) -> Self {
        Self::from_code(&code).unwrap_or(Self::Other(code))
    }
}

impl<'de> Deserialize<'de> for VerificationResult {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::from)
    }
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|v| !v.is_empty()))
}

fn verification_result<'de, D>(deserializer: D) -> Result<Option<VerificationResult>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(empty_as_none(deserializer)?.map(VerificationResult::from))
}

/// Entry of `GET /v1/info/statusmeldungen`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusMessage {
    /// eVatR status code (e.g. "evatr-0000").
    pub status: String,
    /// Category label (e.g. "Erfolg", "Fehler").
    #[serde(rename = "kategorie")]
    pub category: String,
    /// HTTP status the service reports this code with.
    #[serde(rename = "httpcode")]
    pub http_code: u16,
    /// Request field the status relates to, if any.
    #[serde(rename = "feld", default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// Message text (German).
    #[serde(rename = "meldung")]
    pub message: String,
}

/// Entry of `GET /v1/info/eu_mitgliedstaaten`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EuMemberState {
    /// ISO 3166-1 alpha-2 code (Greece is "EL" in VIES).
    pub alpha2: String,
    pub name: String,
    /// Whether the member state's VIES node currently answers requests.
    #[serde(rename = "verfuegbar")]
    pub available: bool,
}

/// JSON body of a non-2xx response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub status: String,
    #[serde(rename = "meldung", default)]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_request_omits_company_fields() {
        let req = ValidationRequest::new("DE123456789", "ATU12345678");
        let json = serde_json::to_string(&req).unwrap();
        insta::assert_snapshot!(json, @r#"{"anfragendeUstid":"DE123456789","angefragteUstid":"ATU12345678"}"#);
        assert!(!req.is_qualified());
    }

    #[test]
    fn qualified_request_uses_wire_names() {
        let req = ValidationRequest::new("DE123456789", "ATU12345678")
            .company_name("Musterhaus GmbH & Co KG")
            .street("Musterstrasse 22")
            .postal_code("12345")
            .city("Musterort");
        let json = serde_json::to_string(&req).unwrap();
        insta::assert_snapshot!(json, @r#"{"anfragendeUstid":"DE123456789","angefragteUstid":"ATU12345678","firmenname":"Musterhaus GmbH & Co KG","strasse":"Musterstrasse 22","plz":"12345","ort":"Musterort"}"#);
        assert!(req.is_qualified());
    }

    #[test]
    fn empty_optional_fields_are_dropped() {
        let req = ValidationRequest::new("DE123456789", "ATU12345678")
            .company_name("Test GmbH")
            .street("")
            .postal_code("")
            .city("Berlin");
        assert_eq!(req.street, None);
        assert_eq!(req.postal_code, None);
        let json: serde_json::Value = serde_json::to_value(&req).unwrap();
        assert!(json.get("strasse").is_none());
        assert!(json.get("plz").is_none());
        assert_eq!(json["ort"], "Berlin");
    }

    #[test]
    fn blank_fields_set_directly_stay_off_the_wire() {
        let req = ValidationRequest {
            company_name: Some(String::new()),
            street: Some(String::new()),
            postal_code: None,
            city: Some("Berlin".into()),
            ..ValidationRequest::new("DE123456789", "ATU12345678")
        };
        let json = serde_json::to_string(&req).unwrap();
        insta::assert_snapshot!(json, @r#"{"anfragendeUstid":"DE123456789","angefragteUstid":"ATU12345678","ort":"Berlin"}"#);

        let blank = ValidationRequest {
            company_name: Some(String::new()),
            ..ValidationRequest::new("DE123456789", "ATU12345678")
        };
        assert!(!blank.is_qualified());
        let json = serde_json::to_string(&blank).unwrap();
        insta::assert_snapshot!(json, @r#"{"anfragendeUstid":"DE123456789","angefragteUstid":"ATU12345678"}"#);
    }

    #[test]
    fn is_valid_by_status() {
        let cases = [
            ("evatr-0000", true),
            ("evatr-2008", true),
            ("evatr-2002", false),
            ("evatr-2006", false),
            ("evatr-2001", false),
            ("", false),
            ("evatr-9999", false),
        ];
        for (status, expected) in cases {
            let resp = ValidationResponse {
                status: status.into(),
                ..Default::default()
            };
            assert_eq!(resp.is_valid(), expected, "status {status}");
        }
    }

    #[test]
    fn decode_full_response() {
        let json = r#"{
            "id": "abc-123",
            "anfrageZeitpunkt": "2024-05-02T10:15:30+02:00",
            "gueltigAb": "2024-06-01T00:00:00Z",
            "status": "evatr-2002",
            "ergFirmenname": "A",
            "ergStrasse": "B",
            "ergPlz": "C",
            "ergOrt": "D"
        }"#;
        let resp: ValidationResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.id.as_deref(), Some("abc-123"));
        assert_eq!(resp.known_status(), Some(EvatrStatus::NotYetValid));
        assert!(!resp.is_valid());
        assert_eq!(resp.company_name_result, Some(VerificationResult::Match));
        assert_eq!(resp.street_result, Some(VerificationResult::Mismatch));
        assert_eq!(resp.postal_code_result, Some(VerificationResult::NotRequested));
        assert_eq!(resp.city_result, Some(VerificationResult::NotProvided));
        assert_eq!(resp.valid_until, None);
    }

    #[test]
    fn missing_or_empty_results_are_none() {
        let json = r#"{"anfrageZeitpunkt":"2024-05-02T10:15:30Z","status":"evatr-0000","ergFirmenname":"","gueltigAb":""}"#;
        let resp: ValidationResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.company_name_result, None);
        assert_eq!(resp.city_result, None);
        assert_eq!(resp.valid_from, None);
        assert_eq!(resp.verification_results().count(), 0);
    }

    #[test]
    fn unknown_verification_letter_is_kept() {
        let json = r#"{"anfrageZeitpunkt":"2024-05-02T10:15:30Z","status":"evatr-0000","ergFirmenname":"A","ergOrt":"E"}"#;
        let resp: ValidationResponse = serde_json::from_str(json).unwrap();
        assert!(resp.is_valid());
        assert_eq!(resp.company_name_result, Some(VerificationResult::Match));
        assert_eq!(resp.city_result, Some(VerificationResult::Other("E".into())));

        let back = serde_json::to_value(&resp).unwrap();
        assert_eq!(back["ergOrt"], "E");
    }

    #[test]
    fn verification_results_in_field_order() {
        let resp = ValidationResponse {
            company_name_result: Some(VerificationResult::Mismatch),
            city_result: Some(VerificationResult::Match),
            ..Default::default()
        };
        let results: Vec<_> = resp.verification_results().collect();
        assert_eq!(
            results,
            vec![
                (CompanyField::CompanyName, VerificationResult::Mismatch),
                (CompanyField::City, VerificationResult::Match),
            ]
        );
    }

    #[test]
    fn request_timestamp_parses_rfc3339() {
        let resp = ValidationResponse {
            request_timestamp: "2024-05-02T10:15:30+02:00".into(),
            ..Default::default()
        };
        let ts = resp.request_timestamp().unwrap();
        assert_eq!(ts.timestamp(), 1_714_637_730);
    }

    #[test]
    fn request_timestamp_rejects_garbage() {
        let resp = ValidationResponse {
            request_timestamp: "02.05.2024".into(),
            ..Default::default()
        };
        assert!(matches!(
            resp.request_timestamp(),
            Err(Error::Timestamp { .. })
        ));
    }

    #[test]
    fn absent_validity_window_is_none() {
        let resp = ValidationResponse::default();
        assert_eq!(resp.valid_from().unwrap(), None);
        assert_eq!(resp.valid_until().unwrap(), None);
    }

    #[test]
    fn validity_window_parses() {
        let resp = ValidationResponse {
            valid_from: Some("2020-01-01T00:00:00Z".into()),
            valid_until: Some("2023-12-31T00:00:00Z".into()),
            status: EvatrStatus::NoLongerValid.code().into(),
            ..Default::default()
        };
        let from = resp.valid_from().unwrap().unwrap();
        let until = resp.valid_until().unwrap().unwrap();
        assert!(from < until);
        assert_eq!(from.timestamp(), 1_577_836_800);
    }

    #[test]
    fn decode_status_message() {
        let json = r#"{"status":"evatr-0002","kategorie":"Fehler","httpcode":400,"feld":"anfragendeUstid","meldung":"Mindestens eins der Pflichtfelder ist nicht besetzt."}"#;
        let msg: StatusMessage = serde_json::from_str(json).unwrap();
        assert_eq!(msg.http_code, 400);
        assert_eq!(msg.field.as_deref(), Some("anfragendeUstid"));
        assert_eq!(msg.category, "Fehler");
    }

    #[test]
    fn decode_member_state() {
        let json = r#"{"alpha2":"AT","name":"Österreich","verfuegbar":true}"#;
        let state: EuMemberState = serde_json::from_str(json).unwrap();
        assert_eq!(state.alpha2, "AT");
        assert!(state.available);
    }

    #[test]
    fn error_response_tolerates_missing_fields() {
        let resp: ErrorResponse = serde_json::from_str(r#"{"status":"evatr-0011"}"#).unwrap();
        assert_eq!(resp.status, "evatr-0011");
        assert!(resp.message.is_empty());
    }
}
