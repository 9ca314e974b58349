use super::Client;
use super::transport::HttpMethod;
use crate::core::{Error, ValidationRequest, ValidationResponse};

/// Country prefix every requesting VAT ID must carry.
pub const GERMAN_PREFIX: &str = "DE";

const VALIDATE_PATH: &str = "/v1/abfrage";

impl Client {
    /// Confirm a foreign VAT ID without company data (simple confirmation).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] without sending a request when
    /// `requesting_vat_id` is empty or not German, or `requested_vat_id` is
    /// empty. Upstream failures arrive as [`Error::Api`].
    pub async fn validate_vat(
        &self,
        requesting_vat_id: &str,
        requested_vat_id: &str,
    ) -> Result<ValidationResponse, Error> {
        require(requesting_vat_id, "requesting VAT ID is required")?;
        if !requesting_vat_id.starts_with(GERMAN_PREFIX) {
            return Err(Error::InvalidInput(
                "requesting VAT ID must be German".into(),
            ));
        }
        require(requested_vat_id, "requested VAT ID is required")?;

        let request = ValidationRequest::new(requesting_vat_id, requested_vat_id);
        self.send_validation(&request).await
    }

    /// Confirm a foreign VAT ID and compare company data with the registry
    /// (qualified confirmation).
    ///
    /// `street` and `postal_code` may be empty, in which case they are not
    /// sent. The `*_result` fields of the response tell which of the sent
    /// fields matched.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] without sending a request when either
    /// VAT ID, `company_name`, or `city` is empty.
    pub async fn validate_vat_qualified(
        &self,
        requesting_vat_id: &str,
        requested_vat_id: &str,
        company_name: &str,
        city: &str,
        street: &str,
        postal_code: &str,
    ) -> Result<ValidationResponse, Error> {
        require(requesting_vat_id, "requesting VAT ID is required")?;
        require(requested_vat_id, "requested VAT ID is required")?;
        require(
            company_name,
            "company name is required for qualified validation",
        )?;
        require(city, "city is required for qualified validation")?;

        let request = ValidationRequest::new(requesting_vat_id, requested_vat_id)
            .company_name(company_name)
            .city(city)
            .street(street)
            .postal_code(postal_code);
        self.send_validation(&request).await
    }

    /// Send a caller-built request as is.
    ///
    /// Only the two VAT IDs are checked for presence; in particular the
    /// requesting VAT ID is not checked for the `DE` prefix. Use this for
    /// field combinations the other two operations do not cover.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] without sending a request when either
    /// VAT ID is empty.
    pub async fn validate_with_request(
        &self,
        request: &ValidationRequest,
    ) -> Result<ValidationResponse, Error> {
        require(&request.requesting_vat_id, "requesting VAT ID is required")?;
        require(&request.requested_vat_id, "requested VAT ID is required")?;

        self.send_validation(request).await
    }

    async fn send_validation(
        &self,
        request: &ValidationRequest,
    ) -> Result<ValidationResponse, Error> {
        self.request_json(HttpMethod::Post, VALIDATE_PATH, Some(request))
            .await
    }
}

fn require(value: &str, message: &str) -> Result<(), Error> {
    if value.is_empty() {
        return Err(Error::InvalidInput(message.to_string()));
    }
    Ok(())
}
