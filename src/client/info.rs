use super::Client;
use super::transport::HttpMethod;
use crate::core::{Error, EuMemberState, StatusMessage};

const STATUS_MESSAGES_PATH: &str = "/v1/info/statusmeldungen";
const MEMBER_STATES_PATH: &str = "/v1/info/eu_mitgliedstaaten";

impl Client {
    /// All status codes with their messages, as published by the service.
    ///
    /// The result is fetched on every call. It can contain codes that
    /// [`EvatrStatus`](crate::core::EvatrStatus) does not know.
    pub async fn status_messages(&self) -> Result<Vec<StatusMessage>, Error> {
        self.request_json::<(), _>(HttpMethod::Get, STATUS_MESSAGES_PATH, None)
            .await
    }

    /// EU member states and whether their VIES node is currently available.
    pub async fn eu_member_states(&self) -> Result<Vec<EuMemberState>, Error> {
        self.request_json::<(), _>(HttpMethod::Get, MEMBER_STATES_PATH, None)
            .await
    }
}
