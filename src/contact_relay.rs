use crate::domain::ContactRequest;
use reqwest::Client;

/// Forwards contact requests to the third-party relay, which emails them on.
#[derive(Clone, Debug)]
pub struct ContactRelayClient {
    base_url: String,
    recipient: String,
    http_client: Client,
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct RelayFormBody<'a> {
    first_name: &'a str,
    last_name: &'a str,
    email: &'a str,
    phone: &'a str,
    desired_part: &'a str,
    #[serde(rename = "_subject")]
    subject: &'a str,
    #[serde(rename = "_captcha")]
    captcha: &'a str,
}

impl ContactRelayClient {
    pub fn new(base_url: String, recipient: String, timeout: std::time::Duration) -> Self {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to build the relay HTTP client");
        Self {
            base_url,
            recipient,
            http_client,
        }
    }

    #[tracing::instrument(name = "Forwarding contact request to relay", skip(self, request))]
    pub async fn send(&self, request: &ContactRequest) -> Result<(), reqwest::Error> {
        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), self.recipient);
        let body = RelayFormBody {
            first_name: &request.first_name,
            last_name: &request.last_name,
            email: &request.email,
            phone: &request.phone,
            desired_part: &request.desired_part,
            subject: "Neue Teileanfrage",
            captcha: "false",
        };
        self.http_client
            .post(&url)
            .form(&body)
            .send()
            .await?
            .error_for_status()
            .map_err(|e| {
                tracing::error!("Relay rejected contact request: {:?}", e);
                e
            })?;
        Ok(())
    }
}
