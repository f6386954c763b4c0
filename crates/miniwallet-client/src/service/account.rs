//! Account resource: a handle bound to one remote account.

use serde_json::Value;
use tracing::{debug, info};

use super::rest_client::{RestClient, ACCOUNTS_PATH};
use crate::domain::entities::{CreatedResource, GeneratedAccountIdentifier, PaymentRequest};
use crate::domain::{
    dump_events, event_as_value, event_matches, Balances, Event, KycDataObject, MatchFields,
    Payment,
};
use crate::error::ClientError;

/// How a fetch treats a failure of the exchange.
///
/// Assertions want a broken endpoint to surface (`Propagate`); diagnostics
/// want a missing capability to read as "nothing to show" (`Absorb`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    Propagate,
    Absorb,
}

impl FailurePolicy {
    /// `Ok(None)` stands for an absorbed failure.
    pub fn handle<T>(self, result: Result<T, ClientError>) -> Result<Option<T>, ClientError> {
        match (self, result) {
            (_, Ok(value)) => Ok(Some(value)),
            (Self::Propagate, Err(err)) => Err(err),
            (Self::Absorb, Err(err)) => {
                debug!(error = %err, "absorbed failure");
                Ok(None)
            }
        }
    }
}

/// A remote account. The id never changes for the lifetime of the handle.
#[derive(Debug, Clone)]
pub struct AccountResource {
    client: RestClient,
    id: String,
    kyc_data: Option<KycDataObject>,
}

impl AccountResource {
    /// Bind an existing remote account id.
    pub fn bind(client: RestClient, id: impl Into<String>, kyc_data: Option<KycDataObject>) -> Self {
        Self {
            client,
            id: id.into(),
            kyc_data,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// KYC data the account was created with, if any.
    pub fn kyc_data(&self) -> Option<&KycDataObject> {
        self.kyc_data.as_ref()
    }

    pub fn client(&self) -> &RestClient {
        &self.client
    }

    /// Balance of `currency`, 0 when the account holds none.
    ///
    /// Calls `GET /accounts/{account_id}/balances`.
    pub async fn balance(&self, currency: &str) -> Result<u64, ClientError> {
        let balances = self.balances().await?;
        Ok(balances.get(currency).copied().unwrap_or(0))
    }

    /// All balances. Prefer `balance`, which handles absent currencies.
    pub async fn balances(&self) -> Result<Balances, ClientError> {
        self.client.get(&self.resources("balance")).await
    }

    /// Send `amount` of `currency` to `payee`.
    ///
    /// Calls `POST /accounts/{account_id}/payments`; only the payment id is
    /// taken from the response.
    pub async fn send_payment(
        &self,
        currency: &str,
        amount: u64,
        payee: &str,
    ) -> Result<Payment, ClientError> {
        let request = PaymentRequest {
            payee,
            currency,
            amount,
        };
        let created: CreatedResource = self.client.create(&self.resources("payment"), &request).await?;

        Ok(Payment {
            id: created.id,
            account_id: self.id.clone(),
            currency: currency.to_string(),
            amount,
            payee: payee.to_string(),
        })
    }

    /// Calls `POST /accounts/{account_id}/account_identifiers` (no body).
    pub async fn generate_account_identifier(&self) -> Result<String, ClientError> {
        let generated: GeneratedAccountIdentifier = self
            .client
            .create(&self.resources("account_identifier"), &serde_json::Map::new())
            .await?;
        Ok(generated.account_identifier)
    }

    /// Events from `start_index` on, in log order.
    ///
    /// Calls `GET /accounts/{account_id}/events`. Fails with the transport
    /// error when the server does not implement the endpoint.
    pub async fn events(&self, start_index: usize) -> Result<Vec<Event>, ClientError> {
        let events = self
            .events_with(start_index, FailurePolicy::Propagate)
            .await?;
        Ok(events.unwrap_or_default())
    }

    /// Events from `start_index` on, with the caller choosing how a failed
    /// fetch is treated. `Ok(None)` means the failure was absorbed.
    pub async fn events_with(
        &self,
        start_index: usize,
        policy: FailurePolicy,
    ) -> Result<Option<Vec<Event>>, ClientError> {
        let fetched = self.client.get::<Vec<Event>>(&self.resources("event")).await;
        let events = policy.handle(fetched)?;
        Ok(events.map(|events| events.into_iter().skip(start_index).collect()))
    }

    /// First event of `event_type` from `start_index` on whose JSON payload
    /// contains every entry of `match_fields`.
    ///
    /// `Ok(None)` means no such event; a failing events endpoint is an error,
    /// not an absent event.
    pub async fn find_event(
        &self,
        event_type: &str,
        start_index: usize,
        match_fields: &MatchFields,
    ) -> Result<Option<Event>, ClientError> {
        let events = self.events(start_index).await?;
        Ok(events
            .into_iter()
            .find(|event| event_matches(event, event_type, match_fields)))
    }

    /// All events as indented JSON, payloads decoded where possible.
    ///
    /// Returns an empty string when the events cannot be fetched for any
    /// reason.
    pub async fn dump_events(&self) -> String {
        match self.events_with(0, FailurePolicy::Absorb).await {
            Ok(Some(events)) => dump_events(&events),
            Ok(None) | Err(_) => String::new(),
        }
    }

    /// Log `dump_events` at INFO; nothing when it is empty.
    pub async fn log_events(&self) {
        let events = self.dump_events().await;
        if !events.is_empty() {
            info!(
                client = %self.client.name(),
                account_id = %self.id,
                "account({}) events: {}",
                self.id,
                events
            );
        }
    }

    /// `event` as JSON with its payload decoded when possible.
    pub fn event_as_value(&self, event: &Event) -> Value {
        event_as_value(event)
    }

    /// INFO record tagged with this account.
    pub fn info(&self, message: &str) {
        info!(client = %self.client.name(), account_id = %self.id, "{}", message);
    }

    fn resources(&self, resource: &str) -> String {
        format!("{}/{}/{}s", ACCOUNTS_PATH, self.id, resource)
    }
}
