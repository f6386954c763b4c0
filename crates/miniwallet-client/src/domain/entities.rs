//! Miniwallet resources as seen by the client.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Balances by currency code, amounts in minor units.
pub type Balances = BTreeMap<String, u64>;

/// A payment accepted by the server. Only `id` comes from the server response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub id: String,
    pub account_id: String,
    pub currency: String,
    pub amount: u64,
    pub payee: String,
}

/// One entry of an account's append-only event log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    #[serde(default)]
    pub account_id: String,
    #[serde(rename = "type")]
    pub event_type: String,
    /// JSON-encoded payload
    pub data: String,
    #[serde(default)]
    pub timestamp: u64,
}

impl Event {
    /// Decodes the payload; `None` when it is not valid JSON.
    pub fn decoded_data(&self) -> Option<Value> {
        serde_json::from_str(&self.data).ok()
    }
}

/// Off-chain KYC data. The schema belongs to the server; the client only
/// carries it around, so everything beyond the discriminator is kept as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KycDataObject {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default = "default_payload_version")]
    pub payload_version: u32,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

fn default_payload_version() -> u32 {
    1
}

impl KycDataObject {
    pub fn individual() -> Self {
        Self {
            kind: "individual".to_string(),
            payload_version: default_payload_version(),
            fields: Map::new(),
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }
}

/// Sample KYC payloads served by `/kyc_sample` for test fixtures. Each entry
/// is a JSON-encoded `KycDataObject` steering a different server behaviour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KycSample {
    pub minimum: String,
    pub reject: String,
    pub soft_match: String,
    pub soft_reject: String,
}

/// Fields of an account creation request.
///
/// | Field | Sent when |
/// |---|---|
/// | `balances` | `Some` and non-empty (zero amounts inside it are sent) |
/// | `kyc_data` | `Some` |
/// | `reject_additional_kyc_data_request` | `true` |
/// | `disable_background_tasks` | `true` |
///
/// The server defaults both flags to `false`, so omitting a `false` flag
/// changes nothing.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NewAccount {
    #[serde(skip_serializing_if = "balances_absent")]
    pub balances: Option<Balances>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kyc_data: Option<KycDataObject>,
    #[serde(skip_serializing_if = "is_false")]
    pub reject_additional_kyc_data_request: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub disable_background_tasks: bool,
}

impl NewAccount {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn balances<I, K>(mut self, balances: I) -> Self
    where
        I: IntoIterator<Item = (K, u64)>,
        K: Into<String>,
    {
        self.balances = Some(balances.into_iter().map(|(k, v)| (k.into(), v)).collect());
        self
    }

    pub fn kyc_data(mut self, kyc_data: KycDataObject) -> Self {
        self.kyc_data = Some(kyc_data);
        self
    }

    pub fn reject_additional_kyc_data_request(mut self, reject: bool) -> Self {
        self.reject_additional_kyc_data_request = reject;
        self
    }

    pub fn disable_background_tasks(mut self, disable: bool) -> Self {
        self.disable_background_tasks = disable;
        self
    }
}

fn balances_absent(balances: &Option<Balances>) -> bool {
    balances.as_ref().map_or(true, BTreeMap::is_empty)
}

fn is_false(flag: &bool) -> bool {
    !*flag
}

/// Body of a payment request.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct PaymentRequest<'a> {
    pub payee: &'a str,
    pub currency: &'a str,
    pub amount: u64,
}

/// Response carrying the id of a newly created resource.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct CreatedResource {
    pub id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct GeneratedAccountIdentifier {
    pub account_identifier: String,
}
