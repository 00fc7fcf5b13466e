//! Payment — settles part of a registration; references it.

use serde::Deserialize;
use serde_json::json;

use super::raw::{flexible_string, opt_flexible_string, parse_as, require_nonblank};
use super::{EntityKind, LookupRef, SyncRecord};

#[derive(Debug, Deserialize)]
struct RawPayment {
    #[serde(deserialize_with = "flexible_string")]
    id: String,
    #[serde(deserialize_with = "flexible_string")]
    registration_id: String,
    #[serde(deserialize_with = "flexible_string")]
    amount: String,
    #[serde(default)]
    method: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default, deserialize_with = "opt_flexible_string")]
    paid_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PaymentRecord {
    pub external_id: String,
    pub registration_id: String,
    pub amount: String,
    pub method: Option<String>,
    pub status: Option<String>,
    pub paid_at: Option<String>,
}

impl SyncRecord for PaymentRecord {
    const KIND: EntityKind = EntityKind::Payment;

    fn parse(raw: &serde_json::Value) -> Result<Self, String> {
        let raw: RawPayment = parse_as(raw)?;
        Ok(Self {
            external_id: raw.id,
            registration_id: raw.registration_id,
            amount: raw.amount,
            method: raw.method,
            status: raw.status,
            paid_at: raw.paid_at,
        })
    }

    fn external_id(&self) -> &str {
        &self.external_id
    }

    fn validate(&self) -> Result<(), String> {
        require_nonblank("id", &self.external_id)?;
        require_nonblank("registration_id", &self.registration_id)?;
        require_nonblank("amount", &self.amount)
    }

    fn lookup_refs(&self) -> Vec<LookupRef> {
        vec![LookupRef::new(
            EntityKind::Registration,
            self.registration_id.clone(),
        )]
    }

    fn fingerprint_fields(&self) -> Vec<(&'static str, Option<String>)> {
        vec![
            ("registration_id", Some(self.registration_id.clone())),
            ("amount", Some(self.amount.clone())),
            ("method", self.method.clone()),
            ("status", self.status.clone()),
            ("paid_at", self.paid_at.clone()),
        ]
    }

    fn target_payload(&self) -> serde_json::Value {
        json!({
            "external_id": self.external_id,
            "registration_id": self.registration_id,
            "amount": self.amount,
            "method": self.method,
            "status": self.status,
            "paid_at": self.paid_at,
        })
    }
}
