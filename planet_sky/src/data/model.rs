// Chain-agnostic block and transaction records.
// Alloy-specific types stay in evm.rs; conversion happens there.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// An already-fetched block: the sole input of a render besides the modifiers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<u64>,
    pub hash: String,
    #[serde(deserialize_with = "de_u64", serialize_with = "ser_hex")]
    pub gas_limit: u64,
    #[serde(deserialize_with = "de_u64", serialize_with = "ser_hex")]
    pub gas_used: u64,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

/// The three transaction fields the scene cares about.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    #[serde(deserialize_with = "de_u128", serialize_with = "ser_hex")]
    pub value: u128,
    /// `0x` plus the 4-byte call signature, if the transaction carried data.
    #[serde(default, alias = "data")]
    pub data_prefix: Option<String>,
    #[serde(default, deserialize_with = "de_lenient_address")]
    pub to: Option<String>,
}

impl Transaction {
    pub fn new(value: u128) -> Self {
        Self {
            value,
            ..Default::default()
        }
    }

    pub fn with_data(mut self, data: impl Into<String>) -> Self {
        self.data_prefix = Some(data.into());
        self
    }

    pub fn with_to(mut self, to: impl Into<String>) -> Self {
        self.to = Some(to.into());
        self
    }

    /// Call signature normalized to `0x` + 8 lowercase hex digits, or empty.
    pub fn signature(&self) -> String {
        self.data_prefix
            .as_deref()
            .map(|data| data.chars().take(10).collect::<String>().to_lowercase())
            .unwrap_or_default()
    }

    /// Lowercased recipient; contract creations and malformed values become empty.
    pub fn recipient(&self) -> String {
        self.to
            .as_deref()
            .map(str::to_lowercase)
            .unwrap_or_default()
    }
}

/// Parses a JSON quantity: a plain number, a decimal string, or a `0x` hex string.
fn parse_quantity(raw: &serde_json::Value) -> Result<u128, String> {
    match raw {
        serde_json::Value::Number(n) => n
            .as_u64()
            .map(u128::from)
            .ok_or_else(|| format!("quantity {n} is not a non-negative integer")),
        serde_json::Value::String(s) => {
            let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
                Some("") => Ok(0),
                Some(hex) => u128::from_str_radix(hex, 16),
                None => s.parse::<u128>(),
            };
            parsed.map_err(|err| format!("quantity {s:?}: {err}"))
        }
        serde_json::Value::Object(map) => match map.get("hex") {
            // ethers-style `{ "type": "BigNumber", "hex": "0x..." }`
            Some(inner) => parse_quantity(inner),
            None => Err("quantity object without a `hex` field".to_string()),
        },
        other => Err(format!("unexpected quantity {other}")),
    }
}

fn de_u128<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u128, D::Error> {
    let raw = serde_json::Value::deserialize(deserializer)?;
    parse_quantity(&raw).map_err(serde::de::Error::custom)
}

fn de_u64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    let value = de_u128(deserializer)?;
    u64::try_from(value).map_err(serde::de::Error::custom)
}

/// Anything but a string (null, numbers, objects) reads as "no recipient".
fn de_lenient_address<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(Some(s)),
        _ => Ok(None),
    }
}

fn ser_hex<S: Serializer, T: Into<u128> + Copy>(value: &T, serializer: S) -> Result<S::Ok, S::Error> {
    let wide: u128 = (*value).into();
    serializer.serialize_str(&format!("{wide:#x}"))
}
