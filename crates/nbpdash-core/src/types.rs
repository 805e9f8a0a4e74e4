use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Identity of a monitored service.
///
/// The API is not consistent about whether ids are JSON numbers or strings, so
/// both are accepted and kept in their textual form. `1` and `"1"` compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ServiceId(String);

impl ServiceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ServiceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ServiceId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ServiceId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<u64> for ServiceId {
    fn from(n: u64) -> Self {
        Self(n.to_string())
    }
}

impl Serialize for ServiceId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ServiceId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Number(serde_json::Number),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(s) => ServiceId(s),
            RawId::Number(n) => ServiceId(n.to_string()),
        })
    }
}

/// Health of a monitored service as reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    Ok,
    Warning,
    Error,
    #[default]
    Unknown,
}

impl ServiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceStatus::Ok => "ok",
            ServiceStatus::Warning => "warning",
            ServiceStatus::Error => "error",
            ServiceStatus::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// Anything other than the three known strings (including null or a number) is Unknown.
impl<'de> Deserialize<'de> for ServiceStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = serde_json::Value::deserialize(deserializer)?;
        Ok(match raw.as_str() {
            Some("ok") => ServiceStatus::Ok,
            Some("warning") => ServiceStatus::Warning,
            Some("error") => ServiceStatus::Error,
            _ => ServiceStatus::Unknown,
        })
    }
}

/// One entry of `GET /api/services`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: ServiceId,
    #[serde(default)]
    pub name: String,
    /// Monitoring type, e.g. "L4" or "GLB".
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Share of traffic routed to NBP, in percent. Not range-checked; `None`
    /// when the backend sent nothing usable.
    #[serde(default, deserialize_with = "lenient_ratio")]
    pub nbp_ratio: Option<f64>,
    /// Share of traffic routed to DR, in percent. Not range-checked.
    #[serde(default, deserialize_with = "lenient_ratio")]
    pub dr_ratio: Option<f64>,
    #[serde(default)]
    pub status: ServiceStatus,
}

// A bad ratio on one service must not reject the whole list.
fn lenient_ratio<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    let raw = serde_json::Value::deserialize(deserializer)?;
    Ok(match raw {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

/// Payload of `GET /api/services/{id}/ratio`. The backend has not fixed a schema
/// for it yet, so it is carried as raw JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RatioDetail(pub serde_json::Value);

impl RatioDetail {
    pub fn pretty(&self) -> String {
        serde_json::to_string_pretty(&self.0).unwrap_or_else(|_| self.0.to_string())
    }
}

/// The dashboard's own link to the backend, derived from the last list fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    Healthy,
    #[default]
    Unhealthy,
}

impl ConnectionStatus {
    pub fn from_outcome(success: bool) -> Self {
        if success {
            ConnectionStatus::Healthy
        } else {
            ConnectionStatus::Unhealthy
        }
    }

    pub fn is_healthy(&self) -> bool {
        matches!(self, ConnectionStatus::Healthy)
    }
}

/// Language used for every label the dashboard renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Ko,
    En,
}
