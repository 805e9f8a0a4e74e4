use nbpdash_core::types::{ConnectionStatus, Locale, ServiceStatus};

/// Every piece of user-facing text the dashboard renders, for one locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Labels {
    pub ok: &'static str,
    pub warning: &'static str,
    pub error: &'static str,
    pub unknown: &'static str,
    pub connected: &'static str,
    pub disconnected: &'static str,
    pub type_prefix: &'static str,
    pub status_prefix: &'static str,
    pub last_update_prefix: &'static str,
    pub title: &'static str,
    pub detail_title: &'static str,
}

const KO: Labels = Labels {
    ok: "정상",
    warning: "경고",
    error: "오류",
    unknown: "알 수 없음",
    connected: "연결됨",
    disconnected: "연결 끊김",
    type_prefix: "타입",
    status_prefix: "상태",
    last_update_prefix: "마지막 업데이트",
    title: "NBP/DR 모니터링",
    detail_title: "서비스 상세",
};

const EN: Labels = Labels {
    ok: "OK",
    warning: "Warning",
    error: "Error",
    unknown: "Unknown",
    connected: "Connected",
    disconnected: "Disconnected",
    type_prefix: "Type",
    status_prefix: "Status",
    last_update_prefix: "Last update",
    title: "NBP/DR Monitoring",
    detail_title: "Service detail",
};

impl Labels {
    pub fn for_locale(locale: Locale) -> &'static Labels {
        match locale {
            Locale::Ko => &KO,
            Locale::En => &EN,
        }
    }

    pub fn status(&self, status: ServiceStatus) -> &'static str {
        match status {
            ServiceStatus::Ok => self.ok,
            ServiceStatus::Warning => self.warning,
            ServiceStatus::Error => self.error,
            ServiceStatus::Unknown => self.unknown,
        }
    }

    pub fn connection(&self, status: ConnectionStatus) -> &'static str {
        match status {
            ConnectionStatus::Healthy => self.connected,
            ConnectionStatus::Unhealthy => self.disconnected,
        }
    }
}

/// Shown in place of a ratio the backend did not send as a number.
pub const MISSING_RATIO: &str = "-";

/// Format a ratio exactly as received: `80.0` shows as `80`, `12.5` as `12.5`.
pub fn format_ratio(value: Option<f64>) -> String {
    match value {
        Some(value) => format!("{value}"),
        None => MISSING_RATIO.to_string(),
    }
}
