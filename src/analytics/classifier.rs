//! User-Agent 分类
//!
//! 只做大小写不敏感的子串匹配，不解析版本号。

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter};

/// 操作系统分类，声明顺序即输出顺序
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    AsRefStr,
    EnumIter,
)]
pub enum OsCategory {
    Windows,
    #[serde(rename = "macOS")]
    #[strum(serialize = "macOS")]
    MacOs,
    Linux,
    Android,
    #[serde(rename = "iOS")]
    #[strum(serialize = "iOS")]
    Ios,
    Unknown,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    AsRefStr,
    EnumIter,
)]
pub enum DeviceCategory {
    Mobile,
    Desktop,
}

// 优先级固定，先命中先返回
const OS_RULES: &[(&[&str], OsCategory)] = &[
    (&["windows"], OsCategory::Windows),
    (&["mac"], OsCategory::MacOs),
    (&["linux"], OsCategory::Linux),
    (&["android"], OsCategory::Android),
    (&["iphone", "ipad", "ipod"], OsCategory::Ios),
];

pub fn classify_os(agent: Option<&str>) -> OsCategory {
    let Some(agent) = agent.filter(|a| !a.is_empty()) else {
        return OsCategory::Unknown;
    };
    let lower = agent.to_ascii_lowercase();

    OS_RULES
        .iter()
        .find(|(needles, _)| needles.iter().any(|n| lower.contains(n)))
        .map(|(_, os)| *os)
        .unwrap_or(OsCategory::Unknown)
}

pub fn classify_device(agent: Option<&str>) -> DeviceCategory {
    match agent {
        Some(agent) if agent.to_ascii_lowercase().contains("mobile") => DeviceCategory::Mobile,
        _ => DeviceCategory::Desktop,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    const IPHONE: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.0 Mobile/15E148 Safari/604.1";
    const PIXEL: &str = "Mozilla/5.0 (Linux; Android 14; Pixel 8) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Mobile Safari/537.36";

    #[test]
    fn test_classify_os_basic() {
        assert_eq!(
            classify_os(Some("Mozilla/5.0 (Windows NT 10.0; Win64; x64)")),
            OsCategory::Windows
        );
        assert_eq!(
            classify_os(Some("Mozilla/5.0 (Macintosh; Intel Mac OS X 14_0)")),
            OsCategory::MacOs
        );
        assert_eq!(
            classify_os(Some("Mozilla/5.0 (X11; Ubuntu; Linux x86_64)")),
            OsCategory::Linux
        );
        assert_eq!(classify_os(Some("IPAD")), OsCategory::Ios);
    }

    #[test]
    fn test_classify_os_empty_or_absent() {
        assert_eq!(classify_os(None), OsCategory::Unknown);
        assert_eq!(classify_os(Some("")), OsCategory::Unknown);
        assert_eq!(classify_os(Some("curl/8.4.0")), OsCategory::Unknown);
    }

    #[test]
    fn test_classify_os_priority_order() {
        // 真实 iPhone UA 含 "like Mac OS X"，按固定优先级归为 macOS
        assert_eq!(classify_os(Some(IPHONE)), OsCategory::MacOs);
        // Android UA 含 "Linux"，归为 Linux
        assert_eq!(classify_os(Some(PIXEL)), OsCategory::Linux);
    }

    #[test]
    fn test_classify_device() {
        assert_eq!(classify_device(Some(IPHONE)), DeviceCategory::Mobile);
        assert_eq!(classify_device(Some(PIXEL)), DeviceCategory::Mobile);
        assert_eq!(
            classify_device(Some("Mozilla/5.0 (Windows NT 10.0)")),
            DeviceCategory::Desktop
        );
        assert_eq!(classify_device(None), DeviceCategory::Desktop);
    }

    #[test]
    fn test_category_names() {
        let names: Vec<String> = OsCategory::iter().map(|c| c.to_string()).collect();
        assert_eq!(
            names,
            ["Windows", "macOS", "Linux", "Android", "iOS", "Unknown"]
        );
        assert_eq!(
            serde_json::to_string(&OsCategory::Ios).unwrap(),
            "\"iOS\""
        );
        assert_eq!(DeviceCategory::Mobile.as_ref(), "Mobile");
    }
}
