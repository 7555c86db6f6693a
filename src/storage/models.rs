use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 一条短链接注册记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub code: String,
    pub target: String,
    /// 短码是否由调用方指定
    #[serde(default)]
    pub is_custom_alias: bool,
    #[serde(default)]
    pub topic: Option<String>,
    pub owner: String,
    /// 与 `events.len()` 保持一致，只由点击记录修改
    #[serde(default)]
    pub click_count: u64,
    pub created_at: DateTime<Utc>,
    /// 按写入顺序排列，只追加
    #[serde(default)]
    pub events: Vec<ClickEvent>,
}

impl Link {
    /// 新建尚无点击的链接，`created_at` 取当前时间
    pub fn new(
        code: impl Into<String>,
        target: impl Into<String>,
        owner: impl Into<String>,
        topic: Option<String>,
        is_custom_alias: bool,
    ) -> Self {
        Self {
            code: code.into(),
            target: target.into(),
            is_custom_alias,
            topic,
            owner: owner.into(),
            click_count: 0,
            created_at: Utc::now(),
            events: Vec::new(),
        }
    }
}

/// 一次成功解析（重定向）的记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClickEvent {
    pub timestamp: DateTime<Utc>,
    /// 原始 User-Agent
    #[serde(default)]
    pub agent: Option<String>,
    /// 客户端网络地址
    #[serde(default)]
    pub address: Option<String>,
    /// 预留字段，聚合时不使用
    #[serde(default)]
    pub location: Option<GeoLocation>,
}

impl ClickEvent {
    pub fn new(agent: Option<String>, address: Option<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            agent,
            address,
            location: None,
        }
    }

    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeoLocation {
    pub country: Option<String>,
    pub city: Option<String>,
}
