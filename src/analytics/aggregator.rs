//! 单遍点击聚合
//!
//! 每个事件只访问一次，同时更新总量、访客集合、7 天序列以及 OS/设备分布。
//! 访客按 `address` 原始值去重，缺失地址视为同一个值。

use std::collections::{BTreeMap, HashSet};

use chrono::{Local, NaiveDate};
use serde::Serialize;

use super::classifier::{DeviceCategory, OsCategory, classify_device, classify_os};
use crate::storage::{ClickEvent, Link};

/// 日期序列长度：今天及之前 6 天
pub const WINDOW_DAYS: usize = 7;

/// 聚合器的本地日历“今天”
pub fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DateBucket {
    pub date: NaiveDate,
    pub click_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OsStats {
    pub os_name: OsCategory,
    pub unique_clicks: u64,
    pub unique_visitors: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceStats {
    pub device_name: DeviceCategory,
    pub unique_clicks: u64,
    pub unique_visitors: u64,
}

/// 一组事件的汇总结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClickSummary {
    pub total_clicks: u64,
    pub unique_visitors: u64,
    pub clicks_by_date: Vec<DateBucket>,
    pub os_breakdown: Vec<OsStats>,
    pub device_breakdown: Vec<DeviceStats>,
}

/// topic/owner 范围内的单链接明细
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkClickStats {
    pub code: String,
    pub total_clicks: u64,
    pub unique_visitors: u64,
}

#[derive(Default)]
struct VisitorTally<'a> {
    clicks: u64,
    visitors: HashSet<Option<&'a str>>,
}

impl<'a> VisitorTally<'a> {
    fn record(&mut self, address: Option<&'a str>) {
        self.clicks += 1;
        self.visitors.insert(address);
    }

    fn unique(&self) -> u64 {
        self.visitors.len() as u64
    }
}

/// 借用事件数据的累加器，生命周期不超过被聚合的链接
pub struct ClickAccumulator<'a> {
    today: NaiveDate,
    overall: VisitorTally<'a>,
    daily: [u64; WINDOW_DAYS],
    by_os: BTreeMap<OsCategory, VisitorTally<'a>>,
    by_device: BTreeMap<DeviceCategory, VisitorTally<'a>>,
}

impl<'a> ClickAccumulator<'a> {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today,
            overall: VisitorTally::default(),
            daily: [0; WINDOW_DAYS],
            by_os: BTreeMap::new(),
            by_device: BTreeMap::new(),
        }
    }

    pub fn push(&mut self, event: &'a ClickEvent) {
        let address = event.address.as_deref();
        let agent = event.agent.as_deref();

        self.overall.record(address);

        let day = event.timestamp.with_timezone(&Local).date_naive();
        let days_ago = (self.today - day).num_days();
        if (0..WINDOW_DAYS as i64).contains(&days_ago) {
            self.daily[WINDOW_DAYS - 1 - days_ago as usize] += 1;
        }

        self.by_os
            .entry(classify_os(agent))
            .or_default()
            .record(address);
        self.by_device
            .entry(classify_device(agent))
            .or_default()
            .record(address);
    }

    pub fn finish(self) -> ClickSummary {
        let first_day = self.today - chrono::Days::new(WINDOW_DAYS as u64 - 1);
        let clicks_by_date = first_day
            .iter_days()
            .zip(self.daily)
            .map(|(date, click_count)| DateBucket { date, click_count })
            .collect();

        // BTreeMap 按枚举声明顺序迭代；未出现的分类本就不在表中
        let os_breakdown = self
            .by_os
            .iter()
            .map(|(os, tally)| OsStats {
                os_name: *os,
                unique_clicks: tally.clicks,
                unique_visitors: tally.unique(),
            })
            .collect();
        let device_breakdown = self
            .by_device
            .iter()
            .map(|(device, tally)| DeviceStats {
                device_name: *device,
                unique_clicks: tally.clicks,
                unique_visitors: tally.unique(),
            })
            .collect();

        ClickSummary {
            total_clicks: self.overall.clicks,
            unique_visitors: self.overall.unique(),
            clicks_by_date,
            os_breakdown,
            device_breakdown,
        }
    }
}

pub fn summarize_events<'a, I>(events: I, today: NaiveDate) -> ClickSummary
where
    I: IntoIterator<Item = &'a ClickEvent>,
{
    let mut acc = ClickAccumulator::new(today);
    for event in events {
        acc.push(event);
    }
    acc.finish()
}

/// 对多条链接做并集汇总，同时产出每条链接的明细
pub fn summarize_links(links: &[Link], today: NaiveDate) -> (ClickSummary, Vec<LinkClickStats>) {
    let mut acc = ClickAccumulator::new(today);
    let mut per_link = Vec::with_capacity(links.len());

    for link in links {
        let mut tally = VisitorTally::default();
        for event in &link.events {
            tally.record(event.address.as_deref());
            acc.push(event);
        }
        per_link.push(LinkClickStats {
            code: link.code.clone(),
            total_clicks: tally.clicks,
            unique_visitors: tally.unique(),
        });
    }

    (acc.finish(), per_link)
}
