use crate::storage::{ClickEvent, GeoLocation, Link};
use migration::entities::{click_event, short_link};

/// 将 links 行与其点击事件组装为 `Link`
///
/// `events` 需已按插入顺序（id 升序）排列。
pub fn model_to_link(model: short_link::Model, events: Vec<ClickEvent>) -> Link {
    Link {
        code: model.code,
        target: model.target_url,
        is_custom_alias: model.is_custom_alias,
        topic: model.topic,
        owner: model.owner,
        click_count: model.click_count.max(0) as u64,
        created_at: model.created_at,
        events,
    }
}

/// 新链接的 ActiveModel（只用于插入）
pub fn link_to_active_model(link: &Link) -> short_link::ActiveModel {
    use sea_orm::ActiveValue::Set;

    short_link::ActiveModel {
        code: Set(link.code.clone()),
        target_url: Set(link.target.clone()),
        is_custom_alias: Set(link.is_custom_alias),
        topic: Set(link.topic.clone()),
        owner: Set(link.owner.clone()),
        click_count: Set(link.click_count as i64),
        created_at: Set(link.created_at),
    }
}

pub fn model_to_click_event(model: click_event::Model) -> ClickEvent {
    let location = if model.country.is_some() || model.city.is_some() {
        Some(GeoLocation {
            country: model.country,
            city: model.city,
        })
    } else {
        None
    };

    ClickEvent {
        timestamp: model.clicked_at,
        agent: model.user_agent,
        address: model.ip_address,
        location,
    }
}

/// id 交给数据库自增
pub fn click_event_to_active_model(code: &str, event: &ClickEvent) -> click_event::ActiveModel {
    use sea_orm::ActiveValue::{NotSet, Set};

    let (country, city) = match &event.location {
        Some(loc) => (loc.country.clone(), loc.city.clone()),
        None => (None, None),
    };

    click_event::ActiveModel {
        id: NotSet,
        link_code: Set(code.to_string()),
        clicked_at: Set(event.timestamp),
        user_agent: Set(event.agent.clone()),
        ip_address: Set(event.address.clone()),
        country: Set(country),
        city: Set(city),
    }
}
