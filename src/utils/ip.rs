//! 客户端地址提取
//!
//! 只有当连接方是可信代理时才采信转发头：
//! - 配置了 `trusted_proxies`：连接 IP 命中其中一项（单 IP 或 CIDR）
//! - 未配置：连接来自私有网段或回环地址

use std::net::{IpAddr, SocketAddr};

use actix_web::HttpRequest;
use actix_web::http::header::HeaderMap;
use tracing::trace;

/// 解析 `ip` 或 `ip:port`
pub fn parse_peer_ip(peer: &str) -> Option<IpAddr> {
    peer.parse::<SocketAddr>()
        .map(|addr| addr.ip())
        .or_else(|_| peer.parse::<IpAddr>())
        .ok()
}

/// 私有网段、回环、IPv6 ULA (fc00::/7) 与链路本地 (fe80::/10)
pub fn is_private_or_local(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => v4.is_private() || v4.is_loopback(),
        IpAddr::V6(v6) => {
            let head = v6.segments()[0];
            v6.is_loopback() || (head & 0xfe00) == 0xfc00 || (head & 0xffc0) == 0xfe80
        }
    }
}

/// CIDR 匹配，协议族不同视为不匹配
pub fn ip_in_cidr(ip: &IpAddr, cidr: &str) -> bool {
    let Some((network, prefix)) = cidr.split_once('/') else {
        return false;
    };
    let (Ok(network), Ok(prefix)) = (network.parse::<IpAddr>(), prefix.parse::<u32>()) else {
        return false;
    };

    match (ip, network) {
        (IpAddr::V4(ip), IpAddr::V4(net)) if prefix <= 32 => {
            let mask = u32::MAX.checked_shl(32 - prefix).unwrap_or(0);
            (u32::from(*ip) & mask) == (u32::from(net) & mask)
        }
        (IpAddr::V6(ip), IpAddr::V6(net)) if prefix <= 128 => {
            let mask = u128::MAX.checked_shl(128 - prefix).unwrap_or(0);
            (u128::from(*ip) & mask) == (u128::from(net) & mask)
        }
        _ => false,
    }
}

pub fn is_trusted_proxy(ip: &IpAddr, trusted_proxies: &[String]) -> bool {
    trusted_proxies.iter().any(|entry| {
        if entry.contains('/') {
            ip_in_cidr(ip, entry)
        } else {
            entry.parse::<IpAddr>().is_ok_and(|proxy| proxy == *ip)
        }
    })
}

/// X-Forwarded-For 第一跳，其次 X-Real-IP
pub fn forwarded_ip_from_headers(headers: &HeaderMap) -> Option<String> {
    let first_hop = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty());

    let real_ip = || {
        headers
            .get("x-real-ip")
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    };

    first_hop.or_else(real_ip).map(String::from)
}

/// 根据连接地址和请求头决定客户端地址；两者都不可用时返回 None
pub fn resolve_client_ip(
    peer: Option<&str>,
    headers: &HeaderMap,
    trusted_proxies: &[String],
) -> Option<String> {
    let Some(peer) = peer else {
        return forwarded_ip_from_headers(headers);
    };
    let peer_ip = parse_peer_ip(peer);

    let trust_headers = match &peer_ip {
        Some(ip) if !trusted_proxies.is_empty() => is_trusted_proxy(ip, trusted_proxies),
        Some(ip) => is_private_or_local(ip),
        None => false,
    };

    let peer_string = || peer_ip.map(|ip| ip.to_string()).unwrap_or_else(|| peer.to_string());

    if trust_headers && let Some(forwarded) = forwarded_ip_from_headers(headers) {
        trace!("Client address {} via proxy {}", forwarded, peer);
        return Some(forwarded);
    }
    Some(peer_string())
}

pub fn extract_client_ip(req: &HttpRequest, trusted_proxies: &[String]) -> Option<String> {
    let peer = req.peer_addr().map(|addr| addr.to_string());
    resolve_client_ip(peer.as_deref(), req.headers(), trusted_proxies)
}
