//! 数据库写入重试
//!
//! 只针对瞬时错误（连接中断、死锁、SQLite BUSY）重试，唯一约束冲突等逻辑错误直接返回。

use std::future::Future;
use std::time::Duration;

use sea_orm::DbErr;
use sea_orm::error::RuntimeErr;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::config::DatabaseConfig;

/// 重试配置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 100,
            max_delay_ms: 2000,
        }
    }
}

impl From<&DatabaseConfig> for RetryConfig {
    fn from(config: &DatabaseConfig) -> Self {
        Self {
            max_retries: config.retry_count,
            base_delay_ms: config.retry_base_delay_ms,
            max_delay_ms: config.retry_max_delay_ms.max(config.retry_base_delay_ms),
        }
    }
}

/// 判断数据库错误是否可重试
pub fn is_retryable_error(err: &DbErr) -> bool {
    match err {
        DbErr::ConnectionAcquire(_) | DbErr::Conn(_) => true,
        DbErr::Exec(runtime_err) | DbErr::Query(runtime_err) => is_transient(runtime_err),
        _ => false,
    }
}

fn is_transient(err: &RuntimeErr) -> bool {
    match err {
        RuntimeErr::SqlxError(sqlx_err) => {
            if let Some(code) = sqlx_err
                .as_database_error()
                .and_then(|db_err| db_err.code())
            {
                // MySQL 1213/1205，PostgreSQL 40001/40P01，SQLite BUSY(5)/LOCKED(6)
                return matches!(code.as_ref(), "1213" | "1205" | "40001" | "40P01" | "5" | "6");
            }
            message_is_transient(&sqlx_err.to_string())
        }
        RuntimeErr::Internal(msg) => message_is_transient(msg),
        #[allow(unreachable_patterns)]
        _ => false,
    }
}

fn message_is_transient(message: &str) -> bool {
    let lower = message.to_lowercase();
    ["deadlock", "lock wait timeout", "database is locked", "serialization failure"]
        .iter()
        .any(|needle| lower.contains(needle))
}

/// 按指数退避执行 `operation`，直到成功、遇到不可重试错误或次数耗尽
pub async fn with_retry<T, F, Fut>(
    operation_name: &str,
    config: RetryConfig,
    mut operation: F,
) -> Result<T, DbErr>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, DbErr>>,
{
    let mut attempt = 0;
    loop {
        match operation().await {
            Ok(value) => {
                if attempt > 0 {
                    debug!("{} succeeded after {} retries", operation_name, attempt);
                }
                return Ok(value);
            }
            Err(e) if attempt < config.max_retries && is_retryable_error(&e) => {
                attempt += 1;
                let delay = calculate_backoff(attempt, config.base_delay_ms, config.max_delay_ms);
                warn!(
                    "{} failed (attempt {}/{}): {}; retrying in {} ms",
                    operation_name,
                    attempt,
                    config.max_retries + 1,
                    e,
                    delay
                );
                sleep(Duration::from_millis(delay)).await;
            }
            Err(e) => return Err(e),
        }
    }
}

/// 两阶段写入：`stage` 按 [`with_retry`] 重试，`commit` 只执行一次
///
/// 提交时的连接错误无法区分是否已落盘，重试会重复写入非幂等数据，
/// 所以提交失败直接返回。
pub async fn with_retry_before_commit<S, T, F, Fut, C, CFut>(
    operation_name: &str,
    config: RetryConfig,
    stage: F,
    commit: C,
) -> Result<T, DbErr>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<S, DbErr>>,
    C: FnOnce(S) -> CFut,
    CFut: Future<Output = Result<T, DbErr>>,
{
    let staged = with_retry(operation_name, config, stage).await?;
    commit(staged).await.inspect_err(|e| {
        warn!("{} failed at commit, not retried: {}", operation_name, e);
    })
}

/// 指数退避，附加 0-25% 抖动
fn calculate_backoff(attempt: u32, base_ms: u64, max_ms: u64) -> u64 {
    let exp_delay = base_ms.saturating_mul(2u64.saturating_pow(attempt.saturating_sub(1)));
    let capped = exp_delay.min(max_ms);
    let jitter = rand::random_range(0..=capped / 4);
    capped.saturating_add(jitter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast() -> RetryConfig {
        RetryConfig {
            max_retries: 2,
            base_delay_ms: 5,
            max_delay_ms: 20,
        }
    }

    #[test]
    fn test_transient_errors_are_retryable() {
        assert!(is_retryable_error(&DbErr::ConnectionAcquire(
            sea_orm::error::ConnAcquireErr::Timeout
        )));
        assert!(is_retryable_error(&DbErr::Exec(RuntimeErr::Internal(
            "database is locked".to_string()
        ))));
        assert!(is_retryable_error(&DbErr::Query(RuntimeErr::Internal(
            "Deadlock found when trying to get lock".to_string()
        ))));
    }

    #[test]
    fn test_logical_errors_are_not_retryable() {
        assert!(!is_retryable_error(&DbErr::RecordNotFound("x".into())));
        assert!(!is_retryable_error(&DbErr::Exec(RuntimeErr::Internal(
            "UNIQUE constraint failed: links.code".to_string()
        ))));
    }

    #[test]
    fn test_backoff_grows_and_caps() {
        assert!((100..=125).contains(&calculate_backoff(1, 100, 2000)));
        assert!((400..=500).contains(&calculate_backoff(3, 100, 2000)));
        assert!((2000..=2500).contains(&calculate_backoff(12, 100, 2000)));
    }

    #[test]
    fn test_from_database_config() {
        let db = DatabaseConfig {
            retry_count: 7,
            retry_base_delay_ms: 50,
            retry_max_delay_ms: 10,
            ..Default::default()
        };
        let retry = RetryConfig::from(&db);
        assert_eq!(retry.max_retries, 7);
        // max 不小于 base
        assert_eq!(retry.max_delay_ms, 50);
    }

    #[tokio::test]
    async fn test_with_retry_recovers_from_transient_failure() {
        let calls = AtomicU32::new(0);
        let result = with_retry("op", fast(), || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n == 0 {
                    Err(DbErr::ConnectionAcquire(
                        sea_orm::error::ConnAcquireErr::Timeout,
                    ))
                } else {
                    Ok(n)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_with_retry_gives_up() {
        let calls = AtomicU32::new(0);
        let result: Result<(), DbErr> = with_retry("op", fast(), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(DbErr::Conn(RuntimeErr::Internal("gone".into()))) }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_with_retry_does_not_retry_logical_error() {
        let calls = AtomicU32::new(0);
        let result: Result<(), DbErr> = with_retry("op", fast(), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(DbErr::RecordNotFound("x".into())) }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_commit_failure_is_not_retried() {
        let stages = AtomicU32::new(0);
        let commits = AtomicU32::new(0);

        let result: Result<(), DbErr> = with_retry_before_commit(
            "two_phase",
            fast(),
            || {
                let n = stages.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n == 0 {
                        Err(DbErr::Exec(RuntimeErr::Internal("database is locked".into())))
                    } else {
                        Ok(n)
                    }
                }
            },
            |staged| {
                commits.fetch_add(1, Ordering::SeqCst);
                async move {
                    assert_eq!(staged, 1);
                    // 瞬时错误，但发生在提交阶段
                    Err(DbErr::Conn(RuntimeErr::Internal("connection reset".into())))
                }
            },
        )
        .await;

        assert!(result.is_err());
        assert_eq!(stages.load(Ordering::SeqCst), 2);
        assert_eq!(commits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_commit_receives_staged_value() {
        let result = with_retry_before_commit(
            "two_phase",
            fast(),
            || async { Ok::<_, DbErr>(20) },
            |staged| async move { Ok::<_, DbErr>(staged + 1) },
        )
        .await;
        assert_eq!(result.unwrap(), 21);
    }
}
