//! 连接与存储配置
//!
//! 可通过 `bon` 构建器在代码中组装，也可从 `MONGODB_*` 环境变量读取。
//!
use bon::Builder;
use eventsource_domain::error::{StoreError, StoreResult};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr, time::Duration};

pub const ENV_SERVER: &str = "MONGODB_SERVER";
pub const ENV_REPLICA_SET: &str = "MONGODB_REPLICASET_NAME";
pub const ENV_USERNAME: &str = "MONGODB_USERNAME";
pub const ENV_PASSWORD: &str = "MONGODB_PASSWORD";
pub const ENV_DATABASE: &str = "MONGODB_DATABASE";
pub const ENV_AUTH_SOURCE: &str = "MONGODB_AUTH_SOURCE";
pub const ENV_TLS: &str = "MONGODB_TLS";
pub const ENV_TLS_INSECURE: &str = "MONGODB_TLS_INSECURE";
pub const ENV_TIMEOUT_MS: &str = "MONGODB_TIMEOUT_MS";
pub const ENV_SAVE_MODE: &str = "MONGODB_SAVE_MODE";

/// 写入策略
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaveMode {
    /// 先按 `_id` 计数探测文档是否存在，再插入或整体替换 `records`（两次往返，存在竞态）
    CheckThenWrite,
    /// 单次 `replace_one(upsert = true)`，由服务端保证单文档原子性
    #[default]
    Upsert,
}

impl fmt::Display for SaveMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SaveMode::CheckThenWrite => write!(f, "check_then_write"),
            SaveMode::Upsert => write!(f, "upsert"),
        }
    }
}

impl FromStr for SaveMode {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "check_then_write" | "check-then-write" => Ok(SaveMode::CheckThenWrite),
            "upsert" => Ok(SaveMode::Upsert),
            other => Err(StoreError::Config {
                reason: format!("unknown save mode: {other}"),
            }),
        }
    }
}

fn default_tls() -> bool {
    true
}

/// MongoDB 连接配置
#[derive(Clone, Builder, Serialize, Deserialize)]
pub struct MongoConfig {
    /// 逗号分隔的主机列表，如 `db1:27017,db2:27017`
    #[builder(into)]
    hosts: String,
    #[builder(into)]
    replica_set: Option<String>,
    #[builder(into)]
    username: String,
    #[builder(into)]
    #[serde(skip_serializing)]
    password: String,
    #[builder(into)]
    database: String,
    /// 认证库，缺省时与用户名相同
    #[builder(into)]
    auth_source: Option<String>,
    #[builder(default = true)]
    #[serde(default = "default_tls")]
    tls: bool,
    #[builder(default)]
    #[serde(default)]
    tls_allow_invalid_certificates: bool,
    /// 单次 save/load 的截止时间（毫秒），覆盖该操作内的全部往返
    operation_timeout_ms: Option<u64>,
    #[builder(default)]
    #[serde(default)]
    save_mode: SaveMode,
}

impl MongoConfig {
    /// 从进程环境变量读取配置
    pub fn from_env() -> StoreResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 通过任意键值查找函数读取配置，空字符串视为未设置
    pub fn from_lookup<F>(lookup: F) -> StoreResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let require = |key: &str| {
            get(key).ok_or_else(|| StoreError::Config {
                reason: format!("missing environment variable {key}"),
            })
        };

        let operation_timeout_ms = get(ENV_TIMEOUT_MS)
            .map(|raw| {
                match raw.trim().parse::<u64>() {
                    Ok(0) => Err(StoreError::Config {
                        reason: format!("{ENV_TIMEOUT_MS}=0: timeout must be positive"),
                    }),
                    Ok(ms) => Ok(ms),
                    Err(err) => Err(StoreError::Config {
                        reason: format!("{ENV_TIMEOUT_MS}={raw}: {err}"),
                    }),
                }
            })
            .transpose()?;

        Ok(Self {
            hosts: require(ENV_SERVER)?,
            replica_set: get(ENV_REPLICA_SET),
            username: require(ENV_USERNAME)?,
            password: require(ENV_PASSWORD)?,
            database: require(ENV_DATABASE)?,
            auth_source: get(ENV_AUTH_SOURCE),
            tls: get(ENV_TLS)
                .map(|raw| parse_flag(ENV_TLS, &raw))
                .transpose()?
                .unwrap_or(true),
            tls_allow_invalid_certificates: get(ENV_TLS_INSECURE)
                .map(|raw| parse_flag(ENV_TLS_INSECURE, &raw))
                .transpose()?
                .unwrap_or(false),
            operation_timeout_ms,
            save_mode: get(ENV_SAVE_MODE)
                .map(|raw| raw.parse::<SaveMode>())
                .transpose()?
                .unwrap_or_default(),
        })
    }

    /// 拆分后的主机列表（去除空白与空项）
    pub fn hosts(&self) -> Vec<&str> {
        self.hosts
            .split(',')
            .map(str::trim)
            .filter(|host| !host.is_empty())
            .collect()
    }

    pub fn replica_set(&self) -> Option<&str> {
        self.replica_set.as_deref().filter(|name| !name.is_empty())
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    pub fn auth_source(&self) -> &str {
        self.auth_source.as_deref().unwrap_or(&self.username)
    }

    pub fn tls(&self) -> bool {
        self.tls
    }

    pub fn tls_allow_invalid_certificates(&self) -> bool {
        self.tls_allow_invalid_certificates
    }

    pub fn operation_timeout(&self) -> Option<Duration> {
        self.operation_timeout_ms.map(Duration::from_millis)
    }

    pub fn save_mode(&self) -> SaveMode {
        self.save_mode
    }
}

impl fmt::Debug for MongoConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MongoConfig")
            .field("hosts", &self.hosts)
            .field("replica_set", &self.replica_set)
            .field("username", &self.username)
            .field("password", &"***")
            .field("database", &self.database)
            .field("auth_source", &self.auth_source)
            .field("tls", &self.tls)
            .field(
                "tls_allow_invalid_certificates",
                &self.tls_allow_invalid_certificates,
            )
            .field("operation_timeout_ms", &self.operation_timeout_ms)
            .field("save_mode", &self.save_mode)
            .finish()
    }
}

fn parse_flag(key: &str, raw: &str) -> StoreResult<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(StoreError::Config {
            reason: format!("{key}={other}: expected a boolean"),
        }),
    }
}
