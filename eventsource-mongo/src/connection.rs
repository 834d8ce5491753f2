use crate::{config::MongoConfig, store::MongoRecordStore};
use bson::{Document, doc};
use eventsource_domain::{StoreError, StoreResult};
use mongodb::{
    Client, Collection,
    options::{ClientOptions, Credential, ServerAddress, Tls, TlsOptions},
};
use tracing::info;

/// 已认证的 MongoDB 连接句柄
///
/// 内部的驱动客户端自带连接池，克隆代价很低，可在多个存储之间共享。
#[derive(Clone, Debug)]
pub struct MongoConnection {
    client: Client,
    config: MongoConfig,
}

impl MongoConnection {
    /// 建立连接并执行一次 ping，失败时快速返回
    #[tracing::instrument(skip(config), fields(hosts = ?config.hosts(), replica_set = ?config.replica_set()))]
    pub async fn connect(config: MongoConfig) -> StoreResult<Self> {
        let options = client_options(&config)?;
        let client = Client::with_options(options).map_err(|err| StoreError::Connection {
            reason: format!("could not connect to mongodb: {err}"),
        })?;

        let connection = Self { client, config };
        connection.ping().await?;
        info!("connected to mongodb");

        Ok(connection)
    }

    /// 存活检查
    pub async fn ping(&self) -> StoreResult<()> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|err| StoreError::Connection {
                reason: format!("could not ping mongodb: {err}"),
            })?;

        Ok(())
    }

    /// 解析集合引用，不产生网络往返
    pub fn collection(&self, database: &str, collection: &str) -> Collection<Document> {
        self.client.database(database).collection(collection)
    }

    /// 在配置的默认数据库上创建记录存储
    pub fn record_store(&self, collection: &str) -> MongoRecordStore {
        MongoRecordStore::new(collection, self.config.database(), self)
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn config(&self) -> &MongoConfig {
        &self.config
    }
}

/// 将配置转换为驱动的客户端选项
pub fn client_options(config: &MongoConfig) -> StoreResult<ClientOptions> {
    let hosts = config
        .hosts()
        .into_iter()
        .map(|host| {
            ServerAddress::parse(host).map_err(|err| StoreError::Config {
                reason: format!("invalid host {host}: {err}"),
            })
        })
        .collect::<StoreResult<Vec<_>>>()?;

    if hosts.is_empty() {
        return Err(StoreError::Config {
            reason: "host list is empty".to_string(),
        });
    }

    let credential = Credential::builder()
        .username(config.username().to_string())
        .password(config.password().to_string())
        .source(config.auth_source().to_string())
        .build();

    let tls = if config.tls() {
        Tls::Enabled(
            TlsOptions::builder()
                .allow_invalid_certificates(config.tls_allow_invalid_certificates())
                .build(),
        )
    } else {
        Tls::Disabled
    };

    let options = ClientOptions::builder()
        .hosts(hosts)
        .repl_set_name(config.replica_set().map(str::to_string))
        .credential(credential)
        .tls(tls)
        .build();

    Ok(options)
}
