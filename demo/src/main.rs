use anyhow::{Context, Result};
use eventsource_domain::persist::{RecordStore, RecordStoreExt};
use eventsource_domain::{AggregateId, Record};
use eventsource_mongo::{MongoConfig, MongoConnection};
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const COLLECTION: &str = "demo_records";

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = MongoConfig::from_env().context("read mongodb config from MONGODB_* env")?;
    info!(?config, "connecting");

    let connection = MongoConnection::connect(config)
        .await
        .context("connect to mongodb")?;
    let store = connection.record_store(COLLECTION);

    let aggregate_id = AggregateId::generate().to_hex();
    println!("=== 聚合 {aggregate_id} ===\n");

    // 首次保存：创建文档
    store
        .save(
            &aggregate_id,
            vec![
                Record::new(1, Some(b"opened".to_vec())),
                Record::new(2, Some(b"deposited 500".to_vec())),
            ],
        )
        .await
        .context("save initial history")?;
    println!("✅ 保存 v1..v2");

    // 读后追加：save 是整体覆盖，追加需要带上已有历史
    store
        .append(
            &aggregate_id,
            vec![Record::new(3, Some(b"withdrawn 200".to_vec()))],
        )
        .await
        .context("append v3")?;
    println!("✅ 追加 v3");

    let history = store
        .load(&aggregate_id, 2, 3)
        .await
        .context("load v2..v3")?;
    for record in &history {
        println!(
            "  v{} {}",
            record.version(),
            String::from_utf8_lossy(record.data().unwrap_or_default())
        );
    }

    // 整体覆盖：只保留本次提交的记录
    store
        .save(&aggregate_id, vec![Record::new(4, None)])
        .await
        .context("overwrite history")?;
    let history = store.load_all(&aggregate_id).await?;
    println!("\n--- 覆盖后共 {} 条记录 ---", history.len());

    Ok(())
}
