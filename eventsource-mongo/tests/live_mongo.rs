//! 针对真实 MongoDB 的端到端测试，未设置 `MONGODB_SERVER` 时跳过
use eventsource_domain::persist::RecordStore;
use eventsource_domain::{AggregateId, Record};
use eventsource_mongo::{MongoConfig, MongoConnection, MongoRecordStore, SaveMode, config};

const COLLECTION: &str = "test_collection";

async fn connect() -> Option<MongoConnection> {
    if std::env::var(config::ENV_SERVER).is_err() {
        eprintln!("{} not set, skipping live mongodb test", config::ENV_SERVER);
        return None;
    }

    let config = MongoConfig::from_env().expect("mongodb config from env");
    Some(
        MongoConnection::connect(config)
            .await
            .expect("connect to mongodb"),
    )
}

#[tokio::test]
async fn save_then_update_overwrites_history() {
    let Some(connection) = connect().await else {
        return;
    };

    for mode in [SaveMode::CheckThenWrite, SaveMode::Upsert] {
        let store = connection.record_store(COLLECTION).with_save_mode(mode);
        let id = AggregateId::generate().to_hex();

        store.save(&id, vec![Record::new(12, None)]).await.unwrap();
        store.save(&id, vec![Record::new(13, None)]).await.unwrap();

        let history = store.load(&id, 0, 99).await.unwrap();
        assert_eq!(history, vec![Record::new(13, None)], "mode={mode}");
    }
}

#[tokio::test]
async fn load_inserted_document() {
    let Some(connection) = connect().await else {
        return;
    };

    let store = MongoRecordStore::new(COLLECTION, connection.config().database(), &connection);
    let id = AggregateId::generate().to_hex();
    let payload = b"payload".to_vec();

    store
        .save(&id, vec![Record::new(12, Some(payload.clone()))])
        .await
        .unwrap();

    let history = store.load(&id, 0, 99).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].data(), Some(payload.as_slice()));

    connection.ping().await.unwrap();
}

#[tokio::test]
async fn load_never_saved_aggregate_is_not_found() {
    let Some(connection) = connect().await else {
        return;
    };

    let store = connection.record_store(COLLECTION);
    let err = store
        .load(&AggregateId::generate().to_hex(), 0, 99)
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}
