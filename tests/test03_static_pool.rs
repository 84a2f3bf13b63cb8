use deadpool::managed::{Manager, Metrics, Pool};
use trackload::DbError;
use trackload::pool::SingleConnectionManager;

#[derive(Debug, PartialEq)]
struct DummyConn(u32);

#[tokio::test]
async fn hands_out_the_connection_exactly_once() {
    let manager = SingleConnectionManager::new(DummyConn(7));

    let first = manager.create().await.unwrap();
    assert_eq!(first, DummyConn(7));

    let second = manager.create().await;
    assert!(matches!(second, Err(DbError::EngineError(_))));
}

#[tokio::test]
async fn recycle_always_accepts_the_connection() {
    let manager = SingleConnectionManager::new(DummyConn(1));
    let mut conn = manager.create().await.unwrap();

    assert!(manager.recycle(&mut conn, &Metrics::default()).await.is_ok());
}

#[tokio::test]
async fn pool_reuses_the_same_connection_across_checkouts() {
    let pool: Pool<SingleConnectionManager<DummyConn>> = Pool::builder(SingleConnectionManager::new(DummyConn(1)))
        .max_size(1)
        .build()
        .unwrap();

    {
        let mut conn = pool.get().await.unwrap();
        assert_eq!(conn.0, 1);
        // Mark the instance so the next checkout proves it is the same one.
        conn.0 += 1;
    }

    let conn = pool.get().await.unwrap();
    assert_eq!(conn.0, 2);
}
