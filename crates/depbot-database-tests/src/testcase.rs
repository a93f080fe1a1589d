use depbot_database_interface::DbService;
use depbot_database_memory::MemoryDb;
use futures::Future;
use tracing::info;

pub async fn db_test_case<F, Fut>(test_name: &str, block: F)
where
    F: Fn(Box<dyn DbService>) -> Fut,
    Fut: Future<Output = Result<(), Box<dyn std::error::Error + Send + Sync + 'static>>>,
{
    let full_name = format!("test-bot-{test_name}");

    {
        // In memory
        let mem_db = Box::new(MemoryDb::new());
        info!("running memory test {full_name} ...");
        block(mem_db).await.unwrap();
    }
}
