use quire::collection::{Collection, Document};
use quire::doc;
use quire::errors::QuireResult;
use quire::quire::Quire;
use quire::store::memory::InMemoryStoreProvider;
use quire::store::StoreFactory;
use std::backtrace::Backtrace;
use std::time::Instant;

/// Runs `test` against a context built by `before`, then always runs
/// `after` on it. Panics with the failing stage and its error if any stage
/// fails or the test panics.
pub fn run_test<T, B, A>(before: B, test: T, after: A)
where
    T: Fn(TestContext) -> QuireResult<()> + std::panic::UnwindSafe + std::panic::RefUnwindSafe,
    B: Fn() -> QuireResult<TestContext> + std::panic::UnwindSafe + std::panic::RefUnwindSafe,
    A: Fn(TestContext) -> QuireResult<()> + std::panic::UnwindSafe + std::panic::RefUnwindSafe,
{
    let start_time = Instant::now();

    let result = std::panic::catch_unwind(|| {
        let backtrace = Backtrace::capture();
        match before() {
            Ok(ctx) => match test(ctx.clone()) {
                Ok(_) => after(ctx)
                    .map_err(|e| (format!("After run failed: {:?}", e), backtrace.to_string())),
                Err(e) => {
                    let _ = after(ctx);
                    Err((format!("Test failed: {:?}", e), backtrace.to_string()))
                }
            },
            Err(e) => Err((format!("Before run failed: {:?}", e), backtrace.to_string())),
        }
    });

    let error = match result {
        Ok(Ok(_)) => return,
        Ok(Err((e, bt))) => {
            if !bt.is_empty() && !bt.contains("disabled") {
                eprintln!("\nBacktrace:\n{}", bt);
            }
            e
        }
        Err(panic_err) => {
            if let Some(s) = panic_err.downcast_ref::<&str>() {
                format!("Panic: {}", s)
            } else if let Some(s) = panic_err.downcast_ref::<String>() {
                format!("Panic: {}", s)
            } else {
                "Panic: unknown payload".to_string()
            }
        }
    };

    panic!("Test failed after {:?}: {}", start_time.elapsed(), error);
}

/// A database over in-memory stores, plus the provider behind them so tests
/// can reach the raw partitions.
#[derive(Clone)]
pub struct TestContext {
    db: Quire,
    provider: InMemoryStoreProvider,
}

impl TestContext {
    pub fn new(db: Quire, provider: InMemoryStoreProvider) -> Self {
        Self { db, provider }
    }

    pub fn db(&self) -> Quire {
        self.db.clone()
    }

    pub fn provider(&self) -> InMemoryStoreProvider {
        self.provider.clone()
    }

    /// Opens a collection under a name no other test uses.
    pub fn fresh_collection(&self) -> QuireResult<Collection> {
        self.db.collection(&random_name())
    }
}

pub fn random_name() -> String {
    format!("test-{}", uuid::Uuid::new_v4())
}

pub fn create_test_context() -> QuireResult<TestContext> {
    let provider = InMemoryStoreProvider::new();
    let db = Quire::builder()
        .store_factory(StoreFactory::new(provider.clone()))
        .open()?;
    Ok(TestContext::new(db, provider))
}

pub fn cleanup(ctx: TestContext) -> QuireResult<()> {
    log::debug!(
        "Closing test database with collections {:?}",
        ctx.db().collection_names().unwrap_or_default()
    );
    ctx.db().close()
}

pub fn create_test_docs() -> Vec<Document> {
    let doc1 = doc! {
        first_name: "fn1",
        last_name: "ln1",
        birth_year: 1981,
        address: { city: "Oslo", zip: "0150" },
        arr: [1, 2, 3],
        list: ["one", "two", "three"],
        body: "a quick brown fox jump over the lazy dog",
    };

    let doc2 = doc! {
        first_name: "fn2",
        last_name: "ln2",
        birth_year: 1975,
        address: { city: "Bergen", zip: "5003" },
        arr: [3, 4, 3],
        list: ["three", "four", "five"],
        body: "quick hello world from quire",
    };

    let doc3 = doc! {
        first_name: "fn3",
        last_name: "ln2",
        birth_year: 1990,
        address: { city: "Oslo", zip: "0250" },
        arr: [9, 4, 8],
        list: ["four", "five", "six"],
        body: "hello world",
    };

    vec![doc1, doc2, doc3]
}
