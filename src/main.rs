//! Demo driver: starts a session, buys premium, syncs and asks for advice.
//!
//! ```text
//! HABIT_PRO__SYNC__TIMEOUT_SECS=5 cargo run -- alice@example.com
//! ```

use std::error::Error;
use std::sync::Arc;

use chrono::Duration as ChronoDuration;
use tracing::info;

use habit_pro_core::adapters::{
    FileKeyValueStore, InMemoryKeyValueStore, InMemoryRemoteStore, MockPaymentGateway,
};
use habit_pro_core::application::{SessionDeps, UserSession};
use habit_pro_core::config::{AppConfig, StorageBackend, ValidationError};
use habit_pro_core::domain::advisory::{AdvisoryContext, AdvisoryEngine, Habit};
use habit_pro_core::domain::entitlement::{Feature, FeatureGate, GateView};
use habit_pro_core::domain::foundation::{Timestamp, UserId};
use habit_pro_core::domain::sync::SyncRecord;
use habit_pro_core::ports::KeyValueStore;
use habit_pro_core::telemetry::init_tracing;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = AppConfig::load()?;
    config.validate()?;
    init_tracing(&config.telemetry)?;

    let storage: Arc<dyn KeyValueStore> = match config.storage.backend {
        StorageBackend::Memory => Arc::new(InMemoryKeyValueStore::new()),
        StorageBackend::File => {
            let dir = config
                .storage
                .data_dir
                .as_ref()
                .ok_or(ValidationError::MissingRequired("STORAGE__DATA_DIR"))?;
            Arc::new(FileKeyValueStore::new(dir))
        }
    };

    let user_id = UserId::new(
        std::env::args()
            .nth(1)
            .unwrap_or_else(|| "demo@example.com".to_string()),
    )?;

    let deps = SessionDeps {
        storage,
        remote: Arc::new(InMemoryRemoteStore::new()),
        payments: Arc::new(MockPaymentGateway::new()),
        options: config.session_options(),
    };
    let session = UserSession::start(Some(user_id.clone()), deps).await;

    let sync_gate = FeatureGate::new(Feature::CloudSync).with_lock();
    if let GateView::Lock { message } = sync_gate.evaluate(&session.features()) {
        println!("{}", message);
        let purchase = session
            .purchase_premium(Some(format!("demo-upgrade-{}", user_id)))
            .await?;
        println!("Now on {} tier", purchase.tier.display_name());
    }

    if let Some(engine) = session.sync_engine() {
        engine
            .record(
                "habit-water",
                SyncRecord::new(r#"{"title":"Drink water"}"#, Timestamp::now()),
            )
            .await?;
    }
    session.sync().await?;
    let state = session.sync_state();
    info!(status = ?state.status, "Sync finished");
    println!("Sync status: {:?}", state.status);

    let context = AdvisoryContext::now();
    let habits = vec![
        Habit::new("habit-water", "Drink water", "health").with_completions([context.today]),
        Habit::new("habit-read", "Read 10 pages", "mind")
            .with_completions([context.today - ChronoDuration::days(3)]),
    ];
    let suggestion = AdvisoryEngine::new().advise_at(&habits, 120, context);
    println!("Coach: {}", suggestion.text);

    session.sign_out();
    Ok(())
}
