use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use shared::models::{
    AllergenRecord, B2bSale, BatchCheck, Complaint, Delivery, Event, Incident, Method, Record, Staff,
    SupplierRecord, TransportCheck,
};
use shared::{AppError, AppResult, ErrorCode};
use taquero_client::ClientConfig;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::core::Config;
use crate::finance::FinanceBook;
use crate::storage::{FileStore, KeyValueStore, RecordStore};
use crate::sync::{RemoteSheet, RetryPolicy, SyncHandle, SyncWorker};

/// Every record domain, in display order
pub const DOMAINS: &[&str] = &[
    Event::DOMAIN,
    AllergenRecord::DOMAIN,
    BatchCheck::DOMAIN,
    Method::DOMAIN,
    Delivery::DOMAIN,
    TransportCheck::DOMAIN,
    Incident::DOMAIN,
    Complaint::DOMAIN,
    SupplierRecord::DOMAIN,
    Staff::DOMAIN,
    B2bSale::DOMAIN,
];

/// One record store per domain
///
/// | field | record | domain |
/// |-------|--------|--------|
/// | events | Event | events |
/// | allergens | AllergenRecord | allergens |
/// | batch_checks | BatchCheck | batch_checks |
/// | methods | Method | methods |
/// | deliveries | Delivery | deliveries |
/// | transport_checks | TransportCheck | transport_checks |
/// | incidents | Incident | incidents |
/// | complaints | Complaint | complaints |
/// | suppliers | SupplierRecord | suppliers |
/// | staff | Staff | staff |
/// | b2b_sales | B2bSale | b2b_sales |
#[derive(Clone)]
pub struct Stores {
    pub events: Arc<RecordStore<Event>>,
    pub allergens: Arc<RecordStore<AllergenRecord>>,
    pub batch_checks: Arc<RecordStore<BatchCheck>>,
    pub methods: Arc<RecordStore<Method>>,
    pub deliveries: Arc<RecordStore<Delivery>>,
    pub transport_checks: Arc<RecordStore<TransportCheck>>,
    pub incidents: Arc<RecordStore<Incident>>,
    pub complaints: Arc<RecordStore<Complaint>>,
    pub suppliers: Arc<RecordStore<SupplierRecord>>,
    pub staff: Arc<RecordStore<Staff>>,
    pub b2b_sales: Arc<RecordStore<B2bSale>>,
}

fn open<T: Record>(storage: &Arc<dyn KeyValueStore>, sync: &Option<SyncHandle>) -> AppResult<Arc<RecordStore<T>>> {
    Ok(Arc::new(RecordStore::open(storage.clone(), sync.clone())?))
}

fn unknown_domain(domain: &str) -> AppError {
    AppError::with_message(ErrorCode::NotFound, format!("Unknown domain: {domain}"))
        .with_detail("domains", DOMAINS.join(", "))
}

fn to_json<T: Record>(records: Vec<T>) -> AppResult<Vec<Value>> {
    records
        .into_iter()
        .map(|r| serde_json::to_value(r).map_err(|e| AppError::internal(e.to_string())))
        .collect()
}

/// Run `$body` with `$store` bound to the store of `$domain`
macro_rules! with_store {
    ($stores:expr, $domain:expr, |$store:ident| $body:expr) => {
        match $domain {
            "events" => { let $store = &$stores.events; $body }
            "allergens" => { let $store = &$stores.allergens; $body }
            "batch_checks" => { let $store = &$stores.batch_checks; $body }
            "methods" => { let $store = &$stores.methods; $body }
            "deliveries" => { let $store = &$stores.deliveries; $body }
            "transport_checks" => { let $store = &$stores.transport_checks; $body }
            "incidents" => { let $store = &$stores.incidents; $body }
            "complaints" => { let $store = &$stores.complaints; $body }
            "suppliers" => { let $store = &$stores.suppliers; $body }
            "staff" => { let $store = &$stores.staff; $body }
            "b2b_sales" => { let $store = &$stores.b2b_sales; $body }
            other => Err(unknown_domain(other)),
        }
    };
}

impl Stores {
    pub fn open(storage: &Arc<dyn KeyValueStore>, sync: Option<SyncHandle>) -> AppResult<Self> {
        Ok(Self {
            events: open(storage, &sync)?,
            allergens: open(storage, &sync)?,
            batch_checks: open(storage, &sync)?,
            methods: open(storage, &sync)?,
            deliveries: open(storage, &sync)?,
            transport_checks: open(storage, &sync)?,
            incidents: open(storage, &sync)?,
            complaints: open(storage, &sync)?,
            suppliers: open(storage, &sync)?,
            staff: open(storage, &sync)?,
            b2b_sales: open(storage, &sync)?,
        })
    }

    /// Non-deleted records of a domain as JSON
    pub fn list_json(&self, domain: &str) -> AppResult<Vec<Value>> {
        with_store!(self, domain, |store| to_json(store.list()))
    }

    /// Delete a record by domain and id (soft or hard per domain)
    pub fn delete(&self, domain: &str, id: &str, author: &str) -> AppResult<()> {
        with_store!(self, domain, |store| store.delete(id, author))
    }

    /// Reload a domain from the sheet
    pub async fn reload(&self, domain: &str, remote: &dyn RemoteSheet) -> AppResult<usize> {
        with_store!(self, domain, |store| store.reload_from_remote(remote).await)
    }

    /// Non-deleted record count per domain
    pub fn counts(&self) -> Vec<(&'static str, usize)> {
        DOMAINS
            .iter()
            .map(|d| (*d, self.list_json(d).map(|v| v.len()).unwrap_or(0)))
            .collect()
    }
}

/// Application state: stores, finance book and the sync worker
///
/// Cloning is cheap; every part is shared.
///
/// ```ignore
/// let state = AppState::initialize(&Config::from_env()).await?;
/// state.stores.events.create(event)?;
/// state.pull("events").await?;
/// state.shutdown().await;
/// ```
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub stores: Stores,
    pub finance: Arc<FinanceBook>,
    remote: Option<Arc<dyn RemoteSheet>>,
    sync: Option<SyncHandle>,
    shutdown: CancellationToken,
    worker: Arc<parking_lot::Mutex<Option<JoinHandle<()>>>>,
}

impl AppState {
    /// Open local storage and, when `SHEETS_URL` is set, start the sync worker
    ///
    /// Must run inside a tokio runtime.
    pub async fn initialize(config: &Config) -> AppResult<Self> {
        let storage: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(&config.data_dir)?);
        let remote: Option<Arc<dyn RemoteSheet>> = match &config.sheets_url {
            Some(url) => {
                let client = ClientConfig::new(url.clone())
                    .with_timeout_ms(config.request_timeout_ms)
                    .build_client()
                    .map_err(|e| AppError::config(format!("Invalid SHEETS_URL: {e}")))?;
                Some(Arc::new(client) as Arc<dyn RemoteSheet>)
            }
            None => None,
        };
        Self::with_remote(config.clone(), storage, remote, RetryPolicy::default())
    }

    /// Build state over explicit storage and remote
    pub fn with_remote(
        config: Config,
        storage: Arc<dyn KeyValueStore>,
        remote: Option<Arc<dyn RemoteSheet>>,
        retry: RetryPolicy,
    ) -> AppResult<Self> {
        let shutdown = CancellationToken::new();
        let (sync, worker) = match &remote {
            Some(remote) => {
                let (worker, handle) = SyncWorker::new(remote.clone(), shutdown.clone());
                (Some(handle), Some(worker.with_retry(retry).spawn()))
            }
            None => {
                tracing::info!("No SHEETS_URL configured, running offline");
                (None, None)
            }
        };

        let stores = Stores::open(&storage, sync.clone())?;
        let finance = Arc::new(FinanceBook::open(storage)?);
        tracing::info!(data_dir = %config.data_dir.display(), online = remote.is_some(), "State initialized");

        Ok(Self {
            config,
            stores,
            finance,
            remote,
            sync,
            shutdown,
            worker: Arc::new(parking_lot::Mutex::new(worker)),
        })
    }

    pub fn is_online(&self) -> bool {
        self.remote.is_some()
    }

    pub fn sync(&self) -> Option<&SyncHandle> {
        self.sync.as_ref()
    }

    /// Wait for queued writes, up to `SYNC_SETTLE_MS`
    pub async fn settle(&self) -> bool {
        match &self.sync {
            Some(sync) => sync.settle(Duration::from_millis(self.config.sync_settle_ms)).await,
            None => true,
        }
    }

    /// Let queued writes land, then reload a domain from the sheet
    pub async fn pull(&self, domain: &str) -> AppResult<usize> {
        let remote = self.remote.as_ref().ok_or_else(|| AppError::new(ErrorCode::RemoteNotConfigured))?;
        if !self.settle().await {
            tracing::warn!(domain, "Sync queue not drained before reload");
        }
        self.stores.reload(domain, &**remote).await
    }

    /// Stop the sync worker after it flushes the queue
    pub async fn shutdown(&self) {
        self.shutdown.cancel();
        let worker = self.worker.lock().take();
        if let Some(handle) = worker
            && let Err(e) = handle.await
        {
            tracing::error!("SyncWorker task failed: {e}");
        }
    }
}
