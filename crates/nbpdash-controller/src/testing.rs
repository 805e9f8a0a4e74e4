//! In-process `ServiceSource` doubles for controller tests.

use async_trait::async_trait;
use nbpdash_client::ServiceSource;
use nbpdash_core::error::{Error, Result};
use nbpdash_core::types::{RatioDetail, Service, ServiceId, ServiceStatus};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::sync::oneshot;

pub fn service(id: &str, name: &str, nbp: f64, dr: f64, status: ServiceStatus) -> Service {
    Service {
        id: ServiceId::from(id),
        name: name.into(),
        kind: "web".into(),
        nbp_ratio: Some(nbp),
        dr_ratio: Some(dr),
        status,
    }
}

/// Answers immediately from a script. An exhausted list script yields an empty
/// list; details echo the requested id unless failures are switched on.
#[derive(Default)]
pub struct ScriptedSource {
    lists: Mutex<VecDeque<Result<Vec<Service>>>>,
    list_calls: AtomicUsize,
    detail_calls: Mutex<Vec<ServiceId>>,
    fail_details: AtomicBool,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_list(&self, result: Result<Vec<Service>>) {
        self.lists.lock().unwrap().push_back(result);
    }

    pub fn fail_details(&self, fail: bool) {
        self.fail_details.store(fail, Ordering::SeqCst);
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn detail_calls(&self) -> Vec<ServiceId> {
        self.detail_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ServiceSource for ScriptedSource {
    async fn fetch_services(&self) -> Result<Vec<Service>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.lists.lock().unwrap().pop_front().unwrap_or(Ok(Vec::new()))
    }

    async fn fetch_detail(&self, id: &ServiceId) -> Result<RatioDetail> {
        self.detail_calls.lock().unwrap().push(id.clone());
        if self.fail_details.load(Ordering::SeqCst) {
            return Err(Error::detail_fetch(id, "503 Service Unavailable"));
        }
        Ok(RatioDetail(serde_json::json!({ "serviceId": id.as_str() })))
    }
}

type ListGate = oneshot::Receiver<Result<Vec<Service>>>;
type DetailGate = oneshot::Receiver<Result<RatioDetail>>;

/// Each call blocks until the test releases the matching gate, so the order in
/// which fetches complete is under the test's control. Gates are handed out to
/// calls in the order they were created.
#[derive(Default)]
pub struct GatedSource {
    list_gates: Mutex<VecDeque<ListGate>>,
    detail_gates: Mutex<VecDeque<DetailGate>>,
    list_calls: AtomicUsize,
    detail_calls: AtomicUsize,
}

impl GatedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gate(&self) -> oneshot::Sender<Result<Vec<Service>>> {
        let (tx, rx) = oneshot::channel();
        self.list_gates.lock().unwrap().push_back(rx);
        tx
    }

    pub fn detail_gate(&self) -> oneshot::Sender<Result<RatioDetail>> {
        let (tx, rx) = oneshot::channel();
        self.detail_gates.lock().unwrap().push_back(rx);
        tx
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn detail_call_count(&self) -> usize {
        self.detail_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ServiceSource for GatedSource {
    async fn fetch_services(&self) -> Result<Vec<Service>> {
        let gate = self
            .list_gates
            .lock()
            .unwrap()
            .pop_front()
            .expect("no list gate left");
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        gate.await
            .unwrap_or_else(|_| Err(Error::ListFetch("gate dropped".into())))
    }

    async fn fetch_detail(&self, id: &ServiceId) -> Result<RatioDetail> {
        let gate = self
            .detail_gates
            .lock()
            .unwrap()
            .pop_front()
            .expect("no detail gate left");
        self.detail_calls.fetch_add(1, Ordering::SeqCst);
        gate.await
            .unwrap_or_else(|_| Err(Error::detail_fetch(id, "gate dropped")))
    }
}
