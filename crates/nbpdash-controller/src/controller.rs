use crate::state::DashboardState;
use chrono::{DateTime, Local};
use nbpdash_client::ServiceSource;
use nbpdash_core::config::{DashboardConfig, StaleResponsePolicy};
use nbpdash_core::error::Result;
use nbpdash_core::types::{ConnectionStatus, RatioDetail, Service, ServiceId};
use nbpdash_view::RenderSurface;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot, watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

/// Input from whatever is showing the dashboard to a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    /// A service card was clicked.
    Select(ServiceId),
}

/// Polls the services backend on a fixed timer, keeps the selection, and
/// pushes everything it learns to a render surface.
///
/// Cheap to clone; clones share state. Fetches run as independent tasks and the
/// timer never waits for them, so several fetches of the same kind can be in
/// flight at once. Each completion replaces its target state wholesale under the
/// state lock; what happens to a completion that lands after a newer one is
/// decided by the [`StaleResponsePolicy`].
#[derive(Clone)]
pub struct DashboardController {
    inner: Arc<Inner>,
}

struct Inner {
    source: Arc<dyn ServiceSource>,
    surface: Arc<dyn RenderSurface>,
    state: Mutex<DashboardState>,
    poll_interval: Duration,
    stale_policy: StaleResponsePolicy,
    list_seq: AtomicU64,
    detail_seq: AtomicU64,
}

impl DashboardController {
    pub fn new(
        source: Arc<dyn ServiceSource>,
        surface: Arc<dyn RenderSurface>,
        config: &DashboardConfig,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                source,
                surface,
                state: Mutex::new(DashboardState::new()),
                poll_interval: config.poll_interval(),
                stale_policy: config.stale_responses,
                list_seq: AtomicU64::new(0),
                detail_seq: AtomicU64::new(0),
            }),
        }
    }

    /// Run the dashboard: one immediate list load, then a refresh every poll
    /// interval, handling UI events in between. Returns on shutdown.
    pub async fn run(
        self,
        mut events: mpsc::Receiver<UiEvent>,
        shutdown: watch::Receiver<bool>,
    ) -> anyhow::Result<()> {
        info!(
            interval_ms = self.inner.poll_interval.as_millis() as u64,
            stale_responses = ?self.inner.stale_policy,
            "dashboard controller started"
        );

        // The initial load is not awaited; arming the timer does not depend on it.
        self.spawn_list_refresh();

        let period = self.inner.poll_interval;
        let mut interval = tokio::time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut shutdown = shutdown;
        let mut events_open = true;

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    let spawned = self.on_timer_tick().await;
                    debug!(tasks = spawned.len(), "refresh tick");
                }
                event = events.recv(), if events_open => match event {
                    Some(UiEvent::Select(id)) => {
                        self.apply_selection(&id).await;
                        self.start_detail_load(id).await;
                    }
                    None => {
                        debug!("ui event channel closed");
                        events_open = false;
                    }
                },
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        info!("dashboard controller shutting down");
                        break;
                    }
                }
            }
        }

        Ok(())
    }

    /// One timer tick: refresh the list and, if something is selected, its
    /// detail. Both run as independent tasks; their handles are returned but
    /// nothing waits on them to complete.
    pub async fn on_timer_tick(&self) -> Vec<JoinHandle<()>> {
        let mut tasks = vec![self.spawn_list_refresh()];
        if let Some(id) = self.selected().await {
            tasks.push(self.start_detail_load(id).await);
        }
        tasks
    }

    /// Fetch the full service list once and apply the outcome. Never fails: on
    /// error the previous list stays on screen and the connection indicator
    /// turns unhealthy until a later fetch succeeds.
    pub async fn refresh_service_list(&self) {
        let seq = self.next_list_seq();
        self.load_service_list(seq).await;
    }

    async fn load_service_list(&self, seq: u64) {
        let result = self.inner.source.fetch_services().await;
        let now = Local::now();

        // Held across rendering so the surface sees completions in apply order.
        let mut state = self.inner.state.lock().await;
        if !state.accept_list(seq, self.inner.stale_policy) {
            debug!(seq, ok = result.is_ok(), "discarding stale service list response");
            return;
        }

        let success = match result {
            Ok(services) => {
                debug!(seq, count = services.len(), "service list loaded");
                state.services = services;
                self.inner.surface.render_service_list(&state.services).await;
                true
            }
            Err(e) => {
                error!(seq, error = %e, "failed to load service list");
                false
            }
        };

        match state.connection.record(success, now) {
            Some(ConnectionStatus::Healthy) => info!("backend connection restored"),
            Some(ConnectionStatus::Unhealthy) => warn!(
                failures = state.connection.consecutive_failures(),
                "backend connection lost"
            ),
            None => {}
        }
        let status = state.connection.status();
        self.inner.surface.render_connection_status(status, now).await;
    }

    /// Select a service: remember it, show the detail panel and load its detail
    /// right away. Selecting the same service again reloads it.
    pub async fn select_service(&self, id: ServiceId) {
        self.apply_selection(&id).await;
        self.load_detail(id).await;
    }

    /// Reload the detail of the selected service, if any.
    pub async fn refresh_selected_detail(&self) {
        if let Some(id) = self.selected().await {
            self.load_detail(id).await;
        }
    }

    pub async fn services(&self) -> Vec<Service> {
        self.inner.state.lock().await.services.clone()
    }

    pub async fn selected(&self) -> Option<ServiceId> {
        self.inner.state.lock().await.selected.clone()
    }

    pub async fn connection_status(&self) -> ConnectionStatus {
        self.inner.state.lock().await.connection.status()
    }

    pub async fn last_update(&self) -> Option<DateTime<Local>> {
        self.inner.state.lock().await.connection.last_update()
    }

    /// The detail currently on screen and the service it belongs to.
    pub async fn detail(&self) -> Option<(ServiceId, RatioDetail)> {
        self.inner.state.lock().await.detail.clone()
    }

    async fn apply_selection(&self, id: &ServiceId) {
        let in_list = {
            let mut state = self.inner.state.lock().await;
            state.selected = Some(id.clone());
            state.services.iter().any(|s| &s.id == id)
        };
        info!(service_id = %id, in_list, "service selected");
        self.inner.surface.show_detail_panel().await;
    }

    async fn load_detail(&self, id: ServiceId) {
        let seq = self.next_detail_seq();
        let result = self.inner.source.fetch_detail(&id).await;
        self.apply_detail(id, seq, result).await;
    }

    async fn apply_detail(&self, id: ServiceId, seq: u64, result: Result<RatioDetail>) {
        let detail = match result {
            Ok(detail) => detail,
            Err(e) => {
                // Whatever detail is on screen stays there.
                error!(service_id = %id, error = %e, "failed to load service detail");
                return;
            }
        };
        info!(service_id = %id, seq, detail = %detail.0, "service detail loaded");

        let mut state = self.inner.state.lock().await;
        if !state.accept_detail(&id, seq, self.inner.stale_policy) {
            debug!(service_id = %id, seq, "discarding stale service detail response");
            return;
        }
        self.inner.surface.render_service_detail(&id, &detail).await;
        state.detail = Some((id, detail));
    }

    fn next_list_seq(&self) -> u64 {
        self.inner.list_seq.fetch_add(1, Ordering::Relaxed) + 1
    }

    fn next_detail_seq(&self) -> u64 {
        self.inner.detail_seq.fetch_add(1, Ordering::Relaxed) + 1
    }

    fn spawn_list_refresh(&self) -> JoinHandle<()> {
        let seq = self.next_list_seq();
        let this = self.clone();
        tokio::spawn(async move { this.load_service_list(seq).await })
    }

    /// Load a detail in its own task. Returns once the fetch has been issued, so
    /// loads started one after another reach the backend in that order.
    async fn start_detail_load(&self, id: ServiceId) -> JoinHandle<()> {
        let seq = self.next_detail_seq();
        let (issued_tx, issued_rx) = oneshot::channel();
        let this = self.clone();
        let task = tokio::spawn(async move {
            let fetch = this.inner.source.fetch_detail(&id);
            let result = signal_first_poll(fetch, issued_tx).await;
            this.apply_detail(id, seq, result).await;
        });
        // Err only if the task died before issuing the fetch.
        let _ = issued_rx.await;
        task
    }
}

/// Drive `fut` to completion, firing `polled` right after its first poll.
async fn signal_first_poll<F: Future>(fut: F, polled: oneshot::Sender<()>) -> F::Output {
    let mut fut = std::pin::pin!(fut);
    let mut polled = Some(polled);
    std::future::poll_fn(move |cx| {
        let poll = fut.as_mut().poll(cx);
        if let Some(tx) = polled.take() {
            let _ = tx.send(());
        }
        poll
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{service, GatedSource, ScriptedSource};
    use nbpdash_core::error::Error;
    use nbpdash_core::types::{Locale, RatioDetail, ServiceStatus};
    use nbpdash_view::PageModel;

    fn config(policy: StaleResponsePolicy) -> DashboardConfig {
        DashboardConfig {
            poll_interval_ms: 5000,
            stale_responses: policy,
            locale: Locale::Ko,
        }
    }

    fn controller(
        source: Arc<dyn ServiceSource>,
        policy: StaleResponsePolicy,
    ) -> (DashboardController, Arc<PageModel>) {
        let page = Arc::new(PageModel::new(Locale::Ko));
        let controller = DashboardController::new(source, page.clone(), &config(policy));
        (controller, page)
    }

    async fn wait_for(what: &str, cond: impl Fn() -> bool) {
        for _ in 0..200 {
            if cond() {
                return;
            }
            tokio::task::yield_now().await;
        }
        panic!("timed out waiting for {what}");
    }

    #[tokio::test]
    async fn test_initial_load_renders_single_card() {
        let source = Arc::new(ScriptedSource::new());
        source.push_list(Ok(vec![service("1", "A", 80.0, 20.0, ServiceStatus::Ok)]));
        let (controller, page) = controller(source, StaleResponsePolicy::Apply);

        controller.refresh_service_list().await;

        let snapshot = page.snapshot().await;
        assert_eq!(snapshot.service_list.len(), 1);
        let text = snapshot.service_list[0].text();
        for needle in ["A", "80%", "20%", "정상"] {
            assert!(text.contains(needle), "{needle} missing from {text}");
        }
        assert_eq!(snapshot.connection_status.text, "연결됨");
        assert!(snapshot.last_update.starts_with("마지막 업데이트: "));
        assert_eq!(controller.connection_status().await, ConnectionStatus::Healthy);
    }

    #[tokio::test]
    async fn test_card_count_and_ratios_match_source() {
        let services = vec![
            service("1", "A", 80.0, 20.0, ServiceStatus::Ok),
            service("2", "B", 12.5, 87.5, ServiceStatus::Warning),
            service("3", "C", 33.3, 66.7, ServiceStatus::Error),
        ];
        let source = Arc::new(ScriptedSource::new());
        source.push_list(Ok(services.clone()));
        let (controller, page) = controller(source, StaleResponsePolicy::Apply);

        controller.refresh_service_list().await;

        let snapshot = page.snapshot().await;
        assert_eq!(snapshot.service_list.len(), services.len());
        for (card, svc) in snapshot.service_list.iter().zip(&services) {
            assert_eq!(card.service_id, svc.id);
            assert_eq!(card.nbp_width, svc.nbp_ratio);
            assert_eq!(card.dr_width, svc.dr_ratio);
        }
        assert_eq!(snapshot.service_list[1].ratio_line, "NBP: 12.5% | DR: 87.5%");
        assert_eq!(snapshot.service_list[2].ratio_line, "NBP: 33.3% | DR: 66.7%");
        assert_eq!(controller.services().await, services);
    }

    #[tokio::test]
    async fn test_failed_fetch_keeps_cards_and_flips_status() {
        let source = Arc::new(ScriptedSource::new());
        source.push_list(Ok(vec![
            service("1", "A", 80.0, 20.0, ServiceStatus::Ok),
            service("2", "B", 60.0, 40.0, ServiceStatus::Ok),
        ]));
        source.push_list(Err(Error::ListFetch("connection refused".into())));
        source.push_list(Ok(vec![service("1", "A", 70.0, 30.0, ServiceStatus::Warning)]));
        let (controller, page) = controller(source.clone(), StaleResponsePolicy::Apply);

        controller.refresh_service_list().await;
        let before = page.snapshot().await;
        let first_update = controller.last_update().await.unwrap();

        controller.refresh_service_list().await;
        let after_failure = page.snapshot().await;
        assert_eq!(after_failure.service_list, before.service_list);
        assert_eq!(after_failure.connection_status.text, "연결 끊김");
        assert_eq!(after_failure.connection_status.class, "status-error");
        assert_eq!(controller.services().await.len(), 2);
        assert_eq!(controller.connection_status().await, ConnectionStatus::Unhealthy);

        controller.refresh_service_list().await;
        let recovered = page.snapshot().await;
        assert_eq!(recovered.connection_status.text, "연결됨");
        assert_eq!(recovered.service_list.len(), 1);
        assert_eq!(recovered.service_list[0].status_line, "상태: 경고");
        assert!(controller.last_update().await.unwrap() >= first_update);
        assert_eq!(source.list_calls(), 3);
    }

    #[tokio::test]
    async fn test_first_fetch_failure_renders_disconnected() {
        let source = Arc::new(ScriptedSource::new());
        source.push_list(Err(Error::ListFetch("timeout".into())));
        let (controller, page) = controller(source, StaleResponsePolicy::Apply);

        controller.refresh_service_list().await;

        let snapshot = page.snapshot().await;
        assert!(snapshot.service_list.is_empty());
        assert_eq!(snapshot.connection_status.text, "연결 끊김");
        assert!(!snapshot.last_update.is_empty());
    }

    #[tokio::test]
    async fn test_selection_survives_service_disappearing() {
        let source = Arc::new(ScriptedSource::new());
        source.push_list(Ok(vec![
            service("x", "X", 50.0, 50.0, ServiceStatus::Ok),
            service("y", "Y", 90.0, 10.0, ServiceStatus::Ok),
        ]));
        source.push_list(Ok(vec![service("y", "Y", 90.0, 10.0, ServiceStatus::Ok)]));
        let (controller, page) = controller(source, StaleResponsePolicy::Apply);

        controller.refresh_service_list().await;
        controller.select_service(ServiceId::from("x")).await;
        controller.refresh_service_list().await;

        assert_eq!(controller.selected().await, Some(ServiceId::from("x")));
        let snapshot = page.snapshot().await;
        assert!(snapshot.service_detail.visible);
        assert_eq!(snapshot.service_detail.service_id, Some(ServiceId::from("x")));
        assert_eq!(snapshot.service_list.len(), 1);
    }

    #[tokio::test]
    async fn test_two_clicks_fetch_two_details_in_order() {
        let source = Arc::new(ScriptedSource::new());
        let (controller, page) = controller(source.clone(), StaleResponsePolicy::Apply);

        controller.select_service(ServiceId::from("1")).await;
        controller.select_service(ServiceId::from("2")).await;

        assert_eq!(
            source.detail_calls(),
            vec![ServiceId::from("1"), ServiceId::from("2")]
        );
        assert_eq!(controller.selected().await, Some(ServiceId::from("2")));
        let panel = page.snapshot().await.service_detail;
        assert_eq!(panel.service_id, Some(ServiceId::from("2")));
    }

    #[tokio::test]
    async fn test_reselecting_reloads_detail() {
        let source = Arc::new(ScriptedSource::new());
        let (controller, _page) = controller(source.clone(), StaleResponsePolicy::Apply);

        controller.select_service(ServiceId::from("1")).await;
        controller.select_service(ServiceId::from("1")).await;

        assert_eq!(source.detail_calls().len(), 2);
    }

    #[tokio::test]
    async fn test_failed_detail_keeps_previous_content() {
        let source = Arc::new(ScriptedSource::new());
        let (controller, page) = controller(source.clone(), StaleResponsePolicy::Apply);

        controller.select_service(ServiceId::from("1")).await;
        let before = page.snapshot().await.service_detail;
        assert!(before.content.is_some());

        source.fail_details(true);
        controller.refresh_selected_detail().await;

        let after = page.snapshot().await.service_detail;
        assert_eq!(after, before);
        assert_eq!(controller.selected().await, Some(ServiceId::from("1")));
        let (id, detail) = controller.detail().await.unwrap();
        assert_eq!(id, ServiceId::from("1"));
        assert_eq!(detail.0["serviceId"], "1");
        assert_eq!(source.detail_calls().len(), 2);
    }

    #[tokio::test]
    async fn test_refresh_selected_detail_without_selection_is_noop() {
        let source = Arc::new(ScriptedSource::new());
        let (controller, _page) = controller(source.clone(), StaleResponsePolicy::Apply);

        controller.refresh_selected_detail().await;
        assert!(source.detail_calls().is_empty());
    }

    #[tokio::test]
    async fn test_timer_tick_refreshes_list_and_selected_detail() {
        let source = Arc::new(ScriptedSource::new());
        source.push_list(Ok(vec![service("1", "A", 80.0, 20.0, ServiceStatus::Ok)]));
        source.push_list(Err(Error::ListFetch("boom".into())));
        let (controller, _page) = controller(source.clone(), StaleResponsePolicy::Apply);

        let tasks = controller.on_timer_tick().await;
        assert_eq!(tasks.len(), 1);
        for task in tasks {
            task.await.unwrap();
        }

        controller.select_service(ServiceId::from("1")).await;
        let tasks = controller.on_timer_tick().await;
        assert_eq!(tasks.len(), 2);
        for task in tasks {
            task.await.unwrap();
        }

        // list failure in the second tick did not stop the detail refresh
        assert_eq!(source.list_calls(), 2);
        assert_eq!(source.detail_calls().len(), 2);
        assert_eq!(controller.connection_status().await, ConnectionStatus::Unhealthy);
    }

    #[tokio::test]
    async fn test_overlapping_list_fetches_last_writer_wins() {
        let source = Arc::new(GatedSource::new());
        let (older_tx, newer_tx) = (source.gate(), source.gate());
        let (controller, page) = controller(source.clone(), StaleResponsePolicy::Apply);

        let older = {
            let c = controller.clone();
            tokio::spawn(async move { c.refresh_service_list().await })
        };
        wait_for("first fetch", || source.list_calls() == 1).await;

        // The timer fires while the first fetch is still pending.
        let mut tick = controller.on_timer_tick().await;
        assert_eq!(tick.len(), 1);
        wait_for("second fetch", || source.list_calls() == 2).await;

        newer_tx
            .send(Ok(vec![service("new", "Newer", 10.0, 90.0, ServiceStatus::Ok)]))
            .unwrap();
        tick.remove(0).await.unwrap();
        assert_eq!(page.snapshot().await.service_list[0].name, "Newer");

        older_tx
            .send(Ok(vec![service("old", "Older", 90.0, 10.0, ServiceStatus::Ok)]))
            .unwrap();
        older.await.unwrap();

        // Both applied, in completion order.
        let snapshot = page.snapshot().await;
        assert_eq!(snapshot.service_list.len(), 1);
        assert_eq!(snapshot.service_list[0].name, "Older");
        assert_eq!(controller.services().await[0].id, ServiceId::from("old"));
    }

    #[tokio::test]
    async fn test_overlapping_list_fetches_discard_stale() {
        let source = Arc::new(GatedSource::new());
        let (older_tx, newer_tx) = (source.gate(), source.gate());
        let (controller, page) = controller(source.clone(), StaleResponsePolicy::Discard);

        let older = {
            let c = controller.clone();
            tokio::spawn(async move { c.refresh_service_list().await })
        };
        wait_for("first fetch", || source.list_calls() == 1).await;
        let mut tick = controller.on_timer_tick().await;
        wait_for("second fetch", || source.list_calls() == 2).await;

        newer_tx
            .send(Ok(vec![service("new", "Newer", 10.0, 90.0, ServiceStatus::Ok)]))
            .unwrap();
        tick.remove(0).await.unwrap();

        // A late failure of the older fetch must not flip the indicator either.
        older_tx
            .send(Err(Error::ListFetch("late".into())))
            .unwrap();
        older.await.unwrap();

        let snapshot = page.snapshot().await;
        assert_eq!(snapshot.service_list[0].name, "Newer");
        assert_eq!(snapshot.connection_status.text, "연결됨");
        assert_eq!(controller.connection_status().await, ConnectionStatus::Healthy);
    }

    #[tokio::test]
    async fn test_discard_policy_drops_detail_of_deselected_service() {
        let source = Arc::new(GatedSource::new());
        let (controller, page) = controller(source.clone(), StaleResponsePolicy::Discard);
        let first_tx = source.detail_gate();
        let second_tx = source.detail_gate();

        let first = {
            let c = controller.clone();
            tokio::spawn(async move { c.select_service(ServiceId::from("a")).await })
        };
        wait_for("first detail fetch", || source.detail_call_count() == 1).await;
        let second = {
            let c = controller.clone();
            tokio::spawn(async move { c.select_service(ServiceId::from("b")).await })
        };
        wait_for("second detail fetch", || source.detail_call_count() == 2).await;

        second_tx.send(Ok(RatioDetail(serde_json::json!({"svc": "b"})))).unwrap();
        second.await.unwrap();
        first_tx.send(Ok(RatioDetail(serde_json::json!({"svc": "a"})))).unwrap();
        first.await.unwrap();

        let panel = page.snapshot().await.service_detail;
        assert_eq!(panel.service_id, Some(ServiceId::from("b")));
        assert!(panel.content.unwrap().contains("\"b\""));
        let (id, detail) = controller.detail().await.unwrap();
        assert_eq!(id, ServiceId::from("b"));
        assert_eq!(detail.0["svc"], "b");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_clicks_fetch_details_in_click_order() {
        for _ in 0..50 {
            let source = Arc::new(ScriptedSource::new());
            let (controller, _page) = controller(source.clone(), StaleResponsePolicy::Apply);
            let (events_tx, events_rx) = mpsc::channel(8);
            let (shutdown_tx, shutdown_rx) = watch::channel(false);
            let handle = tokio::spawn(controller.run(events_rx, shutdown_rx));

            events_tx.send(UiEvent::Select(ServiceId::from("1"))).await.unwrap();
            events_tx.send(UiEvent::Select(ServiceId::from("2"))).await.unwrap();

            let deadline = Instant::now() + Duration::from_secs(5);
            while source.detail_calls().len() < 2 {
                assert!(Instant::now() < deadline, "timed out waiting for detail fetches");
                tokio::time::sleep(Duration::from_millis(1)).await;
            }
            assert_eq!(
                source.detail_calls(),
                vec![ServiceId::from("1"), ServiceId::from("2")]
            );

            shutdown_tx.send(true).unwrap();
            handle.await.unwrap().unwrap();
        }
    }

    #[tokio::test]
    async fn test_timer_tick_detail_is_issued_before_tick_returns() {
        let source = Arc::new(GatedSource::new());
        let list_tx = source.gate();
        let detail_tx = source.detail_gate();
        let (controller, page) = controller(source.clone(), StaleResponsePolicy::Apply);

        // selection without a load, as the run loop does before starting one
        controller.apply_selection(&ServiceId::from("9")).await;
        let mut tasks = controller.on_timer_tick().await;
        assert_eq!(source.detail_call_count(), 1);

        detail_tx.send(Ok(RatioDetail(serde_json::json!({"svc": "9"})))).unwrap();
        tasks.pop().unwrap().await.unwrap();
        assert_eq!(
            page.snapshot().await.service_detail.service_id,
            Some(ServiceId::from("9"))
        );

        list_tx.send(Ok(Vec::new())).unwrap();
        tasks.pop().unwrap().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_loop_polls_and_handles_events() {
        let source = Arc::new(ScriptedSource::new());
        let (controller, page) = controller(source.clone(), StaleResponsePolicy::Apply);
        let (events_tx, events_rx) = mpsc::channel(8);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let handle = tokio::spawn(controller.clone().run(events_rx, shutdown_rx));

        // initial load happens before the first tick
        wait_for("initial load", || source.list_calls() == 1).await;

        tokio::time::advance(Duration::from_millis(5000)).await;
        wait_for("first tick", || source.list_calls() == 2).await;
        assert!(source.detail_calls().is_empty());

        events_tx.send(UiEvent::Select(ServiceId::from("7"))).await.unwrap();
        wait_for("detail load", || source.detail_calls().len() == 1).await;
        wait_for("panel shown", || {
            page.try_snapshot().map(|p| p.service_detail.visible).unwrap_or(false)
        })
        .await;

        tokio::time::advance(Duration::from_millis(5000)).await;
        wait_for("second tick", || {
            source.list_calls() == 3 && source.detail_calls().len() == 2
        })
        .await;

        shutdown_tx.send(true).unwrap();
        handle.await.unwrap().unwrap();
    }
}
