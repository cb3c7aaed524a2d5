//! The dispatch engine: validated commands over the work order state machine

use crate::{DispatchEvent, DispatchNotifier, NullNotifier, PositionSource, TechnicianDirectory};
use chrono::{DateTime, Utc};
use fieldops_store::{HandoverStore, WorkOrderStore};
use fieldops_types::{
    ClientId, ContractId, DispatchError, DispatchResult, GeoPoint, HandoverChecklist, HandoverId,
    InternalNote, InvoiceId, JobScope, OrderSource, SiteHandover, TechnicianId, TrackingEvent,
    WorkOrder, WorkOrderId, WorkOrderPriority, WorkOrderStatus,
};
use std::sync::Arc;
use tracing::{info, warn};

/// Kind of request submitted through the client portal
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PortalRequestKind {
    Installation,
    ServiceRepair,
}

impl PortalRequestKind {
    fn description_tag(self) -> &'static str {
        match self {
            PortalRequestKind::Installation => "[NEW INSTALLATION]",
            PortalRequestKind::ServiceRepair => "[MAINTENANCE/REPAIR]",
        }
    }
}

/// Input for creating a work order
#[derive(Clone, Debug)]
pub struct NewOrderRequest {
    pub client_id: Option<ClientId>,
    pub client_name: String,
    pub client_address: String,
    pub client_contact: String,
    pub client_email: String,
    pub job_scope: JobScope,
    pub priority: WorkOrderPriority,
    pub description: String,
    pub source: OrderSource,
    /// Originating contract, for maintenance-generated orders
    pub contract_id: Option<ContractId>,
    /// Portal submissions carry the request kind for the description tag
    pub portal_kind: Option<PortalRequestKind>,
}

impl NewOrderRequest {
    pub fn new(
        client_name: impl Into<String>,
        job_scope: JobScope,
        description: impl Into<String>,
        source: OrderSource,
    ) -> Self {
        Self {
            client_id: None,
            client_name: client_name.into(),
            client_address: String::new(),
            client_contact: String::new(),
            client_email: String::new(),
            job_scope,
            priority: WorkOrderPriority::Standard,
            description: description.into(),
            source,
            contract_id: None,
            portal_kind: None,
        }
    }

    pub fn with_client(
        mut self,
        id: ClientId,
        address: impl Into<String>,
        contact: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        self.client_id = Some(id);
        self.client_address = address.into();
        self.client_contact = contact.into();
        self.client_email = email.into();
        self
    }

    pub fn with_priority(mut self, priority: WorkOrderPriority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_contract(mut self, contract_id: ContractId) -> Self {
        self.contract_id = Some(contract_id);
        self
    }

    pub fn with_portal_kind(mut self, kind: PortalRequestKind) -> Self {
        self.portal_kind = Some(kind);
        self
    }
}

/// The client-facing details of a site handover
#[derive(Clone, Debug)]
pub struct HandoverReport {
    pub checklist: HandoverChecklist,
    pub client_signature_name: String,
    pub remarks: String,
}

/// Command engine for the work order lifecycle.
///
/// Every command loads the order, validates the precondition, applies the
/// mutation together with its ledger entry, and persists the result as one
/// upsert.
pub struct DispatchEngine<S> {
    store: S,
    directory: Box<dyn TechnicianDirectory>,
    notifier: Arc<dyn DispatchNotifier>,
}

impl<S: WorkOrderStore> DispatchEngine<S> {
    pub fn new(store: S, directory: impl TechnicianDirectory + 'static) -> Self {
        Self {
            store,
            directory: Box::new(directory),
            notifier: Arc::new(NullNotifier),
        }
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn DispatchNotifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Create a new work order in `Pending` with an empty tracking log.
    ///
    /// The identifier series depends on the origin: ad-hoc orders take the
    /// next `SCT-WO-####`, portal requests a `REQ-` tail, maintenance
    /// orders an `MWO-` timestamp.
    pub fn create(&self, request: NewOrderRequest) -> DispatchResult<WorkOrder> {
        self.create_at(request, Utc::now())
    }

    pub fn create_at(
        &self,
        request: NewOrderRequest,
        now: DateTime<Utc>,
    ) -> DispatchResult<WorkOrder> {
        let id = match request.source {
            OrderSource::AdHoc => {
                let existing = self.store.list_order_ids().map_err(storage)?;
                fieldops_sequencer::next_work_order_id(existing.iter().map(|s| s.as_str()))
            }
            OrderSource::ClientPortal => fieldops_sequencer::client_request_id(now),
            OrderSource::Maintenance => fieldops_sequencer::maintenance_order_id(now),
        };

        let description = match (request.source, request.portal_kind) {
            (OrderSource::ClientPortal, Some(kind)) => {
                format!("{} {}", kind.description_tag(), request.description)
            }
            _ => request.description,
        };

        let order = WorkOrder {
            id: id.clone(),
            client_id: request.client_id,
            client_name: request.client_name,
            client_address: request.client_address,
            client_contact: request.client_contact,
            client_email: request.client_email,
            job_scope: request.job_scope,
            priority: request.priority,
            description,
            status: WorkOrderStatus::Pending,
            assigned_technician: None,
            assigned_technician_id: None,
            created_at: now,
            source: request.source,
            contract_id: request.contract_id,
            internal_notes: Vec::new(),
            check_in_time: None,
            check_out_time: None,
            check_in_location: None,
            check_out_location: None,
            current_location: None,
            total_duration_seconds: None,
            tracking_logs: Vec::new(),
        };

        self.store.upsert_order(order.clone()).map_err(storage)?;
        info!(order_id = %id, source = ?order.source, "work order created");
        Ok(order)
    }

    /// Assign (or reassign) a technician. The order must be `Pending` or
    /// `Assigned` and the technician must exist in the directory.
    pub fn assign(
        &self,
        order_id: &WorkOrderId,
        technician_id: &TechnicianId,
    ) -> DispatchResult<WorkOrder> {
        self.assign_at(order_id, technician_id, Utc::now())
    }

    pub fn assign_at(
        &self,
        order_id: &WorkOrderId,
        technician_id: &TechnicianId,
        now: DateTime<Utc>,
    ) -> DispatchResult<WorkOrder> {
        let mut order = self.load(order_id)?;
        self.require_transition(&order, WorkOrderStatus::Assigned)?;

        let technician = self
            .directory
            .lookup(technician_id)
            .ok_or_else(|| DispatchError::TechnicianNotFound(technician_id.clone()))?;

        order.status = WorkOrderStatus::Assigned;
        order.assigned_technician = Some(technician.name.clone());
        order.assigned_technician_id = Some(technician.id.clone());
        fieldops_ledger::append(
            &mut order,
            TrackingEvent::StatusChange,
            None,
            Some(format!("Order assigned to {}.", technician.name)),
            now,
        );

        self.store.upsert_order(order.clone()).map_err(storage)?;
        info!(order_id = %order_id, technician = %technician.id, "work order assigned");
        self.notifier.notify(DispatchEvent::OrderAssigned {
            order_id: order_id.clone(),
            technician_id: technician.id,
        });
        Ok(order)
    }

    /// Check in on site. Opens the live-tracking period.
    ///
    /// A duplicate check-in is rejected, not overwritten: the duration
    /// computation depends on the original check-in timestamp.
    pub fn check_in(
        &self,
        order_id: &WorkOrderId,
        position: Option<GeoPoint>,
    ) -> DispatchResult<WorkOrder> {
        self.check_in_at(order_id, position, Utc::now())
    }

    pub fn check_in_at(
        &self,
        order_id: &WorkOrderId,
        position: Option<GeoPoint>,
        now: DateTime<Utc>,
    ) -> DispatchResult<WorkOrder> {
        let mut order = self.load(order_id)?;
        if order.status != WorkOrderStatus::Assigned {
            return Err(DispatchError::NotAssigned(order_id.clone()));
        }
        if order.has_checked_in() {
            return Err(DispatchError::AlreadyCheckedIn(order_id.clone()));
        }

        order.check_in_time = Some(now);
        order.check_in_location = position;
        order.current_location = position;
        fieldops_ledger::append(
            &mut order,
            TrackingEvent::CheckIn,
            position,
            Some("Technician verified site arrival.".to_string()),
            now,
        );

        self.store.upsert_order(order.clone()).map_err(storage)?;
        info!(order_id = %order_id, located = position.is_some(), "checked in");
        Ok(order)
    }

    /// Refresh the rolling position during a live visit. Accepted only
    /// between check-in and check-out; updates apply in arrival order.
    pub fn location_update(
        &self,
        order_id: &WorkOrderId,
        position: GeoPoint,
    ) -> DispatchResult<WorkOrder> {
        self.location_update_at(order_id, position, Utc::now())
    }

    pub fn location_update_at(
        &self,
        order_id: &WorkOrderId,
        position: GeoPoint,
        now: DateTime<Utc>,
    ) -> DispatchResult<WorkOrder> {
        let mut order = self.load(order_id)?;
        if !order.is_on_site() {
            return Err(DispatchError::TrackingClosed(order_id.clone()));
        }

        order.current_location = Some(position);
        fieldops_ledger::append(
            &mut order,
            TrackingEvent::LocationUpdate,
            Some(position),
            None,
            now,
        );

        self.store.upsert_order(order.clone()).map_err(storage)?;
        Ok(order)
    }

    /// Check out from site. Freezes the visit duration, clears the rolling
    /// position and closes the live-tracking period.
    pub fn check_out(
        &self,
        order_id: &WorkOrderId,
        position: Option<GeoPoint>,
    ) -> DispatchResult<WorkOrder> {
        self.check_out_at(order_id, position, Utc::now())
    }

    pub fn check_out_at(
        &self,
        order_id: &WorkOrderId,
        position: Option<GeoPoint>,
        now: DateTime<Utc>,
    ) -> DispatchResult<WorkOrder> {
        let mut order = self.load(order_id)?;
        let check_in_time = order
            .check_in_time
            .ok_or_else(|| DispatchError::NotCheckedIn(order_id.clone()))?;
        if order.has_checked_out() {
            return Err(DispatchError::AlreadyCheckedOut(order_id.clone()));
        }

        let elapsed_ms = (now - check_in_time).num_milliseconds().max(0);
        order.check_out_time = Some(now);
        order.check_out_location = position;
        order.total_duration_seconds = Some(elapsed_ms as u64 / 1000);
        order.current_location = None;
        fieldops_ledger::append(
            &mut order,
            TrackingEvent::CheckOut,
            position,
            Some("Technician checked out from site.".to_string()),
            now,
        );

        self.store.upsert_order(order.clone()).map_err(storage)?;
        info!(
            order_id = %order_id,
            duration_seconds = order.total_duration_seconds,
            "checked out"
        );
        Ok(order)
    }

    /// Convenience: check in with a position acquired best-effort from a
    /// source. A source returning `None` does not block the check-in.
    pub fn check_in_from(
        &self,
        order_id: &WorkOrderId,
        source: &dyn PositionSource,
    ) -> DispatchResult<WorkOrder> {
        self.check_in(order_id, source.current_position())
    }

    /// Convenience: check out with a best-effort position.
    pub fn check_out_from(
        &self,
        order_id: &WorkOrderId,
        source: &dyn PositionSource,
    ) -> DispatchResult<WorkOrder> {
        self.check_out(order_id, source.current_position())
    }

    /// Mark site work finished. Requires a closed visit (checked out) and
    /// raises the completion notification for the review desk.
    pub fn complete(&self, order_id: &WorkOrderId, actor: &str) -> DispatchResult<WorkOrder> {
        self.complete_at(order_id, actor, Utc::now())
    }

    pub fn complete_at(
        &self,
        order_id: &WorkOrderId,
        actor: &str,
        now: DateTime<Utc>,
    ) -> DispatchResult<WorkOrder> {
        let mut order = self.load(order_id)?;
        self.require_transition(&order, WorkOrderStatus::Completed)?;
        if !order.has_checked_out() {
            return Err(DispatchError::NotCheckedOut(order_id.clone()));
        }

        order.status = WorkOrderStatus::Completed;
        fieldops_ledger::append(
            &mut order,
            TrackingEvent::StatusChange,
            None,
            Some(format!(
                "Technician {} marked job as COMPLETED. Physical site work finished.",
                actor
            )),
            now,
        );
        order.internal_notes.push(InternalNote {
            id: format!("NOTE-COMP-{}", now.timestamp_millis()),
            author: "SYSTEM".to_string(),
            text: format!(
                "NOTIFICATION: Technician {} has finalized Work Order {}. Ready for service report review and invoicing.",
                actor, order_id
            ),
            created_at: now,
        });

        self.store.upsert_order(order.clone()).map_err(storage)?;
        info!(order_id = %order_id, "work order completed");
        self.notifier.notify(DispatchEvent::OrderCompleted {
            order_id: order_id.clone(),
        });
        Ok(order)
    }

    /// Cancel an order that has not yet been completed. Terminal.
    pub fn cancel(&self, order_id: &WorkOrderId) -> DispatchResult<WorkOrder> {
        self.cancel_at(order_id, Utc::now())
    }

    pub fn cancel_at(
        &self,
        order_id: &WorkOrderId,
        now: DateTime<Utc>,
    ) -> DispatchResult<WorkOrder> {
        let mut order = self.load(order_id)?;
        self.require_transition(&order, WorkOrderStatus::Cancelled)?;

        order.status = WorkOrderStatus::Cancelled;
        fieldops_ledger::append(
            &mut order,
            TrackingEvent::StatusChange,
            None,
            Some("Work order cancelled.".to_string()),
            now,
        );

        self.store.upsert_order(order.clone()).map_err(storage)?;
        info!(order_id = %order_id, "work order cancelled");
        self.notifier.notify(DispatchEvent::OrderCancelled {
            order_id: order_id.clone(),
        });
        Ok(order)
    }

    /// Privileged override: set any status from any status, bypassing the
    /// transition table. Always logged with the actor's name; the only path
    /// that may move a work order backward.
    pub fn admin_set_status(
        &self,
        order_id: &WorkOrderId,
        new_status: WorkOrderStatus,
        actor: &str,
    ) -> DispatchResult<WorkOrder> {
        self.admin_set_status_at(order_id, new_status, actor, Utc::now())
    }

    pub fn admin_set_status_at(
        &self,
        order_id: &WorkOrderId,
        new_status: WorkOrderStatus,
        actor: &str,
        now: DateTime<Utc>,
    ) -> DispatchResult<WorkOrder> {
        let mut order = self.load(order_id)?;
        let previous = order.status;
        if new_status.rank() < previous.rank() {
            warn!(
                order_id = %order_id,
                from = %previous,
                to = %new_status,
                "administrator override moves status backward"
            );
        }

        order.status = new_status;
        fieldops_ledger::append(
            &mut order,
            TrackingEvent::StatusChange,
            None,
            Some(format!(
                "Administrator {} manually overridden status to: {}",
                actor,
                new_status.to_string().to_uppercase()
            )),
            now,
        );

        self.store.upsert_order(order.clone()).map_err(storage)?;
        Ok(order)
    }

    /// Append a note to the internal thread.
    pub fn add_internal_note(
        &self,
        order_id: &WorkOrderId,
        author: &str,
        text: &str,
    ) -> DispatchResult<WorkOrder> {
        self.add_internal_note_at(order_id, author, text, Utc::now())
    }

    pub fn add_internal_note_at(
        &self,
        order_id: &WorkOrderId,
        author: &str,
        text: &str,
        now: DateTime<Utc>,
    ) -> DispatchResult<WorkOrder> {
        if text.trim().is_empty() {
            return Err(DispatchError::InvalidInput(
                "internal note text must not be blank".to_string(),
            ));
        }

        let mut order = self.load(order_id)?;
        order.internal_notes.push(InternalNote {
            id: format!("NOTE-{}", now.timestamp_millis()),
            author: author.to_string(),
            text: text.to_string(),
            created_at: now,
        });

        self.store.upsert_order(order.clone()).map_err(storage)?;
        Ok(order)
    }

    /// Transition a completed (or handed over) order to `Invoiced`. The
    /// invoice identifier is allocated by the caller from the sequencer.
    pub fn mark_invoiced(
        &self,
        order_id: &WorkOrderId,
        invoice_id: &InvoiceId,
    ) -> DispatchResult<WorkOrder> {
        self.mark_invoiced_at(order_id, invoice_id, Utc::now())
    }

    pub fn mark_invoiced_at(
        &self,
        order_id: &WorkOrderId,
        invoice_id: &InvoiceId,
        now: DateTime<Utc>,
    ) -> DispatchResult<WorkOrder> {
        let mut order = self.load(order_id)?;
        self.require_transition(&order, WorkOrderStatus::Invoiced)?;

        order.status = WorkOrderStatus::Invoiced;
        fieldops_ledger::append(
            &mut order,
            TrackingEvent::StatusChange,
            None,
            Some(format!("Invoice {} issued for this work order.", invoice_id)),
            now,
        );

        self.store.upsert_order(order.clone()).map_err(storage)?;
        info!(order_id = %order_id, invoice_id = %invoice_id, "work order invoiced");
        Ok(order)
    }

    fn load(&self, order_id: &WorkOrderId) -> DispatchResult<WorkOrder> {
        self.store
            .get_order(order_id)
            .map_err(storage)?
            .ok_or_else(|| DispatchError::OrderNotFound(order_id.clone()))
    }

    fn require_transition(&self, order: &WorkOrder, to: WorkOrderStatus) -> DispatchResult<()> {
        if order.status.is_terminal() {
            return Err(DispatchError::Terminal {
                id: order.id.clone(),
                status: order.status,
            });
        }
        if !order.status.can_transition(to) {
            return Err(DispatchError::InvalidTransition {
                from: order.status,
                to,
            });
        }
        Ok(())
    }
}

impl<S: WorkOrderStore + HandoverStore> DispatchEngine<S> {
    /// Record the signed site handover for a completed order and move it to
    /// `Handover`.
    pub fn record_handover(
        &self,
        order_id: &WorkOrderId,
        report: HandoverReport,
    ) -> DispatchResult<SiteHandover> {
        self.record_handover_at(order_id, report, Utc::now())
    }

    pub fn record_handover_at(
        &self,
        order_id: &WorkOrderId,
        report: HandoverReport,
        now: DateTime<Utc>,
    ) -> DispatchResult<SiteHandover> {
        let mut order = self.load(order_id)?;
        self.require_transition(&order, WorkOrderStatus::Handover)?;

        let handover = SiteHandover {
            id: HandoverId::new(format!("HO-{}", now.timestamp_millis())),
            work_order_id: order_id.clone(),
            client_name: order.client_name.clone(),
            technician_name: order.assigned_technician.clone().unwrap_or_default(),
            handover_date: now,
            checklist: report.checklist,
            client_signature_name: report.client_signature_name.clone(),
            remarks: report.remarks,
        };

        order.status = WorkOrderStatus::Handover;
        fieldops_ledger::append(
            &mut order,
            TrackingEvent::StatusChange,
            None,
            Some(format!(
                "Site handover recorded; signed by {}.",
                report.client_signature_name
            )),
            now,
        );

        // Handover record first, then the order: a crash between the two
        // leaves the order in Completed, from which handover can be retried.
        self.store
            .upsert_handover(handover.clone())
            .map_err(storage)?;
        self.store.upsert_order(order).map_err(storage)?;
        info!(order_id = %order_id, handover_id = %handover.id, "site handover recorded");
        Ok(handover)
    }
}

fn storage(err: fieldops_store::StoreError) -> DispatchError {
    DispatchError::Storage(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{RecordingNotifier, StaticDirectory};
    use chrono::TimeZone;
    use fieldops_store::InMemoryOperationalStore;

    fn engine() -> (
        DispatchEngine<Arc<InMemoryOperationalStore>>,
        Arc<InMemoryOperationalStore>,
        Arc<RecordingNotifier>,
    ) {
        let store = Arc::new(InMemoryOperationalStore::new());
        let notifier = Arc::new(RecordingNotifier::new());
        let directory = StaticDirectory::new()
            .with_technician("T1", "Aisyah Rahman")
            .with_technician("T2", "Marcus Tan");
        let engine = DispatchEngine::new(Arc::clone(&store), directory)
            .with_notifier(Arc::clone(&notifier) as Arc<dyn DispatchNotifier>);
        (engine, store, notifier)
    }

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 20, hour, minute, 0).unwrap()
    }

    fn cctv_request() -> NewOrderRequest {
        NewOrderRequest::new(
            "Harbour Logistics",
            JobScope::Cctv,
            "Camera 4 offline at loading bay",
            OrderSource::AdHoc,
        )
        .with_client(
            ClientId::new("C-1"),
            "7 Quay Road",
            "6100 0000",
            "ops@harbour.example",
        )
    }

    #[test]
    fn test_create_allocates_sequential_id() {
        let (engine, _, _) = engine();
        let first = engine.create_at(cctv_request(), at(8, 0)).unwrap();
        let second = engine.create_at(cctv_request(), at(8, 1)).unwrap();
        assert_eq!(first.id.as_str(), "SCT-WO-0001");
        assert_eq!(second.id.as_str(), "SCT-WO-0002");
        assert_eq!(first.status, WorkOrderStatus::Pending);
        assert!(first.tracking_logs.is_empty());
    }

    #[test]
    fn test_portal_request_gets_tagged_description_and_req_id() {
        let (engine, _, _) = engine();
        let request = NewOrderRequest::new(
            "Harbour Logistics",
            JobScope::Intercom,
            "Lobby intercom crackles",
            OrderSource::ClientPortal,
        )
        .with_portal_kind(PortalRequestKind::ServiceRepair);

        let order = engine.create_at(request, at(9, 0)).unwrap();
        assert!(order.id.as_str().starts_with("REQ-"));
        assert!(order.description.starts_with("[MAINTENANCE/REPAIR] "));
    }

    #[test]
    fn test_full_visit_scenario() {
        let (engine, _, notifier) = engine();
        let order = engine.create_at(cctv_request(), at(8, 0)).unwrap();
        assert_eq!(order.status, WorkOrderStatus::Pending);
        assert!(order.tracking_logs.is_empty());

        let order = engine
            .assign_at(&order.id, &TechnicianId::new("T1"), at(8, 30))
            .unwrap();
        assert_eq!(order.status, WorkOrderStatus::Assigned);
        assert_eq!(order.assigned_technician.as_deref(), Some("Aisyah Rahman"));
        assert_eq!(order.tracking_logs.len(), 1);
        assert_eq!(order.tracking_logs[0].event, TrackingEvent::StatusChange);

        let site = GeoPoint::new(1.2903, 103.8515);
        let order = engine.check_in_at(&order.id, Some(site), at(9, 0)).unwrap();
        assert!(order.check_in_time.is_some());
        assert_eq!(order.current_location, Some(site));
        assert_eq!(order.tracking_logs.len(), 2);
        assert_eq!(order.tracking_logs[1].event, TrackingEvent::CheckIn);

        // Check out exactly one hour later.
        let order = engine.check_out_at(&order.id, Some(site), at(10, 0)).unwrap();
        assert_eq!(order.total_duration_seconds, Some(3600));
        assert!(order.current_location.is_none());
        assert_eq!(order.tracking_logs[2].event, TrackingEvent::CheckOut);

        let order = engine
            .complete_at(&order.id, "Aisyah Rahman", at(10, 5))
            .unwrap();
        assert_eq!(order.status, WorkOrderStatus::Completed);
        assert_eq!(order.internal_notes.len(), 1);
        assert_eq!(order.internal_notes[0].author, "SYSTEM");

        let events = notifier.events();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], DispatchEvent::OrderAssigned { .. }));
        assert!(matches!(events[1], DispatchEvent::OrderCompleted { .. }));
    }

    #[test]
    fn test_duration_floors_and_never_negative() {
        let (engine, _, _) = engine();
        let order = engine.create_at(cctv_request(), at(8, 0)).unwrap();
        engine
            .assign_at(&order.id, &TechnicianId::new("T1"), at(8, 1))
            .unwrap();

        let check_in = Utc.with_ymd_and_hms(2026, 8, 20, 9, 0, 0).unwrap();
        engine.check_in_at(&order.id, None, check_in).unwrap();

        // 90.7 seconds elapsed floors to 90.
        let check_out = check_in + chrono::Duration::milliseconds(90_700);
        let order = engine.check_out_at(&order.id, None, check_out).unwrap();
        assert_eq!(order.total_duration_seconds, Some(90));
    }

    #[test]
    fn test_clock_skew_clamps_duration_to_zero() {
        let (engine, _, _) = engine();
        let order = engine.create_at(cctv_request(), at(8, 0)).unwrap();
        engine
            .assign_at(&order.id, &TechnicianId::new("T1"), at(8, 1))
            .unwrap();
        engine.check_in_at(&order.id, None, at(10, 0)).unwrap();

        let order = engine.check_out_at(&order.id, None, at(9, 0)).unwrap();
        assert_eq!(order.total_duration_seconds, Some(0));
    }

    #[test]
    fn test_duplicate_check_in_rejected_without_ledger_entry() {
        let (engine, store, _) = engine();
        let order = engine.create_at(cctv_request(), at(8, 0)).unwrap();
        engine
            .assign_at(&order.id, &TechnicianId::new("T1"), at(8, 1))
            .unwrap();
        let first = engine.check_in_at(&order.id, None, at(9, 0)).unwrap();

        let err = engine.check_in_at(&order.id, None, at(9, 30)).unwrap_err();
        assert!(matches!(err, DispatchError::AlreadyCheckedIn(_)));

        let stored = store.get_order(&order.id).unwrap().unwrap();
        assert_eq!(stored.check_in_time, first.check_in_time);
        assert_eq!(stored.tracking_logs.len(), first.tracking_logs.len());
    }

    #[test]
    fn test_check_out_without_check_in_fails_loudly() {
        let (engine, store, _) = engine();
        let order = engine.create_at(cctv_request(), at(8, 0)).unwrap();
        engine
            .assign_at(&order.id, &TechnicianId::new("T1"), at(8, 1))
            .unwrap();

        let err = engine.check_out_at(&order.id, None, at(9, 0)).unwrap_err();
        assert!(matches!(err, DispatchError::NotCheckedIn(_)));

        let stored = store.get_order(&order.id).unwrap().unwrap();
        assert!(stored.check_out_time.is_none());
        assert!(stored.total_duration_seconds.is_none());
        // Only the assignment entry; the rejected command appended nothing.
        assert_eq!(stored.tracking_logs.len(), 1);
    }

    #[test]
    fn test_location_updates_only_during_live_visit() {
        let (engine, _, _) = engine();
        let order = engine.create_at(cctv_request(), at(8, 0)).unwrap();
        engine
            .assign_at(&order.id, &TechnicianId::new("T1"), at(8, 1))
            .unwrap();

        let moving = GeoPoint::new(1.30, 103.84);
        let err = engine
            .location_update_at(&order.id, moving, at(8, 30))
            .unwrap_err();
        assert!(matches!(err, DispatchError::TrackingClosed(_)));

        engine.check_in_at(&order.id, None, at(9, 0)).unwrap();
        let order_live = engine
            .location_update_at(&order.id, moving, at(9, 10))
            .unwrap();
        assert_eq!(order_live.current_location, Some(moving));

        engine.check_out_at(&order.id, None, at(10, 0)).unwrap();
        let err = engine
            .location_update_at(&order.id, moving, at(10, 1))
            .unwrap_err();
        assert!(matches!(err, DispatchError::TrackingClosed(_)));
    }

    #[test]
    fn test_complete_requires_check_out() {
        let (engine, _, _) = engine();
        let order = engine.create_at(cctv_request(), at(8, 0)).unwrap();
        engine
            .assign_at(&order.id, &TechnicianId::new("T1"), at(8, 1))
            .unwrap();
        engine.check_in_at(&order.id, None, at(9, 0)).unwrap();

        let err = engine
            .complete_at(&order.id, "Aisyah Rahman", at(9, 30))
            .unwrap_err();
        assert!(matches!(err, DispatchError::NotCheckedOut(_)));
    }

    #[test]
    fn test_assignment_requires_known_technician() {
        let (engine, _, _) = engine();
        let order = engine.create_at(cctv_request(), at(8, 0)).unwrap();
        let err = engine
            .assign_at(&order.id, &TechnicianId::new("T9"), at(8, 1))
            .unwrap_err();
        assert!(matches!(err, DispatchError::TechnicianNotFound(_)));
    }

    #[test]
    fn test_reassignment_permitted_while_assigned() {
        let (engine, _, _) = engine();
        let order = engine.create_at(cctv_request(), at(8, 0)).unwrap();
        engine
            .assign_at(&order.id, &TechnicianId::new("T1"), at(8, 1))
            .unwrap();
        let order = engine
            .assign_at(&order.id, &TechnicianId::new("T2"), at(8, 2))
            .unwrap();
        assert_eq!(order.assigned_technician.as_deref(), Some("Marcus Tan"));
        assert_eq!(order.tracking_logs.len(), 2);
    }

    #[test]
    fn test_cancel_terminal_and_admin_override_recovers() {
        let (engine, _, notifier) = engine();
        let order = engine.create_at(cctv_request(), at(8, 0)).unwrap();
        let order = engine.cancel_at(&order.id, at(8, 5)).unwrap();
        assert_eq!(order.status, WorkOrderStatus::Cancelled);

        let err = engine
            .assign_at(&order.id, &TechnicianId::new("T1"), at(8, 10))
            .unwrap_err();
        assert!(matches!(err, DispatchError::Terminal { .. }));

        // Privileged escape hatch: backward move, logged with the actor.
        let order = engine
            .admin_set_status_at(&order.id, WorkOrderStatus::Pending, "J. Koh", at(8, 15))
            .unwrap();
        assert_eq!(order.status, WorkOrderStatus::Pending);
        let last = order.tracking_logs.last().unwrap();
        assert_eq!(last.event, TrackingEvent::StatusChange);
        assert!(last
            .note
            .as_deref()
            .unwrap()
            .contains("Administrator J. Koh manually overridden status to: PENDING"));

        assert!(notifier
            .events()
            .iter()
            .any(|e| matches!(e, DispatchEvent::OrderCancelled { .. })));
    }

    #[test]
    fn test_unknown_order_is_explicit_error() {
        let (engine, _, _) = engine();
        let err = engine
            .check_in_at(&WorkOrderId::new("SCT-WO-9999"), None, at(9, 0))
            .unwrap_err();
        assert!(matches!(err, DispatchError::OrderNotFound(_)));
    }

    #[test]
    fn test_internal_note_rejects_blank_text() {
        let (engine, _, _) = engine();
        let order = engine.create_at(cctv_request(), at(8, 0)).unwrap();
        let err = engine
            .add_internal_note_at(&order.id, "J. Koh", "   ", at(8, 1))
            .unwrap_err();
        assert!(matches!(err, DispatchError::InvalidInput(_)));

        let order = engine
            .add_internal_note_at(&order.id, "J. Koh", "Client gate code is 4482", at(8, 2))
            .unwrap();
        assert_eq!(order.internal_notes.len(), 1);
    }

    #[test]
    fn test_handover_then_invoice_path() {
        let (engine, store, _) = engine();
        let order = engine.create_at(cctv_request(), at(8, 0)).unwrap();
        engine
            .assign_at(&order.id, &TechnicianId::new("T1"), at(8, 1))
            .unwrap();
        engine.check_in_at(&order.id, None, at(9, 0)).unwrap();
        engine.check_out_at(&order.id, None, at(10, 0)).unwrap();
        engine
            .complete_at(&order.id, "Aisyah Rahman", at(10, 5))
            .unwrap();

        let report = HandoverReport {
            checklist: HandoverChecklist {
                system_tested: true,
                area_cleaned: true,
                manuals_explained: true,
                defects_reported: false,
            },
            client_signature_name: "D. Lim".to_string(),
            remarks: "All cameras verified on the client's monitor.".to_string(),
        };
        let handover = engine
            .record_handover_at(&order.id, report, at(11, 0))
            .unwrap();
        assert_eq!(handover.technician_name, "Aisyah Rahman");
        assert!(store
            .handover_for_order(&order.id)
            .unwrap()
            .is_some());

        let stored = store.get_order(&order.id).unwrap().unwrap();
        assert_eq!(stored.status, WorkOrderStatus::Handover);

        let order = engine
            .mark_invoiced_at(&order.id, &InvoiceId::new("INV-2026-001"), at(12, 0))
            .unwrap();
        assert_eq!(order.status, WorkOrderStatus::Invoiced);
        assert!(order.status.is_terminal());
    }

    #[test]
    fn test_handover_requires_completed_status() {
        let (engine, _, _) = engine();
        let order = engine.create_at(cctv_request(), at(8, 0)).unwrap();
        let report = HandoverReport {
            checklist: HandoverChecklist::default(),
            client_signature_name: "D. Lim".to_string(),
            remarks: String::new(),
        };
        let err = engine
            .record_handover_at(&order.id, report, at(9, 0))
            .unwrap_err();
        assert!(matches!(err, DispatchError::InvalidTransition { .. }));
    }

    #[test]
    fn test_position_source_degrades_without_blocking() {
        use crate::{FixedPosition, NoPosition};

        let (engine, _, _) = engine();
        let order = engine.create_at(cctv_request(), at(8, 0)).unwrap();
        engine
            .assign_at(&order.id, &TechnicianId::new("T1"), at(8, 1))
            .unwrap();

        // No geolocation available: the check-in proceeds without it, and
        // the absence is distinguishable from a captured position.
        let order = engine.check_in_from(&order.id, &NoPosition).unwrap();
        assert!(order.check_in_time.is_some());
        assert!(order.check_in_location.is_none());

        let order = engine
            .check_out_from(&order.id, &FixedPosition(GeoPoint::new(1.29, 103.85)))
            .unwrap();
        assert!(order.check_out_location.is_some());
    }

    #[test]
    fn test_ledger_stays_chronological_through_full_flow() {
        let (engine, store, _) = engine();
        let order = engine.create_at(cctv_request(), at(8, 0)).unwrap();
        engine
            .assign_at(&order.id, &TechnicianId::new("T1"), at(8, 1))
            .unwrap();
        engine.check_in_at(&order.id, None, at(9, 0)).unwrap();
        engine
            .location_update_at(&order.id, GeoPoint::new(1.29, 103.85), at(9, 20))
            .unwrap();
        engine.check_out_at(&order.id, None, at(10, 0)).unwrap();

        let stored = store.get_order(&order.id).unwrap().unwrap();
        assert!(fieldops_ledger::is_chronological(&stored));
    }
}
