use crate::StoreResult;
use fieldops_types::{
    ContractId, HandoverId, MaintenanceContract, SiteHandover, WorkOrder, WorkOrderId,
};
use std::sync::Arc;

/// Storage interface for work order records.
pub trait WorkOrderStore: Send + Sync {
    /// Get one work order by id.
    fn get_order(&self, id: &WorkOrderId) -> StoreResult<Option<WorkOrder>>;

    /// Insert or replace a work order record.
    fn upsert_order(&self, order: WorkOrder) -> StoreResult<()>;

    /// List all work orders, newest-first by creation time.
    fn list_orders(&self) -> StoreResult<Vec<WorkOrder>>;

    /// List all work order identifier strings.
    ///
    /// The identity sequencer re-scans this set before every allocation.
    fn list_order_ids(&self) -> StoreResult<Vec<String>>;
}

/// Storage interface for maintenance contract records.
pub trait ContractStore: Send + Sync {
    fn get_contract(&self, id: &ContractId) -> StoreResult<Option<MaintenanceContract>>;

    fn upsert_contract(&self, contract: MaintenanceContract) -> StoreResult<()>;

    /// List all contracts, oldest start date first.
    fn list_contracts(&self) -> StoreResult<Vec<MaintenanceContract>>;
}

/// Storage interface for site handover records.
pub trait HandoverStore: Send + Sync {
    fn get_handover(&self, id: &HandoverId) -> StoreResult<Option<SiteHandover>>;

    fn upsert_handover(&self, handover: SiteHandover) -> StoreResult<()>;

    /// Handover record for a given work order, if one exists.
    fn handover_for_order(&self, order_id: &WorkOrderId) -> StoreResult<Option<SiteHandover>>;
}

/// The full operational store the dispatch core runs against.
pub trait OperationalStore: WorkOrderStore + ContractStore + HandoverStore {}

impl<T: WorkOrderStore + ContractStore + HandoverStore> OperationalStore for T {}

// A shared handle to a store is itself a store, so the lifecycle engine and
// the scheduler can run against the same backend.

impl<T: WorkOrderStore + ?Sized> WorkOrderStore for Arc<T> {
    fn get_order(&self, id: &WorkOrderId) -> StoreResult<Option<WorkOrder>> {
        (**self).get_order(id)
    }

    fn upsert_order(&self, order: WorkOrder) -> StoreResult<()> {
        (**self).upsert_order(order)
    }

    fn list_orders(&self) -> StoreResult<Vec<WorkOrder>> {
        (**self).list_orders()
    }

    fn list_order_ids(&self) -> StoreResult<Vec<String>> {
        (**self).list_order_ids()
    }
}

impl<T: ContractStore + ?Sized> ContractStore for Arc<T> {
    fn get_contract(&self, id: &ContractId) -> StoreResult<Option<MaintenanceContract>> {
        (**self).get_contract(id)
    }

    fn upsert_contract(&self, contract: MaintenanceContract) -> StoreResult<()> {
        (**self).upsert_contract(contract)
    }

    fn list_contracts(&self) -> StoreResult<Vec<MaintenanceContract>> {
        (**self).list_contracts()
    }
}

impl<T: HandoverStore + ?Sized> HandoverStore for Arc<T> {
    fn get_handover(&self, id: &HandoverId) -> StoreResult<Option<SiteHandover>> {
        (**self).get_handover(id)
    }

    fn upsert_handover(&self, handover: SiteHandover) -> StoreResult<()> {
        (**self).upsert_handover(handover)
    }

    fn handover_for_order(&self, order_id: &WorkOrderId) -> StoreResult<Option<SiteHandover>> {
        (**self).handover_for_order(order_id)
    }
}
