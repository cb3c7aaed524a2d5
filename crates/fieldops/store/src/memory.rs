//! In-memory reference implementation of the operational store traits.
//!
//! Deterministic and test-friendly. Lock poisoning is surfaced as a backend
//! error rather than a panic.

use crate::traits::{ContractStore, HandoverStore, WorkOrderStore};
use crate::{StoreError, StoreResult};
use fieldops_types::{
    ContractId, HandoverId, MaintenanceContract, SiteHandover, WorkOrder, WorkOrderId,
};
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory operational store adapter.
#[derive(Default)]
pub struct InMemoryOperationalStore {
    orders: RwLock<HashMap<WorkOrderId, WorkOrder>>,
    contracts: RwLock<HashMap<ContractId, MaintenanceContract>>,
    handovers: RwLock<HashMap<HandoverId, SiteHandover>>,
}

impl InMemoryOperationalStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned(which: &str) -> StoreError {
    StoreError::Backend(format!("{} lock poisoned", which))
}

impl WorkOrderStore for InMemoryOperationalStore {
    fn get_order(&self, id: &WorkOrderId) -> StoreResult<Option<WorkOrder>> {
        let guard = self.orders.read().map_err(|_| poisoned("orders"))?;
        Ok(guard.get(id).cloned())
    }

    fn upsert_order(&self, order: WorkOrder) -> StoreResult<()> {
        let mut guard = self.orders.write().map_err(|_| poisoned("orders"))?;
        guard.insert(order.id.clone(), order);
        Ok(())
    }

    fn list_orders(&self) -> StoreResult<Vec<WorkOrder>> {
        let guard = self.orders.read().map_err(|_| poisoned("orders"))?;
        let mut orders: Vec<_> = guard.values().cloned().collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }

    fn list_order_ids(&self) -> StoreResult<Vec<String>> {
        let guard = self.orders.read().map_err(|_| poisoned("orders"))?;
        Ok(guard.keys().map(|id| id.as_str().to_string()).collect())
    }
}

impl ContractStore for InMemoryOperationalStore {
    fn get_contract(&self, id: &ContractId) -> StoreResult<Option<MaintenanceContract>> {
        let guard = self.contracts.read().map_err(|_| poisoned("contracts"))?;
        Ok(guard.get(id).cloned())
    }

    fn upsert_contract(&self, contract: MaintenanceContract) -> StoreResult<()> {
        let mut guard = self.contracts.write().map_err(|_| poisoned("contracts"))?;
        guard.insert(contract.id.clone(), contract);
        Ok(())
    }

    fn list_contracts(&self) -> StoreResult<Vec<MaintenanceContract>> {
        let guard = self.contracts.read().map_err(|_| poisoned("contracts"))?;
        let mut contracts: Vec<_> = guard.values().cloned().collect();
        contracts.sort_by(|a, b| a.start_date.cmp(&b.start_date));
        Ok(contracts)
    }
}

impl HandoverStore for InMemoryOperationalStore {
    fn get_handover(&self, id: &HandoverId) -> StoreResult<Option<SiteHandover>> {
        let guard = self.handovers.read().map_err(|_| poisoned("handovers"))?;
        Ok(guard.get(id).cloned())
    }

    fn upsert_handover(&self, handover: SiteHandover) -> StoreResult<()> {
        let mut guard = self.handovers.write().map_err(|_| poisoned("handovers"))?;
        guard.insert(handover.id.clone(), handover);
        Ok(())
    }

    fn handover_for_order(&self, order_id: &WorkOrderId) -> StoreResult<Option<SiteHandover>> {
        let guard = self.handovers.read().map_err(|_| poisoned("handovers"))?;
        Ok(guard
            .values()
            .find(|h| &h.work_order_id == order_id)
            .cloned())
    }
}
