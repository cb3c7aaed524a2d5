//! Maintenance scheduler - regenerates recurring jobs from standing contracts
//!
//! A generation pass scans every active contract whose `next_service_date`
//! has come due, synthesizes exactly one new work order per due contract and
//! advances the contract's next service date by one frequency period -
//! computed from the previous due date, not from the clock, so a late run
//! never compresses or skips the cadence. Overdue contracts do not catch up
//! with backlog orders.
//!
//! The pass is a single synchronous sweep intended for a manual trigger or a
//! periodic timer; it must not run concurrently with itself over the same
//! contract set. A failure on one contract is collected and reported, and
//! the remaining due contracts are still processed.

#![deny(unsafe_code)]

use chrono::{DateTime, Utc};
use fieldops_lifecycle::{DispatchEngine, NewOrderRequest};
use fieldops_store::{ContractStore, WorkOrderStore};
use fieldops_types::{
    ContractId, ContractStatus, DispatchError, DispatchResult, MaintenanceContract, OrderSource,
    WorkOrder, WorkOrderPriority,
};
use tracing::{info, warn};

/// Outcome of one generation pass
#[derive(Debug, Default)]
pub struct GenerationReport {
    /// Orders generated in this pass, one per due contract
    pub new_work_orders: Vec<WorkOrder>,
    /// Contracts whose next service date was advanced
    pub updated_contracts: Vec<MaintenanceContract>,
    /// Contracts that failed, with the reason; the pass continued past them
    pub failures: Vec<(ContractId, DispatchError)>,
}

impl GenerationReport {
    pub fn generated_count(&self) -> usize {
        self.new_work_orders.len()
    }

    /// "N orders generated" vs "nothing due" for the caller's report.
    pub fn nothing_due(&self) -> bool {
        self.new_work_orders.is_empty() && self.failures.is_empty()
    }
}

/// Scans contracts and emits due work orders through the dispatch engine.
pub struct MaintenanceScheduler<S> {
    store: S,
}

impl<S: ContractStore + WorkOrderStore> MaintenanceScheduler<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Administrator action: register a new standing contract. The first
    /// service falls due on the start date.
    pub fn add_contract(&self, contract: MaintenanceContract) -> DispatchResult<()> {
        self.store
            .upsert_contract(contract)
            .map_err(|e| DispatchError::Storage(e.to_string()))
    }

    /// Administrator action: suspend, reactivate or expire a contract.
    /// Suspended and expired contracts are skipped by the generation pass.
    pub fn set_contract_status(
        &self,
        contract_id: &ContractId,
        status: ContractStatus,
    ) -> DispatchResult<MaintenanceContract> {
        let mut contract = self
            .store
            .get_contract(contract_id)
            .map_err(|e| DispatchError::Storage(e.to_string()))?
            .ok_or_else(|| DispatchError::ContractNotFound(contract_id.clone()))?;
        contract.status = status;
        self.store
            .upsert_contract(contract.clone())
            .map_err(|e| DispatchError::Storage(e.to_string()))?;
        Ok(contract)
    }

    /// Run one generation pass at the given instant.
    ///
    /// For every active contract with `next_service_date <= now`: create one
    /// work order (origin maintenance, standard priority, scope and client
    /// copied from the contract) and advance the contract by one period of
    /// its frequency from the previous due date.
    pub fn run_due_generation(
        &self,
        engine: &DispatchEngine<S>,
        now: DateTime<Utc>,
    ) -> DispatchResult<GenerationReport> {
        let today = now.date_naive();
        let contracts = self
            .store
            .list_contracts()
            .map_err(|e| DispatchError::Storage(e.to_string()))?;

        let mut report = GenerationReport::default();

        for contract in contracts {
            if !contract.is_due(today) {
                continue;
            }

            match self.generate_for(engine, &contract, now) {
                Ok((order, updated)) => {
                    report.new_work_orders.push(order);
                    report.updated_contracts.push(updated);
                }
                Err(err) => {
                    warn!(
                        contract_id = %contract.id,
                        error = %err,
                        "contract generation failed; continuing pass"
                    );
                    report.failures.push((contract.id.clone(), err));
                }
            }
        }

        if report.nothing_due() {
            info!("generation pass: nothing due");
        } else {
            info!(
                generated = report.generated_count(),
                failed = report.failures.len(),
                "generation pass finished"
            );
        }
        Ok(report)
    }

    /// One contract's share of the pass: create the order, then advance the
    /// due date. The date is advanced only after the order exists, so a
    /// failed creation leaves the contract due for the next pass.
    fn generate_for(
        &self,
        engine: &DispatchEngine<S>,
        contract: &MaintenanceContract,
        now: DateTime<Utc>,
    ) -> DispatchResult<(WorkOrder, MaintenanceContract)> {
        let mut request = NewOrderRequest::new(
            contract.client_name.clone(),
            contract.job_scope,
            format!("[RECURRING MAINTENANCE] {}", contract.description),
            OrderSource::Maintenance,
        )
        .with_priority(WorkOrderPriority::Standard)
        .with_contract(contract.id.clone());
        request.client_id = Some(contract.client_id.clone());

        let order = engine.create_at(request, now)?;

        let mut updated = contract.clone();
        updated.next_service_date = contract.frequency.advance(contract.next_service_date);
        self.store
            .upsert_contract(updated.clone())
            .map_err(|e| DispatchError::Storage(e.to_string()))?;

        Ok((order, updated))
    }
}
