//! End-to-end: a standing contract spawns a work order that runs the full
//! dispatch lifecycle through to invoicing, while the contract's cadence
//! advances exactly one period.

use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};
use fieldops_lifecycle::{
    DispatchEngine, HandoverReport, StaticDirectory,
};
use fieldops_scheduler::MaintenanceScheduler;
use fieldops_store::{ContractStore, InMemoryOperationalStore, WorkOrderStore};
use fieldops_types::{
    ClientId, ContractId, GeoPoint, HandoverChecklist, JobScope, MaintenanceContract,
    MaintenanceFrequency, TechnicianId, WorkOrderStatus,
};
use std::sync::Arc;

fn at(day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 8, day, hour, minute, 0).unwrap()
}

#[test]
fn contract_to_invoice_round_trip() {
    let store = Arc::new(InMemoryOperationalStore::new());
    let directory = StaticDirectory::new().with_technician("T1", "Aisyah Rahman");
    let engine = DispatchEngine::new(Arc::clone(&store), directory);
    let scheduler = MaintenanceScheduler::new(Arc::clone(&store));

    scheduler
        .add_contract(MaintenanceContract::new(
            ContractId::new("MC-4810"),
            ClientId::new("C-7"),
            "Northgate Mall",
            JobScope::CardAccess,
            MaintenanceFrequency::Quarterly,
            "Reader head cleaning and firmware check",
            NaiveDate::from_ymd_opt(2026, 8, 1).unwrap(),
            1500.0,
        ))
        .unwrap();

    // Generation pass: one due contract, one order.
    let report = scheduler.run_due_generation(&engine, at(23, 8, 0)).unwrap();
    assert_eq!(report.generated_count(), 1);
    let order_id = report.new_work_orders[0].id.clone();
    assert!(order_id.as_str().starts_with("MWO-"));

    let contract = store
        .get_contract(&ContractId::new("MC-4810"))
        .unwrap()
        .unwrap();
    assert_eq!(
        contract.next_service_date,
        NaiveDate::from_ymd_opt(2026, 11, 1).unwrap()
    );

    // A second pass on the same day finds nothing due.
    let repeat = scheduler.run_due_generation(&engine, at(23, 9, 0)).unwrap();
    assert!(repeat.nothing_due());

    // The generated order runs the normal lifecycle.
    engine
        .assign_at(&order_id, &TechnicianId::new("T1"), at(24, 8, 0))
        .unwrap();
    engine
        .check_in_at(&order_id, Some(GeoPoint::new(1.3521, 103.8198)), at(24, 9, 0))
        .unwrap();
    let order = engine.check_out_at(&order_id, None, at(24, 11, 30)).unwrap();
    assert_eq!(order.total_duration_seconds, Some(2 * 3600 + 1800));

    engine
        .complete_at(&order_id, "Aisyah Rahman", at(24, 11, 35))
        .unwrap();
    engine
        .record_handover_at(
            &order_id,
            HandoverReport {
                checklist: HandoverChecklist {
                    system_tested: true,
                    area_cleaned: true,
                    manuals_explained: true,
                    defects_reported: false,
                },
                client_signature_name: "D. Lim".to_string(),
                remarks: "All readers responding.".to_string(),
            },
            at(25, 10, 0),
        )
        .unwrap();

    // Invoice ID allocated from the per-year series, then the terminal move.
    let now = at(25, 10, 30);
    let invoice_id = fieldops_sequencer::next_invoice_id(std::iter::empty::<&str>(), now.year());
    assert_eq!(invoice_id.as_str(), "INV-2026-001");

    let order = engine
        .mark_invoiced_at(&order_id, &invoice_id, now)
        .unwrap();
    assert_eq!(order.status, WorkOrderStatus::Invoiced);

    // The ledger kept insertion order chronological throughout.
    let stored = store.get_order(&order_id).unwrap().unwrap();
    assert!(fieldops_ledger::is_chronological(&stored));
    assert_eq!(stored.tracking_logs.len(), 6);
}
