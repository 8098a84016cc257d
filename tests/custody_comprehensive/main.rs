//! Custody Ledger Comprehensive Test Suite
//!
//! End-to-end tests through the typed `Custody` facade:
//!
//! 1. Creation and the full custody lifecycle
//! 2. Exchange, the only two-record operation
//! 3. Queries (lookup, uniqueness, enumeration)
//! 4. Concurrency and injected store faults
//! 5. Configuration and access modes
//! 6. Legacy wire format compatibility
//! 7. Identifier properties
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --test custody_comprehensive
//! cargo test --test custody_comprehensive lifecycle::
//! ```

use std::sync::Arc;

use custody::prelude::*;
use custody::DeviceLedger;
use custody_storage::FaultyStore;

pub mod config;
pub mod exchange;
pub mod legacy_format;

// =============================================================================
// SHARED TEST UTILITIES
// =============================================================================

/// One step of the happy path: who calls, what, to whom, with which consignment
pub struct Step {
    pub caller: Affiliation,
    pub op: Transition,
    pub recipient: &'static str,
    pub consignment: Option<&'static str>,
    pub status: DeviceStatus,
    pub owner: &'static str,
}

/// The ten transitions from creation back to the vendor
pub const HAPPY_PATH: [Step; 10] = [
    Step {
        caller: Affiliation::Vendor,
        op: Transition::DeliverToWarehouse,
        recipient: "WAREHOUSE",
        consignment: Some("CN-1"),
        status: DeviceStatus::DeliveredToWarehouse,
        owner: "VENDOR",
    },
    Step {
        caller: Affiliation::Warehouse,
        op: Transition::AcceptFromVendor,
        recipient: "WAREHOUSE",
        consignment: None,
        status: DeviceStatus::Received,
        owner: "WAREHOUSE",
    },
    Step {
        caller: Affiliation::Warehouse,
        op: Transition::DeliverToStore,
        recipient: "STORE",
        consignment: Some("CN-2"),
        status: DeviceStatus::DeliveredToStore,
        owner: "WAREHOUSE",
    },
    Step {
        caller: Affiliation::Store,
        op: Transition::AcceptFromWarehouse,
        recipient: "STORE",
        consignment: None,
        status: DeviceStatus::Received,
        owner: "STORE",
    },
    Step {
        caller: Affiliation::Store,
        op: Transition::SellToCustomer,
        recipient: "CUSTOMER",
        consignment: None,
        status: DeviceStatus::DeliveredToCustomer,
        owner: "CUSTOMER",
    },
    Step {
        caller: Affiliation::Store,
        op: Transition::ReturnFromCustomer,
        recipient: "STORE",
        consignment: None,
        status: DeviceStatus::ReturnedToStore,
        owner: "STORE",
    },
    Step {
        caller: Affiliation::Store,
        op: Transition::ReturnToWarehouse,
        recipient: "WAREHOUSE",
        consignment: Some("CN-3"),
        status: DeviceStatus::ReturnedToWarehouse,
        owner: "STORE",
    },
    Step {
        caller: Affiliation::Warehouse,
        op: Transition::AcceptReturnFromStore,
        recipient: "WAREHOUSE",
        consignment: None,
        status: DeviceStatus::Received,
        owner: "WAREHOUSE",
    },
    Step {
        caller: Affiliation::Warehouse,
        op: Transition::ReturnToVendor,
        recipient: "VENDOR",
        consignment: Some("CN-4"),
        status: DeviceStatus::ReturnedToVendor,
        owner: "WAREHOUSE",
    },
    Step {
        caller: Affiliation::Vendor,
        op: Transition::AcceptReturnFromWarehouse,
        recipient: "VENDOR",
        consignment: None,
        status: DeviceStatus::Received,
        owner: "VENDOR",
    },
];

impl Step {
    /// Arguments for this step
    pub fn args(&self) -> TransitionArgs {
        let args = TransitionArgs::new(Caller::party(self.caller), self.recipient);
        match self.consignment {
            Some(c) => args.with_consignment(c),
            None => args,
        }
    }

    /// Run this step against `id`
    pub fn run(&self, ledger: &Custody, id: &str) -> custody::Result<TransitionReceipt> {
        ledger.transition(self.op, id, self.args())
    }
}

/// Create an in-memory ledger
pub fn create_ledger() -> Custody {
    Custody::ephemeral().expect("Failed to create ephemeral ledger")
}

/// Create a ledger and keep a handle on its store
pub fn create_ledger_with_store() -> (Arc<MemoryStore>, Custody) {
    let store = Arc::new(MemoryStore::new());
    let ledger = Custody::builder()
        .store(store.clone())
        .open()
        .expect("Failed to open ledger");
    (store, ledger)
}

/// Create a ledger over a fault-injecting store
pub fn create_faulty_ledger(max_commit_retries: u32) -> (Arc<FaultyStore<MemoryStore>>, Custody) {
    let store = Arc::new(FaultyStore::new(MemoryStore::new()));
    let ledger = Custody::builder()
        .store(store.clone())
        .config(LedgerConfig::default().max_commit_retries(max_commit_retries))
        .open()
        .expect("Failed to open ledger");
    (store, ledger)
}

/// Create `id` and walk it through the first `steps` happy-path transitions
pub fn device_after(ledger: &Custody, id: &str, steps: usize) -> DeviceRecord {
    ledger.create_device(id).expect("create_device failed");
    for step in &HAPPY_PATH[..steps] {
        step.run(ledger, id)
            .unwrap_or_else(|e| panic!("{} failed: {}", step.op, e));
    }
    ledger.get_device_details(id).expect("get_device_details failed")
}

/// Raw bytes stored for `key`
pub fn stored_bytes(ledger: &DeviceLedger, key: &str) -> Option<Vec<u8>> {
    ledger
        .store()
        .get(key)
        .expect("store read failed")
        .map(|entry| entry.value)
}

/// The custody error inside a facade error
pub fn custody_error(err: custody::Error) -> custody_core::Error {
    match err {
        custody::Error::Custody(e) => e,
        other => panic!("Expected custody error, got {:?}", other),
    }
}
