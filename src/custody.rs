//! Main entry point for the custody ledger.
//!
//! [`Custody`] is a typed wrapper over the [`Executor`]: each method builds a
//! [`Command`], runs it, and unwraps the expected [`Output`].
//!
//! ## Caller Context
//!
//! `Custody` keeps a current caller, the party every mutation is performed
//! as. It starts as the vendor. Use [`act_as`](Custody::act_as) to switch,
//! the way a boundary layer would after establishing who is calling.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use custody_core::{Affiliation, DeviceRecord, DeviceSpec};
use custody_engine::{
    AccessMode, Caller, DeviceLedger, LedgerConfig, Transition, TransitionArgs, TransitionReceipt,
};
use custody_executor::{Command, Executor, Output};
use custody_storage::{LedgerStore, MemoryStore};

use crate::error::Result;

/// The custody ledger facade.
///
/// # Example
///
/// ```
/// use custody::prelude::*;
///
/// let mut ledger = Custody::ephemeral()?;
/// ledger.create_device_with("123456", DeviceSpec::new("LENOVO", "VIBE", "03-12-2016"))?;
/// ledger.transfer_to_warehouse("123456", "WAREHOUSE", "CN-1")?;
///
/// ledger.act_as(Affiliation::Warehouse);
/// ledger.accept_from_vendor("123456", "WAREHOUSE")?;
///
/// let device = ledger.get_device_details("123456")?;
/// assert_eq!(device.status, DeviceStatus::Received);
/// assert_eq!(device.owner.as_str(), "WAREHOUSE");
/// # Ok::<(), custody::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Custody {
    executor: Executor,
    caller: Caller,
}

impl Custody {
    /// Ledger over a fresh in-memory store with default settings.
    pub fn ephemeral() -> Result<Self> {
        Self::builder().open()
    }

    /// Create a builder for ledger configuration.
    ///
    /// # Example
    ///
    /// ```
    /// use custody::prelude::*;
    ///
    /// let ledger = Custody::builder()
    ///     .config(LedgerConfig::default().max_commit_retries(5))
    ///     .read_only()
    ///     .open()?;
    /// assert!(ledger.create_device("1").unwrap_err().is_rejection());
    /// # Ok::<(), custody::Error>(())
    /// ```
    pub fn builder() -> CustodyBuilder {
        CustodyBuilder::new()
    }

    /// Wrap an existing executor, acting as the vendor.
    pub fn from_executor(executor: Executor) -> Self {
        Self {
            executor,
            caller: Caller::party(Affiliation::Vendor),
        }
    }

    /// Get the underlying executor.
    pub fn executor(&self) -> &Executor {
        &self.executor
    }

    /// Get the underlying ledger.
    pub fn ledger(&self) -> &DeviceLedger {
        self.executor.ledger()
    }

    // =========================================================================
    // Caller Context
    // =========================================================================

    /// The party mutations are currently performed as.
    pub fn caller(&self) -> &Caller {
        &self.caller
    }

    /// Act as `affiliation`, named after the affiliation itself.
    pub fn act_as(&mut self, affiliation: Affiliation) -> &mut Self {
        self.caller = Caller::party(affiliation);
        tracing::debug!(caller = %self.caller, "Switched caller");
        self
    }

    /// Act as a named party of `affiliation`.
    ///
    /// The name is what a sale records as `soldBy`, so sales require it to
    /// be non-blank and not `"UNDEFINED"`.
    pub fn act_as_named(&mut self, affiliation: Affiliation, name: impl Into<String>) -> &mut Self {
        self.caller = Caller::new(affiliation, name);
        tracing::debug!(caller = %self.caller, "Switched caller");
        self
    }

    // =========================================================================
    // Creation
    // =========================================================================

    /// Register a device with the configured default name, model and date.
    pub fn create_device(&self, id: &str) -> Result<DeviceRecord> {
        self.create(id, None)
    }

    /// Register a device with explicit descriptive fields.
    pub fn create_device_with(&self, id: &str, spec: DeviceSpec) -> Result<DeviceRecord> {
        self.create(id, Some(spec))
    }

    fn create(&self, id: &str, spec: Option<DeviceSpec>) -> Result<DeviceRecord> {
        match self.executor.execute(Command::CreateDevice {
            id: id.to_string(),
            spec,
        })? {
            Output::Device(record) => Ok(record),
            other => Err(unexpected("CreateDevice", &other)),
        }
    }

    // =========================================================================
    // Custody Transitions
    // =========================================================================

    /// Vendor ships `id` to a warehouse under `consignment`.
    ///
    /// # Errors
    ///
    /// An empty or `"UNDEFINED"` consignment is rejected with `InvalidInput`
    /// before anything is written. The same holds for every dispatch:
    /// [`transfer_to_store`](Self::transfer_to_store),
    /// [`return_to_warehouse`](Self::return_to_warehouse) and
    /// [`return_to_vendor`](Self::return_to_vendor).
    pub fn transfer_to_warehouse(
        &self,
        id: &str,
        recipient: &str,
        consignment: &str,
    ) -> Result<TransitionReceipt> {
        self.shipment(Transition::DeliverToWarehouse, id, recipient, consignment)
    }

    /// Warehouse takes delivery of `id` from the vendor.
    pub fn accept_from_vendor(&self, id: &str, recipient: &str) -> Result<TransitionReceipt> {
        self.receipt(Transition::AcceptFromVendor, id, recipient)
    }

    /// Warehouse ships `id` to a store under `consignment`.
    ///
    /// `consignment` must be non-empty and not `"UNDEFINED"`.
    pub fn transfer_to_store(
        &self,
        id: &str,
        recipient: &str,
        consignment: &str,
    ) -> Result<TransitionReceipt> {
        self.shipment(Transition::DeliverToStore, id, recipient, consignment)
    }

    /// Store takes delivery of `id` from the warehouse.
    pub fn accept_from_warehouse(&self, id: &str, recipient: &str) -> Result<TransitionReceipt> {
        self.receipt(Transition::AcceptFromWarehouse, id, recipient)
    }

    /// Store sells `id` to `customer`; the current caller is recorded as seller.
    ///
    /// A caller named `""` or `"UNDEFINED"` cannot sell (`InvalidInput`).
    pub fn sell_to_customer(&self, id: &str, customer: &str) -> Result<TransitionReceipt> {
        self.receipt(Transition::SellToCustomer, id, customer)
    }

    /// Store takes `id` back from the customer; `recipient` becomes the owner.
    pub fn return_from_customer(&self, id: &str, recipient: &str) -> Result<TransitionReceipt> {
        self.receipt(Transition::ReturnFromCustomer, id, recipient)
    }

    /// Store hands out `id` in exchange for the returned `old_id`.
    pub fn exchange_device(
        &self,
        id: &str,
        recipient: &str,
        old_id: &str,
    ) -> Result<TransitionReceipt> {
        self.receipt_of(Command::Exchange {
            id: id.to_string(),
            old_id: old_id.to_string(),
            args: TransitionArgs::new(self.caller.clone(), recipient),
        })
    }

    /// Store ships a returned `id` to the warehouse under `consignment`.
    ///
    /// `consignment` must be non-empty and not `"UNDEFINED"`.
    pub fn return_to_warehouse(
        &self,
        id: &str,
        recipient: &str,
        consignment: &str,
    ) -> Result<TransitionReceipt> {
        self.shipment(Transition::ReturnToWarehouse, id, recipient, consignment)
    }

    /// Warehouse takes the returned `id` from the store.
    pub fn accept_return_from_store(&self, id: &str, recipient: &str) -> Result<TransitionReceipt> {
        self.receipt(Transition::AcceptReturnFromStore, id, recipient)
    }

    /// Warehouse ships `id` back to the vendor under `consignment`.
    ///
    /// `consignment` must be non-empty and not `"UNDEFINED"`.
    pub fn return_to_vendor(
        &self,
        id: &str,
        recipient: &str,
        consignment: &str,
    ) -> Result<TransitionReceipt> {
        self.shipment(Transition::ReturnToVendor, id, recipient, consignment)
    }

    /// Vendor takes the returned `id` from the warehouse.
    pub fn accept_return_from_warehouse(
        &self,
        id: &str,
        recipient: &str,
    ) -> Result<TransitionReceipt> {
        self.receipt(Transition::AcceptReturnFromWarehouse, id, recipient)
    }

    /// Run any transition with fully explicit arguments.
    ///
    /// The caller in `args` is used as given, not the current caller.
    pub fn transition(
        &self,
        op: Transition,
        id: &str,
        args: TransitionArgs,
    ) -> Result<TransitionReceipt> {
        self.receipt_of(Command::Transition {
            op,
            id: id.to_string(),
            args,
        })
    }

    fn shipment(
        &self,
        op: Transition,
        id: &str,
        recipient: &str,
        consignment: &str,
    ) -> Result<TransitionReceipt> {
        let args = TransitionArgs::new(self.caller.clone(), recipient).with_consignment(consignment);
        self.transition(op, id, args)
    }

    fn receipt(&self, op: Transition, id: &str, recipient: &str) -> Result<TransitionReceipt> {
        self.transition(op, id, TransitionArgs::new(self.caller.clone(), recipient))
    }

    fn receipt_of(&self, cmd: Command) -> Result<TransitionReceipt> {
        let name = cmd.name();
        match self.executor.execute(cmd)? {
            Output::Receipt(receipt) => Ok(receipt),
            other => Err(unexpected(name, &other)),
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Current record of `id`.
    pub fn get_device_details(&self, id: &str) -> Result<DeviceRecord> {
        match self.executor.execute(Command::GetDevice { id: id.to_string() })? {
            Output::Device(record) => Ok(record),
            other => Err(unexpected("GetDevice", &other)),
        }
    }

    /// True iff no usable record exists for `id`.
    pub fn check_unique(&self, id: &str) -> Result<bool> {
        match self.executor.execute(Command::CheckUnique { id: id.to_string() })? {
            Output::Bool(unique) => Ok(unique),
            other => Err(unexpected("CheckUnique", &other)),
        }
    }

    /// Every readable device in creation order.
    pub fn list_devices(&self) -> Result<Vec<DeviceRecord>> {
        match self.executor.execute(Command::ListDevices)? {
            Output::Devices(records) => Ok(records),
            other => Err(unexpected("ListDevices", &other)),
        }
    }

    /// Number of registered identifiers.
    pub fn device_count(&self) -> Result<usize> {
        match self.executor.execute(Command::DeviceCount)? {
            Output::Count(n) => Ok(n),
            other => Err(unexpected("DeviceCount", &other)),
        }
    }
}

fn unexpected(command: &str, output: &Output) -> crate::Error {
    crate::Error::Dispatch(custody_executor::Error::Internal {
        reason: format!("Unexpected output for {}: {}", command, output.variant_name()),
    })
}

/// Builder for [`Custody`].
///
/// # Example
///
/// ```
/// use custody::prelude::*;
/// use std::sync::Arc;
///
/// let store = Arc::new(MemoryStore::new());
/// let writer = Custody::builder().store(store.clone()).open()?;
/// writer.create_device("123456")?;
///
/// let reader = Custody::builder().store(store).read_only().open()?;
/// assert_eq!(reader.device_count()?, 1);
/// # Ok::<(), custody::Error>(())
/// ```
#[derive(Default)]
pub struct CustodyBuilder {
    config: Option<LedgerConfig>,
    config_path: Option<PathBuf>,
    store: Option<Arc<dyn LedgerStore>>,
    read_only: bool,
    caller: Option<Caller>,
}

impl CustodyBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use this configuration.
    pub fn config(mut self, config: LedgerConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Load configuration from a TOML file when opening.
    ///
    /// Takes precedence over [`config`](Self::config).
    pub fn config_file(mut self, path: impl AsRef<Path>) -> Self {
        self.config_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Run against this store instead of a fresh in-memory one.
    pub fn store(mut self, store: Arc<dyn LedgerStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Open read-only regardless of the configured access mode.
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    /// Initial caller (the vendor if not set).
    pub fn caller(mut self, caller: Caller) -> Self {
        self.caller = Some(caller);
        self
    }

    /// Open the ledger.
    pub fn open(self) -> Result<Custody> {
        let mut config = match self.config_path {
            Some(path) => LedgerConfig::from_file(path)?,
            None => self.config.unwrap_or_default(),
        };
        if self.read_only {
            config.access_mode = AccessMode::ReadOnly;
        }
        let store = self
            .store
            .unwrap_or_else(|| Arc::new(MemoryStore::new()) as Arc<dyn LedgerStore>);

        let ledger = DeviceLedger::open(store, config)?;
        let mut custody = Custody::from_executor(Executor::new(ledger));
        if let Some(caller) = self.caller {
            custody.caller = caller;
        }
        Ok(custody)
    }
}
