//! Custody state machine
//!
//! Every custody operation is a pure function of the current record, the
//! call arguments and the current instant. It either returns the updated
//! record or a rejection; it never touches the store. The ledger runs these
//! functions inside its read-validate-commit loop, so they may be re-run
//! against fresh state after a conflict.
//!
//! # Rules
//!
//! Single-record operations are described by a [`Rule`] row: who may call,
//! which recipient affiliation is expected, the required status (and owner,
//! for receipt-side operations), the resulting status, and an [`Effect`]
//! selecting which fields change besides `status`.
//!
//! `RECEIVED` is shared by every tier. A device in `RECEIVED` is told apart
//! only by its owner and the operation being attempted, so "deliver to
//! store" accepts any `RECEIVED` device regardless of owner.
//!
//! Exchange touches two records and has its own entry point, [`exchange`].

use custody_core::{
    is_unset_token, Affiliation, DeviceRecord, DeviceStatus, Error, Holder, Result, Timestamp,
};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Operation name used in receipts and errors for an exchange
pub const EXCHANGE: &str = "exchange_device";

/// Legacy dispatcher name for an exchange
pub const EXCHANGE_LEGACY: &str = "EXCHANGE_DEV";

/// The party invoking an operation, as asserted by the boundary layer
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Caller {
    /// Claimed role in the supply chain
    pub affiliation: Affiliation,
    /// Identity recorded as `soldBy` on a sale
    pub name: String,
}

impl Caller {
    /// Caller with an explicit name
    pub fn new(affiliation: Affiliation, name: impl Into<String>) -> Self {
        Self {
            affiliation,
            name: name.into(),
        }
    }

    /// Caller named after its affiliation
    pub fn party(affiliation: Affiliation) -> Self {
        Self::new(affiliation, affiliation.as_str())
    }
}

impl fmt::Display for Caller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name == self.affiliation.as_str() {
            f.write_str(self.affiliation.as_str())
        } else {
            write!(f, "{} ({})", self.name, self.affiliation)
        }
    }
}

/// Arguments shared by every custody operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionArgs {
    /// Who is calling
    pub caller: Caller,
    /// Recipient token; becomes the owner on sale, customer return and exchange
    pub recipient: String,
    /// Recipient affiliation; `None` means the operation's canonical one
    pub recipient_affiliation: Option<Affiliation>,
    /// Shipment identifier for dispatch operations
    pub consignment: Option<String>,
}

impl TransitionArgs {
    /// Arguments with the canonical recipient affiliation and no consignment
    pub fn new(caller: Caller, recipient: impl Into<String>) -> Self {
        Self {
            caller,
            recipient: recipient.into(),
            recipient_affiliation: None,
            consignment: None,
        }
    }

    /// Attach a consignment number
    pub fn with_consignment(mut self, consignment: impl Into<String>) -> Self {
        self.consignment = Some(consignment.into());
        self
    }

    /// Override the recipient affiliation
    pub fn with_recipient_affiliation(mut self, affiliation: Affiliation) -> Self {
        self.recipient_affiliation = Some(affiliation);
        self
    }
}

/// Field updates applied alongside the status change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// `deliveryDate` and `consignmentNumber`; owner unchanged
    Dispatch,
    /// `receiptDate`; owner becomes the given affiliation
    Accept(Affiliation),
    /// `saleDate` and `soldBy`; owner becomes the recipient
    Sale,
    /// `receiptDate`; owner becomes the recipient
    CustomerReturn,
}

/// One row of the transition table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    /// Required caller affiliation
    pub caller: Affiliation,
    /// Required recipient affiliation
    pub recipient: Affiliation,
    /// Required current status
    pub from: DeviceStatus,
    /// Required current owner, if checked
    pub owner: Option<Affiliation>,
    /// Resulting status
    pub to: DeviceStatus,
    /// Other field updates
    pub effect: Effect,
}

/// Single-record custody operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transition {
    /// Vendor ships to a warehouse
    DeliverToWarehouse,
    /// Warehouse takes delivery from the vendor
    AcceptFromVendor,
    /// Warehouse ships to a store
    DeliverToStore,
    /// Store takes delivery from the warehouse
    AcceptFromWarehouse,
    /// Store sells to a customer
    SellToCustomer,
    /// Store takes a device back from a customer
    ReturnFromCustomer,
    /// Store ships a returned device to the warehouse
    ReturnToWarehouse,
    /// Warehouse takes a returned device from the store
    AcceptReturnFromStore,
    /// Warehouse ships a device back to the vendor
    ReturnToVendor,
    /// Vendor takes a returned device from the warehouse
    AcceptReturnFromWarehouse,
}

use Affiliation::{Customer, Store, Vendor, Warehouse};
use DeviceStatus::*;

impl Transition {
    /// Every operation, in happy-path order
    pub const ALL: [Transition; 10] = [
        Transition::DeliverToWarehouse,
        Transition::AcceptFromVendor,
        Transition::DeliverToStore,
        Transition::AcceptFromWarehouse,
        Transition::SellToCustomer,
        Transition::ReturnFromCustomer,
        Transition::ReturnToWarehouse,
        Transition::AcceptReturnFromStore,
        Transition::ReturnToVendor,
        Transition::AcceptReturnFromWarehouse,
    ];

    /// The table row for this operation
    pub fn rule(self) -> Rule {
        let (caller, recipient, from, owner, to, effect) = match self {
            Transition::DeliverToWarehouse => (
                Vendor,
                Warehouse,
                Created,
                None,
                DeliveredToWarehouse,
                Effect::Dispatch,
            ),
            Transition::AcceptFromVendor => (
                Warehouse,
                Warehouse,
                DeliveredToWarehouse,
                Some(Vendor),
                Received,
                Effect::Accept(Warehouse),
            ),
            Transition::DeliverToStore => (
                Warehouse,
                Store,
                Received,
                None,
                DeliveredToStore,
                Effect::Dispatch,
            ),
            Transition::AcceptFromWarehouse => (
                Store,
                Store,
                DeliveredToStore,
                Some(Warehouse),
                Received,
                Effect::Accept(Store),
            ),
            Transition::SellToCustomer => (
                Store,
                Store,
                Received,
                Some(Store),
                DeliveredToCustomer,
                Effect::Sale,
            ),
            Transition::ReturnFromCustomer => (
                Store,
                Store,
                DeliveredToCustomer,
                Some(Customer),
                ReturnedToStore,
                Effect::CustomerReturn,
            ),
            Transition::ReturnToWarehouse => (
                Store,
                Warehouse,
                ReturnedToStore,
                Some(Store),
                ReturnedToWarehouse,
                Effect::Dispatch,
            ),
            Transition::AcceptReturnFromStore => (
                Warehouse,
                Warehouse,
                ReturnedToWarehouse,
                Some(Store),
                Received,
                Effect::Accept(Warehouse),
            ),
            Transition::ReturnToVendor => (
                Warehouse,
                Vendor,
                Received,
                Some(Warehouse),
                ReturnedToVendor,
                Effect::Dispatch,
            ),
            Transition::AcceptReturnFromWarehouse => (
                Vendor,
                Vendor,
                ReturnedToVendor,
                Some(Warehouse),
                Received,
                Effect::Accept(Vendor),
            ),
        };
        Rule {
            caller,
            recipient,
            from,
            owner,
            to,
            effect,
        }
    }

    /// Canonical operation name
    pub fn name(self) -> &'static str {
        match self {
            Transition::DeliverToWarehouse => "transfer_to_warehouse",
            Transition::AcceptFromVendor => "accept_from_vendor",
            Transition::DeliverToStore => "transfer_to_store",
            Transition::AcceptFromWarehouse => "accept_from_warehouse",
            Transition::SellToCustomer => "sell_to_customer",
            Transition::ReturnFromCustomer => "return_from_customer",
            Transition::ReturnToWarehouse => "return_to_warehouse",
            Transition::AcceptReturnFromStore => "accept_return_from_store",
            Transition::ReturnToVendor => "return_to_vendor",
            Transition::AcceptReturnFromWarehouse => "accept_return_from_warehouse",
        }
    }

    /// Name used by the legacy dispatcher
    pub fn legacy_name(self) -> &'static str {
        match self {
            Transition::DeliverToWarehouse => "TRF_TO_WH",
            Transition::AcceptFromVendor => "ACPT_FROM_VENDOR",
            Transition::DeliverToStore => "TRF_TO_STRE",
            Transition::AcceptFromWarehouse => "ACPT_FROM_WAREHOUSE",
            Transition::SellToCustomer => "TRF_TO_CUST",
            Transition::ReturnFromCustomer => "RTN_FROM_CUST",
            Transition::ReturnToWarehouse => "RTN_TO_WAREHOUSE",
            Transition::AcceptReturnFromStore => "ACPT_FROM_STRE",
            Transition::ReturnToVendor => "RTN_TO_VENDOR",
            Transition::AcceptReturnFromWarehouse => "ACPT_RTN_FROM_WAREHOUSE",
        }
    }

    /// Look up an operation by canonical or legacy name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.name() == name || t.legacy_name() == name)
    }

    /// True if the call shape carries a consignment number
    pub fn takes_consignment(self) -> bool {
        matches!(self.rule().effect, Effect::Dispatch | Effect::Sale)
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Transition {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Transition::from_name(s).ok_or_else(|| Error::InvalidInput {
            message: format!("unknown custody operation {:?}", s),
        })
    }
}

/// Structured result of a committed transition
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransitionReceipt {
    /// Canonical operation name
    pub operation: String,
    /// Device whose record was written
    pub id: String,
    /// Status before the transition
    pub from_status: DeviceStatus,
    /// Status after the transition
    pub to_status: DeviceStatus,
    /// Owner before the transition
    pub from_owner: Holder,
    /// Owner after the transition
    pub to_owner: Holder,
    /// Store version of the commit
    pub version: u64,
    /// Instant stamped on the record
    pub at: Timestamp,
}

impl TransitionReceipt {
    /// Describe the change from `before` to `after`
    pub fn new(
        operation: impl Into<String>,
        before: &DeviceRecord,
        after: &DeviceRecord,
        version: u64,
        at: Timestamp,
    ) -> Self {
        Self {
            operation: operation.into(),
            id: after.id.to_string(),
            from_status: before.status,
            to_status: after.status,
            from_owner: before.owner.clone(),
            to_owner: after.owner.clone(),
            version,
            at,
        }
    }
}

/// Apply a single-record transition
///
/// Checks, in order: caller affiliation, recipient affiliation, current
/// status, current owner, then the arguments the effect needs.
pub fn apply(
    op: Transition,
    record: &DeviceRecord,
    args: &TransitionArgs,
    now: Timestamp,
) -> Result<DeviceRecord> {
    let rule = op.rule();
    check_parties(op.name(), rule.caller, rule.recipient, args)?;

    let reject = |reason: String| Error::InvalidTransition {
        operation: op.name().to_string(),
        id: record.id.to_string(),
        reason,
    };
    if record.status != rule.from {
        return Err(reject(format!(
            "status is {}, requires {}",
            record.status, rule.from
        )));
    }
    if let Some(owner) = rule.owner {
        if !record.owner.is(owner) {
            return Err(reject(format!(
                "owner is {}, requires {}",
                record.owner, owner
            )));
        }
    }

    let mut next = record.clone();
    next.status = rule.to;
    match rule.effect {
        Effect::Dispatch => {
            next.consignment_number = Some(consignment(op.name(), args)?);
            next.delivered_at = Some(now);
        }
        Effect::Accept(owner) => {
            next.owner = Holder::Party(owner);
            next.received_at = Some(now);
        }
        Effect::Sale => {
            next.owner = Holder::parse(args.recipient.as_str())?;
            next.sold_by = Some(seller(op.name(), &args.caller)?);
            next.sold_at = Some(now);
        }
        Effect::CustomerReturn => {
            next.owner = Holder::parse(args.recipient.as_str())?;
            next.received_at = Some(now);
        }
    }
    Ok(next)
}

/// Exchange a returned device for a replacement
///
/// `old` must be `RETURNED_TO_STORE` and held by the store, `new` must be
/// `RECEIVED`, and both must share a model. Only the replacement changes:
/// it becomes `EXCHANGED`, owned by the recipient, with `previousId`
/// pointing at `old`.
pub fn exchange(
    old: &DeviceRecord,
    new: &DeviceRecord,
    args: &TransitionArgs,
    now: Timestamp,
) -> Result<DeviceRecord> {
    check_parties(EXCHANGE, Store, Store, args)?;

    let reject = |id: &custody_core::DeviceId, reason: String| Error::InvalidTransition {
        operation: EXCHANGE.to_string(),
        id: id.to_string(),
        reason,
    };
    if old.id == new.id {
        return Err(reject(&new.id, "device cannot replace itself".to_string()));
    }
    if old.status != ReturnedToStore {
        return Err(reject(
            &old.id,
            format!("returned device status is {}, requires {}", old.status, ReturnedToStore),
        ));
    }
    if !old.owner.is(Store) {
        return Err(reject(
            &old.id,
            format!("returned device owner is {}, requires {}", old.owner, Store),
        ));
    }
    if new.status != Received {
        return Err(reject(
            &new.id,
            format!("replacement status is {}, requires {}", new.status, Received),
        ));
    }
    if old.model != new.model {
        return Err(reject(
            &new.id,
            format!("model {} does not match returned model {}", new.model, old.model),
        ));
    }

    let mut next = new.clone();
    next.status = Exchanged;
    next.owner = Holder::parse(args.recipient.as_str())?;
    next.sold_at = Some(now);
    next.previous_id = Some(old.id.clone());
    Ok(next)
}

fn check_parties(
    operation: &str,
    caller: Affiliation,
    recipient: Affiliation,
    args: &TransitionArgs,
) -> Result<()> {
    let denied = |reason: String| Error::PermissionDenied {
        operation: operation.to_string(),
        reason,
    };
    if args.caller.affiliation != caller {
        return Err(denied(format!(
            "caller is {}, requires {}",
            args.caller.affiliation, caller
        )));
    }
    let actual = args.recipient_affiliation.unwrap_or(recipient);
    if actual != recipient {
        return Err(denied(format!(
            "recipient is {}, requires {}",
            actual, recipient
        )));
    }
    Ok(())
}

fn seller(operation: &str, caller: &Caller) -> Result<String> {
    if is_unset_token(caller.name.trim()) {
        return Err(Error::InvalidInput {
            message: format!("{} requires a named seller, got {:?}", operation, caller.name),
        });
    }
    Ok(caller.name.clone())
}

fn consignment(operation: &str, args: &TransitionArgs) -> Result<String> {
    match args.consignment.as_deref() {
        Some(c) if !is_unset_token(c.trim()) => Ok(c.to_string()),
        _ => Err(Error::InvalidInput {
            message: format!("{} requires a consignment number", operation),
        }),
    }
}
