//! # Core Validators
//!
//! Rules every transaction is checked against, independent of its type.
//!
//! | validator                 | notification       | kind      |
//! |---------------------------|--------------------|-----------|
//! | `TransactionFeeValidator` | TransactionFee     | stateless |
//! | `AddressValidator`        | AccountAddress     | stateless |
//! | `NetworkValidator`        | Entity             | stateless |
//! | `SignatureValidator`      | Signature          | stateless |
//! | `MaxTransactionsValidator`| Block              | stateless |
//! | `EntityVersionValidator`  | Entity             | stateful  |
//! | `DeadlineValidator`       | TransactionDeadline| stateful  |
//! | `BalanceTransferValidator`| BalanceTransfer    | stateful  |
//! | `BalanceDebitValidator`   | BalanceDebit       | stateful  |

mod address;
mod balance;
mod deadline;
mod entity;
mod fee;
mod max_transactions;
mod signature;

pub use address::AddressValidator;
pub use balance::{BalanceDebitValidator, BalanceTransferValidator};
pub use deadline::DeadlineValidator;
pub use entity::{EntityVersionValidator, NetworkValidator};
pub use fee::TransactionFeeValidator;
pub use max_transactions::MaxTransactionsValidator;
pub use signature::SignatureValidator;
