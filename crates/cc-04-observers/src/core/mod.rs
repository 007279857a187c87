//! # Core Observers
//!
//! | observer                   | notification     | effect                          |
//! |----------------------------|------------------|---------------------------------|
//! | `SourceChangeObserver`     | SourceChange     | moves the receipt source        |
//! | `AccountPublicKeyObserver` | AccountPublicKey | adds account / attaches key     |
//! | `AccountAddressObserver`   | AccountAddress   | adds account by address         |
//! | `BalanceTransferObserver`  | BalanceTransfer  | moves balance sender → recipient|
//! | `BalanceDebitObserver`     | BalanceDebit     | removes balance from sender     |

mod account;
mod balance;
mod source_change;

pub use account::{AccountAddressObserver, AccountPublicKeyObserver};
pub use balance::{BalanceDebitObserver, BalanceTransferObserver};
pub use source_change::SourceChangeObserver;
