//! Signed transactions and funded accounts for executor tests.

use crate::domain::Block;
use cc_01_cache::{AccountStateCacheDescriptor, CatapultCacheDelta};
use cc_02_model::{BlockchainConfiguration, TransactionBuilder};
use cc_05_plugins::transfer::TransferTransaction;
use ed25519_dalek::{Signer, SigningKey};
use shared_types::{
    make_version, public_key_to_address, Address, Amount, BlockFeeMultiplier, EntityType, Height, Key, MosaicId,
    NetworkIdentifier, Signature, Timestamp, UnresolvedMosaic,
};

pub const NETWORK: NetworkIdentifier = NetworkIdentifier::MIJIN_TEST;
pub const CURRENCY: MosaicId = MosaicId(0x0DC6_7FBE_1CAD_29E3);
pub const BLOCK_TIME: Timestamp = Timestamp(1_000);

pub fn config() -> BlockchainConfiguration {
    BlockchainConfiguration::default().with_plugin_property("plugin:transfer", "maxMessageSize", "1024")
}

/// Deterministic signing keys, one per account index.
pub struct Accounts {
    keys: Vec<SigningKey>,
}

impl Accounts {
    pub fn new(count: u8) -> Self {
        Self {
            keys: (1..=count).map(|seed| SigningKey::from_bytes(&[seed; 32])).collect(),
        }
    }

    pub fn key(&self, index: usize) -> Key {
        Key(self.keys[index].verifying_key().to_bytes())
    }

    pub fn address(&self, index: usize) -> Address {
        public_key_to_address(&self.key(index), NETWORK)
    }

    pub fn sign(&self, index: usize, builder: &TransactionBuilder) -> Vec<u8> {
        builder.sign_with(|data| Signature(self.keys[index].sign(data).to_bytes()))
    }

    /// Adds the account with its key and credits `amount` of the currency.
    pub fn fund(&self, delta: &mut CatapultCacheDelta, index: usize, amount: Amount) {
        let accounts = delta.sub_mut::<AccountStateCacheDescriptor>();
        accounts.add_account_with_key(self.key(index), NETWORK, Height(1));
        accounts
            .find_mut(&self.address(index))
            .expect("account was added")
            .balances
            .credit(CURRENCY, amount)
            .expect("credit fits");
    }
}

/// Signed currency transfer from account `from` to account `to`.
pub fn transfer(accounts: &Accounts, from: usize, to: usize, amount: u64, max_fee: u64) -> Vec<u8> {
    let payload = TransferTransaction {
        recipient: accounts.address(to).to_unresolved(),
        message: Vec::new(),
        mosaics: vec![UnresolvedMosaic {
            mosaic_id: CURRENCY.to_unresolved(),
            amount: Amount(amount),
        }],
    }
    .to_payload();

    let builder = TransactionBuilder::new(EntityType::TRANSFER, make_version(NETWORK, 1))
        .signer(accounts.key(from))
        .max_fee(Amount(max_fee))
        .deadline(Timestamp(BLOCK_TIME.0 + 60_000))
        .payload(payload);
    accounts.sign(from, &builder)
}

pub fn block(height: u64, transactions: Vec<Vec<u8>>) -> Block {
    Block {
        height: Height(height),
        timestamp: BLOCK_TIME,
        fee_multiplier: BlockFeeMultiplier(1),
        transactions,
    }
}
